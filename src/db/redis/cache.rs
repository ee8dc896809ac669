use redis::AsyncCommands;
use redis::Client;
use std::fmt::Display;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::error::AppResult;

/// Keys of cached external API responses
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    PopularPage(u32),
    NowPlaying,
    MovieDetails(u64),
    MovieKeywords(u64),
    MovieReviews(u64),
    WebSearch(String),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::PopularPage(page) => write!(f, "tmdb:popular:{}", page),
            CacheKey::NowPlaying => write!(f, "tmdb:now_playing"),
            CacheKey::MovieDetails(id) => write!(f, "tmdb:movie:{}", id),
            CacheKey::MovieKeywords(id) => write!(f, "tmdb:keywords:{}", id),
            CacheKey::MovieReviews(id) => write!(f, "tmdb:reviews:{}", id),
            CacheKey::WebSearch(query) => write!(f, "search:{}", query.to_lowercase()),
        }
    }
}

/// Creates a Redis client for caching
///
/// `Client::open` only parses the URL; no connection is made until first use.
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Message for asynchronous cache writes
struct CacheWriteMessage {
    key: String,
    value: String,
    ttl: u64,
}

/// Best-effort cache for external API responses
///
/// Reads that fail (Redis down, stale payload shape) are treated as misses,
/// so an unavailable Redis only costs extra upstream calls.
#[derive(Clone)]
pub struct Cache {
    redis_client: Client,
    write_tx: mpsc::UnboundedSender<CacheWriteMessage>,
}

/// Handle for gracefully shutting down the cache writer
pub struct CacheWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
    writer: JoinHandle<()>,
}

impl CacheWriterHandle {
    /// Initiates a graceful shutdown of the cache writer
    ///
    /// Resolves once the writer has flushed pending writes and exited.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        tracing::info!("Cache writer shutdown signal sent");

        if let Err(e) = self.writer.await {
            tracing::error!(error = %e, "Cache writer task failed");
        }
    }
}

impl Cache {
    /// Creates a new Cache instance with an async write background task
    pub fn new(redis_client: Client) -> (Self, CacheWriterHandle) {
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let client = redis_client.clone();
        let writer = tokio::spawn(async move {
            Self::cache_writer_task(client, write_rx, shutdown_rx).await;
        });

        let cache = Self {
            redis_client,
            write_tx,
        };

        (
            cache,
            CacheWriterHandle {
                shutdown_tx,
                writer,
            },
        )
    }

    async fn cache_writer_task(
        client: Client,
        mut write_rx: mpsc::UnboundedReceiver<CacheWriteMessage>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        tracing::info!("Cache writer task started");

        loop {
            tokio::select! {
                maybe_msg = write_rx.recv() => {
                    let Some(msg) = maybe_msg else {
                        break;
                    };
                    if let Err(e) = Self::write_to_redis(&client, msg).await {
                        tracing::warn!(error = %e, "Failed to write to Redis cache");
                    }
                }
                // A dropped handle closes the channel; only an explicit shutdown stops the writer
                Some(()) = shutdown_rx.recv() => {
                    tracing::info!("Cache writer shutting down, flushing remaining writes");

                    // Senders may still be alive in clones of the cache, so drain
                    // only what is already queued.
                    while let Ok(msg) = write_rx.try_recv() {
                        if let Err(e) = Self::write_to_redis(&client, msg).await {
                            tracing::warn!(error = %e, "Failed to flush cache write during shutdown");
                        }
                    }

                    break;
                }
            }
        }

        tracing::info!("Cache writer task stopped");
    }

    async fn write_to_redis(client: &Client, msg: CacheWriteMessage) -> AppResult<()> {
        let mut conn = client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(msg.key, msg.value, msg.ttl).await?;
        Ok(())
    }

    /// Retrieves a value from the cache by key
    ///
    /// Returns `None` on a miss and on any Redis or deserialization failure.
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let cached: Option<String> = match self.redis_client.get_multiplexed_async_connection().await {
            Ok(mut conn) => match conn.get::<_, Option<String>>(key.to_string()).await {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!(error = %e, key = %key, "Redis get failed");
                    return None;
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "Redis unavailable, treating as cache miss");
                return None;
            }
        };

        let json = cached?;
        match serde_json::from_str(&json) {
            Ok(data) => {
                tracing::debug!(key = %key, "Cache hit");
                Some(data)
            }
            Err(e) => {
                tracing::warn!(error = %e, key = %key, "Discarding undecodable cache entry");
                None
            }
        }
    }

    /// Stores a value in the cache asynchronously without blocking
    ///
    /// The value is serialized here and handed to the background writer;
    /// this method returns before the write reaches Redis.
    pub fn set_in_background<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, "Cache serialization error");
                return;
            }
        };

        let msg = CacheWriteMessage {
            key: key.to_string(),
            value: json,
            ttl,
        };

        if let Err(e) = self.write_tx.send(msg) {
            tracing::error!(error = %e, "Failed to send cache write message");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_cache() -> (Cache, CacheWriterHandle) {
        let client = create_redis_client("redis://127.0.0.1:1").unwrap();
        Cache::new(client)
    }

    #[test]
    fn test_cache_key_display_tmdb() {
        assert_eq!(CacheKey::PopularPage(42).to_string(), "tmdb:popular:42");
        assert_eq!(CacheKey::NowPlaying.to_string(), "tmdb:now_playing");
        assert_eq!(CacheKey::MovieDetails(550).to_string(), "tmdb:movie:550");
        assert_eq!(CacheKey::MovieKeywords(550).to_string(), "tmdb:keywords:550");
        assert_eq!(CacheKey::MovieReviews(550).to_string(), "tmdb:reviews:550");
    }

    #[test]
    fn test_cache_key_display_web_search_lowercase() {
        let key = CacheKey::WebSearch("top Action, Drama movies".to_string());
        assert_eq!(key.to_string(), "search:top action, drama movies");
    }

    #[tokio::test]
    async fn test_unreachable_redis_is_a_miss() {
        let (cache, _handle) = unreachable_cache();
        let retrieved: Option<Vec<String>> = cache.get_from_cache(&CacheKey::NowPlaying).await;
        assert_eq!(retrieved, None);
    }

    #[tokio::test]
    async fn test_shutdown_waits_for_writer_to_flush() {
        let (cache, handle) = unreachable_cache();
        cache.set_in_background(&CacheKey::PopularPage(1), &vec!["a".to_string()], 60);
        cache.set_in_background(&CacheKey::PopularPage(2), &vec!["b".to_string()], 60);

        handle.shutdown().await;

        // The writer has exited, so its receiver is gone
        assert!(cache.write_tx.is_closed());
    }

    #[tokio::test]
    async fn test_dropped_handle_keeps_writer_running() {
        let (cache, handle) = unreachable_cache();
        drop(handle);
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }

        assert!(!cache.write_tx.is_closed());
        cache.set_in_background(&CacheKey::NowPlaying, &vec!["c".to_string()], 60);
    }
}
