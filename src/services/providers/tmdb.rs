/// TMDb (The Movie Database) v3 provider
///
/// Every call carries both the read access token (bearer header) and the v3
/// api key (query parameter). Responses are cached in Redis.
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{TmdbKeywords, TmdbMovieDetails, TmdbMoviePage, TmdbReviewPage},
    services::providers::MovieMetadataProvider,
};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;

const LIST_CACHE_TTL: u64 = 3600; // 1 hour
const DETAILS_CACHE_TTL: u64 = 86400; // 1 day

#[derive(Clone)]
pub struct TmdbClient {
    http_client: HttpClient,
    api_key: String,
    access_token: String,
    api_url: String,
    cache: Cache,
}

impl TmdbClient {
    pub fn new(cache: Cache, api_key: String, access_token: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            access_token,
            api_url,
            cache,
        }
    }

    /// Issues an authenticated GET and decodes the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> AppResult<T> {
        let url = format!("{}{}", self.api_url.trim_end_matches('/'), path);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDb API returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await?;
        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                path = %path,
                "Failed to deserialize TMDb response"
            );
            AppError::ExternalApi(format!("Failed to parse TMDb response: {}", e))
        })
    }
}

#[async_trait::async_trait]
impl MovieMetadataProvider for TmdbClient {
    async fn popular(&self, page: u32) -> AppResult<TmdbMoviePage> {
        cached!(
            self.cache,
            CacheKey::PopularPage(page),
            LIST_CACHE_TTL,
            async move {
                let movies: TmdbMoviePage = self
                    .get_json("/movie/popular", &[("page", page.to_string())])
                    .await?;

                tracing::info!(
                    page = page,
                    results = movies.results.len(),
                    provider = "tmdb",
                    "Popular movies fetched"
                );

                Ok::<_, AppError>(movies)
            }
        )
    }

    async fn now_playing(&self) -> AppResult<TmdbMoviePage> {
        cached!(self.cache, CacheKey::NowPlaying, LIST_CACHE_TTL, async move {
            self.get_json::<TmdbMoviePage>("/movie/now_playing", &[])
                .await
        })
    }

    async fn movie_details(&self, movie_id: u64) -> AppResult<TmdbMovieDetails> {
        cached!(
            self.cache,
            CacheKey::MovieDetails(movie_id),
            DETAILS_CACHE_TTL,
            async move {
                self.get_json::<TmdbMovieDetails>(&format!("/movie/{}", movie_id), &[])
                    .await
            }
        )
    }

    async fn movie_keywords(&self, movie_id: u64) -> AppResult<TmdbKeywords> {
        cached!(
            self.cache,
            CacheKey::MovieKeywords(movie_id),
            DETAILS_CACHE_TTL,
            async move {
                self.get_json::<TmdbKeywords>(&format!("/movie/{}/keywords", movie_id), &[])
                    .await
            }
        )
    }

    async fn movie_reviews(&self, movie_id: u64) -> AppResult<TmdbReviewPage> {
        cached!(
            self.cache,
            CacheKey::MovieReviews(movie_id),
            LIST_CACHE_TTL,
            async move {
                self.get_json::<TmdbReviewPage>(&format!("/movie/{}/reviews", movie_id), &[])
                    .await
            }
        )
    }
}
