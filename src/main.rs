use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bettys_movies::{
    config::Config,
    db::{create_pool, create_redis_client, run_migrations, Cache},
    routes::create_router,
    services::providers::{GoogleSearchClient, TmdbClient},
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bettys_movies=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!(host = %config.host, port = config.port, "Loaded configuration");

    let db_pool = create_pool(&config.database_url)
        .await
        .context("failed to connect to database")?;
    run_migrations(&db_pool).await?;

    let redis_client = create_redis_client(&config.redis_url)?;
    let (cache, cache_handle) = Cache::new(redis_client);

    let metadata = Arc::new(TmdbClient::new(
        cache.clone(),
        config.tmdb_api_key.clone(),
        config.tmdb_access_token.clone(),
        config.tmdb_api_url.clone(),
    ));
    let web_search = Arc::new(GoogleSearchClient::new(
        cache,
        config.google_api_key.clone(),
        config.google_search_engine_id.clone(),
        config.google_search_url.clone(),
    ));

    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(AppState::new(db_pool, metadata, web_search, config));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    cache_handle.shutdown().await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
