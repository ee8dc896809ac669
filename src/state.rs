use std::sync::Arc;

use sqlx::PgPool;

use crate::{
    config::Config,
    services::providers::{MovieMetadataProvider, WebSearchProvider},
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub metadata: Arc<dyn MovieMetadataProvider>,
    pub web_search: Arc<dyn WebSearchProvider>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(
        db_pool: PgPool,
        metadata: Arc<dyn MovieMetadataProvider>,
        web_search: Arc<dyn WebSearchProvider>,
        config: Config,
    ) -> Self {
        Self {
            db_pool,
            metadata,
            web_search,
            config: Arc::new(config),
        }
    }
}
