use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use crate::{
    conf::Settings,
    pkg::{
        internal::{
            store::{ApplicationStore, PgStore},
            uploads::UploadStore,
        },
        server::middlewares::ratelimit::RateLimiter,
    },
    prelude::Result,
};

#[async_trait]
pub trait GetTxn {
    async fn begin_txn(&self) -> Result<Transaction<'static, Postgres>>;
}

#[async_trait]
impl GetTxn for PgPool {
    async fn begin_txn(&self) -> Result<Transaction<'static, Postgres>> {
        Ok(self.begin().await?)
    }
}

/// Process-wide resources, created once at startup and handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ApplicationStore>,
    pub uploads: Arc<UploadStore>,
    pub limiter: Arc<RateLimiter>,
    pub origins: Arc<Vec<String>>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(settings: Settings) -> AppState {
        let store = Arc::new(PgStore::connect_lazy(&settings));
        AppState::with_store(settings, store)
    }

    pub fn with_store(settings: Settings, store: Arc<dyn ApplicationStore>) -> AppState {
        AppState {
            store,
            uploads: Arc::new(UploadStore::new(settings.uploads_dir.clone())),
            limiter: Arc::new(RateLimiter::new(
                settings.rate_limit_max,
                settings.rate_limit_window(),
            )),
            origins: Arc::new(settings.origins()),
            settings: Arc::new(settings),
        }
    }
}
