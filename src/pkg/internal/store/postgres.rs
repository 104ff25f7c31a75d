use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};

use super::ApplicationStore;
use crate::conf::Settings;
use crate::pkg::internal::adaptors::applications::{
    mutators::ApplicationMutator,
    selectors::ApplicationSelector,
    spec::{ApplicationEntry, ApplicationStatus, NewApplication},
};
use crate::prelude::Result;

/// Postgres-backed store. Every operation borrows one pooled connection for a
/// single statement and hands it back.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }

    /// Connections are opened on first use.
    pub fn connect_lazy(settings: &Settings) -> Self {
        let pool = PgPoolOptions::new()
            .max_connections(settings.database_pool_max_connections)
            .connect_lazy_with(settings.pg_connect_options());
        PgStore::new(pool)
    }
}

#[async_trait]
impl ApplicationStore for PgStore {
    async fn insert(&self, application: NewApplication) -> Result<ApplicationEntry> {
        let mut conn = self.pool.acquire().await?;
        ApplicationMutator::new(&mut conn).create(application).await
    }

    async fn list(&self, status: Option<ApplicationStatus>) -> Result<Vec<ApplicationEntry>> {
        let mut conn = self.pool.acquire().await?;
        let mut selector = ApplicationSelector::new(&mut conn);
        match status {
            Some(status) => selector.get_by_status(status).await,
            None => selector.get_all().await,
        }
    }

    async fn update_status(
        &self,
        id: i32,
        status: ApplicationStatus,
    ) -> Result<Option<ApplicationEntry>> {
        let mut conn = self.pool.acquire().await?;
        ApplicationMutator::new(&mut conn)
            .update_status(id, status)
            .await
    }

    async fn set_offer_letter(&self, id: i32, path: &str) -> Result<Option<ApplicationEntry>> {
        let mut conn = self.pool.acquire().await?;
        ApplicationMutator::new(&mut conn)
            .set_offer_letter(id, path)
            .await
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT NOW()").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
