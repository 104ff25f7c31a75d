use crate::{conf::Settings, pkg::server::state::GetTxn, prelude::Result};
use sqlx::{migrate::Migrator, postgres::PgPoolOptions};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub async fn apply(settings: &Settings) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect_with(settings.pg_connect_options())
        .await?;

    tracing::debug!("connected to db");
    let mut tx = pool.begin_txn().await?;
    MIGRATOR.run(&mut *tx).await?;
    tx.commit().await?;
    pool.close().await;

    tracing::info!("Migrations applied successfully");
    Ok(())
}
