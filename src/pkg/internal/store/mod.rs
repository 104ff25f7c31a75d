//! Persistence seam for job applications.
//!
//! Handlers only see [`ApplicationStore`]; the Postgres implementation is used by
//! the server, the in-memory one by tests.

use async_trait::async_trait;

use crate::pkg::internal::adaptors::applications::spec::{
    ApplicationEntry, ApplicationStatus, NewApplication,
};
use crate::prelude::Result;

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait ApplicationStore: Send + Sync {
    /// Inserts a row with status `Pending` and returns it as stored.
    async fn insert(&self, application: NewApplication) -> Result<ApplicationEntry>;

    /// Rows with the given status, or all rows, most recent first.
    async fn list(&self, status: Option<ApplicationStatus>) -> Result<Vec<ApplicationEntry>>;

    /// `None` when no row has this id.
    async fn update_status(
        &self,
        id: i32,
        status: ApplicationStatus,
    ) -> Result<Option<ApplicationEntry>>;

    /// `None` when no row has this id.
    async fn set_offer_letter(&self, id: i32, path: &str) -> Result<Option<ApplicationEntry>>;

    async fn ping(&self) -> Result<()>;

    async fn close(&self) {}
}
