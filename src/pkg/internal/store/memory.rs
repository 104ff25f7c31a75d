use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use super::ApplicationStore;
use crate::pkg::internal::adaptors::applications::spec::{
    ApplicationEntry, ApplicationStatus, NewApplication,
};
use crate::prelude::{ApiError, Result};

#[derive(Default)]
struct Table {
    rows: Vec<ApplicationEntry>,
    next_id: i32,
}

/// In-process store with the same observable behaviour as [`super::PgStore`].
#[derive(Default)]
pub struct MemoryStore {
    table: Mutex<Table>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent insert and update fail like a lost database.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Relaxed);
    }

    pub async fn len(&self) -> usize {
        self.table.lock().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(ApiError::Store("connection refused".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ApplicationStore for MemoryStore {
    async fn insert(&self, application: NewApplication) -> Result<ApplicationEntry> {
        self.check_writable()?;
        let mut table = self.table.lock().await;
        if table
            .rows
            .iter()
            .any(|row| row.reference_id == application.reference_id)
        {
            return Err(ApiError::DuplicateReference(application.reference_id));
        }
        table.next_id += 1;
        let entry = application.into_entry(table.next_id, Utc::now());
        table.rows.push(entry.clone());
        Ok(entry)
    }

    async fn list(&self, status: Option<ApplicationStatus>) -> Result<Vec<ApplicationEntry>> {
        let table = self.table.lock().await;
        let mut rows: Vec<ApplicationEntry> = table
            .rows
            .iter()
            .filter(|row| status.is_none_or(|s| row.status == s))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn update_status(
        &self,
        id: i32,
        status: ApplicationStatus,
    ) -> Result<Option<ApplicationEntry>> {
        self.check_writable()?;
        let mut table = self.table.lock().await;
        Ok(table.rows.iter_mut().find(|row| row.id == id).map(|row| {
            row.status = status;
            row.clone()
        }))
    }

    async fn set_offer_letter(&self, id: i32, path: &str) -> Result<Option<ApplicationEntry>> {
        self.check_writable()?;
        let mut table = self.table.lock().await;
        Ok(table.rows.iter_mut().find(|row| row.id == id).map(|row| {
            row.offer_letter = Some(path.to_string());
            row.clone()
        }))
    }

    async fn ping(&self) -> Result<()> {
        self.check_writable()
    }
}
