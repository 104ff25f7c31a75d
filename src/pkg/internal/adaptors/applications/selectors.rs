use sqlx::PgConnection;

use crate::pkg::internal::adaptors::applications::spec::{ApplicationEntry, ApplicationStatus};
use crate::prelude::Result;

pub struct ApplicationSelector<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> ApplicationSelector<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        ApplicationSelector { pool }
    }

    pub async fn get_all(&mut self) -> Result<Vec<ApplicationEntry>> {
        let rows = sqlx::query_as::<_, ApplicationEntry>(
            "SELECT * FROM job_applications ORDER BY created_at DESC",
        )
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_by_status(
        &mut self,
        status: ApplicationStatus,
    ) -> Result<Vec<ApplicationEntry>> {
        let rows = sqlx::query_as::<_, ApplicationEntry>(
            "SELECT * FROM job_applications WHERE status = $1 ORDER BY created_at DESC",
        )
        .bind(status)
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(rows)
    }
}
