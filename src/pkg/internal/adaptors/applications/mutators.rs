use sqlx::PgConnection;

use crate::pkg::internal::adaptors::applications::spec::{
    ApplicationEntry, ApplicationStatus, NewApplication,
};
use crate::prelude::{ApiError, Result};

pub struct ApplicationMutator<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> ApplicationMutator<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        ApplicationMutator { pool }
    }

    pub async fn create(&mut self, application: NewApplication) -> Result<ApplicationEntry> {
        let reference_id = application.reference_id.clone();
        let row = sqlx::query_as::<_, ApplicationEntry>(
            r#"
            INSERT INTO job_applications (
                reference_id, full_name, email, mobile_number, department, job_role,
                dob, father_name, permanent_address, expected_salary, interview_date,
                joining_date, employment_type, branch_location, ssc_year, ssc_percentage,
                intermediate_year, intermediate_percentage, college_name, register_number,
                graduation_year, graduation_percentage, experience_status, ssc_doc,
                intermediate_doc, graduation_doc, status
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, 'Pending')
            RETURNING *
            "#,
        )
        .bind(application.reference_id)
        .bind(application.full_name)
        .bind(application.email)
        .bind(application.mobile_number)
        .bind(application.department)
        .bind(application.job_role)
        .bind(application.dob)
        .bind(application.father_name)
        .bind(application.permanent_address)
        .bind(application.expected_salary)
        .bind(application.interview_date)
        .bind(application.joining_date)
        .bind(application.employment_type)
        .bind(application.branch_location)
        .bind(application.ssc_year)
        .bind(application.ssc_percentage)
        .bind(application.intermediate_year)
        .bind(application.intermediate_percentage)
        .bind(application.college_name)
        .bind(application.register_number)
        .bind(application.graduation_year)
        .bind(application.graduation_percentage)
        .bind(application.experience_status)
        .bind(application.ssc_doc)
        .bind(application.intermediate_doc)
        .bind(application.graduation_doc)
        .fetch_one(&mut *self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error().is_some_and(|db| db.is_unique_violation()) {
                ApiError::DuplicateReference(reference_id)
            } else {
                ApiError::from(e)
            }
        })?;
        Ok(row)
    }

    pub async fn update_status(
        &mut self,
        id: i32,
        status: ApplicationStatus,
    ) -> Result<Option<ApplicationEntry>> {
        let row = sqlx::query_as::<_, ApplicationEntry>(
            "UPDATE job_applications SET status = $1 WHERE id = $2 RETURNING *",
        )
        .bind(status)
        .bind(id)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn set_offer_letter(
        &mut self,
        id: i32,
        path: &str,
    ) -> Result<Option<ApplicationEntry>> {
        let row = sqlx::query_as::<_, ApplicationEntry>(
            "UPDATE job_applications SET offer_letter = $1 WHERE id = $2 RETURNING *",
        )
        .bind(path)
        .bind(id)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }
}
