use std::collections::HashMap;

use chrono::Utc;
use rand::Rng;
use serde::Deserialize;
use serde_json::{Map, Value};
use validator::Validate;

use crate::pkg::internal::adaptors::applications::spec::{ApplicationEntry, NewApplication};
use crate::pkg::internal::store::ApplicationStore;
use crate::pkg::internal::uploads::{UploadStore, UploadedFile};
use crate::prelude::{ApiError, Result};

pub const REQUIRED_FIELDS: [&str; 5] =
    ["full_name", "email", "mobile_number", "department", "job_role"];

const DEFAULT_EXPERIENCE_STATUS: &str = "No";
const MAX_REFERENCE_ATTEMPTS: u32 = 5;

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ApplicationSubmission {
    #[validate(length(min = 1, message = "Field cannot be empty"))]
    pub full_name: String,
    #[validate(length(min = 1, message = "Field cannot be empty"))]
    pub email: String,
    #[validate(length(min = 1, message = "Field cannot be empty"))]
    pub mobile_number: String,
    #[validate(length(min = 1, message = "Field cannot be empty"))]
    pub department: String,
    #[validate(length(min = 1, message = "Field cannot be empty"))]
    pub job_role: String,
    pub dob: Option<String>,
    pub father_name: Option<String>,
    pub permanent_address: Option<String>,
    pub expected_salary: Option<String>,
    pub interview_date: Option<String>,
    pub joining_date: Option<String>,
    pub employment_type: Option<String>,
    pub branch_location: Option<String>,
    pub ssc_year: Option<String>,
    pub ssc_percentage: Option<String>,
    pub intermediate_year: Option<String>,
    pub intermediate_percentage: Option<String>,
    pub college_name: Option<String>,
    pub register_number: Option<String>,
    pub graduation_year: Option<String>,
    pub graduation_percentage: Option<String>,
    pub experience_status: Option<String>,
}

impl ApplicationSubmission {
    /// Builds the submission from raw form fields. Empty values count as absent;
    /// unknown keys are ignored. Fails with every missing required field.
    pub fn from_fields(fields: HashMap<String, String>) -> Result<Self> {
        let map: Map<String, Value> = fields
            .into_iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| (k, Value::String(v)))
            .collect();
        let submission: ApplicationSubmission = serde_json::from_value(Value::Object(map))
            .map_err(|e| ApiError::Validation(e.to_string()))?;

        if let Err(errors) = submission.validate() {
            let field_errors = errors.field_errors();
            let missing = REQUIRED_FIELDS
                .iter()
                .filter(|f| field_errors.contains_key(**f))
                .map(|f| f.to_string())
                .collect();
            return Err(ApiError::MissingFields(missing));
        }
        Ok(submission)
    }

    fn into_new_application(self, reference_id: String, docs: DocumentPaths) -> NewApplication {
        NewApplication {
            reference_id,
            full_name: self.full_name,
            email: self.email,
            mobile_number: self.mobile_number,
            department: self.department,
            job_role: self.job_role,
            dob: self.dob,
            father_name: self.father_name,
            permanent_address: self.permanent_address,
            expected_salary: self.expected_salary,
            interview_date: self.interview_date,
            joining_date: self.joining_date,
            employment_type: self.employment_type,
            branch_location: self.branch_location,
            ssc_year: self.ssc_year,
            ssc_percentage: self.ssc_percentage,
            intermediate_year: self.intermediate_year,
            intermediate_percentage: self.intermediate_percentage,
            college_name: self.college_name,
            register_number: self.register_number,
            graduation_year: self.graduation_year,
            graduation_percentage: self.graduation_percentage,
            experience_status: self
                .experience_status
                .unwrap_or_else(|| DEFAULT_EXPERIENCE_STATUS.to_string()),
            ssc_doc: docs.ssc_doc,
            intermediate_doc: docs.intermediate_doc,
            graduation_doc: docs.graduation_doc,
        }
    }
}

#[derive(Debug, Default)]
struct DocumentPaths {
    ssc_doc: Option<String>,
    intermediate_doc: Option<String>,
    graduation_doc: Option<String>,
}

impl DocumentPaths {
    fn assign(&mut self, field: &str, path: String) {
        match field {
            "sscDoc" => self.ssc_doc = Some(path),
            "intermediateDoc" => self.intermediate_doc = Some(path),
            "graduationDoc" => self.graduation_doc = Some(path),
            other => tracing::warn!("ignoring document for unknown field {}", other),
        }
    }
}

/// `REF` + epoch millis + a number in 0..1000.
pub fn generate_reference_id() -> String {
    let suffix: u32 = rand::rng().random_range(0..1000);
    format!("REF{}{}", Utc::now().timestamp_millis(), suffix)
}

/// Stores the documents, then writes the row. If any write fails, files already
/// stored for this submission are removed again. A reference id that is already
/// taken is regenerated a few times before giving up.
pub async fn submit_application(
    store: &dyn ApplicationStore,
    uploads: &UploadStore,
    submission: ApplicationSubmission,
    documents: Vec<UploadedFile>,
) -> Result<ApplicationEntry> {
    let mut written = Vec::with_capacity(documents.len());
    let mut docs = DocumentPaths::default();
    for file in &documents {
        match uploads.store(file).await {
            Ok(path) => {
                written.push(path.clone());
                docs.assign(&file.field, path);
            }
            Err(e) => {
                uploads.discard(&written).await;
                return Err(e);
            }
        }
    }

    let mut application = submission.into_new_application(generate_reference_id(), docs);
    let mut attempts = 1;
    let inserted = loop {
        match store.insert(application.clone()).await {
            Err(ApiError::DuplicateReference(taken)) if attempts < MAX_REFERENCE_ATTEMPTS => {
                tracing::warn!("reference id {} already taken, regenerating", taken);
                attempts += 1;
                application.reference_id = generate_reference_id();
            }
            other => break other,
        }
    };

    match inserted {
        Ok(entry) => {
            tracing::info!(
                "application {} received for {} / {}",
                &entry.reference_id,
                &entry.department,
                &entry.job_role
            );
            Ok(entry)
        }
        Err(e) => {
            uploads.discard(&written).await;
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn reports_every_missing_field_in_declared_order() {
        let err = ApplicationSubmission::from_fields(fields(&[
            ("email", "a@b.c"),
            ("department", ""),
        ]))
        .unwrap_err();
        match err {
            ApiError::MissingFields(missing) => assert_eq!(
                missing,
                vec!["full_name", "mobile_number", "department", "job_role"]
            ),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn empty_optionals_become_none_and_experience_defaults() {
        let submission = ApplicationSubmission::from_fields(fields(&[
            ("full_name", "Asha Rao"),
            ("email", "asha@example.com"),
            ("mobile_number", "9000000000"),
            ("department", "Engineering"),
            ("job_role", "Backend Developer"),
            ("dob", ""),
            ("college_name", "JNTU"),
            ("unrelated", "ignored"),
        ]))
        .unwrap();
        assert!(submission.dob.is_none());
        assert_eq!(submission.college_name.as_deref(), Some("JNTU"));

        let row = submission.into_new_application("REF1".into(), DocumentPaths::default());
        assert_eq!(row.experience_status, "No");
        assert!(row.ssc_doc.is_none());
    }

    #[test]
    fn reference_ids_follow_the_ref_pattern() {
        let id = generate_reference_id();
        let digits = id.strip_prefix("REF").unwrap();
        assert!(digits.chars().all(|c| c.is_ascii_digit()));
        // 13 digit millis plus a 1-3 digit suffix
        assert!((14..=16).contains(&digits.len()), "{}", id);
    }
}
