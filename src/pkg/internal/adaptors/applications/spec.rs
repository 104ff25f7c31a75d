use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "application_status")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 3] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Approved,
        ApplicationStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Pending",
            ApplicationStatus::Approved => "Approved",
            ApplicationStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exact, case-sensitive match on the three stored values.
impl FromStr for ApplicationStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationEntry {
    pub id: i32,
    pub reference_id: String,
    pub full_name: String,
    pub email: String,
    pub mobile_number: String,
    pub department: String,
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
    pub experience_status: String,
    pub ssc_doc: Option<String>,
    pub intermediate_doc: Option<String>,
    pub graduation_doc: Option<String>,
    pub offer_letter: Option<String>,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
}

/// Column values for a new row. `status` and `created_at` are left to the store.
#[derive(Debug, Clone, Default)]
pub struct NewApplication {
    pub reference_id: String,
    pub full_name: String,
    pub email: String,
    pub mobile_number: String,
    pub department: String,
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
    pub experience_status: String,
    pub ssc_doc: Option<String>,
    pub intermediate_doc: Option<String>,
    pub graduation_doc: Option<String>,
}

impl NewApplication {
    /// Row as persisted before the store assigns `id` and `created_at`.
    pub fn into_entry(self, id: i32, created_at: DateTime<Utc>) -> ApplicationEntry {
        ApplicationEntry {
            id,
            reference_id: self.reference_id,
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
            experience_status: self.experience_status,
            ssc_doc: self.ssc_doc,
            intermediate_doc: self.intermediate_doc,
            graduation_doc: self.graduation_doc,
            offer_letter: None,
            status: ApplicationStatus::Pending,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parsing_is_exact() {
        assert_eq!("Approved".parse(), Ok(ApplicationStatus::Approved));
        assert!("approved".parse::<ApplicationStatus>().is_err());
        assert!("Archived".parse::<ApplicationStatus>().is_err());
        assert!("".parse::<ApplicationStatus>().is_err());
    }

    #[test]
    fn status_serializes_as_stored_value() {
        let v = serde_json::to_value(ApplicationStatus::Rejected).unwrap();
        assert_eq!(v, serde_json::json!("Rejected"));
    }
}
