use crate::pkg::internal::adaptors::applications::spec::{ApplicationEntry, ApplicationStatus};
use crate::pkg::internal::store::ApplicationStore;
use crate::pkg::internal::uploads::{public_path, UploadStore, UploadedFile};
use crate::prelude::{ApiError, Result};

/// An empty filter lists everything; a value outside the enum matches nothing.
pub async fn list_applications(
    store: &dyn ApplicationStore,
    status: Option<&str>,
) -> Result<Vec<ApplicationEntry>> {
    match status.filter(|s| !s.is_empty()) {
        None => store.list(None).await,
        Some(raw) => match raw.parse::<ApplicationStatus>() {
            Ok(status) => store.list(Some(status)).await,
            Err(()) => Ok(Vec::new()),
        },
    }
}

/// A missing or unknown status is a client error.
pub fn parse_status(raw: Option<&str>) -> Result<ApplicationStatus> {
    raw.and_then(|s| s.parse().ok())
        .ok_or_else(|| ApiError::Validation("Invalid status value".into()))
}

/// Ids that are not integers cannot match a row.
fn parse_id(raw: &str) -> Result<i32> {
    raw.parse().map_err(|_| ApiError::not_found())
}

/// Any transition between the three statuses is allowed.
pub async fn update_status(
    store: &dyn ApplicationStore,
    id: &str,
    status: ApplicationStatus,
) -> Result<ApplicationEntry> {
    let id = parse_id(id)?;
    let entry = store
        .update_status(id, status)
        .await?
        .ok_or_else(ApiError::not_found)?;
    tracing::info!("application {} moved to {}", entry.id, status);
    Ok(entry)
}

/// Stores the letter, then links it to the row. The file stays in the content
/// store even when no row matches.
pub async fn attach_offer_letter(
    store: &dyn ApplicationStore,
    uploads: &UploadStore,
    id: &str,
    file: Option<UploadedFile>,
) -> Result<String> {
    let file = file.ok_or_else(|| ApiError::Validation("No file uploaded".into()))?;
    let stored = uploads.store(&file).await?;
    let id = parse_id(id)?;
    store
        .set_offer_letter(id, &stored)
        .await?
        .ok_or_else(ApiError::not_found)?;
    tracing::info!("offer letter attached to application {}", id);
    Ok(public_path(&stored))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pkg::internal::adaptors::applications::spec::NewApplication;
    use crate::pkg::internal::store::MemoryStore;
    use axum::body::Bytes;

    async fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .insert(NewApplication {
                reference_id: "REF1".into(),
                full_name: "Ravi Kumar".into(),
                email: "ravi@example.com".into(),
                mobile_number: "9111111111".into(),
                department: "Finance".into(),
                job_role: "Analyst".into(),
                experience_status: "No".into(),
                ..NewApplication::default()
            })
            .await
            .unwrap();
        store
    }

    #[test]
    fn only_the_three_statuses_parse() {
        assert_eq!(
            parse_status(Some("Approved")).unwrap(),
            ApplicationStatus::Approved
        );
        for raw in [Some("Hired"), Some("approved"), Some(""), None] {
            let err = parse_status(raw).unwrap_err();
            assert!(matches!(err, ApiError::Validation(_)), "{:?}", err);
        }
    }

    #[tokio::test]
    async fn any_transition_is_allowed() {
        let store = seeded().await;
        let approved = update_status(&store, "1", ApplicationStatus::Approved).await.unwrap();
        assert_eq!(approved.status, ApplicationStatus::Approved);
        let back = update_status(&store, "1", ApplicationStatus::Pending).await.unwrap();
        assert_eq!(back.status, ApplicationStatus::Pending);
    }

    #[tokio::test]
    async fn unknown_or_malformed_ids_are_not_found() {
        let store = seeded().await;
        assert!(matches!(
            update_status(&store, "42", ApplicationStatus::Rejected).await,
            Err(ApiError::NotFound(_))
        ));
        assert!(matches!(
            update_status(&store, "abc", ApplicationStatus::Rejected).await,
            Err(ApiError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn listing_with_unknown_status_is_empty() {
        let store = seeded().await;
        assert!(list_applications(&store, Some("Archived")).await.unwrap().is_empty());
        assert_eq!(list_applications(&store, Some("")).await.unwrap().len(), 1);
        assert_eq!(
            list_applications(&store, Some("Pending")).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn offer_letter_requires_a_file() {
        let store = seeded().await;
        let dir = tempfile::tempdir().unwrap();
        let uploads = UploadStore::new(dir.path());
        let err = attach_offer_letter(&store, &uploads, "1", None).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn offer_letter_path_is_public() {
        let store = seeded().await;
        let dir = tempfile::tempdir().unwrap();
        let uploads = UploadStore::new(dir.path());
        let file = UploadedFile {
            field: "offerLetter".into(),
            file_name: "offer.pdf".into(),
            content_type: "application/pdf".into(),
            data: Bytes::from_static(b"%PDF"),
        };
        let path = attach_offer_letter(&store, &uploads, "1", Some(file))
            .await
            .unwrap();
        assert!(path.starts_with("/uploads/offerLetter-"));
        let rows = store.list(None).await.unwrap();
        assert!(rows[0].offer_letter.is_some());
    }
}
