use axum::{
    extract::{
        multipart::MultipartRejection, rejection::JsonRejection, Multipart, Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    pkg::{
        internal::{
            adaptors::applications::spec::ApplicationEntry,
            intake::{self, ApplicationSubmission},
            management,
        },
        server::{
            forms::{read_form, DOCUMENT_FIELDS, OFFER_LETTER_FIELD},
            state::AppState,
        },
    },
    prelude::{ApiError, Result, ResultExt},
};

#[derive(Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateStatusInput {
    pub status: Option<String>,
}

#[derive(Serialize)]
pub struct ApplicationList {
    pub success: bool,
    pub count: usize,
    pub data: Vec<ApplicationEntry>,
}

#[derive(Serialize)]
pub struct StatusUpdated {
    pub success: bool,
    pub message: &'static str,
    pub data: ApplicationEntry,
}

pub async fn submit(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<Value>)> {
    let multipart = multipart.map_err(|e| ApiError::Upload(e.body_text()))?;
    let form = read_form(multipart, &DOCUMENT_FIELDS).await?;
    let submission = ApplicationSubmission::from_fields(form.fields)?;

    let entry = intake::submit_application(&*state.store, &state.uploads, submission, form.files)
        .await
        .context("Internal server error")?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Application submitted successfully",
            "reference_id": entry.reference_id,
        })),
    ))
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApplicationList>> {
    let data = management::list_applications(&*state.store, query.status.as_deref())
        .await
        .context("Failed to fetch applications")?;
    Ok(Json(ApplicationList {
        success: true,
        count: data.len(),
        data,
    }))
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<UpdateStatusInput>, JsonRejection>,
) -> Result<Json<StatusUpdated>> {
    let status = match payload {
        Ok(Json(input)) => input.status,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            return Err(ApiError::PayloadTooLarge);
        }
        Err(rejection) => {
            tracing::debug!("unreadable status payload: {}", rejection.body_text());
            None
        }
    };
    // status is checked before the id so a bad value is always a 400
    let status = management::parse_status(status.as_deref())?;
    let data = management::update_status(&*state.store, &id, status)
        .await
        .context("Failed to update status")?;
    Ok(Json(StatusUpdated {
        success: true,
        message: "Status updated successfully",
        data,
    }))
}

pub async fn upload_offer_letter(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>> {
    // a body that is not multipart simply carries no file
    let file = match multipart {
        Ok(multipart) => read_form(multipart, &[OFFER_LETTER_FIELD])
            .await?
            .take_file(OFFER_LETTER_FIELD),
        Err(_) => None,
    };
    let file_path = management::attach_offer_letter(&*state.store, &state.uploads, &id, file)
        .await
        .context("Failed to upload offer letter")?;
    Ok(Json(json!({
        "success": true,
        "message": "Offer letter uploaded successfully",
        "filePath": file_path,
    })))
}
