//! Multipart bodies read into typed values before any business logic runs.
//!
//! Every file part is checked (expected field, one per field, PDF only, size cap)
//! and buffered in memory. Nothing touches the content store here, so a request
//! that fails validation leaves no file behind.

use std::collections::HashMap;

use axum::extract::{multipart::Field, Multipart};

use crate::pkg::internal::uploads::{UploadedFile, MAX_FILE_BYTES, PDF_MIME};
use crate::prelude::{ApiError, Result};

pub const DOCUMENT_FIELDS: [&str; 3] = ["sscDoc", "intermediateDoc", "graduationDoc"];
pub const OFFER_LETTER_FIELD: &str = "offerLetter";

#[derive(Debug, Default)]
pub struct MultipartForm {
    pub fields: HashMap<String, String>,
    pub files: Vec<UploadedFile>,
}

impl MultipartForm {
    pub fn take_file(&mut self, field: &str) -> Option<UploadedFile> {
        let idx = self.files.iter().position(|f| f.field == field)?;
        Some(self.files.remove(idx))
    }
}

/// Reads the whole body. `file_fields` lists the only names allowed to carry
/// files, each at most once.
pub async fn read_form(mut multipart: Multipart, file_fields: &[&str]) -> Result<MultipartForm> {
    let mut form = MultipartForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Upload(e.body_text()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                if let Some(file) = read_file(field, &name, file_name, &form, file_fields).await? {
                    form.files.push(file);
                }
            }
            None => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::Upload(e.body_text()))?;
                form.fields.entry(name).or_insert(value);
            }
        }
    }
    Ok(form)
}

async fn read_file(
    mut field: Field<'_>,
    name: &str,
    file_name: String,
    form: &MultipartForm,
    file_fields: &[&str],
) -> Result<Option<UploadedFile>> {
    let content_type = field.content_type().unwrap_or("").to_string();
    // an empty <input type="file"> still sends a part with no filename
    if file_name.is_empty() {
        while field
            .chunk()
            .await
            .map_err(|e| ApiError::Upload(e.body_text()))?
            .is_some()
        {}
        return Ok(None);
    }
    if !file_fields.contains(&name) || form.files.iter().any(|f| f.field == name) {
        return Err(ApiError::Upload("Unexpected field".into()));
    }
    if content_type != PDF_MIME {
        return Err(ApiError::Upload("Only PDF files are allowed".into()));
    }

    let mut data = Vec::new();
    while let Some(chunk) = field.chunk().await.map_err(|e| {
        if e.status() == axum::http::StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::Upload("File too large".into())
        } else {
            ApiError::Upload(e.body_text())
        }
    })? {
        if data.len() + chunk.len() > MAX_FILE_BYTES {
            return Err(ApiError::Upload("File too large".into()));
        }
        data.extend_from_slice(&chunk);
    }

    Ok(Some(UploadedFile {
        field: name.to_string(),
        file_name,
        content_type,
        data: data.into(),
    }))
}
