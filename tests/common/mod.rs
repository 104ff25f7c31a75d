//! Shared helpers for driving the HTTP surface in-process.
//!
//! `TestApp` wires the real router to a `MemoryStore` and a temporary upload
//! root; `MultipartBuilder` assembles form bodies by hand.

#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use intake::{
    conf::Settings,
    pkg::{
        internal::store::MemoryStore,
        server::{router::build_routes, state::AppState},
    },
};

pub const BOUNDARY: &str = "----intake-test-boundary";
pub const PDF: &[u8] = b"%PDF-1.4\n1 0 obj << /Type /Catalog >> endobj\n%%EOF";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub uploads: TempDir,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
    pub raw: Vec<u8>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(mut settings: Settings) -> Self {
        let uploads = tempfile::tempdir().expect("temp upload root");
        settings.uploads_dir = uploads.path().to_path_buf();
        let store = Arc::new(MemoryStore::new());
        let state = AppState::with_store(settings, store.clone());
        TestApp {
            router: build_routes(state),
            store,
            uploads,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let headers = response.headers().clone();
        let raw = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body")
            .to_vec();
        let body = serde_json::from_slice(&raw).unwrap_or(Value::Null);
        TestResponse {
            status,
            headers,
            body,
            raw,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn post_form(&self, uri: &str, form: MultipartBuilder) -> TestResponse {
        self.send(form.request(uri)).await
    }

    pub async fn patch_json(&self, uri: &str, body: Value) -> TestResponse {
        self.send(
            Request::builder()
                .method(Method::PATCH)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    /// Submits a complete application and returns the new row id.
    pub async fn submit_valid(&self) -> i64 {
        let res = self
            .post_form("/api/applications", MultipartBuilder::applicant())
            .await;
        assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);
        let list = self.get("/api/applications").await;
        list.body["data"][0]["id"].as_i64().expect("row id")
    }

    pub fn stored_files(&self) -> Vec<PathBuf> {
        files_in(self.uploads.path())
    }
}

pub fn files_in(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.is_file())
                .collect()
        })
        .unwrap_or_default()
}

#[derive(Default)]
pub struct MultipartBuilder {
    body: Vec<u8>,
}

impl MultipartBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// All five required fields filled in.
    pub fn applicant() -> Self {
        Self::new()
            .text("full_name", "Asha Rao")
            .text("email", "asha@example.com")
            .text("mobile_number", "9000000000")
            .text("department", "Engineering")
            .text("job_role", "Backend Developer")
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                BOUNDARY, name, file_name, content_type
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn pdf(self, name: &str) -> Self {
        self.file(name, "document.pdf", "application/pdf", PDF)
    }

    pub fn request(mut self, uri: &str) -> Request<Body> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(self.body))
            .unwrap()
    }
}
