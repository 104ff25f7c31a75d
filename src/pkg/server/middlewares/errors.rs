use std::any::Any;

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::{error::ErrorDetail, pkg::server::state::AppState};

const MAX_ERROR_BODY: usize = 64 * 1024;

/// In development mode, copies the underlying failure of a 5xx response into
/// its JSON body as `details`.
pub async fn error_details(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    if !state.settings.is_development() {
        return response;
    }
    let Some(ErrorDetail(detail)) = response.extensions().get::<ErrorDetail>().cloned() else {
        return response;
    };

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, MAX_ERROR_BODY).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!("could not buffer error body: {}", e);
            return Response::from_parts(parts, Body::empty());
        }
    };
    let body = match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(mut obj)) => {
            obj.insert("details".into(), Value::String(detail));
            parts.headers.remove(header::CONTENT_LENGTH);
            Body::from(Value::Object(obj).to_string())
        }
        _ => Body::from(bytes),
    };
    Response::from_parts(parts, body)
}

/// Last line of defence: a panicking handler still yields the uniform 500 body.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!("handler panicked: {}", &detail);

    let mut response = (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "success": false, "error": "Internal server error" })),
    )
        .into_response();
    response.extensions_mut().insert(ErrorDetail(detail));
    response
}
