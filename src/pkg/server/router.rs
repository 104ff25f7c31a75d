use axum::{
    extract::DefaultBodyLimit,
    handler::HandlerWithoutStateExt,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, patch, post},
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, services::ServeDir};

use super::handlers::{applications, probes};
use super::middlewares::{
    access_log::access_log,
    cors::cors,
    errors::{error_details, handle_panic},
    ratelimit::rate_limit,
    security::security_headers,
};
use super::state::AppState;
use crate::pkg::internal::uploads::{MAX_FILE_BYTES, PUBLIC_PREFIX};

/// Default cap, sized for the JSON endpoints.
pub const JSON_BODY_LIMIT: usize = 10 * 1024;
/// Three documents at the per-file cap plus room for the text fields.
pub const MULTIPART_BODY_LIMIT: usize = 3 * MAX_FILE_BYTES + 1024 * 1024;

pub fn build_routes(state: AppState) -> Router {
    // missing files get the same 404 body as unknown routes
    let uploads =
        ServeDir::new(state.uploads.root()).not_found_service(probes::not_found.into_service());
    let multipart_limit = DefaultBodyLimit::max(MULTIPART_BODY_LIMIT);

    // layers run outermost-last: security headers first, panics caught innermost
    Router::new()
        .route("/health", get(probes::health))
        .route("/healthz", get(probes::healthz))
        .route("/livez", get(probes::livez))
        .route(
            "/api/applications",
            get(applications::list).post(applications::submit).layer(multipart_limit),
        )
        .route(
            "/api/applications/{id}/status",
            patch(applications::update_status),
        )
        .route(
            "/api/applications/{id}/offer-letter",
            post(applications::upload_offer_letter).layer(multipart_limit),
        )
        .nest_service(PUBLIC_PREFIX, uploads)
        .fallback(probes::not_found)
        .method_not_allowed_fallback(probes::not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(from_fn_with_state(state.clone(), cors))
        .layer(from_fn_with_state(state.clone(), error_details))
        .layer(from_fn(access_log))
        .layer(from_fn_with_state(state.clone(), rate_limit))
        .layer(DefaultBodyLimit::max(JSON_BODY_LIMIT))
        .layer(from_fn(security_headers))
        .with_state(state)
}
