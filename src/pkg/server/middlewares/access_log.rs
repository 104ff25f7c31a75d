use std::time::{Duration, Instant};

use axum::{extract::Request, middleware::Next, response::Response};

pub async fn access_log(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;
    let elapsed = start.elapsed();

    if elapsed > Duration::from_secs(1) {
        tracing::warn!("slow request: {} {} took {:?}", method, uri, elapsed);
    }
    tracing::info!(
        "{} {} {} {:.3} ms",
        method,
        uri,
        response.status().as_u16(),
        elapsed.as_secs_f64() * 1000.0
    );
    response
}
