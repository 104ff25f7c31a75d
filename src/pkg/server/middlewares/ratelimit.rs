use std::{
    collections::HashMap,
    net::SocketAddr,
    time::{Duration, Instant},
};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use tokio::sync::Mutex;

use crate::{
    pkg::server::state::AppState,
    prelude::{ApiError, Result},
};

const PRUNE_THRESHOLD: usize = 10_000;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    hits: u32,
}

/// Fixed-window request counter keyed by client identity.
pub struct RateLimiter {
    max: u32,
    window: Duration,
    clients: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new(max: u32, window: Duration) -> Self {
        RateLimiter {
            max,
            window,
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Counts one request; `Err` carries the time until the window resets.
    pub async fn hit(&self, key: &str) -> std::result::Result<(), Duration> {
        let now = Instant::now();
        let mut clients = self.clients.lock().await;
        if clients.len() > PRUNE_THRESHOLD {
            let window = self.window;
            clients.retain(|_, w| now.duration_since(w.started) < window);
        }
        let entry = clients.entry(key.to_string()).or_insert(Window {
            started: now,
            hits: 0,
        });
        if now.duration_since(entry.started) >= self.window {
            *entry = Window {
                started: now,
                hits: 0,
            };
        }
        if entry.hits >= self.max {
            return Err(self.window.saturating_sub(now.duration_since(entry.started)));
        }
        entry.hits += 1;
        Ok(())
    }
}

/// Client identity is the peer IP; forwarded headers are not trusted.
fn client_key(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

pub async fn rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response> {
    let key = client_key(&request);
    if let Err(retry_after) = state.limiter.hit(&key).await {
        tracing::warn!("rate limit exceeded for {}", &key);
        return Err(ApiError::TooManyRequests { retry_after });
    }
    Ok(next.run(request).await)
}
