use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use axum::{
    extract::Request,
    http::{header::RETRY_AFTER, HeaderName, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use once_cell::sync::Lazy;
use serde_json::json;

const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(60);
const RATE_LIMIT_MAX_REQUESTS: u32 = 10;

struct WindowEntry {
    count: u32,
    reset_at: Instant,
}

/// Fixed-window request counter keyed by client address. Best-effort and
/// per-process only: state is not shared across instances and resets on
/// restart.
pub struct RateLimiter {
    window: Duration,
    max_requests: u32,
    entries: HashMap<String, WindowEntry>,
}

impl RateLimiter {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            window,
            max_requests,
            entries: HashMap::new(),
        }
    }

    pub fn check(&mut self, key: &str, now: Instant) -> bool {
        match self.entries.get_mut(key) {
            Some(entry) if now < entry.reset_at => {
                if entry.count >= self.max_requests {
                    return false;
                }
                entry.count += 1;
                true
            }
            _ => {
                // New key or expired window. No background sweeper runs,
                // so stale entries are evicted here.
                self.entries.retain(|_, entry| now < entry.reset_at);
                self.entries.insert(
                    key.to_string(),
                    WindowEntry {
                        count: 1,
                        reset_at: now + self.window,
                    },
                );
                true
            }
        }
    }
}

static RATE_LIMITS: Lazy<Mutex<RateLimiter>> =
    Lazy::new(|| Mutex::new(RateLimiter::new(RATE_LIMIT_WINDOW, RATE_LIMIT_MAX_REQUESTS)));

pub async fn rate_limit(req: Request, next: Next) -> Response {
    let key = client_key(&req);

    let allowed = RATE_LIMITS
        .lock()
        .map(|mut limiter| limiter.check(&key, Instant::now()))
        .unwrap_or(true);

    if !allowed {
        return too_many_requests();
    }

    next.run(req).await
}

fn client_key(req: &Request) -> String {
    req.headers()
        .get("x-forwarded-for")
        .or_else(|| req.headers().get("x-real-ip"))
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn too_many_requests() -> Response {
    let headers = [
        (RETRY_AFTER, RATE_LIMIT_WINDOW.as_secs().to_string()),
        (
            HeaderName::from_static("x-ratelimit-limit"),
            RATE_LIMIT_MAX_REQUESTS.to_string(),
        ),
    ];

    (
        StatusCode::TOO_MANY_REQUESTS,
        headers,
        Json(json!({ "error": "Too many requests. Please try again later." })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_up_to_the_limit_within_one_window() {
        let mut limiter = RateLimiter::new(Duration::from_secs(60), 3);
        let now = Instant::now();

        assert!(limiter.check("1.2.3.4", now));
        assert!(limiter.check("1.2.3.4", now));
        assert!(limiter.check("1.2.3.4", now));
        assert!(!limiter.check("1.2.3.4", now));
    }

    #[test]
    fn keys_are_counted_independently() {
        let mut limiter = RateLimiter::new(Duration::from_secs(60), 1);
        let now = Instant::now();

        assert!(limiter.check("1.2.3.4", now));
        assert!(!limiter.check("1.2.3.4", now));
        assert!(limiter.check("5.6.7.8", now));
    }

    #[test]
    fn window_expiry_resets_the_count() {
        let mut limiter = RateLimiter::new(Duration::from_secs(60), 1);
        let start = Instant::now();

        assert!(limiter.check("1.2.3.4", start));
        assert!(!limiter.check("1.2.3.4", start + Duration::from_secs(59)));
        assert!(limiter.check("1.2.3.4", start + Duration::from_secs(61)));
    }
}
