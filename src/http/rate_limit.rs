//! Fixed-window rate limiting per client IP

use crate::config::RateLimitConfig;
use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::warn;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Decision for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed,
    /// Over the cap; retry once the window ends
    Limited { retry_after: Duration },
}

/// Request counters per client, reset at the end of each window
pub struct RateLimiter {
    window: Duration,
    max_requests: u32,
    windows: Mutex<HashMap<IpAddr, Window>>,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            window: Duration::from_secs(config.window_secs),
            max_requests: config.max_requests,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Count a request from `ip`
    pub fn check(&self, ip: IpAddr) -> RateDecision {
        self.check_at(ip, Instant::now())
    }

    fn check_at(&self, ip: IpAddr, now: Instant) -> RateDecision {
        let mut windows = match self.windows.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        // Forget clients whose window has ended
        let length = self.window;
        windows.retain(|_, w| now.duration_since(w.started) < length);

        let window = windows.entry(ip).or_insert(Window { started: now, count: 0 });
        if window.count >= self.max_requests {
            let elapsed = now.duration_since(window.started);
            return RateDecision::Limited {
                retry_after: self.window.saturating_sub(elapsed),
            };
        }
        window.count += 1;
        RateDecision::Allowed
    }
}

/// Middleware rejecting clients over their request cap with 429
pub async fn rate_limit(State(limiter): State<Arc<RateLimiter>>, request: Request, next: Next) -> Response {
    // Requests injected without a socket (tests) share one bucket
    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    match limiter.check(ip) {
        RateDecision::Allowed => next.run(request).await,
        RateDecision::Limited { retry_after } => {
            warn!("Rate limit exceeded for {}", ip);
            let seconds = retry_after.as_secs().max(1);
            (
                StatusCode::TOO_MANY_REQUESTS,
                [(header::RETRY_AFTER, seconds.to_string())],
                "Too many requests, please try again later.\n",
            )
                .into_response()
        }
    }
}
