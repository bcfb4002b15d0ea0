//! HTTP surface

pub mod handler;
pub mod rate_limit;
pub mod server;

pub use handler::AppState;
pub use rate_limit::{RateDecision, RateLimiter};
pub use server::HttpServer;
