//! HTTP server for content-negotiated RDF documents

use super::handler::{negotiate_handler, AppState};
use super::rate_limit::{rate_limit, RateLimiter};
use crate::config::ServerConfig;
use crate::serve::Pipeline;
use axum::{middleware, routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// HTTP server routing every GET through the pipeline
pub struct HttpServer {
    config: ServerConfig,
    pipeline: Arc<Pipeline>,
    limiter: Arc<RateLimiter>,
}

impl HttpServer {
    /// Create a new HTTP server
    pub fn new(config: ServerConfig, pipeline: Pipeline) -> Self {
        let limiter = Arc::new(RateLimiter::new(&config.rate_limit));
        Self {
            config,
            pipeline: Arc::new(pipeline),
            limiter,
        }
    }

    /// Router with rate limiting, CORS and request tracing
    pub fn router(&self) -> Router {
        self.router_for(self.authority())
    }

    /// Router whose base IRIs fall back to `authority` when a request has no Host header
    fn router_for(&self, authority: String) -> Router {
        let state = AppState {
            pipeline: Arc::clone(&self.pipeline),
            authority,
        };

        Router::new()
            .route("/", get(negotiate_handler))
            .route("/*path", get(negotiate_handler))
            .with_state(state)
            .layer(middleware::from_fn_with_state(Arc::clone(&self.limiter), rate_limit))
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
    }

    fn authority(&self) -> String {
        match self.config.port {
            Some(port) => format!("{}:{}", self.config.address, port),
            None => self.config.address.clone(),
        }
    }

    /// Bind the configured address. Without a port, the OS picks a free one.
    pub async fn listen(&self) -> std::io::Result<TcpListener> {
        let port = self.config.port.unwrap_or(0);
        TcpListener::bind((self.config.address.as_str(), port)).await
    }

    /// Serve on an already bound listener until the process stops
    pub async fn serve(&self, listener: TcpListener) -> std::io::Result<()> {
        let router = match listener.local_addr() {
            Ok(addr) => self.router_for(addr.to_string()),
            Err(_) => self.router(),
        };
        axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>()).await
    }

    pub fn containment(&self) -> bool {
        self.pipeline.containment()
    }
}
