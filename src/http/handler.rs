//! HTTP handlers for content-negotiated RDF documents

use crate::serve::{HttpOutcome, OutcomeBody, Pipeline, ResourceRequest};
use axum::{
    body::Body,
    extract::{OriginalUri, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::error;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    /// `host:port` used for the base IRI when a request has no Host header
    pub authority: String,
}

/// Handler for every GET: resolve, negotiate and stream the converted document
pub async fn negotiate_handler(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
) -> Response {
    let accept = header_str(&headers, header::ACCEPT).unwrap_or_default();
    let scheme = header_str(&headers, "x-forwarded-proto")
        .and_then(|proto| proto.split(',').next())
        .map(str::trim)
        .filter(|proto| !proto.is_empty())
        .unwrap_or("http");
    let host = header_str(&headers, header::HOST).unwrap_or(&state.authority);
    let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");

    let request = ResourceRequest::new(uri.path(), accept, format!("{}://{}{}", scheme, host, path_and_query));
    into_response(state.pipeline.handle(request).await)
}

fn header_str<K: header::AsHeaderName>(headers: &HeaderMap, key: K) -> Option<&str> {
    headers.get(key).and_then(|value| value.to_str().ok())
}

/// Convert a pipeline outcome into an axum response
pub fn into_response(outcome: HttpOutcome) -> Response {
    let status = StatusCode::from_u16(outcome.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = match outcome.body {
        OutcomeBody::Text(text) => Body::from(text),
        OutcomeBody::Stream(stream) => Body::from_stream(stream),
    };

    let mut builder = Response::builder().status(status);
    if let Some(content_type) = outcome.content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }

    match builder.body(body) {
        Ok(response) => response,
        Err(e) => {
            error!("Failed to build response: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
