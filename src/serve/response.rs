//! Response mapping
//!
//! Turns the pipeline's result into a status, an optional content type and
//! a body, independent of the HTTP framework.

use super::error::ServeError;
use super::transform::ByteStream;
use std::fmt;

/// Body of an outcome
pub enum OutcomeBody {
    /// Fixed text
    Text(String),
    /// Converted document, produced while it is sent
    Stream(ByteStream),
}

impl fmt::Debug for OutcomeBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutcomeBody::Text(text) => f.debug_tuple("Text").field(text).finish(),
            OutcomeBody::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

/// What gets sent back for one request
#[derive(Debug)]
pub struct HttpOutcome {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: OutcomeBody,
}

impl HttpOutcome {
    /// A successful conversion
    pub fn converted(content_type: impl Into<String>, body: ByteStream) -> Self {
        Self {
            status: 200,
            content_type: Some(content_type.into()),
            body: OutcomeBody::Stream(body),
        }
    }

    /// Text body, if this outcome is not streamed
    pub fn text(&self) -> Option<&str> {
        match &self.body {
            OutcomeBody::Text(text) => Some(text),
            OutcomeBody::Stream(_) => None,
        }
    }
}

/// Map a pipeline result onto an outcome
pub fn map_outcome(result: Result<(String, ByteStream), ServeError>) -> HttpOutcome {
    match result {
        Ok((content_type, body)) => HttpOutcome::converted(content_type, body),
        Err(err) => {
            // Only conversion failures are typed and newline-terminated
            let (content_type, body) = match &err {
                ServeError::Transform(_) => (Some("text/plain".to_string()), format!("{}\n", err)),
                _ => (None, err.to_string()),
            };
            HttpOutcome {
                status: err.status(),
                content_type,
                body: OutcomeBody::Text(body),
            }
        }
    }
}
