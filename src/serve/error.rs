//! Request failure taxonomy

use crate::rdf::ConvertError;
use std::path::PathBuf;
use thiserror::Error;

/// Terminal outcome of a failed request. The display text is the response body.
#[derive(Error, Debug)]
pub enum ServeError {
    /// Folder, file or container absent
    #[error("Not Found")]
    NotFound,

    /// File exists but its extension maps to no serialization
    #[error("Internal Server Error: Requested resource is not a recognised RDF serialization")]
    UnsupportedSource { path: PathBuf },

    /// No allowed destination satisfies the Accept header
    #[error("Not Acceptable")]
    NotAcceptable,

    /// The conversion engine failed
    #[error("Internal server error transforming internal resource [{0}]")]
    Transform(#[from] ConvertError),

    /// Resolution worker failed
    #[error("Internal Server Error")]
    Internal(String),
}

impl ServeError {
    /// HTTP status code for this failure
    pub fn status(&self) -> u16 {
        match self {
            ServeError::NotFound => 404,
            ServeError::NotAcceptable => 406,
            ServeError::UnsupportedSource { .. }
            | ServeError::Transform(_)
            | ServeError::Internal(_) => 500,
        }
    }
}

pub type ServeResult<T> = Result<T, ServeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ServeError::NotFound.status(), 404);
        assert_eq!(ServeError::NotAcceptable.status(), 406);
        assert_eq!(
            ServeError::UnsupportedSource { path: PathBuf::from("bad-file.txt") }.status(),
            500
        );
        assert_eq!(ServeError::Transform(ConvertError::Parse("x".to_string())).status(), 500);
    }

    #[test]
    fn test_bodies() {
        assert_eq!(ServeError::NotFound.to_string(), "Not Found");
        assert_eq!(ServeError::NotAcceptable.to_string(), "Not Acceptable");
        let transform = ServeError::Transform(ConvertError::Parse("unexpected end".to_string()));
        assert_eq!(
            transform.to_string(),
            "Internal server error transforming internal resource [Parse error: unexpected end]"
        );
    }
}
