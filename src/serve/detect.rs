//! Source type detection

use super::error::{ServeError, ServeResult};
use super::transform::Transformer;
use std::path::Path;

/// Serialization of a resolved file. Unrecognized extensions are an error,
/// never an empty content type.
pub fn detect_source_type(transformer: &dyn Transformer, path: &Path) -> ServeResult<String> {
    match transformer.source_content_type(path) {
        Some(content_type) if !content_type.is_empty() => Ok(content_type),
        _ => Err(ServeError::UnsupportedSource {
            path: path.to_path_buf(),
        }),
    }
}
