//! Transform invoker
//!
//! Hands a source byte stream to the conversion engine and primes the output
//! so that failures in the first chunk surface before any response headers
//! are committed.

use crate::rdf::ConvertError;
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, BoxStream, StreamExt};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Blocking reader over the source document
pub type SourceReader = Box<dyn Read + Send>;

/// Converted output, produced lazily
pub type ByteStream = BoxStream<'static, Result<Bytes, ConvertError>>;

/// Where the source bytes come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceDescriptor {
    /// A file under the base directory
    Path(PathBuf),
    /// Generated in memory (container listings)
    Synthetic,
}

/// Everything the engine needs to convert one document
#[derive(Debug, Clone)]
pub struct TransformJob {
    pub source: SourceDescriptor,
    pub source_content_type: String,
    pub destination_content_type: String,
    pub base_iri: String,
}

/// Conversion engine consumed by the pipeline
#[async_trait]
pub trait Transformer: Send + Sync {
    /// Serialization of a file, from its path. `None` when unrecognized.
    fn source_content_type(&self, path: &Path) -> Option<String>;

    /// Content types `source_content_type` can be converted to, in preference order
    async fn allowed_destinations(&self, source_content_type: &str) -> Vec<String>;

    /// Start converting `input`. Errors may arrive on the stream at any point.
    fn convert(&self, input: SourceReader, job: TransformJob) -> ByteStream;
}

/// Run a conversion and wait for its first chunk.
///
/// An error before the first chunk is returned directly; later errors stay on
/// the stream and truncate the response body.
pub async fn invoke(
    transformer: &dyn Transformer,
    input: SourceReader,
    job: TransformJob,
) -> Result<ByteStream, ConvertError> {
    let mut output = transformer.convert(input, job);

    match output.next().await {
        None => Ok(stream::empty().boxed()),
        Some(Err(e)) => Err(e),
        Some(Ok(first)) => Ok(stream::once(async move { Ok(first) }).chain(output).boxed()),
    }
}
