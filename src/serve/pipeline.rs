//! Request pipeline
//!
//! Resolve, detect, negotiate, convert. The pipeline knows nothing about the
//! HTTP framework in front of it: it takes a [`ResourceRequest`] and returns an
//! [`HttpOutcome`].

use super::container::{ContainerListing, LISTING_CONTENT_TYPE};
use super::detect::detect_source_type;
use super::error::{ServeError, ServeResult};
use super::fs::{FileSystem, LocalFileSystem};
use super::negotiate::{negotiate_destination, AcceptNegotiator, MediaTypeNegotiator, Negotiation};
use super::resolver::{Location, PathResolver};
use super::response::{map_outcome, HttpOutcome};
use super::transform::{invoke, ByteStream, SourceDescriptor, SourceReader, TransformJob, Transformer};
use crate::rdf::ConvertError;
use std::io::{self, Cursor};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// One incoming request, reduced to what the pipeline reads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRequest {
    /// Request path, still percent-encoded
    pub url_path: String,
    /// Accept header, empty when absent
    pub accept: String,
    /// Absolute IRI of the request
    pub base_iri: String,
}

impl ResourceRequest {
    pub fn new(url_path: impl Into<String>, accept: impl Into<String>, base_iri: impl Into<String>) -> Self {
        Self {
            url_path: url_path.into(),
            accept: accept.into(),
            base_iri: base_iri.into(),
        }
    }
}

/// What a request path resolved to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedResource {
    File {
        file_path: PathBuf,
        source_content_type: String,
    },
    Container {
        listing: ContainerListing,
    },
    Missing,
}

impl ResolvedResource {
    /// Serialization of the resource, `None` when missing
    pub fn source_content_type(&self) -> Option<&str> {
        match self {
            ResolvedResource::File { source_content_type, .. } => Some(source_content_type),
            ResolvedResource::Container { .. } => Some(LISTING_CONTENT_TYPE),
            ResolvedResource::Missing => None,
        }
    }
}

/// The request pipeline
#[derive(Clone)]
pub struct Pipeline {
    resolver: PathResolver,
    transformer: Arc<dyn Transformer>,
    negotiator: Arc<dyn MediaTypeNegotiator>,
}

impl Pipeline {
    /// Pipeline over the local disk with standard Accept negotiation
    pub fn new(base_dir: impl Into<PathBuf>, containment: bool, transformer: Arc<dyn Transformer>) -> Self {
        Self {
            resolver: PathResolver::new(base_dir, containment, Arc::new(LocalFileSystem)),
            transformer,
            negotiator: Arc::new(AcceptNegotiator),
        }
    }

    /// Replace the filesystem
    pub fn with_file_system(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.resolver = PathResolver::new(self.resolver.base_dir().to_path_buf(), self.resolver.containment(), fs);
        self
    }

    /// Replace the negotiator
    pub fn with_negotiator(mut self, negotiator: Arc<dyn MediaTypeNegotiator>) -> Self {
        self.negotiator = negotiator;
        self
    }

    pub fn containment(&self) -> bool {
        self.resolver.containment()
    }

    /// Serve one request
    pub async fn handle(&self, request: ResourceRequest) -> HttpOutcome {
        let result = self.run(&request).await;
        match &result {
            Ok((content_type, _)) => debug!("GET {} -> 200 {}", request.url_path, content_type),
            Err(e) => debug!("GET {} -> {} ({})", request.url_path, e.status(), e),
        }
        map_outcome(result)
    }

    async fn run(&self, request: &ResourceRequest) -> ServeResult<(String, ByteStream)> {
        let resource = self.resolve(&request.url_path).await?;
        let source_content_type = match resource.source_content_type() {
            Some(content_type) => content_type.to_string(),
            None => return Err(ServeError::NotFound),
        };

        let allowed = self.transformer.allowed_destinations(&source_content_type).await;
        let destination =
            match negotiate_destination(self.negotiator.as_ref(), &source_content_type, &request.accept, &allowed) {
                Negotiation::Accepted(destination) => destination,
                Negotiation::Rejected => return Err(ServeError::NotAcceptable),
            };

        let (input, source) = self.open(resource).await?;
        let job = TransformJob {
            source,
            source_content_type,
            destination_content_type: destination.clone(),
            base_iri: request.base_iri.clone(),
        };

        let output = invoke(self.transformer.as_ref(), input, job).await?;
        Ok((destination, output))
    }

    /// Resolve a request path. Directory access runs on the blocking pool.
    pub async fn resolve(&self, url_path: &str) -> ServeResult<ResolvedResource> {
        let resolver = self.resolver.clone();
        let path = url_path.to_string();
        let location = tokio::task::spawn_blocking(move || resolver.locate(&path))
            .await
            .map_err(|e| ServeError::Internal(e.to_string()))?;

        match location {
            Location::Missing => Ok(ResolvedResource::Missing),
            Location::File(file_path) => {
                let source_content_type = detect_source_type(self.transformer.as_ref(), &file_path)?;
                Ok(ResolvedResource::File {
                    file_path,
                    source_content_type,
                })
            }
            Location::Container { entries, .. } => Ok(ResolvedResource::Container {
                listing: ContainerListing::from_entries(&entries),
            }),
        }
    }

    async fn open(&self, resource: ResolvedResource) -> ServeResult<(SourceReader, SourceDescriptor)> {
        match resource {
            ResolvedResource::File { file_path, .. } => {
                let fs = Arc::clone(self.resolver.file_system());
                let path = file_path.clone();
                let input = tokio::task::spawn_blocking(move || fs.open(&path))
                    .await
                    .map_err(|e| ServeError::Internal(e.to_string()))?
                    .map_err(|e| match e.kind() {
                        // Removed between listing and opening
                        io::ErrorKind::NotFound => ServeError::NotFound,
                        _ => ServeError::Transform(ConvertError::Io(e)),
                    })?;
                Ok((input, SourceDescriptor::Path(file_path)))
            }
            ResolvedResource::Container { listing } => {
                let input: SourceReader = Box::new(Cursor::new(listing.to_turtle().into_bytes()));
                Ok((input, SourceDescriptor::Synthetic))
            }
            ResolvedResource::Missing => Err(ServeError::NotFound),
        }
    }
}
