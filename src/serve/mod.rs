//! Request resolution and negotiation
//!
//! The pipeline behind the HTTP surface:
//!
//! 1. [`PathResolver`] maps an extensionless path onto a file or a folder
//! 2. [`detect_source_type`] names the file's serialization
//! 3. [`ContainerListing`] describes a folder's children
//! 4. [`negotiate_destination`] picks the output type
//! 5. [`invoke`] runs the conversion through a [`Transformer`]
//! 6. [`map_outcome`] turns the result into a status and body

pub mod container;
pub mod detect;
pub mod error;
pub mod fs;
pub mod negotiate;
pub mod pipeline;
pub mod resolver;
pub mod response;
pub mod transform;

pub use container::{ContainedMember, ContainerListing, LDP_CONTAINS};
pub use detect::detect_source_type;
pub use error::{ServeError, ServeResult};
pub use fs::{DirEntry, FileSystem, LocalFileSystem};
pub use negotiate::{negotiate_destination, AcceptNegotiator, MediaTypeNegotiator, Negotiation};
pub use pipeline::{Pipeline, ResolvedResource, ResourceRequest};
pub use resolver::{Location, PathResolver};
pub use response::{map_outcome, HttpOutcome, OutcomeBody};
pub use transform::{invoke, ByteStream, SourceDescriptor, SourceReader, TransformJob, Transformer};
