//! RDF Serve
//!
//! A content-negotiating file server for RDF documents. Files under a base
//! directory are addressed without their extension and converted on the fly
//! to whichever serialization the client's `Accept` header prefers.
//!
//! # Architecture
//!
//! - [`serve`]: the request pipeline (resolution, source type detection,
//!   containment listings, negotiation, transform invocation, response mapping)
//! - [`rdf`]: the conversion engine over `rio` parsers and formatters
//! - [`http`]: axum routing, per-IP rate limiting, request tracing
//! - [`config`]: YAML configuration
//!
//! # Serializations
//!
//! - ✅ Turtle, N-Triples, N-Quads, TriG
//! - ✅ RDF/XML
//! - ✅ JSON-LD (expanded form)
//! - ✅ N3 (Turtle-compatible subset, served as-is whenever acceptable)
//! - ✅ SHACL compact syntax (served as-is, never converted)
//!
//! ## Example Usage
//!
//! ```rust
//! use rdf_serve::serve::{ContainerListing, DirEntry};
//!
//! let listing = ContainerListing::from_entries(&[DirEntry::file("x.ttl"), DirEntry::dir("y")]);
//! assert_eq!(
//!     listing.to_turtle(),
//!     "<> <http://www.w3.org/ns/ldp#contains> <x>, <y/> .\n"
//! );
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod http;
pub mod rdf;
pub mod serve;

pub use config::{ConfigError, ConfigResult, RateLimitConfig, ServerConfig, TransformConfig};
pub use http::HttpServer;
pub use rdf::{ConvertError, FormatRegistry, RdfEngine, RdfFormat};
pub use serve::{HttpOutcome, Pipeline, ResourceRequest, ServeError};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
