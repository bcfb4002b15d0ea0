//! RDF conversion support
//!
//! This module implements the conversion engine the server hands documents to:
//! - a format registry mapping extensions and content types to serializations
//! - streaming readers and writers for Turtle, N-Triples, N-Quads, TriG,
//!   RDF/XML, JSON-LD (expanded form) and N3 (Turtle-compatible subset)
//! - [`RdfEngine`], which runs conversions on the blocking pool and streams
//!   the output back in chunks
//!
//! # Example
//!
//! ```rust
//! use rdf_serve::rdf::FormatRegistry;
//! use std::path::Path;
//!
//! let registry = FormatRegistry::new();
//! assert_eq!(registry.content_type_for_path(Path::new("jesse.ttl")), Some("text/turtle"));
//! assert_eq!(registry.destinations("text/turtle")[0], "text/turtle");
//! ```

mod engine;
mod format;
mod serialization;

pub use engine::RdfEngine;

pub use format::{FormatEntry, FormatRegistry};

pub use serialization::{
    parse_base_iri, read_quads, writer_for,
    ConvertError, ConvertResult, QuadSink, RdfFormat,
    JsonLdReader, JsonLdWriter,
};
