//! RDF serialization formats
//!
//! Supports:
//! - Turtle (TTL) and N3 (Turtle-compatible subset)
//! - N-Triples (NT) and N-Quads (NQ)
//! - TriG
//! - RDF/XML
//! - JSON-LD (expanded form)
//!
//! Every format is read into a stream of `rio_api` quads and written through a
//! [`QuadSink`]. Nothing is collected in memory except for JSON-LD input, which
//! has to be parsed as a whole document.

mod jsonld;
mod rdfxml;
mod turtle;

pub use jsonld::{JsonLdReader, JsonLdWriter};

use oxiri::Iri;
use rio_api::model::Quad;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};
use thiserror::Error;

/// RDF serialization format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RdfFormat {
    /// Turtle format (.ttl)
    Turtle,
    /// N-Triples format (.nt)
    NTriples,
    /// N-Quads format (.nq)
    NQuads,
    /// TriG format (.trig)
    #[serde(rename = "trig")]
    TriG,
    /// RDF/XML format (.rdf)
    RdfXml,
    /// JSON-LD format (.jsonld), expanded form only
    JsonLd,
    /// Notation3 (.n3)
    N3,
    /// A serialization the engine can only pass through unchanged
    Opaque,
}

impl RdfFormat {
    /// Whether documents in this format can be parsed into statements
    pub fn is_readable(self) -> bool {
        !matches!(self, RdfFormat::Opaque)
    }

    /// Whether statements can be written in this format
    pub fn is_writable(self) -> bool {
        !matches!(self, RdfFormat::Opaque)
    }
}

/// Conversion errors
#[derive(Error, Debug)]
pub enum ConvertError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Base IRI could not be parsed
    #[error("Invalid base IRI <{iri}>: {reason}")]
    InvalidBaseIri { iri: String, reason: String },

    /// A quad in a named graph was sent to a triples-only format
    #[error("Cannot write a statement in named graph {graph} as {format:?}")]
    NamedGraph { graph: String, format: RdfFormat },

    /// Unsupported format
    #[error("Unsupported format: {0:?}")]
    UnsupportedFormat(RdfFormat),

    /// Content type not known to the format registry
    #[error("Unknown content type: {0}")]
    UnknownContentType(String),
}

impl ConvertError {
    /// True when the failure came from the consumer hanging up, not from the data
    pub fn is_disconnect(&self) -> bool {
        matches!(self, ConvertError::Io(e) if e.kind() == std::io::ErrorKind::BrokenPipe)
    }
}

impl From<rio_turtle::TurtleError> for ConvertError {
    fn from(e: rio_turtle::TurtleError) -> Self {
        ConvertError::Parse(e.to_string())
    }
}

impl From<rio_xml::RdfXmlError> for ConvertError {
    fn from(e: rio_xml::RdfXmlError) -> Self {
        ConvertError::Parse(e.to_string())
    }
}

pub type ConvertResult<T> = Result<T, ConvertError>;

/// Destination for parsed statements
pub trait QuadSink {
    /// Write one statement
    fn write_quad(&mut self, quad: &Quad<'_>) -> ConvertResult<()>;

    /// Flush trailing syntax and release the writer
    fn finish(self: Box<Self>) -> ConvertResult<()>;
}

/// Build a sink that writes `format` into `write`
pub fn writer_for<'w, W: Write + 'w>(
    format: RdfFormat,
    write: W,
) -> ConvertResult<Box<dyn QuadSink + 'w>> {
    match format {
        // Turtle is a subset of N3, so N3 output goes through the Turtle writer
        RdfFormat::Turtle | RdfFormat::N3 => Ok(Box::new(turtle::TurtleSink::new(write, format))),
        RdfFormat::NTriples => Ok(Box::new(turtle::NTriplesSink::new(write))),
        RdfFormat::NQuads => Ok(Box::new(turtle::NQuadsSink::new(write))),
        RdfFormat::TriG => Ok(Box::new(turtle::TriGSink::new(write))),
        RdfFormat::RdfXml => Ok(Box::new(rdfxml::RdfXmlSink::new(write)?)),
        RdfFormat::JsonLd => Ok(Box::new(JsonLdWriter::new(write))),
        RdfFormat::Opaque => Err(ConvertError::UnsupportedFormat(format)),
    }
}

/// Parse `read` as `format`, handing every statement to `on_quad`
pub fn read_quads<R: BufRead>(
    format: RdfFormat,
    read: R,
    base_iri: Option<Iri<String>>,
    on_quad: &mut dyn FnMut(&Quad<'_>) -> ConvertResult<()>,
) -> ConvertResult<()> {
    match format {
        RdfFormat::Turtle | RdfFormat::N3 => turtle::read_turtle(read, base_iri, on_quad),
        RdfFormat::NTriples => turtle::read_ntriples(read, on_quad),
        RdfFormat::NQuads => turtle::read_nquads(read, on_quad),
        RdfFormat::TriG => turtle::read_trig(read, base_iri, on_quad),
        RdfFormat::RdfXml => rdfxml::read_rdfxml(read, base_iri, on_quad),
        RdfFormat::JsonLd => JsonLdReader::new(base_iri).read(read, on_quad),
        RdfFormat::Opaque => Err(ConvertError::UnsupportedFormat(format)),
    }
}

/// Parse a base IRI for the readers
pub fn parse_base_iri(iri: &str) -> ConvertResult<Iri<String>> {
    Iri::parse(iri.to_string()).map_err(|e| ConvertError::InvalidBaseIri {
        iri: iri.to_string(),
        reason: e.to_string(),
    })
}

/// Reject statements that a triples-only format cannot represent
pub(crate) fn require_default_graph(quad: &Quad<'_>, format: RdfFormat) -> ConvertResult<()> {
    match quad.graph_name {
        None => Ok(()),
        Some(graph) => Err(ConvertError::NamedGraph {
            graph: graph.to_string(),
            format,
        }),
    }
}
