//! Format registry
//!
//! Maps file extensions to content types and content types to the engine's
//! serializations. The table is plain data so deployments can add entries from
//! configuration without touching negotiation.

use super::RdfFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One serialization known to the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatEntry {
    /// Media type, e.g. `text/turtle`
    pub content_type: String,
    /// File extensions without the leading dot
    pub extensions: Vec<String>,
    /// How the engine reads and writes it
    pub format: RdfFormat,
}

impl FormatEntry {
    pub fn new(content_type: &str, extensions: &[&str], format: RdfFormat) -> Self {
        Self {
            content_type: content_type.to_string(),
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
            format,
        }
    }
}

/// Extension and content type tables
#[derive(Debug, Clone)]
pub struct FormatRegistry {
    entries: Vec<FormatEntry>,
}

impl FormatRegistry {
    /// Registry with the built-in serializations
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(FormatEntry::new("text/turtle", &["ttl", "turtle"], RdfFormat::Turtle));
        registry.register(FormatEntry::new("application/ld+json", &["jsonld", "json"], RdfFormat::JsonLd));
        registry.register(FormatEntry::new("application/n-triples", &["nt", "ntriples"], RdfFormat::NTriples));
        registry.register(FormatEntry::new("application/n-quads", &["nq", "nquads"], RdfFormat::NQuads));
        registry.register(FormatEntry::new("application/trig", &["trig"], RdfFormat::TriG));
        registry.register(FormatEntry::new("application/rdf+xml", &["rdf", "rdfxml", "owl"], RdfFormat::RdfXml));
        registry.register(FormatEntry::new("text/n3", &["n3"], RdfFormat::N3));
        registry.register(FormatEntry::new("text/shaclc", &["shc", "shaclc"], RdfFormat::Opaque));
        registry
    }

    /// Registry with no entries
    pub fn empty() -> Self {
        Self { entries: Vec::new() }
    }

    /// Add an entry, replacing any entry with the same content type.
    /// Extensions claimed by the new entry are removed from older ones.
    pub fn register(&mut self, mut entry: FormatEntry) {
        entry.content_type = entry.content_type.to_ascii_lowercase();
        for ext in entry.extensions.iter_mut() {
            *ext = ext.trim_start_matches('.').to_ascii_lowercase();
        }

        for existing in self.entries.iter_mut() {
            existing.extensions.retain(|e| !entry.extensions.contains(e));
        }

        match self.entries.iter_mut().find(|e| e.content_type == entry.content_type) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    /// Content type for a file, from its final extension
    pub fn content_type_for_path(&self, path: &Path) -> Option<&str> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        self.entries
            .iter()
            .find(|e| e.extensions.iter().any(|x| *x == ext))
            .map(|e| e.content_type.as_str())
    }

    /// Engine format behind a content type
    pub fn format_of(&self, content_type: &str) -> Option<RdfFormat> {
        self.entries
            .iter()
            .find(|e| e.content_type.eq_ignore_ascii_case(content_type))
            .map(|e| e.format)
    }

    /// Content types `source` can be converted to, the source itself first
    pub fn destinations(&self, source: &str) -> Vec<String> {
        let Some(format) = self.format_of(source) else {
            return Vec::new();
        };

        let source = source.to_ascii_lowercase();
        let mut destinations = vec![source.clone()];
        if format.is_readable() {
            destinations.extend(
                self.entries
                    .iter()
                    .filter(|e| e.format.is_writable() && e.content_type != source)
                    .map(|e| e.content_type.clone()),
            );
        }
        destinations
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}
