//! RDF/XML format implementation

use super::{require_default_graph, ConvertResult, QuadSink, RdfFormat};
use oxiri::Iri;
use rio_api::formatter::TriplesFormatter;
use rio_api::model::{Quad, Triple};
use rio_api::parser::TriplesParser;
use rio_xml::{RdfXmlFormatter, RdfXmlParser};
use std::io::{BufRead, Write};

pub(super) fn read_rdfxml<R: BufRead>(
    read: R,
    base_iri: Option<Iri<String>>,
    on_quad: &mut dyn FnMut(&Quad<'_>) -> ConvertResult<()>,
) -> ConvertResult<()> {
    let mut parser = RdfXmlParser::new(read, base_iri);
    parser.parse_all(&mut |t| {
        on_quad(&Quad {
            subject: t.subject,
            predicate: t.predicate,
            object: t.object,
            graph_name: None,
        })
    })
}

/// RDF/XML serializer
pub(super) struct RdfXmlSink<W: Write> {
    formatter: RdfXmlFormatter<W>,
}

impl<W: Write> RdfXmlSink<W> {
    pub(super) fn new(write: W) -> ConvertResult<Self> {
        Ok(Self {
            formatter: RdfXmlFormatter::new(write)?,
        })
    }
}

impl<W: Write> QuadSink for RdfXmlSink<W> {
    fn write_quad(&mut self, quad: &Quad<'_>) -> ConvertResult<()> {
        require_default_graph(quad, RdfFormat::RdfXml)?;
        self.formatter.format(&Triple {
            subject: quad.subject,
            predicate: quad.predicate,
            object: quad.object,
        })?;
        Ok(())
    }

    fn finish(self: Box<Self>) -> ConvertResult<()> {
        self.formatter.finish()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rdfxml_roundtrip_count() {
        let input = r##"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:foaf="http://xmlns.com/foaf/0.1/">
  <rdf:Description rdf:about="#jesse">
    <foaf:name>Jesse</foaf:name>
  </rdf:Description>
</rdf:RDF>"##;
        let base = Iri::parse("http://example.org/jesse".to_string()).ok();

        let mut output = Vec::new();
        {
            let mut sink: Box<dyn QuadSink + '_> = Box::new(RdfXmlSink::new(&mut output).unwrap());
            read_rdfxml(input.as_bytes(), base, &mut |q| {
                assert_eq!(q.subject.to_string(), "<http://example.org/jesse#jesse>");
                sink.write_quad(q)
            })
            .unwrap();
            sink.finish().unwrap();
        }

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("http://example.org/jesse#jesse"));
        assert!(output.contains("Jesse"));
    }
}
