//! Turtle family implementation (Turtle, N-Triples, N-Quads, TriG, N3 subset)

use super::{require_default_graph, ConvertResult, QuadSink, RdfFormat};
use oxiri::Iri;
use rio_api::formatter::{QuadsFormatter, TriplesFormatter};
use rio_api::model::{Quad, Triple};
use rio_api::parser::{QuadsParser, TriplesParser};
use rio_turtle::{
    NQuadsFormatter, NQuadsParser, NTriplesFormatter, NTriplesParser, TriGFormatter, TriGParser,
    TurtleFormatter, TurtleParser,
};
use std::io::{BufRead, Write};

pub(super) fn read_turtle<R: BufRead>(
    read: R,
    base_iri: Option<Iri<String>>,
    on_quad: &mut dyn FnMut(&Quad<'_>) -> ConvertResult<()>,
) -> ConvertResult<()> {
    let mut parser = TurtleParser::new(read, base_iri);
    parser.parse_all(&mut |t| on_quad(&in_default_graph(t)))
}

pub(super) fn read_ntriples<R: BufRead>(
    read: R,
    on_quad: &mut dyn FnMut(&Quad<'_>) -> ConvertResult<()>,
) -> ConvertResult<()> {
    let mut parser = NTriplesParser::new(read);
    parser.parse_all(&mut |t| on_quad(&in_default_graph(t)))
}

pub(super) fn read_nquads<R: BufRead>(
    read: R,
    on_quad: &mut dyn FnMut(&Quad<'_>) -> ConvertResult<()>,
) -> ConvertResult<()> {
    let mut parser = NQuadsParser::new(read);
    parser.parse_all(&mut |q| on_quad(&q))
}

pub(super) fn read_trig<R: BufRead>(
    read: R,
    base_iri: Option<Iri<String>>,
    on_quad: &mut dyn FnMut(&Quad<'_>) -> ConvertResult<()>,
) -> ConvertResult<()> {
    let mut parser = TriGParser::new(read, base_iri);
    parser.parse_all(&mut |q| on_quad(&q))
}

fn in_default_graph(t: Triple<'_>) -> Quad<'_> {
    Quad {
        subject: t.subject,
        predicate: t.predicate,
        object: t.object,
        graph_name: None,
    }
}

fn as_triple<'a>(quad: &Quad<'a>) -> Triple<'a> {
    Triple {
        subject: quad.subject,
        predicate: quad.predicate,
        object: quad.object,
    }
}

/// Turtle serializer, also used for N3 output
pub(super) struct TurtleSink<W: Write> {
    formatter: TurtleFormatter<W>,
    format: RdfFormat,
}

impl<W: Write> TurtleSink<W> {
    pub(super) fn new(write: W, format: RdfFormat) -> Self {
        Self {
            formatter: TurtleFormatter::new(write),
            format,
        }
    }
}

impl<W: Write> QuadSink for TurtleSink<W> {
    fn write_quad(&mut self, quad: &Quad<'_>) -> ConvertResult<()> {
        require_default_graph(quad, self.format)?;
        self.formatter.format(&as_triple(quad))?;
        Ok(())
    }

    fn finish(self: Box<Self>) -> ConvertResult<()> {
        self.formatter.finish()?;
        Ok(())
    }
}

pub(super) struct NTriplesSink<W: Write> {
    formatter: NTriplesFormatter<W>,
}

impl<W: Write> NTriplesSink<W> {
    pub(super) fn new(write: W) -> Self {
        Self {
            formatter: NTriplesFormatter::new(write),
        }
    }
}

impl<W: Write> QuadSink for NTriplesSink<W> {
    fn write_quad(&mut self, quad: &Quad<'_>) -> ConvertResult<()> {
        require_default_graph(quad, RdfFormat::NTriples)?;
        self.formatter.format(&as_triple(quad))?;
        Ok(())
    }

    fn finish(self: Box<Self>) -> ConvertResult<()> {
        self.formatter.finish()?;
        Ok(())
    }
}

pub(super) struct NQuadsSink<W: Write> {
    formatter: NQuadsFormatter<W>,
}

impl<W: Write> NQuadsSink<W> {
    pub(super) fn new(write: W) -> Self {
        Self {
            formatter: NQuadsFormatter::new(write),
        }
    }
}

impl<W: Write> QuadSink for NQuadsSink<W> {
    fn write_quad(&mut self, quad: &Quad<'_>) -> ConvertResult<()> {
        self.formatter.format(quad)?;
        Ok(())
    }

    fn finish(self: Box<Self>) -> ConvertResult<()> {
        self.formatter.finish()?;
        Ok(())
    }
}

pub(super) struct TriGSink<W: Write> {
    formatter: TriGFormatter<W>,
}

impl<W: Write> TriGSink<W> {
    pub(super) fn new(write: W) -> Self {
        Self {
            formatter: TriGFormatter::new(write),
        }
    }
}

impl<W: Write> QuadSink for TriGSink<W> {
    fn write_quad(&mut self, quad: &Quad<'_>) -> ConvertResult<()> {
        self.formatter.format(quad)?;
        Ok(())
    }

    fn finish(self: Box<Self>) -> ConvertResult<()> {
        self.formatter.finish()?;
        Ok(())
    }
}
