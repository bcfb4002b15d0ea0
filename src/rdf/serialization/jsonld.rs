//! JSON-LD format implementation (expanded form)
//!
//! The writer emits expanded JSON-LD, grouping consecutive statements about
//! the same subject into one node object so output can be streamed. The reader
//! accepts expanded documents only; `@context` processing is not supported.

use super::{ConvertError, ConvertResult, QuadSink};
use oxiri::Iri;
use oxrdf::vocab::{rdf, xsd};
use oxrdf::{BlankNode, GraphName, Literal, NamedNode, Quad, Subject, Term};
use rio_api::model as rio;
use serde_json::{json, Map, Value};
use std::io::{Read, Write};

/// JSON-LD serializer
pub struct JsonLdWriter<W: Write> {
    write: W,
    current: Option<PendingNode>,
    nodes_written: usize,
}

/// Node object still collecting properties
struct PendingNode {
    graph: Option<String>,
    id: String,
    properties: Map<String, Value>,
}

impl<W: Write> JsonLdWriter<W> {
    /// Create a writer over `write`
    pub fn new(write: W) -> Self {
        Self {
            write,
            current: None,
            nodes_written: 0,
        }
    }

    fn flush_node(&mut self) -> ConvertResult<()> {
        let Some(node) = self.current.take() else {
            return Ok(());
        };

        let mut object = Map::new();
        object.insert("@id".to_string(), Value::String(node.id));
        object.extend(node.properties);
        let mut value = Value::Object(object);
        if let Some(graph) = node.graph {
            value = json!({ "@id": graph, "@graph": [value] });
        }

        let separator: &[u8] = if self.nodes_written == 0 { b"[\n  " } else { b",\n  " };
        self.write.write_all(separator)?;
        serde_json::to_writer(&mut self.write, &value)
            .map_err(|e| ConvertError::Serialize(e.to_string()))?;
        self.nodes_written += 1;
        Ok(())
    }
}

impl<W: Write> QuadSink for JsonLdWriter<W> {
    fn write_quad(&mut self, quad: &rio::Quad<'_>) -> ConvertResult<()> {
        let graph = quad.graph_name.map(|g| match g {
            rio::GraphName::NamedNode(n) => n.iri.to_string(),
            rio::GraphName::BlankNode(b) => format!("_:{}", b.id),
        });
        let id = subject_id(&quad.subject)?;
        let object = object_value(&quad.object)?;

        let same_node = matches!(&self.current, Some(node) if node.graph == graph && node.id == id);
        if !same_node {
            self.flush_node()?;
            self.current = Some(PendingNode {
                graph,
                id,
                properties: Map::new(),
            });
        }

        if let Some(node) = self.current.as_mut() {
            let values = node
                .properties
                .entry(quad.predicate.iri.to_string())
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(values) = values {
                values.push(object);
            }
        }
        Ok(())
    }

    fn finish(mut self: Box<Self>) -> ConvertResult<()> {
        self.flush_node()?;
        let trailer: &[u8] = if self.nodes_written == 0 { b"[]\n" } else { b"\n]\n" };
        self.write.write_all(trailer)?;
        self.write.flush()?;
        Ok(())
    }
}

fn subject_id(subject: &rio::Subject<'_>) -> ConvertResult<String> {
    match subject {
        rio::Subject::NamedNode(n) => Ok(n.iri.to_string()),
        rio::Subject::BlankNode(b) => Ok(format!("_:{}", b.id)),
        _ => Err(ConvertError::Serialize(
            "RDF-star statements cannot be written as JSON-LD".to_string(),
        )),
    }
}

fn object_value(term: &rio::Term<'_>) -> ConvertResult<Value> {
    match term {
        rio::Term::NamedNode(n) => Ok(json!({ "@id": n.iri })),
        rio::Term::BlankNode(b) => Ok(json!({ "@id": format!("_:{}", b.id) })),
        rio::Term::Literal(rio::Literal::Simple { value }) => Ok(json!({ "@value": value })),
        rio::Term::Literal(rio::Literal::LanguageTaggedString { value, language }) => {
            Ok(json!({ "@value": value, "@language": language }))
        }
        rio::Term::Literal(rio::Literal::Typed { value, datatype }) => {
            Ok(json!({ "@value": value, "@type": datatype.iri }))
        }
        _ => Err(ConvertError::Serialize(
            "RDF-star statements cannot be written as JSON-LD".to_string(),
        )),
    }
}

/// JSON-LD parser
pub struct JsonLdReader {
    base_iri: Option<Iri<String>>,
}

impl JsonLdReader {
    /// Create a reader resolving relative `@id` values against `base_iri`
    pub fn new(base_iri: Option<Iri<String>>) -> Self {
        Self { base_iri }
    }

    /// Parse a whole document and hand every statement to `on_quad`
    pub fn read<R: Read>(
        self,
        read: R,
        on_quad: &mut dyn FnMut(&rio::Quad<'_>) -> ConvertResult<()>,
    ) -> ConvertResult<()> {
        let document: Value =
            serde_json::from_reader(read).map_err(|e| ConvertError::Parse(e.to_string()))?;

        let mut quads = Vec::new();
        self.expand_document(&document, &mut quads)?;

        for quad in &quads {
            on_quad(&rio_quad(quad)?)?;
        }
        Ok(())
    }

    fn expand_document(&self, document: &Value, out: &mut Vec<Quad>) -> ConvertResult<()> {
        match document {
            Value::Array(nodes) => {
                for node in nodes {
                    self.node(node, &GraphName::DefaultGraph, out)?;
                }
                Ok(())
            }
            Value::Object(_) => {
                self.node(document, &GraphName::DefaultGraph, out)?;
                Ok(())
            }
            _ => Err(ConvertError::Parse(
                "JSON-LD document must be an object or an array".to_string(),
            )),
        }
    }

    fn node(&self, value: &Value, graph: &GraphName, out: &mut Vec<Quad>) -> ConvertResult<Subject> {
        let map = value
            .as_object()
            .ok_or_else(|| ConvertError::Parse("expected a JSON-LD node object".to_string()))?;

        if map.contains_key("@context") {
            return Err(ConvertError::Parse(
                "JSON-LD @context is not supported, expected expanded JSON-LD".to_string(),
            ));
        }

        let subject: Subject = match map.get("@id") {
            Some(Value::String(id)) => match self.reference(id)? {
                Term::NamedNode(n) => n.into(),
                Term::BlankNode(b) => b.into(),
                _ => return Err(ConvertError::Parse(format!("invalid @id {id}"))),
            },
            Some(_) => return Err(ConvertError::Parse("@id must be a string".to_string())),
            None => BlankNode::default().into(),
        };

        for (key, value) in map {
            match key.as_str() {
                "@id" | "@index" => {}
                "@type" => {
                    for ty in as_array(value) {
                        let ty = ty
                            .as_str()
                            .ok_or_else(|| ConvertError::Parse("@type must be a string".to_string()))?;
                        out.push(Quad::new(
                            subject.clone(),
                            rdf::TYPE.into_owned(),
                            self.reference(ty)?,
                            graph.clone(),
                        ));
                    }
                }
                "@graph" => {
                    // A bare @graph wrapper keeps its nodes in the enclosing graph
                    let inner = if map.contains_key("@id") {
                        match &subject {
                            Subject::NamedNode(n) => GraphName::from(n.clone()),
                            Subject::BlankNode(b) => GraphName::from(b.clone()),
                            #[allow(unreachable_patterns)]
                            _ => return Err(ConvertError::Parse("invalid graph name".to_string())),
                        }
                    } else {
                        graph.clone()
                    };
                    for node in as_array(value) {
                        self.node(node, &inner, out)?;
                    }
                }
                keyword if keyword.starts_with('@') => {
                    return Err(ConvertError::Parse(format!(
                        "unsupported JSON-LD keyword {keyword}"
                    )));
                }
                property => {
                    let predicate = NamedNode::new(property).map_err(|e| {
                        ConvertError::Parse(format!("property {property} is not an absolute IRI: {e}"))
                    })?;
                    for item in as_array(value) {
                        let object = self.object(item, graph, out)?;
                        out.push(Quad::new(subject.clone(), predicate.clone(), object, graph.clone()));
                    }
                }
            }
        }

        Ok(subject)
    }

    fn object(&self, value: &Value, graph: &GraphName, out: &mut Vec<Quad>) -> ConvertResult<Term> {
        match value {
            Value::Object(map) if map.contains_key("@value") => self.literal(map),
            Value::Object(map) if map.contains_key("@list") || map.contains_key("@set") => Err(
                ConvertError::Parse("JSON-LD @list and @set are not supported".to_string()),
            ),
            Value::Object(_) => Ok(self.node(value, graph, out)?.into()),
            Value::String(s) => Ok(Literal::new_simple_literal(s.as_str()).into()),
            Value::Bool(b) => Ok(Literal::new_typed_literal(b.to_string(), xsd::BOOLEAN).into()),
            Value::Number(n) => Ok(number_literal(n).into()),
            Value::Null | Value::Array(_) => {
                Err(ConvertError::Parse("invalid JSON-LD property value".to_string()))
            }
        }
    }

    fn literal(&self, map: &Map<String, Value>) -> ConvertResult<Term> {
        let literal = match map.get("@value") {
            Some(Value::String(value)) => match (map.get("@language"), map.get("@type")) {
                (Some(Value::String(language)), _) => {
                    Literal::new_language_tagged_literal(value.as_str(), language.as_str())
                        .map_err(|e| ConvertError::Parse(e.to_string()))?
                }
                (_, Some(Value::String(datatype))) => {
                    let datatype = NamedNode::new(datatype.as_str())
                        .map_err(|e| ConvertError::Parse(e.to_string()))?;
                    Literal::new_typed_literal(value.as_str(), datatype)
                }
                _ => Literal::new_simple_literal(value.as_str()),
            },
            Some(Value::Bool(b)) => Literal::new_typed_literal(b.to_string(), xsd::BOOLEAN),
            Some(Value::Number(n)) => number_literal(n),
            _ => return Err(ConvertError::Parse("invalid @value".to_string())),
        };
        Ok(literal.into())
    }

    /// Resolve an `@id` or `@type` reference to a node
    fn reference(&self, id: &str) -> ConvertResult<Term> {
        if let Some(label) = id.strip_prefix("_:") {
            return BlankNode::new(label)
                .map(Term::from)
                .map_err(|e| ConvertError::Parse(e.to_string()));
        }

        let iri = match &self.base_iri {
            Some(base) => base.resolve(id),
            None => Iri::parse(id.to_string()),
        }
        .map_err(|e| ConvertError::Parse(format!("invalid IRI {id}: {e}")))?;

        NamedNode::new(iri.into_inner())
            .map(Term::from)
            .map_err(|e| ConvertError::Parse(e.to_string()))
    }
}

fn as_array(value: &Value) -> &[Value] {
    match value {
        Value::Array(values) => values,
        other => std::slice::from_ref(other),
    }
}

fn number_literal(n: &serde_json::Number) -> Literal {
    if n.is_f64() {
        Literal::new_typed_literal(n.to_string(), xsd::DOUBLE)
    } else {
        Literal::new_typed_literal(n.to_string(), xsd::INTEGER)
    }
}

fn rio_quad(quad: &Quad) -> ConvertResult<rio::Quad<'_>> {
    let subject = match &quad.subject {
        Subject::NamedNode(n) => rio::Subject::NamedNode(rio::NamedNode { iri: n.as_str() }),
        Subject::BlankNode(b) => rio::Subject::BlankNode(rio::BlankNode { id: b.as_str() }),
        #[allow(unreachable_patterns)]
        _ => return Err(ConvertError::Parse("Unsupported subject type".to_string())),
    };

    let object = match &quad.object {
        Term::NamedNode(n) => rio::Term::NamedNode(rio::NamedNode { iri: n.as_str() }),
        Term::BlankNode(b) => rio::Term::BlankNode(rio::BlankNode { id: b.as_str() }),
        Term::Literal(l) => rio::Term::Literal(if let Some(language) = l.language() {
            rio::Literal::LanguageTaggedString {
                value: l.value(),
                language,
            }
        } else if l.datatype() == xsd::STRING {
            rio::Literal::Simple { value: l.value() }
        } else {
            rio::Literal::Typed {
                value: l.value(),
                datatype: rio::NamedNode {
                    iri: l.datatype().as_str(),
                },
            }
        }),
        #[allow(unreachable_patterns)]
        _ => return Err(ConvertError::Parse("Unsupported object type".to_string())),
    };

    let graph_name = match &quad.graph_name {
        GraphName::NamedNode(n) => Some(rio::GraphName::NamedNode(rio::NamedNode { iri: n.as_str() })),
        GraphName::BlankNode(b) => Some(rio::GraphName::BlankNode(rio::BlankNode { id: b.as_str() })),
        GraphName::DefaultGraph => None,
    };

    Ok(rio::Quad {
        subject,
        predicate: rio::NamedNode {
            iri: quad.predicate.as_str(),
        },
        object,
        graph_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all(input: &str, base: Option<&str>) -> ConvertResult<Vec<String>> {
        let base = base.and_then(|b| Iri::parse(b.to_string()).ok());
        let mut statements = Vec::new();
        JsonLdReader::new(base).read(input.as_bytes(), &mut |q| {
            statements.push(q.to_string());
            Ok(())
        })?;
        Ok(statements)
    }

    #[test]
    fn test_jsonld_serialization() {
        let mut output = Vec::new();
        {
            let mut writer: Box<dyn QuadSink + '_> = Box::new(JsonLdWriter::new(&mut output));
            writer
                .write_quad(&rio::Quad {
                    subject: rio::Subject::NamedNode(rio::NamedNode { iri: "http://example.org/alice" }),
                    predicate: rio::NamedNode { iri: "http://xmlns.com/foaf/0.1/name" },
                    object: rio::Term::Literal(rio::Literal::Simple { value: "Alice" }),
                    graph_name: None,
                })
                .unwrap();
            writer.finish().unwrap();
        }

        let json: Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(json[0]["@id"], "http://example.org/alice");
        assert_eq!(json[0]["http://xmlns.com/foaf/0.1/name"][0]["@value"], "Alice");
    }

    #[test]
    fn test_consecutive_subjects_are_grouped() {
        let mut output = Vec::new();
        {
            let mut writer: Box<dyn QuadSink + '_> = Box::new(JsonLdWriter::new(&mut output));
            for name in ["Alice", "Ally"] {
                writer
                    .write_quad(&rio::Quad {
                        subject: rio::Subject::NamedNode(rio::NamedNode { iri: "http://example.org/alice" }),
                        predicate: rio::NamedNode { iri: "http://xmlns.com/foaf/0.1/name" },
                        object: rio::Term::Literal(rio::Literal::Simple { value: name }),
                        graph_name: None,
                    })
                    .unwrap();
            }
            writer.finish().unwrap();
        }

        let json: Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 1);
        assert_eq!(json[0]["http://xmlns.com/foaf/0.1/name"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_empty_graph_is_empty_array() {
        let mut output = Vec::new();
        let writer: Box<dyn QuadSink + '_> = Box::new(JsonLdWriter::new(&mut output));
        writer.finish().unwrap();
        assert_eq!(output, b"[]\n");
    }

    #[test]
    fn test_read_expanded_document() {
        let input = r##"[{
            "@id": "#jesse",
            "@type": ["http://xmlns.com/foaf/0.1/Person"],
            "http://xmlns.com/foaf/0.1/name": [{"@value": "Jesse", "@language": "en"}],
            "http://xmlns.com/foaf/0.1/knows": [{"@id": "_:b1"}]
        }]"##;
        let statements = read_all(input, Some("http://example.org/people")).unwrap();
        assert_eq!(statements.len(), 3);
        assert!(statements.iter().any(|s| s.contains("<http://example.org/people#jesse>")));
        assert!(statements.iter().any(|s| s.contains("\"Jesse\"@en")));
    }

    #[test]
    fn test_read_named_graph() {
        let input = r#"{"@id": "http://g", "@graph": [
            {"@id": "http://a", "http://b": [{"@id": "http://c"}]}
        ]}"#;
        let statements = read_all(input, None).unwrap();
        assert_eq!(statements.len(), 1);
        assert!(statements[0].starts_with("<http://a> <http://b> <http://c> <http://g>"));
    }

    #[test]
    fn test_context_rejected() {
        let input = r#"{"@context": {"name": "http://xmlns.com/foaf/0.1/name"}, "name": "x"}"#;
        assert!(matches!(read_all(input, None), Err(ConvertError::Parse(_))));
    }

    #[test]
    fn test_relative_property_rejected() {
        let input = r#"[{"@id": "http://a", "name": "x"}]"#;
        assert!(read_all(input, None).is_err());
    }
}
