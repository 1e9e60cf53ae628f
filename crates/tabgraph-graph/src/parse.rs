//! RDF input parsing (boundary adapter).
//!
//! Uses **Sophia** to read the serializations an input graph is usually
//! handed over in:
//! - N-Triples (`.nt`)
//! - Turtle (`.ttl`)
//!
//! Parsed terms are converted into the crate's own [`Node`] / [`Object`]
//! model; the Sophia types never leak out of this module.

use sophia::api::prelude::*;
use sophia::api::term::TermKind;
use std::path::Path;

use crate::error::{GraphError, Result};
use crate::graph::Graph;
use crate::term::{Literal, Node, Object, Triple};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RdfFormat {
    NTriples,
    Turtle,
}

impl RdfFormat {
    /// Pick a format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Result<Self> {
        match ext.to_lowercase().as_str() {
            "nt" | "ntriples" => Ok(RdfFormat::NTriples),
            "ttl" | "turtle" => Ok(RdfFormat::Turtle),
            other => Err(GraphError::UnsupportedFormat(format!(".{other}"))),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
        Self::from_extension(ext)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{message}")]
struct GraphSinkError {
    message: String,
}

impl GraphSinkError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

fn convert_node<T: Term>(term: T) -> std::result::Result<Node, GraphSinkError> {
    match term.kind() {
        TermKind::Iri => term
            .iri()
            .map(|iri| Node::Iri(iri.as_str().to_string()))
            .ok_or_else(|| GraphSinkError::new("IRI term without IRI")),
        TermKind::BlankNode => term
            .bnode_id()
            .map(|id| Node::Blank(id.as_str().to_string()))
            .ok_or_else(|| GraphSinkError::new("blank node term without label")),
        other => Err(GraphSinkError::new(format!(
            "expected IRI or blank node, got {other:?}"
        ))),
    }
}

fn convert_object<T: Term>(term: T) -> std::result::Result<Object, GraphSinkError> {
    if term.kind() != TermKind::Literal {
        return convert_node(term).map(Object::Node);
    }

    let lexical: String = match term.lexical_form() {
        Some(lex) => {
            let s: &str = &lex;
            s.to_string()
        }
        None => return Err(GraphSinkError::new("literal without lexical form")),
    };

    if let Some(tag) = term.language_tag() {
        return Ok(Object::Literal(Literal::lang(lexical, tag.as_str())));
    }

    match term.datatype() {
        Some(dt) => Ok(Object::Literal(Literal::typed(lexical, dt.as_str()))),
        None => Ok(Object::Literal(Literal::plain(lexical))),
    }
}

fn convert_triple<T: sophia::api::triple::Triple>(
    t: T,
) -> std::result::Result<Option<Triple>, GraphSinkError> {
    let subject = convert_node(t.s())?;
    let Node::Iri(predicate) = convert_node(t.p())? else {
        // Generalized RDF (blank predicates) has no place in a labelled-edge graph.
        return Ok(None);
    };
    let object = convert_object(t.o())?;
    Ok(Some(Triple {
        subject,
        predicate,
        object,
    }))
}

/// Parse a serialized graph held in memory.
pub fn parse_graph(bytes: &[u8], format: RdfFormat) -> Result<Graph> {
    let cursor = std::io::Cursor::new(bytes);
    let reader = std::io::BufReader::new(cursor);
    let mut out = Graph::new();

    match format {
        RdfFormat::NTriples => {
            let mut parser = sophia::turtle::parser::nt::parse_bufread(reader);
            parser
                .try_for_each_triple(|t| -> std::result::Result<(), GraphSinkError> {
                    if let Some(triple) = convert_triple(t)? {
                        out.insert(triple);
                    }
                    Ok(())
                })
                .map_err(|e| GraphError::Parse(format!("failed to parse N-Triples: {e}")))?;
        }
        RdfFormat::Turtle => {
            let mut parser = sophia::turtle::parser::turtle::parse_bufread(reader);
            parser
                .try_for_each_triple(|t| -> std::result::Result<(), GraphSinkError> {
                    if let Some(triple) = convert_triple(t)? {
                        out.insert(triple);
                    }
                    Ok(())
                })
                .map_err(|e| GraphError::Parse(format!("failed to parse Turtle: {e}")))?;
        }
    }

    tracing::debug!(triples = out.len(), ?format, "parsed input graph");
    Ok(out)
}

/// Parse a graph file, choosing the format from its extension.
pub fn parse_graph_file(path: &Path) -> Result<Graph> {
    let format = RdfFormat::from_path(path)?;
    let bytes = std::fs::read(path)?;
    parse_graph(&bytes, format)
}
