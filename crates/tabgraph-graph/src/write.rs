//! Graph serialization: N-Triples and subject-grouped Turtle.
//!
//! Output order follows the graph's triple order, so serializing the same
//! graph twice always produces the same text.

use std::fmt::Write as _;

use crate::graph::Graph;
use crate::term::{Literal, Node, Object};
use crate::vocab::{RDF_TYPE, WELL_KNOWN_PREFIXES};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    NTriples,
    Turtle,
}

impl OutputFormat {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "nt" | "ntriples" | "n-triples" => Some(OutputFormat::NTriples),
            "ttl" | "turtle" => Some(OutputFormat::Turtle),
            _ => None,
        }
    }
}

pub fn serialize(graph: &Graph, format: OutputFormat) -> String {
    match format {
        OutputFormat::NTriples => to_ntriples(graph),
        OutputFormat::Turtle => to_turtle(graph),
    }
}

fn escape_literal(s: &str, out: &mut String) {
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
}

fn escape_iri(iri: &str, out: &mut String) {
    for c in iri.chars() {
        if c <= ' ' || matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\') {
            let _ = write!(out, "\\u{:04X}", c as u32);
        } else {
            out.push(c);
        }
    }
}

fn write_iri(iri: &str, out: &mut String) {
    out.push('<');
    escape_iri(iri, out);
    out.push('>');
}

fn write_node(node: &Node, out: &mut String) {
    match node {
        Node::Iri(iri) => write_iri(iri, out),
        Node::Blank(label) => {
            out.push_str("_:");
            out.push_str(label);
        }
    }
}

fn write_literal(lit: &Literal, out: &mut String, compact: bool) {
    out.push('"');
    escape_literal(&lit.lexical, out);
    out.push('"');
    if let Some(lang) = &lit.language {
        out.push('@');
        out.push_str(lang);
    } else if let Some(dt) = &lit.datatype {
        out.push_str("^^");
        if compact {
            write_compact_iri(dt, out);
        } else {
            write_iri(dt, out);
        }
    }
}

pub fn to_ntriples(graph: &Graph) -> String {
    let mut out = String::new();
    for t in graph {
        write_node(&t.subject, &mut out);
        out.push(' ');
        write_iri(&t.predicate, &mut out);
        out.push(' ');
        match &t.object {
            Object::Node(node) => write_node(node, &mut out),
            Object::Literal(lit) => write_literal(lit, &mut out, false),
        }
        out.push_str(" .\n");
    }
    out
}

fn is_simple_local(local: &str) -> bool {
    !local.is_empty()
        && !local.starts_with('-')
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn write_compact_iri(iri: &str, out: &mut String) {
    for (prefix, ns) in WELL_KNOWN_PREFIXES {
        if let Some(local) = iri.strip_prefix(ns) {
            if is_simple_local(local) {
                let _ = write!(out, "{prefix}:{local}");
                return;
            }
        }
    }
    write_iri(iri, out);
}

fn write_turtle_node(node: &Node, out: &mut String) {
    match node {
        Node::Iri(iri) => write_compact_iri(iri, out),
        Node::Blank(_) => write_node(node, out),
    }
}

pub fn to_turtle(graph: &Graph) -> String {
    let mut out = String::new();
    for (prefix, ns) in WELL_KNOWN_PREFIXES {
        let _ = writeln!(out, "@prefix {prefix}: <{ns}> .");
    }

    let mut current: Option<&Node> = None;
    for t in graph {
        if current == Some(&t.subject) {
            out.push_str(" ;\n    ");
        } else {
            if current.is_some() {
                out.push_str(" .\n");
            }
            out.push('\n');
            write_turtle_node(&t.subject, &mut out);
            out.push_str("\n    ");
            current = Some(&t.subject);
        }

        if t.predicate == RDF_TYPE {
            out.push('a');
        } else {
            write_compact_iri(&t.predicate, &mut out);
        }
        out.push(' ');
        match &t.object {
            Object::Node(node) => write_turtle_node(node, &mut out),
            Object::Literal(lit) => write_literal(lit, &mut out, true),
        }
    }
    if current.is_some() {
        out.push_str(" .\n");
    }
    out
}
