//! Graph terms: nodes, literals and triples.
//!
//! Nodes are either globally-scoped IRIs or locally-scoped blank nodes. A
//! blank node label only has meaning inside the graph that contains it.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::vocab::XSD_STRING;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Node {
    Iri(String),
    /// Label without the `_:` prefix.
    Blank(String),
}

impl Node {
    pub fn iri(iri: impl Into<String>) -> Self {
        Node::Iri(iri.into())
    }

    pub fn blank(label: impl Into<String>) -> Self {
        Node::Blank(label.into())
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Node::Iri(iri) => Some(iri),
            Node::Blank(_) => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Node::Blank(_))
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Iri(iri) => write!(f, "<{iri}>"),
            Node::Blank(label) => write!(f, "_:{label}"),
        }
    }
}

/// A literal value.
///
/// `datatype` is `None` for plain literals. A plain literal and an explicit
/// `xsd:string` literal with the same lexical form are the same value, so the
/// constructors normalize `xsd:string` away.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Literal {
    pub lexical: String,
    pub datatype: Option<String>,
    pub language: Option<String>,
}

impl Literal {
    pub fn plain(lexical: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: None,
            language: None,
        }
    }

    pub fn typed(lexical: impl Into<String>, datatype: impl Into<String>) -> Self {
        let datatype = datatype.into();
        Self {
            lexical: lexical.into(),
            datatype: (datatype != XSD_STRING).then_some(datatype),
            language: None,
        }
    }

    pub fn lang(lexical: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: None,
            language: Some(language.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Object {
    Node(Node),
    Literal(Literal),
}

impl Object {
    pub fn iri(iri: impl Into<String>) -> Self {
        Object::Node(Node::iri(iri))
    }

    pub fn blank(label: impl Into<String>) -> Self {
        Object::Node(Node::blank(label))
    }

    pub fn plain(lexical: impl Into<String>) -> Self {
        Object::Literal(Literal::plain(lexical))
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Object::Node(node) => Some(node),
            Object::Literal(_) => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Object::Literal(lit) => Some(lit),
            Object::Node(_) => None,
        }
    }

    /// The IRI or lexical form, whichever this object carries.
    ///
    /// Schema descriptions sometimes state URL templates as IRIs and sometimes
    /// as string literals; callers that accept both read them through here.
    pub fn text(&self) -> Option<&str> {
        match self {
            Object::Node(Node::Iri(iri)) => Some(iri),
            Object::Node(Node::Blank(_)) => None,
            Object::Literal(lit) => Some(&lit.lexical),
        }
    }
}

impl From<Node> for Object {
    fn from(node: Node) -> Self {
        Object::Node(node)
    }
}

impl From<Literal> for Object {
    fn from(lit: Literal) -> Self {
        Object::Literal(lit)
    }
}

/// A directed labelled edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Triple {
    pub subject: Node,
    pub predicate: String,
    pub object: Object,
}

impl Triple {
    pub fn new(subject: Node, predicate: impl Into<String>, object: impl Into<Object>) -> Self {
        Self {
            subject,
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}
