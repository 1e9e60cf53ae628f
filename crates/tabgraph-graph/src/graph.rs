//! An in-memory set of triples.
//!
//! `Graph` has set semantics and iterates in a total order, so two graphs
//! built from the same triples serialize identically regardless of insertion
//! order.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::error::{GraphError, Result};
use crate::term::{Node, Object, Triple};
use crate::vocab::{RDF_FIRST, RDF_NIL, RDF_REST, RDF_TYPE};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    triples: BTreeSet<Triple>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a triple, returning `false` when it was already present.
    pub fn insert(&mut self, triple: Triple) -> bool {
        self.triples.insert(triple)
    }

    pub fn add(&mut self, subject: Node, predicate: impl Into<String>, object: impl Into<Object>) {
        self.insert(Triple::new(subject, predicate, object));
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    /// Triples matching a pattern; `None` is a wildcard.
    pub fn matching<'a>(
        &'a self,
        subject: Option<&'a Node>,
        predicate: Option<&'a str>,
        object: Option<&'a Object>,
    ) -> impl Iterator<Item = &'a Triple> + 'a {
        self.triples.iter().filter(move |t| {
            subject.map_or(true, |s| &t.subject == s)
                && predicate.map_or(true, |p| t.predicate == p)
                && object.map_or(true, |o| &t.object == o)
        })
    }

    /// Whether `subject` has at least one `predicate` edge.
    pub fn has_edge(&self, subject: &Node, predicate: &str) -> bool {
        self.matching(Some(subject), Some(predicate), None)
            .next()
            .is_some()
    }

    pub fn objects<'a>(
        &'a self,
        subject: &'a Node,
        predicate: &'a str,
    ) -> impl Iterator<Item = &'a Object> + 'a {
        self.matching(Some(subject), Some(predicate), None)
            .map(|t| &t.object)
    }

    /// First object (in graph order) of `subject --predicate-->`.
    pub fn object(&self, subject: &Node, predicate: &str) -> Option<&Object> {
        self.triples
            .iter()
            .find(|t| &t.subject == subject && t.predicate == predicate)
            .map(|t| &t.object)
    }

    /// Distinct subjects carrying `rdf:type <type_iri>`, in graph order.
    pub fn subjects_with_type(&self, type_iri: &str) -> Vec<Node> {
        let ty = Object::iri(type_iri);
        let mut seen = HashSet::new();
        self.matching(None, Some(RDF_TYPE), Some(&ty))
            .filter(|t| seen.insert(t.subject.clone()))
            .map(|t| t.subject.clone())
            .collect()
    }

    /// Distinct subjects, in graph order.
    pub fn subjects(&self) -> Vec<&Node> {
        let mut seen = HashSet::new();
        self.triples
            .iter()
            .map(|t| &t.subject)
            .filter(|s| seen.insert(*s))
            .collect()
    }

    pub fn extend<I: IntoIterator<Item = Triple>>(&mut self, triples: I) {
        self.triples.extend(triples);
    }

    /// Set union of two graphs. Blank node labels are taken as-is.
    pub fn union(&self, other: &Graph) -> Graph {
        Graph {
            triples: self.triples.union(&other.triples).cloned().collect(),
        }
    }

    /// Labels of every blank node in subject or object position.
    pub fn blank_labels(&self) -> BTreeSet<&str> {
        let mut labels = BTreeSet::new();
        for t in &self.triples {
            if let Node::Blank(label) = &t.subject {
                labels.insert(label.as_str());
            }
            if let Object::Node(Node::Blank(label)) = &t.object {
                labels.insert(label.as_str());
            }
        }
        labels
    }

    /// Join `other` into a copy of this graph, renaming apart any of its
    /// blank nodes whose label is already used here.
    ///
    /// Renamed labels get a `_<n>` suffix (`n >= 2`) unused in either graph.
    pub fn merge(&self, other: &Graph) -> Graph {
        let ours = self.blank_labels();
        let theirs = other.blank_labels();
        let mut taken: HashSet<String> = ours.iter().chain(theirs.iter()).map(|l| l.to_string()).collect();

        let mut renames: HashMap<&str, String> = HashMap::new();
        for label in theirs.iter().filter(|l| ours.contains(*l)) {
            let mut n = 2;
            let fresh = loop {
                let candidate = format!("{label}_{n}");
                if !taken.contains(&candidate) {
                    break candidate;
                }
                n += 1;
            };
            taken.insert(fresh.clone());
            renames.insert(*label, fresh);
        }

        let rename = |node: &Node| match node {
            Node::Blank(label) => renames
                .get(label.as_str())
                .map(|fresh| Node::Blank(fresh.clone()))
                .unwrap_or_else(|| node.clone()),
            iri => iri.clone(),
        };

        let mut merged = self.clone();
        for t in &other.triples {
            merged.insert(Triple {
                subject: rename(&t.subject),
                predicate: t.predicate.clone(),
                object: match &t.object {
                    Object::Node(node) => Object::Node(rename(node)),
                    literal => literal.clone(),
                },
            });
        }
        merged
    }

    /// Members of the RDF collection starting at `head`, in list order.
    pub fn list_items(&self, head: &Object) -> Result<Vec<Object>> {
        let nil = Object::iri(RDF_NIL);
        let mut items = Vec::new();
        let mut visited: HashSet<&Node> = HashSet::new();
        let mut current = head;

        while current != &nil {
            let Object::Node(node) = current else {
                return Err(GraphError::MalformedList {
                    node: format!("{current:?}"),
                    reason: "list cell is a literal".to_string(),
                });
            };
            if !visited.insert(node) {
                return Err(GraphError::MalformedList {
                    node: node.to_string(),
                    reason: "cycle detected".to_string(),
                });
            }
            let first = self.object(node, RDF_FIRST).ok_or_else(|| GraphError::MalformedList {
                node: node.to_string(),
                reason: "missing rdf:first".to_string(),
            })?;
            items.push(first.clone());
            current = self.object(node, RDF_REST).ok_or_else(|| GraphError::MalformedList {
                node: node.to_string(),
                reason: "missing rdf:rest".to_string(),
            })?;
        }

        Ok(items)
    }

    /// Append an RDF collection holding `items` and return its head.
    ///
    /// Cells are blank nodes labelled `<label_prefix>_<index>`; an empty list
    /// is `rdf:nil`.
    pub fn add_list(&mut self, label_prefix: &str, items: &[Object]) -> Object {
        let mut rest = Object::iri(RDF_NIL);
        for (idx, item) in items.iter().enumerate().rev() {
            let cell = Node::blank(format!("{label_prefix}_{}", idx + 1));
            self.add(cell.clone(), RDF_FIRST, item.clone());
            self.add(cell.clone(), RDF_REST, rest);
            rest = Object::Node(cell);
        }
        rest
    }
}

impl FromIterator<Triple> for Graph {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        Graph {
            triples: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Graph {
    type Item = Triple;
    type IntoIter = std::collections::btree_set::IntoIter<Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.into_iter()
    }
}

impl<'a> IntoIterator for &'a Graph {
    type Item = &'a Triple;
    type IntoIter = std::collections::btree_set::Iter<'a, Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.iter()
    }
}
