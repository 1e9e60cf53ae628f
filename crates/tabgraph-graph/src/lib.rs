//! Tabgraph graph model.
//!
//! A small, dependency-light labelled-edge graph:
//!
//! - nodes are IRIs (global) or blank nodes (scoped to one graph),
//! - edges are `(subject, predicate, object)` triples whose object may also be
//!   a literal,
//! - a [`Graph`] is an ordered set of triples, so output is deterministic.
//!
//! RDF serializations are handled at the boundary: [`parse`] reads Turtle and
//! N-Triples through Sophia, [`write`] emits N-Triples and Turtle.

pub mod digest;
pub mod error;
pub mod graph;
pub mod iso;
pub mod parse;
pub mod term;
pub mod vocab;
pub mod write;

pub use error::{GraphError, Result};
pub use graph::Graph;
pub use iso::is_isomorphic;
pub use parse::{parse_graph, parse_graph_file, RdfFormat};
pub use term::{Literal, Node, Object, Triple};
pub use write::{serialize, to_ntriples, to_turtle, OutputFormat};
