//! Table schemas declared in the input graph.
//!
//! Every subject typed `csvw:TableSchema` is a candidate. Its columns come
//! from the unordered `csvw:column` edges and the ordered `csvw:columns` list;
//! column properties may be written as IRIs or as literals.

use std::collections::BTreeSet;

use tabgraph_graph::vocab::csvw;
use tabgraph_graph::{Graph, Node, Object};
use tracing::{debug, warn};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalColumn {
    pub node: Node,
    pub name: Option<String>,
    pub title: Option<String>,
    pub about_url: Option<String>,
    pub property_url: Option<String>,
    pub value_url: Option<String>,
}

impl ExternalColumn {
    fn read(graph: &Graph, node: Node) -> Self {
        Self {
            name: text_value(graph, &node, csvw::NAME),
            title: text_value(graph, &node, csvw::TITLE),
            about_url: text_value(graph, &node, csvw::ABOUT_URL),
            property_url: text_value(graph, &node, csvw::PROPERTY_URL),
            value_url: text_value(graph, &node, csvw::VALUE_URL),
            node,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalSchema {
    pub node: Node,
    pub about_url: Option<String>,
    /// All declared columns: the `csvw:column` set followed by any list
    /// members not already in it.
    pub columns: Vec<ExternalColumn>,
    /// Column order from `csvw:columns`, as indices into `columns`.
    pub order: Option<Vec<usize>>,
}

impl ExternalSchema {
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Columns in declared order, when the schema gives one.
    pub fn ordered_columns(&self) -> Option<Vec<&ExternalColumn>> {
        self.order
            .as_ref()
            .map(|order| order.iter().map(|&i| &self.columns[i]).collect())
    }

    /// Match a normalized data column name against the schema.
    ///
    /// A column whose `csvw:name` equals `name` wins; otherwise an unnamed
    /// column at the same position (in declared order if known) is used.
    pub fn find_column(&self, name: &str, position: usize) -> Option<&ExternalColumn> {
        if let Some(col) = self
            .columns
            .iter()
            .find(|c| c.name.as_deref() == Some(name))
        {
            return Some(col);
        }
        let positional = match self.ordered_columns() {
            Some(ordered) => ordered.get(position).copied(),
            None => self.columns.get(position),
        };
        positional.filter(|c| c.name.is_none())
    }
}

fn text_value(graph: &Graph, node: &Node, predicate: &str) -> Option<String> {
    graph
        .object(node, predicate)
        .and_then(Object::text)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Read every `csvw:TableSchema` in the graph.
pub fn discover_schemas(graph: &Graph) -> Result<Vec<ExternalSchema>> {
    let mut schemas = Vec::new();
    for node in graph.subjects_with_type(csvw::TABLE_SCHEMA) {
        schemas.push(read_schema(graph, node)?);
    }
    Ok(schemas)
}

fn read_schema(graph: &Graph, node: Node) -> Result<ExternalSchema> {
    let mut seen: BTreeSet<Node> = BTreeSet::new();
    let mut columns = Vec::new();

    for object in graph.objects(&node, csvw::COLUMN_PROP) {
        if let Some(col) = object.as_node() {
            if seen.insert(col.clone()) {
                columns.push(ExternalColumn::read(graph, col.clone()));
            }
        }
    }

    let order = match graph.object(&node, csvw::COLUMNS) {
        Some(head) => {
            let mut order = Vec::new();
            for item in graph.list_items(head)? {
                let Some(col) = item.as_node() else {
                    continue;
                };
                if seen.insert(col.clone()) {
                    columns.push(ExternalColumn::read(graph, col.clone()));
                }
                if let Some(idx) = columns.iter().position(|c| &c.node == col) {
                    order.push(idx);
                }
            }
            Some(order)
        }
        None => None,
    };

    let schema = ExternalSchema {
        about_url: text_value(graph, &node, csvw::ABOUT_URL),
        node,
        columns,
        order,
    };
    debug!(
        schema = %schema.node,
        columns = schema.columns.len(),
        ordered = schema.order.is_some(),
        "discovered table schema"
    );
    Ok(schema)
}

/// The single schema to use, or `None` when there are none or several.
///
/// Several candidates are ambiguous: a warning is pushed and all of them are
/// ignored.
pub fn select_schema(graph: &Graph, warnings: &mut Vec<String>) -> Result<Option<ExternalSchema>> {
    let mut schemas = discover_schemas(graph)?;
    match schemas.len() {
        0 => {
            debug!("no table schema in input graph, synthesizing one from the data");
            Ok(None)
        }
        1 => Ok(schemas.pop()),
        n => {
            let message =
                format!("input graph declares {n} table schemas; ignoring all of them");
            warn!("{message}");
            warnings.push(message);
            Ok(None)
        }
    }
}
