//! Tabular data model: table group, table, schema, columns and rows.

use serde::{Deserialize, Serialize};
use tabgraph_graph::{Node, Triple};

use crate::template::UrlTemplate;

/// Where a table schema came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaOrigin {
    /// Discovered in the input graph.
    External,
    /// Built from the header row (or positional titles).
    Synthesized,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Normalized name, unique within the schema.
    pub name: String,
    /// Title as written in the header (or taken from the schema).
    pub title: String,
    /// Overrides the schema-level subject template for this column.
    pub about_url: Option<UrlTemplate>,
    pub property_url: String,
    /// When set, cells of this column become IRI references.
    pub value_url: Option<UrlTemplate>,
}

impl Column {
    /// Subject template for this column's cells.
    pub fn subject_template<'a>(&'a self, schema: &'a TableSchema) -> &'a UrlTemplate {
        self.about_url.as_ref().unwrap_or(&schema.about_url)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Columns in data order.
    pub columns: Vec<Column>,
    pub about_url: UrlTemplate,
    pub origin: SchemaOrigin,
}

impl TableSchema {
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Source locator of the data.
    pub url: String,
    pub id: Option<String>,
    /// Absent when the input held no records.
    pub schema: Option<TableSchema>,
    pub row_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableGroup {
    pub id: Option<String>,
    pub table: Table,
}

/// One mapped data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// 1-based data row number.
    pub number: usize,
    /// `<source>#row=<line>`.
    pub url: String,
    /// Distinct subjects the row's cells were attached to, in column order.
    pub describes: Vec<Node>,
    pub edges: Vec<Triple>,
}
