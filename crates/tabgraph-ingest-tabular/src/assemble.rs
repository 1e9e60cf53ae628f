//! Output assembly: table metadata plus row edges, merged with the input.
//!
//! Blank node labels are derived from a digest of the source locator, so the
//! same input always yields the same graph.

use tabgraph_graph::digest::fnv1a64_hex;
use tabgraph_graph::vocab::{csvw, RDF_TYPE, XSD_INTEGER};
use tabgraph_graph::{Graph, Literal, Node, Object};

use crate::config::OutputMode;
use crate::model::{Row, TableSchema};

pub struct OutputAssembler {
    mode: OutputMode,
    label_prefix: String,
    table: Node,
    graph: Graph,
}

impl OutputAssembler {
    pub fn new(mode: OutputMode, source_locator: &str, table_id: Option<&str>) -> Self {
        let label_prefix = format!("t{}", fnv1a64_hex(source_locator.as_bytes()));
        let table = match table_id {
            Some(id) => Node::iri(id),
            None => Node::blank(format!("{label_prefix}_table")),
        };
        Self {
            mode,
            label_prefix,
            table,
            graph: Graph::new(),
        }
    }

    fn blank(&self, suffix: &str) -> Node {
        Node::blank(format!("{}_{suffix}", self.label_prefix))
    }

    fn standard(&self) -> bool {
        self.mode == OutputMode::Standard
    }

    /// Table group and table nodes.
    pub fn begin_table(&mut self, group_id: Option<&str>, url: &str) {
        if !self.standard() {
            return;
        }
        let group = match group_id {
            Some(id) => Node::iri(id),
            None => self.blank("group"),
        };
        let table = self.table.clone();
        self.graph.add(group.clone(), RDF_TYPE, Object::iri(csvw::TABLE_GROUP));
        self.graph.add(group, csvw::TABLE_PROP, Object::Node(table.clone()));
        self.graph.add(table.clone(), RDF_TYPE, Object::iri(csvw::TABLE));
        self.graph.add(table, csvw::URL, Object::iri(url));
    }

    pub fn add_schema(&mut self, schema: &TableSchema) {
        if !self.standard() {
            return;
        }
        let node = self.blank("schema");
        self.graph
            .add(self.table.clone(), csvw::TABLE_SCHEMA_PROP, Object::Node(node.clone()));
        self.graph
            .add(node.clone(), RDF_TYPE, Object::iri(csvw::TABLE_SCHEMA));
        self.graph.add(
            node.clone(),
            csvw::ABOUT_URL,
            Object::plain(schema.about_url.as_str()),
        );

        let mut members = Vec::with_capacity(schema.columns.len());
        for (idx, column) in schema.columns.iter().enumerate() {
            let col = self.blank(&format!("col{}", idx + 1));
            self.graph
                .add(node.clone(), csvw::COLUMN_PROP, Object::Node(col.clone()));
            self.graph.add(col.clone(), RDF_TYPE, Object::iri(csvw::COLUMN));
            self.graph
                .add(col.clone(), csvw::NAME, Object::plain(column.name.as_str()));
            self.graph
                .add(col.clone(), csvw::TITLE, Object::plain(column.title.as_str()));
            self.graph.add(
                col.clone(),
                csvw::PROPERTY_URL,
                Object::iri(column.property_url.as_str()),
            );
            if let Some(about) = &column.about_url {
                self.graph
                    .add(col.clone(), csvw::ABOUT_URL, Object::plain(about.as_str()));
            }
            if let Some(value) = &column.value_url {
                self.graph
                    .add(col.clone(), csvw::VALUE_URL, Object::plain(value.as_str()));
            }
            members.push(Object::Node(col));
        }

        let list_prefix = format!("{}_columns", self.label_prefix);
        let head = self.graph.add_list(&list_prefix, &members);
        self.graph.add(node, csvw::COLUMNS, head);
    }

    pub fn add_row(&mut self, row: Row) {
        if self.standard() {
            let node = self.blank(&format!("row{}", row.number));
            self.graph
                .add(self.table.clone(), csvw::ROW_PROP, Object::Node(node.clone()));
            self.graph.add(node.clone(), RDF_TYPE, Object::iri(csvw::ROW));
            self.graph.add(
                node.clone(),
                csvw::ROWNUM,
                Object::Literal(Literal::typed(row.number.to_string(), XSD_INTEGER)),
            );
            self.graph.add(node.clone(), csvw::URL, Object::iri(row.url));
            for subject in row.describes {
                self.graph
                    .add(node.clone(), csvw::DESCRIBES, Object::Node(subject));
            }
        }
        self.graph.extend(row.edges);
    }

    /// Triples produced so far.
    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    /// The produced graph alone (`replace`) or merged into `input`, with its
    /// blank nodes renamed apart from the input's.
    pub fn finish(self, input: &Graph, replace: bool) -> Graph {
        if replace {
            self.graph
        } else {
            input.merge(&self.graph)
        }
    }
}
