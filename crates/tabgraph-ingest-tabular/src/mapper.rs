//! Row mapping: one data record -> one [`Row`] with its cell edges.

use tabgraph_graph::{Node, Object, Triple};

use crate::checker::report_defect;
use crate::config::ErrorPolicy;
use crate::error::{Result, TabularError};
use crate::model::{Row, TableSchema};
use crate::template::{row_number, source_line};

pub struct RowMapper<'a> {
    schema: &'a TableSchema,
    source_locator: &'a str,
    header_consumed: bool,
    policy: ErrorPolicy,
}

impl<'a> RowMapper<'a> {
    pub fn new(
        schema: &'a TableSchema,
        source_locator: &'a str,
        header_consumed: bool,
        policy: ErrorPolicy,
    ) -> Self {
        Self {
            schema,
            source_locator,
            header_consumed,
            policy,
        }
    }

    /// Map the data record at 0-based `position`.
    ///
    /// Missing trailing cells are null and surplus cells are dropped; either
    /// case is first reported as [`TabularError::RowWidthMismatch`].
    pub fn map_row(
        &self,
        position: usize,
        cells: &[Option<String>],
        defects: &mut Vec<TabularError>,
    ) -> Result<Row> {
        let number = row_number(position);
        let expected = self.schema.len();
        if cells.len() != expected {
            report_defect(
                self.policy,
                TabularError::RowWidthMismatch {
                    row: number,
                    expected,
                    actual: cells.len(),
                },
                defects,
            )?;
        }

        let mut row = Row {
            number,
            url: format!(
                "{}#row={}",
                self.source_locator,
                source_line(number, self.header_consumed)
            ),
            describes: Vec::new(),
            edges: Vec::with_capacity(expected),
        };

        for (idx, column) in self.schema.columns.iter().enumerate() {
            let subject = Node::iri(column.subject_template(self.schema).expand(number));
            let cell = cells.get(idx).and_then(|c| c.as_deref());

            if !row.describes.contains(&subject) {
                row.describes.push(subject.clone());
            }

            let value = match (&column.value_url, cell) {
                (Some(template), _) => Object::iri(template.expand(number)),
                (None, Some(text)) => Object::plain(text),
                (None, None) => continue,
            };
            row.edges
                .push(Triple::new(subject, column.property_url.as_str(), value));
        }

        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Column, SchemaOrigin};
    use crate::reader::Record;
    use crate::template::UrlTemplate;

    fn column(name: &str) -> Column {
        Column {
            name: name.to_string(),
            title: name.to_string(),
            about_url: None,
            property_url: format!("http://x/{name}"),
            value_url: None,
        }
    }

    fn schema(columns: Vec<Column>) -> TableSchema {
        TableSchema {
            columns,
            about_url: UrlTemplate::default_about("http://x/t.csv"),
            origin: SchemaOrigin::Synthesized,
        }
    }

    fn cells(values: &[Option<&str>]) -> Record {
        values.iter().map(|v| v.map(str::to_string)).collect()
    }

    #[test]
    fn emits_one_edge_per_non_null_cell() {
        let schema = schema(vec![column("a"), column("b")]);
        let mapper = RowMapper::new(&schema, "http://x/t.csv", true, ErrorPolicy::Abort);
        let row = mapper
            .map_row(0, &cells(&[Some("1"), None]), &mut Vec::new())
            .unwrap();

        assert_eq!(row.number, 1);
        assert_eq!(row.url, "http://x/t.csv#row=2");
        assert_eq!(row.describes, vec![Node::iri("http://x/t.csv#row-1")]);
        assert_eq!(
            row.edges,
            vec![Triple::new(
                Node::iri("http://x/t.csv#row-1"),
                "http://x/a",
                Object::plain("1")
            )]
        );
    }

    #[test]
    fn all_null_row_still_describes_its_subjects() {
        let mut other = column("b");
        other.about_url = Some(UrlTemplate::new("http://x/thing/{_row}"));
        let schema = schema(vec![column("a"), other]);
        let mapper = RowMapper::new(&schema, "http://x/t.csv", true, ErrorPolicy::Abort);
        let row = mapper.map_row(1, &cells(&[None, None]), &mut Vec::new()).unwrap();

        assert!(row.edges.is_empty());
        assert_eq!(
            row.describes,
            vec![
                Node::iri("http://x/t.csv#row-2"),
                Node::iri("http://x/thing/2")
            ]
        );
    }

    #[test]
    fn headerless_rows_point_at_their_own_line() {
        let schema = schema(vec![column("a")]);
        let mapper = RowMapper::new(&schema, "http://x/t.csv", false, ErrorPolicy::Abort);
        let row = mapper.map_row(2, &cells(&[Some("v")]), &mut Vec::new()).unwrap();
        assert_eq!(row.number, 3);
        assert_eq!(row.url, "http://x/t.csv#row=3");
    }

    #[test]
    fn value_url_makes_iri_objects_even_for_null_cells() {
        let mut linked = column("owner");
        linked.value_url = Some(UrlTemplate::new("http://x/people/{_row}"));
        let schema = schema(vec![linked]);
        let mapper = RowMapper::new(&schema, "http://x/t.csv", true, ErrorPolicy::Abort);
        let row = mapper.map_row(4, &cells(&[None]), &mut Vec::new()).unwrap();
        assert_eq!(row.edges[0].object, Object::iri("http://x/people/5"));
    }

    #[test]
    fn column_about_url_adds_a_described_subject() {
        let mut other = column("b");
        other.about_url = Some(UrlTemplate::new("http://x/thing/{_row}"));
        let schema = schema(vec![column("a"), other]);
        let mapper = RowMapper::new(&schema, "http://x/t.csv", true, ErrorPolicy::Abort);
        let row = mapper
            .map_row(0, &cells(&[Some("1"), Some("2")]), &mut Vec::new())
            .unwrap();
        assert_eq!(
            row.describes,
            vec![
                Node::iri("http://x/t.csv#row-1"),
                Node::iri("http://x/thing/1")
            ]
        );
    }

    #[test]
    fn ragged_rows_follow_policy() {
        let schema = schema(vec![column("a"), column("b")]);
        let short = cells(&[Some("1")]);

        let abort = RowMapper::new(&schema, "http://x/t.csv", true, ErrorPolicy::Abort);
        assert_eq!(
            abort.map_row(0, &short, &mut Vec::new()).unwrap_err(),
            TabularError::RowWidthMismatch {
                row: 1,
                expected: 2,
                actual: 1
            }
        );

        let keep_going = RowMapper::new(&schema, "http://x/t.csv", true, ErrorPolicy::Continue);
        let mut defects = Vec::new();
        let row = keep_going.map_row(0, &short, &mut defects).unwrap();
        assert_eq!(row.edges.len(), 1);
        let long = cells(&[Some("1"), Some("2"), Some("3")]);
        let row = keep_going.map_row(1, &long, &mut defects).unwrap();
        assert_eq!(row.edges.len(), 2);
        assert_eq!(defects.len(), 2);
    }
}
