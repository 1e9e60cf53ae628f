use std::collections::BTreeSet;

use tabgraph_graph::vocab::csvw;
use tabgraph_graph::{is_isomorphic, parse_graph, Graph, Node, Object, RdfFormat};
use tabgraph_ingest_tabular::{
    ErrorPolicy, OutputMode, SchemaOrigin, StreamResource, StreamResourceRegistry,
    TabularConfig, TabularError, TabularModule, TabularOutcome,
};

const SOURCE: &str = "http://example.org/people.csv";
const PREFIX: &str = "http://x/";

fn config() -> TabularConfig {
    TabularConfig::new(SOURCE, PREFIX)
        .with_delimiter(',')
        .with_replace(true)
}

fn registry(text: &str) -> StreamResourceRegistry {
    let mut registry = StreamResourceRegistry::new();
    registry.register(StreamResource::from_text(SOURCE, text));
    registry
}

fn convert(config: TabularConfig, text: &str, input: &Graph) -> tabgraph_ingest_tabular::Result<TabularOutcome> {
    TabularModule::new(config).execute(input, &registry(text))
}

fn turtle(text: &str) -> Graph {
    parse_graph(text.as_bytes(), RdfFormat::Turtle).unwrap()
}

fn row_subjects(graph: &Graph) -> BTreeSet<Node> {
    graph
        .matching(None, Some(csvw::DESCRIBES), None)
        .filter_map(|t| t.object.as_node().cloned())
        .collect()
}

const PREAMBLE: &str = r#"
@prefix csvw: <http://www.w3.org/ns/csvw#> .
@prefix ex: <http://example.org/> .
"#;

#[test]
fn header_rows_become_one_subject_per_row() {
    let out = convert(config(), "a,b\n1,2\n3,4\n", &Graph::new()).unwrap();
    let g = &out.graph;

    let subjects = row_subjects(g);
    assert_eq!(subjects.len(), 2);

    let row1 = Node::iri(format!("{SOURCE}#row-1"));
    let row2 = Node::iri(format!("{SOURCE}#row-2"));
    assert_eq!(g.object(&row1, "http://x/a"), Some(&Object::plain("1")));
    assert_eq!(g.object(&row1, "http://x/b"), Some(&Object::plain("2")));
    assert_eq!(g.object(&row2, "http://x/a"), Some(&Object::plain("3")));
    assert_eq!(g.object(&row2, "http://x/b"), Some(&Object::plain("4")));

    let rows = g.subjects_with_type(csvw::ROW);
    assert_eq!(rows.len(), 2);
    let urls: BTreeSet<&str> = rows
        .iter()
        .filter_map(|r| g.object(r, csvw::URL).and_then(Object::text))
        .collect();
    assert_eq!(
        urls,
        BTreeSet::from([
            "http://example.org/people.csv#row=2",
            "http://example.org/people.csv#row=3"
        ])
    );
    assert_eq!(out.report.rows, 2);
    assert!(out.report.is_clean());
}

#[test]
fn synthesized_schema_prefixes_every_column() {
    let out = convert(config(), "id,first name,e-mail\n1,Ada,ada@x\n", &Graph::new()).unwrap();
    let schema = out.table_group.table.schema.as_ref().unwrap();
    assert_eq!(schema.origin, SchemaOrigin::Synthesized);
    let urls: Vec<&str> = schema.columns.iter().map(|c| c.property_url.as_str()).collect();
    assert_eq!(urls, vec!["http://x/id", "http://x/first_name", "http://x/e_mail"]);

    let schema_node = out.graph.subjects_with_type(csvw::TABLE_SCHEMA).remove(0);
    let head = out.graph.object(&schema_node, csvw::COLUMNS).unwrap();
    assert_eq!(out.graph.list_items(head).unwrap().len(), 3);
}

#[test]
fn repeated_runs_produce_identical_graphs() {
    let text = "a,b\n1,2\n3,\n";
    let first = convert(config(), text, &Graph::new()).unwrap();
    let second = convert(config(), text, &Graph::new()).unwrap();
    assert_eq!(first.graph, second.graph);
    assert!(is_isomorphic(&first.graph, &second.graph));
}

#[test]
fn colliding_titles_are_fatal_even_when_continuing() {
    let cfg = config().with_error_policy(ErrorPolicy::Continue);
    let err = convert(cfg, "lat-x,lat x\n1,2\n", &Graph::new()).unwrap_err();
    match err {
        TabularError::DuplicateColumnName {
            first_title,
            second_title,
            name,
            property_url,
        } => {
            assert_eq!(first_title, "lat-x");
            assert_eq!(second_title, "lat x");
            assert_eq!(name, "lat_x");
            assert_eq!(property_url, "http://x/lat_x");
        }
        other => panic!("expected duplicate column error, got {other:?}"),
    }
}

#[test]
fn case_differences_do_not_collide() {
    let out = convert(config(), "lat,Lat!\n1,2\n", &Graph::new()).unwrap();
    let row = Node::iri(format!("{SOURCE}#row-1"));
    assert_eq!(out.graph.object(&row, "http://x/lat"), Some(&Object::plain("1")));
    assert_eq!(out.graph.object(&row, "http://x/Lat_"), Some(&Object::plain("2")));
}

fn three_column_schema() -> Graph {
    turtle(&format!(
        "{PREAMBLE}
        ex:schema a csvw:TableSchema ;
            csvw:column ex:a, ex:b, ex:c .
        ex:a csvw:name \"a\" .
        ex:b csvw:name \"b\" .
        ex:c csvw:name \"c\" .
        "
    ))
}

#[test]
fn schema_wider_than_data_aborts() {
    let err = convert(config(), "a,b\n1,2\n", &three_column_schema()).unwrap_err();
    assert_eq!(
        err,
        TabularError::SchemaColumnCountMismatch {
            schema_columns: 3,
            data_columns: 2
        }
    );
}

#[test]
fn schema_wider_than_data_is_reported_when_continuing() {
    let cfg = config().with_error_policy(ErrorPolicy::Continue);
    let out = convert(cfg, "a,b\n1,2\n", &three_column_schema()).unwrap();
    assert_eq!(out.report.defects.len(), 1);
    assert!(matches!(
        out.report.defects[0],
        TabularError::SchemaColumnCountMismatch { .. }
    ));
    let row = Node::iri(format!("{SOURCE}#row-1"));
    assert_eq!(out.graph.object(&row, "http://x/b"), Some(&Object::plain("2")));
}

#[test]
fn unknown_header_column_is_missing_from_schema() {
    let cfg = config().with_error_policy(ErrorPolicy::Continue);
    let out = convert(cfg, "a,b,zzz\n1,2,3\n", &three_column_schema()).unwrap();
    assert_eq!(
        out.report.defects,
        vec![TabularError::SchemaColumnMissing {
            name: "zzz".to_string(),
            title: "zzz".to_string()
        }]
    );
    let row = Node::iri(format!("{SOURCE}#row-1"));
    assert_eq!(out.graph.object(&row, "http://x/zzz"), Some(&Object::plain("3")));
}

#[test]
fn headerless_data_follows_the_schema_order() {
    let schema = turtle(&format!(
        "{PREAMBLE}
        ex:schema a csvw:TableSchema ;
            csvw:aboutUrl \"http://example.org/person/{{_row}}\" ;
            csvw:column ex:c1, ex:c2, ex:c3, ex:c4, ex:c5 ;
            csvw:columns (ex:c1 ex:c2 ex:c3 ex:c4 ex:c5) .
        ex:c1 csvw:name \"id\" .
        ex:c2 csvw:name \"given\" ; csvw:propertyUrl <http://xmlns.com/foaf/0.1/givenName> .
        ex:c3 csvw:name \"family\" .
        ex:c4 csvw:name \"age\" .
        ex:c5 csvw:name \"city\" ;
            csvw:valueUrl \"http://example.org/city/{{_row}}\" .
        "
    ));
    let data = "1,Ada,Lovelace,36,London\n2,Alan,Turing,41,Wilmslow\n3,Grace,Hopper,85,\n";
    let cfg = config().with_skip_header(true);
    let out = convert(cfg, data, &schema).unwrap();
    let g = &out.graph;

    let subjects = row_subjects(g);
    assert_eq!(subjects.len(), 3);
    for subject in &subjects {
        let predicates: BTreeSet<&str> = g
            .matching(Some(subject), None, None)
            .map(|t| t.predicate.as_str())
            .collect();
        assert_eq!(
            predicates,
            BTreeSet::from([
                "http://x/id",
                "http://xmlns.com/foaf/0.1/givenName",
                "http://x/family",
                "http://x/age",
                "http://x/city",
            ])
        );
    }

    let first = Node::iri("http://example.org/person/1");
    assert_eq!(g.object(&first, "http://x/id"), Some(&Object::plain("1")));
    let third = Node::iri("http://example.org/person/3");
    assert_eq!(
        g.object(&third, "http://x/city"),
        Some(&Object::iri("http://example.org/city/3"))
    );

    let row_urls: BTreeSet<&str> = g
        .subjects_with_type(csvw::ROW)
        .iter()
        .filter_map(|r| g.object(r, csvw::URL).and_then(Object::text))
        .collect();
    assert!(row_urls.contains("http://example.org/people.csv#row=1"));
    assert!(out.report.defects.is_empty());
    assert_eq!(
        out.table_group.table.schema.as_ref().unwrap().origin,
        SchemaOrigin::External
    );
}

#[test]
fn empty_input_only_describes_the_table() {
    let out = convert(config(), "", &Graph::new()).unwrap();
    assert!(row_subjects(&out.graph).is_empty());
    assert_eq!(out.graph.subjects_with_type(csvw::TABLE_GROUP).len(), 1);
    assert_eq!(out.graph.subjects_with_type(csvw::TABLE).len(), 1);
    assert!(out.graph.subjects_with_type(csvw::TABLE_SCHEMA).is_empty());
    assert_eq!(out.graph.len(), 4);
    assert_eq!(out.report.warnings.len(), 1);
    assert_eq!(out.report.rows, 0);
    assert!(out.table_group.table.schema.is_none());
}

#[test]
fn union_keeps_the_input_graph() {
    let input = three_column_schema();
    let cfg = config().with_replace(false);
    let out = convert(cfg, "a,b,c\n1,2,3\n", &input).unwrap();
    assert!(input.iter().all(|t| out.graph.contains(t)));
    assert_eq!(out.graph.len(), input.len() + out.report.triples);

    let replaced = convert(config(), "a,b,c\n1,2,3\n", &input).unwrap();
    assert!(!input.iter().any(|t| replaced.graph.contains(t)));
}

#[test]
fn headerless_data_follows_schema_order_verbatim() {
    let input = turtle(&format!(
        "{PREAMBLE}
        @prefix foaf: <http://xmlns.com/foaf/0.1/> .
        ex:schema a csvw:TableSchema ;
            csvw:column ex:c1, ex:c2 ;
            csvw:columns (ex:c1 ex:c2) .
        ex:c1 csvw:name \"given name\" ; csvw:propertyUrl foaf:givenName .
        ex:c2 csvw:name \"age\" .
        "
    ));
    let out = convert(config().with_skip_header(true), "Ada,36\n", &input).unwrap();
    assert!(out.report.is_clean());

    let row = Node::iri(format!("{SOURCE}#row-1"));
    assert_eq!(
        out.graph.object(&row, "http://xmlns.com/foaf/0.1/givenName"),
        Some(&Object::plain("Ada"))
    );
    assert_eq!(out.graph.object(&row, "http://x/age"), Some(&Object::plain("36")));
}

#[test]
fn rerunning_over_earlier_output_keeps_both_tables() {
    let first = convert(config(), "a,b\n1,2\n", &Graph::new()).unwrap();
    let second = convert(config().with_replace(false), "a,b\n1,2\n", &first.graph).unwrap();
    let g = &second.graph;

    // Same source, same blank labels: the new table must not fold into the old one.
    assert_eq!(g.subjects_with_type(csvw::TABLE).len(), 2);
    assert_eq!(g.subjects_with_type(csvw::TABLE_SCHEMA).len(), 2);
    assert_eq!(g.subjects_with_type(csvw::ROW).len(), 2);
    assert!(first.graph.iter().all(|t| g.contains(t)));
}

#[test]
fn several_schemas_fall_back_to_the_header() {
    let input = turtle(&format!(
        "{PREAMBLE}
        ex:s1 a csvw:TableSchema ; csvw:column ex:only .
        ex:only csvw:name \"only\" .
        ex:s2 a csvw:TableSchema .
        "
    ));
    let out = convert(config(), "a,b\n1,2\n", &input).unwrap();
    assert_eq!(out.report.warnings.len(), 1);
    assert!(out.report.defects.is_empty());
    let row = Node::iri(format!("{SOURCE}#row-1"));
    assert_eq!(out.graph.object(&row, "http://x/a"), Some(&Object::plain("1")));
}

#[test]
fn minimal_mode_emits_cell_edges_only() {
    let cfg = config().with_output_mode(OutputMode::Minimal);
    let out = convert(cfg, "a,b\n1,2\n3,\n", &Graph::new()).unwrap();
    assert_eq!(out.graph.len(), 3);
    assert!(out.graph.subjects_with_type(csvw::ROW).is_empty());
}

#[test]
fn ragged_rows_abort_or_are_reported() {
    let err = convert(config(), "a,b\n1,2\n3\n", &Graph::new()).unwrap_err();
    assert_eq!(
        err,
        TabularError::RowWidthMismatch {
            row: 2,
            expected: 2,
            actual: 1
        }
    );

    let cfg = config().with_error_policy(ErrorPolicy::Continue);
    let out = convert(cfg, "a,b\n1,2\n3\n", &Graph::new()).unwrap();
    assert_eq!(out.report.rows, 2);
    assert_eq!(out.report.defects.len(), 1);
}

#[test]
fn empty_row_is_still_described() {
    let out = convert(config(), "a,b\n1,2\n,\n", &Graph::new()).unwrap();
    let g = &out.graph;
    let rows = g.subjects_with_type(csvw::ROW);
    assert_eq!(rows.len(), 2);
    for row in &rows {
        assert_eq!(g.objects(row, csvw::DESCRIBES).count(), 1);
    }
    let second = Node::iri(format!("{SOURCE}#row-2"));
    assert!(g.matching(Some(&second), None, None).next().is_none());
}

#[test]
fn read_failure_keeps_rows_already_mapped() {
    let mut registry = StreamResourceRegistry::new();
    registry.register(StreamResource::new(SOURCE, b"a\n1\n\xff\n2\n".to_vec()));
    let out = TabularModule::new(config())
        .execute(&Graph::new(), &registry)
        .unwrap();
    assert_eq!(out.report.rows, 1);
    assert!(matches!(
        out.report.defects.as_slice(),
        [TabularError::ReadFailure { rows_read: 1, .. }]
    ));
    assert_eq!(row_subjects(&out.graph).len(), 1);
}

#[test]
fn missing_resource_is_fatal() {
    let cfg = TabularConfig::new("http://example.org/other.csv", PREFIX);
    let err = TabularModule::new(cfg)
        .execute(&Graph::new(), &registry("a\n1\n"))
        .unwrap_err();
    assert!(matches!(err, TabularError::ResourceNotFound { .. }));
}

#[test]
fn tab_is_the_default_delimiter() {
    let cfg = TabularConfig::new(SOURCE, PREFIX);
    let out = convert(cfg, "a\tb\n1\t2\n", &Graph::new()).unwrap();
    let row = Node::iri(format!("{SOURCE}#row-1"));
    assert_eq!(out.graph.object(&row, "http://x/b"), Some(&Object::plain("2")));
}
