use proptest::prelude::*;
use std::io::Write;
use tabgraph_graph::vocab::{csvw, RDF_TYPE};
use tabgraph_graph::{
    is_isomorphic, parse_graph, parse_graph_file, to_ntriples, to_turtle, Graph, Node, Object,
    RdfFormat,
};

const SCHEMA_TTL: &str = r#"
@prefix csvw: <http://www.w3.org/ns/csvw#> .

[] a csvw:TableSchema ;
   csvw:aboutUrl "http://example.org/people#row-{_row}" ;
   csvw:column _:c1, _:c2 ;
   csvw:columns ( _:c1 _:c2 ) .

_:c1 a csvw:Column ; csvw:name "first" ; csvw:title "First name" .
_:c2 a csvw:Column ; csvw:name "age" ;
     csvw:propertyUrl <http://xmlns.com/foaf/0.1/age> .
"#;

#[test]
fn turtle_schema_lists_are_readable() {
    let g = parse_graph(SCHEMA_TTL.as_bytes(), RdfFormat::Turtle).expect("parse");
    let schemas = g.subjects_with_type(csvw::TABLE_SCHEMA);
    assert_eq!(schemas.len(), 1);
    let schema = &schemas[0];

    let head = g.object(schema, csvw::COLUMNS).expect("columns list");
    let items = g.list_items(head).expect("well-formed list");
    assert_eq!(items.len(), 2);

    let names: Vec<&str> = items
        .iter()
        .map(|item| {
            let node = item.as_node().expect("column node");
            g.object(node, csvw::NAME).and_then(Object::text).expect("name")
        })
        .collect();
    assert_eq!(names, vec!["first", "age"]);

    let age = items[1].as_node().unwrap();
    assert_eq!(
        g.object(age, csvw::PROPERTY_URL),
        Some(&Object::iri("http://xmlns.com/foaf/0.1/age"))
    );
}

#[test]
fn graph_file_format_follows_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schema.ttl");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(SCHEMA_TTL.as_bytes()).unwrap();

    let g = parse_graph_file(&path).expect("parse file");
    assert!(!g.is_empty());

    let bad = dir.path().join("schema.owl");
    std::fs::write(&bad, SCHEMA_TTL).unwrap();
    assert!(parse_graph_file(&bad).is_err());
}

#[test]
fn written_turtle_reparses_to_an_isomorphic_graph() {
    let original = parse_graph(SCHEMA_TTL.as_bytes(), RdfFormat::Turtle).unwrap();
    let ttl = to_turtle(&original);
    let reparsed = parse_graph(ttl.as_bytes(), RdfFormat::Turtle).unwrap();
    assert!(is_isomorphic(&original, &reparsed));
}

#[test]
fn relabelled_blank_nodes_still_match() {
    let mut a = Graph::new();
    a.add(Node::blank("t"), RDF_TYPE, Object::iri(csvw::TABLE));
    a.add(Node::blank("t"), csvw::URL, Object::iri("http://example.org/a.csv"));
    let mut b = Graph::new();
    b.add(Node::blank("other"), RDF_TYPE, Object::iri(csvw::TABLE));
    b.add(Node::blank("other"), csvw::URL, Object::iri("http://example.org/a.csv"));
    assert!(is_isomorphic(&a, &b));
}

proptest! {
    #[test]
    fn arbitrary_cell_text_survives_ntriples(text in "\\PC*") {
        let mut g = Graph::new();
        g.add(Node::iri("http://example.org/row-1"), "http://example.org/p", Object::plain(text.clone()));
        let nt = to_ntriples(&g);
        let reparsed = parse_graph(nt.as_bytes(), RdfFormat::NTriples).unwrap();
        prop_assert_eq!(reparsed, g);
    }
}
