//! Vocabulary IRIs used by the tabular conversion.

pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const RDF_FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
pub const RDF_REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
pub const RDF_NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";

pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";

/// CSV on the Web vocabulary (`csvw:`).
pub mod csvw {
    pub const NS: &str = "http://www.w3.org/ns/csvw#";

    pub const TABLE_GROUP: &str = "http://www.w3.org/ns/csvw#TableGroup";
    pub const TABLE: &str = "http://www.w3.org/ns/csvw#Table";
    pub const TABLE_SCHEMA: &str = "http://www.w3.org/ns/csvw#TableSchema";
    pub const COLUMN: &str = "http://www.w3.org/ns/csvw#Column";
    pub const ROW: &str = "http://www.w3.org/ns/csvw#Row";

    pub const TABLE_PROP: &str = "http://www.w3.org/ns/csvw#table";
    pub const TABLE_SCHEMA_PROP: &str = "http://www.w3.org/ns/csvw#tableSchema";
    pub const ROW_PROP: &str = "http://www.w3.org/ns/csvw#row";
    pub const ROWNUM: &str = "http://www.w3.org/ns/csvw#rownum";
    pub const URL: &str = "http://www.w3.org/ns/csvw#url";
    pub const DESCRIBES: &str = "http://www.w3.org/ns/csvw#describes";

    pub const COLUMN_PROP: &str = "http://www.w3.org/ns/csvw#column";
    pub const COLUMNS: &str = "http://www.w3.org/ns/csvw#columns";
    pub const NAME: &str = "http://www.w3.org/ns/csvw#name";
    pub const TITLE: &str = "http://www.w3.org/ns/csvw#title";
    pub const ABOUT_URL: &str = "http://www.w3.org/ns/csvw#aboutUrl";
    pub const PROPERTY_URL: &str = "http://www.w3.org/ns/csvw#propertyUrl";
    pub const VALUE_URL: &str = "http://www.w3.org/ns/csvw#valueUrl";
}

/// Prefixes the Turtle writer compacts IRIs with.
pub const WELL_KNOWN_PREFIXES: &[(&str, &str)] = &[
    ("csvw", csvw::NS),
    ("rdf", RDF_NS),
    ("xsd", XSD_NS),
];
