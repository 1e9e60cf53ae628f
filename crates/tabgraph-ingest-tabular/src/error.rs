use tabgraph_graph::GraphError;

/// Defects raised while converting a table.
///
/// The enum is `Clone` so recoverable defects can be both logged and kept in
/// the conversion report.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TabularError {
    #[error(
        "table schema is not compliant with the data: the schema declares {schema_columns} \
         column(s) but the table has {data_columns}"
    )]
    SchemaColumnCountMismatch {
        schema_columns: usize,
        data_columns: usize,
    },

    #[error(
        "table schema is not compliant with the data: column '{name}' (title '{title}') is \
         missing from the schema"
    )]
    SchemaColumnMissing { name: String, title: String },

    #[error(
        "unable to create values of csvw:propertyUrl due to collision: both column titles \
         '{first_title}' and '{second_title}' are normalized to '{name}' and would refer to \
         the same property url <{property_url}>"
    )]
    DuplicateColumnName {
        first_title: String,
        second_title: String,
        name: String,
        property_url: String,
    },

    #[error("stream resource {locator} not found")]
    ResourceNotFound { locator: String },

    #[error("failed to read tabular data from {locator} after {rows_read} row(s): {message}")]
    ReadFailure {
        locator: String,
        rows_read: usize,
        message: String,
    },

    #[error("row {row} has {actual} cell(s) but the table has {expected} column(s)")]
    RowWidthMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("input graph error: {0}")]
    Graph(String),
}

impl From<GraphError> for TabularError {
    fn from(value: GraphError) -> Self {
        TabularError::Graph(value.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TabularError>;
