#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("Malformed RDF list at {node}: {reason}")]
    MalformedList { node: String, reason: String },
}

pub type Result<T> = std::result::Result<T, GraphError>;
