//! Error types for knowledge base loading

use thiserror::Error;

/// Errors that can occur while loading or validating a catalog
#[derive(Debug, Error)]
pub enum KnowledgeError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Catalog file extension is neither YAML nor JSON
    #[error("Unsupported catalog format: {0}")]
    UnsupportedFormat(String),

    /// Two records share an identifier
    #[error("Duplicate {kind} entry: {name}")]
    DuplicateEntry {
        /// Record kind ("specification", "protocol", ...)
        kind: &'static str,
        /// The duplicated identifier
        name: String,
    },

    /// Specification id does not look like "TS <series>.<number>"
    #[error("Invalid specification id: {0}")]
    InvalidSpecificationId(String),

    /// Specification id series disagrees with its series field
    #[error("Specification {id} declares series {declared} but its id implies {implied}")]
    SeriesMismatch {
        /// Specification id
        id: String,
        /// Value of the series field
        declared: String,
        /// Series taken from the id
        implied: String,
    },
}

/// Result type for knowledge base operations
pub type Result<T> = std::result::Result<T, KnowledgeError>;
