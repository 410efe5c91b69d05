//! Error types for the guidance engine

use thiserror::Error;
use tsguide_knowledge::KnowledgeError;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Layered sources could not be read or deserialized
    #[error("Config load error: {0}")]
    Load(#[from] config::ConfigError),

    /// Values are well-formed but unusable
    #[error("Validation error: {0}")]
    Validation(String),

    /// Config could not be written back as TOML
    #[error("TOML serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Errors surfaced by the guidance engine
#[derive(Debug, Error)]
pub enum EngineError {
    /// Query text is empty or whitespace-only
    #[error("Query text is empty")]
    EmptyQuery,

    /// Knowledge base could not be loaded
    #[error("Knowledge base error: {0}")]
    Knowledge(#[from] KnowledgeError),

    /// Configuration is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
