//! Engine configuration loaded from TOML and `TSGUIDE_*` environment variables

use std::path::PathBuf;

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;
use tsguide_knowledge::RankingWeights;

use crate::{error::ConfigError, models::UserLevel};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "TSGUIDE";

/// Top-level engine configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Level used when a query does not state one
    pub default_user_level: UserLevel,
    /// Knowledge base source
    pub knowledge: KnowledgeConfig,
    /// Relevance ranking weights
    pub ranking: RankingWeights,
    /// Confidence weights
    pub confidence: ConfidenceWeights,
    /// Logging setup
    pub logging: LoggingConfig,
}

/// Where the catalog comes from
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    /// YAML/JSON catalog file; the embedded catalog is used when unset
    pub catalog_path: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. "info" or "tsguide_engine=debug"
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Contributions of each evidence source to guidance confidence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceWeights {
    /// Domain resolved and has a search pattern
    pub search_pattern: f32,
    /// Domain resolved but has no search pattern
    pub domain_only: f32,
    /// At least one concept recognized
    pub concept: f32,
    /// Added per extra concept
    pub extra_concept: f32,
    /// Ceiling for the concept contribution
    pub concept_cap: f32,
    /// At least one specification ranked
    pub specification: f32,
    /// Added per extra ranked specification
    pub extra_specification: f32,
    /// Ceiling for the specification contribution
    pub specification_cap: f32,
}

impl Default for ConfidenceWeights {
    fn default() -> Self {
        Self {
            search_pattern: 0.25,
            domain_only: 0.1,
            concept: 0.3,
            extra_concept: 0.05,
            concept_cap: 0.4,
            specification: 0.25,
            extra_specification: 0.05,
            specification_cap: 0.4,
        }
    }
}

impl EngineConfig {
    /// Check the configuration is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        let weights = &self.confidence;
        let values = [
            weights.search_pattern,
            weights.domain_only,
            weights.concept,
            weights.extra_concept,
            weights.concept_cap,
            weights.specification,
            weights.extra_specification,
            weights.specification_cap,
        ];
        if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(ConfigError::Validation(
                "Confidence weights must be finite and non-negative".to_string(),
            ));
        }
        if weights.concept > weights.concept_cap || weights.specification > weights.specification_cap
        {
            return Err(ConfigError::Validation(
                "Confidence base weights must not exceed their caps".to_string(),
            ));
        }
        // A recognized concept plus a ranked specification must score above 0.5.
        if weights.concept + weights.specification <= 0.5 {
            return Err(ConfigError::Validation(
                "confidence.concept + confidence.specification must exceed 0.5".to_string(),
            ));
        }

        let ranking = &self.ranking;
        if ranking.key_topic == 0 && ranking.search_keyword == 0 && ranking.title == 0 {
            return Err(ConfigError::Validation(
                "At least one ranking weight must be positive".to_string(),
            ));
        }

        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::Validation(
                "Logging level must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Serialize as TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }
}

/// Layers an optional TOML file and environment variables into an [`EngineConfig`]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    env_prefix: String,
}

impl ConfigLoader {
    /// Loader reading only environment variables
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: ENV_PREFIX.to_string(),
        }
    }

    /// Loader reading a TOML file, then environment variables
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: Some(path.into()),
            env_prefix: ENV_PREFIX.to_string(),
        }
    }

    /// Override the environment prefix
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load, merge, and validate
    pub fn load(&self) -> Result<EngineConfig, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = &self.config_path {
            debug!("Reading engine config from {}", path.display());
            builder = builder.add_source(
                File::from(path.clone())
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }
        builder = builder.add_source(
            Environment::with_prefix(&self.env_prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: EngineConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
