//! Layered configuration loading

use std::io::Write;

use tempfile::NamedTempFile;
use tsguide_engine::{ConfigError, ConfigLoader, EngineConfig, RankingWeights, UserLevel};

fn toml_file(content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_defaults_without_sources() {
    let config = ConfigLoader::new()
        .with_env_prefix("TSGUIDE_TEST_DEFAULTS")
        .load()
        .unwrap();
    assert_eq!(config, EngineConfig::default());
}

#[test]
fn test_missing_file_is_optional() {
    let config = ConfigLoader::with_path("/no/such/tsguide.toml")
        .with_env_prefix("TSGUIDE_TEST_MISSING")
        .load()
        .unwrap();
    assert_eq!(config.default_user_level, UserLevel::Intermediate);
}

#[test]
fn test_file_values_override_defaults() {
    let file = toml_file(
        r#"
default_user_level = "beginner"

[ranking]
key_topic = 4

[confidence]
concept = 0.35

[logging]
level = "tsguide_engine=debug"
"#,
    );

    let config = ConfigLoader::with_path(file.path())
        .with_env_prefix("TSGUIDE_TEST_FILE")
        .load()
        .unwrap();

    assert_eq!(config.default_user_level, UserLevel::Beginner);
    assert_eq!(
        config.ranking,
        RankingWeights {
            key_topic: 4,
            ..RankingWeights::default()
        }
    );
    assert!((config.confidence.concept - 0.35).abs() < 1e-6);
    assert!((config.confidence.specification - 0.25).abs() < 1e-6);
    assert_eq!(config.logging.level, "tsguide_engine=debug");
    assert!(config.knowledge.catalog_path.is_none());
}

#[test]
fn test_environment_overrides_file() {
    let file = toml_file("default_user_level = \"beginner\"\n");
    std::env::set_var("TSGUIDE_TEST_ENV_DEFAULT_USER_LEVEL", "expert");
    std::env::set_var("TSGUIDE_TEST_ENV_RANKING__TITLE", "2");

    let config = ConfigLoader::with_path(file.path())
        .with_env_prefix("TSGUIDE_TEST_ENV")
        .load()
        .unwrap();

    std::env::remove_var("TSGUIDE_TEST_ENV_DEFAULT_USER_LEVEL");
    std::env::remove_var("TSGUIDE_TEST_ENV_RANKING__TITLE");

    assert_eq!(config.default_user_level, UserLevel::Expert);
    assert_eq!(config.ranking.title, 2);
    assert_eq!(config.ranking.key_topic, 3);
}

#[test]
fn test_invalid_weights_rejected() {
    let file = toml_file("[confidence]\nconcept = 0.1\nspecification = 0.1\n");
    let err = ConfigLoader::with_path(file.path())
        .with_env_prefix("TSGUIDE_TEST_INVALID")
        .load()
        .unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
}

#[test]
fn test_malformed_file_rejected() {
    let file = toml_file("default_user_level = [not toml");
    let err = ConfigLoader::with_path(file.path())
        .with_env_prefix("TSGUIDE_TEST_MALFORMED")
        .load()
        .unwrap_err();
    assert!(matches!(err, ConfigError::Load(_)));
}

#[test]
fn test_written_config_loads_back() {
    let mut config = EngineConfig::default();
    config.default_user_level = UserLevel::Expert;
    config.ranking.search_keyword = 5;
    config.knowledge.catalog_path = Some("catalog.yaml".into());

    let file = toml_file(&config.to_toml().unwrap());
    let loaded = ConfigLoader::with_path(file.path())
        .with_env_prefix("TSGUIDE_TEST_WRITE")
        .load()
        .unwrap();
    assert_eq!(loaded, config);
}
