use std::io::Write;

use ontoserve_core::config::{
    ConfigError, DEFAULT_DB_PATH, DEFAULT_PAGE_SIZE, DEFAULT_PORT, DEFAULT_SEARCH_BACKEND,
    MAX_PAGE_SIZE,
};
use ontoserve_core::{Config, RuntimeSettings};

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.server.port, DEFAULT_PORT);
    assert_eq!(config.store.db_path, DEFAULT_DB_PATH);
    assert_eq!(config.search.backend, DEFAULT_SEARCH_BACKEND);
    assert_eq!(config.pagination.default_page_size, DEFAULT_PAGE_SIZE);
    assert_eq!(config.pagination.max_page_size, MAX_PAGE_SIZE);
}

#[test]
fn test_config_to_toml() {
    let toml_str = Config::default_config_string();
    assert!(toml_str.contains("[server]"));
    assert!(toml_str.contains("[store]"));
    assert!(toml_str.contains("[pagination]"));
    assert!(toml_str.contains("[logging]"));
}

#[test]
fn test_config_from_toml() {
    let toml_str = r#"
[server]
port = 8080

[store]
backend = "surreal"
db_path = "/var/lib/ontoserve"

[ranking]
restrict_download = ["SNOMEDCT"]

[ranking.ontology_rank]
NCIT = 5
GO = 1
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.store.backend, "surreal");
    assert_eq!(config.store.db_path, "/var/lib/ontoserve");
    assert_eq!(config.ranking.ontology_rank.get("NCIT"), Some(&5));
    // Sections not present keep their defaults
    assert_eq!(config.pagination.max_page_size, MAX_PAGE_SIZE);

    let settings = RuntimeSettings::from(&config.ranking);
    assert_eq!(settings.ontology_rank("NCIT"), 5);
    assert_eq!(settings.ontology_rank("UNRANKED"), 0);
    assert!(settings.is_download_restricted("SNOMEDCT"));
}

#[test]
fn test_from_file_rejects_unknown_backend() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[search]\nbackend = \"elastic\"").unwrap();

    let err = Config::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_from_file_rejects_inverted_page_sizes() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[pagination]\ndefault_page_size = 100\nmax_page_size = 10"
    )
    .unwrap();

    let err = Config::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_from_file_reports_parse_errors() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[server\nport = ").unwrap();

    let err = Config::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError(_)));
}
