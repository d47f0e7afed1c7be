//! Default values for ontoserve configuration.
//!
//! All hardcoded defaults are centralized here for easy maintenance.

// ============================================================================
// Server Defaults
// ============================================================================

/// Interface the HTTP server binds to.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Port the HTTP server listens on.
pub const DEFAULT_PORT: u16 = 9393;

// ============================================================================
// Store Defaults
// ============================================================================

/// Graph store backend: "memory" or "surreal".
pub const DEFAULT_STORE_BACKEND: &str = "memory";

/// SurrealDB data directory.
pub const DEFAULT_DB_PATH: &str = ".ontoserve/graph";

/// Prefix for ontology and submission identifiers.
pub const DEFAULT_IRI_PREFIX: &str = "http://data.bioontology.org";

// ============================================================================
// Search Defaults
// ============================================================================

/// Search index backend: "memory" or "solr".
pub const DEFAULT_SEARCH_BACKEND: &str = "memory";

/// Solr core URL used by the "solr" backend.
pub const DEFAULT_SOLR_URL: &str = "http://localhost:8983/solr/term_search_core1";

/// Upper bound on hits fetched from the index for one query.
pub const DEFAULT_MAX_HITS: usize = 10_000;

/// Index fields queried and their weights.
pub const DEFAULT_QUERY_FIELDS: &[(&str, f32)] = &[
    ("prefLabelExact", 100.0),
    ("prefLabel", 50.0),
    ("synonymExact", 10.0),
    ("synonym", 5.0),
    ("notation", 3.0),
    ("definition", 1.0),
];

// ============================================================================
// Pagination Defaults
// ============================================================================

/// Page returned when the request does not name one.
pub const DEFAULT_PAGE: usize = 1;

/// Page size used when the request does not name one.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Largest page size a request may ask for.
pub const MAX_PAGE_SIZE: usize = 500;

// ============================================================================
// Logging Defaults
// ============================================================================

/// Default `EnvFilter` directive.
pub const DEFAULT_LOG_FILTER: &str = "info";

// ============================================================================
// File Names
// ============================================================================

/// Project-local config file name.
pub const CONFIG_FILE_NAME: &str = "ontoserve.toml";

/// Directory under the user config dir.
pub const CONFIG_DIR_NAME: &str = "ontoserve";
