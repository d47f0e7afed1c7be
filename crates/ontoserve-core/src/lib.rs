pub mod config;
pub mod error;
pub mod graph;
pub mod logging;
pub mod query;
pub mod search;
pub mod service;
pub mod settings;

pub use config::Config;
pub use error::QueryError;
pub use graph::{ClassNode, GraphStore, InMemoryGraphStore, SurrealGraphStore};
pub use query::{Page, PageRequest};
pub use search::{SearchHit, SearchIndex};
pub use service::{OntologyBrowser, SubmissionDocument};
pub use settings::{RuntimeSettings, SettingsHandle};
