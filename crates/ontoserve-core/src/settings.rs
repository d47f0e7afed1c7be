//! Process-wide runtime settings shared by all requests.
//!
//! Requests take one [`SettingsHandle::snapshot`] and read it for their whole
//! lifetime. Reloads swap the snapshot atomically, so a request never sees a
//! rank table change mid-computation.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::RankingConfig;

/// Rank table and download restrictions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuntimeSettings {
    ontology_rank: HashMap<String, i64>,
    restrict_download: HashSet<String>,
}

impl RuntimeSettings {
    pub fn new(
        ontology_rank: impl IntoIterator<Item = (String, i64)>,
        restrict_download: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            ontology_rank: ontology_rank.into_iter().collect(),
            restrict_download: restrict_download.into_iter().collect(),
        }
    }

    /// Search tie-break weight for an ontology; 0 when unranked.
    pub fn ontology_rank(&self, acronym: &str) -> i64 {
        self.ontology_rank.get(acronym).copied().unwrap_or(0)
    }

    pub fn is_download_restricted(&self, acronym: &str) -> bool {
        self.restrict_download.contains(acronym)
    }
}

impl From<&RankingConfig> for RuntimeSettings {
    fn from(config: &RankingConfig) -> Self {
        Self::new(
            config
                .ontology_rank
                .iter()
                .map(|(acronym, rank)| (acronym.clone(), *rank)),
            config.restrict_download.iter().cloned(),
        )
    }
}

/// Shared, reloadable holder of [`RuntimeSettings`].
#[derive(Debug, Clone, Default)]
pub struct SettingsHandle {
    current: Arc<RwLock<Arc<RuntimeSettings>>>,
}

impl SettingsHandle {
    pub fn new(settings: RuntimeSettings) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(settings))),
        }
    }

    /// The settings in effect right now. Later reloads do not affect it.
    pub fn snapshot(&self) -> Arc<RuntimeSettings> {
        Arc::clone(&self.current.read())
    }

    /// Install new settings for subsequent snapshots.
    pub fn replace(&self, settings: RuntimeSettings) {
        *self.current.write() = Arc::new(settings);
    }
}
