use crate::cluster::{Blocking, ClusterOptions, ClusterStrategy};
use crate::similarity::DEFAULT_THRESHOLD;
use crate::source::PriorityTable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct DataFile {
    pub bucket: String,
    pub key: String,
}

/// One per-source export, e.g. the NPI registry pull or a Groupon scrape.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SourceFile {
    pub source: String,
    pub data: DataFile,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FusionConfig {
    pub sources: Vec<SourceFile>,
    pub output: DataFile,
    #[serde(default = "default_threshold")]
    pub threshold: u32,
    #[serde(default)]
    pub strategy: ClusterStrategy,
    #[serde(default)]
    pub blocking: Blocking,
    #[serde(default)]
    pub priorities: Option<BTreeMap<String, u32>>,
}

fn default_threshold() -> u32 {
    DEFAULT_THRESHOLD
}

impl FusionConfig {
    pub fn cluster_options(&self) -> ClusterOptions {
        ClusterOptions {
            threshold: self.threshold,
            strategy: self.strategy,
            blocking: self.blocking,
        }
    }

    pub fn priority_table(&self) -> PriorityTable {
        self.priorities
            .as_ref()
            .map(PriorityTable::from_labels)
            .unwrap_or_default()
    }

    /// Object key for one of the run's output files.
    pub fn output_key(&self, name: &str) -> String {
        format!("{}/{}", self.output.key.trim_end_matches('/'), name)
    }
}
