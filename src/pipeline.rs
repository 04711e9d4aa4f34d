use crate::categorize::categorize;
use crate::cluster::{build_clusters, Cluster, ClusterOptions};
use crate::error::FusionError;
use crate::merge::merge;
use crate::record::{CanonicalEntity, MatchKey, SourceRecord};
use crate::report::{summarize, SummaryReport};
use crate::source::PriorityTable;
use rayon::prelude::*;
use tracing::debug;

/// One fusion run: cluster, merge, categorize and summarize a record set.
/// Holds only configuration, so a pipeline can be reused across runs.
#[derive(Clone, Debug, Default)]
pub struct FusionPipeline {
    options: ClusterOptions,
    priorities: PriorityTable,
}

impl FusionPipeline {
    pub fn new(options: ClusterOptions, priorities: PriorityTable) -> Self {
        FusionPipeline {
            options,
            priorities,
        }
    }

    pub fn run(&self, records: Vec<SourceRecord>) -> Result<FusionOutput, FusionError> {
        let clustered = Ingested::new(records).cluster(&self.options);
        let entities = clustered.fuse(&self.priorities)?;
        Ok(clustered.finish(entities))
    }
}

/// Records paired with their normalized comparison keys.
pub struct Ingested {
    records: Vec<SourceRecord>,
    keys: Vec<MatchKey>,
}

impl Ingested {
    pub fn new(records: Vec<SourceRecord>) -> Self {
        let keys = records.par_iter().map(SourceRecord::match_key).collect();
        debug!(records = records.len(), "Records ingested");
        Ingested { records, keys }
    }

    pub fn keys(&self) -> &[MatchKey] {
        &self.keys
    }

    pub fn cluster(self, options: &ClusterOptions) -> Clustered {
        let clusters = build_clusters(&self.keys, options);
        Clustered {
            records: self.records,
            clusters,
        }
    }
}

/// Records partitioned into duplicate clusters.
pub struct Clustered {
    records: Vec<SourceRecord>,
    clusters: Vec<Cluster>,
}

impl Clustered {
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Merges and categorizes every cluster, preserving cluster order.
    pub fn fuse(&self, priorities: &PriorityTable) -> Result<Vec<CanonicalEntity>, FusionError> {
        let entities = self
            .clusters
            .iter()
            .map(|cluster| -> Result<CanonicalEntity, FusionError> {
                let members = cluster
                    .members()
                    .iter()
                    .map(|&index| {
                        self.records.get(index).ok_or(FusionError::MissingRecord {
                            index,
                            len: self.records.len(),
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                let merged = merge(&members, priorities)?;
                let category = categorize(&merged);
                Ok(CanonicalEntity::new(merged, category))
            })
            .collect::<Result<Vec<_>, _>>()?;
        debug!(entities = entities.len(), "Clusters merged");
        Ok(entities)
    }

    pub fn finish(self, entities: Vec<CanonicalEntity>) -> FusionOutput {
        let report = summarize(self.records.len(), &entities);
        let record_ids = self.records.iter().map(SourceRecord::id).collect();
        FusionOutput {
            entities,
            clusters: self.clusters,
            report,
            record_ids,
        }
    }
}

pub struct FusionOutput {
    pub entities: Vec<CanonicalEntity>,
    pub clusters: Vec<Cluster>,
    pub report: SummaryReport,
    record_ids: Vec<String>,
}

impl FusionOutput {
    /// `(record id, cluster id)` for every input record, where the cluster id
    /// is `"{cluster index}-{cluster size}"`.
    pub fn cluster_rows(&self) -> Vec<(String, String)> {
        self.clusters
            .iter()
            .enumerate()
            .flat_map(|(idx, cluster)| {
                let cluster_id = format!("{idx}-{}", cluster.len());
                cluster
                    .members()
                    .iter()
                    .map(move |&member| (self.record_ids[member].clone(), cluster_id.clone()))
            })
            .collect()
    }
}
