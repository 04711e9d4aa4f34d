//! Deduplication and field-level fusion of healthcare provider listings
//! gathered from independent sources.

pub mod categorize;
pub mod cluster;
pub mod dto;
pub mod error;
pub mod merge;
pub mod normalize;
pub mod pipeline;
pub mod record;
pub mod report;
pub mod response;
pub mod similarity;
pub mod source;
pub mod util;

pub use categorize::{categorize, Category};
pub use cluster::{build_clusters, Blocking, Cluster, ClusterOptions, ClusterStrategy};
pub use error::{FusionError, ServiceError};
pub use merge::merge;
pub use pipeline::{FusionOutput, FusionPipeline};
pub use record::{CanonicalEntity, MatchKey, MergedRecord, RecordFields, SourceRecord};
pub use report::{summarize, SummaryReport};
pub use similarity::{score, DEFAULT_THRESHOLD};
pub use source::{PriorityTable, Source};
