use crate::record::MatchKey;
use crate::similarity::{score, DEFAULT_THRESHOLD};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// How records above the threshold are grouped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ClusterStrategy {
    /// Each unassigned record, in input order, seeds a group and absorbs every
    /// later unassigned record that is similar to the seed itself.
    #[default]
    SeedAnchored,
    /// Connected components of the similarity graph, independent of order.
    Transitive,
}

/// Candidate-pair restriction applied before scoring.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Blocking {
    #[default]
    None,
    /// First five digits of the zip code.
    Zip,
    /// First `length` characters of the name with spaces removed.
    NamePrefix { length: usize },
}

impl Blocking {
    fn key(&self, key: &MatchKey) -> Option<String> {
        let value: String = match self {
            Blocking::None => return None,
            Blocking::Zip => key.zip.chars().take(5).collect(),
            Blocking::NamePrefix { length } => key
                .name
                .chars()
                .filter(|c| !c.is_whitespace())
                .take(*length)
                .collect(),
        };
        Some(value).filter(|v| !v.is_empty())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterOptions {
    pub threshold: u32,
    pub strategy: ClusterStrategy,
    pub blocking: Blocking,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        ClusterOptions {
            threshold: DEFAULT_THRESHOLD,
            strategy: ClusterStrategy::default(),
            blocking: Blocking::default(),
        }
    }
}

/// Indices of records judged to describe the same business. Never empty;
/// the first member is the record that started the group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cluster {
    members: Vec<usize>,
}

impl Cluster {
    pub fn seed(&self) -> usize {
        self.members[0]
    }

    pub fn members(&self) -> &[usize] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

///
/// Partitions records into duplicate groups. Every index in `0..keys.len()`
/// appears in exactly one returned cluster.
///
/// ## Arguments
///
/// * `keys` - Normalized comparison keys, in input order.
/// * `options` - Threshold (inclusive), grouping strategy and blocking.
///
pub fn build_clusters(keys: &[MatchKey], options: &ClusterOptions) -> Vec<Cluster> {
    let index = CandidateIndex::new(keys, options.blocking);
    let clusters = match options.strategy {
        ClusterStrategy::SeedAnchored => seed_anchored(keys, &index, options.threshold),
        ClusterStrategy::Transitive => transitive(keys, &index, options.threshold),
    };
    debug!(
        records = keys.len(),
        clusters = clusters.len(),
        strategy = ?options.strategy,
        "Clustering completed"
    );
    clusters
}

fn seed_anchored(keys: &[MatchKey], index: &CandidateIndex, threshold: u32) -> Vec<Cluster> {
    let mut assigned = vec![false; keys.len()];
    let mut clusters = Vec::new();
    for seed in 0..keys.len() {
        if assigned[seed] {
            continue;
        }
        assigned[seed] = true;
        let mut members = vec![seed];
        for candidate in index.candidates_after(seed) {
            if assigned[candidate] {
                continue;
            }
            let similarity = score(&keys[seed], &keys[candidate]);
            trace!(seed, candidate, similarity, "Scored pair");
            if similarity >= threshold {
                assigned[candidate] = true;
                members.push(candidate);
            }
        }
        clusters.push(Cluster { members });
    }
    clusters
}

fn transitive(keys: &[MatchKey], index: &CandidateIndex, threshold: u32) -> Vec<Cluster> {
    let edges: Vec<(usize, usize)> = (0..keys.len())
        .into_par_iter()
        .flat_map_iter(|i| {
            index
                .candidates_after(i)
                .into_iter()
                .filter(move |&j| score(&keys[i], &keys[j]) >= threshold)
                .map(move |j| (i, j))
        })
        .collect();
    let mut sets = DisjointSets::new(keys.len());
    for (i, j) in edges {
        sets.union(i, j);
    }
    let mut by_root: FxHashMap<usize, usize> = FxHashMap::default();
    let mut clusters: Vec<Cluster> = Vec::new();
    for i in 0..keys.len() {
        let root = sets.find(i);
        match by_root.get(&root) {
            Some(&position) => clusters[position].members.push(i),
            None => {
                by_root.insert(root, clusters.len());
                clusters.push(Cluster { members: vec![i] });
            }
        }
    }
    clusters
}

/// Candidate lookup honoring the blocking strategy. Records without a
/// blocking key stay comparable with every other record.
struct CandidateIndex {
    len: usize,
    blocks: Vec<Option<String>>,
    buckets: FxHashMap<String, Vec<usize>>,
    unkeyed: Vec<usize>,
}

impl CandidateIndex {
    fn new(keys: &[MatchKey], blocking: Blocking) -> Self {
        let blocks: Vec<Option<String>> = keys.iter().map(|k| blocking.key(k)).collect();
        let mut buckets: FxHashMap<String, Vec<usize>> = FxHashMap::default();
        let mut unkeyed = Vec::new();
        for (i, block) in blocks.iter().enumerate() {
            match block {
                Some(block) => buckets.entry(block.clone()).or_default().push(i),
                None => unkeyed.push(i),
            }
        }
        CandidateIndex {
            len: keys.len(),
            blocks,
            buckets,
            unkeyed,
        }
    }

    /// Ascending indices greater than `i` that may be compared with `i`.
    fn candidates_after(&self, i: usize) -> Vec<usize> {
        let bucket = match &self.blocks[i] {
            Some(block) => &self.buckets[block],
            None => return ((i + 1)..self.len).collect(),
        };
        let after = |indices: &[usize]| indices.partition_point(|&j| j <= i);
        let mut merged: Vec<usize> = bucket[after(bucket)..]
            .iter()
            .chain(&self.unkeyed[after(&self.unkeyed)..])
            .copied()
            .collect();
        merged.sort_unstable();
        merged
    }
}

struct DisjointSets {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSets {
    fn new(len: usize) -> Self {
        DisjointSets {
            parent: (0..len).collect(),
            rank: vec![0; len],
        }
    }

    fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    fn union(&mut self, a: usize, b: usize) {
        let (a, b) = (self.find(a), self.find(b));
        if a == b {
            return;
        }
        match self.rank[a].cmp(&self.rank[b]) {
            std::cmp::Ordering::Less => self.parent[a] = b,
            std::cmp::Ordering::Greater => self.parent[b] = a,
            std::cmp::Ordering::Equal => {
                self.parent[b] = a;
                self.rank[a] += 1;
            }
        }
    }
}
