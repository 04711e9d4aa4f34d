use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Origin of a listing. Labels outside the known set are kept verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Source {
    Npi,
    Comprehensive,
    MedSpaFinder,
    Brave,
    Groupon,
    Unknown(String),
}

impl Source {
    pub fn label(&self) -> &str {
        match self {
            Source::Npi => "NPI",
            Source::Comprehensive => "Comprehensive",
            Source::MedSpaFinder => "MedSpa_Finder",
            Source::Brave => "Brave",
            Source::Groupon => "Groupon",
            Source::Unknown(label) => label,
        }
    }

    /// Built-in ranking: registries beat directories, directories beat scrapes.
    pub fn default_priority(&self) -> u32 {
        match self {
            Source::Npi => 5,
            Source::Comprehensive => 4,
            Source::MedSpaFinder => 3,
            Source::Brave => 2,
            Source::Groupon => 1,
            Source::Unknown(_) => 0,
        }
    }
}

impl From<&str> for Source {
    fn from(label: &str) -> Self {
        match label.trim() {
            "NPI" => Source::Npi,
            "Comprehensive" => Source::Comprehensive,
            "MedSpa_Finder" => Source::MedSpaFinder,
            "Brave" => Source::Brave,
            "Groupon" => Source::Groupon,
            other => Source::Unknown(other.to_string()),
        }
    }
}

impl From<String> for Source {
    fn from(label: String) -> Self {
        Source::from(label.as_str())
    }
}

impl From<Source> for String {
    fn from(source: Source) -> Self {
        source.label().to_string()
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Source ranks used to pick winning field values during a merge.
/// Higher ranks win; sources missing from the table rank 0.
#[derive(Clone, Debug)]
pub struct PriorityTable {
    ranks: FxHashMap<Source, u32>,
}

impl PriorityTable {
    pub fn from_labels(labels: &BTreeMap<String, u32>) -> Self {
        let ranks = labels
            .iter()
            .map(|(label, &rank)| (Source::from(label.as_str()), rank))
            .collect();
        PriorityTable { ranks }
    }

    pub fn rank(&self, source: &Source) -> u32 {
        self.ranks.get(source).copied().unwrap_or(0)
    }
}

impl Default for PriorityTable {
    fn default() -> Self {
        let ranks = [
            Source::Npi,
            Source::Comprehensive,
            Source::MedSpaFinder,
            Source::Brave,
            Source::Groupon,
        ]
        .into_iter()
        .map(|source| {
            let rank = source.default_priority();
            (source, rank)
        })
        .collect();
        PriorityTable { ranks }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_through_display() {
        for label in ["NPI", "Comprehensive", "MedSpa_Finder", "Brave", "Groupon", "Yelp"] {
            assert_eq!(Source::from(label).to_string(), label);
        }
        assert_eq!(Source::from("Yelp"), Source::Unknown("Yelp".to_string()));
    }

    #[test]
    fn default_table_prefers_registry() {
        let table = PriorityTable::default();
        assert!(table.rank(&Source::Npi) > table.rank(&Source::Brave));
        assert!(table.rank(&Source::Brave) > table.rank(&Source::Groupon));
        assert_eq!(table.rank(&Source::from("Yelp")), 0);
    }

    #[test]
    fn custom_table_ranks_missing_sources_lowest() {
        let labels = BTreeMap::from([("Groupon".to_string(), 9), ("Yelp".to_string(), 3)]);
        let table = PriorityTable::from_labels(&labels);
        assert_eq!(table.rank(&Source::Groupon), 9);
        assert_eq!(table.rank(&Source::from("Yelp")), 3);
        assert_eq!(table.rank(&Source::Npi), 0);
    }
}
