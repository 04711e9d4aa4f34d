use crate::record::CanonicalEntity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Run-level counts over the fused dataset.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryReport {
    pub total_input_records: usize,
    pub total_fused_entities: usize,
    pub duplicates_removed: usize,
    pub multi_source_entities: usize,
    pub by_category: BTreeMap<String, usize>,
    pub by_state: BTreeMap<String, usize>,
    pub by_source: BTreeMap<String, usize>,
}

pub fn summarize(input_count: usize, entities: &[CanonicalEntity]) -> SummaryReport {
    let mut report = SummaryReport {
        total_input_records: input_count,
        total_fused_entities: entities.len(),
        duplicates_removed: input_count.saturating_sub(entities.len()),
        ..Default::default()
    };
    for entity in entities {
        if entity.source_count > 1 {
            report.multi_source_entities += 1;
        }
        *report
            .by_category
            .entry(entity.category.to_string())
            .or_default() += 1;
        let state = entity
            .state_code()
            .map(|s| s.trim().to_uppercase())
            .unwrap_or_else(|| String::from("Unknown"));
        *report.by_state.entry(state).or_default() += 1;
        for source in &entity.contributing_sources {
            *report.by_source.entry(source.label().to_string()).or_default() += 1;
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categorize::Category;
    use crate::record::{MergedRecord, RecordFields};
    use crate::source::Source;

    fn entity(state: Option<&str>, sources: Vec<Source>, category: Category) -> CanonicalEntity {
        let merged = MergedRecord {
            fields: RecordFields {
                practice_state: state.map(str::to_string),
                ..Default::default()
            },
            confidence_score: 0.0,
            source_count: sources.len(),
            data_sources: sources,
        };
        CanonicalEntity::new(merged, category)
    }

    #[test]
    fn counts_categories_states_and_sources() {
        let entities = vec![
            entity(Some("ny"), vec![Source::Npi, Source::Brave], Category::MedicalSpa),
            entity(Some("NY"), vec![Source::Brave, Source::Brave], Category::MedicalSpa),
            entity(None, vec![Source::Groupon], Category::HealthcareProvider),
        ];
        let report = summarize(5, &entities);
        assert_eq!(report.total_input_records, 5);
        assert_eq!(report.total_fused_entities, 3);
        assert_eq!(report.duplicates_removed, 2);
        assert_eq!(report.multi_source_entities, 2);
        assert_eq!(report.by_category["Medical Spa"], 2);
        assert_eq!(report.by_category["Healthcare Provider"], 1);
        assert_eq!(report.by_state["NY"], 2);
        assert_eq!(report.by_state["Unknown"], 1);
        assert_eq!(report.by_source["Brave"], 3);
        assert_eq!(report.by_source["NPI"], 1);
        assert_eq!(report.by_source["Groupon"], 1);
    }

    #[test]
    fn labels_containing_commas_count_once() {
        let yelp = Source::from("Yelp, Inc");
        let entities = vec![entity(Some("TX"), vec![Source::Npi, yelp], Category::MedicalSpa)];
        let report = summarize(2, &entities);
        assert_eq!(report.by_source.len(), 2);
        assert_eq!(report.by_source["Yelp, Inc"], 1);
        assert_eq!(report.by_source["NPI"], 1);
    }

    #[test]
    fn empty_run() {
        let report = summarize(0, &[]);
        assert_eq!(report, SummaryReport::default());
    }
}
