use crate::error::FusionError;
use crate::record::{present, MergedRecord, RecordFields, SourceRecord};
use crate::source::PriorityTable;
use rustc_hash::FxHashSet;

/// Collapses one cluster into a single record.
///
/// Members are ranked by source priority (stable, so equal ranks keep cluster
/// order). Each scalar field takes the first non-blank value in that order,
/// services are unioned, and the confidence score is the members' maximum.
pub fn merge(
    members: &[&SourceRecord],
    priorities: &PriorityTable,
) -> Result<MergedRecord, FusionError> {
    if members.is_empty() {
        return Err(FusionError::EmptyCluster);
    }
    let mut ranked: Vec<&SourceRecord> = members.to_vec();
    ranked.sort_by_key(|record| std::cmp::Reverse(priorities.rank(record.source())));

    let fields = RecordFields {
        business_name: pick(&ranked, |f| &f.business_name),
        organization_name: pick(&ranked, |f| &f.organization_name),
        first_name: pick(&ranked, |f| &f.first_name),
        last_name: pick(&ranked, |f| &f.last_name),
        category: pick(&ranked, |f| &f.category),
        address: pick(&ranked, |f| &f.address),
        practice_address1: pick(&ranked, |f| &f.practice_address1),
        city: pick(&ranked, |f| &f.city),
        practice_city: pick(&ranked, |f| &f.practice_city),
        state: pick(&ranked, |f| &f.state),
        practice_state: pick(&ranked, |f| &f.practice_state),
        zip: pick(&ranked, |f| &f.zip),
        practice_zip: pick(&ranked, |f| &f.practice_zip),
        phone: pick(&ranked, |f| &f.phone),
        practice_phone: pick(&ranked, |f| &f.practice_phone),
        fax: pick(&ranked, |f| &f.fax),
        website: pick(&ranked, |f| &f.website),
        email: pick(&ranked, |f| &f.email),
        services_detected: union_services(&ranked),
        detected_services: None,
        confidence_score: None,
        npi: pick(&ranked, |f| &f.npi),
        taxonomy_code: pick(&ranked, |f| &f.taxonomy_code),
        taxonomy_description: pick(&ranked, |f| &f.taxonomy_description),
    };

    let confidence_score = ranked
        .iter()
        .map(|record| parse_confidence(&record.fields.confidence_score))
        .fold(f64::NEG_INFINITY, f64::max);

    Ok(MergedRecord {
        fields,
        confidence_score,
        data_sources: ranked.iter().map(|record| record.source().clone()).collect(),
        source_count: ranked.len(),
    })
}

/// First non-blank value of a field, in member order.
fn pick(ranked: &[&SourceRecord], field: fn(&RecordFields) -> &Option<String>) -> Option<String> {
    ranked
        .iter()
        .find_map(|record| present(field(&record.fields)))
        .map(str::to_string)
}

/// Insertion-ordered union of every member's services, `"; "`-joined.
/// A lone services text from a singleton is kept as written.
fn union_services(ranked: &[&SourceRecord]) -> Option<String> {
    let texts: Vec<&str> = ranked
        .iter()
        .flat_map(|record| record.fields.services_texts())
        .collect();
    if let [only] = texts.as_slice() {
        if ranked.len() == 1 {
            return Some(only.to_string());
        }
    }
    let mut seen = FxHashSet::default();
    let services: Vec<&str> = texts
        .into_iter()
        .flat_map(|text| text.split([';', ',']))
        .map(str::trim)
        .filter(|service| !service.is_empty() && seen.insert(*service))
        .collect();
    if services.is_empty() {
        None
    } else {
        Some(services.join("; "))
    }
}

fn parse_confidence(value: &Option<String>) -> f64 {
    value
        .as_deref()
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}
