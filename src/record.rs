use crate::categorize::Category;
use crate::normalize::{normalize, normalize_phone};
use crate::source::Source;
use serde::{Deserialize, Serialize};

/// The common listing columns shared by every source.
///
/// Generic and practice-prefixed variants are both kept so that merged
/// output preserves them verbatim; synonym resolution for comparison happens
/// in [`SourceRecord::match_key`].
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecordFields {
    pub business_name: Option<String>,
    pub organization_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub category: Option<String>,
    pub address: Option<String>,
    pub practice_address1: Option<String>,
    pub city: Option<String>,
    pub practice_city: Option<String>,
    pub state: Option<String>,
    pub practice_state: Option<String>,
    pub zip: Option<String>,
    pub practice_zip: Option<String>,
    pub phone: Option<String>,
    pub practice_phone: Option<String>,
    pub fax: Option<String>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub services_detected: Option<String>,
    pub detected_services: Option<String>,
    pub confidence_score: Option<String>,
    pub npi: Option<String>,
    pub taxonomy_code: Option<String>,
    pub taxonomy_description: Option<String>,
}

impl RecordFields {
    /// Business name, else organization name, else "first last".
    pub fn display_name(&self) -> Option<String> {
        if let Some(name) = present(&self.business_name).or(present(&self.organization_name)) {
            return Some(name.to_string());
        }
        let person: Vec<&str> = [present(&self.first_name), present(&self.last_name)]
            .into_iter()
            .flatten()
            .collect();
        if person.is_empty() {
            None
        } else {
            Some(person.join(" "))
        }
    }

    pub fn street(&self) -> Option<&str> {
        present(&self.address).or(present(&self.practice_address1))
    }

    pub fn city_name(&self) -> Option<&str> {
        present(&self.city).or(present(&self.practice_city))
    }

    pub fn state_code(&self) -> Option<&str> {
        present(&self.state).or(present(&self.practice_state))
    }

    pub fn zip_code(&self) -> Option<&str> {
        present(&self.zip).or(present(&self.practice_zip))
    }

    pub fn phone_number(&self) -> Option<&str> {
        present(&self.phone).or(present(&self.practice_phone))
    }

    /// Raw services text from both column spellings, in column order.
    pub fn services_texts(&self) -> impl Iterator<Item = &str> {
        [present(&self.services_detected), present(&self.detected_services)]
            .into_iter()
            .flatten()
    }
}

/// A value that is set and not blank after trimming.
pub fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// One listing as captured from a single origin.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceRecord {
    source: Source,
    source_file: String,
    row: usize,
    pub fields: RecordFields,
}

impl SourceRecord {
    pub fn new(source: Source, source_file: &str, row: usize, fields: RecordFields) -> Self {
        SourceRecord {
            source,
            source_file: source_file.to_string(),
            row,
            fields,
        }
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn source_file(&self) -> &str {
        &self.source_file
    }

    /// Stable identity of the record across outputs: `file#row`.
    pub fn id(&self) -> String {
        format!("{}#{}", self.source_file, self.row)
    }

    /// Resolves field synonyms and normalizes everything used for comparison.
    pub fn match_key(&self) -> MatchKey {
        let fields = &self.fields;
        MatchKey {
            name: fields.display_name().map(|n| normalize(&n)).unwrap_or_default(),
            phone: fields.phone_number().map(normalize_phone).unwrap_or_default(),
            address: fields.street().map(normalize).unwrap_or_default(),
            city: fields.city_name().map(normalize).unwrap_or_default(),
            zip: fields.zip_code().map(normalize_phone).unwrap_or_default(),
        }
    }
}

/// Normalized comparison values of one record. Empty strings mean absent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchKey {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub zip: String,
}

/// A cluster collapsed into one set of field values, before categorization.
#[derive(Clone, Debug, PartialEq)]
pub struct MergedRecord {
    pub fields: RecordFields,
    pub confidence_score: f64,
    pub data_sources: Vec<Source>,
    pub source_count: usize,
}

/// The fused representation of one real-world business.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalEntity {
    pub business_name: Option<String>,
    pub organization_name: Option<String>,
    pub category: Category,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
    pub practice_address1: Option<String>,
    pub city: Option<String>,
    pub practice_city: Option<String>,
    pub state: Option<String>,
    pub practice_state: Option<String>,
    pub zip: Option<String>,
    pub practice_zip: Option<String>,
    pub phone: Option<String>,
    pub practice_phone: Option<String>,
    pub fax: Option<String>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub services_detected: Option<String>,
    pub confidence_score: f64,
    pub data_sources: String,
    #[serde(skip)]
    pub contributing_sources: Vec<Source>,
    pub source_count: usize,
    pub npi: Option<String>,
    pub taxonomy_code: Option<String>,
    pub taxonomy_description: Option<String>,
}

impl CanonicalEntity {
    pub fn new(merged: MergedRecord, category: Category) -> Self {
        let data_sources = merged
            .data_sources
            .iter()
            .map(Source::label)
            .collect::<Vec<_>>()
            .join(", ");
        let f = merged.fields;
        CanonicalEntity {
            business_name: f.business_name,
            organization_name: f.organization_name,
            category,
            first_name: f.first_name,
            last_name: f.last_name,
            address: f.address,
            practice_address1: f.practice_address1,
            city: f.city,
            practice_city: f.practice_city,
            state: f.state,
            practice_state: f.practice_state,
            zip: f.zip,
            practice_zip: f.practice_zip,
            phone: f.phone,
            practice_phone: f.practice_phone,
            fax: f.fax,
            website: f.website,
            email: f.email,
            services_detected: f.services_detected,
            confidence_score: merged.confidence_score,
            data_sources,
            contributing_sources: merged.data_sources,
            source_count: merged.source_count,
            npi: f.npi,
            taxonomy_code: f.taxonomy_code,
            taxonomy_description: f.taxonomy_description,
        }
    }

    pub fn state_code(&self) -> Option<&str> {
        present(&self.state).or(present(&self.practice_state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> RecordFields {
        RecordFields {
            first_name: Some("Jane".to_string()),
            last_name: Some("Doe".to_string()),
            practice_address1: Some("10 Elm St.".to_string()),
            practice_city: Some("Austin".to_string()),
            practice_phone: Some("(512) 555-0199".to_string()),
            practice_zip: Some("78701-1234".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn match_key_falls_back_to_practice_fields() {
        let record = SourceRecord::new(Source::Npi, "npi.csv", 3, fields());
        let key = record.match_key();
        assert_eq!(key.name, "jane doe");
        assert_eq!(key.address, "10 elm st");
        assert_eq!(key.city, "austin");
        assert_eq!(key.phone, "5125550199");
        assert_eq!(key.zip, "787011234");
        assert_eq!(record.id(), "npi.csv#3");
    }

    #[test]
    fn blank_values_count_as_absent() {
        let mut fields = fields();
        fields.business_name = Some("   ".to_string());
        fields.organization_name = Some("Elm Street Clinic".to_string());
        fields.address = Some("".to_string());
        assert_eq!(fields.display_name().as_deref(), Some("Elm Street Clinic"));
        assert_eq!(fields.street(), Some("10 Elm St."));
    }

    #[test]
    fn missing_everything_gives_empty_key() {
        let record = SourceRecord::new(Source::Brave, "brave.csv", 0, RecordFields::default());
        assert_eq!(record.match_key(), MatchKey::default());
    }
}
