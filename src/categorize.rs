use crate::record::MergedRecord;
use serde::Serialize;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Category {
    #[serde(rename = "Dental Practice")]
    DentalPractice,
    #[serde(rename = "Dermatology Practice")]
    DermatologyPractice,
    #[serde(rename = "Plastic Surgery Practice")]
    PlasticSurgeryPractice,
    #[serde(rename = "Medical Spa")]
    MedicalSpa,
    #[serde(rename = "Aesthetic Center")]
    AestheticCenter,
    #[serde(rename = "Healthcare Provider")]
    HealthcareProvider,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::DentalPractice => "Dental Practice",
            Category::DermatologyPractice => "Dermatology Practice",
            Category::PlasticSurgeryPractice => "Plastic Surgery Practice",
            Category::MedicalSpa => "Medical Spa",
            Category::AestheticCenter => "Aesthetic Center",
            Category::HealthcareProvider => "Healthcare Provider",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Keyword classification of a merged record; the first matching rule wins
/// and anything unmatched is a generic healthcare provider.
pub fn categorize(merged: &MergedRecord) -> Category {
    let fields = &merged.fields;
    let name = lowered(fields.display_name().as_deref());
    let tag = lowered(fields.category.as_deref());
    let services = fields.services_texts().collect::<Vec<_>>().join("; ").to_lowercase();

    if contains_any(&name, &["dentist", "dental"]) || tag.contains("dentist") {
        Category::DentalPractice
    } else if contains_any(&name, &["dermatology"]) || tag.contains("dermatologist") {
        Category::DermatologyPractice
    } else if contains_any(&name, &["plastic surgery"]) || tag.contains("plastic_surgeon") {
        Category::PlasticSurgeryPractice
    } else if contains_any(&name, &["medspa", "medical spa", "med spa"]) {
        Category::MedicalSpa
    } else if services.contains("laser") || services.contains("aesthetic") {
        Category::AestheticCenter
    } else {
        Category::HealthcareProvider
    }
}

fn contains_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|word| text.contains(word))
}

fn lowered(text: Option<&str>) -> String {
    text.map(str::to_lowercase).unwrap_or_default()
}
