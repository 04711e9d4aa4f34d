use provider_fusion_service::{
    score, Category, ClusterOptions, ClusterStrategy, FusionPipeline, PriorityTable, RecordFields,
    Source, SourceRecord,
};

fn listing(
    source: Source,
    row: usize,
    name: &str,
    phone: &str,
    address: &str,
    city: &str,
) -> SourceRecord {
    let value = |v: &str| Some(v.to_string()).filter(|v| !v.is_empty());
    SourceRecord::new(
        source.clone(),
        &format!("{source}.csv"),
        row,
        RecordFields {
            business_name: value(name),
            phone: value(phone),
            address: value(address),
            city: value(city),
            ..Default::default()
        },
    )
}

fn abc_medspa_pair() -> Vec<SourceRecord> {
    vec![
        listing(Source::Npi, 0, "ABC MedSpa", "212-555-0100", "123 Main St", "NYC"),
        listing(Source::Brave, 0, "ABC Med Spa", "(212) 555-0100", "123 Main Street", "NYC"),
    ]
}

#[test]
fn same_practice_from_two_sources_fuses_into_one_entity() {
    let records = abc_medspa_pair();
    assert!(score(&records[0].match_key(), &records[1].match_key()) >= 60);

    let output = FusionPipeline::default().run(records).unwrap();
    assert_eq!(output.clusters.len(), 1);
    assert_eq!(output.entities.len(), 1);
    let entity = &output.entities[0];
    assert_eq!(entity.source_count, 2);
    assert_eq!(entity.data_sources, "NPI, Brave");
    assert_eq!(entity.category, Category::MedicalSpa);
    assert_eq!(entity.phone.as_deref(), Some("212-555-0100"));
    assert_eq!(entity.business_name.as_deref(), Some("ABC MedSpa"));
    assert_eq!(output.report.duplicates_removed, 1);
    assert_eq!(output.report.multi_source_entities, 1);
}

#[test]
fn priority_order_does_not_depend_on_input_order() {
    let mut records = abc_medspa_pair();
    records.reverse();
    let output = FusionPipeline::default().run(records).unwrap();
    let entity = &output.entities[0];
    assert_eq!(entity.data_sources, "NPI, Brave");
    assert_eq!(entity.phone.as_deref(), Some("212-555-0100"));
    assert_eq!(entity.address.as_deref(), Some("123 Main St"));
}

#[test]
fn records_sharing_only_a_city_stay_apart() {
    let records = vec![
        listing(Source::Npi, 0, "Harbor Family Medicine", "3105550111", "1 Ocean Blvd", "Long Beach"),
        listing(Source::Groupon, 0, "Zen Nails", "5625550999", "77 Pine Ave", "Long Beach"),
    ];
    assert_eq!(score(&records[0].match_key(), &records[1].match_key()), 10);

    let output = FusionPipeline::default().run(records).unwrap();
    assert_eq!(output.entities.len(), 2);
    assert!(output.entities.iter().all(|e| e.source_count == 1));
    assert_eq!(output.entities[0].data_sources, "NPI");
    assert_eq!(output.entities[1].data_sources, "Groupon");
}

#[test]
fn unrelated_records_each_become_their_own_entity() {
    let records = vec![
        listing(Source::Npi, 0, "Harbor Family Medicine", "3105550111", "1 Ocean Blvd", "Long Beach"),
        listing(Source::Comprehensive, 0, "Bright Smile Dental", "2125550122", "40 W 4th St", "New York"),
        listing(Source::MedSpaFinder, 0, "", "", "", ""),
        listing(Source::Brave, 0, "Peak Dermatology", "7205550133", "900 Elm Rd", "Denver"),
        listing(Source::Groupon, 0, "Luxe Laser Lounge", "3055550144", "12 Bay Dr", "Miami"),
    ];
    let output = FusionPipeline::default().run(records).unwrap();
    assert_eq!(output.entities.len(), 5);
    assert_eq!(output.report.total_input_records, 5);
    assert_eq!(output.report.duplicates_removed, 0);
    assert_eq!(output.report.multi_source_entities, 0);
    assert_eq!(output.report.by_category["Dental Practice"], 1);
    assert_eq!(output.report.by_category["Dermatology Practice"], 1);
    assert_eq!(output.report.by_category["Healthcare Provider"], 3);
}

fn mixed_dataset() -> Vec<SourceRecord> {
    vec![
        listing(Source::Groupon, 0, "Glow Skin Studio", "5125550100", "10 Elm St", "Austin"),
        listing(Source::Npi, 0, "Glow Skin Studio LLC", "512-555-0100", "10 Elm Street", "Austin"),
        listing(Source::Brave, 0, "Glow Skin", "(512) 555-0100", "", "Austin"),
        listing(Source::Npi, 1, "Cedar Park Dental", "5125550200", "200 Oak Ln", "Cedar Park"),
        listing(Source::Brave, 1, "Cedar Park Dental Group", "512 555 0200", "200 Oak Lane", "Cedar Park"),
        listing(Source::from("Yelp"), 0, "Lakeway Wellness", "", "", "Lakeway"),
        listing(Source::Groupon, 1, "Glow Skin", "", "", "Austin"),
    ]
}

#[test]
fn every_record_is_clustered_once_and_counted() {
    for strategy in [ClusterStrategy::SeedAnchored, ClusterStrategy::Transitive] {
        let options = ClusterOptions { strategy, ..Default::default() };
        let records = mixed_dataset();
        let total = records.len();
        let output = FusionPipeline::new(options, PriorityTable::default())
            .run(records)
            .unwrap();

        let mut seen: Vec<usize> = output
            .clusters
            .iter()
            .flat_map(|c| c.members().to_vec())
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..total).collect::<Vec<_>>());

        for (cluster, entity) in output.clusters.iter().zip(&output.entities) {
            assert_eq!(entity.source_count, cluster.len());
            assert_eq!(entity.data_sources.split(", ").count(), cluster.len());
        }
        assert_eq!(output.cluster_rows().len(), total);
        let fused: usize = output.entities.iter().map(|e| e.source_count).sum();
        assert_eq!(fused, total);
    }
}

#[test]
fn mixed_dataset_groups_by_practice() {
    let output = FusionPipeline::default().run(mixed_dataset()).unwrap();
    let sizes: Vec<usize> = output.clusters.iter().map(|c| c.len()).collect();
    assert_eq!(sizes, vec![3, 2, 1, 1]);

    let glow = &output.entities[0];
    assert_eq!(glow.data_sources, "NPI, Brave, Groupon");
    assert_eq!(glow.business_name.as_deref(), Some("Glow Skin Studio LLC"));
    assert_eq!(glow.address.as_deref(), Some("10 Elm Street"));

    let dental = &output.entities[1];
    assert_eq!(dental.category, Category::DentalPractice);
    assert_eq!(dental.data_sources, "NPI, Brave");
    assert_eq!(output.report.by_source["Yelp"], 1);
}
