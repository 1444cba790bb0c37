use crate::event_log::XESDocument;

mod schema_discovery_tests;

const RUNNING_EXAMPLE: &[u8] = include_bytes!("test_data/running_example.xes");
const SCENARIO: &[u8] = include_bytes!("test_data/scenario.xes");

/// Parse rows of CSV bytes produced by the exporter (after checking and skipping the BOM)
fn read_csv_rows(bytes: &[u8]) -> Vec<Vec<String>> {
    let bytes = bytes
        .strip_prefix(crate::event_log::constants::UTF8_BOM)
        .expect("exported CSV should start with a BOM");
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);
    rdr.records()
        .map(|r| r.unwrap().iter().map(|s| s.to_string()).collect())
        .collect()
}

#[test]
fn test_document_helpers() {
    let log = crate::import_xes_slice(RUNNING_EXAMPLE, false).unwrap();
    assert_eq!(log.num_events(), 5);
    let case_ids: Vec<&str> = log
        .events_with_trace()
        .map(|(t, _)| t.get_by_key("concept:name").unwrap().value.as_str())
        .collect();
    assert_eq!(case_ids, vec!["1", "1", "1", " 2 ", " 2 "]);
    assert_eq!(XESDocument::default().num_events(), 0);
}
