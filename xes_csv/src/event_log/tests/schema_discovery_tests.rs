use std::collections::HashSet;

use super::{read_csv_rows, RUNNING_EXAMPLE, SCENARIO};
use crate::{
    event_log::{
        constants::{PREFIXED_TRACE_ID_NAME, TRACE_ID_NAME},
        import_xes::XESParseError,
        schema_discovery::{discover_keys, discover_xes_schema, discover_xes_schema_slice},
    },
    tabular::{
        convert::{convert_xes_to_csv, ConversionError},
        csv_header::{inspect_csv_header, CSVHeaderOptions},
        export_csv::{export_csv_to_vec, CSVExportError, CaseIdSource, XESToCSVOptions},
    },
    KeySet, XESSchema,
};

fn export(schema: &XESSchema, options: &XESToCSVOptions) -> Vec<u8> {
    export_csv_to_vec(&schema.header, &schema.keys, &schema.document, options).unwrap()
}

#[test]
fn test_scenario() {
    let schema = discover_xes_schema(SCENARIO).unwrap();
    assert_eq!(
        schema.header,
        vec!["activity", "timestamp", "case:concept:name"]
    );
    assert_eq!(schema.keys.as_slice(), ["activity", "timestamp"]);
    let rows = read_csv_rows(&export(&schema, &XESToCSVOptions::default()));
    assert_eq!(
        rows,
        vec![
            vec!["activity", "timestamp", "case:concept:name"],
            vec!["submit", "", "Case1"],
            vec!["", "2024-01-01", "Case1"],
        ]
    );
}

#[test]
fn test_empty_document() {
    let schema = discover_xes_schema_slice(b"<log></log>", false).unwrap();
    assert!(schema.keys.is_empty());
    assert_eq!(schema.header, vec![PREFIXED_TRACE_ID_NAME]);
    let rows = read_csv_rows(&export(&schema, &XESToCSVOptions::default()));
    assert_eq!(rows, vec![vec![PREFIXED_TRACE_ID_NAME]]);
}

#[test]
fn test_running_example_keys_in_discovery_order() {
    let schema = discover_xes_schema(RUNNING_EXAMPLE).unwrap();
    // Strings of an event come before its dates
    assert_eq!(
        schema.keys.as_slice(),
        [
            "org:resource",
            "concept:name",
            "lifecycle:transition",
            "time:timestamp",
            "defectType",
        ]
    );
    assert_eq!(schema.header.last().unwrap(), PREFIXED_TRACE_ID_NAME);
    assert_eq!(schema.header.len(), schema.keys.len() + 1);
}

#[test]
fn test_key_set_is_distinct() {
    let schema = discover_xes_schema(RUNNING_EXAMPLE).unwrap();
    let distinct: HashSet<&str> = schema
        .document
        .events_with_trace()
        .flat_map(|(_, e)| e.attributes().map(|a| a.key.as_str()))
        .collect();
    assert_eq!(schema.keys.len(), distinct.len());
    let keys: HashSet<&String> = schema.keys.iter().collect();
    assert_eq!(keys.len(), schema.keys.len());
}

#[test]
fn test_key_set_positions() {
    let mut keys: KeySet = ["a", "b", "a"].into_iter().collect();
    assert_eq!(keys.len(), 2);
    assert!(!keys.insert("b"));
    assert!(keys.insert("c"));
    assert_eq!(keys.position("a"), Some(0));
    assert_eq!(keys.position("c"), Some(2));
    assert_eq!(keys.position(" a"), None);

    let json = serde_json::to_string(&keys).unwrap();
    assert_eq!(json, r#"["a","b","c"]"#);
    let parsed: KeySet = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, keys);
}

#[test]
fn test_rows_match_attributes() {
    let schema = discover_xes_schema(RUNNING_EXAMPLE).unwrap();
    let rows = read_csv_rows(&export(&schema, &XESToCSVOptions::default()));
    assert_eq!(rows[0], schema.header);
    let data_rows = &rows[1..];
    assert_eq!(data_rows.len(), schema.document.num_events());

    for (row, (trace, event)) in data_rows.iter().zip(schema.document.events_with_trace()) {
        assert_eq!(row.len(), schema.keys.len() + 1);
        let mut expected = vec![String::new(); schema.keys.len()];
        for attr in event.attributes() {
            // Every attribute key of the document was discovered
            let index = schema.keys.position(&attr.key).unwrap();
            expected[index] = attr.value.trim().to_string();
        }
        assert_eq!(&row[..schema.keys.len()], expected.as_slice());
        assert_eq!(
            row[schema.keys.len()],
            trace.string_attributes[0].value.trim()
        );
    }

    assert_eq!(
        data_rows[2],
        vec![
            "Tester3",
            "Analyze Defect",
            "complete",
            "1970-01-02T12:30:00.000+01:00",
            "6",
            "1"
        ]
    );
    assert_eq!(
        data_rows[4],
        vec![
            "Repairer & Co",
            "Repair (Complex)",
            "start",
            "1970-01-01T11:15:00.000+01:00",
            "",
            "2"
        ]
    );
}

#[test]
fn test_header_trims_keys() {
    let schema = discover_xes_schema_slice(
        br#"<log><trace><string key="concept:name" value="c"/><event><string key=" padded " value=" v "/></event></trace></log>"#,
        false,
    )
    .unwrap();
    assert_eq!(schema.keys.as_slice(), [" padded "]);
    assert_eq!(schema.header, vec!["padded", "case:concept:name"]);
    let rows = read_csv_rows(&export(&schema, &XESToCSVOptions::default()));
    assert_eq!(rows[1], vec!["v", "c"]);
}

#[test]
fn test_case_id_from_first_string_attribute() {
    let schema = discover_xes_schema_slice(
        br#"<log><trace><string key="variant" value=" v1 "/><string key="concept:name" value="c"/><event><string key="a" value="x"/></event></trace></log>"#,
        false,
    )
    .unwrap();
    let default_rows = read_csv_rows(&export(&schema, &XESToCSVOptions::default()));
    assert_eq!(default_rows[1], vec!["x", "v1"]);
    let by_key_rows = read_csv_rows(&export(
        &schema,
        &XESToCSVOptions {
            case_id: CaseIdSource::Key(TRACE_ID_NAME.to_string()),
        },
    ));
    assert_eq!(by_key_rows[1], vec!["x", "c"]);
}

#[test]
fn test_trace_without_string_attributes_is_rejected() {
    let schema = discover_xes_schema_slice(
        br#"<log><trace><event><string key="a" value="x"/></event></trace></log>"#,
        false,
    )
    .unwrap();
    let res = export_csv_to_vec(
        &schema.header,
        &schema.keys,
        &schema.document,
        &XESToCSVOptions {
            case_id: CaseIdSource::FirstStringAttribute,
        },
    );
    assert!(matches!(
        res,
        Err(CSVExportError::MissingCaseId { trace_index: 0, .. })
    ));
}

#[test]
fn test_header_roundtrip() {
    let schema = discover_xes_schema(RUNNING_EXAMPLE).unwrap();
    let bytes = export(&schema, &XESToCSVOptions::default());
    let header = inspect_csv_header(bytes.as_slice(), &CSVHeaderOptions::default()).unwrap();
    assert_eq!(header.columns, schema.header);
    assert_eq!(header.delimiter, ',');
}

#[test]
fn test_convert_between_files() {
    let dir = tempfile::tempdir().unwrap();
    let xes_path = dir.path().join("running_example.xes");
    let csv_path = dir.path().join("running_example.csv");
    std::fs::write(&xes_path, RUNNING_EXAMPLE).unwrap();

    let summary = convert_xes_to_csv(&xes_path, &csv_path, &XESToCSVOptions::default()).unwrap();
    assert_eq!(summary.num_traces, 3);
    assert_eq!(summary.num_rows, 5);

    let bytes = std::fs::read(&csv_path).unwrap();
    let rows = read_csv_rows(&bytes);
    assert_eq!(rows.len(), 6);
    assert_eq!(rows[0], summary.header);

    let mut file = std::fs::File::open(&csv_path).unwrap();
    let header = inspect_csv_header(&mut file, &CSVHeaderOptions::default()).unwrap();
    assert_eq!(header.columns, summary.header);
}

#[test]
fn test_convert_invalid_xes_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let xes_path = dir.path().join("invalid.xes");
    let csv_path = dir.path().join("invalid.csv");
    std::fs::write(&xes_path, "<log><trace></log>").unwrap();

    let res = convert_xes_to_csv(&xes_path, &csv_path, &XESToCSVOptions::default());
    assert!(matches!(
        res,
        Err(ConversionError::Decode(XESParseError::XMLParsingError(_)))
    ));
    assert!(!csv_path.exists());
}

#[test]
fn test_discovered_keys_match_document() {
    let schema = discover_xes_schema(RUNNING_EXAMPLE).unwrap();
    assert_eq!(discover_keys(&schema.document), schema.keys);
    assert_eq!(XESSchema::from(schema.document.clone()), schema);
}
