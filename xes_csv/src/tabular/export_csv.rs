//! CSV Export of XES documents (one row per event)

use std::{
    fmt::Display,
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::event_log::{
    constants::UTF8_BOM,
    schema_discovery::{KeySet, XESSchema},
    xes_document::{Event, Trace, XESDocument},
};

/// Where the case identifier of a trace is taken from
///
/// Defaults to [`CaseIdSource::FirstStringAttribute`].
/// Use `CaseIdSource::Key(TRACE_ID_NAME.to_string())` to look up the `concept:name` attribute by its key instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum CaseIdSource {
    /// Case-level `string` attribute with the given key
    Key(String),
    /// First case-level `string` attribute of the trace, regardless of its key
    #[default]
    FirstStringAttribute,
}

impl Display for CaseIdSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Key(key) => write!(f, "attribute {key:?}"),
            Self::FirstStringAttribute => write!(f, "first string attribute"),
        }
    }
}

impl CaseIdSource {
    ///
    /// Get the (trimmed) case identifier of a trace
    ///
    /// Returns `None` if the trace has no matching attribute
    ///
    pub fn resolve<'a>(&self, trace: &'a Trace) -> Option<&'a str> {
        let attr = match self {
            Self::Key(key) => trace.get_by_key(key),
            Self::FirstStringAttribute => trace.string_attributes.first(),
        };
        attr.map(|a| a.value.trim())
    }
}

/// Options for CSV Export
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct XESToCSVOptions {
    /// How the value of the trailing case identifier column is determined
    pub case_id: CaseIdSource,
}

/// Error type for CSV export
#[derive(Debug, Error)]
pub enum CSVExportError {
    /// IO error during writing (e.g., when creating the file)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// CSV writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// A trace with events has no case identifier
    #[error("Trace {trace_index} has no case identifier ({case_id})")]
    MissingCaseId {
        /// Index of the trace in the document
        trace_index: usize,
        /// Where the case identifier was looked up
        case_id: CaseIdSource,
    },
}

///
/// Build the record for one event
///
/// Column `i` holds the value of `keys[i]`; the last column holds the case identifier.
/// Attributes with keys not contained in `keys` are dropped.
///
fn event_record(keys: &KeySet, event: &Event, case_id: &str) -> Vec<String> {
    let mut record = vec![String::new(); keys.len() + 1];
    for attr in event.attributes() {
        if let Some(index) = keys.position(&attr.key) {
            record[index] = attr.value.trim().to_string();
        }
    }
    record[keys.len()] = case_id.to_string();
    record
}

///
/// Export an [`XESDocument`] as CSV to the given writer
///
/// Writes a UTF-8 BOM, the `header` row and then one row per event (in document order).
/// Returns the number of written event rows.
///
pub fn export_csv<W: Write>(
    mut writer: W,
    header: &[String],
    keys: &KeySet,
    document: &XESDocument,
    options: &XESToCSVOptions,
) -> Result<usize, CSVExportError> {
    writer.write_all(UTF8_BOM)?;
    let mut csv_writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(writer);
    csv_writer.write_record(header)?;

    let mut rows = 0;
    for (trace_index, trace) in document.traces.iter().enumerate() {
        if trace.events.is_empty() {
            continue;
        }
        let case_id =
            options
                .case_id
                .resolve(trace)
                .ok_or_else(|| CSVExportError::MissingCaseId {
                    trace_index,
                    case_id: options.case_id.clone(),
                })?;
        for event in &trace.events {
            csv_writer.write_record(event_record(keys, event, case_id))?;
            rows += 1;
        }
    }
    csv_writer.flush()?;
    debug!("Wrote {rows} event rows with {} columns", header.len());
    Ok(rows)
}

///
/// Export an [`XESDocument`] as CSV to a file at the specified path
///
/// An existing file is truncated. On failure, a partially written file may remain.
///
pub fn export_csv_to_path<P: AsRef<Path>>(
    path: P,
    header: &[String],
    keys: &KeySet,
    document: &XESDocument,
    options: &XESToCSVOptions,
) -> Result<usize, CSVExportError> {
    let writer = BufWriter::new(File::create(path)?);
    export_csv(writer, header, keys, document, options)
}

///
/// Export an [`XESDocument`] as CSV into a byte array ([`Vec<u8>`])
///
pub fn export_csv_to_vec(
    header: &[String],
    keys: &KeySet,
    document: &XESDocument,
    options: &XESToCSVOptions,
) -> Result<Vec<u8>, CSVExportError> {
    let mut buf = Vec::new();
    export_csv(&mut buf, header, keys, document, options)?;
    Ok(buf)
}

///
/// Export a discovered [`XESSchema`] as CSV to a file at the specified path
///
pub fn export_schema_csv_to_path<P: AsRef<Path>>(
    path: P,
    schema: &XESSchema,
    options: &XESToCSVOptions,
) -> Result<usize, CSVExportError> {
    export_csv_to_path(
        path,
        &schema.header,
        &schema.keys,
        &schema.document,
        options,
    )
}
