use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::export_csv::{export_schema_csv_to_path, CSVExportError, XESToCSVOptions};
use crate::event_log::{import_xes::XESParseError, schema_discovery::discover_xes_schema_file};

/// Error of a full XES to CSV conversion
#[derive(Debug, Error)]
pub enum ConversionError {
    /// The XES input could not be decoded
    #[error(transparent)]
    Decode(#[from] XESParseError),
    /// The CSV output could not be written
    #[error(transparent)]
    Export(#[from] CSVExportError),
}

/// Statistics of a finished conversion
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConversionSummary {
    /// Number of traces in the XES document
    pub num_traces: usize,
    /// Number of written event rows
    pub num_rows: usize,
    /// Written CSV header
    pub header: Vec<String>,
}

///
/// Convert an XES file (optionally `.gz` compressed) into a CSV file
///
/// Discovers the attribute keys of `xes_path` and writes one row per event to `csv_path`.
///
pub fn convert_xes_to_csv<P: AsRef<Path>, Q: AsRef<Path>>(
    xes_path: P,
    csv_path: Q,
    options: &XESToCSVOptions,
) -> Result<ConversionSummary, ConversionError> {
    let schema = discover_xes_schema_file(xes_path.as_ref())?;
    let num_rows = export_schema_csv_to_path(csv_path.as_ref(), &schema, options)?;
    debug!(
        "Converted {:?} to {:?}",
        xes_path.as_ref(),
        csv_path.as_ref()
    );
    Ok(ConversionSummary {
        num_traces: schema.document.traces.len(),
        num_rows,
        header: schema.header,
    })
}
