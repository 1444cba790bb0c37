/// Common identifying field for trace identities (i.e., trace IDs)
///
/// Key to look up the case identifier of a trace by name
/// (see [`crate::tabular::export_csv::CaseIdSource::Key`])
pub const TRACE_ID_NAME: &str = "concept:name";
/// Prefix prepended to trace attribute keys when flattening an event log to events only
///
/// Primarily used only for interoperability with `PM4Py`
pub const TRACE_PREFIX: &str = "case:";
/// Constructed combination of [`TRACE_PREFIX`] and [`TRACE_ID_NAME`]
///
/// Name of the trailing case identifier column of every exported CSV table
pub const PREFIXED_TRACE_ID_NAME: &str = "case:concept:name";
/// UTF-8 byte-order mark written in front of exported CSV tables
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
