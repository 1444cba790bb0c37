#![warn(
    clippy::doc_markdown,
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs
)]

#![doc = include_str!("../README.md")]

///
/// XES event data (in-memory [`XESDocument`], import and schema discovery)
///
pub mod event_log {
    /// Constants
    pub mod constants;
    /// XES Import
    pub mod import_xes;
    /// Discovery of the attribute keys used by the events of an XES document
    pub mod schema_discovery;
    /// [`XESDocument`] struct and sub-structs
    pub mod xes_document;

    pub use xes_document::{Attribute, Event, Trace, XESDocument};
    #[cfg(test)]
    mod tests;
}

///
/// Tabular (CSV) export and inspection
///
pub mod tabular {
    /// Full XES to CSV conversion between file paths
    pub mod convert;
    /// Inspection of CSV header lines
    pub mod csv_header;
    /// CSV Export of [`XESDocument`]s
    pub mod export_csv;
}

#[doc(inline)]
pub use event_log::xes_document::XESDocument;

#[doc(inline)]
pub use event_log::import_xes::import_xes_file;

#[doc(inline)]
pub use event_log::import_xes::import_xes_slice;

#[doc(inline)]
pub use event_log::import_xes::XESParseError;

#[doc(inline)]
pub use event_log::schema_discovery::discover_xes_schema;

#[doc(inline)]
pub use event_log::schema_discovery::discover_xes_schema_file;

#[doc(inline)]
pub use event_log::schema_discovery::discover_xes_schema_slice;

#[doc(inline)]
pub use event_log::schema_discovery::KeySet;

#[doc(inline)]
pub use event_log::schema_discovery::XESSchema;

#[doc(inline)]
pub use tabular::export_csv::export_csv;

#[doc(inline)]
pub use tabular::export_csv::export_csv_to_path;

#[doc(inline)]
pub use tabular::export_csv::XESToCSVOptions;

#[doc(inline)]
pub use tabular::export_csv::CaseIdSource;

#[doc(inline)]
pub use tabular::csv_header::inspect_csv_header;

#[doc(inline)]
pub use tabular::csv_header::CSVHeaderOptions;

#[doc(inline)]
pub use tabular::convert::convert_xes_to_csv;
