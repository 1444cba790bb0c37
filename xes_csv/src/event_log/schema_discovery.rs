use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use super::{
    constants::PREFIXED_TRACE_ID_NAME,
    import_xes::{import_xes, import_xes_file, import_xes_slice, XESParseError},
    xes_document::XESDocument,
};

///
/// Ordered set of distinct attribute keys
///
/// Keys keep the order in which they were first inserted.
/// Alongside the ordered keys, a key to position index is maintained so that the column of a key can be looked up directly.
///
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct KeySet {
    keys: Vec<String>,
    positions: HashMap<String, usize>,
}

impl KeySet {
    /// Create an empty [`KeySet`]
    pub fn new() -> Self {
        Self::default()
    }

    ///
    /// Insert a key if it is not yet contained
    ///
    /// Returns `true` if the key was newly inserted
    ///
    pub fn insert(&mut self, key: &str) -> bool {
        if self.positions.contains_key(key) {
            return false;
        }
        self.positions.insert(key.to_string(), self.keys.len());
        self.keys.push(key.to_string());
        true
    }

    /// Position of the given key (exact match), if contained
    pub fn position(&self, key: &str) -> Option<usize> {
        self.positions.get(key).copied()
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether there are no keys
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Keys in insertion order
    pub fn as_slice(&self) -> &[String] {
        &self.keys
    }

    /// Iterate over keys in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.keys.iter()
    }

    ///
    /// Build the CSV header for these keys
    ///
    /// Every key is trimmed and the case identifier column ([`PREFIXED_TRACE_ID_NAME`]) is appended
    ///
    pub fn csv_header(&self) -> Vec<String> {
        self.keys
            .iter()
            .map(|k| k.trim().to_string())
            .chain(std::iter::once(PREFIXED_TRACE_ID_NAME.to_string()))
            .collect()
    }
}

impl<S: AsRef<str>> FromIterator<S> for KeySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut key_set = KeySet::new();
        for key in iter {
            key_set.insert(key.as_ref());
        }
        key_set
    }
}

impl From<Vec<String>> for KeySet {
    fn from(keys: Vec<String>) -> Self {
        keys.into_iter().collect()
    }
}

impl From<KeySet> for Vec<String> {
    fn from(key_set: KeySet) -> Self {
        key_set.keys
    }
}

///
/// Collect all distinct event attribute keys of a document in order of first appearance
///
/// Traces and events are visited in document order; per event, `string` attributes come before `date` attributes.
/// Case-level trace attributes are not included.
///
pub fn discover_keys(document: &XESDocument) -> KeySet {
    let mut keys = KeySet::new();
    for (_, event) in document.events_with_trace() {
        for attr in event.attributes() {
            keys.insert(&attr.key);
        }
    }
    keys
}

///
/// Result of schema discovery: the parsed document, its distinct event attribute keys and the resulting CSV header
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XESSchema {
    /// CSV header (trimmed keys followed by the case identifier column)
    pub header: Vec<String>,
    /// Distinct event attribute keys (untrimmed) in order of first appearance
    pub keys: KeySet,
    /// The fully parsed document
    pub document: XESDocument,
}

impl From<XESDocument> for XESSchema {
    fn from(document: XESDocument) -> Self {
        let keys = discover_keys(&document);
        debug!(
            "Discovered {} distinct event attribute keys: {:?}",
            keys.len(),
            keys.as_slice()
        );
        Self {
            header: keys.csv_header(),
            keys,
            document,
        }
    }
}

///
/// Parse XES from the given reader and discover its attribute keys
///
pub fn discover_xes_schema<T: BufRead>(reader: T) -> Result<XESSchema, XESParseError> {
    Ok(import_xes(reader)?.into())
}

///
/// Parse an XES file (optionally `.gz` compressed) and discover its attribute keys
///
pub fn discover_xes_schema_file<P: AsRef<Path>>(path: P) -> Result<XESSchema, XESParseError> {
    Ok(import_xes_file(path)?.into())
}

///
/// Parse XES from a byte slice and discover its attribute keys
///
/// * `is_compressed_gz`: Parse the passed `xes_data` as a compressed .gz archive
///
pub fn discover_xes_schema_slice(
    xes_data: &[u8],
    is_compressed_gz: bool,
) -> Result<XESSchema, XESParseError> {
    Ok(import_xes_slice(xes_data, is_compressed_gz)?.into())
}
