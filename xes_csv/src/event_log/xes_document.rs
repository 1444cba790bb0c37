use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
///
/// Attribute made up of the key and its (textual) value
///
/// Both `string` and `date` XES attributes are represented like this: dates are carried as text and not parsed
///
pub struct Attribute {
    /// Attribute key
    pub key: String,
    /// Attribute value
    pub value: String,
}

impl Attribute {
    ///
    /// Helper to create a new attribute
    ///
    pub fn new<K: Into<String>, V: Into<String>>(key: K, value: V) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
///
/// An event of a [`Trace`]
///
/// Only the `string` and `date` attributes of the event are retained (in document order)
///
pub struct Event {
    /// `string` attributes of the event
    pub string_attributes: Vec<Attribute>,
    /// `date` attributes of the event
    pub date_attributes: Vec<Attribute>,
}

impl Event {
    ///
    /// Iterate over all attributes of the event
    ///
    /// All `string` attributes are returned before the `date` attributes
    ///
    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.string_attributes
            .iter()
            .chain(self.date_attributes.iter())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
///
/// A trace (i.e., one case or process instance), consisting of case-level `string` attributes and an ordered list of events
///
pub struct Trace {
    /// Case-level `string` attributes
    pub string_attributes: Vec<Attribute>,
    /// Events of the trace in document order
    pub events: Vec<Event>,
}

impl Trace {
    ///
    /// Get the first case-level `string` attribute with the given key
    ///
    pub fn get_by_key(&self, key: &str) -> Option<&Attribute> {
        self.string_attributes.iter().find(|a| a.key == key)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
///
/// In-memory representation of the parts of an XES `<log>` relevant for tabular export
///
pub struct XESDocument {
    /// Traces in document order
    pub traces: Vec<Trace>,
}

impl XESDocument {
    /// Total number of events over all traces
    pub fn num_events(&self) -> usize {
        self.traces.iter().map(|t| t.events.len()).sum()
    }

    /// Iterate over all events together with the trace they belong to
    pub fn events_with_trace(&self) -> impl Iterator<Item = (&Trace, &Event)> {
        self.traces
            .iter()
            .flat_map(|t| t.events.iter().map(move |e| (t, e)))
    }
}
