use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::bufread::GzDecoder;
use log::{debug, warn};
use quick_xml::{events::BytesStart, Reader};
use thiserror::Error;

use super::xes_document::{Attribute, Event, Trace, XESDocument};

///
/// Error encountered while parsing XES
///
#[derive(Debug, Error)]
pub enum XESParseError {
    /// IO error (e.g., file not found or invalid gzip data)
    #[error("Failed to read XES: {0}")]
    IOError(#[from] std::io::Error),
    /// XML error (e.g., incorrect XML format)
    #[error("Failed to parse XES: invalid XML: {0}")]
    XMLParsingError(#[from] quick_xml::Error),
    /// The document does not start with a top-level `<log>` element
    #[error("Failed to parse XES: there is no top-level <log> element")]
    NoTopLevelLog,
    /// The input ended before the top-level `<log>` element was closed
    #[error("Failed to parse XES: unexpected end of input inside <log>")]
    UnexpectedEof,
    /// Missing key on XML element (with expected key included)
    #[error("Failed to parse XES: attribute element without `{0}`")]
    MissingKey(&'static str),
    /// XML attribute value that is not valid UTF-8
    #[error("Failed to parse XES: invalid UTF-8 in attribute value: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

///
/// Current Parsing Mode (i.e., which kind of tag is currently open)
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Log,
    Trace,
    Event,
    /// Anything not relevant for the tabular export (globals, nested or unsupported attributes, ...)
    Skipped,
}

/// Decode and unescape a raw XML attribute value
fn read_to_string(x: &[u8]) -> Result<String, XESParseError> {
    let x_str = std::str::from_utf8(x)?;
    let unescaped = quick_xml::escape::unescape(x_str).map_err(quick_xml::Error::Escape)?;
    Ok(unescaped.into_owned())
}

fn get_attribute_string(
    t: &BytesStart<'_>,
    key: &'static str,
) -> Result<Option<String>, XESParseError> {
    match t
        .try_get_attribute(key)
        .map_err(quick_xml::Error::from)?
    {
        Some(attr) => Ok(Some(read_to_string(attr.value.as_ref())?)),
        None => Ok(None),
    }
}

fn parse_attribute(t: &BytesStart<'_>) -> Result<Attribute, XESParseError> {
    let key = get_attribute_string(t, "key")?.ok_or(XESParseError::MissingKey("key"))?;
    let value = match get_attribute_string(t, "value")? {
        Some(value) => value,
        None => {
            warn!("Attribute {key:?} has no value. Will assume empty string as value.");
            String::new()
        }
    };
    Ok(Attribute { key, value })
}

///
/// Handle an opening (or self-closing) tag whose parent has the mode `parent`
///
/// Returns the mode of the opened element
///
fn open_element(
    t: &BytesStart<'_>,
    parent: Option<Mode>,
    document: &mut XESDocument,
) -> Result<Mode, XESParseError> {
    let name = t.local_name();
    let mode = match (parent, name.as_ref()) {
        (None, b"log") => Mode::Log,
        (None, _) => return Err(XESParseError::NoTopLevelLog),
        (Some(Mode::Log), b"trace") => {
            document.traces.push(Trace::default());
            Mode::Trace
        }
        (Some(Mode::Trace), b"event") => {
            match document.traces.last_mut() {
                Some(trace) => trace.events.push(Event::default()),
                None => warn!("Invalid XES format: Event without trace"),
            }
            Mode::Event
        }
        (Some(Mode::Trace), b"string") => {
            let attr = parse_attribute(t)?;
            if let Some(trace) = document.traces.last_mut() {
                trace.string_attributes.push(attr);
            }
            Mode::Skipped
        }
        (Some(Mode::Event), b"string" | b"date") => {
            let attr = parse_attribute(t)?;
            match document.traces.last_mut().and_then(|t| t.events.last_mut()) {
                Some(event) if name.as_ref() == b"string" => event.string_attributes.push(attr),
                Some(event) => event.date_attributes.push(attr),
                None => warn!("Invalid XES format: Attribute without event"),
            }
            Mode::Skipped
        }
        _ => Mode::Skipped,
    };
    Ok(mode)
}

///
/// Parse an [`XESDocument`] from the given reader
///
/// Only `<string>` attributes of traces and `<string>`/`<date>` attributes of events are retained.
/// Parsing stops once the top-level `<log>` element is closed.
///
pub fn import_xes<T>(reader: T) -> Result<XESDocument, XESParseError>
where
    T: BufRead,
{
    let mut reader = Reader::from_reader(reader);
    reader.config_mut().trim_text(true);
    let mut buf: Vec<u8> = Vec::new();

    let mut document = XESDocument::default();
    let mut open_modes: Vec<Mode> = Vec::new();
    let mut encountered_log = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            quick_xml::events::Event::Start(t) => {
                let mode = open_element(&t, open_modes.last().copied(), &mut document)?;
                encountered_log = true;
                open_modes.push(mode);
            }
            quick_xml::events::Event::Empty(t) => {
                open_element(&t, open_modes.last().copied(), &mut document)?;
                if open_modes.is_empty() {
                    // Self-closing <log/>
                    break;
                }
            }
            quick_xml::events::Event::End(_) => {
                open_modes.pop();
                if open_modes.is_empty() {
                    break;
                }
            }
            quick_xml::events::Event::Eof => {
                if !encountered_log {
                    return Err(XESParseError::NoTopLevelLog);
                }
                return Err(XESParseError::UnexpectedEof);
            }
            _ => {}
        }
        buf.clear();
    }

    debug!(
        "Parsed XES document with {} traces and {} events",
        document.traces.len(),
        document.num_events()
    );
    Ok(document)
}

///
/// Import an [`XESDocument`] from a file path
///
/// Files ending in `.gz` are decompressed while reading
///
pub fn import_xes_file<P: AsRef<Path>>(path: P) -> Result<XESDocument, XESParseError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    if path.to_string_lossy().ends_with(".gz") {
        let dec = GzDecoder::new(BufReader::new(file));
        import_xes(BufReader::new(dec))
    } else {
        import_xes(BufReader::new(file))
    }
}

///
/// Import an [`XESDocument`] directly from a string
///
pub fn import_xes_str(xes_str: &str) -> Result<XESDocument, XESParseError> {
    import_xes(xes_str.as_bytes())
}

///
/// Import an [`XESDocument`] from a byte slice (&\[u8\])
///
/// * `is_compressed_gz`: Parse the passed `xes_data` as a compressed .gz archive
///
pub fn import_xes_slice(
    xes_data: &[u8],
    is_compressed_gz: bool,
) -> Result<XESDocument, XESParseError> {
    if is_compressed_gz {
        let gz: GzDecoder<&[u8]> = GzDecoder::new(xes_data);
        return import_xes(BufReader::new(gz));
    }
    import_xes(xes_data)
}
