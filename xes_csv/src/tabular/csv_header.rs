//! Inspection of the header line of (arbitrary) CSV files

use std::io::{BufRead, BufReader, Read};

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Delimiters considered when sniffing, in order of preference on ties
const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Error type for CSV header inspection
#[derive(Debug, Error)]
pub enum CSVHeaderError {
    /// Low-level IO error while reading
    #[error("Failed to read CSV: {0}")]
    Read(#[from] std::io::Error),
    /// CSV parsing error
    #[error("Failed to read CSV header: {0}")]
    Csv(#[from] csv::Error),
    /// The input does not contain a single record
    #[error("Failed to read CSV header: input is empty")]
    Empty,
    /// The configured delimiter is not a single-byte (ASCII) character
    #[error("Unsupported CSV delimiter {0:?}")]
    InvalidDelimiter(char),
}

/// Options for CSV header inspection
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CSVHeaderOptions {
    /// Field delimiter to use
    ///
    /// If `None`, the delimiter is sniffed from the first line (falling back to `,`)
    pub delimiter: Option<char>,
}

/// Column names and delimiter of a CSV file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CSVHeader {
    /// Column names of the first record (without leading BOM or spaces)
    pub columns: Vec<String>,
    /// Field delimiter used to parse the first record
    pub delimiter: char,
}

/// Position of the sniffer inside the current field
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SniffState {
    FieldStart,
    Unquoted,
    Quoted,
    /// A quote was read inside a quoted field (either an escaped `""` or the closing quote)
    QuoteInQuoted,
}

///
/// Guess the delimiter of the first line in `data`
///
/// A comma outside of quotes always wins; otherwise the most frequent of `;`, `\t` and `|` is used.
/// Defaults to `,`.
///
/// Only a quote at the start of a field opens a quoted field, matching how the CSV reader
/// treats stray quotes.
///
fn sniff_delimiter(data: &[u8]) -> u8 {
    let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);
    let mut counts = [0usize; CANDIDATE_DELIMITERS.len()];
    let mut state = SniffState::FieldStart;
    for &b in data {
        state = match (state, b) {
            (SniffState::Quoted, b'"') => SniffState::QuoteInQuoted,
            (SniffState::Quoted, _) => SniffState::Quoted,
            (SniffState::FieldStart, b'"') => SniffState::Quoted,
            (SniffState::QuoteInQuoted, b'"') => SniffState::Quoted,
            (_, b'\n' | b'\r') => break,
            (_, _) => match CANDIDATE_DELIMITERS.iter().position(|d| *d == b) {
                Some(i) => {
                    counts[i] += 1;
                    SniffState::FieldStart
                }
                None => SniffState::Unquoted,
            },
        };
    }
    if counts[0] > 0 {
        return b',';
    }
    let mut best = 0;
    for i in 1..counts.len() {
        if counts[i] > counts[best] {
            best = i;
        }
    }
    CANDIDATE_DELIMITERS[best]
}

///
/// Read the column names and delimiter from the first record of CSV data
///
/// Quotes are handled leniently: stray quotes inside fields do not cause errors.
/// Only the first record is consumed (plus read-ahead buffering); the reader is not closed,
/// so `&mut R` can be passed to keep ownership.
///
pub fn inspect_csv_header<R: Read>(
    reader: R,
    options: &CSVHeaderOptions,
) -> Result<CSVHeader, CSVHeaderError> {
    let mut reader = BufReader::new(reader);
    let delimiter = match options.delimiter {
        Some(d) if d.is_ascii() => d as u8,
        Some(d) => return Err(CSVHeaderError::InvalidDelimiter(d)),
        None => sniff_delimiter(reader.fill_buf()?),
    };

    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(reader);
    let mut record = csv::ByteRecord::new();
    if !csv_reader.read_byte_record(&mut record)? {
        return Err(CSVHeaderError::Empty);
    }

    // Column names that are not valid UTF-8 are decoded lossily
    let columns: Vec<String> = record
        .iter()
        .map(|col| {
            String::from_utf8_lossy(col)
                .trim_start_matches(['\u{FEFF}', ' '])
                .to_string()
        })
        .collect();
    debug!(
        "Read {} CSV columns with delimiter {:?}",
        columns.len(),
        delimiter as char
    );
    Ok(CSVHeader {
        columns,
        delimiter: delimiter as char,
    })
}
