mod table;

#[cfg(test)]
mod tests;

pub use table::{Header, Record, Table};

use csv::{ReaderBuilder, StringRecord};
use log::{debug, info};
use std::borrow::Cow;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use crate::config::TextEncoding;
use crate::error::{DeckError, Result};

const UTF8_BOM: &str = "\u{feff}";

/// How to interpret the bytes of a delimited input file
#[derive(Debug, Clone, Copy)]
pub struct ReaderOptions {
    pub delimiter: u8,
    pub encoding: TextEncoding,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            encoding: TextEncoding::Utf8,
        }
    }
}

/// Read a delimited file with a header row into memory.
///
/// The file handle is released before this returns.
pub fn read_records(path: &Path, options: &ReaderOptions) -> Result<Table> {
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DeckError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => DeckError::io(path, e),
    })?;

    let text = decode(path, &bytes, options.encoding)?;
    let table = parse_records(path, &text, options.delimiter)?;

    info!(
        "[reader] Loaded {} records ({} columns) from {}",
        table.len(),
        table.header.len(),
        path.display()
    );
    Ok(table)
}

fn decode<'a>(path: &Path, bytes: &'a [u8], encoding: TextEncoding) -> Result<Cow<'a, str>> {
    let text = match encoding {
        TextEncoding::Utf8 => match std::str::from_utf8(bytes) {
            Ok(s) => Cow::Borrowed(s),
            Err(e) => {
                let line = bytes[..e.valid_up_to()]
                    .iter()
                    .filter(|&&b| b == b'\n')
                    .count() as u64
                    + 1;
                return Err(DeckError::MalformedInput {
                    path: path.to_path_buf(),
                    line,
                    reason: format!("invalid UTF-8 at byte {}", e.valid_up_to()),
                });
            }
        },
        TextEncoding::Utf8Lossy => String::from_utf8_lossy(bytes),
    };

    Ok(match text {
        Cow::Borrowed(s) => Cow::Borrowed(s.strip_prefix(UTF8_BOM).unwrap_or(s)),
        Cow::Owned(s) => match s.strip_prefix(UTF8_BOM) {
            Some(rest) => Cow::Owned(rest.to_string()),
            None => Cow::Owned(s),
        },
    })
}

/// Parse already-decoded text. `path` is only used for diagnostics.
pub fn parse_records(path: &Path, text: &str, delimiter: u8) -> Result<Table> {
    let malformed = |line: u64, reason: String| DeckError::MalformedInput {
        path: path.to_path_buf(),
        line,
        reason,
    };

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(text.as_bytes());

    let header_row = rdr
        .headers()
        .map_err(|e| malformed(error_line(&e).unwrap_or(1), e.to_string()))?
        .clone();

    if header_row.is_empty() || header_row.iter().all(str::is_empty) {
        return Err(malformed(1, "missing header row".to_string()));
    }

    let header = Arc::new(Header::new(
        header_row.iter().map(str::to_string).collect(),
    ));
    debug!("[reader] Header columns: {:?}", header.columns());

    let mut records = Vec::new();
    let mut row = StringRecord::new();
    loop {
        match rdr.read_record(&mut row) {
            Ok(true) => {
                let line = row.position().map(|p| p.line()).unwrap_or(0);
                let values = row.iter().map(str::to_string).collect();
                records.push(Record::new(Arc::clone(&header), values, line));
            }
            Ok(false) => break,
            Err(e) => {
                let line = error_line(&e).unwrap_or(0);
                return Err(malformed(line, e.to_string()));
            }
        }
    }

    Ok(Table { header, records })
}

fn error_line(err: &csv::Error) -> Option<u64> {
    err.position().map(|p| p.line())
}
