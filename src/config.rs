use serde::Serialize;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use crate::error::{DeckError, Result};

/// Largest deck some importers accept (jpdb caps decks at 10k entries)
pub const RECOMMENDED_MAX_BATCH: usize = 10_000;

/// Default deck title, shared by every batch of a run
pub const DEFAULT_DECK_NAME: &str = "Word/Reading";

/// Maximum number of records per deck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BatchSize {
    Unbounded,
    Max(NonZeroUsize),
}

impl BatchSize {
    /// `0` means a single deck holding every record
    pub fn from_count(count: usize) -> Self {
        match NonZeroUsize::new(count) {
            Some(n) => BatchSize::Max(n),
            None => BatchSize::Unbounded,
        }
    }

    pub fn limit(&self) -> Option<usize> {
        match self {
            BatchSize::Unbounded => None,
            BatchSize::Max(n) => Some(n.get()),
        }
    }
}

impl Default for BatchSize {
    fn default() -> Self {
        BatchSize::from_count(RECOMMENDED_MAX_BATCH)
    }
}

/// Text encoding of the input file. No detection is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TextEncoding {
    /// Strict UTF-8; invalid bytes are a malformed-input error
    #[default]
    Utf8,
    /// UTF-8 with invalid sequences replaced by U+FFFD
    Utf8Lossy,
}

/// Resolve a user-supplied delimiter into a single byte.
///
/// `tab` and the two-character escape `\t` are aliases for a real tab.
pub fn parse_delimiter(raw: &str) -> Result<u8> {
    let resolved = match raw {
        "tab" | "\\t" => "\t",
        other => other,
    };

    match resolved.as_bytes() {
        [byte] => Ok(*byte),
        _ => Err(DeckError::InvalidDelimiter(raw.to_string())),
    }
}

/// Fully resolved settings for one conversion run
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    pub input: PathBuf,
    pub word_column: String,
    pub reading_column: String,
    #[serde(serialize_with = "serialize_delimiter")]
    pub delimiter: u8,
    pub encoding: TextEncoding,
    pub batch_size: BatchSize,
    pub output_file: String,
    pub output_dir: PathBuf,
    pub deck_name: String,
    pub verbose: bool,
}

fn serialize_delimiter<S: serde::Serializer>(
    delimiter: &u8,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&(*delimiter as char).escape_default().to_string())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from("words.csv"),
            word_column: "word".to_string(),
            reading_column: "reading".to_string(),
            delimiter: b',',
            encoding: TextEncoding::default(),
            batch_size: BatchSize::default(),
            output_file: "output.apkg".to_string(),
            output_dir: PathBuf::from("output"),
            deck_name: DEFAULT_DECK_NAME.to_string(),
            verbose: false,
        }
    }
}

impl Config {
    /// Returns true when a run over `record_count` rows would produce a deck
    /// larger than [`RECOMMENDED_MAX_BATCH`]. Oversized decks are allowed;
    /// callers only warn.
    pub fn exceeds_recommended_size(&self, record_count: usize) -> bool {
        let largest = match self.batch_size.limit() {
            Some(limit) => limit.min(record_count),
            None => record_count,
        };
        largest > RECOMMENDED_MAX_BATCH
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delimiter_aliases() {
        assert_eq!(parse_delimiter(",").unwrap(), b',');
        assert_eq!(parse_delimiter(";").unwrap(), b';');
        assert_eq!(parse_delimiter("tab").unwrap(), b'\t');
        assert_eq!(parse_delimiter("\\t").unwrap(), b'\t');
        assert_eq!(parse_delimiter("\t").unwrap(), b'\t');
    }

    #[test]
    fn test_delimiter_must_be_one_byte() {
        assert!(matches!(
            parse_delimiter(""),
            Err(DeckError::InvalidDelimiter(_))
        ));
        assert!(parse_delimiter("ab").is_err());
        assert!(parse_delimiter("、").is_err());
    }

    #[test]
    fn test_zero_batch_size_is_unbounded() {
        assert_eq!(BatchSize::from_count(0), BatchSize::Unbounded);
        assert_eq!(BatchSize::from_count(0).limit(), None);
        assert_eq!(BatchSize::from_count(250).limit(), Some(250));
        assert_eq!(BatchSize::default().limit(), Some(RECOMMENDED_MAX_BATCH));
    }

    #[test]
    fn test_oversized_deck_detection() {
        let mut config = Config::default();
        assert!(!config.exceeds_recommended_size(50_000));

        config.batch_size = BatchSize::Unbounded;
        assert!(!config.exceeds_recommended_size(RECOMMENDED_MAX_BATCH));
        assert!(config.exceeds_recommended_size(RECOMMENDED_MAX_BATCH + 1));

        config.batch_size = BatchSize::from_count(20_000);
        assert!(!config.exceeds_recommended_size(9_000));
        assert!(config.exceeds_recommended_size(12_000));
    }

    #[test]
    fn test_config_serializes_delimiter_readably() {
        let config = Config {
            delimiter: b'\t',
            ..Config::default()
        };
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["delimiter"], "\\t");
        assert_eq!(json["batch_size"]["Max"], 10_000);
    }
}
