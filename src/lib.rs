// Public API exports
pub mod batcher;
pub mod config;
pub mod deck;
pub mod error;
pub mod package;
pub mod pipeline;
pub mod reader;
pub mod writer;

// Re-export main types for convenience
pub use config::{
    parse_delimiter, BatchSize, Config, TextEncoding, DEFAULT_DECK_NAME, RECOMMENDED_MAX_BATCH,
};
pub use error::{DeckError, Result};

pub use reader::{parse_records, read_records, Header, ReaderOptions, Record, Table};

pub use batcher::Batcher;

pub use deck::{Deck, DeckBuilder, DeckId, Flashcard, NoteModel, BASE_DECK_ID};

pub use package::{PackageReader, PackageWriter};
pub use writer::{DeckWriter, OutputLayout};

pub use pipeline::{run, run_with_writer, RunSummary, WrittenDeck};
