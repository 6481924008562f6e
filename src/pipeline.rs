use log::{debug, info, warn};
use serde::Serialize;
use std::path::PathBuf;

use crate::batcher::Batcher;
use crate::config::{Config, RECOMMENDED_MAX_BATCH};
use crate::deck::{Deck, DeckBuilder, DeckId, NoteModel};
use crate::error::Result;
use crate::package::PackageWriter;
use crate::reader::{read_records, ReaderOptions, Record};
use crate::writer::{DeckWriter, OutputLayout};

/// One package written by a run
#[derive(Debug, Clone, Serialize)]
pub struct WrittenDeck {
    pub id: DeckId,
    pub path: PathBuf,
    pub card_count: usize,
}

/// Outcome of a successful run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub record_count: usize,
    pub decks: Vec<WrittenDeck>,
}

impl RunSummary {
    pub fn card_count(&self) -> usize {
        self.decks.iter().map(|d| d.card_count).sum()
    }
}

/// Read, batch, build and write every deck described by `config`.
///
/// Stops at the first error. Packages written before the failure stay on
/// disk.
pub fn run(config: &Config) -> Result<RunSummary> {
    run_with_writer(config, PackageWriter::new(NoteModel::word_reading()))
}

/// [`run`] with a caller-supplied package writer
pub fn run_with_writer(config: &Config, package: PackageWriter) -> Result<RunSummary> {
    if config.verbose {
        debug!(
            "[pipeline] Config: {}",
            serde_json::to_string(config).unwrap_or_default()
        );
    }

    let layout = OutputLayout::new(&config.output_dir, &config.output_file)?;

    let options = ReaderOptions {
        delimiter: config.delimiter,
        encoding: config.encoding,
    };
    let table = read_records(&config.input, &options)?;
    table.require_columns(&[config.word_column.as_str(), config.reading_column.as_str()])?;

    if config.exceeds_recommended_size(table.len()) {
        warn!(
            "[pipeline] Decks will exceed {} cards; some importers (e.g. jpdb) reject larger decks",
            RECOMMENDED_MAX_BATCH
        );
    }

    let batcher = Batcher::new(config.batch_size);
    let batches = batcher.split(&table.records);

    let builder = DeckBuilder::new(
        config.word_column.as_str(),
        config.reading_column.as_str(),
        config.deck_name.as_str(),
    );
    let decks = build_decks(&builder, &batches)?;

    let mut summary = RunSummary {
        record_count: table.len(),
        decks: Vec::with_capacity(decks.len()),
    };
    if decks.is_empty() {
        info!("[pipeline] No records in {}, nothing to write", config.input.display());
        return Ok(summary);
    }

    let writer = DeckWriter::new(layout, package);
    writer.layout().ensure_dir()?;

    for (index, deck) in decks.iter().enumerate() {
        let path = writer.write(deck, index)?;
        info!(
            "[pipeline] Wrote deck {} ({} cards) to {}",
            deck.id.0,
            deck.len(),
            path.display()
        );
        summary.decks.push(WrittenDeck {
            id: deck.id,
            path,
            card_count: deck.len(),
        });
    }

    Ok(summary)
}

/// Build every deck up front so a bad row aborts before anything is written
fn build_decks(builder: &DeckBuilder, batches: &[&[Record]]) -> Result<Vec<Deck>> {
    let mut decks = Vec::with_capacity(batches.len());
    let mut next_id = DeckId::base();

    for batch in batches {
        let (deck, following) = builder.build(batch, next_id)?;
        if let Some(first) = deck.cards.first() {
            debug!(
                "[pipeline] Deck {} first card: {} / {}",
                deck.id.0, first.front, first.back
            );
        }
        decks.push(deck);
        next_id = following;
    }

    Ok(decks)
}
