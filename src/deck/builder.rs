use super::{Deck, DeckId, Flashcard};
use crate::error::Result;
use crate::reader::Record;

/// Maps records onto flashcards using two named columns
#[derive(Debug, Clone)]
pub struct DeckBuilder {
    word_column: String,
    reading_column: String,
    deck_name: String,
}

impl DeckBuilder {
    pub fn new(
        word_column: impl Into<String>,
        reading_column: impl Into<String>,
        deck_name: impl Into<String>,
    ) -> Self {
        Self {
            word_column: word_column.into(),
            reading_column: reading_column.into(),
            deck_name: deck_name.into(),
        }
    }

    /// Build one deck from `batch`, consuming `id`.
    ///
    /// Returns the deck together with the id to use for the next one.
    pub fn build(&self, batch: &[Record], id: DeckId) -> Result<(Deck, DeckId)> {
        let cards = batch
            .iter()
            .map(|record| self.card_for(record))
            .collect::<Result<Vec<_>>>()?;

        let deck = Deck {
            id,
            name: self.deck_name.clone(),
            cards,
        };
        Ok((deck, id.next()))
    }

    fn card_for(&self, record: &Record) -> Result<Flashcard> {
        let front = record.require(&self.word_column)?;
        let back = record.require(&self.reading_column)?;
        Ok(Flashcard::new(front, back))
    }
}
