mod builder;
mod model;


pub use builder::DeckBuilder;
pub use model::{ModelField, ModelTemplate, NoteModel};

use serde::Serialize;

/// First deck id handed out in a run. Later decks count up from here.
pub const BASE_DECK_ID: i64 = 1676571463;

/// Identifier of one deck within a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct DeckId(pub i64);

impl DeckId {
    pub fn base() -> Self {
        DeckId(BASE_DECK_ID)
    }

    /// Id of the deck built from batch `index`, equivalent to calling
    /// [`DeckId::next`] `index` times on [`DeckId::base`]
    pub fn for_batch(index: usize) -> Self {
        DeckId(BASE_DECK_ID + index as i64)
    }

    pub fn next(self) -> Self {
        DeckId(self.0 + 1)
    }
}

/// Front/back text pair shown to the learner
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flashcard {
    pub front: String,
    pub back: String,
}

impl Flashcard {
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
        }
    }
}

/// Cards destined for a single package file
#[derive(Debug, Clone, Serialize)]
pub struct Deck {
    pub id: DeckId,
    pub name: String,
    pub cards: Vec<Flashcard>,
}

impl Deck {
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
