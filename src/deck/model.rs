use serde::{Deserialize, Serialize};

/// Hard-coded so re-imports update the same note type instead of adding a copy
pub const WORD_READING_MODEL_ID: i64 = 1656946912;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelField {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelTemplate {
    pub name: String,
    /// Question (front) format
    pub qfmt: String,
    /// Answer (back) format
    pub afmt: String,
}

/// Note type shared by every card in a package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteModel {
    pub id: i64,
    pub name: String,
    pub fields: Vec<ModelField>,
    pub templates: Vec<ModelTemplate>,
    pub css: String,
}

impl NoteModel {
    /// Two-field model: word on the front, reading revealed on the back
    pub fn word_reading() -> Self {
        Self {
            id: WORD_READING_MODEL_ID,
            name: "Word/Reading Model".to_string(),
            fields: vec![
                ModelField {
                    name: "Word".to_string(),
                },
                ModelField {
                    name: "Reading".to_string(),
                },
            ],
            templates: vec![ModelTemplate {
                name: "Card".to_string(),
                qfmt: "{{Word}}".to_string(),
                afmt: "{{FrontSide}}<hr id=\"answer\">{{Reading}}".to_string(),
            }],
            css: String::new(),
        }
    }
}

impl Default for NoteModel {
    fn default() -> Self {
        Self::word_reading()
    }
}
