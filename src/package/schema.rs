//! JSON blobs stored in the `col` row of an Anki collection.

use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::deck::{Deck, NoteModel};

/// Id Anki reserves for the built-in "Default" deck
pub const DEFAULT_DECK_ID: i64 = 1;

/// Collection schema version understood by every Anki 2.1 release
pub const SCHEMA_VERSION: i64 = 11;

const LATEX_PRE: &str = "\\documentclass[12pt]{article}\n\\special{papersize=3in,5in}\n\\usepackage[utf8]{inputenc}\n\\usepackage{amssymb,amsmath}\n\\pagestyle{empty}\n\\setlength{\\parindent}{0in}\n\\begin{document}\n";
const LATEX_POST: &str = "\\end{document}";

#[derive(Debug, Serialize)]
pub struct FieldJson {
    pub name: String,
    pub ord: usize,
    pub font: &'static str,
    pub media: Vec<String>,
    pub rtl: bool,
    pub size: u32,
    pub sticky: bool,
}

#[derive(Debug, Serialize)]
pub struct TemplateJson {
    pub name: String,
    pub ord: usize,
    pub qfmt: String,
    pub afmt: String,
    pub bqfmt: String,
    pub bafmt: String,
    pub did: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelJson {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: u8,
    pub did: i64,
    pub css: String,
    pub flds: Vec<FieldJson>,
    pub tmpls: Vec<TemplateJson>,
    pub latex_pre: &'static str,
    pub latex_post: &'static str,
    pub latexsvg: bool,
    pub req: Vec<(usize, &'static str, Vec<usize>)>,
    pub sortf: usize,
    pub tags: Vec<String>,
    pub vers: Vec<i64>,
    #[serde(rename = "mod")]
    pub modified: i64,
    pub usn: i64,
}

impl ModelJson {
    pub fn new(model: &NoteModel, deck_id: i64, modified: i64) -> Self {
        let flds = model
            .fields
            .iter()
            .enumerate()
            .map(|(ord, f)| FieldJson {
                name: f.name.clone(),
                ord,
                font: "Arial",
                media: Vec::new(),
                rtl: false,
                size: 20,
                sticky: false,
            })
            .collect();

        let tmpls = model
            .templates
            .iter()
            .enumerate()
            .map(|(ord, t)| TemplateJson {
                name: t.name.clone(),
                ord,
                qfmt: t.qfmt.clone(),
                afmt: t.afmt.clone(),
                bqfmt: String::new(),
                bafmt: String::new(),
                did: None,
            })
            .collect();

        let req = model
            .templates
            .iter()
            .enumerate()
            .map(|(ord, t)| (ord, "any", referenced_fields(model, &t.qfmt)))
            .collect();

        Self {
            id: model.id.to_string(),
            name: model.name.clone(),
            kind: 0,
            did: deck_id,
            css: model.css.clone(),
            flds,
            tmpls,
            latex_pre: LATEX_PRE,
            latex_post: LATEX_POST,
            latexsvg: false,
            req,
            sortf: 0,
            tags: Vec::new(),
            vers: Vec::new(),
            modified,
            usn: -1,
        }
    }
}

/// Ordinals of the fields a template mentions as `{{Name}}`
fn referenced_fields(model: &NoteModel, template: &str) -> Vec<usize> {
    model
        .fields
        .iter()
        .enumerate()
        .filter(|(_, f)| template.contains(&format!("{{{{{}}}}}", f.name)))
        .map(|(ord, _)| ord)
        .collect()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckJson {
    pub id: i64,
    pub name: String,
    pub desc: String,
    pub collapsed: bool,
    pub conf: i64,
    pub r#dyn: u8,
    pub extend_new: u32,
    pub extend_rev: u32,
    pub lrn_today: [i64; 2],
    pub new_today: [i64; 2],
    pub rev_today: [i64; 2],
    pub time_today: [i64; 2],
    #[serde(rename = "mod")]
    pub modified: i64,
    pub usn: i64,
}

impl DeckJson {
    pub fn new(id: i64, name: &str, modified: i64) -> Self {
        Self {
            id,
            name: name.to_string(),
            desc: String::new(),
            collapsed: false,
            conf: 1,
            r#dyn: 0,
            extend_new: 10,
            extend_rev: 50,
            lrn_today: [0, 0],
            new_today: [0, 0],
            rev_today: [0, 0],
            time_today: [0, 0],
            modified,
            usn: -1,
        }
    }
}

/// `col.models`: note types keyed by id
pub fn models_json(model: &NoteModel, deck: &Deck, modified: i64) -> serde_json::Result<String> {
    let mut models = BTreeMap::new();
    models.insert(model.id.to_string(), ModelJson::new(model, deck.id.0, modified));
    serde_json::to_string(&models)
}

/// `col.decks`: the built-in default deck plus the exported one
pub fn decks_json(deck: &Deck, modified: i64) -> serde_json::Result<String> {
    let mut decks = BTreeMap::new();
    decks.insert(
        DEFAULT_DECK_ID.to_string(),
        DeckJson::new(DEFAULT_DECK_ID, "Default", modified),
    );
    decks.insert(deck.id.0.to_string(), DeckJson::new(deck.id.0, &deck.name, modified));
    serde_json::to_string(&decks)
}

/// `col.conf`: collection-wide settings
pub fn conf_json(model: &NoteModel, deck: &Deck) -> Value {
    json!({
        "activeDecks": [deck.id.0],
        "addToCur": true,
        "collapseTime": 1200,
        "curDeck": deck.id.0,
        "curModel": model.id.to_string(),
        "dueCounts": true,
        "estTimes": true,
        "newBury": true,
        "newSpread": 0,
        "nextPos": deck.len() + 1,
        "sortBackwards": false,
        "sortType": "noteFld",
        "timeLim": 0
    })
}

/// `col.dconf`: scheduling options group 1, referenced by every deck
pub fn dconf_json() -> Value {
    json!({
        "1": {
            "id": 1,
            "name": "Default",
            "autoplay": true,
            "maxTaken": 60,
            "mod": 0,
            "replayq": true,
            "timer": 0,
            "usn": 0,
            "new": {
                "bury": true,
                "delays": [1.0, 10.0],
                "initialFactor": 2500,
                "ints": [1, 4, 7],
                "order": 1,
                "perDay": 20,
                "separate": true
            },
            "lapse": {
                "delays": [10.0],
                "leechAction": 0,
                "leechFails": 8,
                "minInt": 1,
                "mult": 0.0
            },
            "rev": {
                "bury": true,
                "ease4": 1.3,
                "fuzz": 0.05,
                "ivlFct": 1.0,
                "maxIvl": 36500,
                "minSpace": 1,
                "perDay": 100
            }
        }
    })
}
