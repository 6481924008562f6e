use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::{params, Connection, Result};
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::path::Path;

use super::schema::{self, SCHEMA_VERSION};
use crate::deck::{Deck, NoteModel};

/// Separator Anki uses between field values in `notes.flds`
pub const FIELD_SEPARATOR: &str = "\u{1f}";

const GUID_ALPHABET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!#$%&()*+,-./:;<=>?@[]^_`{|}~";

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<.*?>").unwrap());

#[derive(Debug, Clone, Copy)]
pub struct CollectionStats {
    pub note_count: u32,
    pub card_count: u32,
}

/// In-memory Anki collection for a single deck
pub struct CollectionDB {
    conn: Connection,
}

impl CollectionDB {
    /// Create a new in-memory collection with the schema in place
    pub fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Open an existing collection file
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE col (
                id      INTEGER PRIMARY KEY,
                crt     INTEGER NOT NULL,
                mod     INTEGER NOT NULL,
                scm     INTEGER NOT NULL,
                ver     INTEGER NOT NULL,
                dty     INTEGER NOT NULL,
                usn     INTEGER NOT NULL,
                ls      INTEGER NOT NULL,
                conf    TEXT NOT NULL,
                models  TEXT NOT NULL,
                decks   TEXT NOT NULL,
                dconf   TEXT NOT NULL,
                tags    TEXT NOT NULL
            );

            CREATE TABLE notes (
                id      INTEGER PRIMARY KEY,
                guid    TEXT NOT NULL,
                mid     INTEGER NOT NULL,
                mod     INTEGER NOT NULL,
                usn     INTEGER NOT NULL,
                tags    TEXT NOT NULL,
                flds    TEXT NOT NULL,
                sfld    INTEGER NOT NULL,
                csum    INTEGER NOT NULL,
                flags   INTEGER NOT NULL,
                data    TEXT NOT NULL
            );

            CREATE TABLE cards (
                id      INTEGER PRIMARY KEY,
                nid     INTEGER NOT NULL,
                did     INTEGER NOT NULL,
                ord     INTEGER NOT NULL,
                mod     INTEGER NOT NULL,
                usn     INTEGER NOT NULL,
                type    INTEGER NOT NULL,
                queue   INTEGER NOT NULL,
                due     INTEGER NOT NULL,
                ivl     INTEGER NOT NULL,
                factor  INTEGER NOT NULL,
                reps    INTEGER NOT NULL,
                lapses  INTEGER NOT NULL,
                left    INTEGER NOT NULL,
                odue    INTEGER NOT NULL,
                odid    INTEGER NOT NULL,
                flags   INTEGER NOT NULL,
                data    TEXT NOT NULL
            );

            CREATE TABLE revlog (
                id      INTEGER PRIMARY KEY,
                cid     INTEGER NOT NULL,
                usn     INTEGER NOT NULL,
                ease    INTEGER NOT NULL,
                ivl     INTEGER NOT NULL,
                lastIvl INTEGER NOT NULL,
                factor  INTEGER NOT NULL,
                time    INTEGER NOT NULL,
                type    INTEGER NOT NULL
            );

            CREATE TABLE graves (
                usn     INTEGER NOT NULL,
                oid     INTEGER NOT NULL,
                type    INTEGER NOT NULL
            );

            CREATE INDEX ix_notes_usn ON notes (usn);
            CREATE INDEX ix_cards_usn ON cards (usn);
            CREATE INDEX ix_revlog_usn ON revlog (usn);
            CREATE INDEX ix_cards_nid ON cards (nid);
            CREATE INDEX ix_cards_sched ON cards (did, queue, due);
            CREATE INDEX ix_revlog_cid ON revlog (cid);
            CREATE INDEX ix_notes_csum ON notes (csum);
            "#,
        )
    }

    /// Write the single `col` row describing the model and deck.
    ///
    /// `now_ms` is a unix timestamp in milliseconds.
    pub fn insert_collection(&self, model: &NoteModel, deck: &Deck, now_ms: i64) -> Result<()> {
        let now_s = now_ms / 1000;
        let to_sql_err =
            |e: serde_json::Error| rusqlite::Error::ToSqlConversionFailure(Box::new(e));

        let models = schema::models_json(model, deck, now_s).map_err(to_sql_err)?;
        let decks = schema::decks_json(deck, now_s).map_err(to_sql_err)?;
        let conf = schema::conf_json(model, deck).to_string();
        let dconf = schema::dconf_json().to_string();

        self.conn.execute(
            "INSERT INTO col (id, crt, mod, scm, ver, dty, usn, ls, conf, models, decks, dconf, tags)
             VALUES (1, ?1, ?2, ?3, ?4, 0, 0, 0, ?5, ?6, ?7, ?8, '{}')",
            params![now_s, now_ms, now_ms, SCHEMA_VERSION, conf, models, decks, dconf],
        )?;
        Ok(())
    }

    /// Insert one note and one card per flashcard, in deck order.
    ///
    /// Ids are allocated upwards from `first_id` so they stay unique within
    /// the collection.
    pub fn insert_cards(&mut self, model: &NoteModel, deck: &Deck, first_id: i64) -> Result<()> {
        let modified = first_id / 1000;
        let tx = self.conn.transaction()?;
        {
            let mut note_stmt = tx.prepare(
                "INSERT INTO notes (id, guid, mid, mod, usn, tags, flds, sfld, csum, flags, data)
                 VALUES (?1, ?2, ?3, ?4, -1, '', ?5, ?6, ?7, 0, '')",
            )?;
            let mut card_stmt = tx.prepare(
                "INSERT INTO cards (id, nid, did, ord, mod, usn, type, queue, due, ivl, factor,
                                    reps, lapses, left, odue, odid, flags, data)
                 VALUES (?1, ?2, ?3, 0, ?4, -1, 0, 0, ?5, 0, 0, 0, 0, 0, 0, 0, 0, '')",
            )?;

            for (pos, card) in deck.cards.iter().enumerate() {
                let note_id = first_id + 2 * pos as i64;
                let card_id = note_id + 1;
                let fields = [card.front.as_str(), card.back.as_str()];
                let sort_field = strip_html(card.front.as_str());

                note_stmt.execute(params![
                    note_id,
                    note_guid(&fields),
                    model.id,
                    modified,
                    fields.join(FIELD_SEPARATOR),
                    sort_field,
                    field_checksum(&sort_field),
                ])?;
                card_stmt.execute(params![card_id, note_id, deck.id.0, modified, pos as i64])?;
            }
        }
        tx.commit()
    }

    pub fn get_stats(&self) -> Result<CollectionStats> {
        let note_count: u32 = self
            .conn
            .query_row("SELECT COUNT(*) FROM notes", [], |row| row.get(0))?;
        let card_count: u32 = self
            .conn
            .query_row("SELECT COUNT(*) FROM cards", [], |row| row.get(0))?;

        Ok(CollectionStats {
            note_count,
            card_count,
        })
    }

    /// Note fields in insertion order, split on the field separator
    pub fn get_note_fields(&self) -> Result<Vec<Vec<String>>> {
        let mut stmt = self.conn.prepare("SELECT flds FROM notes ORDER BY id")?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>>>()?;

        Ok(rows
            .into_iter()
            .map(|flds| flds.split(FIELD_SEPARATOR).map(str::to_string).collect())
            .collect())
    }

    /// Sort field of every note, in note order
    pub fn get_sort_fields(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT CAST(sfld AS TEXT) FROM notes ORDER BY id")?;
        let fields = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>>>()?;
        Ok(fields)
    }

    /// Deck id of every card, in card order
    pub fn get_card_deck_ids(&self) -> Result<Vec<i64>> {
        let mut stmt = self.conn.prepare("SELECT did FROM cards ORDER BY id")?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<i64>>>()?;
        Ok(ids)
    }

    /// Name of deck `id` as recorded in `col.decks`
    pub fn get_deck_name(&self, id: i64) -> Result<Option<String>> {
        let decks: String = self
            .conn
            .query_row("SELECT decks FROM col", [], |row| row.get(0))?;
        let decks: serde_json::Value = serde_json::from_str(&decks).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(decks
            .get(id.to_string())
            .and_then(|deck| deck.get("name"))
            .and_then(|name| name.as_str())
            .map(str::to_string))
    }

    /// Persist the collection to `path`, replacing any previous file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        // VACUUM INTO refuses to overwrite an existing file
        let _ = std::fs::remove_file(path);
        let target = path.to_string_lossy();
        self.conn.execute("VACUUM INTO ?1", params![target.as_ref()])?;
        Ok(())
    }
}

/// Stable note identity derived from the field values, so regenerating a
/// deck updates existing notes on import instead of duplicating them
pub fn note_guid(fields: &[&str]) -> String {
    let digest = Sha256::digest(fields.join("__").as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    let mut value = u64::from_be_bytes(bytes);

    let base = GUID_ALPHABET.len() as u64;
    let mut out = Vec::new();
    while value > 0 {
        out.push(GUID_ALPHABET[(value % base) as usize]);
        value /= base;
    }
    if out.is_empty() {
        out.push(GUID_ALPHABET[0]);
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

/// First 32 bits of the SHA-1 of a field, used by Anki for duplicate checks
pub fn field_checksum(field: &str) -> i64 {
    let digest = Sha1::digest(field.as_bytes());
    let hex = hex::encode(&digest[..4]);
    i64::from_str_radix(&hex, 16).unwrap_or_default()
}

/// Drop complete `<...>` tags so sorting and checksums see plain text.
/// A `<` with no closing `>` is kept as literal text.
pub fn strip_html(field: &str) -> String {
    HTML_TAG.replace_all(field, "").into_owned()
}
