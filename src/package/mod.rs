//! `.apkg` serialization: a zip holding an SQLite collection plus a media map.

mod db;
mod schema;


pub use db::{
    field_checksum, note_guid, strip_html, CollectionDB, CollectionStats, FIELD_SEPARATOR,
};

use chrono::{DateTime, Datelike, Timelike, Utc};
use log::debug;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::deck::{Deck, NoteModel};
use crate::error::{DeckError, Result};

/// Archive entry holding the SQLite collection
pub const COLLECTION_ENTRY: &str = "collection.anki2";
/// Archive entry mapping media file numbers to names
pub const MEDIA_ENTRY: &str = "media";

/// Writes decks as importable Anki packages
#[derive(Debug, Clone)]
pub struct PackageWriter {
    model: NoteModel,
    timestamp: Option<DateTime<Utc>>,
}

impl PackageWriter {
    pub fn new(model: NoteModel) -> Self {
        Self {
            model,
            timestamp: None,
        }
    }

    /// Pin creation/modification times instead of reading the clock
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn model(&self) -> &NoteModel {
        &self.model
    }

    /// Serialize `deck` to `output_path`, overwriting any existing file
    pub fn write_deck(&self, deck: &Deck, output_path: &Path) -> Result<()> {
        debug!("[package] Writing {} cards to {}", deck.len(), output_path.display());
        let now = self.timestamp.unwrap_or_else(Utc::now);
        let pkg_err = |e: rusqlite::Error| DeckError::package(output_path, e);

        let mut db = CollectionDB::new_in_memory().map_err(pkg_err)?;
        db.insert_collection(&self.model, deck, now.timestamp_millis())
            .map_err(pkg_err)?;
        db.insert_cards(&self.model, deck, now.timestamp_millis())
            .map_err(pkg_err)?;

        let temp_db_path = temp_path(output_path, "tmp.db");
        if let Err(e) = db.save_to_file(&temp_db_path) {
            let _ = fs::remove_file(&temp_db_path);
            return Err(pkg_err(e));
        }

        let result = self.write_archive(output_path, &temp_db_path, &now);
        let cleanup = fs::remove_file(&temp_db_path);
        result?;
        cleanup.map_err(|e| DeckError::io(&temp_db_path, e))?;

        debug!("[package] Wrote {}", output_path.display());
        Ok(())
    }

    fn write_archive(
        &self,
        output_path: &Path,
        db_path: &Path,
        now: &DateTime<Utc>,
    ) -> Result<()> {
        let zip_err = |e: zip::result::ZipError| DeckError::package(output_path, e);

        let file = File::create(output_path).map_err(|e| DeckError::io(output_path, e))?;
        let mut zip = ZipWriter::new(file);
        let options: FileOptions<'_, ()> = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(0o644)
            .last_modified_time(
                zip::DateTime::from_date_and_time(
                    now.year() as u16,
                    now.month() as u8,
                    now.day() as u8,
                    now.hour() as u8,
                    now.minute() as u8,
                    now.second() as u8,
                )
                .unwrap_or_default(),
            );

        let db_contents = fs::read(db_path).map_err(|e| DeckError::io(db_path, e))?;
        zip.start_file(COLLECTION_ENTRY, options).map_err(zip_err)?;
        zip.write_all(&db_contents)
            .map_err(|e| DeckError::io(output_path, e))?;

        zip.start_file(MEDIA_ENTRY, options).map_err(zip_err)?;
        zip.write_all(b"{}")
            .map_err(|e| DeckError::io(output_path, e))?;

        zip.finish().map_err(zip_err)?;
        Ok(())
    }
}

impl Default for PackageWriter {
    fn default() -> Self {
        Self::new(NoteModel::default())
    }
}

/// Read-only view of a written package
pub struct PackageReader {
    db: CollectionDB,
    pub media: String,
    extracted_path: PathBuf,
}

impl PackageReader {
    /// Open a package, extracting its collection next to it
    pub fn open(package_path: &Path) -> Result<Self> {
        let zip_err = |e: zip::result::ZipError| DeckError::package(package_path, e);

        let file = File::open(package_path).map_err(|e| DeckError::io(package_path, e))?;
        let mut archive = ZipArchive::new(file).map_err(zip_err)?;

        let mut media = String::new();
        archive
            .by_name(MEDIA_ENTRY)
            .map_err(zip_err)?
            .read_to_string(&mut media)
            .map_err(|e| DeckError::io(package_path, e))?;

        let mut db_contents = Vec::new();
        archive
            .by_name(COLLECTION_ENTRY)
            .map_err(zip_err)?
            .read_to_end(&mut db_contents)
            .map_err(|e| DeckError::io(package_path, e))?;

        let extracted_path = temp_path(package_path, "extracted.db");
        fs::write(&extracted_path, &db_contents).map_err(|e| DeckError::io(&extracted_path, e))?;

        let db = CollectionDB::open(&extracted_path)
            .map_err(|e| DeckError::package(package_path, e))?;

        Ok(Self {
            db,
            media,
            extracted_path,
        })
    }

    pub fn db(&self) -> &CollectionDB {
        &self.db
    }
}

impl Drop for PackageReader {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.extracted_path);
    }
}

/// Sibling of `path` with `suffix` appended to its file name
fn temp_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}
