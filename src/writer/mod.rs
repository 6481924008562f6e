mod path;


pub use path::{sanitize_template, split_extension};

use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

use crate::deck::Deck;
use crate::error::{DeckError, Result};
use crate::package::PackageWriter;

/// Where each batch's package lands: `{dir}/{subdirs}/{stem}_{index}{ext}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    dir: PathBuf,
    stem: String,
    extension: String,
}

impl OutputLayout {
    pub fn new(output_dir: impl Into<PathBuf>, template: &str) -> Result<Self> {
        let mut components = sanitize_template(template)?;
        let file_name = components.pop().unwrap_or_default();
        let (stem, extension) = split_extension(&file_name);

        let mut dir = output_dir.into();
        dir.extend(components);

        Ok(Self {
            dir,
            stem: stem.to_string(),
            extension: extension.to_string(),
        })
    }

    /// Directory every package is written into
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, index: usize) -> PathBuf {
        self.dir
            .join(format!("{}_{}{}", self.stem, index, self.extension))
    }

    /// Create the output directory tree if it does not exist yet
    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| DeckError::io(&self.dir, e))
    }
}

/// Serializes decks to their indexed output files
pub struct DeckWriter {
    layout: OutputLayout,
    package: PackageWriter,
}

impl DeckWriter {
    pub fn new(layout: OutputLayout, package: PackageWriter) -> Self {
        Self { layout, package }
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    /// Write `deck` as batch `index`, returning the path written
    pub fn write(&self, deck: &Deck, index: usize) -> Result<PathBuf> {
        let path = self.layout.path_for(index);
        debug!("[writer] Deck {} -> {}", deck.id.0, path.display());
        self.package.write_deck(deck, &path)?;
        Ok(path)
    }
}
