use crate::error::{DeckError, Result};
use std::path::{Component, Path};

/// Split a user-supplied output template into clean relative components.
///
/// Rejects:
/// - empty templates
/// - absolute paths (`/tmp/deck.apkg`)
/// - parent traversal (`../deck.apkg`)
///
/// `.` components are dropped. The last component is the file name.
pub fn sanitize_template(raw: &str) -> Result<Vec<String>> {
    if raw.is_empty() {
        return Err(DeckError::InvalidOutputName("Empty file name".to_string()));
    }

    let mut components = Vec::new();
    for component in Path::new(raw).components() {
        match component {
            Component::Prefix(_) | Component::RootDir => {
                return Err(DeckError::InvalidOutputName(format!(
                    "Absolute path not allowed: {}",
                    raw
                )));
            }
            Component::ParentDir => {
                return Err(DeckError::InvalidOutputName(format!(
                    "Parent directory traversal not allowed: {}",
                    raw
                )));
            }
            Component::CurDir => continue,
            Component::Normal(part) => {
                let part = part.to_str().ok_or_else(|| {
                    DeckError::InvalidOutputName(format!("Invalid UTF-8 in path: {:?}", part))
                })?;
                components.push(part.to_string());
            }
        }
    }

    if components.is_empty() {
        return Err(DeckError::InvalidOutputName(format!(
            "No file name in: {}",
            raw
        )));
    }

    Ok(components)
}

/// `(stem, extension)` of a file name; the extension keeps its leading dot
pub fn split_extension(file_name: &str) -> (&str, &str) {
    match file_name.rfind('.') {
        Some(pos) if pos > 0 => file_name.split_at(pos),
        _ => (file_name, ""),
    }
}
