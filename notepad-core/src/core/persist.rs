//! Save-file persistence for the note store.

use crate::{NoteStore, NotepadError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Current save-file format version.
pub const SAVE_VERSION: u32 = 1;

/// Version of the library that wrote a save file.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Top-level JSON structure of a save file.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveFile {
    pub version: u32,
    pub app_version: String,
    pub notepad: NoteStore,
}

impl SaveFile {
    pub fn new(store: &NoteStore) -> Self {
        Self {
            version: SAVE_VERSION,
            app_version: APP_VERSION.to_string(),
            notepad: store.clone(),
        }
    }
}

/// Writes `store` to `path`, creating parent directories.
pub fn save_notepad<P: AsRef<Path>>(path: P, store: &NoteStore) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(&SaveFile::new(store))?;
    fs::write(path, json)?;
    log::debug!("saved {} note(s) to {}", store.len(), path.display());
    Ok(())
}

/// Reads a store from `path`.
///
/// # Errors
///
/// [`NotepadError::Io`] / [`NotepadError::Json`] for unreadable files, and
/// [`NotepadError::UnsupportedSaveVersion`] for a format this build does not know.
pub fn load_notepad<P: AsRef<Path>>(path: P) -> Result<NoteStore> {
    let content = fs::read_to_string(path.as_ref())?;
    let save: SaveFile = serde_json::from_str(&content)?;
    if save.version != SAVE_VERSION {
        return Err(NotepadError::UnsupportedSaveVersion(save.version));
    }
    log::debug!(
        "loaded {} note(s) written by version {}",
        save.notepad.len(),
        save.app_version
    );
    Ok(save.notepad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::Feature;
    use crate::NewNote;
    use tempfile::TempDir;

    #[test]
    fn test_save_file_layout() {
        let mut store = NoteStore::new();
        store.add(NewNote::new("Recipes").key("recipes"));
        let json = serde_json::to_value(SaveFile::new(&store)).unwrap();
        assert_eq!(json["version"], 1);
        assert_eq!(json["appVersion"], APP_VERSION);
        assert_eq!(json["notepad"]["notes"][0]["title"][0], "Recipes");
        assert_eq!(json["notepad"]["notes"][0]["key"], "recipes");
        assert_eq!(json["notepad"]["features"]["delete"], true);
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("saves").join("slot1.json");
        let mut store = NoteStore::new();
        store.add(NewNote::new("a").details(["x", "y"]).hidden(true));
        let b = store.add(NewNote::new("b"));
        store.delete_by_id(b);
        store.disable_feature(Feature::Modify);

        save_notepad(&path, &store).unwrap();
        let loaded = load_notepad(&path).unwrap();
        assert_eq!(loaded.all_notes(), store.all_notes());
        assert!(!loaded.modify_enabled());
        assert_eq!(loaded.next_id(), 3);
    }

    #[test]
    fn test_unknown_version_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("future.json");
        fs::write(
            &path,
            r#"{"version": 9, "appVersion": "9.0.0", "notepad": {"notes": []}}"#,
        )
        .unwrap();
        assert!(matches!(
            load_notepad(&path),
            Err(NotepadError::UnsupportedSaveVersion(9))
        ));
    }

    #[test]
    fn test_out_of_range_id_rejected_on_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tampered.json");
        fs::write(
            &path,
            r#"{"version": 1, "appVersion": "1.2.0",
                "notepad": {"notes": [{"id": 4294967295, "title": ["x"], "details": []}]}}"#,
        )
        .unwrap();
        assert!(matches!(load_notepad(&path), Err(NotepadError::Json(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            load_notepad(dir.path().join("nope.json")),
            Err(NotepadError::Io(_))
        ));
    }
}
