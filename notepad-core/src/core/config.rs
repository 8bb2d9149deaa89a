//! Notepad configuration: input layout, title bound, cursor behaviour,
//! menu labels and the notes every new game starts with.
//!
//! Stored as camelCase JSON. A missing file yields the defaults; a file that
//! exists but cannot be parsed is an error, so a typo never silently resets a
//! carefully remapped keyboard layout.

use crate::core::input::{default_bindings, InputTable, KeyBinding};
use crate::{NewNote, NotepadError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_MAX_TITLE_LENGTH: usize = 35;
pub const DEFAULT_CURSOR_BLINK_RATE: u32 = 45;

/// Menu command texts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommandLabels {
    pub new_note: String,
    pub save_note: String,
    pub discard_changes: String,
    pub modify_note: String,
    pub delete_note: String,
}

impl Default for CommandLabels {
    fn default() -> Self {
        Self {
            new_note: "New Note".to_string(),
            save_note: "Save Note".to_string(),
            discard_changes: "Discard Changes".to_string(),
            modify_note: "Modify Note".to_string(),
            delete_note: "Delete Note".to_string(),
        }
    }
}

/// A note seeded into every new game. `details` uses `\n` for line breaks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StartingNote {
    pub title: String,
    pub details: String,
    pub key: String,
    pub title_locked: bool,
    pub details_locked: bool,
    pub delete_locked: bool,
    pub hidden: bool,
}

impl StartingNote {
    pub fn to_new_note(&self) -> NewNote {
        NewNote {
            title: vec![self.title.clone()],
            details: self.details.split('\n').map(str::to_string).collect(),
            key: Some(self.key.to_lowercase()).filter(|k| !k.is_empty()),
            title_locked: self.title_locked,
            details_locked: self.details_locked,
            delete_locked: self.delete_locked,
            hidden: self.hidden,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotepadConfig {
    /// Log the code of every key pressed while editing.
    pub test_mode: bool,
    pub input_codes: Vec<KeyBinding>,
    pub max_title_length: usize,
    /// Frames between cursor visibility toggles.
    pub cursor_blink_rate: u32,
    pub show_cursor: bool,
    pub fade_locked_text: bool,
    pub starting_notes: Vec<StartingNote>,
    pub command_labels: CommandLabels,
}

impl Default for NotepadConfig {
    fn default() -> Self {
        Self {
            test_mode: false,
            input_codes: default_bindings(),
            max_title_length: DEFAULT_MAX_TITLE_LENGTH,
            cursor_blink_rate: DEFAULT_CURSOR_BLINK_RATE,
            show_cursor: true,
            fade_locked_text: true,
            starting_notes: Vec::new(),
            command_labels: CommandLabels::default(),
        }
    }
}

impl NotepadConfig {
    /// Parses a config document and normalises out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns [`NotepadError::InvalidConfig`] if the JSON is malformed or two
    /// bindings share a key code.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| NotepadError::InvalidConfig(e.to_string()))?;
        config.validated()
    }

    /// Title bound in characters. Zero means the default of 35.
    pub fn effective_max_title_length(&self) -> usize {
        match self.max_title_length {
            0 => DEFAULT_MAX_TITLE_LENGTH,
            n => n,
        }
    }

    /// Blink rate in frames, at least 1.
    pub fn effective_cursor_blink_rate(&self) -> u32 {
        self.cursor_blink_rate.max(1)
    }

    fn validated(mut self) -> Result<Self> {
        self.max_title_length = self.effective_max_title_length();
        self.cursor_blink_rate = self.effective_cursor_blink_rate();
        let mut codes: Vec<u32> = self.input_codes.iter().map(|b| b.code).collect();
        codes.sort_unstable();
        if let Some(pair) = codes.windows(2).find(|w| w[0] == w[1]) {
            return Err(NotepadError::InvalidConfig(format!(
                "key code {} is bound more than once",
                pair[0]
            )));
        }
        Ok(self)
    }

    /// Builds the input table described by this config.
    pub fn input_table(&self) -> InputTable {
        InputTable::new(self.input_codes.clone()).with_key_code_logging(self.test_mode)
    }
}

/// Loads the config at `path`, returning defaults if the file does not exist.
///
/// # Errors
///
/// Returns [`NotepadError::Io`] if the file exists but cannot be read, or
/// [`NotepadError::InvalidConfig`] if its contents are unusable.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<NotepadConfig> {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(content) => NotepadConfig::from_json(&content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("no config at {}, using defaults", path.display());
            Ok(NotepadConfig::default())
        }
        Err(e) => Err(e.into()),
    }
}

/// Writes `config` to `path` as pretty JSON, creating parent directories.
pub fn save_config<P: AsRef<Path>>(path: P, config: &NotepadConfig) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(config)?)?;
    Ok(())
}
