//! Error types for the notepad core library.

use crate::core::store::Feature;
use thiserror::Error;

/// Which per-note lock blocked a gated operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockKind {
    Title,
    Details,
    Delete,
}

impl std::fmt::Display for LockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Title => "title",
            Self::Details => "details",
            Self::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// All errors that can occur within the notepad core library.
///
/// The note store itself never fails: unknown keys and ids are silent no-ops.
/// These variants cover the surfaces around it (commands, configuration,
/// save files and the gated UI path).
#[derive(Debug, Error)]
pub enum NotepadError {
    /// An I/O operation on the filesystem failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A config or save file could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A command line could not be parsed.
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// The configuration file is present but unusable.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// A stage field was given a value of the wrong kind.
    #[error("Stage field '{field}' expects {expected}")]
    InvalidStageValue {
        field: String,
        expected: &'static str,
    },

    /// A feature name other than `new`, `modify` or `delete`.
    #[error("Unknown feature: {0}")]
    UnknownFeature(String),

    /// The UI tried to use a feature that is switched off.
    #[error("Feature disabled: {0}")]
    FeatureDisabled(Feature),

    /// The UI tried to change something a lock protects.
    #[error("Note {id} is locked ({lock})")]
    NoteLocked { id: u32, lock: LockKind },

    /// A note id was requested that does not exist in the store.
    #[error("Note not found: {0}")]
    NoteNotFound(u32),

    /// The title field was committed while empty.
    #[error("Title must not be empty")]
    InvalidTitle,

    /// The save file was written by an incompatible version.
    #[error("Unsupported save version: {0}")]
    UnsupportedSaveVersion(u32),
}

/// Convenience alias that pins the error type to [`NotepadError`].
pub type Result<T> = std::result::Result<T, NotepadError>;

impl NotepadError {
    /// Returns a short, human-readable message suitable for display to the player.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Io(e) => format!("File error: {e}"),
            Self::Json(e) => format!("Data format error: {e}"),
            Self::InvalidCommand(msg) => format!("Unknown notepad command: {msg}"),
            Self::InvalidConfig(msg) => format!("Notepad settings are invalid: {msg}"),
            Self::InvalidStageValue { field, expected } => {
                format!("'{field}' needs {expected}")
            }
            Self::UnknownFeature(name) => format!("Unknown notepad feature: {name}"),
            Self::FeatureDisabled(feature) => format!("{feature} is currently disabled"),
            Self::NoteLocked { lock, .. } => match lock {
                LockKind::Delete => "This note cannot be deleted".to_string(),
                LockKind::Title | LockKind::Details => "This note cannot be changed".to_string(),
            },
            Self::NoteNotFound(_) => "Note no longer exists".to_string(),
            Self::InvalidTitle => "Please enter a title".to_string(),
            Self::UnsupportedSaveVersion(v) => format!("Save data version {v} is not supported"),
        }
    }

    /// True for the rejections the host answers with a buzzer rather than a dialog.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::FeatureDisabled(_) | Self::NoteLocked { .. } | Self::InvalidTitle
        )
    }
}
