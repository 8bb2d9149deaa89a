//! Core library for the player notepad: a small store of titled notes that
//! event scripts and the player can both write to.
//!
//! The system of record is [`NoteStore`], created per game session and passed
//! by reference to whatever needs it. Players edit notes through
//! [`NotepadScene`], which drives a [`TextEditSession`] per field and enforces
//! feature gates and locks. Event scripts reach the store through the
//! `notepad …` command surface ([`parse_command`] / [`execute`]).
//!
//! Types are re-exported from their respective sub-modules for convenience;
//! consumers should import from the crate root rather than the `core` module.

pub mod core;

// Re-export commonly used types.
#[doc(inline)]
pub use core::{
    command::{execute, parse_command, run_line, Command, CommandOutcome, LockTarget, SearchScope},
    config::{load_config, save_config, CommandLabels, NotepadConfig, StartingNote},
    edit::{FieldKind, Position, TextEditSession},
    error::{LockKind, NotepadError, Result},
    input::{default_bindings, EditKey, InputTable, KeyBinding, ModifierState, Modifiers},
    note::{NewNote, Note, NoteUpdate},
    persist::{load_notepad, save_notepad, SaveFile, APP_VERSION, SAVE_VERSION},
    scene::{KeyOutcome, MenuEntry, MenuTarget, NoteAction, NotepadScene, SceneState},
    stage::{Stage, StageField, StageValue},
    store::{Feature, FeatureGates, NoteStore, MAX_NOTE_ID},
};
