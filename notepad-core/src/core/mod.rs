//! Internal domain modules for the notepad core library.
//!
//! All public types from these modules are re-exported at the crate root
//! with `#[doc(inline)]`; import from there in preference to this module.

pub mod command;
pub mod config;
pub mod edit;
pub mod error;
pub mod input;
pub mod note;
pub mod persist;
pub mod scene;
pub mod stage;
pub mod store;

#[doc(inline)]
pub use command::{execute, parse_command, run_line, Command, CommandOutcome, LockTarget, SearchScope};
#[doc(inline)]
pub use config::{load_config, save_config, CommandLabels, NotepadConfig, StartingNote};
#[doc(inline)]
pub use edit::{FieldKind, Position, TextEditSession};
#[doc(inline)]
pub use error::{LockKind, NotepadError, Result};
#[doc(inline)]
pub use input::{EditKey, InputTable, KeyBinding, ModifierState, Modifiers};
#[doc(inline)]
pub use note::{NewNote, Note, NoteUpdate};
#[doc(inline)]
pub use persist::{load_notepad, save_notepad, SaveFile, APP_VERSION, SAVE_VERSION};
#[doc(inline)]
pub use scene::{KeyOutcome, MenuEntry, MenuTarget, NoteAction, NotepadScene, SceneState};
#[doc(inline)]
pub use stage::{Stage, StageField, StageValue};
#[doc(inline)]
pub use store::{Feature, FeatureGates, NoteStore, MAX_NOTE_ID};
