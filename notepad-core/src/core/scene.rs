//! The notepad menu and editing flow, without rendering.
//!
//! [`NotepadScene`] is the gated path into the store: it checks feature
//! gates and per-note locks before offering or performing add, modify and
//! delete, and drives the title and details [`TextEditSession`]s one key at a
//! time. Edits are made on copies; the store is only written by
//! [`NotepadScene::confirm_save`] and [`NotepadScene::delete_note`].

use crate::core::config::CommandLabels;
use crate::core::edit::{FieldKind, TextEditSession};
use crate::core::error::LockKind;
use crate::core::input::EditKey;
use crate::core::store::Feature;
use crate::{NewNote, NoteStore, NoteUpdate, NotepadConfig, NotepadError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneState {
    Browsing,
    EditingTitle,
    EditingDetails,
    /// Both fields are done; waiting for save or discard.
    Confirming,
}

/// What a menu entry opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuTarget {
    NewNote,
    Note(u32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub target: MenuTarget,
    pub label: String,
    pub enabled: bool,
    /// Drawn dimmed: the note's title is locked and fading is on.
    pub faded: bool,
}

/// Actions offered for a selected note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteAction {
    Modify,
    Delete,
}

/// Result of feeding one key to the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Nothing is being edited, or the key had no effect.
    Ignored,
    /// The active session changed.
    Edited,
    /// The title was accepted and the details field is now active.
    TitleCommitted,
    /// Editing is finished; the scene is in [`SceneState::Confirming`].
    ReadyToConfirm,
    /// The edit was abandoned and the scene is back to browsing.
    Discarded,
}

#[derive(Debug, Clone)]
struct Draft {
    /// `None` for a note that does not exist yet.
    target: Option<u32>,
    title: Vec<String>,
    details: Vec<String>,
    title_locked: bool,
    details_locked: bool,
}

#[derive(Debug, Clone)]
pub struct NotepadScene {
    state: SceneState,
    draft: Option<Draft>,
    session: Option<TextEditSession>,
    max_title_length: usize,
    cursor_blink_rate: u32,
    show_cursor: bool,
    fade_locked_text: bool,
    labels: CommandLabels,
}

impl NotepadScene {
    pub fn new(config: &NotepadConfig) -> Self {
        Self {
            state: SceneState::Browsing,
            draft: None,
            session: None,
            max_title_length: config.effective_max_title_length(),
            cursor_blink_rate: config.effective_cursor_blink_rate(),
            show_cursor: config.show_cursor,
            fade_locked_text: config.fade_locked_text,
            labels: config.command_labels.clone(),
        }
    }

    pub fn state(&self) -> SceneState {
        self.state
    }

    /// The session for the field being edited, if any.
    pub fn session(&self) -> Option<&TextEditSession> {
        self.session.as_ref()
    }

    /// Whether the cursor should be drawn this frame.
    pub fn cursor_shown(&self) -> bool {
        self.show_cursor && self.session.as_ref().is_some_and(TextEditSession::cursor_visible)
    }

    /// Id of the note being edited, `None` when idle or composing a new note.
    pub fn editing_note_id(&self) -> Option<u32> {
        self.draft.as_ref().and_then(|d| d.target)
    }

    /// The title and details that [`confirm_save`](Self::confirm_save) would write.
    pub fn pending(&self) -> Option<(&[String], &[String])> {
        self.draft
            .as_ref()
            .map(|d| (d.title.as_slice(), d.details.as_slice()))
    }

    // ── Menus ────────────────────────────────────────────────────

    /// The browse menu: "new note" then one entry per visible note.
    pub fn menu_entries(&self, store: &NoteStore) -> Vec<MenuEntry> {
        let mut entries = vec![MenuEntry {
            target: MenuTarget::NewNote,
            label: self.labels.new_note.clone(),
            enabled: store.new_enabled(),
            faded: false,
        }];
        entries.extend(store.visible_notes().map(|note| MenuEntry {
            target: MenuTarget::Note(note.id),
            label: note.title_text().to_string(),
            enabled: note.has_unlocked_action(),
            faded: self.fade_locked_text && !store.is_title_modifiable(note.id),
        }));
        entries
    }

    /// Modify and delete entries for a selected note, each with its enabled state.
    pub fn note_actions(&self, store: &NoteStore, id: u32) -> Vec<(NoteAction, String, bool)> {
        vec![
            (
                NoteAction::Modify,
                self.labels.modify_note.clone(),
                store.is_note_modifiable(id),
            ),
            (
                NoteAction::Delete,
                self.labels.delete_note.clone(),
                store.is_note_deletable(id),
            ),
        ]
    }

    /// Save and discard labels shown while confirming.
    pub fn confirm_labels(&self) -> [&str; 2] {
        [&self.labels.save_note, &self.labels.discard_changes]
    }

    // ── Starting and ending edits ────────────────────────────────

    /// Starts composing a new note with an empty title.
    ///
    /// # Errors
    ///
    /// Returns [`NotepadError::FeatureDisabled`] if the `new` gate is off.
    pub fn begin_new_note(&mut self, store: &NoteStore) -> Result<()> {
        if !store.new_enabled() {
            return Err(NotepadError::FeatureDisabled(Feature::New));
        }
        self.draft = Some(Draft {
            target: None,
            title: vec![String::new()],
            details: vec![String::new()],
            title_locked: false,
            details_locked: false,
        });
        self.open(FieldKind::Title);
        log::debug!("composing new note");
        Ok(())
    }

    /// Starts editing note `id`, at the title if it is unlocked and otherwise
    /// at the details.
    ///
    /// # Errors
    ///
    /// [`NotepadError::NoteNotFound`] for an unknown id,
    /// [`NotepadError::FeatureDisabled`] if the `modify` gate is off, and
    /// [`NotepadError::NoteLocked`] if both fields are locked.
    pub fn begin_modify(&mut self, store: &NoteStore, id: u32) -> Result<()> {
        let note = store.note(id).ok_or(NotepadError::NoteNotFound(id))?;
        if !store.modify_enabled() {
            return Err(NotepadError::FeatureDisabled(Feature::Modify));
        }
        if !store.is_note_modifiable(id) {
            return Err(NotepadError::NoteLocked {
                id,
                lock: LockKind::Details,
            });
        }
        let title_locked = !store.is_title_modifiable(id);
        self.draft = Some(Draft {
            target: Some(id),
            title: note.title.clone(),
            details: note.details.clone(),
            title_locked,
            details_locked: !store.is_details_modifiable(id),
        });
        let field = if title_locked {
            FieldKind::Details
        } else {
            FieldKind::Title
        };
        self.open(field);
        log::debug!("editing note {id}");
        Ok(())
    }

    /// Deletes note `id` through the gated path.
    ///
    /// # Errors
    ///
    /// [`NotepadError::NoteNotFound`] for an unknown id,
    /// [`NotepadError::FeatureDisabled`] if the `delete` gate is off, and
    /// [`NotepadError::NoteLocked`] if the note is delete-locked.
    pub fn delete_note(&mut self, store: &mut NoteStore, id: u32) -> Result<()> {
        if store.note(id).is_none() {
            return Err(NotepadError::NoteNotFound(id));
        }
        if !store.delete_enabled() {
            return Err(NotepadError::FeatureDisabled(Feature::Delete));
        }
        if !store.is_note_deletable(id) {
            return Err(NotepadError::NoteLocked {
                id,
                lock: LockKind::Delete,
            });
        }
        store.delete_by_id(id);
        Ok(())
    }

    /// Writes the finished edit into the store and returns to browsing.
    ///
    /// Returns the id of the added or modified note, or `None` if the scene
    /// was not confirming.
    pub fn confirm_save(&mut self, store: &mut NoteStore) -> Option<u32> {
        if self.state != SceneState::Confirming {
            return None;
        }
        let draft = self.draft.take()?;
        self.state = SceneState::Browsing;
        let id = match draft.target {
            None => store.add(NewNote {
                title: draft.title,
                details: draft.details,
                ..NewNote::default()
            }),
            Some(id) => {
                let mut update = NoteUpdate::default();
                if !draft.title_locked {
                    update.title = Some(draft.title);
                }
                if !draft.details_locked {
                    update.details = Some(draft.details);
                }
                store.modify_by_id(id, update);
                id
            }
        };
        Some(id)
    }

    /// Drops the edit without touching the store.
    pub fn confirm_discard(&mut self) {
        self.reset();
    }

    // ── Per-frame input ──────────────────────────────────────────

    /// Feeds one key to the active field.
    ///
    /// # Errors
    ///
    /// Returns [`NotepadError::InvalidTitle`] when Enter is pressed on an
    /// empty title. The title stays open.
    pub fn handle_key(&mut self, key: EditKey) -> Result<KeyOutcome> {
        let Some(field) = self.session.as_ref().map(TextEditSession::field) else {
            return Ok(KeyOutcome::Ignored);
        };
        match (field, key) {
            (FieldKind::Title, EditKey::Enter) => self.commit_title(),
            (FieldKind::Title, EditKey::Escape) => {
                self.reset();
                Ok(KeyOutcome::Discarded)
            }
            (FieldKind::Details, EditKey::Escape) => {
                self.commit_details();
                Ok(KeyOutcome::ReadyToConfirm)
            }
            (_, key) => {
                let changed = self.session.as_mut().is_some_and(|s| s.apply_key(key));
                Ok(if changed {
                    KeyOutcome::Edited
                } else {
                    KeyOutcome::Ignored
                })
            }
        }
    }

    /// Advances the cursor blink of the active field.
    pub fn tick(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.tick();
        }
    }

    fn commit_title(&mut self) -> Result<KeyOutcome> {
        let (Some(session), Some(draft)) = (self.session.as_ref(), self.draft.as_mut()) else {
            return Ok(KeyOutcome::Ignored);
        };
        if !session.valid_title() {
            return Err(NotepadError::InvalidTitle);
        }
        draft.title = session.to_lines();
        if draft.details_locked {
            self.session = None;
            self.state = SceneState::Confirming;
            return Ok(KeyOutcome::ReadyToConfirm);
        }
        self.open(FieldKind::Details);
        Ok(KeyOutcome::TitleCommitted)
    }

    fn commit_details(&mut self) {
        if let (Some(session), Some(draft)) = (self.session.take(), self.draft.as_mut()) {
            draft.details = session.to_lines();
        }
        self.state = SceneState::Confirming;
    }

    fn open(&mut self, field: FieldKind) {
        let Some(draft) = self.draft.as_ref() else {
            return;
        };
        let session = match field {
            FieldKind::Title => {
                self.state = SceneState::EditingTitle;
                TextEditSession::title(draft.title.clone(), self.max_title_length)
            }
            FieldKind::Details => {
                self.state = SceneState::EditingDetails;
                TextEditSession::details(draft.details.clone())
            }
        };
        self.session = Some(session.with_blink_rate(self.cursor_blink_rate));
    }

    fn reset(&mut self) {
        self.state = SceneState::Browsing;
        self.draft = None;
        self.session = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene() -> NotepadScene {
        NotepadScene::new(&NotepadConfig::default())
    }

    fn type_keys(scene: &mut NotepadScene, text: &str) {
        for ch in text.chars() {
            scene.handle_key(EditKey::Char(ch)).unwrap();
        }
    }

    #[test]
    fn test_new_note_flow() {
        let mut store = NoteStore::new();
        let mut scene = scene();
        scene.begin_new_note(&store).unwrap();
        assert_eq!(scene.state(), SceneState::EditingTitle);

        assert!(matches!(
            scene.handle_key(EditKey::Enter),
            Err(NotepadError::InvalidTitle)
        ));
        assert_eq!(scene.state(), SceneState::EditingTitle);

        type_keys(&mut scene, "Clues");
        assert_eq!(scene.handle_key(EditKey::Enter).unwrap(), KeyOutcome::TitleCommitted);
        assert_eq!(scene.state(), SceneState::EditingDetails);

        type_keys(&mut scene, "Blue");
        scene.handle_key(EditKey::Enter).unwrap();
        type_keys(&mut scene, "Door");
        assert_eq!(scene.handle_key(EditKey::Escape).unwrap(), KeyOutcome::ReadyToConfirm);
        assert!(store.is_empty());

        let id = scene.confirm_save(&mut store).unwrap();
        assert_eq!(scene.state(), SceneState::Browsing);
        let note = store.note(id).unwrap();
        assert_eq!(note.title_text(), "Clues");
        assert_eq!(note.details, vec!["Blue".to_string(), "Door".to_string()]);
    }

    #[test]
    fn test_delete_blocked_by_lock() {
        let mut store = NoteStore::new();
        let id = store.add(NewNote::new("Quest").key("quest"));
        store.lock_delete("quest");
        let mut scene = scene();
        assert!(matches!(
            scene.delete_note(&mut store, id),
            Err(NotepadError::NoteLocked {
                lock: LockKind::Delete,
                ..
            })
        ));
        assert!(store.note(id).is_some());

        store.unlock_delete("quest");
        scene.delete_note(&mut store, id).unwrap();
        assert!(store.note(id).is_none());
    }

    #[test]
    fn test_gates_block_ui_paths() {
        let mut store = NoteStore::new();
        let id = store.add(NewNote::new("Quest"));
        store.disable_feature(Feature::New);
        store.disable_feature(Feature::Modify);
        store.disable_feature(Feature::Delete);
        let mut scene = scene();
        assert!(scene.begin_new_note(&store).is_err());
        assert!(scene.begin_modify(&store, id).is_err());
        assert!(scene.delete_note(&mut store, id).is_err());
        assert!(!scene.menu_entries(&store)[0].enabled);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_modify_with_locked_title_starts_at_details() {
        let mut store = NoteStore::new();
        let id = store.add(NewNote::new("Fixed").details(["old"]).title_locked(true));
        let mut scene = scene();
        scene.begin_modify(&store, id).unwrap();
        assert_eq!(scene.state(), SceneState::EditingDetails);
        scene.handle_key(EditKey::Delete).unwrap();
        scene.handle_key(EditKey::Escape).unwrap();
        scene.confirm_save(&mut store).unwrap();
        let note = store.note(id).unwrap();
        assert_eq!(note.title_text(), "Fixed");
        assert_eq!(note.details, vec!["ld".to_string()]);
    }

    #[test]
    fn test_modify_with_locked_details_skips_details() {
        let mut store = NoteStore::new();
        let id = store.add(NewNote::new("Ab").details(["keep"]).details_locked(true));
        let mut scene = scene();
        scene.begin_modify(&store, id).unwrap();
        scene.handle_key(EditKey::Right).unwrap();
        scene.handle_key(EditKey::Right).unwrap();
        type_keys(&mut scene, "c");
        assert_eq!(scene.handle_key(EditKey::Enter).unwrap(), KeyOutcome::ReadyToConfirm);
        scene.confirm_save(&mut store);
        let note = store.note(id).unwrap();
        assert_eq!(note.title_text(), "Abc");
        assert_eq!(note.details, vec!["keep".to_string()]);
    }

    #[test]
    fn test_fully_locked_note_cannot_be_modified() {
        let mut store = NoteStore::new();
        let id = store.add(NewNote::new("x").title_locked(true).details_locked(true));
        let mut scene = scene();
        assert!(matches!(
            scene.begin_modify(&store, id),
            Err(NotepadError::NoteLocked { .. })
        ));
        assert_eq!(scene.state(), SceneState::Browsing);
    }

    #[test]
    fn test_discard_leaves_store_untouched() {
        let mut store = NoteStore::new();
        let id = store.add(NewNote::new("Keep").details(["me"]));
        let mut scene = scene();
        scene.begin_modify(&store, id).unwrap();
        type_keys(&mut scene, "zz");
        scene.handle_key(EditKey::Enter).unwrap();
        scene.handle_key(EditKey::Escape).unwrap();
        scene.confirm_discard();
        assert_eq!(scene.state(), SceneState::Browsing);
        assert_eq!(store.note(id).unwrap().title_text(), "Keep");

        scene.begin_modify(&store, id).unwrap();
        assert_eq!(scene.handle_key(EditKey::Escape).unwrap(), KeyOutcome::Discarded);
        assert_eq!(scene.confirm_save(&mut store), None);
    }

    #[test]
    fn test_menu_lists_visible_notes() {
        let mut store = NoteStore::new();
        store.add(NewNote::new("Shown"));
        store.add(NewNote::new("Secret").key("secret").hidden(true));
        store.add(
            NewNote::new("Frozen")
                .title_locked(true)
                .details_locked(true)
                .delete_locked(true),
        );
        let entries = scene().menu_entries(&store);
        let labels: Vec<&str> = entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["New Note", "Shown", "Frozen"]);
        assert!(entries[1].enabled);
        assert!(!entries[2].enabled);
    }

    #[test]
    fn test_modify_follows_store_lock_queries() {
        let combos = [(false, false), (true, false), (false, true), (true, true)];
        for (title_locked, details_locked) in combos {
            let mut store = NoteStore::new();
            let id = store.add(
                NewNote::new("Log")
                    .details(["entry"])
                    .title_locked(title_locked)
                    .details_locked(details_locked),
            );
            let mut scene = scene();
            let result = scene.begin_modify(&store, id);
            assert_eq!(result.is_ok(), store.is_note_modifiable(id));
            if result.is_err() {
                continue;
            }
            let expected = if store.is_title_modifiable(id) {
                SceneState::EditingTitle
            } else {
                SceneState::EditingDetails
            };
            assert_eq!(scene.state(), expected);
        }
    }

    #[test]
    fn test_zero_config_values_are_normalised() {
        let config = NotepadConfig {
            max_title_length: 0,
            cursor_blink_rate: 0,
            ..NotepadConfig::default()
        };
        let mut scene = NotepadScene::new(&config);
        scene.begin_new_note(&NoteStore::new()).unwrap();
        type_keys(&mut scene, &"x".repeat(50));
        let session = scene.session().unwrap();
        assert_eq!(session.max_line_length(), 35);
        assert_eq!(session.line(0).unwrap().chars().count(), 35);

        assert!(scene.cursor_shown());
        scene.tick();
        assert!(!scene.cursor_shown());
        scene.tick();
        assert!(scene.cursor_shown());
    }

    #[test]
    fn test_hidden_cursor_setting() {
        let config = NotepadConfig {
            show_cursor: false,
            ..NotepadConfig::default()
        };
        let mut scene = NotepadScene::new(&config);
        assert!(!scene.cursor_shown());
        scene.begin_new_note(&NoteStore::new()).unwrap();
        assert!(scene.session().unwrap().cursor_visible());
        assert!(!scene.cursor_shown());
    }

    #[test]
    fn test_locked_titles_fade_when_enabled() {
        let mut store = NoteStore::new();
        store.add(NewNote::new("Open"));
        store.add(NewNote::new("Sealed").title_locked(true));
        let faded: Vec<bool> = scene().menu_entries(&store).iter().map(|e| e.faded).collect();
        assert_eq!(faded, vec![false, false, true]);

        let plain = NotepadScene::new(&NotepadConfig {
            fade_locked_text: false,
            ..NotepadConfig::default()
        });
        assert!(plain.menu_entries(&store).iter().all(|e| !e.faded));
    }

    #[test]
    fn test_keys_ignored_while_browsing() {
        let mut scene = scene();
        assert_eq!(scene.handle_key(EditKey::Char('a')).unwrap(), KeyOutcome::Ignored);
        scene.tick();
        assert!(scene.session().is_none());
    }
}
