//! The note store: the system of record for every note in a game session.
//!
//! [`NoteStore`] is created explicitly at game start (see
//! [`NoteStore::new_game`]) and handed by reference to whatever needs it.
//! Its API is permissive: operations addressed to an unknown key or id are
//! no-ops, because most calls originate from event scripts where a stale key
//! must never halt the session.
//!
//! Feature gates and per-note locks are *advisory* at this level. The store
//! executes every call it receives; [`NotepadScene`](crate::NotepadScene) is
//! the layer that consults them before offering add, modify or delete.

use crate::core::note::normalize_title;
use crate::core::stage::{Stage, StageField, StageValue};
use crate::{NewNote, Note, NoteUpdate, NotepadConfig, NotepadError, Result};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Store-wide switches controlling what the notepad UI offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feature {
    New,
    Modify,
    Delete,
}

impl FromStr for Feature {
    type Err = NotepadError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "new" => Ok(Self::New),
            "modify" => Ok(Self::Modify),
            "delete" => Ok(Self::Delete),
            other => Err(NotepadError::UnknownFeature(other.to_string())),
        }
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::New => "new",
            Self::Modify => "modify",
            Self::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// The three feature gates. All enabled by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureGates {
    pub new: bool,
    pub modify: bool,
    pub delete: bool,
}

impl Default for FeatureGates {
    fn default() -> Self {
        Self {
            new: true,
            modify: true,
            delete: true,
        }
    }
}

impl FeatureGates {
    pub fn is_enabled(&self, feature: Feature) -> bool {
        match feature {
            Feature::New => self.new,
            Feature::Modify => self.modify,
            Feature::Delete => self.delete,
        }
    }

    fn set(&mut self, feature: Feature, enabled: bool) {
        match feature {
            Feature::New => self.new = enabled,
            Feature::Modify => self.modify = enabled,
            Feature::Delete => self.delete = enabled,
        }
    }
}

/// Largest note id accepted from saved data. Leaves `next_id` about two
/// billion adds of headroom before it saturates.
pub const MAX_NOTE_ID: u32 = i32::MAX as u32;

/// The collection of notes plus feature gates and the staging buffer.
///
/// Serializes to a plain, order-preserving structure for the host's save
/// file. The stage is transient and is never serialized. Deserializing
/// rejects ids above [`MAX_NOTE_ID`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "StoredNotepad")]
pub struct NoteStore {
    notes: Vec<Note>,
    #[serde(default)]
    features: FeatureGates,
    /// Highest id handed out since the store was created or last emptied.
    #[serde(default)]
    last_id: u32,
    #[serde(skip)]
    stage: Stage,
}

/// Wire form of [`NoteStore`], checked before it becomes one.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredNotepad {
    notes: Vec<Note>,
    #[serde(default)]
    features: FeatureGates,
    #[serde(default)]
    last_id: u32,
}

impl TryFrom<StoredNotepad> for NoteStore {
    type Error = String;

    fn try_from(stored: StoredNotepad) -> std::result::Result<Self, Self::Error> {
        if let Some(note) = stored.notes.iter().find(|n| n.id > MAX_NOTE_ID) {
            return Err(format!("note id {} is out of range", note.id));
        }
        if stored.last_id > MAX_NOTE_ID {
            return Err(format!("last id {} is out of range", stored.last_id));
        }
        Ok(Self {
            notes: stored.notes,
            features: stored.features,
            last_id: stored.last_id,
            stage: Stage::default(),
        })
    }
}

impl NoteStore {
    /// Creates an empty store with every feature enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the store for a new game, seeded with the configured starting notes.
    pub fn new_game(config: &NotepadConfig) -> Self {
        let mut store = Self::new();
        for starting in &config.starting_notes {
            store.add(starting.to_new_note());
        }
        log::debug!("new notepad seeded with {} starting note(s)", store.len());
        store
    }

    // ── Queries ──────────────────────────────────────────────────

    /// All notes in storage order, hidden ones included.
    pub fn all_notes(&self) -> &[Note] {
        &self.notes
    }

    /// Notes the player can see, in storage order.
    pub fn visible_notes(&self) -> impl Iterator<Item = &Note> {
        self.notes.iter().filter(|n| !n.hidden)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn note(&self, id: u32) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn note_by_key(&self, key: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.key.as_deref() == Some(key))
    }

    fn note_mut(&mut self, id: u32) -> Option<&mut Note> {
        self.notes.iter_mut().find(|n| n.id == id)
    }

    fn note_by_key_mut(&mut self, key: &str) -> Option<&mut Note> {
        self.notes
            .iter_mut()
            .find(|n| n.key.as_deref() == Some(key))
    }

    /// The title lines of `id`, or a single empty line if there is no such note.
    pub fn title_by_id(&self, id: u32) -> Vec<String> {
        self.note(id)
            .map(|n| n.title.clone())
            .unwrap_or_else(|| vec![String::new()])
    }

    /// The details lines of `id`, or a single empty line if there is no such note.
    pub fn details_by_id(&self, id: u32) -> Vec<String> {
        self.note(id)
            .map(|n| n.details.clone())
            .unwrap_or_else(|| vec![String::new()])
    }

    pub fn key_exists(&self, key: &str) -> bool {
        self.note_by_key(key).is_some()
    }

    pub fn id_by_key(&self, key: &str) -> Option<u32> {
        self.note_by_key(key).map(|n| n.id)
    }

    /// The id the next [`add`](Self::add) will assign.
    ///
    /// Ids increase monotonically and are not reused after a single delete.
    /// Emptying the store with [`delete_all`](Self::delete_all) restarts at 1.
    pub fn next_id(&self) -> u32 {
        let max_live = self.notes.iter().map(|n| n.id).max().unwrap_or(0);
        max_live.max(self.last_id).saturating_add(1)
    }

    // ── Mutations ────────────────────────────────────────────────

    /// Appends a new note and returns its id.
    ///
    /// Key uniqueness is not checked here; [`stage_add`](Self::stage_add)
    /// is the path that turns a colliding key into a modification.
    pub fn add(&mut self, note: NewNote) -> u32 {
        let id = self.next_id();
        self.last_id = id;
        let key = note.key.filter(|k| !k.is_empty());
        if let Some(k) = &key {
            if self.key_exists(k) {
                log::warn!("adding note {id} with duplicate key '{k}'");
            }
        }
        self.notes.push(Note {
            id,
            key,
            title: normalize_title(note.title),
            details: note.details,
            title_locked: note.title_locked,
            details_locked: note.details_locked,
            delete_locked: note.delete_locked,
            hidden: note.hidden,
        });
        log::debug!("added note {id}");
        id
    }

    /// Applies `update` to the note with `key`. No-op if the key is unknown.
    pub fn modify_by_key(&mut self, key: &str, update: NoteUpdate) {
        match self.note_by_key_mut(key) {
            Some(note) => {
                note.apply(update);
                log::debug!("modified note {} by key '{key}'", note.id);
            }
            None => log::debug!("modify: no note with key '{key}'"),
        }
    }

    /// Applies `update` to the note with `id`. No-op if the id is unknown.
    pub fn modify_by_id(&mut self, id: u32, update: NoteUpdate) {
        match self.note_mut(id) {
            Some(note) => {
                note.apply(update);
                log::debug!("modified note {id}");
            }
            None => log::debug!("modify: no note with id {id}"),
        }
    }

    /// Concatenates `title_suffix` onto the title and appends `detail_lines`
    /// to the details of the note with `key`. No-op if the key is unknown.
    pub fn append_by_key(&mut self, key: &str, title_suffix: Option<&str>, detail_lines: &[String]) {
        let Some(note) = self.note_by_key_mut(key) else {
            log::debug!("append: no note with key '{key}'");
            return;
        };
        if let Some(suffix) = title_suffix {
            match note.title.first_mut() {
                Some(line) => line.push_str(suffix),
                None => note.title.push(suffix.to_string()),
            }
        }
        note.details.extend_from_slice(detail_lines);
        log::debug!("appended to note {}", note.id);
    }

    /// Removes the note with `id`. Does not consult `delete_locked`.
    pub fn delete_by_id(&mut self, id: u32) {
        if let Some(pos) = self.notes.iter().position(|n| n.id == id) {
            self.notes.remove(pos);
            log::debug!("deleted note {id}");
        }
    }

    /// Removes the note with `key`. Does not consult `delete_locked`.
    pub fn delete_by_key(&mut self, key: &str) {
        if let Some(pos) = self
            .notes
            .iter()
            .position(|n| n.key.as_deref() == Some(key))
        {
            let note = self.notes.remove(pos);
            log::debug!("deleted note {} by key '{key}'", note.id);
        }
    }

    /// Removes every note. The next id restarts at 1.
    pub fn delete_all(&mut self) {
        self.notes.clear();
        self.last_id = 0;
        log::debug!("deleted all notes");
    }

    fn set_flag_by_key(&mut self, key: &str, set: impl FnOnce(&mut Note)) {
        if let Some(note) = self.note_by_key_mut(key) {
            set(note);
        } else {
            log::debug!("no note with key '{key}'");
        }
    }

    pub fn lock_title(&mut self, key: &str) {
        self.set_flag_by_key(key, |n| n.title_locked = true);
    }

    pub fn unlock_title(&mut self, key: &str) {
        self.set_flag_by_key(key, |n| n.title_locked = false);
    }

    pub fn lock_details(&mut self, key: &str) {
        self.set_flag_by_key(key, |n| n.details_locked = true);
    }

    pub fn unlock_details(&mut self, key: &str) {
        self.set_flag_by_key(key, |n| n.details_locked = false);
    }

    pub fn lock_delete(&mut self, key: &str) {
        self.set_flag_by_key(key, |n| n.delete_locked = true);
    }

    pub fn unlock_delete(&mut self, key: &str) {
        self.set_flag_by_key(key, |n| n.delete_locked = false);
    }

    pub fn hide(&mut self, key: &str) {
        self.set_flag_by_key(key, |n| n.hidden = true);
    }

    pub fn show(&mut self, key: &str) {
        self.set_flag_by_key(key, |n| n.hidden = false);
    }

    // ── Feature gates ────────────────────────────────────────────

    pub fn features(&self) -> FeatureGates {
        self.features
    }

    pub fn enable_feature(&mut self, feature: Feature) {
        self.features.set(feature, true);
    }

    pub fn disable_feature(&mut self, feature: Feature) {
        self.features.set(feature, false);
    }

    pub fn new_enabled(&self) -> bool {
        self.features.new
    }

    pub fn modify_enabled(&self) -> bool {
        self.features.modify
    }

    pub fn delete_enabled(&self) -> bool {
        self.features.delete
    }

    /// Delete gate is on and the note is not delete-locked.
    pub fn is_note_deletable(&self, id: u32) -> bool {
        self.delete_enabled() && self.note(id).is_some_and(|n| !n.delete_locked)
    }

    /// Modify gate is on and at least one of the note's fields is unlocked.
    pub fn is_note_modifiable(&self, id: u32) -> bool {
        self.modify_enabled()
            && self
                .note(id)
                .is_some_and(|n| !n.title_locked || !n.details_locked)
    }

    pub fn is_title_modifiable(&self, id: u32) -> bool {
        self.note(id).is_some_and(|n| !n.title_locked)
    }

    pub fn is_details_modifiable(&self, id: u32) -> bool {
        self.note(id).is_some_and(|n| !n.details_locked)
    }

    // ── Search ───────────────────────────────────────────────────

    /// First case-insensitive match of `term` in any title, in storage order.
    pub fn search_titles(&self, term: &str) -> Option<String> {
        let re = literal_matcher(term)?;
        self.notes
            .iter()
            .find_map(|n| re.find(n.title_text()).map(|m| m.as_str().to_string()))
    }

    /// First case-insensitive match of `term` in any note's joined details.
    pub fn search_details(&self, term: &str) -> Option<String> {
        let re = literal_matcher(term)?;
        self.notes.iter().find_map(|n| {
            let details = n.details_text();
            re.find(&details).map(|m| m.as_str().to_string())
        })
    }

    /// Searches the title, then the joined details, of the note with `key`.
    pub fn search_key(&self, key: &str, term: &str) -> Option<String> {
        let re = literal_matcher(term)?;
        let note = self.note_by_key(key)?;
        if let Some(m) = re.find(note.title_text()) {
            return Some(m.as_str().to_string());
        }
        let details = note.details_text();
        re.find(&details).map(|m| m.as_str().to_string())
    }

    // ── Stage ────────────────────────────────────────────────────

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Writes one field of the staging buffer.
    ///
    /// # Errors
    ///
    /// Returns [`NotepadError::InvalidStageValue`] if `value` is the wrong kind
    /// for `field`; the stage is left unchanged.
    pub fn set_stage(&mut self, field: StageField, value: StageValue) -> Result<()> {
        self.stage.set(field, value)
    }

    pub fn get_stage(&self, field: StageField) -> Option<StageValue> {
        self.stage.get(field)
    }

    pub fn clear_stage(&mut self) {
        self.stage = Stage::default();
    }

    /// Commits the stage as an add-or-modify and clears it.
    ///
    /// If the staged key belongs to an existing note, that note is modified in
    /// place with only the staged fields. Otherwise a new note is added, which
    /// requires a staged title. Returns the id of the affected note, or `None`
    /// (leaving the stage intact) when there was nothing to commit.
    pub fn stage_add(&mut self) -> Option<u32> {
        if let Some(id) = self.stage.effective_key().and_then(|k| self.id_by_key(k)) {
            let stage = std::mem::take(&mut self.stage);
            self.modify_by_id(
                id,
                NoteUpdate {
                    title: stage.title,
                    details: stage.details,
                    title_locked: stage.title_locked,
                    details_locked: stage.details_locked,
                    delete_locked: stage.delete_locked,
                    hidden: stage.hidden,
                },
            );
            return Some(id);
        }

        if self.stage.title.is_none() {
            log::warn!("stage add ignored: a new note needs a staged title");
            return None;
        }

        let stage = std::mem::take(&mut self.stage);
        let id = self.add(NewNote {
            title: stage.title.unwrap_or_default(),
            details: stage.details.unwrap_or_else(|| vec![String::new()]),
            key: stage.key,
            title_locked: stage.title_locked.unwrap_or(false),
            details_locked: stage.details_locked.unwrap_or(false),
            delete_locked: stage.delete_locked.unwrap_or(false),
            hidden: stage.hidden.unwrap_or(false),
        });
        Some(id)
    }

    /// Commits the stage as an append onto the note with the staged key and
    /// clears it. Returns the id appended to, or `None` if no key was staged
    /// (stage left intact) or the key is unknown (stage cleared).
    pub fn stage_append(&mut self) -> Option<u32> {
        let Some(key) = self.stage.effective_key().map(str::to_string) else {
            log::warn!("stage append ignored: no key staged");
            return None;
        };
        let stage = std::mem::take(&mut self.stage);
        let id = self.id_by_key(&key)?;
        let suffix = stage.title.as_ref().map(|t| t.concat());
        self.append_by_key(&key, suffix.as_deref(), &stage.details.unwrap_or_default());
        Some(id)
    }
}

/// Builds a case-insensitive matcher that treats `term` as literal text.
fn literal_matcher(term: &str) -> Option<Regex> {
    if term.is_empty() {
        return None;
    }
    RegexBuilder::new(&regex::escape(term))
        .case_insensitive(true)
        .build()
        .ok()
}
