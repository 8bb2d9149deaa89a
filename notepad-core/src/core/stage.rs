//! Single-slot staging buffer for composing a note across several commands.
//!
//! There is exactly one stage per [`NoteStore`](super::store::NoteStore).
//! Starting a second stage sequence before committing the first overwrites
//! it; callers finish one sequence (`stage_add` / `stage_append`) before
//! starting the next.

use crate::{NotepadError, Result};
use std::str::FromStr;

/// Fields that can be staged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageField {
    Title,
    Details,
    Key,
    TitleLocked,
    DetailsLocked,
    DeleteLocked,
    Hidden,
}

impl StageField {
    pub fn name(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Details => "details",
            Self::Key => "key",
            Self::TitleLocked => "titleLocked",
            Self::DetailsLocked => "detailsLocked",
            Self::DeleteLocked => "deleteLocked",
            Self::Hidden => "hidden",
        }
    }

    fn is_flag(self) -> bool {
        matches!(
            self,
            Self::TitleLocked | Self::DetailsLocked | Self::DeleteLocked | Self::Hidden
        )
    }
}

impl FromStr for StageField {
    type Err = NotepadError;

    /// Field names are matched case-insensitively.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "title" => Ok(Self::Title),
            "details" => Ok(Self::Details),
            "key" => Ok(Self::Key),
            "titlelocked" => Ok(Self::TitleLocked),
            "detailslocked" => Ok(Self::DetailsLocked),
            "deletelocked" => Ok(Self::DeleteLocked),
            "hidden" => Ok(Self::Hidden),
            other => Err(NotepadError::InvalidCommand(format!(
                "unknown stage field '{other}'"
            ))),
        }
    }
}

/// A value written into or read out of the stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageValue {
    Lines(Vec<String>),
    Text(String),
    Flag(bool),
}

/// The staged note. Every field remembers whether it was set, so that an
/// explicitly staged empty value is distinguishable from "not staged".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stage {
    pub title: Option<Vec<String>>,
    pub details: Option<Vec<String>>,
    pub key: Option<String>,
    pub title_locked: Option<bool>,
    pub details_locked: Option<bool>,
    pub delete_locked: Option<bool>,
    pub hidden: Option<bool>,
}

impl Stage {
    /// Writes `value` into `field`.
    ///
    /// # Errors
    ///
    /// Returns [`NotepadError::InvalidStageValue`] when the value kind does not
    /// match the field (lines for title/details, text for key, flag for locks).
    pub fn set(&mut self, field: StageField, value: StageValue) -> Result<()> {
        let mismatch = |expected| NotepadError::InvalidStageValue {
            field: field.name().to_string(),
            expected,
        };
        match (field, value) {
            (StageField::Title, StageValue::Lines(lines)) => self.title = Some(lines),
            (StageField::Title, StageValue::Text(text)) => self.title = Some(vec![text]),
            (StageField::Details, StageValue::Lines(lines)) => self.details = Some(lines),
            (StageField::Key, StageValue::Text(key)) => self.key = Some(key),
            (StageField::TitleLocked, StageValue::Flag(v)) => self.title_locked = Some(v),
            (StageField::DetailsLocked, StageValue::Flag(v)) => self.details_locked = Some(v),
            (StageField::DeleteLocked, StageValue::Flag(v)) => self.delete_locked = Some(v),
            (StageField::Hidden, StageValue::Flag(v)) => self.hidden = Some(v),
            (f, _) if f.is_flag() => return Err(mismatch("a boolean")),
            (StageField::Key, _) => return Err(mismatch("text")),
            _ => return Err(mismatch("a list of lines")),
        }
        Ok(())
    }

    /// Reads `field`, or `None` if it has not been staged.
    pub fn get(&self, field: StageField) -> Option<StageValue> {
        match field {
            StageField::Title => self.title.clone().map(StageValue::Lines),
            StageField::Details => self.details.clone().map(StageValue::Lines),
            StageField::Key => self.key.clone().map(StageValue::Text),
            StageField::TitleLocked => self.title_locked.map(StageValue::Flag),
            StageField::DetailsLocked => self.details_locked.map(StageValue::Flag),
            StageField::DeleteLocked => self.delete_locked.map(StageValue::Flag),
            StageField::Hidden => self.hidden.map(StageValue::Flag),
        }
    }

    /// The staged key, treating an empty key as no key.
    pub fn effective_key(&self) -> Option<&str> {
        self.key.as_deref().filter(|k| !k.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
