use serde::{Deserialize, Serialize};

/// One entry in the notepad.
///
/// `title` always holds exactly one line; it is kept as a list so both fields
/// can be fed to the same editing session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub title: Vec<String>,
    pub details: Vec<String>,
    #[serde(default)]
    pub title_locked: bool,
    #[serde(default)]
    pub details_locked: bool,
    #[serde(default)]
    pub delete_locked: bool,
    #[serde(default)]
    pub hidden: bool,
}

impl Note {
    /// The single title line.
    pub fn title_text(&self) -> &str {
        self.title.first().map(String::as_str).unwrap_or("")
    }

    /// Details joined without separators, the form search runs against.
    pub fn details_text(&self) -> String {
        self.details.concat()
    }

    /// True if at least one of the three locks is off, i.e. the note offers
    /// any action in the menu.
    pub fn has_unlocked_action(&self) -> bool {
        !self.title_locked || !self.details_locked || !self.delete_locked
    }

    pub(crate) fn apply(&mut self, update: NoteUpdate) {
        if let Some(title) = update.title {
            self.title = normalize_title(title);
        }
        if let Some(details) = update.details {
            self.details = details;
        }
        if let Some(v) = update.title_locked {
            self.title_locked = v;
        }
        if let Some(v) = update.details_locked {
            self.details_locked = v;
        }
        if let Some(v) = update.delete_locked {
            self.delete_locked = v;
        }
        if let Some(v) = update.hidden {
            self.hidden = v;
        }
    }
}

/// Field values for creating a note. Unset flags default to `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewNote {
    pub title: Vec<String>,
    pub details: Vec<String>,
    pub key: Option<String>,
    pub title_locked: bool,
    pub details_locked: bool,
    pub delete_locked: bool,
    pub hidden: bool,
}

impl NewNote {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: vec![title.into()],
            ..Self::default()
        }
    }

    pub fn details<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.details = lines.into_iter().map(Into::into).collect();
        self
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn title_locked(mut self, v: bool) -> Self {
        self.title_locked = v;
        self
    }

    pub fn details_locked(mut self, v: bool) -> Self {
        self.details_locked = v;
        self
    }

    pub fn delete_locked(mut self, v: bool) -> Self {
        self.delete_locked = v;
        self
    }

    pub fn hidden(mut self, v: bool) -> Self {
        self.hidden = v;
        self
    }
}

/// A partial change to an existing note.
///
/// `None` leaves a field untouched; `Some` overwrites it, including with an
/// empty value. An empty details list is a legal new value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteUpdate {
    pub title: Option<Vec<String>>,
    pub details: Option<Vec<String>>,
    pub title_locked: Option<bool>,
    pub details_locked: Option<bool>,
    pub delete_locked: Option<bool>,
    pub hidden: Option<bool>,
}

impl NoteUpdate {
    pub fn title(mut self, lines: Vec<String>) -> Self {
        self.title = Some(lines);
        self
    }

    pub fn details(mut self, lines: Vec<String>) -> Self {
        self.details = Some(lines);
        self
    }

    pub fn title_locked(mut self, v: bool) -> Self {
        self.title_locked = Some(v);
        self
    }

    pub fn details_locked(mut self, v: bool) -> Self {
        self.details_locked = Some(v);
        self
    }

    pub fn delete_locked(mut self, v: bool) -> Self {
        self.delete_locked = Some(v);
        self
    }

    pub fn hidden(mut self, v: bool) -> Self {
        self.hidden = Some(v);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Collapses a title to exactly one line.
pub(crate) fn normalize_title(mut title: Vec<String>) -> Vec<String> {
    match title.len() {
        0 => vec![String::new()],
        1 => title,
        _ => {
            let joined = title.concat();
            title.clear();
            title.push(joined);
            title
        }
    }
}
