//! Key code to glyph translation.
//!
//! Physical key codes are mapped to characters through a data table
//! ([`InputTable`]) so non-QWERTY layouts can be supported from configuration
//! alone. A handful of control keys (arrows, Enter, Backspace, ...) have fixed
//! codes and always take precedence over the table.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

pub const KEY_BACKSPACE: u32 = 8;
pub const KEY_ENTER: u32 = 13;
pub const KEY_SHIFT: u32 = 16;
pub const KEY_ALT: u32 = 18;
pub const KEY_ESCAPE: u32 = 27;
pub const KEY_SPACE: u32 = 32;
pub const KEY_LEFT: u32 = 37;
pub const KEY_UP: u32 = 38;
pub const KEY_RIGHT: u32 = 39;
pub const KEY_DOWN: u32 = 40;
pub const KEY_DELETE: u32 = 46;

/// A logical key delivered to an editing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditKey {
    Char(char),
    Left,
    Right,
    Up,
    Down,
    Enter,
    Backspace,
    Delete,
    Escape,
}

/// Modifier keys held while a key is pressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        alt: false,
    };
    pub const SHIFT: Self = Self {
        shift: true,
        alt: false,
    };
    pub const ALT: Self = Self {
        shift: false,
        alt: true,
    };
    pub const SHIFT_ALT: Self = Self {
        shift: true,
        alt: true,
    };
}

/// Tracks whether shift and alt are currently held, from raw press/release events.
#[derive(Debug, Clone, Default)]
pub struct ModifierState {
    shift: bool,
    alt: bool,
}

impl ModifierState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the state for `code`. Returns true if `code` was a modifier.
    pub fn update(&mut self, code: u32, pressed: bool) -> bool {
        match code {
            KEY_SHIFT => self.shift = pressed,
            KEY_ALT => self.alt = pressed,
            _ => return false,
        }
        true
    }

    pub fn modifiers(&self) -> Modifiers {
        Modifiers {
            shift: self.shift,
            alt: self.alt,
        }
    }
}

/// One configurable key: a code and up to four glyphs.
///
/// Field names follow the compact layout used in configuration files
/// (`k`, `c`, `s`, `a`, `sa`). Plugin-style tables are accepted as well:
/// `k` may be a numeric string and an empty glyph means unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBinding {
    #[serde(rename = "k", deserialize_with = "key_code")]
    pub code: u32,
    #[serde(rename = "c", deserialize_with = "glyph")]
    pub base: char,
    #[serde(
        rename = "s",
        default,
        deserialize_with = "optional_glyph",
        skip_serializing_if = "Option::is_none"
    )]
    pub shift: Option<char>,
    #[serde(
        rename = "a",
        default,
        deserialize_with = "optional_glyph",
        skip_serializing_if = "Option::is_none"
    )]
    pub alt: Option<char>,
    #[serde(
        rename = "sa",
        default,
        deserialize_with = "optional_glyph",
        skip_serializing_if = "Option::is_none"
    )]
    pub shift_alt: Option<char>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CodeRepr {
    Number(u32),
    Text(String),
}

fn key_code<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    match CodeRepr::deserialize(deserializer)? {
        CodeRepr::Number(code) => Ok(code),
        CodeRepr::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("invalid key code '{text}'"))),
    }
}

fn single_char<E: serde::de::Error>(text: &str) -> Result<Option<char>, E> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (None, _) => Ok(None),
        (Some(ch), None) => Ok(Some(ch)),
        _ => Err(E::custom(format!("'{text}' is not a single character"))),
    }
}

fn glyph<'de, D: Deserializer<'de>>(deserializer: D) -> Result<char, D::Error> {
    let text = String::deserialize(deserializer)?;
    single_char::<D::Error>(&text)?.ok_or_else(|| D::Error::custom("base glyph must not be empty"))
}

fn optional_glyph<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<char>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        Some(text) => single_char(&text),
        None => Ok(None),
    }
}

impl KeyBinding {
    pub fn new(code: u32, base: char, shift: Option<char>) -> Self {
        Self {
            code,
            base,
            shift,
            alt: None,
            shift_alt: None,
        }
    }

    /// Picks the glyph for the given modifiers.
    ///
    /// Shift+alt falls back to the shifted glyph and then the base glyph;
    /// shift or alt alone fall back to the base glyph.
    pub fn glyph(&self, mods: Modifiers) -> char {
        match (mods.shift, mods.alt) {
            (true, true) => self.shift_alt.or(self.shift).unwrap_or(self.base),
            (true, false) => self.shift.unwrap_or(self.base),
            (false, true) => self.alt.unwrap_or(self.base),
            (false, false) => self.base,
        }
    }
}

/// The configurable code-to-glyph table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputTable {
    bindings: Vec<KeyBinding>,
    log_key_codes: bool,
}

impl Default for InputTable {
    fn default() -> Self {
        Self::new(default_bindings())
    }
}

impl InputTable {
    pub fn new(bindings: Vec<KeyBinding>) -> Self {
        Self {
            bindings,
            log_key_codes: false,
        }
    }

    /// Logs every translated key code at info level, for working out the codes
    /// of an unfamiliar keyboard.
    pub fn with_key_code_logging(mut self, enabled: bool) -> Self {
        self.log_key_codes = enabled;
        self
    }

    pub fn bindings(&self) -> &[KeyBinding] {
        &self.bindings
    }

    /// Resolves a printable key to its glyph, or `None` if `code` is not in the table.
    pub fn resolve_char(&self, code: u32, shift: bool, alt: bool) -> Option<char> {
        self.bindings
            .iter()
            .find(|b| b.code == code)
            .map(|b| b.glyph(Modifiers { shift, alt }))
    }

    /// Translates a raw key code into an [`EditKey`].
    ///
    /// Control keys are fixed; everything else goes through the table.
    /// Modifier keys themselves and unknown codes yield `None`.
    pub fn translate(&self, code: u32, mods: Modifiers) -> Option<EditKey> {
        if self.log_key_codes {
            log::info!("key code {code}");
        }
        let key = match code {
            KEY_BACKSPACE => EditKey::Backspace,
            KEY_ENTER => EditKey::Enter,
            KEY_ESCAPE => EditKey::Escape,
            KEY_SPACE => EditKey::Char(' '),
            KEY_DELETE => EditKey::Delete,
            KEY_LEFT => EditKey::Left,
            KEY_UP => EditKey::Up,
            KEY_RIGHT => EditKey::Right,
            KEY_DOWN => EditKey::Down,
            KEY_SHIFT | KEY_ALT => return None,
            _ => EditKey::Char(self.resolve_char(code, mods.shift, mods.alt)?),
        };
        Some(key)
    }
}

/// US QWERTY: letters, digit row and punctuation.
pub fn default_bindings() -> Vec<KeyBinding> {
    let mut bindings: Vec<KeyBinding> = ('a'..='z')
        .zip(65u32..)
        .map(|(c, code)| KeyBinding::new(code, c, Some(c.to_ascii_uppercase())))
        .collect();

    let digits_shifted = [')', '!', '@', '#', '$', '%', '^', '&', '*', '('];
    for (i, shifted) in digits_shifted.iter().enumerate() {
        let digit = char::from(b'0' + i as u8);
        bindings.push(KeyBinding::new(48 + i as u32, digit, Some(*shifted)));
    }

    let punctuation = [
        (186, ';', ':'),
        (187, '=', '+'),
        (188, ',', '<'),
        (189, '-', '_'),
        (190, '.', '>'),
        (191, '/', '?'),
        (192, '`', '~'),
        (219, '[', '{'),
        (220, '\\', '|'),
        (221, ']', '}'),
        (222, '\'', '"'),
    ];
    bindings.extend(
        punctuation
            .iter()
            .map(|&(code, base, shift)| KeyBinding::new(code, base, Some(shift))),
    );
    bindings
}
