//! Cursor-addressable line buffer for editing one field of a note.
//!
//! A [`TextEditSession`] is scratch state: it starts from a copy of a field's
//! lines, is mutated one keystroke at a time, and is either copied back into
//! the store on commit or dropped on discard.
//!
//! Columns count characters, not bytes. Every operation keeps
//! `cursor.row < lines.len()` and `cursor.col <= chars(lines[cursor.row])`;
//! operations that cannot apply at the current position are no-ops and
//! report `false`.

use crate::core::input::EditKey;

/// Which note field a session edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Single line, bounded length.
    Title,
    /// Any number of lines, unbounded.
    Details,
}

/// Cursor position in the buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

#[derive(Debug, Clone)]
pub struct TextEditSession {
    field: FieldKind,
    lines: Vec<String>,
    cursor: Position,
    /// 0 means unbounded.
    max_line_length: usize,
    cursor_visible: bool,
    frame_counter: u32,
    blink_rate: u32,
    seeded_empty: bool,
}

impl TextEditSession {
    /// Starts a session on `lines`. An empty list is edited as one empty line.
    pub fn new(field: FieldKind, lines: Vec<String>, max_line_length: usize) -> Self {
        let seeded_empty = lines.is_empty();
        let mut lines = if seeded_empty { vec![String::new()] } else { lines };
        if field == FieldKind::Title && lines.len() > 1 {
            lines = vec![lines.concat()];
        }
        Self {
            field,
            lines,
            cursor: Position::default(),
            max_line_length,
            cursor_visible: true,
            frame_counter: 0,
            blink_rate: crate::core::config::DEFAULT_CURSOR_BLINK_RATE,
            seeded_empty,
        }
    }

    pub fn title(lines: Vec<String>, max_line_length: usize) -> Self {
        Self::new(FieldKind::Title, lines, max_line_length)
    }

    pub fn details(lines: Vec<String>) -> Self {
        Self::new(FieldKind::Details, lines, 0)
    }

    /// Sets the number of frames between blink toggles (minimum 1).
    pub fn with_blink_rate(mut self, frames: u32) -> Self {
        self.blink_rate = frames.max(1);
        self
    }

    pub fn field(&self) -> FieldKind {
        self.field
    }

    pub fn is_multiline(&self) -> bool {
        self.field == FieldKind::Details
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line(&self, row: usize) -> Option<&str> {
        self.lines.get(row).map(String::as_str)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    pub fn max_line_length(&self) -> usize {
        self.max_line_length
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    fn line_len(&self, row: usize) -> usize {
        self.lines.get(row).map_or(0, |l| l.chars().count())
    }

    fn current_len(&self) -> usize {
        self.line_len(self.cursor.row)
    }

    fn is_last_row(&self) -> bool {
        self.cursor.row + 1 >= self.lines.len()
    }

    // ── Editing ──────────────────────────────────────────────────

    /// Inserts `ch` at the cursor. Rejected when the line is at its bound or
    /// `ch` is a line break.
    pub fn insert_char(&mut self, ch: char) -> bool {
        if ch == '\n' || ch == '\r' {
            return false;
        }
        if self.max_line_length > 0 && self.current_len() >= self.max_line_length {
            return false;
        }
        let Position { row, col } = self.cursor;
        let line = &mut self.lines[row];
        let at = byte_index(line, col);
        line.insert(at, ch);
        self.cursor.col += 1;
        self.edited();
        true
    }

    /// Deletes left of the cursor, joining onto the previous line at column 0.
    pub fn backspace(&mut self) -> bool {
        let Position { row, col } = self.cursor;
        if col > 0 {
            let line = &mut self.lines[row];
            let at = byte_index(line, col - 1);
            line.remove(at);
            self.cursor.col -= 1;
        } else if row > 0 {
            let current = self.lines.remove(row);
            let new_col = self.line_len(row - 1);
            self.lines[row - 1].push_str(&current);
            self.cursor = Position::new(row - 1, new_col);
        } else {
            return false;
        }
        self.edited();
        true
    }

    /// Deletes at the cursor, joining the next line on at end of line.
    pub fn delete_forward(&mut self) -> bool {
        let Position { row, col } = self.cursor;
        if col < self.current_len() {
            let line = &mut self.lines[row];
            let at = byte_index(line, col);
            line.remove(at);
        } else if !self.is_last_row() {
            let next = self.lines.remove(row + 1);
            self.lines[row].push_str(&next);
        } else {
            return false;
        }
        self.edited();
        true
    }

    /// Splits the line at the cursor. Details field only.
    pub fn new_line(&mut self) -> bool {
        if !self.is_multiline() {
            return false;
        }
        let Position { row, col } = self.cursor;
        let line = &mut self.lines[row];
        let at = byte_index(line, col);
        let tail = line.split_off(at);
        self.lines.insert(row + 1, tail);
        self.cursor = Position::new(row + 1, 0);
        self.edited();
        true
    }

    // ── Navigation ───────────────────────────────────────────────

    pub fn move_left(&mut self) -> bool {
        if self.cursor.col > 0 {
            self.cursor.col -= 1;
        } else if self.cursor.row > 0 {
            self.cursor.row -= 1;
            self.cursor.col = self.current_len();
        } else {
            return false;
        }
        self.edited();
        true
    }

    pub fn move_right(&mut self) -> bool {
        if self.cursor.col < self.current_len() {
            self.cursor.col += 1;
        } else if !self.is_last_row() {
            self.cursor = Position::new(self.cursor.row + 1, 0);
        } else {
            return false;
        }
        self.edited();
        true
    }

    /// Details field only. Column is clamped to the new line.
    pub fn move_up(&mut self) -> bool {
        if !self.is_multiline() || self.cursor.row == 0 {
            return false;
        }
        self.cursor.row -= 1;
        self.cursor.col = self.cursor.col.min(self.current_len());
        self.edited();
        true
    }

    /// Details field only. Column is clamped to the new line.
    pub fn move_down(&mut self) -> bool {
        if !self.is_multiline() || self.is_last_row() {
            return false;
        }
        self.cursor.row += 1;
        self.cursor.col = self.cursor.col.min(self.current_len());
        self.edited();
        true
    }

    /// Applies an editing or navigation key. Enter inserts a line break in the
    /// details field; Escape, and Enter on the title, are left to the caller.
    pub fn apply_key(&mut self, key: EditKey) -> bool {
        let changed = match key {
            EditKey::Char(ch) => self.insert_char(ch),
            EditKey::Backspace => self.backspace(),
            EditKey::Delete => self.delete_forward(),
            EditKey::Enter => self.new_line(),
            EditKey::Left => self.move_left(),
            EditKey::Right => self.move_right(),
            EditKey::Up => self.move_up(),
            EditKey::Down => self.move_down(),
            EditKey::Escape => false,
        };
        log::trace!("{key:?} -> {:?} (changed: {changed})", self.cursor);
        changed
    }

    // ── Commit ───────────────────────────────────────────────────

    /// True iff the first line is non-empty.
    pub fn valid_title(&self) -> bool {
        self.lines.first().is_some_and(|l| !l.is_empty())
    }

    /// Snapshot of the buffer for writing back into the store.
    ///
    /// A field that started empty and is still a single empty line stays empty.
    pub fn to_lines(&self) -> Vec<String> {
        if self.seeded_empty && self.lines.len() == 1 && self.lines[0].is_empty() {
            return Vec::new();
        }
        self.lines.clone()
    }

    // ── Cursor blink ─────────────────────────────────────────────

    /// Advances one frame, toggling cursor visibility every `blink_rate` frames.
    pub fn tick(&mut self) {
        self.frame_counter = (self.frame_counter + 1) % self.blink_rate;
        if self.frame_counter == 0 {
            self.cursor_visible = !self.cursor_visible;
        }
    }

    /// Shows the cursor and restarts the blink period.
    pub fn force_cursor_visible(&mut self) {
        self.cursor_visible = true;
        self.frame_counter = 0;
    }

    fn edited(&mut self) {
        self.force_cursor_visible();
    }
}

/// Byte offset of character column `col` in `line`, or the end of the line.
fn byte_index(line: &str, col: usize) -> usize {
    line.char_indices()
        .nth(col)
        .map_or(line.len(), |(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn type_str(session: &mut TextEditSession, text: &str) {
        for ch in text.chars() {
            session.insert_char(ch);
        }
    }

    #[test]
    fn test_title_bound() {
        let mut s = TextEditSession::title(lines(&[""]), 5);
        type_str(&mut s, "hello");
        assert_eq!(s.line(0), Some("hello"));
        assert!(!s.insert_char('!'));
        assert_eq!(s.line(0), Some("hello"));
        assert_eq!(s.cursor(), Position::new(0, 5));
    }

    #[test]
    fn test_title_rejects_newline_and_vertical_moves() {
        let mut s = TextEditSession::title(lines(&["abc"]), 10);
        assert!(!s.new_line());
        assert!(!s.move_down());
        assert!(!s.move_up());
        assert!(!s.insert_char('\n'));
        assert_eq!(s.line_count(), 1);
    }

    #[test]
    fn test_insert_then_backspace_restores() {
        let mut s = TextEditSession::details(lines(&["hello", "world"]));
        s.move_down();
        s.move_right();
        s.move_right();
        let before_lines = s.lines().to_vec();
        let before_cursor = s.cursor();
        assert!(s.insert_char('X'));
        assert_eq!(s.line(1), Some("woXrld"));
        assert!(s.backspace());
        assert_eq!(s.lines(), before_lines.as_slice());
        assert_eq!(s.cursor(), before_cursor);
    }

    #[test]
    fn test_newline_then_backspace_restores() {
        let mut s = TextEditSession::details(lines(&["hello"]));
        s.move_right();
        s.move_right();
        assert!(s.new_line());
        assert_eq!(s.lines(), lines(&["he", "llo"]).as_slice());
        assert_eq!(s.cursor(), Position::new(1, 0));
        assert!(s.backspace());
        assert_eq!(s.lines(), lines(&["hello"]).as_slice());
        assert_eq!(s.cursor(), Position::new(0, 2));
    }

    #[test]
    fn test_backspace_at_origin_is_noop() {
        let mut s = TextEditSession::details(lines(&["abc"]));
        assert!(!s.backspace());
        assert_eq!(s.line(0), Some("abc"));
    }

    #[test]
    fn test_delete_forward_joins_next_line() {
        let mut s = TextEditSession::details(lines(&["ab", "cd"]));
        s.move_right();
        assert!(s.delete_forward());
        assert_eq!(s.line(0), Some("a"));
        assert!(s.delete_forward());
        assert_eq!(s.lines(), lines(&["acd"]).as_slice());
        assert_eq!(s.cursor(), Position::new(0, 1));
        s.move_right();
        s.move_right();
        assert!(!s.delete_forward());
    }

    #[test]
    fn test_left_right_wrap_across_lines() {
        let mut s = TextEditSession::details(lines(&["ab", "c"]));
        s.move_right();
        s.move_right();
        assert!(s.move_right());
        assert_eq!(s.cursor(), Position::new(1, 0));
        assert!(s.move_right());
        assert!(!s.move_right());
        assert!(s.move_left());
        assert!(s.move_left());
        assert_eq!(s.cursor(), Position::new(0, 2));
    }

    #[test]
    fn test_vertical_moves_clamp_column() {
        let mut s = TextEditSession::details(lines(&["long line", "x", "medium"]));
        for _ in 0..8 {
            s.move_right();
        }
        assert!(s.move_down());
        assert_eq!(s.cursor(), Position::new(1, 1));
        assert!(s.move_down());
        assert_eq!(s.cursor(), Position::new(2, 1));
        assert!(!s.move_down());
        assert!(s.move_up());
        assert!(s.move_up());
        assert!(!s.move_up());
        assert_eq!(s.cursor(), Position::new(0, 1));
    }

    #[test]
    fn test_multibyte_characters() {
        let mut s = TextEditSession::details(lines(&["ñé"]));
        s.move_right();
        assert!(s.insert_char('ü'));
        assert_eq!(s.line(0), Some("ñüé"));
        assert!(s.delete_forward());
        assert_eq!(s.line(0), Some("ñü"));
        assert!(s.backspace());
        assert_eq!(s.line(0), Some("ñ"));
    }

    #[test]
    fn test_round_trip_without_edits() {
        let original = lines(&["Potion+Herb=Elixir", "", "Fire+Water=Steam"]);
        let s = TextEditSession::details(original.clone());
        assert_eq!(s.to_lines(), original);
        assert_eq!(TextEditSession::details(vec![]).to_lines(), Vec::<String>::new());
    }

    #[test]
    fn test_valid_title() {
        let mut s = TextEditSession::title(lines(&[""]), 35);
        assert!(!s.valid_title());
        s.insert_char('a');
        assert!(s.valid_title());
    }

    #[test]
    fn test_blink_and_force_visible() {
        let mut s = TextEditSession::details(lines(&[""])).with_blink_rate(3);
        assert!(s.cursor_visible());
        s.tick();
        s.tick();
        assert!(s.cursor_visible());
        s.tick();
        assert!(!s.cursor_visible());
        s.tick();
        s.insert_char('a');
        assert!(s.cursor_visible());
        s.tick();
        s.tick();
        assert!(s.cursor_visible());
        s.tick();
        assert!(!s.cursor_visible());
    }

    #[test]
    fn test_apply_key_dispatch() {
        let mut s = TextEditSession::details(lines(&[""]));
        assert!(s.apply_key(EditKey::Char('a')));
        assert!(s.apply_key(EditKey::Enter));
        assert!(s.apply_key(EditKey::Char('b')));
        assert!(!s.apply_key(EditKey::Escape));
        assert_eq!(s.lines(), lines(&["a", "b"]).as_slice());
    }
}
