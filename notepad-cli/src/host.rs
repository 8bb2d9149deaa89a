//! Line-driven stand-in for the game's event layer.
//!
//! Each input line is either a `notepad …` command, forwarded to the command
//! surface, or a directive driving the notepad menu the way a player would:
//!
//! ```text
//! new                 start a new note
//! modify <id>         edit a note
//! delete <id>         delete a note through the menu
//! 72 69 76            press and release key codes
//! press 16            hold a key (shift, alt)
//! release 16          let it go
//! tick [n]            advance n frames
//! save | discard      answer the confirmation
//! state               print the scene and the active field
//! list                print the visible notes
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. With `fadeLockedText`
//! on, `list` wraps locked titles in `~`. With `showCursor` off, `state`
//! never draws the `|` cursor.

use notepad_core::{
    run_line, CommandOutcome, InputTable, KeyOutcome, ModifierState, NoteStore, NotepadConfig,
    NotepadError, NotepadScene,
};
use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};

pub struct Host<W: Write> {
    store: NoteStore,
    scene: NotepadScene,
    table: InputTable,
    modifiers: ModifierState,
    variables: BTreeMap<u32, String>,
    out: W,
}

impl<W: Write> Host<W> {
    pub fn new(config: &NotepadConfig, store: NoteStore, out: W) -> Self {
        Self {
            store,
            scene: NotepadScene::new(config),
            table: config.input_table(),
            modifiers: ModifierState::new(),
            variables: BTreeMap::new(),
            out,
        }
    }

    pub fn store(&self) -> &NoteStore {
        &self.store
    }

    /// Host variables written by `search` commands.
    pub fn variables(&self) -> &BTreeMap<u32, String> {
        &self.variables
    }

    pub fn run<R: BufRead>(&mut self, input: R) -> io::Result<()> {
        for line in input.lines() {
            self.handle_line(&line?)?;
        }
        self.out.flush()
    }

    pub fn handle_line(&mut self, line: &str) -> io::Result<()> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(());
        }
        let words: Vec<&str> = line.split_whitespace().collect();
        let verb = words[0].to_ascii_lowercase();
        match verb.as_str() {
            "notepad" => self.command(line),
            "new" => {
                let result = self.scene.begin_new_note(&self.store);
                self.report(result)
            }
            "modify" => match parse_id(&words) {
                Some(id) => {
                    let result = self.scene.begin_modify(&self.store, id);
                    self.report(result)
                }
                None => self.usage("modify <id>"),
            },
            "delete" => match parse_id(&words) {
                Some(id) => {
                    let result = self.scene.delete_note(&mut self.store, id);
                    self.report(result)
                }
                None => self.usage("delete <id>"),
            },
            "save" => match self.scene.confirm_save(&mut self.store) {
                Some(id) => writeln!(self.out, "saved note {id}"),
                None => writeln!(self.out, "nothing to save"),
            },
            "discard" => {
                self.scene.confirm_discard();
                writeln!(self.out, "changes discarded")
            }
            "tick" => {
                let frames = words.get(1).and_then(|n| n.parse().ok()).unwrap_or(1);
                for _ in 0..frames {
                    self.scene.tick();
                }
                Ok(())
            }
            "press" | "release" => match words.get(1).and_then(|c| c.parse().ok()) {
                Some(code) if verb == "press" => self.press(code),
                Some(code) => {
                    self.modifiers.update(code, false);
                    Ok(())
                }
                None => self.usage("press|release <code>"),
            },
            "state" => self.print_state(),
            "list" => self.print_notes(),
            _ => {
                let codes: Option<Vec<u32>> = words.iter().map(|w| w.parse().ok()).collect();
                match codes {
                    Some(codes) => {
                        for code in codes {
                            self.press(code)?;
                            self.modifiers.update(code, false);
                        }
                        Ok(())
                    }
                    None => {
                        log::warn!("unrecognised line: {line}");
                        writeln!(self.out, "unrecognised: {line}")
                    }
                }
            }
        }
    }

    fn command(&mut self, line: &str) -> io::Result<()> {
        match run_line(&mut self.store, line) {
            Ok(CommandOutcome::None) => Ok(()),
            Ok(CommandOutcome::OpenNotepad) => self.print_notes(),
            Ok(CommandOutcome::SetVariable { slot, value }) => {
                writeln!(self.out, "${slot} = {value:?}")?;
                self.variables.insert(slot, value);
                Ok(())
            }
            Err(e) => {
                log::warn!("{e}");
                writeln!(self.out, "error: {}", e.user_message())
            }
        }
    }

    fn press(&mut self, code: u32) -> io::Result<()> {
        if self.modifiers.update(code, true) {
            return Ok(());
        }
        let Some(key) = self.table.translate(code, self.modifiers.modifiers()) else {
            return Ok(());
        };
        match self.scene.handle_key(key) {
            Ok(KeyOutcome::TitleCommitted) => writeln!(self.out, "title accepted"),
            Ok(KeyOutcome::ReadyToConfirm) => writeln!(self.out, "save or discard?"),
            Ok(KeyOutcome::Discarded) => writeln!(self.out, "edit discarded"),
            Ok(KeyOutcome::Edited | KeyOutcome::Ignored) => Ok(()),
            Err(e) => self.reject(&e),
        }
    }

    fn report(&mut self, result: notepad_core::Result<()>) -> io::Result<()> {
        match result {
            Ok(()) => Ok(()),
            Err(e) => self.reject(&e),
        }
    }

    fn reject(&mut self, e: &NotepadError) -> io::Result<()> {
        log::debug!("rejected: {e}");
        writeln!(self.out, "rejected: {}", e.user_message())
    }

    fn usage(&mut self, form: &str) -> io::Result<()> {
        writeln!(self.out, "usage: {form}")
    }

    fn print_notes(&mut self) -> io::Result<()> {
        let entries = self.scene.menu_entries(&self.store);
        for entry in entries.iter().skip(1) {
            let marker = if entry.enabled { ' ' } else { '-' };
            if let notepad_core::MenuTarget::Note(id) = entry.target {
                if entry.faded {
                    writeln!(self.out, "{marker}[{id}] ~{}~", entry.label)?;
                } else {
                    writeln!(self.out, "{marker}[{id}] {}", entry.label)?;
                }
            }
        }
        Ok(())
    }

    fn print_state(&mut self) -> io::Result<()> {
        writeln!(self.out, "{:?}", self.scene.state())?;
        let shown = self.scene.cursor_shown();
        if let Some(session) = self.scene.session() {
            let cursor = session.cursor();
            for (row, line) in session.lines().iter().enumerate() {
                if row == cursor.row && shown {
                    let at = line
                        .char_indices()
                        .nth(cursor.col)
                        .map_or(line.len(), |(i, _)| i);
                    writeln!(self.out, "  {}|{}", &line[..at], &line[at..])?;
                } else {
                    writeln!(self.out, "  {line}")?;
                }
            }
        }
        Ok(())
    }
}

fn parse_id(words: &[&str]) -> Option<u32> {
    words.get(1)?.parse().ok()
}
