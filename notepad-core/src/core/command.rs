//! The `notepad …` command surface used by event scripts.
//!
//! Parsing is strict, but executing is permissive: a well-formed command
//! addressed to a key that does not exist does nothing, like the store
//! operations it forwards to.

use crate::core::stage::{StageField, StageValue};
use crate::core::store::Feature;
use crate::{NoteStore, NotepadError, Result};

/// Escape token for a line break inside a staged details value.
pub const LINE_BREAK_TOKEN: &str = "\\n";

/// Which lock a `lock` / `unlock` command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockTarget {
    Title,
    Details,
    /// Title and details.
    Both,
    Delete,
}

/// Where a `search` command looks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchScope {
    Titles,
    Details,
    Key(String),
}

/// Parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open,
    Stage(StageField, StageValue),
    /// Stages `titleLocked` and `detailsLocked` together.
    StageBothLocked(bool),
    StageAdd,
    StageAppend,
    StageClear,
    Lock(LockTarget, String),
    Unlock(LockTarget, String),
    DeleteKey(String),
    DeleteAll,
    Hide(String),
    Show(String),
    Enable(Feature),
    Disable(Feature),
    Search {
        slot: u32,
        scope: SearchScope,
        term: String,
    },
}

/// What the host should do after a command ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    None,
    /// Present the notepad menu.
    OpenNotepad,
    /// Store `value` in host variable `slot`. Empty means not found.
    SetVariable { slot: u32, value: String },
}

fn invalid(msg: impl Into<String>) -> NotepadError {
    NotepadError::InvalidCommand(msg.into())
}

fn arg<'a>(args: &[&'a str], i: usize, what: &str) -> Result<&'a str> {
    args.get(i)
        .copied()
        .ok_or_else(|| invalid(format!("missing {what}")))
}

fn key_arg(args: &[&str], i: usize) -> Result<String> {
    Ok(arg(args, i, "key")?.to_lowercase())
}

fn flag_arg(args: &[&str], i: usize) -> Result<bool> {
    let raw = arg(args, i, "true or false")?;
    match raw.to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(invalid(format!("expected true or false, got '{raw}'"))),
    }
}

fn rest(args: &[&str], from: usize) -> String {
    args.get(from..).unwrap_or_default().join(" ")
}

fn parse_lock_target(word: &str) -> Result<LockTarget> {
    match word.to_ascii_lowercase().as_str() {
        "title" => Ok(LockTarget::Title),
        "details" => Ok(LockTarget::Details),
        "both" => Ok(LockTarget::Both),
        "delete" => Ok(LockTarget::Delete),
        other => Err(invalid(format!("unknown lock '{other}'"))),
    }
}

fn parse_stage(args: &[&str]) -> Result<Command> {
    let sub = arg(args, 1, "stage field")?.to_ascii_lowercase();
    let cmd = match sub.as_str() {
        "add" => Command::StageAdd,
        "append" => Command::StageAppend,
        "clear" => Command::StageClear,
        "bothlocked" => Command::StageBothLocked(flag_arg(args, 2)?),
        _ => {
            let field: StageField = sub.parse()?;
            let value = match field {
                StageField::Title => StageValue::Text(rest(args, 2)),
                StageField::Details => StageValue::Lines(
                    rest(args, 2)
                        .split(LINE_BREAK_TOKEN)
                        .map(str::to_string)
                        .collect(),
                ),
                StageField::Key => StageValue::Text(key_arg(args, 2)?),
                _ => StageValue::Flag(flag_arg(args, 2)?),
            };
            Command::Stage(field, value)
        }
    };
    Ok(cmd)
}

fn parse_search(args: &[&str]) -> Result<Command> {
    let slot_text = arg(args, 1, "variable slot")?;
    let slot: u32 = slot_text
        .parse()
        .map_err(|_| invalid(format!("'{slot_text}' is not a variable slot")))?;
    let (scope, for_at) = match arg(args, 2, "search scope")?.to_ascii_lowercase().as_str() {
        "titles" => (SearchScope::Titles, 3),
        "details" => (SearchScope::Details, 3),
        "key" => (SearchScope::Key(key_arg(args, 3)?), 4),
        other => return Err(invalid(format!("unknown search scope '{other}'"))),
    };
    if !arg(args, for_at, "'for'")?.eq_ignore_ascii_case("for") {
        return Err(invalid("expected 'for' before the search term"));
    }
    Ok(Command::Search {
        slot,
        scope,
        term: rest(args, for_at + 1),
    })
}

/// Parses one command line. The leading `notepad` word is required and,
/// like every keyword, case-insensitive.
///
/// # Errors
///
/// Returns [`NotepadError::InvalidCommand`] for anything that is not a
/// well-formed notepad command, and [`NotepadError::UnknownFeature`] for
/// `enable`/`disable` with a name other than `new`, `modify` or `delete`.
pub fn parse_command(line: &str) -> Result<Command> {
    let mut words = line.split_whitespace();
    match words.next() {
        Some(w) if w.eq_ignore_ascii_case("notepad") => {}
        _ => return Err(invalid(format!("not a notepad command: '{}'", line.trim()))),
    }
    let args: Vec<&str> = words.collect();

    let verb = arg(&args, 0, "command")?.to_ascii_lowercase();
    let cmd = match verb.as_str() {
        "open" => Command::Open,
        "stage" => parse_stage(&args)?,
        "lock" => Command::Lock(parse_lock_target(arg(&args, 1, "lock")?)?, key_arg(&args, 2)?),
        "unlock" => Command::Unlock(parse_lock_target(arg(&args, 1, "lock")?)?, key_arg(&args, 2)?),
        "delete" => match arg(&args, 1, "'key' or 'all'")?.to_ascii_lowercase().as_str() {
            "key" => Command::DeleteKey(key_arg(&args, 2)?),
            "all" => Command::DeleteAll,
            other => return Err(invalid(format!("cannot delete '{other}'"))),
        },
        "hide" => Command::Hide(key_arg(&args, 1)?),
        "show" => Command::Show(key_arg(&args, 1)?),
        "enable" => Command::Enable(arg(&args, 1, "feature")?.parse()?),
        "disable" => Command::Disable(arg(&args, 1, "feature")?.parse()?),
        "search" => parse_search(&args)?,
        other => return Err(invalid(format!("unknown command '{other}'"))),
    };
    Ok(cmd)
}

fn set_locks(store: &mut NoteStore, target: LockTarget, key: &str, locked: bool) {
    let title = matches!(target, LockTarget::Title | LockTarget::Both);
    let details = matches!(target, LockTarget::Details | LockTarget::Both);
    if title {
        if locked {
            store.lock_title(key);
        } else {
            store.unlock_title(key);
        }
    }
    if details {
        if locked {
            store.lock_details(key);
        } else {
            store.unlock_details(key);
        }
    }
    if target == LockTarget::Delete {
        if locked {
            store.lock_delete(key);
        } else {
            store.unlock_delete(key);
        }
    }
}

fn stage(store: &mut NoteStore, field: StageField, value: StageValue) {
    if let Err(e) = store.set_stage(field, value) {
        log::warn!("{e}");
    }
}

/// Runs `command` against `store`.
pub fn execute(store: &mut NoteStore, command: &Command) -> CommandOutcome {
    log::debug!("notepad command {command:?}");
    match command {
        Command::Open => return CommandOutcome::OpenNotepad,
        Command::Stage(field, value) => stage(store, *field, value.clone()),
        Command::StageBothLocked(v) => {
            stage(store, StageField::TitleLocked, StageValue::Flag(*v));
            stage(store, StageField::DetailsLocked, StageValue::Flag(*v));
        }
        Command::StageAdd => {
            store.stage_add();
        }
        Command::StageAppend => {
            store.stage_append();
        }
        Command::StageClear => store.clear_stage(),
        Command::Lock(target, key) => set_locks(store, *target, key, true),
        Command::Unlock(target, key) => set_locks(store, *target, key, false),
        Command::DeleteKey(key) => store.delete_by_key(key),
        Command::DeleteAll => store.delete_all(),
        Command::Hide(key) => store.hide(key),
        Command::Show(key) => store.show(key),
        Command::Enable(feature) => store.enable_feature(*feature),
        Command::Disable(feature) => store.disable_feature(*feature),
        Command::Search { slot, scope, term } => {
            let found = match scope {
                SearchScope::Titles => store.search_titles(term),
                SearchScope::Details => store.search_details(term),
                SearchScope::Key(key) => store.search_key(key, term),
            };
            return CommandOutcome::SetVariable {
                slot: *slot,
                value: found.unwrap_or_default(),
            };
        }
    }
    CommandOutcome::None
}

/// Parses and runs one line.
pub fn run_line(store: &mut NoteStore, line: &str) -> Result<CommandOutcome> {
    let command = parse_command(line)?;
    Ok(execute(store, &command))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NewNote;

    #[test]
    fn test_parse_open_case_insensitive() {
        assert_eq!(parse_command("Notepad OPEN").unwrap(), Command::Open);
        assert!(parse_command("open").is_err());
        assert!(parse_command("notepad").is_err());
    }

    #[test]
    fn test_parse_stage_title_keeps_case_and_spaces() {
        assert_eq!(
            parse_command("notepad stage title Talk  to Bob").unwrap(),
            Command::Stage(StageField::Title, StageValue::Text("Talk to Bob".to_string()))
        );
    }

    #[test]
    fn test_parse_stage_details_splits_line_breaks() {
        assert_eq!(
            parse_command(r"notepad stage details Blue Door: 33121\nRed Door: 1").unwrap(),
            Command::Stage(
                StageField::Details,
                StageValue::Lines(vec!["Blue Door: 33121".to_string(), "Red Door: 1".to_string()])
            )
        );
    }

    #[test]
    fn test_parse_stage_flags_and_key() {
        assert_eq!(
            parse_command("notepad stage key Recipes").unwrap(),
            Command::Stage(StageField::Key, StageValue::Text("recipes".to_string()))
        );
        assert_eq!(
            parse_command("notepad stage deleteLocked TRUE").unwrap(),
            Command::Stage(StageField::DeleteLocked, StageValue::Flag(true))
        );
        assert_eq!(
            parse_command("notepad stage bothlocked false").unwrap(),
            Command::StageBothLocked(false)
        );
        assert!(parse_command("notepad stage hidden maybe").is_err());
        assert!(parse_command("notepad stage colour red").is_err());
    }

    #[test]
    fn test_parse_locks_and_deletes() {
        assert_eq!(
            parse_command("notepad lock both Quest").unwrap(),
            Command::Lock(LockTarget::Both, "quest".to_string())
        );
        assert_eq!(
            parse_command("notepad unlock delete quest").unwrap(),
            Command::Unlock(LockTarget::Delete, "quest".to_string())
        );
        assert_eq!(parse_command("notepad delete all").unwrap(), Command::DeleteAll);
        assert!(parse_command("notepad delete id 3").is_err());
        assert!(parse_command("notepad lock title").is_err());
    }

    #[test]
    fn test_parse_enable_unknown_feature() {
        assert_eq!(
            parse_command("notepad disable Modify").unwrap(),
            Command::Disable(Feature::Modify)
        );
        assert!(matches!(
            parse_command("notepad enable edit"),
            Err(NotepadError::UnknownFeature(_))
        ));
    }

    #[test]
    fn test_parse_search() {
        assert_eq!(
            parse_command("notepad search 4 key Recipes for fire water").unwrap(),
            Command::Search {
                slot: 4,
                scope: SearchScope::Key("recipes".to_string()),
                term: "fire water".to_string(),
            }
        );
        assert!(parse_command("notepad search x titles for bob").is_err());
        assert!(parse_command("notepad search 1 titles bob").is_err());
    }

    #[test]
    fn test_stage_sequence_through_commands() {
        let mut store = NoteStore::new();
        for line in [
            "notepad stage title Recipes",
            r"notepad stage details Potion+Herb=Elixir",
            "notepad stage key recipes",
            "notepad stage bothlocked true",
            "notepad stage add",
        ] {
            assert_eq!(run_line(&mut store, line).unwrap(), CommandOutcome::None);
        }
        let note = store.note_by_key("recipes").unwrap();
        assert!(note.title_locked && note.details_locked);
        assert_eq!(note.details, vec!["Potion+Herb=Elixir".to_string()]);

        run_line(&mut store, "notepad stage key recipes").unwrap();
        run_line(&mut store, "notepad stage details Fire+Water=Steam").unwrap();
        run_line(&mut store, "notepad stage append").unwrap();
        assert_eq!(store.note_by_key("recipes").unwrap().details.len(), 2);
    }

    #[test]
    fn test_search_outcome_uses_empty_sentinel() {
        let mut store = NoteStore::new();
        store.add(NewNote::new("Talk to Bob"));
        assert_eq!(
            run_line(&mut store, "notepad search 7 titles for BOB").unwrap(),
            CommandOutcome::SetVariable {
                slot: 7,
                value: "Bob".to_string()
            }
        );
        assert_eq!(
            run_line(&mut store, "notepad search 7 details for bob").unwrap(),
            CommandOutcome::SetVariable {
                slot: 7,
                value: String::new()
            }
        );
    }

    #[test]
    fn test_lock_commands_apply_to_store() {
        let mut store = NoteStore::new();
        let id = store.add(NewNote::new("Quest").key("quest"));
        run_line(&mut store, "notepad lock both quest").unwrap();
        run_line(&mut store, "notepad lock delete quest").unwrap();
        let note = store.note(id).unwrap();
        assert!(note.title_locked && note.details_locked && note.delete_locked);
        run_line(&mut store, "notepad unlock title quest").unwrap();
        assert!(!store.note(id).unwrap().title_locked);
        run_line(&mut store, "notepad hide quest").unwrap();
        assert!(store.note(id).unwrap().hidden);
        run_line(&mut store, "notepad delete key quest").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_open_outcome() {
        let mut store = NoteStore::new();
        assert_eq!(
            run_line(&mut store, "notepad open").unwrap(),
            CommandOutcome::OpenNotepad
        );
    }
}
