//! File locations for the notepad host.
//!
//! Configuration and the save file live in an OS-appropriate directory and
//! can each be overridden on the command line.

use std::path::PathBuf;

fn app_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        base.join("Notepad")
    }
    #[cfg(not(target_os = "windows"))]
    {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config").join("notepad")
    }
}

/// Returns the path to the config JSON file.
///
/// - macOS / Linux: `~/.config/notepad/config.json`
/// - Windows: `%APPDATA%/Notepad/config.json`
pub fn config_file_path() -> PathBuf {
    app_dir().join("config.json")
}

/// Returns the default save file, next to the config.
pub fn default_save_path() -> PathBuf {
    app_dir().join("save.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_share_a_directory() {
        let config = config_file_path();
        let save = default_save_path();
        assert_eq!(config.parent(), save.parent());
        assert_eq!(config.file_name().unwrap(), "config.json");
        assert_eq!(save.file_name().unwrap(), "save.json");
    }
}
