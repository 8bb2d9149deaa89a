mod host;
mod settings;

use clap::{ArgAction, Parser};
use host::Host;
use notepad_core::{load_config, load_notepad, save_notepad, NoteStore};
use std::error::Error;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

/// Reads notepad commands and menu directives from a script, or stdin, and
/// writes the notepad back to the save file when done.
#[derive(Debug, Clone, Parser)]
#[command(name = "notepad", about = "Player notepad host", version)]
struct Cli {
    /// Config file, defaults to config.json in the app directory
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Save file, defaults to save.json in the app directory
    #[arg(long, short = 's')]
    save: Option<PathBuf>,

    /// Ignore the save file and seed the starting notes
    #[arg(long, action = ArgAction::SetTrue)]
    new_game: bool,

    /// Script to run instead of stdin
    script: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(settings::config_file_path);
    let save_path = cli.save.unwrap_or_else(settings::default_save_path);

    let config = load_config(&config_path)?;
    let store = if !cli.new_game && save_path.exists() {
        load_notepad(&save_path)?
    } else {
        log::info!("starting a new notepad");
        NoteStore::new_game(&config)
    };

    let stdout = io::stdout();
    let mut host = Host::new(&config, store, stdout.lock());
    match &cli.script {
        Some(path) => host.run(BufReader::new(File::open(path)?))?,
        None => host.run(io::stdin().lock())?,
    }

    save_notepad(&save_path, host.store())?;
    log::info!("notepad saved to {}", save_path.display());
    Ok(())
}
