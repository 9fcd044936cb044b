#![forbid(unsafe_code)]

use std::{
    io::{self, BufRead as _, Read as _},
    path::{Path, PathBuf},
};

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use notejot_core::{
    PreferenceStore, SaveOutcome, note,
    prefs::{LAST_DIR_KEY, LAST_FILENAME_KEY},
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "notejot-cli",
    about = "Append dated notes to a markdown file",
    version
)]
struct Cli {
    /// Log more detail to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Preference file to use instead of `~/note_taker_config.json`.
    #[arg(long, global = true, value_name = "PATH")]
    prefs: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Append one entry. Reads the entry from stdin when no text is given.
    Add {
        #[command(flatten)]
        target: Target,

        /// Entry text. Use `-` to read from stdin.
        text: Vec<String>,
    },
    /// Append every non-empty stdin line as its own entry.
    Lines {
        #[command(flatten)]
        target: Target,
    },
    /// Print the note file.
    Preview {
        #[command(flatten)]
        target: Target,
    },
    /// Remember the folder notes are saved into.
    SetDir { dir: PathBuf },
    /// Show the remembered folder and filename.
    Prefs,
}

#[derive(Args)]
struct Target {
    /// Note filename; `.md` is added when missing. Defaults to the last one used.
    #[arg(short, long)]
    file: Option<String>,

    /// Folder to save into. Defaults to the remembered folder.
    #[arg(short, long)]
    dir: Option<PathBuf>,
}

impl Target {
    fn resolve(self, store: &PreferenceStore) -> (PathBuf, String) {
        let prefs = store.snapshot();
        let dir = self.dir.unwrap_or_else(|| prefs.save_directory());
        let file = self
            .file
            .unwrap_or_else(|| prefs.last_filename(notejot_core::today()));
        (dir, file)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let store = match cli.prefs {
        Some(path) => PreferenceStore::at(path),
        None => PreferenceStore::default_location()?,
    };

    match cli.command {
        Command::Add { target, text } => {
            let (dir, file) = target.resolve(&store);
            let body = if text.is_empty() || text == ["-"] {
                let mut buf = String::new();
                io::stdin()
                    .read_to_string(&mut buf)
                    .context("failed to read the note from stdin")?;
                buf
            } else {
                text.join(" ")
            };

            let outcome = notejot_core::save_note(&store, &dir, &file, &body)?;
            report(&outcome);
        }
        Command::Lines { target } => {
            let (dir, file) = target.resolve(&store);
            let mut buffer = String::new();
            let mut saved = 0usize;
            for line in io::stdin().lock().lines() {
                let line = line.context("failed to read a line from stdin")?;
                buffer.push_str(&line);
                buffer.push('\n');
                if let Some(outcome) =
                    notejot_core::save_line(&store, &dir, &file, &mut buffer, notejot_core::today())?
                {
                    report(&outcome);
                    saved += 1;
                }
            }
            tracing::debug!(saved, "finished reading lines");
        }
        Command::Preview { target } => {
            let (dir, file) = target.resolve(&store);
            print!("{}", notejot_core::read_preview(&dir, &file));
        }
        Command::SetDir { dir } => {
            let dir = set_dir(&store, &dir)?;
            println!("Notes will now be saved to {}", dir.display());
        }
        Command::Prefs => {
            let prefs = store.snapshot();
            let today = notejot_core::today();
            println!("preferences: {}", store.path().display());
            println!("{LAST_DIR_KEY}: {}", prefs.save_directory().display());
            println!("{LAST_FILENAME_KEY}: {}", prefs.last_filename(today));
            println!(
                "next note: {}",
                note::target_path(&prefs.save_directory(), &prefs.last_filename(today)).display()
            );
        }
    }

    Ok(())
}

fn set_dir(store: &PreferenceStore, dir: &Path) -> anyhow::Result<PathBuf> {
    if !dir.is_dir() {
        bail!("{} is not an existing folder", dir.display());
    }
    let dir = dir
        .canonicalize()
        .with_context(|| format!("failed to resolve {}", dir.display()))?;
    store
        .save(LAST_DIR_KEY, &dir.to_string_lossy())
        .context("failed to remember the save folder")?;
    Ok(dir)
}

fn report(outcome: &SaveOutcome) {
    let verb = if outcome.created { "Created" } else { "Appended to" };
    println!("{verb} {}", outcome.path.display());
    if let Some(err) = &outcome.preference_error {
        eprintln!("warning: {err}");
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use super::*;

    #[test]
    fn parses_add_with_target_and_text() {
        let cli = Cli::try_parse_from([
            "notejot-cli", "add", "--file", "log", "--dir", "/tmp", "bought", "milk",
        ]);
        assert!(cli.is_ok());
        if let Ok(Cli {
            command: Command::Add { target, text },
            ..
        }) = cli
        {
            assert_eq!(target.file.as_deref(), Some("log"));
            assert_eq!(target.dir, Some(PathBuf::from("/tmp")));
            assert_eq!(text, ["bought", "milk"]);
        }
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::try_parse_from(["notejot-cli", "prefs", "-v", "--prefs", "/tmp/p.json"]);
        assert!(cli.is_ok());
        if let Ok(cli) = cli {
            assert!(cli.verbose);
            assert_eq!(cli.prefs, Some(PathBuf::from("/tmp/p.json")));
            assert!(matches!(cli.command, Command::Prefs));
        }
    }

    fn make_temp_dir(name: &str) -> PathBuf {
        let mut dir = std::env::temp_dir();
        let nanos = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos());
        dir.push(format!("{name}-{nanos}-{}", std::process::id()));
        let _ = std::fs::create_dir_all(&dir);
        dir
    }

    #[test]
    fn set_dir_requires_a_folder() {
        let base = make_temp_dir("notejot-cli-setdir");
        let store = PreferenceStore::at(base.join("prefs.json"));

        assert!(set_dir(&store, &base.join("missing")).is_err());
        assert_eq!(store.load(LAST_DIR_KEY), "");

        let saved = set_dir(&store, &base);
        assert!(saved.is_ok());
        assert_eq!(
            store.load(LAST_DIR_KEY),
            saved.map(|p| p.to_string_lossy().into_owned()).unwrap_or_default()
        );

        let _ = std::fs::remove_dir_all(&base);
    }

    #[test]
    fn target_falls_back_to_preferences() {
        let base = make_temp_dir("notejot-cli-target");
        let store = PreferenceStore::at(base.join("prefs.json"));
        let _ = store.save(LAST_DIR_KEY, "/srv/notes");
        let _ = store.save(LAST_FILENAME_KEY, "journal");

        let target = Target {
            file: None,
            dir: None,
        };
        assert_eq!(
            target.resolve(&store),
            (PathBuf::from("/srv/notes"), "journal".to_owned())
        );

        let target = Target {
            file: Some("other".to_owned()),
            dir: Some(base.clone()),
        };
        assert_eq!(target.resolve(&store), (base.clone(), "other".to_owned()));

        let _ = std::fs::remove_dir_all(&base);
    }
}
