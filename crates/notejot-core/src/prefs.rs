//! The JSON sidecar that remembers the last save folder and filename.
//!
//! The file is rewritten wholesale on every change. Keys this crate does not
//! know about are carried through untouched.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::{disk_io::atomic_write_utf8, error::PrefsError, note::default_filename};

pub const CONFIG_FILE_NAME: &str = "note_taker_config.json";
pub const LAST_DIR_KEY: &str = "last_save_directory";
pub const LAST_FILENAME_KEY: &str = "last_filename";

/// A loaded copy of the preference file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Preferences {
    entries: Map<String, Value>,
}

impl Preferences {
    /// String value for `key`. Non-string values read as absent.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(Value::as_str)
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.entries
            .insert(key.to_owned(), Value::String(value.to_owned()));
    }

    /// Folder notes are saved into; the home directory when unset.
    #[must_use]
    pub fn save_directory(&self) -> PathBuf {
        match self.get(LAST_DIR_KEY) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")),
        }
    }

    /// Filename last saved to, or `YYYY-MM-DD-Note` for `today`.
    #[must_use]
    pub fn last_filename(&self, today: NaiveDate) -> String {
        match self.get(LAST_FILENAME_KEY) {
            Some(name) if !name.is_empty() => name.to_owned(),
            _ => default_filename(today),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/note_taker_config.json`.
    pub fn default_location() -> Result<Self, PrefsError> {
        let home = dirs::home_dir().ok_or(PrefsError::NoHome)?;
        Ok(Self::at(home.join(CONFIG_FILE_NAME)))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole file. Missing, unreadable or corrupt files yield empty
    /// preferences.
    #[must_use]
    pub fn snapshot(&self) -> Preferences {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no preference file yet");
                return Preferences::default();
            }
            Err(err) => {
                warn!(path = %self.path.display(), %err, "ignoring unreadable preference file");
                return Preferences::default();
            }
        };

        serde_json::from_str(&text).unwrap_or_else(|err| {
            warn!(path = %self.path.display(), %err, "ignoring corrupt preference file");
            Preferences::default()
        })
    }

    /// Value stored under `key`, or an empty string.
    #[must_use]
    pub fn load(&self, key: &str) -> String {
        self.snapshot().get(key).unwrap_or_default().to_owned()
    }

    /// Set one key, keeping every other key already in the file.
    pub fn save(&self, key: &str, value: &str) -> Result<(), PrefsError> {
        let mut prefs = self.snapshot();
        prefs.set(key, value);
        self.write(&prefs)
    }

    fn write(&self, prefs: &Preferences) -> Result<(), PrefsError> {
        let mut text = serde_json::to_string_pretty(prefs)?;
        text.push('\n');

        let write_err = |source| PrefsError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        atomic_write_utf8(&self.path, &text).map_err(write_err)?;

        debug!(path = %self.path.display(), keys = prefs.len(), "preferences written");
        Ok(())
    }
}
