//! Appending dated entries to a Markdown note.
//!
//! A new note starts with a `# Title` heading built from its filename. Every
//! save then adds a blank line and `<body> [[MM-DD-YY]]`, so the file reads:
//!
//! ```text
//! # 2024 01 01 Note
//!
//! Bought milk [[01-01-24]]
//!
//! Called the bank [[01-02-24]]
//! ```
//!
//! Existing files are only ever appended to.

use std::{
    fs::OpenOptions,
    io::{self, Write as _},
    path::{Component, Path, PathBuf},
};

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::{
    error::{NoteError, PrefsError, ValidationError},
    prefs::{LAST_FILENAME_KEY, PreferenceStore},
};

const EXTENSION: &str = ".md";
const DATE_LINK_FORMAT: &str = "%m-%d-%y";
const DEFAULT_FILENAME_FORMAT: &str = "%Y-%m-%d-Note";

/// A filename and body that passed validation, both trimmed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Entry<'a> {
    filename: &'a str,
    body: &'a str,
}

impl<'a> Entry<'a> {
    pub fn new(filename: &'a str, body: &'a str) -> Result<Self, ValidationError> {
        let filename = filename.trim();
        check_filename(filename)?;
        let body = body.trim();
        if body.is_empty() {
            return Err(ValidationError::EmptyBody);
        }
        Ok(Self { filename, body })
    }

    /// Filename as typed, which may already carry `.md`.
    #[must_use]
    pub const fn filename(&self) -> &'a str {
        self.filename
    }

    /// Name remembered for the next save.
    ///
    /// A lowercase `.md` is dropped because the path adds it back. Other
    /// casings such as `.MD` are kept, otherwise the next save would go to
    /// `name.md`, a different file on case-sensitive filesystems.
    #[must_use]
    pub fn stem(&self) -> &'a str {
        self.filename
            .strip_suffix(EXTENSION)
            .unwrap_or(self.filename)
    }

    #[must_use]
    pub const fn body(&self) -> &'a str {
        self.body
    }
}

#[derive(Debug)]
pub struct SaveOutcome {
    pub path: PathBuf,
    /// The note file did not exist before this save.
    pub created: bool,
    /// Remembering the filename failed. The note itself was still written.
    pub preference_error: Option<PrefsError>,
}

/// Validate and append `body` to `<directory>/<filename_base>.md`, dated today.
pub fn save_note(
    store: &PreferenceStore,
    directory: &Path,
    filename_base: &str,
    body: &str,
) -> Result<SaveOutcome, NoteError> {
    save_note_on(store, directory, filename_base, body, crate::today())
}

pub fn save_note_on(
    store: &PreferenceStore,
    directory: &Path,
    filename_base: &str,
    body: &str,
    date: NaiveDate,
) -> Result<SaveOutcome, NoteError> {
    let entry = Entry::new(filename_base, body)?;
    append_entry(store, directory, &entry, date)
}

/// Write one entry, creating the note with its heading if needed.
///
/// The filename is remembered before the note is touched, but a failure to
/// remember it is only reported back in the outcome.
pub fn append_entry(
    store: &PreferenceStore,
    directory: &Path,
    entry: &Entry<'_>,
    date: NaiveDate,
) -> Result<SaveOutcome, NoteError> {
    if !directory.is_dir() {
        return Err(NoteError::InvalidDirectory {
            path: directory.to_path_buf(),
        });
    }

    let path = target_path(directory, entry.filename);

    let preference_error = store.save(LAST_FILENAME_KEY, entry.stem()).err();
    if let Some(err) = &preference_error {
        warn!(%err, "could not remember the last filename");
    }

    let exists = path.exists();
    debug!(path = %path.display(), exists, "writing entry");

    let result = if exists {
        append_to(&path, &format_entry(entry.body, date))
    } else {
        let mut contents = heading(entry.filename);
        contents.push_str(&format_entry(entry.body, date));
        create_with(&path, &contents)
    };
    result.map_err(|source| NoteError::FileWrite {
        path: path.clone(),
        source,
    })?;

    info!(
        path = %path.display(),
        created = !exists,
        "saved note entry"
    );
    Ok(SaveOutcome {
        path,
        created: !exists,
        preference_error,
    })
}

fn append_to(path: &Path, text: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().append(true).open(path)?;
    file.write_all(text.as_bytes())
}

fn create_with(path: &Path, text: &str) -> io::Result<()> {
    // `create_new` keeps a file that appeared since the existence check.
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)?;
    file.write_all(text.as_bytes())
}

/// `<directory>/<filename>.md`.
#[must_use]
pub fn target_path(directory: &Path, filename_base: &str) -> PathBuf {
    directory.join(note_file_name(filename_base))
}

/// Adds `.md` unless the name already ends with it, in any case.
#[must_use]
pub fn note_file_name(filename_base: &str) -> String {
    if has_extension(filename_base) {
        filename_base.to_owned()
    } else {
        format!("{filename_base}{EXTENSION}")
    }
}

/// A filename must name one file directly inside the save folder.
pub(crate) fn check_filename(name: &str) -> Result<(), ValidationError> {
    if strip_extension(name).is_empty() {
        return Err(ValidationError::MissingFilename);
    }
    let mut components = Path::new(name).components();
    let single = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if !single || name.contains(['/', '\\']) {
        return Err(ValidationError::InvalidFilename);
    }
    Ok(())
}

fn has_extension(name: &str) -> bool {
    name.get(name.len().saturating_sub(EXTENSION.len())..)
        .is_some_and(|tail| tail.eq_ignore_ascii_case(EXTENSION))
}

fn strip_extension(name: &str) -> &str {
    if has_extension(name) {
        &name[..name.len() - EXTENSION.len()]
    } else {
        name
    }
}

fn heading(filename_base: &str) -> String {
    format!("# {}", title_from_filename(filename_base))
}

/// `my-daily-log` becomes `My Daily Log`.
#[must_use]
pub fn title_from_filename(filename_base: &str) -> String {
    title_case(&strip_extension(filename_base).replace('-', " "))
}

/// Upper-case the first letter of every run of letters and lower-case the
/// rest. Anything that is not a letter, digits included, starts a new word.
#[must_use]
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}

/// `[[MM-DD-YY]]`.
#[must_use]
pub fn date_link(date: NaiveDate) -> String {
    format!("[[{}]]", date.format(DATE_LINK_FORMAT))
}

/// The block appended for one entry, leading blank line included.
#[must_use]
pub fn format_entry(body: &str, date: NaiveDate) -> String {
    format!("\n\n{} {}", body.trim(), date_link(date))
}

/// Suggested filename when none has been used yet.
#[must_use]
pub fn default_filename(today: NaiveDate) -> String {
    today.format(DEFAULT_FILENAME_FORMAT).to_string()
}
