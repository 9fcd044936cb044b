#![forbid(unsafe_code)]

//! Shared logic for `notejot` (GUI + CLI).
//!
//! Notes are appended to a Markdown file as dated entries, and the last used
//! folder and filename are remembered in a small JSON preference file.

pub mod capture;
mod disk_io;
pub mod error;
pub mod note;
pub mod prefs;
pub mod preview;

pub use capture::{save_all, save_line, save_new_lines};
pub use error::{NoteError, PrefsError, ValidationError};
pub use note::{Entry, SaveOutcome, save_note};
pub use prefs::{PreferenceStore, Preferences};
pub use preview::read_preview;

/// Hard cap on file sizes we will load into memory.
pub const MAX_FILE_BYTES: u64 = 64 * 1024 * 1024;

/// Today's date in the local timezone, as used for date-links.
#[must_use]
pub fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::{fs, path::PathBuf, time::SystemTime};

    pub(crate) fn make_temp_dir(name: &str) -> PathBuf {
        let mut dir = std::env::temp_dir();
        let nanos = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos());
        dir.push(format!("{name}-{nanos}-{}", std::process::id()));
        let _ = fs::create_dir_all(&dir);
        dir
    }

    pub(crate) fn date(y: i32, m: u32, d: u32) -> chrono::NaiveDate {
        chrono::NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
    }
}
