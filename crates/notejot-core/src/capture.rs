//! The two ways the input buffer is turned into entries.
//!
//! `save_all` takes the whole buffer as one entry and clears it. `save_line`
//! takes only the line the user just finished and leaves everything else in
//! place, so notes can be jotted one per line. `save_new_lines` does the same
//! for every line one edit finished.

use std::{ops::Range, path::Path};

use chrono::NaiveDate;
use tracing::debug;

use crate::{
    error::NoteError,
    note::{Entry, SaveOutcome, append_entry},
    prefs::PreferenceStore,
};

/// Save the whole buffer as one entry, clearing it on success.
pub fn save_all(
    store: &PreferenceStore,
    directory: &Path,
    filename: &str,
    buffer: &mut String,
    date: NaiveDate,
) -> Result<SaveOutcome, NoteError> {
    let outcome = {
        let entry = Entry::new(filename, buffer)?;
        append_entry(store, directory, &entry, date)?
    };
    buffer.clear();
    Ok(outcome)
}

/// Save the most recently completed line as one entry and remove it from
/// the buffer.
///
/// Returns `Ok(None)` when there is no completed line or it was blank; a
/// blank line is still removed. On error the line stays in the buffer.
pub fn save_line(
    store: &PreferenceStore,
    directory: &Path,
    filename: &str,
    buffer: &mut String,
    date: NaiveDate,
) -> Result<Option<SaveOutcome>, NoteError> {
    save_completed_line(store, directory, filename, buffer, 0, date)
}

/// Save the last `added` completed lines, oldest first, removing each as it
/// is saved.
///
/// Used when one edit finished several lines at once, such as a paste. Stops
/// at the first error, leaving that line and the later ones in the buffer.
pub fn save_new_lines(
    store: &PreferenceStore,
    directory: &Path,
    filename: &str,
    buffer: &mut String,
    added: usize,
    date: NaiveDate,
) -> Result<Vec<SaveOutcome>, NoteError> {
    let added = added.min(buffer.matches('\n').count());
    let mut outcomes = Vec::with_capacity(added);
    // Removing an older line leaves the newlines after it in place, so the
    // next line is always one step closer to the end.
    for back in (0..added).rev() {
        if let Some(outcome) = save_completed_line(store, directory, filename, buffer, back, date)? {
            outcomes.push(outcome);
        }
    }
    Ok(outcomes)
}

fn save_completed_line(
    store: &PreferenceStore,
    directory: &Path,
    filename: &str,
    buffer: &mut String,
    back: usize,
    date: NaiveDate,
) -> Result<Option<SaveOutcome>, NoteError> {
    let Some(line) = completed_line(buffer, back) else {
        return Ok(None);
    };

    let text = buffer[line.text.clone()].trim();
    if text.is_empty() {
        debug!("dropping blank line");
        buffer.replace_range(line.full, "");
        return Ok(None);
    }

    let outcome = {
        let entry = Entry::new(filename, text)?;
        append_entry(store, directory, &entry, date)?
    };
    buffer.replace_range(line.full, "");
    Ok(Some(outcome))
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct CompletedLine {
    /// The line without its newline.
    text: Range<usize>,
    /// The line and its newline.
    full: Range<usize>,
}

/// The line ending at the `back`-th `\n` counted from the end (0 is the last).
fn completed_line(buffer: &str, back: usize) -> Option<CompletedLine> {
    let (end, _) = buffer.match_indices('\n').rev().nth(back)?;
    let start = buffer[..end].rfind('\n').map_or(0, |i| i + 1);
    Some(CompletedLine {
        text: start..end,
        full: start..end + 1,
    })
}
