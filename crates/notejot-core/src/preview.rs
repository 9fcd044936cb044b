use std::{fs, io, path::Path};

use tracing::debug;

use crate::{
    MAX_FILE_BYTES,
    error::ValidationError,
    note::{check_filename, target_path},
};

/// Contents of the note `filename_base` would save into, for read-only
/// display. Problems come back as readable text rather than errors.
#[must_use]
pub fn read_preview(directory: &Path, filename_base: &str) -> String {
    let filename_base = filename_base.trim();
    match check_filename(filename_base) {
        Ok(()) => {}
        Err(ValidationError::MissingFilename) => {
            return "Enter a filename to preview its note.".to_owned();
        }
        Err(err) => return err.to_string(),
    }

    let path = target_path(directory, filename_base);
    let meta = match fs::metadata(&path) {
        Ok(meta) => meta,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return format!(
                "{} has not been created yet. Save a note to start it.",
                path.display()
            );
        }
        Err(err) => return format!("Could not read {}: {err}", path.display()),
    };

    if meta.len() > MAX_FILE_BYTES {
        return format!(
            "{} is too large to preview ({} bytes).",
            path.display(),
            meta.len()
        );
    }

    debug!(path = %path.display(), len = meta.len(), "reading preview");
    fs::read_to_string(&path)
        .unwrap_or_else(|err| format!("Could not read {}: {err}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::make_temp_dir;

    #[test]
    fn existing_note_is_returned_verbatim() {
        let dir = make_temp_dir("notejot-preview-existing");
        fs::write(dir.join("log.md"), "# Log\n\nhi [[01-01-24]]").ok();

        assert_eq!(read_preview(&dir, "log"), "# Log\n\nhi [[01-01-24]]");
        assert_eq!(read_preview(&dir, "log.md"), "# Log\n\nhi [[01-01-24]]");

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_note_has_placeholder() {
        let dir = make_temp_dir("notejot-preview-missing");

        let text = read_preview(&dir, "later");
        assert!(text.contains("later.md"), "{text}");
        assert!(text.contains("not been created yet"), "{text}");
        assert!(!dir.join("later.md").exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn empty_filename_asks_for_one() {
        let dir = make_temp_dir("notejot-preview-empty");
        assert_eq!(read_preview(&dir, "  "), "Enter a filename to preview its note.");
        assert_eq!(read_preview(&dir, ".md"), "Enter a filename to preview its note.");
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn bare_extension_file_is_not_read() {
        let dir = make_temp_dir("notejot-preview-bare");
        fs::write(dir.join(".md"), "hidden").ok();

        assert_eq!(read_preview(&dir, ".MD"), "Enter a filename to preview its note.");

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn filenames_with_folders_are_not_read() {
        let dir = make_temp_dir("notejot-preview-folders");
        let _ = fs::create_dir_all(dir.join("sub"));
        fs::write(dir.join("sub").join("inner.md"), "nested").ok();

        assert_eq!(
            read_preview(&dir, "sub/inner"),
            ValidationError::InvalidFilename.to_string()
        );

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn read_failure_is_described() {
        let dir = make_temp_dir("notejot-preview-fail");
        let _ = fs::create_dir_all(dir.join("odd.md"));

        let text = read_preview(&dir, "odd");
        assert!(text.starts_with("Could not read"), "{text}");

        let _ = fs::remove_dir_all(&dir);
    }
}
