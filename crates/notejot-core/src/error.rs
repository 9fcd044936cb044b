use std::{io, path::PathBuf};

use thiserror::Error;

/// Input the user can fix in place.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a filename.")]
    MissingFilename,
    #[error("Filename cannot contain folders; pick the folder with Change Save Folder.")]
    InvalidFilename,
    #[error("Note content cannot be empty.")]
    EmptyBody,
}

#[derive(Debug, Error)]
pub enum NoteError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(
        "Invalid save directory {}. Choose an existing folder to save into.",
        path.display()
    )]
    InvalidDirectory { path: PathBuf },

    #[error("Could not save or append to {}: {source}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failures persisting preferences. Reads never fail; missing or corrupt
/// files read as empty.
#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("could not resolve the home directory")]
    NoHome,

    #[error("could not encode preferences: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("could not write preferences to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_are_user_facing() {
        let err = NoteError::from(ValidationError::EmptyBody);
        assert_eq!(err.to_string(), "Note content cannot be empty.");
        assert_eq!(
            ValidationError::MissingFilename.to_string(),
            "Please enter a filename."
        );
    }

    #[test]
    fn file_write_error_carries_underlying_message() {
        let err = NoteError::FileWrite {
            path: PathBuf::from("/notes/a.md"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/notes/a.md"), "{msg}");
        assert!(msg.ends_with("denied"), "{msg}");
    }

    #[test]
    fn encode_error_names_preferences() {
        let Err(json) = serde_json::from_str::<serde_json::Value>("{") else {
            return;
        };
        let msg = PrefsError::from(json).to_string();
        assert!(msg.starts_with("could not encode preferences: "), "{msg}");
    }
}
