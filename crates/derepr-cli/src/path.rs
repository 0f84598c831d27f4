//! Journal path validation.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Reasons a journal path is refused.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PathError {
    /// The path is empty.
    #[error("path is empty")]
    Empty,
    /// The path names a directory.
    #[error("{0} is a directory")]
    IsDirectory(String),
    /// The parent directory does not exist.
    #[error("parent directory of {0} does not exist")]
    MissingParent(String),
}

/// Checks that `journal` can hold a journal file. The file itself may not
/// exist yet.
pub fn validate_journal_path(journal: &str) -> Result<PathBuf, PathError> {
    if journal.trim().is_empty() {
        return Err(PathError::Empty);
    }
    let path = PathBuf::from(journal);
    if path.is_dir() {
        return Err(PathError::IsDirectory(sanitize_path_for_error(&path)));
    }
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => {
            Err(PathError::MissingParent(sanitize_path_for_error(&path)))
        }
        _ => Ok(path),
    }
}

/// File name only, so errors do not echo full directory layouts.
pub fn sanitize_path_for_error(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "<journal>".to_string())
}
