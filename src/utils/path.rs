//! Path utilities for upload file names

use std::path::Path;

/// Path utilities for deriving container extensions from file names
pub struct PathUtils;

impl PathUtils {
    /// Lower-cased extension with its leading dot (`"clip.MP4"` -> `".mp4"`).
    ///
    /// Returns an empty string when the name has no extension. Hidden-file
    /// names such as `".mp4"` have no extension either.
    pub fn dotted_extension(file_name: &str) -> String {
        Path::new(file_name)
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
            .unwrap_or_default()
    }

    /// Normalize a configured extension to the `.ext` lower-case form
    pub fn normalize_extension(extension: &str) -> String {
        let trimmed = extension.trim().to_lowercase();
        if trimmed.is_empty() || trimmed.starts_with('.') {
            trimmed
        } else {
            format!(".{}", trimmed)
        }
    }

    /// File name component of a path, used as the "original file name"
    /// when validating files read from disk
    pub fn file_name(path: &Path) -> String {
        path.file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string())
    }
}
