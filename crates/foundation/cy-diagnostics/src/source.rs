//! Source files kept for diagnostics

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure to load a source file
#[derive(Debug, Error)]
pub enum SourceError {
    /// The file could not be read
    #[error("failed to read source file '{}'", path.display())]
    Read {
        /// The file
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },
}

/// A translation unit's path and raw text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path as given to the compiler
    pub path: PathBuf,
    /// Full text of the file
    pub text: String,
}

impl SourceFile {
    /// A source file from in-memory text
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    /// Read the file at `path`
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Read`] when the file cannot be read
    pub fn load(path: &Path) -> Result<Self, SourceError> {
        let text = fs::read_to_string(path).map_err(|source| SourceError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(path, text))
    }

    /// Number of lines in the text
    pub fn line_count(&self) -> usize {
        self.text.lines().count()
    }

    /// Text of the 1-based `line`, without its terminator
    pub fn line(&self, line: usize) -> Option<&str> {
        let index = line.checked_sub(1)?;
        self.text.lines().nth(index)
    }
}
