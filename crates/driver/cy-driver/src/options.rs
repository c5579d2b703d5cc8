//! Compilation options

use crate::error::{DriverError, Result};
use std::path::PathBuf;

/// Subdirectory of the build directory that receives `.ll` files
pub const LLVMIR_DIR: &str = "llvmir";

/// Options for compiling one translation unit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileOptions {
    /// The `.cyr` source file
    pub input: PathBuf,
    /// Directory for the emitted IR; wins over `build_directory`
    pub output_path: Option<PathBuf>,
    /// Directory for intermediate build files
    pub build_directory: Option<PathBuf>,
}

impl CompileOptions {
    /// Options for compiling `input` with no output location yet
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            ..Self::default()
        }
    }

    /// Write IR to `path`
    #[must_use]
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Write IR to `path/llvmir` unless an output path is set
    #[must_use]
    pub fn with_build_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.build_directory = Some(path.into());
        self
    }

    /// Where the `.ll` files go
    pub fn output_directory(&self) -> Result<PathBuf> {
        match (&self.output_path, &self.build_directory) {
            (Some(output), _) => Ok(output.clone()),
            (None, Some(build)) => Ok(build.join(LLVMIR_DIR)),
            (None, None) => Err(DriverError::NoOutputPath),
        }
    }
}
