//! Driver errors

use cy_codegen::CodegenError;
use cy_diagnostics::{SourceError, SourceFile};
use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias of the driver
pub type Result<T, E = DriverError> = std::result::Result<T, E>;

/// Everything that stops a compilation before or around code generation
#[derive(Debug, Error, Diagnostic)]
pub enum DriverError {
    /// Input is not a `.cyr` file
    #[error("Input file '{}' must have the '.cyr' extension.", path.display())]
    #[diagnostic(code(driver::input_extension))]
    InputExtension {
        /// The rejected input
        path: PathBuf,
    },

    /// Input path has no file stem
    #[error("Cannot derive a module name from '{}'.", path.display())]
    #[diagnostic(code(driver::module_name))]
    MissingModuleName {
        /// The input without a usable file stem
        path: PathBuf,
    },

    /// File stem with characters a module name cannot hold
    #[error(
        "Module name '{module}' in file '{}' contains invalid characters. Only alphanumeric \
         characters, underscores, and double colons are allowed.",
        file.display()
    )]
    #[diagnostic(code(driver::module_name))]
    InvalidModuleName {
        /// The derived module name
        module: String,
        /// File it was derived from
        file: PathBuf,
    },

    /// Neither an output path nor a build directory was given
    #[error("Output path is not specified.")]
    #[diagnostic(
        code(driver::no_output),
        help("Build directory is not specified too. Consider to specify one these options to continue compilation.")
    )]
    NoOutputPath,

    /// Reading the source file failed
    #[error(transparent)]
    #[diagnostic(code(driver::source))]
    Source(#[from] SourceError),

    /// Lowering failed; keeps the source so the panel can be shown
    #[error("{error}")]
    #[diagnostic(forward(error))]
    Codegen {
        /// The file being compiled
        source_file: SourceFile,
        /// The first lowering error
        error: CodegenError,
    },

    /// Creating the output directory failed
    #[error("Could not create directory '{}'.", path.display())]
    #[diagnostic(code(driver::create_dir))]
    CreateDir {
        /// The directory
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Writing the `.ll` file failed
    #[error("Could not open file: '{}'.", path.display())]
    #[diagnostic(code(driver::write))]
    Write {
        /// The output file
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },
}

impl DriverError {
    /// Print the error to stderr: code generation failures get the source
    /// panel, everything else a single `(Error)` line
    #[allow(clippy::print_stderr, reason = "errors are reported on stderr")]
    pub fn report(&self) {
        match self {
            Self::Codegen { source_file, error } => {
                cy_diagnostics::report(source_file, error.line() as usize, &error.to_string());
            }
            other => eprintln!("(Error) {other}"),
        }
    }
}
