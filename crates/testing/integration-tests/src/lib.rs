//! Integration test utilities for the cyrus back end
//!
//! A fixture is a `.cyr` source file next to the parser's JSON AST for it
//! (`fixtures/<name>.cyr` and `fixtures/<name>.json`).

use anyhow::{Context, Result};
use cy_diagnostics::SourceFile;
use cy_driver::{CompileOptions, CompiledModule};
use cy_syntax::Program;
use inkwell::context::Context as LlvmContext;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Directory holding the checked-in fixtures
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// A source file and its AST
#[derive(Debug, Clone)]
pub struct Fixture {
    /// The `.cyr` source
    pub source: SourceFile,
    /// Its AST as handed over by the parser
    pub program: Program,
}

impl Fixture {
    /// Load `fixtures/<name>.cyr` and its AST
    ///
    /// The source path is kept relative (`<name>.cyr`) so emitted IR does
    /// not depend on where the workspace lives.
    ///
    /// # Errors
    ///
    /// Returns an error if either file is missing or the AST is malformed
    pub fn load(name: &str) -> Result<Self> {
        let dir = fixtures_dir();
        let text = fs::read_to_string(dir.join(format!("{name}.cyr")))
            .with_context(|| format!("missing fixture source '{name}.cyr'"))?;
        let ast = fs::read_to_string(dir.join(format!("{name}.json")))
            .with_context(|| format!("missing fixture AST '{name}.json'"))?;
        Self::from_parts(&format!("{name}.cyr"), &text, &ast)
    }

    /// Build a fixture from in-memory text
    ///
    /// # Errors
    ///
    /// Returns an error if `ast` is not a valid program
    pub fn from_parts(path: &str, text: &str, ast: &str) -> Result<Self> {
        let program = serde_json::from_str(ast).context("fixture AST is malformed")?;
        Ok(Self {
            source: SourceFile::new(path, text),
            program,
        })
    }

    /// Emitted IR text, or the driver error
    ///
    /// # Errors
    ///
    /// Returns the driver error when the module does not compile
    pub fn emit(&self) -> Result<String, cy_driver::DriverError> {
        let context = LlvmContext::create();
        let module = cy_driver::build_module(&context, &self.source, self.program.clone())?;
        Ok(module.print_to_string().to_string())
    }
}

/// A scratch directory that fixtures are written into and compiled from
pub struct TestWorkspace {
    dir: TempDir,
}

impl TestWorkspace {
    /// A fresh temporary directory
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary directory cannot be created
    pub fn new() -> Result<Self> {
        Ok(Self {
            dir: TempDir::new()?,
        })
    }

    /// Root of the workspace
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write the fixture's source into the workspace; returns its path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn add_source(&self, fixture: &Fixture) -> Result<PathBuf> {
        let name = fixture
            .source
            .path
            .file_name()
            .context("fixture has no file name")?;
        let path = self.dir.path().join(name);
        fs::write(&path, &fixture.source.text)?;
        Ok(path)
    }

    /// Run the full pipeline with `build/` as the build directory
    ///
    /// # Errors
    ///
    /// Returns an error if writing the source or compiling fails
    pub fn compile(&self, fixture: &Fixture) -> Result<CompiledModule> {
        let input = self.add_source(fixture)?;
        let options = CompileOptions::new(input).with_build_directory(self.dir.path().join("build"));
        Ok(cy_driver::compile(&options, fixture.program.clone())?)
    }
}
