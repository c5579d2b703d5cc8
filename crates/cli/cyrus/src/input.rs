//! Loading the parser's AST hand-off

use anyhow::{Context, Result};
use cy_syntax::Program;
use std::fs;
use std::path::Path;

pub fn load_program(path: &Path) -> Result<Program> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read AST file '{}'", path.display()))?;
    let program = serde_json::from_str(&text)
        .with_context(|| format!("'{}' is not a valid AST", path.display()))?;
    log::debug!("loaded AST from {}", path.display());
    Ok(program)
}
