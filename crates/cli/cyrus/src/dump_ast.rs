//! `dump-ast` command implementation

use anyhow::Result;
use std::path::Path;

pub fn dump_ast(path: &Path) -> Result<()> {
    let program = crate::input::load_program(path)?;
    print!("{program}");
    Ok(())
}
