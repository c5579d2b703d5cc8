//! `emit-ir` command implementation

use anyhow::Result;
use colored::Colorize;
use cy_driver::CompileOptions;
use std::path::PathBuf;
use std::time::Instant;

pub fn emit_ir(
    input: PathBuf,
    ast: Option<PathBuf>,
    output: Option<PathBuf>,
    build_dir: Option<PathBuf>,
) -> Result<()> {
    let start = Instant::now();
    cy_driver::check_input_extension(&input)?;

    let ast = ast.unwrap_or_else(|| input.with_extension("json"));
    let program = crate::input::load_program(&ast)?;

    println!("{} {}", "Compiling".green().bold(), input.display());
    let options = CompileOptions {
        input,
        output_path: output,
        build_directory: build_dir,
    };
    let compiled = cy_driver::compile(&options, program)?;

    println!(
        "  {} {} functions, {} globals",
        "Module:".bold(),
        compiled.functions,
        compiled.globals
    );
    println!(
        "{} LLVM IR saved to {} in {:.2}s",
        "Finished".green().bold(),
        compiled.path.display(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}
