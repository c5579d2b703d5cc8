//! Compilation driver
//!
//! Turns one parsed translation unit into one LLVM module and writes it as
//! `<output-dir>/<module>.ll`. The parser hands the program over as a
//! [`Program`]; the driver validates the module name, runs code generation
//! and keeps the source text around so failures can be shown in context.

mod error;
mod module_name;
mod options;

pub use error::{DriverError, Result};
pub use module_name::{check_input_extension, module_name_from_path, validate_module_name};
pub use options::{CompileOptions, LLVMIR_DIR};

use cy_codegen::CodeGenerator;
use cy_diagnostics::SourceFile;
use cy_syntax::Program;
use inkwell::context::Context;
use inkwell::module::Module;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Result of a successful compilation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledModule {
    /// Module name, derived from the input file stem
    pub name: String,
    /// Where the `.ll` file was written
    pub path: PathBuf,
    /// Functions in the module, declarations included
    pub functions: usize,
    /// Globals in the module, string constants included
    pub globals: usize,
}

/// Lower `program` into a module named after `source`'s file stem
///
/// Nothing is written; use [`compile`] for the full pipeline.
pub fn build_module<'ctx>(
    context: &'ctx Context,
    source: &SourceFile,
    program: Program,
) -> Result<Module<'ctx>> {
    let name = module_name_from_path(&source.path)?;
    validate_module_name(&name, &source.path)?;

    log::debug!("compiling '{}' as module '{name}'", source.path.display());
    let mut generator = CodeGenerator::new(context, &name)
        .with_source_filename(&source.path.display().to_string());
    match generator.build_program(program) {
        Ok(()) => Ok(generator.into_module()),
        Err(error) => Err(DriverError::Codegen {
            source_file: source.clone(),
            error,
        }),
    }
}

/// Compile the file named by `options` and write its IR
///
/// The output directory is resolved before any work is done and created
/// when missing. The `.ll` file is only written once the whole module
/// compiled.
pub fn compile(options: &CompileOptions, program: Program) -> Result<CompiledModule> {
    let output_dir = options.output_directory()?;
    let source = SourceFile::load(&options.input)?;
    let context = Context::create();
    let module = build_module(&context, &source, program)?;
    let name = module.get_name().to_string_lossy().into_owned();

    fs::create_dir_all(&output_dir).map_err(|source| DriverError::CreateDir {
        path: output_dir.clone(),
        source,
    })?;
    let path = output_dir.join(format!("{name}.ll"));
    module
        .print_to_file(&path)
        .map_err(|message| DriverError::Write {
            path: path.clone(),
            source: io::Error::other(message.to_string()),
        })?;
    log::info!("wrote {}", path.display());

    Ok(CompiledModule {
        name,
        path,
        functions: module.get_functions().count(),
        globals: module.get_globals().count(),
    })
}
