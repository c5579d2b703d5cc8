//! Cyrus compiler CLI
//!
//! Back-end entry point: takes the parser's AST (as JSON) for a `.cyr` file
//! and emits LLVM IR text.

#![allow(
    clippy::print_stdout,
    clippy::print_stderr,
    reason = "CLI tool needs to print to stdout/stderr"
)]

use anyhow::Result;
use clap::{Parser, Subcommand};
use cy_driver::DriverError;
use std::path::PathBuf;
use std::process::ExitCode;

mod dump_ast;
mod emit_ir;
mod input;

#[derive(Parser)]
#[command(name = "cyrus")]
#[command(about = "Cyrus compiler back end", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a Cyrus source file into LLVM IR
    EmitIr {
        /// The `.cyr` source file
        input: PathBuf,

        /// AST of the source file as JSON (defaults to the input with a
        /// `.json` extension)
        #[arg(long)]
        ast: Option<PathBuf>,

        /// Output directory for the `.ll` files
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory for intermediate build files; IR goes to its `llvmir/`
        #[arg(long)]
        build_dir: Option<PathBuf>,
    },

    /// Print the structure of a JSON AST
    DumpAst {
        /// AST file produced by the parser
        ast: PathBuf,
    },
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::EmitIr {
            input,
            ast,
            output,
            build_dir,
        } => emit_ir::emit_ir(input, ast, output, build_dir),
        Commands::DumpAst { ast } => dump_ast::dump_ast(&ast),
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<DriverError>() {
                Some(driver) => driver.report(),
                None => eprintln!("(Error) {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}
