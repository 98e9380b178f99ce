//! Crate root: wires together the compilation pipeline.
//!
//! The stages are intentionally small and composable so they can be evolved
//! independently:
//! - `tokenizer` performs lexical analysis and produces a flat token stream.
//! - `parser` owns all syntactic knowledge and returns an expression tree.
//! - `codegen` lowers the tree into a stack-machine instruction list.
//! - `asm` renders that list as Intel or AT&T assembly text.
//! - `vm` executes the instruction list directly, for checking results.
//! - `error` centralises reporting utilities shared by the other modules.
//! - `config` and `cli` make up the command-line driver.

pub mod asm;
pub mod cli;
pub mod codegen;
pub mod config;
pub mod error;
pub mod parser;
pub mod tokenizer;
pub mod vm;

pub use asm::Syntax;
pub use codegen::Program;
pub use config::Config;
pub use error::{CompileError, CompileResult};

/// Compile a source string into an instruction list.
pub fn compile(expr: &str) -> CompileResult<Program> {
  let tokens = tokenizer::tokenize(expr)?;
  let tree = parser::parse(tokens, expr)?;
  Ok(codegen::generate(&tree))
}

/// Compile a source string into assembly text.
pub fn generate_assembly(expr: &str, config: &Config) -> CompileResult<String> {
  let program = compile(expr)?;
  Ok(asm::render(&program, config.syntax))
}
