//! Command-line and environment configuration.
//!
//! The only knob is the assembly dialect. `--syntax=<name>` wins over the
//! `EXPRCC_SYNTAX` environment variable, which wins over the Intel default.

use std::str::FromStr;

use snafu::{Snafu, ensure};

use crate::asm::Syntax;

/// Environment variable consulted for the default syntax.
pub const SYNTAX_ENV: &str = "EXPRCC_SYNTAX";

const SYNTAX_FLAG: &str = "--syntax";

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum ConfigError {
  #[snafu(display("usage: {program} [--syntax=<intel|att>] <expr>"))]
  Usage { program: String },

  #[snafu(display("unknown assembly syntax \"{name}\" (expected \"intel\" or \"att\")"))]
  UnknownSyntax { name: String },
}

impl FromStr for Syntax {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "intel" => Ok(Syntax::Intel),
      "att" | "at&t" => Ok(Syntax::Att),
      _ => UnknownSyntaxSnafu { name: s }.fail(),
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
  pub syntax: Syntax,
}

/// A fully resolved command line: what to compile and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
  pub config: Config,
  pub source: String,
}

impl Invocation {
  /// Resolve `args` (including the program name) against the value of
  /// `EXPRCC_SYNTAX`, if set.
  ///
  /// Only arguments starting with `--syntax` are treated as flags, so
  /// expressions such as `-5` or `--5` pass through untouched.
  pub fn from_args<I>(args: I, env_syntax: Option<&str>) -> Result<Self, ConfigError>
  where
    I: IntoIterator<Item = String>,
  {
    let mut args = args.into_iter();
    let program = args.next().unwrap_or_else(|| "exprcc".to_string());

    let mut flag_syntax = None;
    let mut sources = Vec::new();

    for arg in args {
      match arg.strip_prefix(SYNTAX_FLAG) {
        Some(rest) => {
          let name = rest.strip_prefix('=').ok_or_else(|| ConfigError::Usage {
            program: program.clone(),
          })?;
          flag_syntax = Some(name.parse::<Syntax>()?);
        }
        None => sources.push(arg),
      }
    }

    ensure!(sources.len() == 1, UsageSnafu { program });
    let source = sources.pop().unwrap_or_default();

    // The environment is only consulted when no flag was given.
    let syntax = match (flag_syntax, env_syntax) {
      (Some(syntax), _) => syntax,
      (None, Some(name)) if !name.is_empty() => name.parse::<Syntax>()?,
      (None, _) => Syntax::default(),
    };

    Ok(Self {
      config: Config { syntax },
      source,
    })
  }
}
