use std::env;
use std::io;
use std::process;

use exprcc::cli;
use exprcc::config::SYNTAX_ENV;

fn main() {
  cli::init_tracing();

  let env_syntax = env::var(SYNTAX_ENV).ok();
  let code = cli::run(
    env::args(),
    env_syntax.as_deref(),
    &mut io::stdout().lock(),
    &mut io::stderr().lock(),
  );
  process::exit(code);
}
