//! Process-level glue: argument handling, diagnostics, exit codes.

use std::io::Write;
use std::sync::Once;

use crate::config::Invocation;
use crate::generate_assembly;

static TRACING_INIT: Once = Once::new();

/// Install a stderr subscriber when `RUST_LOG` is set, e.g.
/// `RUST_LOG=exprcc=debug`. Safe to call more than once.
pub fn init_tracing() {
  TRACING_INIT.call_once(|| {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    if std::env::var("RUST_LOG").is_ok() {
      tracing_subscriber::registry()
        .with(
          fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true),
        )
        .with(EnvFilter::from_default_env())
        .init();
    }
  });
}

/// Run the compiler for one command line and return the exit status.
///
/// Assembly goes to `out`; usage messages and caret diagnostics go to `err`.
pub fn run<I, O, E>(args: I, env_syntax: Option<&str>, out: &mut O, err: &mut E) -> i32
where
  I: IntoIterator<Item = String>,
  O: Write,
  E: Write,
{
  let invocation = match Invocation::from_args(args, env_syntax) {
    Ok(invocation) => invocation,
    Err(e) => {
      let _ = writeln!(err, "{e}");
      return 1;
    }
  };

  match generate_assembly(&invocation.source, &invocation.config) {
    Ok(asm) => match out.write_all(asm.as_bytes()).and_then(|()| out.flush()) {
      Ok(()) => 0,
      Err(e) => {
        let _ = writeln!(err, "failed to write assembly: {e}");
        1
      }
    },
    Err(e) => {
      tracing::debug!(error = %e, "compilation failed");
      let _ = writeln!(err, "{}", e.render(&invocation.source));
      1
    }
  }
}
