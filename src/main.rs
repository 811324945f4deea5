//! Command-line driver.
//!
//! The only place that talks to the process: argument arity, the stderr
//! diagnostic channel and the exit-code mapping all live here, so the
//! library pipeline stays reentrant and never terminates anything itself.

use std::env;
use std::io;
use std::process;

use tracing_subscriber::EnvFilter;

use r9cc::generate_assembly;

/// Install the stderr logging layer. `RUST_LOG` selects verbosity; the
/// default is silent so stdout stays reserved for assembly text.
fn init_logging() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_writer(io::stderr)
    .init();
}

fn main() {
  init_logging();

  let args: Vec<String> = env::args().collect();
  if args.len() != 2 {
    let program = args.first().map(String::as_str).unwrap_or("r9cc");
    eprintln!("usage: {program} <expr>");
    process::exit(1);
  }

  match generate_assembly(&args[1]) {
    Ok(asm) => print!("{asm}"),
    Err(err) => {
      eprintln!("{err}");
      process::exit(1);
    }
  }
}
