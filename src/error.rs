//! Shared error utilities used across the compilation pipeline.
//!
//! Diagnostics are kept lightweight on purpose. These routines format
//! messages in a style reminiscent of chibicc, pointing at the offending
//! byte with a caret. Nothing in here terminates the process: errors bubble
//! up as values and the driver owns the exit-code mapping.

use snafu::Snafu;

pub type CompileResult<T> = Result<T, CompileError>;

/// Fatal compilation errors. The first one raised ends the run.
#[derive(Debug, Snafu)]
pub enum CompileError {
  /// A byte in the input is not whitespace, a digit, `+` or `-`, or a
  /// numeric literal failed to decode.
  #[snafu(display("{expr_line}\n{marker} {message}"))]
  Lex {
    expr_line: String,
    marker: String,
    message: String,
  },
  /// The token stream does not match the grammar at the cursor position.
  #[snafu(display("{expr_line}\n{marker} {message}"))]
  Parse {
    expr_line: String,
    marker: String,
    message: String,
  },
}

impl CompileError {
  /// Construct a lex error anchored at a specific byte offset in the source.
  pub fn lex_at(expr: &str, loc: usize, message: impl Into<String>) -> Self {
    let (expr_line, marker) = anchor(expr, loc);
    Self::Lex {
      expr_line,
      marker,
      message: message.into(),
    }
  }

  /// Construct a parse error anchored at a specific byte offset in the source.
  pub fn parse_at(expr: &str, loc: usize, message: impl Into<String>) -> Self {
    let (expr_line, marker) = anchor(expr, loc);
    Self::Parse {
      expr_line,
      marker,
      message: message.into(),
    }
  }
}

/// Quote the offending expression and build the caret line pointing at `loc`.
fn anchor(expr: &str, loc: usize) -> (String, String) {
  let expr_line = format!("'{expr}'");
  let safe_loc = loc.min(expr.len());
  let char_offset = expr[..safe_loc].chars().count() + 1; // account for opening quote
  let marker = format!("{}^", " ".repeat(char_offset));
  (expr_line, marker)
}
