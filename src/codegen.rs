//! Code generation: formats the Intel-syntax x86-64 text backing each term.
//!
//! The emitter owns the output buffer and the spelling of every directive
//! and instruction. The parser decides what to emit and when, so swapping
//! in a different backend (or a tree-walking pass once the grammar grows
//! nesting) only touches this side of the boundary.

use tracing::trace;

/// Accumulating assembly writer.
///
/// Output is buffered and only handed out by [`Asm::epilogue`], so a run
/// that fails halfway never leaves partial assembly on stdout.
#[derive(Debug, Default)]
pub struct Asm {
  text: String,
}

impl Asm {
  pub fn new() -> Self {
    Self::default()
  }

  /// Emit the syntax directive, symbol declaration and entry label, then
  /// initialise the accumulator register with the first operand.
  pub fn prologue(&mut self, value: i64) {
    self.text.push_str(".intel_syntax noprefix\n");
    self.text.push_str(".global main\n");
    self.text.push_str("main:\n");
    self.text.push_str(&format!("    mov rax, {value}\n"));
    trace!(value, "emitted prologue");
  }

  /// Add `value` to the accumulator.
  pub fn add(&mut self, value: i64) {
    self.text.push_str(&format!("    add rax, {value}\n"));
    trace!(value, "emitted add");
  }

  /// Subtract `value` from the accumulator.
  pub fn sub(&mut self, value: i64) {
    self.text.push_str(&format!("    sub rax, {value}\n"));
    trace!(value, "emitted sub");
  }

  /// Emit the return and hand back the finished assembly text.
  pub fn epilogue(mut self) -> String {
    self.text.push_str("    ret\n");
    self.text
  }
}
