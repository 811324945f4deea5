//! Left-to-right evaluation of the token stream, fused with emission.
//!
//! The grammar is flat, so no expression tree is built: every recognised
//! term maps straight onto one emitted instruction. The evaluator alternates
//! between expecting a number and expecting an operator, and the cursor only
//! ever moves forward, one token per successful consumption. Should the
//! grammar ever grow precedence or nesting, the emitter calls below are the
//! seam where an AST and a separate lowering pass would slot in.

use tracing::debug;

use crate::codegen::Asm;
use crate::error::{CompileError, CompileResult};
use crate::tokenizer::{Token, TokenKind, describe_token, token_text};

/// Consume the whole token stream, emitting one instruction per term.
///
/// The first token must be a number; it initialises the accumulator. After
/// that, every `+`/`-` must be followed by a number, until the `Eof` marker
/// is reached while an operator is expected.
pub fn compile(tokens: Vec<Token>, source: &str) -> CompileResult<String> {
  let mut stream = TokenStream::new(tokens, source);

  if stream.is_eof() {
    return Err(CompileError::parse_at(source, 0, "expression is empty"));
  }

  let mut asm = Asm::new();
  let mut terms = 1usize;

  asm.prologue(stream.get_number()?);

  while !stream.is_eof() {
    terms += 1;
    if stream.equal("+") {
      asm.add(stream.get_number()?);
      continue;
    }

    stream.skip("-")?;
    asm.sub(stream.get_number()?);
  }

  debug!(terms, "compiled expression");
  Ok(asm.epilogue())
}

/// Lightweight forward-only cursor over the token vector.
struct TokenStream<'a> {
  tokens: Vec<Token>,
  source: &'a str,
  pos: usize,
}

impl<'a> TokenStream<'a> {
  /// Take ownership of the token stream; the evaluator will advance `pos` as it consumes input.
  fn new(tokens: Vec<Token>, source: &'a str) -> Self {
    Self {
      tokens,
      source,
      pos: 0,
    }
  }

  fn peek(&self) -> Option<&Token> {
    self.tokens.get(self.pos)
  }

  /// Consume the current token if it matches the provided punctuator.
  /// Reports failure without moving the cursor.
  fn equal(&mut self, op: &str) -> bool {
    if let Some(token) = self.peek()
      && token.kind == TokenKind::Punctuator
      && token.len == op.len()
      && token_text(token, self.source) == op
    {
      self.pos += 1;
      return true;
    }
    false
  }

  /// Consume the current token if it matches `s`, or fail the run.
  fn skip(&mut self, s: &str) -> CompileResult<()> {
    if self.equal(s) {
      Ok(())
    } else {
      let (loc, got) = match self.tokens.get(self.pos) {
        Some(token) => (token.loc, describe_token(Some(token), self.source)),
        None => (self.source.len(), "EOF".to_string()),
      };
      Err(CompileError::parse_at(
        self.source,
        loc,
        format!("expected \"{s}\", but got \"{got}\""),
      ))
    }
  }

  /// Consume the current token as an integer literal, or fail the run.
  fn get_number(&mut self) -> CompileResult<i64> {
    if let Some(token) = self.peek()
      && token.kind == TokenKind::Num
    {
      let value = token.value.ok_or_else(|| {
        CompileError::parse_at(
          self.source,
          token.loc,
          "internal error: numeric token missing value",
        )
      })?;
      self.pos += 1;
      return Ok(value);
    }

    let (loc, got) = match self.tokens.get(self.pos) {
      Some(token) => (token.loc, describe_token(Some(token), self.source)),
      None => (self.source.len(), "EOF".to_string()),
    };
    Err(CompileError::parse_at(
      self.source,
      loc,
      format!("expected a number, but got \"{got}\""),
    ))
  }

  fn is_eof(&self) -> bool {
    matches!(self.peek().map(|token| token.kind), Some(TokenKind::Eof))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::tokenizer::tokenize;

  fn compile_str(input: &str) -> CompileResult<String> {
    compile(tokenize(input).unwrap(), input)
  }

  fn stream(input: &'static str) -> TokenStream<'static> {
    TokenStream::new(tokenize(input).unwrap(), input)
  }

  #[test]
  fn equal_does_not_advance_on_mismatch() {
    let mut stream = stream("+1");
    assert!(!stream.equal("-"));
    assert_eq!(stream.pos, 0);
    assert!(stream.equal("+"));
    assert_eq!(stream.pos, 1);
  }

  #[test]
  fn get_number_advances_exactly_once() {
    let mut stream = stream("12+34");
    assert_eq!(stream.get_number().unwrap(), 12);
    assert_eq!(stream.pos, 1);
    assert!(stream.get_number().is_err());
    assert_eq!(stream.pos, 1);
  }

  #[test]
  fn skip_names_the_expected_punctuator() {
    let mut stream = stream("1");
    stream.get_number().unwrap();
    let err = stream.skip("-").unwrap_err();
    assert!(matches!(err, CompileError::Parse { .. }));
    assert!(err.to_string().contains("expected \"-\""));
  }

  #[test]
  fn single_number_emits_no_arithmetic() {
    let asm = compile_str("0").unwrap();
    assert_eq!(
      asm,
      ".intel_syntax noprefix\n.global main\nmain:\n    mov rax, 0\n    ret\n"
    );
  }

  #[test]
  fn terms_emit_in_input_order() {
    let asm = compile_str("5+20-4").unwrap();
    let instructions: Vec<&str> = asm
      .lines()
      .filter(|line| line.starts_with("    "))
      .map(str::trim)
      .collect();
    assert_eq!(
      instructions,
      vec!["mov rax, 5", "add rax, 20", "sub rax, 4", "ret"]
    );
  }

  #[test]
  fn leading_operator_is_rejected() {
    let err = compile_str("+1").unwrap_err();
    assert!(matches!(err, CompileError::Parse { .. }));
    assert!(err.to_string().contains("expected a number"));
  }

  #[test]
  fn trailing_operator_is_rejected() {
    let err = compile_str("1+").unwrap_err();
    assert!(matches!(err, CompileError::Parse { .. }));
    assert!(err.to_string().contains("expected a number"));
  }

  #[test]
  fn consecutive_operators_are_rejected() {
    let err = compile_str("1++2").unwrap_err();
    assert!(matches!(err, CompileError::Parse { .. }));
    assert!(err.to_string().contains("expected a number"));

    let err = compile_str("1+-2").unwrap_err();
    assert!(matches!(err, CompileError::Parse { .. }));
  }

  #[test]
  fn empty_expression_is_rejected() {
    let err = compile_str("").unwrap_err();
    assert!(err.to_string().contains("expression is empty"));

    let err = compile_str("  \t ").unwrap_err();
    assert!(err.to_string().contains("expression is empty"));
  }
}
