//! Calculator lexer.
//!
//! Turns source text into an infix token stream.  A `+` or `-` is classified
//! as unary or binary from the token emitted just before it: after nothing,
//! an operator, `(` or a function name it is unary.  Unary `-` becomes the
//! synthesized [`Function::Neg`]; unary `+` is dropped.

use std::f64::consts::PI;

use super::error::{CalcError, Result};
use super::token::{BinaryOp, Function, PostfixOp, Token};

/// Upper bound on the number of tokens in one expression.
pub const MAX_TOKENS: usize = 128;

struct Lexer<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Lexer {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            tokens: Vec::new(),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn push(&mut self, tok: Token) -> Result<()> {
        if self.tokens.len() >= MAX_TOKENS {
            return Err(CalcError::Capacity("Expression too long.".into()));
        }
        self.tokens.push(tok);
        Ok(())
    }

    /// Unary context: nothing emitted yet, or the last token cannot end an
    /// operand.
    fn in_unary_context(&self) -> bool {
        matches!(
            self.tokens.last(),
            None | Some(Token::BinaryOp(_) | Token::LParen | Token::Function(_))
        )
    }

    fn skip_digits(&mut self) -> usize {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        self.pos - start
    }

    /// Read `digits [. digits] [(e|E) [+|-] digits]`.
    fn read_number(&mut self) -> Result<Token> {
        let start = self.pos;
        let mut digits = self.skip_digits();
        if self.peek() == Some(b'.') {
            self.pos += 1;
            digits += self.skip_digits();
        }
        if digits == 0 {
            return Err(CalcError::lex(
                start,
                format!("Invalid number near position {start}."),
            ));
        }

        // The exponent is only taken when digits actually follow it, so `2e`
        // lexes as `2` followed by the identifier `e`.
        if matches!(self.peek(), Some(b'e' | b'E')) {
            let sign = usize::from(matches!(self.peek_at(1), Some(b'+' | b'-')));
            if self.peek_at(1 + sign).is_some_and(|b| b.is_ascii_digit()) {
                self.pos += 1 + sign;
                self.skip_digits();
            }
        }

        let text = &self.src[start..self.pos];
        let value: f64 = text.parse().map_err(|_| {
            CalcError::lex(start, format!("Invalid number near position {start}."))
        })?;
        if !value.is_finite() {
            return Err(CalcError::lex(
                start,
                format!("Number out of range near position {start}."),
            ));
        }
        Ok(Token::Number(value))
    }

    fn read_ident(&mut self) -> Result<Token> {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_alphabetic()) {
            self.pos += 1;
        }
        let word = self.src[start..self.pos].to_ascii_lowercase();

        if word == "pi" {
            return Ok(Token::Number(PI));
        }
        match Function::from_name(&word) {
            Some(func) => Ok(Token::Function(func)),
            None => Err(CalcError::lex(
                start,
                format!("Unknown token '{word}' near position {start}."),
            )),
        }
    }

    fn invalid_char(&self) -> CalcError {
        let ch = self.src[self.pos..].chars().next().unwrap_or('?');
        CalcError::lex(
            self.pos,
            format!("Invalid character '{ch}' at position {}.", self.pos),
        )
    }

    fn tokenize(mut self) -> Result<Vec<Token>> {
        loop {
            self.skip_ws();
            let Some(ch) = self.peek() else { break };

            match ch {
                b'0'..=b'9' | b'.' => {
                    let tok = self.read_number()?;
                    self.push(tok)?;
                }
                b'a'..=b'z' | b'A'..=b'Z' => {
                    let tok = self.read_ident()?;
                    self.push(tok)?;
                }
                b'+' | b'-' => {
                    let unary = self.in_unary_context();
                    self.pos += 1;
                    match (unary, ch) {
                        (true, b'-') => self.push(Token::Function(Function::Neg))?,
                        (true, _) => {} // unary plus is a no-op
                        (false, b'-') => self.push(Token::BinaryOp(BinaryOp::Sub))?,
                        (false, _) => self.push(Token::BinaryOp(BinaryOp::Add))?,
                    }
                }
                b'*' | b'/' | b'^' => {
                    self.pos += 1;
                    if let Some(op) = BinaryOp::from_byte(ch) {
                        self.push(Token::BinaryOp(op))?;
                    }
                }
                b'!' => {
                    self.pos += 1;
                    self.push(Token::PostfixOp(PostfixOp::Factorial))?;
                }
                b'(' => {
                    self.pos += 1;
                    self.push(Token::LParen)?;
                }
                b')' => {
                    self.pos += 1;
                    self.push(Token::RParen)?;
                }
                _ => return Err(self.invalid_char()),
            }
        }
        Ok(self.tokens)
    }
}

/// Tokenize `src` into an infix stream.
pub fn tokenize(src: &str) -> Result<Vec<Token>> {
    Lexer::new(src).tokenize()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
