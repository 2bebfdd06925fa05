//! Shunting-yard conversion from infix to postfix.
//!
//! Operator precedence (lowest → highest):
//!   `+ -`  →  `* /`  →  `^` (right)  →  `!` (postfix)  →  named functions
//!
//! The synthesized sign function `neg` has two forms. At the start of a group
//! (start of input, after `(`, or after another such sign) it negates
//! everything that follows up to the end of that group, so it is only released
//! by the closing paren of the group or by end of input. Right after a binary
//! operator it is an ordinary function applied to the next operand: the next
//! binary operator releases it, postfix `!` does not.

use super::error::{CalcError, Result};
use super::token::{Assoc, Function, Token};

/// Upper bound on the postfix output length.
pub const MAX_OUTPUT: usize = 128;
/// Upper bound on the operator stack depth.
pub const MAX_STACK: usize = 128;

fn too_complex() -> CalcError {
    CalcError::Capacity("Expression too complex.".into())
}

/// Binding power on the left side of an operator.
///
/// A stacked operator is popped when its right binding power exceeds the
/// incoming operator's left binding power.
fn left_bp(prec: u8, assoc: Assoc) -> u16 {
    2 * u16::from(prec) + u16::from(assoc == Assoc::Right)
}

fn right_bp(prec: u8, assoc: Assoc) -> u16 {
    2 * u16::from(prec) + u16::from(assoc == Assoc::Left)
}

/// An operator-stack entry.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Held {
    Tok(Token),
    /// `neg` that follows a binary operator.
    OperandSign,
}

impl Held {
    fn token(self) -> Token {
        match self {
            Held::Tok(tok) => tok,
            Held::OperandSign => Token::Function(Function::Neg),
        }
    }
}

/// Should `top` be moved to the output before `incoming` is pushed?
fn pops_before(top: &Held, incoming: &Token) -> bool {
    let Some((prec, assoc)) = incoming.operator_info() else { return false };
    match top {
        Held::OperandSign => matches!(incoming, Token::BinaryOp(_)),
        Held::Tok(Token::Function(func)) => !func.is_prefix_sign(),
        Held::Tok(tok) => match tok.operator_info() {
            Some((p, a)) => right_bp(p, a) > left_bp(prec, assoc),
            None => false,
        },
    }
}

struct Shunter {
    output: Vec<Token>,
    stack: Vec<Held>,
}

impl Shunter {
    fn new(capacity: usize) -> Self {
        Shunter {
            output: Vec::with_capacity(capacity.min(MAX_OUTPUT)),
            stack: Vec::new(),
        }
    }

    fn emit(&mut self, tok: Token) -> Result<()> {
        if self.output.len() >= MAX_OUTPUT {
            return Err(too_complex());
        }
        self.output.push(tok);
        Ok(())
    }

    fn push(&mut self, held: Held) -> Result<()> {
        if self.stack.len() >= MAX_STACK {
            return Err(too_complex());
        }
        self.stack.push(held);
        Ok(())
    }

    fn operator(&mut self, tok: Token) -> Result<()> {
        while let Some(top) = self.stack.last().copied() {
            if !pops_before(&top, &tok) {
                break;
            }
            self.stack.pop();
            self.emit(top.token())?;
        }
        self.push(Held::Tok(tok))
    }

    fn close_paren(&mut self) -> Result<()> {
        loop {
            match self.stack.pop() {
                None => return Err(CalcError::mismatched_parens()),
                Some(Held::Tok(Token::LParen)) => break,
                Some(top) => self.emit(top.token())?,
            }
        }
        // A function directly before the group owns it.
        let owner = match self.stack.last().copied() {
            Some(Held::Tok(Token::Function(func))) => !func.is_prefix_sign(),
            Some(Held::OperandSign) => true,
            _ => false,
        };
        if owner {
            if let Some(top) = self.stack.pop() {
                self.emit(top.token())?;
            }
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<Token>> {
        while let Some(top) = self.stack.pop() {
            if top.token().is_paren() {
                return Err(CalcError::mismatched_parens());
            }
            self.emit(top.token())?;
        }
        Ok(self.output)
    }
}

/// Convert an infix token stream into postfix order.
///
/// The result never contains [`Token::LParen`] or [`Token::RParen`].
pub fn to_postfix(infix: &[Token]) -> Result<Vec<Token>> {
    let mut sh = Shunter::new(infix.len());
    // Set while the previous token was a binary operator or an operand sign.
    let mut after_operator = false;

    for &tok in infix {
        let mut next_after_operator = false;
        match tok {
            Token::Number(_) => sh.emit(tok)?,
            Token::Function(func) if func.is_prefix_sign() && after_operator => {
                sh.push(Held::OperandSign)?;
                next_after_operator = true;
            }
            Token::Function(_) | Token::LParen => sh.push(Held::Tok(tok))?,
            Token::BinaryOp(_) => {
                sh.operator(tok)?;
                next_after_operator = true;
            }
            Token::PostfixOp(_) => sh.operator(tok)?,
            Token::RParen => sh.close_paren()?,
        }
        after_operator = next_after_operator;
    }

    sh.finish()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
