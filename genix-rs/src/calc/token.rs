//! Calculator tokens and the operator table.
//!
//! A [`Token`] is a sum type: each variant carries only the payload that
//! applies to it, so an operator token can never be read as a number.

use std::fmt;

// ── Assoc ─────────────────────────────────────────────────────────────────────

/// Grouping of a chain of equal-precedence operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    /// `a-b-c` = `(a-b)-c`
    Left,
    /// `a^b^c` = `a^(b^c)`
    Right,
}

// ── BinaryOp ──────────────────────────────────────────────────────────────────

/// Infix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOp {
    /// Map a source byte to its operator, if any.
    pub fn from_byte(b: u8) -> Option<Self> {
        Some(match b {
            b'+' => BinaryOp::Add,
            b'-' => BinaryOp::Sub,
            b'*' => BinaryOp::Mul,
            b'/' => BinaryOp::Div,
            b'^' => BinaryOp::Pow,
            _ => return None,
        })
    }

    pub fn symbol(self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Sub => '-',
            BinaryOp::Mul => '*',
            BinaryOp::Div => '/',
            BinaryOp::Pow => '^',
        }
    }

    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Add | BinaryOp::Sub => 1,
            BinaryOp::Mul | BinaryOp::Div => 2,
            BinaryOp::Pow => 3,
        }
    }

    pub fn assoc(self) -> Assoc {
        match self {
            BinaryOp::Pow => Assoc::Right,
            _ => Assoc::Left,
        }
    }
}

// ── PostfixOp ─────────────────────────────────────────────────────────────────

/// Operators written after their single operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostfixOp {
    /// `n!`
    Factorial,
}

impl PostfixOp {
    pub fn symbol(self) -> char {
        match self {
            PostfixOp::Factorial => '!',
        }
    }

    /// Ranks above `^` so that `3!^2` is `(3!)^2`.
    pub fn precedence(self) -> u8 {
        4
    }

    pub fn assoc(self) -> Assoc {
        Assoc::Right
    }
}

// ── Function ──────────────────────────────────────────────────────────────────

/// One-argument functions.
///
/// [`Function::Neg`] is never spelled in source; the lexer synthesizes it for
/// a `-` in unary position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Log,
    Sqrt,
    Neg,
}

impl Function {
    /// Look up a named function by its (lowercased) identifier.
    ///
    /// `neg` is deliberately absent: it cannot be called by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "sin" => Function::Sin,
            "cos" => Function::Cos,
            "tan" => Function::Tan,
            "log" => Function::Log,
            "sqrt" => Function::Sqrt,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Log => "log",
            Function::Sqrt => "sqrt",
            Function::Neg => "neg",
        }
    }

    /// `true` for the synthesized sign, which the shunter places by context
    /// rather than by its parenthesised argument.
    pub fn is_prefix_sign(self) -> bool {
        matches!(self, Function::Neg)
    }
}

// ── Token ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    /// Always finite.
    Number(f64),
    BinaryOp(BinaryOp),
    PostfixOp(PostfixOp),
    Function(Function),
    LParen,
    RParen,
}

impl Token {
    pub fn is_paren(&self) -> bool {
        matches!(self, Token::LParen | Token::RParen)
    }

    /// Precedence and associativity for operator tokens; `None` otherwise.
    pub fn operator_info(&self) -> Option<(u8, Assoc)> {
        match self {
            Token::BinaryOp(op) => Some((op.precedence(), op.assoc())),
            Token::PostfixOp(op) => Some((op.precedence(), op.assoc())),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{n}"),
            Token::BinaryOp(op) => write!(f, "{}", op.symbol()),
            Token::PostfixOp(op) => write!(f, "{}", op.symbol()),
            Token::Function(func) => f.write_str(func.name()),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
        }
    }
}

/// Render a token stream as space-separated lexemes (`3 ! neg`).
pub fn render(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_op_table() {
        assert_eq!(BinaryOp::Add.precedence(), BinaryOp::Sub.precedence());
        assert!(BinaryOp::Mul.precedence() > BinaryOp::Add.precedence());
        assert!(BinaryOp::Pow.precedence() > BinaryOp::Div.precedence());
        assert_eq!(BinaryOp::Pow.assoc(), Assoc::Right);
        assert_eq!(BinaryOp::Sub.assoc(), Assoc::Left);
    }

    #[test]
    fn factorial_outranks_power() {
        assert!(PostfixOp::Factorial.precedence() > BinaryOp::Pow.precedence());
    }

    #[test]
    fn from_byte_covers_all_symbols() {
        for op in [BinaryOp::Add, BinaryOp::Sub, BinaryOp::Mul, BinaryOp::Div, BinaryOp::Pow] {
            assert_eq!(BinaryOp::from_byte(op.symbol() as u8), Some(op));
        }
        assert_eq!(BinaryOp::from_byte(b'%'), None);
    }

    #[test]
    fn neg_is_not_callable_by_name() {
        assert_eq!(Function::from_name("neg"), None);
        assert_eq!(Function::from_name("sqrt"), Some(Function::Sqrt));
    }

    #[test]
    fn render_postfix() {
        let toks = [
            Token::Number(3.0),
            Token::PostfixOp(PostfixOp::Factorial),
            Token::Function(Function::Neg),
        ];
        assert_eq!(render(&toks), "3 ! neg");
    }
}
