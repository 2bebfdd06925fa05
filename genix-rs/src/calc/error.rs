//! Calculator error type.

use thiserror::Error;

/// Which phase of evaluation rejected the expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lex,
    Parse,
    Domain,
    Arity,
    Capacity,
}

/// A failed evaluation.  `Display` is the user-facing message.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    /// Un-tokenizable character, malformed number or unknown identifier.
    #[error("{message}")]
    Lex { message: String, position: usize },

    /// Mismatched parentheses, or a postfix stream that does not reduce to a
    /// single value.
    #[error("{0}")]
    Parse(String),

    /// Operand outside the operator's domain.
    #[error("{0}")]
    Domain(String),

    /// Operator or function applied with too few operands.
    #[error("{0}")]
    Arity(String),

    /// A token, output or stack bound was exceeded.
    #[error("{0}")]
    Capacity(String),
}

impl CalcError {
    pub(crate) fn lex(position: usize, message: impl Into<String>) -> Self {
        CalcError::Lex { message: message.into(), position }
    }

    pub(crate) fn mismatched_parens() -> Self {
        CalcError::Parse("Mismatched parentheses.".into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CalcError::Lex { .. } => ErrorKind::Lex,
            CalcError::Parse(_) => ErrorKind::Parse,
            CalcError::Domain(_) => ErrorKind::Domain,
            CalcError::Arity(_) => ErrorKind::Arity,
            CalcError::Capacity(_) => ErrorKind::Capacity,
        }
    }

    /// Byte offset into the source, for lexical errors.
    pub fn position(&self) -> Option<usize> {
        match self {
            CalcError::Lex { position, .. } => Some(*position),
            _ => None,
        }
    }
}

/// Result type alias for calculator operations.
pub type Result<T> = std::result::Result<T, CalcError>;
