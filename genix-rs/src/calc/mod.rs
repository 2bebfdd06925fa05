//! Scientific expression calculator.
//!
//! Evaluation runs in three phases, each of which may reject the input:
//!
//! | Phase | Module | Output |
//! |-------|--------|--------|
//! | tokenize | [`lexer`] | infix [`Token`] stream |
//! | shunt | [`shunt`] | postfix [`Token`] stream |
//! | evaluate | [`eval`] | one `f64` |
//!
//! Supported syntax: decimal numbers, `pi`, `+ - * / ^`, postfix `!`,
//! parentheses, unary `+`/`-`, and `sin cos tan log sqrt`.  Trigonometric
//! functions take degrees; `log` is the natural logarithm.
//!
//! # Quick start
//!
//! ```rust
//! use genix::calc;
//!
//! assert_eq!(calc::evaluate("2+3*4").unwrap(), 14.0);
//! assert_eq!(calc::format_result(calc::evaluate("sqrt(2)^2").unwrap()), "2.0000");
//! assert!(calc::evaluate("1/0").is_err());
//! ```

pub mod error;
pub mod eval;
pub mod lexer;
pub mod repl;
pub mod shunt;
pub mod token;

use tracing::{debug, trace};

pub use error::{CalcError, ErrorKind};
pub use eval::eval_postfix;
pub use lexer::tokenize;
pub use shunt::to_postfix;
pub use token::Token;

/// Tokenize and shunt `source`, returning its postfix form.
pub fn compile(source: &str) -> error::Result<Vec<Token>> {
    let infix = tokenize(source)?;
    let postfix = to_postfix(&infix)?;
    trace!(
        infix = infix.len(),
        postfix = %token::render(&postfix),
        "compiled expression"
    );
    Ok(postfix)
}

/// Evaluate an expression.  The first failing phase's error is returned.
pub fn evaluate(source: &str) -> error::Result<f64> {
    let result = compile(source).and_then(|postfix| eval_postfix(&postfix));
    match &result {
        Ok(value) => debug!(source, value, "evaluated"),
        Err(e) => debug!(source, kind = ?e.kind(), error = %e, "evaluation failed"),
    }
    result
}

/// Render a result the way the calculator prints it: four decimal places.
pub fn format_result(value: f64) -> String {
    format!("{value:.4}")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
