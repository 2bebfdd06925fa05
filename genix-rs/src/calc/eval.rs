//! Postfix evaluator.

use std::f64::consts::PI;

use super::error::{CalcError, Result};
use super::token::{BinaryOp, Function, PostfixOp, Token};

/// Upper bound on the value stack depth.
pub const MAX_VALUES: usize = 128;

/// Divisors and cosines smaller than this are treated as zero.
pub const ZERO_EPSILON: f64 = 1e-12;

/// Allowed distance from an integer for a factorial operand.
pub const INTEGER_EPSILON: f64 = 1e-6;

/// Largest `n` whose `n!` is exactly representable in an `f64`.
pub const MAX_FACTORIAL: f64 = 20.0;

fn degrees_to_radians(deg: f64) -> f64 {
    deg * (PI / 180.0)
}

fn binary(op: BinaryOp, lhs: f64, rhs: f64) -> Result<f64> {
    Ok(match op {
        BinaryOp::Add => lhs + rhs,
        BinaryOp::Sub => lhs - rhs,
        BinaryOp::Mul => lhs * rhs,
        BinaryOp::Div => {
            if rhs.abs() < ZERO_EPSILON {
                return Err(CalcError::Domain("Division by zero.".into()));
            }
            lhs / rhs
        }
        BinaryOp::Pow => lhs.powf(rhs),
    })
}

/// `n!` for integral `0 <= n <= 20`.
pub fn factorial(n: f64) -> Result<f64> {
    let invalid = || CalcError::Domain("Invalid input for factorial.".into());
    if !n.is_finite() || n < 0.0 {
        return Err(invalid());
    }
    let rounded = (n + 0.5).floor();
    if (n - rounded).abs() > INTEGER_EPSILON || rounded > MAX_FACTORIAL {
        return Err(invalid());
    }
    Ok((2..=rounded as u32).fold(1.0, |acc, i| acc * f64::from(i)))
}

fn function(func: Function, x: f64) -> Result<f64> {
    Ok(match func {
        Function::Sin => degrees_to_radians(x).sin(),
        Function::Cos => degrees_to_radians(x).cos(),
        Function::Tan => {
            let rad = degrees_to_radians(x);
            if rad.cos().abs() < ZERO_EPSILON {
                return Err(CalcError::Domain(format!(
                    "Undefined tangent for {x:.4} degrees."
                )));
            }
            rad.tan()
        }
        Function::Log => {
            if x <= 0.0 {
                return Err(CalcError::Domain("Logarithm domain error.".into()));
            }
            x.ln()
        }
        Function::Sqrt => {
            if x < 0.0 {
                return Err(CalcError::Domain("Square root of negative number.".into()));
            }
            x.sqrt()
        }
        Function::Neg => -x,
    })
}

/// Evaluate a postfix stream to a single value.
pub fn eval_postfix(postfix: &[Token]) -> Result<f64> {
    let mut stack: Vec<f64> = Vec::with_capacity(postfix.len().min(MAX_VALUES));

    for tok in postfix {
        match *tok {
            Token::Number(n) => {
                if stack.len() >= MAX_VALUES {
                    return Err(CalcError::Capacity("Evaluation stack overflow.".into()));
                }
                stack.push(n);
            }
            Token::BinaryOp(op) => {
                let (Some(rhs), Some(lhs)) = (stack.pop(), stack.pop()) else {
                    return Err(CalcError::Arity(format!(
                        "Operator '{}' missing operands.",
                        op.symbol()
                    )));
                };
                stack.push(binary(op, lhs, rhs)?);
            }
            Token::PostfixOp(PostfixOp::Factorial) => {
                let top = stack
                    .last_mut()
                    .ok_or_else(|| CalcError::Arity("Factorial requires an operand.".into()))?;
                *top = factorial(*top)?;
            }
            Token::Function(func) => {
                let top = stack.last_mut().ok_or_else(|| {
                    CalcError::Arity(format!("Function '{}' requires an operand.", func.name()))
                })?;
                *top = function(func, *top)?;
            }
            Token::LParen | Token::RParen => {
                return Err(CalcError::Parse("Invalid expression.".into()));
            }
        }
    }

    match stack.as_slice() {
        [value] if value.is_finite() => Ok(*value),
        [_] => Err(CalcError::Domain("Result is not a finite number.".into())),
        _ => Err(CalcError::Parse("Invalid expression.".into())),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::error::ErrorKind;

    fn num(n: f64) -> Token {
        Token::Number(n)
    }

    fn op(b: u8) -> Token {
        Token::BinaryOp(BinaryOp::from_byte(b).unwrap())
    }

    const FACT: Token = Token::PostfixOp(PostfixOp::Factorial);

    #[test]
    fn arithmetic() {
        assert_eq!(eval_postfix(&[num(2.0), num(3.0), num(4.0), op(b'*'), op(b'+')]), Ok(14.0));
        assert_eq!(eval_postfix(&[num(8.0), num(3.0), op(b'-')]), Ok(5.0));
        assert_eq!(eval_postfix(&[num(9.0), num(2.0), op(b'/')]), Ok(4.5));
        assert_eq!(eval_postfix(&[num(2.0), num(10.0), op(b'^')]), Ok(1024.0));
    }

    #[test]
    fn division_by_near_zero() {
        let err = eval_postfix(&[num(1.0), num(1e-13), op(b'/')]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Domain);
        assert_eq!(err.to_string(), "Division by zero.");
        assert!(eval_postfix(&[num(1.0), num(1e-11), op(b'/')]).is_ok());
    }

    #[test]
    fn missing_operands() {
        let err = eval_postfix(&[num(2.0), op(b'+')]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Arity);
        assert_eq!(err.to_string(), "Operator '+' missing operands.");
    }

    #[test]
    fn factorial_values() {
        assert_eq!(factorial(0.0), Ok(1.0));
        assert_eq!(factorial(1.0), Ok(1.0));
        assert_eq!(factorial(5.0), Ok(120.0));
        assert_eq!(factorial(20.0), Ok(2_432_902_008_176_640_000.0));
        assert_eq!(factorial(4.0000001), Ok(24.0));
    }

    #[test]
    fn factorial_domain() {
        for bad in [-1.0, 2.5, 21.0, 3.001, f64::NAN, f64::INFINITY] {
            let err = factorial(bad).unwrap_err();
            assert_eq!(err.to_string(), "Invalid input for factorial.");
        }
    }

    #[test]
    fn factorial_without_operand() {
        let err = eval_postfix(&[FACT]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Arity);
    }

    #[test]
    fn trig_uses_degrees() {
        let sin30 = eval_postfix(&[num(30.0), Token::Function(Function::Sin)]).unwrap();
        assert!((sin30 - 0.5).abs() < 1e-12);
        let cos60 = eval_postfix(&[num(60.0), Token::Function(Function::Cos)]).unwrap();
        assert!((cos60 - 0.5).abs() < 1e-12);
        let tan45 = eval_postfix(&[num(45.0), Token::Function(Function::Tan)]).unwrap();
        assert!((tan45 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn tangent_undefined() {
        let err = eval_postfix(&[num(90.0), Token::Function(Function::Tan)]).unwrap_err();
        assert_eq!(err.to_string(), "Undefined tangent for 90.0000 degrees.");
        let err = eval_postfix(&[num(-270.0), Token::Function(Function::Tan)]).unwrap_err();
        assert_eq!(err.to_string(), "Undefined tangent for -270.0000 degrees.");
    }

    #[test]
    fn log_and_sqrt_domains() {
        let log0 = eval_postfix(&[num(0.0), Token::Function(Function::Log)]).unwrap_err();
        assert_eq!(log0.to_string(), "Logarithm domain error.");
        let sqrt_neg = eval_postfix(&[num(-4.0), Token::Function(Function::Sqrt)]).unwrap_err();
        assert_eq!(sqrt_neg.to_string(), "Square root of negative number.");
        assert_eq!(eval_postfix(&[num(16.0), Token::Function(Function::Sqrt)]), Ok(4.0));
    }

    #[test]
    fn function_without_operand() {
        let err = eval_postfix(&[Token::Function(Function::Neg)]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Arity);
        assert_eq!(err.to_string(), "Function 'neg' requires an operand.");
    }

    #[test]
    fn leftover_values_are_invalid() {
        let err = eval_postfix(&[num(1.0), num(2.0)]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert_eq!(err.to_string(), "Invalid expression.");
        assert_eq!(eval_postfix(&[]).unwrap_err().kind(), ErrorKind::Parse);
    }

    #[test]
    fn non_finite_result_is_rejected() {
        let err = eval_postfix(&[num(10.0), num(400.0), op(b'^')]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Domain);
    }

    #[test]
    fn value_stack_capacity() {
        let err = eval_postfix(&vec![num(1.0); MAX_VALUES + 1]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Capacity);
    }
}
