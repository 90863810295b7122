//! Shared value and error types for the skills.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Numeric value produced by the calculator.
///
/// Integer arithmetic stays exact until an operation (true division, a
/// negative exponent, or a float operand) promotes the result to a float.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    pub fn is_zero(self) -> bool {
        match self {
            Number::Int(i) => i == 0,
            Number::Float(f) => f == 0.0,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{i}"),
            Number::Float(x) => write!(f, "{}", format_float(*x)),
        }
    }
}

/// Format a float so it always reads as a float: `5.0`, `0.5`, `1e+16`.
pub fn format_float(x: f64) -> String {
    let repr = format!("{x:?}");
    match repr.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => repr,
    }
}

/// Errors that can occur while running a skill.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SkillError {
    #[error("Invalid expression: {0}")]
    InvalidExpression(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("numeric overflow")]
    Overflow,

    #[error("math domain error: {0}")]
    Domain(String),

    #[error("Invalid level '{0}'. Use: info, warn, error, debug, or all")]
    InvalidLevel(String),
}

/// Convenience result type.
pub type SkillResult<T> = Result<T, SkillError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_display() {
        assert_eq!(Number::Int(100).to_string(), "100");
        assert_eq!(Number::Int(-4).to_string(), "-4");
    }

    #[test]
    fn test_float_display_keeps_fraction() {
        assert_eq!(Number::Float(5.0).to_string(), "5.0");
        assert_eq!(Number::Float(2.5).to_string(), "2.5");
        assert_eq!(Number::Float(0.1 + 0.2).to_string(), "0.30000000000000004");
    }

    #[test]
    fn test_float_display_exponent() {
        assert_eq!(format_float(1e16), "1e+16");
        assert_eq!(format_float(1.5e-7), "1.5e-07");
    }
}
