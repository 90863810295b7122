//! Safe arithmetic evaluation.
//!
//! Expressions may contain only digits, whitespace, `+ - * / . ( ) %`.
//! Operators follow the usual precedence: `+ -`, then `* / // %`, then unary
//! signs, then `**` (right-associative, binding tighter than a unary sign on
//! its left, so `-2 ** 2` is `-4`).

use crate::types::{Number, SkillError, SkillResult};

/// Maximum nesting of parentheses and unary signs.
const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Num(Number),
    Plus,
    Minus,
    Star,
    DoubleStar,
    Slash,
    DoubleSlash,
    Percent,
    LParen,
    RParen,
}

/// Evaluate an arithmetic expression.
pub fn evaluate(expression: &str) -> SkillResult<Number> {
    if let Some(c) = expression
        .chars()
        .find(|c| !(c.is_ascii_digit() || c.is_whitespace() || "+-*/.()%".contains(*c)))
    {
        return Err(SkillError::InvalidExpression(format!(
            "{expression} (unexpected character '{c}')"
        )));
    }

    let tokens = tokenize(expression)?;
    if tokens.is_empty() {
        return Err(SkillError::InvalidExpression("empty expression".to_string()));
    }

    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;
    if parser.pos != tokens.len() {
        return Err(SkillError::InvalidExpression(format!(
            "{expression} (unexpected trailing input)"
        )));
    }

    if let Number::Float(f) = value {
        if !f.is_finite() {
            return Err(SkillError::Overflow);
        }
    }
    Ok(value)
}

fn tokenize(input: &str) -> SkillResult<Vec<Token>> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        match c {
            b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c => {
                i += 1;
            }
            b'0'..=b'9' | b'.' => {
                let start = i;
                while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
                    i += 1;
                }
                tokens.push(Token::Num(parse_number(&input[start..i])?));
            }
            b'+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            b'-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            b'*' if bytes.get(i + 1) == Some(&b'*') => {
                tokens.push(Token::DoubleStar);
                i += 2;
            }
            b'*' => {
                tokens.push(Token::Star);
                i += 1;
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                tokens.push(Token::DoubleSlash);
                i += 2;
            }
            b'/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            b'%' => {
                tokens.push(Token::Percent);
                i += 1;
            }
            b'(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            b')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            // Non-ASCII whitespace passes the character check but is not a token.
            _ => {
                let rest = &input[i..];
                let ch = rest.chars().next().unwrap_or(' ');
                if ch.is_whitespace() {
                    i += ch.len_utf8();
                } else {
                    return Err(SkillError::InvalidExpression(format!(
                        "unexpected character '{ch}'"
                    )));
                }
            }
        }
    }

    Ok(tokens)
}

fn parse_number(literal: &str) -> SkillResult<Number> {
    if literal == "." || literal.matches('.').count() > 1 {
        return Err(SkillError::InvalidExpression(format!(
            "malformed number '{literal}'"
        )));
    }

    if literal.contains('.') {
        return literal
            .parse::<f64>()
            .map(Number::Float)
            .map_err(|e| SkillError::InvalidExpression(format!("malformed number '{literal}': {e}")));
    }

    if literal.len() > 1 && literal.starts_with('0') && literal.bytes().any(|b| b != b'0') {
        return Err(SkillError::InvalidExpression(format!(
            "leading zeros are not permitted in '{literal}'"
        )));
    }

    literal
        .parse::<i64>()
        .map(Number::Int)
        .map_err(|_| SkillError::Overflow)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn descend(&mut self) -> SkillResult<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(SkillError::InvalidExpression(
                "expression is nested too deeply".to_string(),
            ));
        }
        Ok(())
    }

    fn expr(&mut self) -> SkillResult<Number> {
        let mut lhs = self.term()?;
        while let Some(op @ (Token::Plus | Token::Minus)) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            lhs = match op {
                Token::Plus => add(lhs, rhs)?,
                _ => sub(lhs, rhs)?,
            };
        }
        Ok(lhs)
    }

    fn term(&mut self) -> SkillResult<Number> {
        let mut lhs = self.factor()?;
        while let Some(op @ (Token::Star | Token::Slash | Token::DoubleSlash | Token::Percent)) =
            self.peek()
        {
            self.pos += 1;
            let rhs = self.factor()?;
            lhs = match op {
                Token::Star => mul(lhs, rhs)?,
                Token::Slash => true_div(lhs, rhs)?,
                Token::DoubleSlash => floor_div(lhs, rhs)?,
                _ => modulo(lhs, rhs)?,
            };
        }
        Ok(lhs)
    }

    fn factor(&mut self) -> SkillResult<Number> {
        match self.peek() {
            Some(Token::Plus) => {
                self.pos += 1;
                self.descend()?;
                let value = self.factor()?;
                self.depth -= 1;
                Ok(value)
            }
            Some(Token::Minus) => {
                self.pos += 1;
                self.descend()?;
                let value = self.factor()?;
                self.depth -= 1;
                negate(value)
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> SkillResult<Number> {
        let base = self.atom()?;
        if self.peek() == Some(Token::DoubleStar) {
            self.pos += 1;
            self.descend()?;
            let exponent = self.factor()?;
            self.depth -= 1;
            return pow(base, exponent);
        }
        Ok(base)
    }

    fn atom(&mut self) -> SkillResult<Number> {
        match self.advance() {
            Some(Token::Num(n)) => Ok(n),
            Some(Token::LParen) => {
                self.descend()?;
                let value = self.expr()?;
                self.depth -= 1;
                match self.advance() {
                    Some(Token::RParen) => Ok(value),
                    _ => Err(SkillError::InvalidExpression(
                        "missing closing parenthesis".to_string(),
                    )),
                }
            }
            Some(token) => Err(SkillError::InvalidExpression(format!(
                "unexpected operator {token:?}"
            ))),
            None => Err(SkillError::InvalidExpression(
                "unexpected end of expression".to_string(),
            )),
        }
    }
}

fn add(a: Number, b: Number) -> SkillResult<Number> {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => x.checked_add(y).map(Number::Int).ok_or(SkillError::Overflow),
        _ => Ok(Number::Float(a.as_f64() + b.as_f64())),
    }
}

fn sub(a: Number, b: Number) -> SkillResult<Number> {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => x.checked_sub(y).map(Number::Int).ok_or(SkillError::Overflow),
        _ => Ok(Number::Float(a.as_f64() - b.as_f64())),
    }
}

fn mul(a: Number, b: Number) -> SkillResult<Number> {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => x.checked_mul(y).map(Number::Int).ok_or(SkillError::Overflow),
        _ => Ok(Number::Float(a.as_f64() * b.as_f64())),
    }
}

fn true_div(a: Number, b: Number) -> SkillResult<Number> {
    if b.is_zero() {
        return Err(SkillError::DivisionByZero);
    }
    Ok(Number::Float(a.as_f64() / b.as_f64()))
}

fn floor_div(a: Number, b: Number) -> SkillResult<Number> {
    if b.is_zero() {
        return Err(SkillError::DivisionByZero);
    }
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => {
            let q = x.checked_div(y).ok_or(SkillError::Overflow)?;
            if x % y != 0 && ((x < 0) != (y < 0)) {
                Ok(Number::Int(q - 1))
            } else {
                Ok(Number::Int(q))
            }
        }
        _ => Ok(Number::Float((a.as_f64() / b.as_f64()).floor())),
    }
}

/// Remainder taking the sign of the divisor.
fn modulo(a: Number, b: Number) -> SkillResult<Number> {
    if b.is_zero() {
        return Err(SkillError::DivisionByZero);
    }
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => {
            let r = x.checked_rem(y).ok_or(SkillError::Overflow)?;
            if r != 0 && ((r < 0) != (y < 0)) {
                Ok(Number::Int(r + y))
            } else {
                Ok(Number::Int(r))
            }
        }
        _ => {
            let (x, y) = (a.as_f64(), b.as_f64());
            let r = x % y;
            if r != 0.0 && ((r < 0.0) != (y < 0.0)) {
                Ok(Number::Float(r + y))
            } else {
                Ok(Number::Float(0.0_f64.copysign(y) + r))
            }
        }
    }
}

fn negate(a: Number) -> SkillResult<Number> {
    match a {
        Number::Int(x) => x.checked_neg().map(Number::Int).ok_or(SkillError::Overflow),
        Number::Float(f) => Ok(Number::Float(-f)),
    }
}

fn pow(base: Number, exponent: Number) -> SkillResult<Number> {
    if base.is_zero() && exponent.as_f64() < 0.0 {
        return Err(SkillError::DivisionByZero);
    }
    match (base, exponent) {
        (Number::Int(b), Number::Int(e)) if e >= 0 => match (b, u32::try_from(e)) {
            (_, Ok(e)) => b.checked_pow(e).map(Number::Int).ok_or(SkillError::Overflow),
            // Exponents past u32 only stay finite for these bases.
            (0 | 1, Err(_)) => Ok(Number::Int(b)),
            (-1, Err(_)) => Ok(Number::Int(if e % 2 == 0 { 1 } else { -1 })),
            (_, Err(_)) => Err(SkillError::Overflow),
        },
        _ => {
            let (b, e) = (base.as_f64(), exponent.as_f64());
            if b < 0.0 && e.fract() != 0.0 {
                return Err(SkillError::Domain(format!(
                    "negative base {base} raised to fractional power {exponent}"
                )));
            }
            let value = b.powf(e);
            if value.is_finite() {
                Ok(Number::Float(value))
            } else {
                Err(SkillError::Overflow)
            }
        }
    }
}
