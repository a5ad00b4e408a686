//! `calculator` tool: evaluate an arithmetic expression.
//!
//! # Grammar
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/' | '%') unary)*
//! unary   := ('-' | '+') unary | power
//! power   := primary (('^' | '**') unary)?
//! primary := number | '(' expr ')'
//! ```
//!
//! `^` is right-associative and binds tighter than unary minus, so
//! `-2^2` is `-4`. Integral results are printed without a fractional part.
//! Nesting (parentheses, unary signs, exponent chains) is capped at
//! [`MAX_DEPTH`] levels.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use toolbox_domain::{
    SchemaConverter, SyncFnHandler, ToolArguments, ToolDefinition, ToolError, ToolParameter,
};

pub const CALCULATOR: &str = "calculator";

/// Deepest nesting [`evaluate`] accepts.
pub const MAX_DEPTH: usize = 256;

/// Errors from [`evaluate`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error("empty expression")]
    Empty,

    #[error("unexpected character '{0}' at position {1}")]
    UnexpectedChar(char, usize),

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("result is not a finite number")]
    NotFinite,

    #[error("expression nested deeper than {0} levels")]
    TooDeep(usize),
}

pub fn calculator_definition() -> ToolDefinition {
    ToolDefinition::new(
        CALCULATOR,
        "Evaluate an arithmetic expression (+, -, *, /, %, ^, parentheses)",
        &SchemaConverter::from_parameters(&[ToolParameter::new(
            "expression",
            "Arithmetic expression, e.g. (2 + 3) * 4",
            true,
        )]),
        Arc::new(SyncFnHandler::new(|args: &ToolArguments| {
            let expression = args.get_str_or_first("expression").ok_or_else(|| {
                ToolError::invalid_argument("Missing required argument: expression")
            })?;
            let value = evaluate(&expression)
                .map_err(|e| ToolError::execution_failed(e.to_string()))?;
            Ok(Value::String(format!("Result: {}", format_number(value))))
        })),
    )
}

/// Evaluate an arithmetic expression.
pub fn evaluate(expression: &str) -> Result<f64, CalcError> {
    let mut parser = Parser::new(expression);
    parser.skip_whitespace();
    if parser.peek().is_none() {
        return Err(CalcError::Empty);
    }

    let value = parser.expr()?;
    parser.skip_whitespace();
    if let Some((pos, c)) = parser.peek() {
        return Err(CalcError::UnexpectedChar(c, pos));
    }
    if !value.is_finite() {
        return Err(CalcError::NotFinite);
    }
    Ok(value)
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

struct Parser<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
            depth: 0,
        }
    }

    fn peek(&mut self) -> Option<(usize, char)> {
        self.chars.peek().copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|(_, c)| c.is_whitespace()) {
            self.chars.next();
        }
    }

    /// Next non-whitespace character, without consuming it.
    fn next_token(&mut self) -> Option<char> {
        self.skip_whitespace();
        self.peek().map(|(_, c)| c)
    }

    fn expr(&mut self) -> Result<f64, CalcError> {
        let mut value = self.term()?;
        loop {
            match self.next_token() {
                Some('+') => {
                    self.chars.next();
                    value += self.term()?;
                }
                Some('-') => {
                    self.chars.next();
                    value -= self.term()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn term(&mut self) -> Result<f64, CalcError> {
        let mut value = self.unary()?;
        loop {
            match self.next_token() {
                Some('*') if !self.is_double_star() => {
                    self.chars.next();
                    value *= self.unary()?;
                }
                Some('/') => {
                    self.chars.next();
                    let rhs = self.unary()?;
                    if rhs == 0.0 {
                        return Err(CalcError::DivisionByZero);
                    }
                    value /= rhs;
                }
                Some('%') => {
                    self.chars.next();
                    let rhs = self.unary()?;
                    if rhs == 0.0 {
                        return Err(CalcError::DivisionByZero);
                    }
                    value = value.rem_euclid(rhs);
                }
                _ => return Ok(value),
            }
        }
    }

    // Every recursive cycle of the grammar passes through `unary`, so the
    // depth is tracked here.
    fn unary(&mut self) -> Result<f64, CalcError> {
        if self.depth >= MAX_DEPTH {
            return Err(CalcError::TooDeep(MAX_DEPTH));
        }
        self.depth += 1;
        let value = self.signed();
        self.depth -= 1;
        value
    }

    fn signed(&mut self) -> Result<f64, CalcError> {
        match self.next_token() {
            Some('-') => {
                self.chars.next();
                Ok(-self.unary()?)
            }
            Some('+') => {
                self.chars.next();
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<f64, CalcError> {
        let base = self.primary()?;
        match self.next_token() {
            Some('^') => {
                self.chars.next();
                Ok(base.powf(self.unary()?))
            }
            Some('*') if self.is_double_star() => {
                self.chars.next();
                self.chars.next();
                Ok(base.powf(self.unary()?))
            }
            _ => Ok(base),
        }
    }

    fn primary(&mut self) -> Result<f64, CalcError> {
        match self.next_token() {
            Some('(') => {
                self.chars.next();
                let value = self.expr()?;
                match self.next_token() {
                    Some(')') => {
                        self.chars.next();
                        Ok(value)
                    }
                    Some(c) => Err(CalcError::UnexpectedChar(c, self.position())),
                    None => Err(CalcError::UnexpectedEnd),
                }
            }
            Some(c) if c.is_ascii_digit() || c == '.' => self.number(),
            Some(c) => Err(CalcError::UnexpectedChar(c, self.position())),
            None => Err(CalcError::UnexpectedEnd),
        }
    }

    fn number(&mut self) -> Result<f64, CalcError> {
        let start = self.position();
        let mut end = start;
        while let Some((pos, c)) = self.peek() {
            if c.is_ascii_digit() || c == '.' {
                end = pos + c.len_utf8();
                self.chars.next();
            } else {
                break;
            }
        }
        let literal = &self.input[start..end];
        literal
            .parse::<f64>()
            .map_err(|_| CalcError::InvalidNumber(literal.to_string()))
    }

    fn position(&mut self) -> usize {
        self.peek().map(|(pos, _)| pos).unwrap_or(self.input.len())
    }

    /// Whether the cursor sits on `**`.
    fn is_double_star(&mut self) -> bool {
        let pos = self.position();
        self.input[pos..].starts_with("**")
    }
}
