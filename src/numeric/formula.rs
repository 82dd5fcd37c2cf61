//! Custom formula parser and evaluator
//!
//! Grammar (whitespace ignored):
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := unary (('*' | '/') unary)*
//! unary  := '-' unary | power
//! power  := atom ('^' unary)?          right-associative
//! atom   := integer | 'n' | '(' expr ')'
//! ```
//!
//! Evaluation is exact over `BigInt`. A division that leaves a remainder is an
//! error rather than a silent truncation.

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, ToPrimitive, Zero};
use std::iter::Peekable;
use std::str::Chars;
use thiserror::Error;

/// Exponents above this are refused to keep evaluation bounded.
pub const MAX_EXPONENT: u32 = 65_536;

/// Largest result, in bits, of any step of an evaluation. `2^65536` fits.
pub const MAX_RESULT_BITS: u64 = MAX_EXPONENT as u64 + 1;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormulaError {
    #[error("unexpected character '{0}' at position {1}")]
    UnexpectedChar(char, usize),
    #[error("unexpected end of formula")]
    UnexpectedEnd,
    #[error("trailing input at position {0}")]
    TrailingInput(usize),
    #[error("division by zero")]
    DivisionByZero,
    #[error("{0} / {1} is not an integer")]
    InexactDivision(BigInt, BigInt),
    #[error("negative exponent {0}")]
    NegativeExponent(BigInt),
    #[error("exponent {0} exceeds {max}", max = MAX_EXPONENT)]
    ExponentTooLarge(BigInt),
    #[error("result of about {0} bits exceeds {max} bits", max = MAX_RESULT_BITS)]
    ResultTooLarge(u64),
}

#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Number(BigInt),
    Var,
    Neg(Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, Box<Expr>),
}

/// A parsed formula in the variable `n`.
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    source: String,
    expr: Expr,
}

impl Formula {
    /// Parse a formula such as `2^n - 1` or `(n+1)*(n-1)/3`.
    pub fn parse(source: &str) -> Result<Self, FormulaError> {
        let mut parser = Parser {
            chars: source.chars().peekable(),
            pos: 0,
        };
        let expr = parser.expr()?;
        parser.skip_ws();
        if parser.chars.peek().is_some() {
            return Err(FormulaError::TrailingInput(parser.pos));
        }
        Ok(Self {
            source: source.trim().to_string(),
            expr,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluate with `n` bound to the given value.
    pub fn eval(&self, n: &BigInt) -> Result<BigInt, FormulaError> {
        eval(&self.expr, n)
    }
}

/// Fails when `bits` is over the budget.
fn within_budget(bits: u64) -> Result<(), FormulaError> {
    if bits > MAX_RESULT_BITS {
        return Err(FormulaError::ResultTooLarge(bits));
    }
    Ok(())
}

fn eval(expr: &Expr, n: &BigInt) -> Result<BigInt, FormulaError> {
    let value = eval_unchecked(expr, n)?;
    within_budget(value.bits())?;
    Ok(value)
}

/// Evaluate one node. Operands come from `eval`, so they are already within
/// the budget; products and powers are checked before they are computed.
fn eval_unchecked(expr: &Expr, n: &BigInt) -> Result<BigInt, FormulaError> {
    Ok(match expr {
        Expr::Number(v) => v.clone(),
        Expr::Var => n.clone(),
        Expr::Neg(a) => -eval(a, n)?,
        Expr::Add(a, b) => eval(a, n)? + eval(b, n)?,
        Expr::Sub(a, b) => eval(a, n)? - eval(b, n)?,
        Expr::Mul(a, b) => {
            let lhs = eval(a, n)?;
            let rhs = eval(b, n)?;
            if !lhs.is_zero() && !rhs.is_zero() {
                // a product has at least bits(a) + bits(b) - 1 bits
                within_budget(lhs.bits() + rhs.bits() - 1)?;
            }
            lhs * rhs
        }
        Expr::Div(a, b) => {
            let num = eval(a, n)?;
            let den = eval(b, n)?;
            if den.is_zero() {
                return Err(FormulaError::DivisionByZero);
            }
            let (q, r) = num.div_rem(&den);
            if !r.is_zero() {
                return Err(FormulaError::InexactDivision(num, den));
            }
            q
        }
        Expr::Pow(a, b) => {
            let base = eval(a, n)?;
            let exp = eval(b, n)?;
            if exp.is_negative() {
                return Err(FormulaError::NegativeExponent(exp));
            }
            let Some(e) = exp.to_u32().filter(|&e| e <= MAX_EXPONENT) else {
                return Err(FormulaError::ExponentTooLarge(exp));
            };
            if base.bits() > 1 {
                // |base| >= 2, so the power has at least (bits - 1) * e + 1 bits
                within_budget((base.bits() - 1) * e as u64 + 1)?;
            }
            base.pow(e)
        }
    })
}

struct Parser<'a> {
    chars: Peekable<Chars<'a>>,
    pos: usize,
}

impl Parser<'_> {
    fn skip_ws(&mut self) {
        while self.chars.peek().is_some_and(|c| c.is_whitespace()) {
            self.bump();
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    /// Next non-space character, without consuming it.
    fn peek(&mut self) -> Option<char> {
        self.skip_ws();
        self.chars.peek().copied()
    }

    fn expr(&mut self) -> Result<Expr, FormulaError> {
        let mut lhs = self.term()?;
        loop {
            match self.peek() {
                Some('+') => {
                    self.bump();
                    lhs = Expr::Add(Box::new(lhs), Box::new(self.term()?));
                }
                Some('-') => {
                    self.bump();
                    lhs = Expr::Sub(Box::new(lhs), Box::new(self.term()?));
                }
                _ => return Ok(lhs),
            }
        }
    }

    fn term(&mut self) -> Result<Expr, FormulaError> {
        let mut lhs = self.unary()?;
        loop {
            match self.peek() {
                Some('*') => {
                    self.bump();
                    lhs = Expr::Mul(Box::new(lhs), Box::new(self.unary()?));
                }
                Some('/') => {
                    self.bump();
                    lhs = Expr::Div(Box::new(lhs), Box::new(self.unary()?));
                }
                _ => return Ok(lhs),
            }
        }
    }

    fn unary(&mut self) -> Result<Expr, FormulaError> {
        if self.peek() == Some('-') {
            self.bump();
            return Ok(Expr::Neg(Box::new(self.unary()?)));
        }
        self.power()
    }

    fn power(&mut self) -> Result<Expr, FormulaError> {
        let base = self.atom()?;
        if self.peek() == Some('^') {
            self.bump();
            let exp = self.unary()?;
            return Ok(Expr::Pow(Box::new(base), Box::new(exp)));
        }
        Ok(base)
    }

    fn atom(&mut self) -> Result<Expr, FormulaError> {
        match self.peek() {
            None => Err(FormulaError::UnexpectedEnd),
            Some('n') | Some('N') => {
                self.bump();
                Ok(Expr::Var)
            }
            Some('(') => {
                self.bump();
                let inner = self.expr()?;
                match self.peek() {
                    Some(')') => {
                        self.bump();
                        Ok(inner)
                    }
                    Some(c) => Err(FormulaError::UnexpectedChar(c, self.pos)),
                    None => Err(FormulaError::UnexpectedEnd),
                }
            }
            Some(c) if c.is_ascii_digit() => {
                let mut digits = String::new();
                while let Some(&d) = self.chars.peek() {
                    if !d.is_ascii_digit() {
                        break;
                    }
                    digits.push(d);
                    self.bump();
                }
                // digits is non-empty and all ASCII digits
                let value = BigInt::parse_bytes(digits.as_bytes(), 10).unwrap_or_default();
                Ok(Expr::Number(value))
            }
            Some(c) => Err(FormulaError::UnexpectedChar(c, self.pos)),
        }
    }
}
