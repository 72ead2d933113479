//! Parsing of user-entered phase text.
//!
//! [`parse_phase`] accepts the empty string (zero), plain integers, decimal
//! and scientific literals, simple fractions like `1/2` (`/2` meaning `1/2`
//! and `-/2` meaning `-1/2`), all optionally carrying the turn symbol `π` or
//! its alias `pi`, which is stripped before numeric interpretation. Anything
//! else falls back to a small symbolic-expression grammar over `+ - * / ^ ( )`
//! that may introduce named variables through a resolver callback.
//!
//! Variable names are a single letter optionally followed by digits (`x`,
//! `y1`); the resolver is invoked once per distinct name and is expected to
//! register the variable and return its polynomial placeholder.

use num_rational::Rational64 as R64;
use num_traits::{ One, Zero };
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::{
    phase::{ Phase, PhaseValue },
    poly::Poly,
};

/// Errors arising from malformed phase text.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// A numeric literal with no finite rational representation.
    #[error("unrepresentable number: {0}")]
    UnrepresentableNumber(String),

    /// A character with no meaning in the expression grammar.
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),

    /// Input ended where a value or closing delimiter was expected.
    #[error("unexpected end of input")]
    UnexpectedEnd,

    /// A complete expression was parsed but input remained.
    #[error("trailing input: {0}")]
    TrailingInput(String),

    /// Division by something other than a non-zero constant.
    #[error("divisor must be a non-zero constant")]
    BadDivisor,

    /// An exponent that is not a non-negative integer literal.
    #[error("exponents must be non-negative integers")]
    BadExponent,
}
pub type ParseResult<T> = Result<T, ParseError>;

/// Parse phase text into a [`PhaseValue`].
///
/// `resolver` is called once per distinct variable name encountered; it must
/// register the variable and return the polynomial standing for it. Parsing
/// mutates nothing else.
///
/// A purely numeric result is reduced modulo one turn and returned as
/// [`PhaseValue::Exact`]; otherwise the result is symbolic. Malformed input
/// fails rather than silently producing zero.
pub fn parse_phase<F>(text: &str, resolver: F) -> ParseResult<PhaseValue>
where F: FnMut(&str) -> Poly
{
    let trimmed = text.trim();
    if trimmed.is_empty() { return Ok(PhaseValue::zero()); }
    if let Some(ph) = parse_numeric(trimmed)? {
        return Ok(ph.into());
    }
    let tokens = tokenize(trimmed)?;
    let mut parser = Parser::new(&tokens, resolver);
    let poly = parser.expr()?;
    parser.finish()?;
    Ok(poly.into())
}

// fast path mirroring hand-entered fractions: strip spaces and the turn
// symbol, then try float / fraction / integer forms
//
// `Ok(None)` means "not simple numeric text"; the caller then tries the full
// expression grammar
fn parse_numeric(text: &str) -> ParseResult<Option<Phase>> {
    let s: String =
        text.to_lowercase()
        .replace(' ', "")
        .replace('\u{03c0}', "")
        .replace("pi", "");
    if s.contains('.') || s.contains('e') {
        let Ok(f) = s.parse::<f64>() else { return Ok(None) };
        if !f.is_finite() {
            return Err(ParseError::UnrepresentableNumber(text.to_string()));
        }
        let ph =
            Phase::approx(f)
            .ok_or_else(|| {
                ParseError::UnrepresentableNumber(text.to_string())
            })?;
        Ok(Some(ph))
    } else if let Some((a, b)) = s.split_once('/') {
        let numer: i64 =
            if a.is_empty() {
                1
            } else if a == "-" {
                -1
            } else if let Ok(n) = a.parse::<i64>() {
                n
            } else {
                return Ok(None);
            };
        let Ok(denom) = b.parse::<i64>() else { return Ok(None) };
        if denom == 0 {
            return Err(ParseError::BadDivisor);
        }
        Ok(Some(Phase::new(numer, denom)))
    } else if s.is_empty() {
        // the input was nothing but turn symbols, e.g. "π"
        Ok(Some(Phase::new(1, 1)))
    } else {
        Ok(s.parse::<i64>().ok().map(|n| Phase::new(n, 1)))
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Num(R64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

fn tokenize(text: &str) -> ParseResult<Vec<Token>> {
    let mut tokens: Vec<Token> = Vec::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.peek().copied() {
        match c {
            ' ' | '\t' => { chars.next(); },
            '+' => { chars.next(); tokens.push(Token::Plus); },
            '-' => { chars.next(); tokens.push(Token::Minus); },
            '*' => { chars.next(); tokens.push(Token::Star); },
            '/' => { chars.next(); tokens.push(Token::Slash); },
            '^' => { chars.next(); tokens.push(Token::Caret); },
            '(' => { chars.next(); tokens.push(Token::LParen); },
            ')' => { chars.next(); tokens.push(Token::RParen); },
            '\u{03c0}' => {
                chars.next();
                tokens.push(Token::Num(R64::one()));
            },
            '0'..='9' | '.' => {
                let mut lit = String::new();
                while let Some(d) = chars.peek().copied() {
                    if d.is_ascii_digit() || d == '.' {
                        lit.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Num(parse_literal(&lit)?));
            },
            c if c.is_alphabetic() => {
                chars.next();
                let mut name = String::from(c);
                while let Some(d) = chars.peek().copied() {
                    if d.is_ascii_digit() {
                        name.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                // "pi" is the textual alias for the turn symbol; it lexes as
                // 'p' followed by a stray 'i' unless caught here
                if name == "p" && chars.peek() == Some(&'i') {
                    chars.next();
                    tokens.push(Token::Num(R64::one()));
                } else {
                    tokens.push(Token::Ident(name));
                }
            },
            c => { return Err(ParseError::UnexpectedChar(c)); },
        }
    }
    Ok(tokens)
}

fn parse_literal(lit: &str) -> ParseResult<R64> {
    if let Ok(n) = lit.parse::<i64>() {
        return Ok(R64::new(n, 1));
    }
    let f: f64 =
        lit.parse()
        .map_err(|_| ParseError::UnrepresentableNumber(lit.to_string()))?;
    R64::approximate_float(f)
        .ok_or_else(|| ParseError::UnrepresentableNumber(lit.to_string()))
}

// recursive-descent parser over the token stream
//
// expr   := term (('+' | '-') term)*
// term   := factor (('*' | '/') factor)*
// factor := '-' factor | atom ('^' uint)?
// atom   := number | variable | '(' expr ')'
struct Parser<'a, F> {
    tokens: &'a [Token],
    pos: usize,
    resolver: F,
    seen: FxHashMap<String, Poly>,
}

impl<'a, F> Parser<'a, F>
where F: FnMut(&str) -> Poly
{
    fn new(tokens: &'a [Token], resolver: F) -> Self {
        Self { tokens, pos: 0, resolver, seen: FxHashMap::default() }
    }

    fn peek(&self) -> Option<&Token> { self.tokens.get(self.pos) }

    fn next(&mut self) -> Option<&Token> {
        let tok = self.tokens.get(self.pos);
        if tok.is_some() { self.pos += 1; }
        tok
    }

    fn finish(&self) -> ParseResult<()> {
        match self.peek() {
            None => Ok(()),
            Some(tok) =>
                Err(ParseError::TrailingInput(format!("{:?}", tok))),
        }
    }

    fn expr(&mut self) -> ParseResult<Poly> {
        let mut acc = self.term()?;
        while let Some(tok) = self.peek() {
            match tok {
                Token::Plus => { self.pos += 1; acc += self.term()?; },
                Token::Minus => { self.pos += 1; acc += -self.term()?; },
                _ => { break; },
            }
        }
        Ok(acc)
    }

    fn term(&mut self) -> ParseResult<Poly> {
        let mut acc = self.factor()?;
        while let Some(tok) = self.peek() {
            match tok {
                Token::Star => {
                    self.pos += 1;
                    acc = acc * self.factor()?;
                },
                Token::Slash => {
                    self.pos += 1;
                    let divisor =
                        self.factor()?
                        .as_constant()
                        .filter(|c| !c.is_zero())
                        .ok_or(ParseError::BadDivisor)?;
                    acc = acc * divisor.recip();
                },
                _ => { break; },
            }
        }
        Ok(acc)
    }

    fn factor(&mut self) -> ParseResult<Poly> {
        if self.peek() == Some(&Token::Minus) {
            self.pos += 1;
            return Ok(-self.factor()?);
        }
        let base = self.atom()?;
        if self.peek() == Some(&Token::Caret) {
            self.pos += 1;
            match self.next() {
                Some(Token::Num(n))
                    if n.is_integer() && *n.numer() >= 0 =>
                {
                    Ok(base.pow(*n.numer() as u32))
                },
                Some(_) => Err(ParseError::BadExponent),
                None => Err(ParseError::UnexpectedEnd),
            }
        } else {
            Ok(base)
        }
    }

    fn atom(&mut self) -> ParseResult<Poly> {
        match self.next().cloned() {
            Some(Token::Num(n)) => Ok(Poly::constant(n)),
            Some(Token::Ident(name)) => {
                if let Some(poly) = self.seen.get(&name) {
                    return Ok(poly.clone());
                }
                let poly = (self.resolver)(&name);
                self.seen.insert(name, poly.clone());
                Ok(poly)
            },
            Some(Token::LParen) => {
                let inner = self.expr()?;
                match self.next() {
                    Some(Token::RParen) => Ok(inner),
                    Some(tok) =>
                        Err(ParseError::TrailingInput(format!("{:?}", tok))),
                    None => Err(ParseError::UnexpectedEnd),
                }
            },
            Some(tok) =>
                Err(ParseError::TrailingInput(format!("{:?}", tok))),
            None => Err(ParseError::UnexpectedEnd),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse_pure(text: &str) -> ParseResult<PhaseValue> {
        parse_phase(text, |name| Poly::var(name))
    }

    #[test]
    fn numeric() {
        assert_eq!(parse_pure(""), Ok(PhaseValue::zero()));
        assert_eq!(parse_pure("  "), Ok(PhaseValue::zero()));
        assert_eq!(parse_pure("1/2"), Ok(Phase::new(1, 2).into()));
        assert_eq!(parse_pure("/3"), Ok(Phase::new(1, 3).into()));
        assert_eq!(parse_pure("-/3"), Ok(Phase::new(-1, 3).into()));
        assert_eq!(parse_pure("2"), Ok(Phase::zero().into()));
        assert_eq!(parse_pure("-1"), Ok(Phase::zero().into()));
        assert_eq!(parse_pure("0.25"), Ok(Phase::new(1, 4).into()));
        assert_eq!(parse_pure("5e-1"), Ok(Phase::pi().into()));
    }

    #[test]
    fn turn_symbol() {
        assert_eq!(parse_pure("π"), Ok(Phase::new(1, 1).into()));
        assert_eq!(parse_pure("π/2"), Ok(Phase::new(1, 2).into()));
        assert_eq!(parse_pure("pi/2"), Ok(Phase::new(1, 2).into()));
        assert_eq!(parse_pure("-π/4"), Ok(Phase::new(-1, 4).into()));
        assert_eq!(parse_pure("3π/4"), Ok(Phase::new(3, 4).into()));
    }

    #[test]
    fn malformed() {
        assert!(parse_pure("abc").is_err());
        assert!(parse_pure("1/").is_err());
        assert!(parse_pure("/").is_err());
        assert!(parse_pure("..").is_err());
        assert!(parse_pure("x +").is_err());
        assert!(parse_pure("(x").is_err());
        assert!(parse_pure("1/x").is_err());
        assert!(parse_pure("x^y").is_err());
        assert_eq!(parse_pure("1e999"),
            Err(ParseError::UnrepresentableNumber("1e999".to_string())));
    }

    #[test]
    fn symbolic() {
        let mut introduced: Vec<String> = Vec::new();
        let ph =
            parse_phase("x + x", |name| {
                introduced.push(name.to_string());
                Poly::var(name)
            })
            .unwrap();
        assert!(ph.is_symbolic());
        // resolver called once per distinct name
        assert_eq!(introduced, vec!["x".to_string()]);

        let ph = parse_pure("2*x - y/2").unwrap();
        let expected: PhaseValue =
            (Poly::var("x") * R64::new(2, 1)
                + Poly::var("y") * R64::new(-1, 2))
            .into();
        assert_eq!(ph, expected);
    }

    #[test]
    fn symbolic_structure() {
        let ph = parse_pure("(x + 1)^2").unwrap();
        let expected: PhaseValue =
            (Poly::var("x").pow(2)
                + Poly::var("x") * R64::new(2, 1)
                + Poly::constant(R64::one()))
            .into();
        assert_eq!(ph, expected);
        // symbolic constants collapse to exact phases
        let ph = parse_pure("(1 + 1)*3").unwrap();
        assert!(!ph.is_symbolic());
    }
}
