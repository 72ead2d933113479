//! Symbolic phase polynomials over named variables.
//!
//! A [`Poly`] is a sum of [`Term`]s, each a rational coefficient times a
//! product of named variables raised to positive integer powers. Whether a
//! variable is Boolean-valued or a free parameter is tracked separately by the
//! [`VarRegistry`][crate::vars::VarRegistry]; the polynomial itself is
//! agnostic.

use itertools::Itertools;
use num_rational::Rational64 as R64;
use num_traits::{ One, Zero };

/// A single monomial: a rational coefficient times a product of variable
/// powers.
///
/// Variables are kept sorted by name, with no repeats and no zero powers.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Term {
    pub(crate) vars: Vec<(String, u32)>,
    pub(crate) coeff: R64,
}

impl Term {
    /// Create a constant term.
    pub fn constant(coeff: R64) -> Self {
        Self { vars: Vec::new(), coeff }
    }

    /// Create the term `1 × name`.
    pub fn var<S>(name: S) -> Self
    where S: Into<String>
    {
        Self { vars: vec![(name.into(), 1)], coeff: R64::one() }
    }

    /// Return `true` if the term carries no variables.
    pub fn is_constant(&self) -> bool { self.vars.is_empty() }

    /// Return the coefficient.
    pub fn coeff(&self) -> R64 { self.coeff }

    // the variable part alone, used as a grouping key when summing terms
    fn key(&self) -> &[(String, u32)] { &self.vars }

    // product of two monomials
    fn mul(&self, other: &Self) -> Self {
        let mut vars = self.vars.clone();
        for (name, pow) in other.vars.iter() {
            match vars.iter_mut().find(|(n, _)| n == name) {
                Some((_, p)) => { *p += pow; },
                None => { vars.push((name.clone(), *pow)); },
            }
        }
        vars.sort();
        Self { vars, coeff: self.coeff * other.coeff }
    }

    fn render(&self) -> String {
        let vars: String =
            self.vars.iter()
            .map(|(name, pow)| {
                if *pow == 1 {
                    name.clone()
                } else {
                    format!("{}^{}", name, pow)
                }
            })
            .join("*");
        if self.is_constant() {
            format!("{}", self.coeff)
        } else if self.coeff == R64::one() {
            vars
        } else if self.coeff == -R64::one() {
            format!("-{}", vars)
        } else {
            format!("{}*{}", self.coeff, vars)
        }
    }
}

/// A polynomial over named variables with rational coefficients.
///
/// Terms are kept in a canonical form -- sorted by variable key, like terms
/// combined, zero terms dropped -- so that structural equality coincides with
/// algebraic equality.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Poly {
    pub(crate) terms: Vec<Term>,
}

impl Poly {
    /// Return the zero polynomial.
    pub fn zero() -> Self { Self { terms: Vec::new() } }

    /// Create a constant polynomial.
    pub fn constant(coeff: R64) -> Self {
        Self { terms: vec![Term::constant(coeff)] }.normalized()
    }

    /// Create the polynomial consisting of a single, bare variable.
    pub fn var<S>(name: S) -> Self
    where S: Into<String>
    {
        Self { terms: vec![Term::var(name)] }
    }

    /// Build from an arbitrary list of terms, combining and sorting as needed.
    pub fn from_terms<I>(terms: I) -> Self
    where I: IntoIterator<Item = Term>
    {
        Self { terms: terms.into_iter().collect() }.normalized()
    }

    // sort, combine like terms, drop zeros
    fn normalized(mut self) -> Self {
        self.terms.sort_by(|l, r| l.key().cmp(r.key()));
        let mut terms: Vec<Term> = Vec::with_capacity(self.terms.len());
        for term in self.terms.drain(..) {
            match terms.last_mut() {
                Some(last) if last.key() == term.key() => {
                    last.coeff += term.coeff;
                },
                _ => { terms.push(term); },
            }
        }
        terms.retain(|t| !t.coeff.is_zero());
        Self { terms }
    }

    /// Return `true` if `self` is the zero polynomial.
    pub fn is_zero(&self) -> bool { self.terms.is_empty() }

    /// If `self` is a constant, return its value.
    pub fn as_constant(&self) -> Option<R64> {
        match self.terms.as_slice() {
            [] => Some(R64::zero()),
            [term] if term.is_constant() => Some(term.coeff),
            _ => None,
        }
    }

    /// Iterate over the terms of `self`.
    pub fn terms(&self) -> impl Iterator<Item = &Term> + '_ {
        self.terms.iter()
    }

    /// Iterate over the distinct variable names appearing in `self`, in
    /// lexicographic order.
    pub fn free_vars(&self) -> impl Iterator<Item = &str> + '_ {
        self.terms.iter()
            .flat_map(|term| term.vars.iter().map(|(name, _)| name.as_str()))
            .sorted()
            .dedup()
    }

    /// Raise `self` to a non-negative integer power.
    pub fn pow(&self, n: u32) -> Self {
        let mut acc = Self::constant(R64::one());
        for _ in 0..n { acc = acc * self.clone(); }
        acc
    }
}

impl std::fmt::Display for Poly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.terms.is_empty() { return write!(f, "0"); }
        let mut first = true;
        for term in self.terms.iter() {
            let rendered = term.render();
            if first {
                write!(f, "{}", rendered)?;
                first = false;
            } else if let Some(body) = rendered.strip_prefix('-') {
                write!(f, " - {}", body)?;
            } else {
                write!(f, " + {}", rendered)?;
            }
        }
        Ok(())
    }
}

impl std::ops::Neg for Poly {
    type Output = Poly;

    fn neg(mut self) -> Self::Output {
        self.terms.iter_mut()
            .for_each(|term| { term.coeff = -term.coeff; });
        self
    }
}

impl std::ops::Add<Poly> for Poly {
    type Output = Poly;

    fn add(mut self, mut rhs: Poly) -> Self::Output {
        self.terms.append(&mut rhs.terms);
        self.normalized()
    }
}

impl std::ops::AddAssign<Poly> for Poly {
    fn add_assign(&mut self, rhs: Poly) {
        let lhs = std::mem::take(self);
        *self = lhs + rhs;
    }
}

impl std::ops::Sub<Poly> for Poly {
    type Output = Poly;

    fn sub(self, rhs: Poly) -> Self::Output { self + -rhs }
}

impl std::ops::Mul<Poly> for Poly {
    type Output = Poly;

    fn mul(self, rhs: Poly) -> Self::Output {
        let terms: Vec<Term> =
            self.terms.iter()
            .flat_map(|l| rhs.terms.iter().map(move |r| l.mul(r)))
            .collect();
        Poly { terms }.normalized()
    }
}

impl std::ops::Mul<R64> for Poly {
    type Output = Poly;

    fn mul(mut self, rhs: R64) -> Self::Output {
        self.terms.iter_mut()
            .for_each(|term| { term.coeff *= rhs; });
        self.normalized()
    }
}

impl std::iter::Sum for Poly {
    fn sum<I>(iter: I) -> Self
    where I: IntoIterator<Item = Self>
    {
        let mut acc = Self::zero();
        for poly in iter.into_iter() { acc += poly; }
        acc
    }
}
