//! Numerically exact phase labels backed by rational numbers.
//!
//! All phases and arithmetic operations thereof are automatically performed
//! modulo one full turn (2*π*).

use num_complex::Complex64 as C64;
use num_rational::Rational64 as R64;
use num_traits::{ One, Zero };

use crate::poly::Poly;

// via Euclid's algorithm
fn gcd(mut a: i64, mut b: i64) -> i64 {
    let mut t: i64;
    while b != 0 {
        t = b;
        b = a % b;
        a = t;
    }
    a.abs()
}

fn lcm(a: i64, b: i64) -> i64 { (a / gcd(a, b)) * b }

// return the reduction of `a` modulo `m`, constrained to positive values
pub(crate) fn rempos(a: R64, m: R64) -> R64 {
    let d = lcm(*a.denom(), *m.denom());
    let b = (*(a * d).numer()).rem_euclid(*(m * d).numer());
    R64::new(b, d)
}

// convert a rational number to a floating-point number
pub(crate) fn r2f(a: R64) -> f64 { *a.numer() as f64 / *a.denom() as f64 }

/// An exact phase, stored as the fraction of a full turn.
///
/// This type relies on rational approximation, holding an inner [`R64`]
/// representing the number *φ* such that the phase represented by a `Phase` as
/// a whole is 2*π* × *φ*. *φ* is constrained to positive values modulo 1 in
/// all operations.
///
/// ```
/// # use zx_edit::phase::Phase;
/// assert_eq!(  Phase::new(3, 4), -Phase::new(1, 4) );
/// assert_eq!(  Phase::new(5, 4),  Phase::new(1, 4) );
/// ```
#[derive(Copy, Clone, Debug)]
pub struct Phase(pub R64);

impl From<R64> for Phase {
    fn from(r: R64) -> Self { Self(rempos(r, R64::one())) }
}

impl From<Phase> for f64 {
    fn from(ph: Phase) -> Self {
        std::f64::consts::TAU * r2f(ph.0)
    }
}

impl PartialEq for Phase {
    fn eq(&self, other: &Self) -> bool {
        rempos(self.0 - other.0, R64::one()) == R64::zero()
    }
}

impl Eq for Phase { }

impl PartialOrd for Phase {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Phase {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        rempos(self.0, R64::one()).cmp(&rempos(other.0, R64::one()))
    }
}

impl Phase {
    /// Construct a new `Phase` as `(numer / denom) × 2π`.
    pub fn new(numer: i64, denom: i64) -> Self {
        Self(rempos(R64::new(numer, denom), R64::one()))
    }

    /// Return the `Phase` representation of 0 ≡ 2π mod 2π.
    pub fn zero() -> Self { Self(R64::zero()) }

    /// Return the `Phase` representation of π.
    pub fn pi() -> Self { Self(R64::new(1, 2)) }

    /// Return the `Phase` representation of 2π/`n`.
    pub fn frac(n: i64) -> Self { Self(rempos(R64::new(1, n), R64::one())) }

    /// Attempt to convert from a floating-point number of turns.
    ///
    /// Returns `None` if `f` has no rational approximation (NaN or ±inf).
    pub fn approx(f: f64) -> Option<Self> {
        R64::approximate_float(f).map(Self::from)
    }

    /// Convert to a floating-point angle in radians.
    pub fn into_float(self) -> f64 { self.into() }

    /// Return `true` if `self` is zero modulo 2π.
    pub fn is_zero(self) -> bool { self == Self::zero() }

    /// Return a copy of `self` reduced modulo 2π.
    pub fn reduced(self) -> Self { Self(rempos(self.0, R64::one())) }

    /// Convert to a complex number with modulus 1 and argument equal to
    /// `self`.
    pub fn cis(self) -> C64 { C64::cis(self.into()) }

    /// Render `self` as a label in units of π, e.g. `π/2` for a quarter turn.
    ///
    /// Zero renders as the empty string.
    pub fn label(&self) -> String {
        if *self == Self::zero() {
            return "".to_string();
        } else if *self == Self::pi() {
            return "π".to_string();
        }
        let modpi = rempos(self.0 + self.0, R64::new(2, 1));
        if *modpi.numer() == 1 {
            format!("π/{}", modpi.denom())
        } else if *modpi.denom() <= 1000 {
            format!("({})π", modpi)
        } else {
            format!("{}π", r2f(modpi))
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::ops::Neg for Phase {
    type Output = Phase;

    fn neg(self) -> Self::Output {
        Self(rempos(-self.0, R64::one()))
    }
}

macro_rules! impl_addsub_phase {
    (
        $trait:ident,
        $fun:ident,
        $op:tt,
        $trait_assign:ident,
        $fun_assign:ident,
        $op_assign:tt
    ) => {
        impl std::ops::$trait<Phase> for Phase {
            type Output = Phase;

            fn $fun(self, rhs: Phase) -> Self::Output {
                Self(rempos(self.0 $op rhs.0, R64::one()))
            }
        }

        impl std::ops::$trait_assign<Phase> for Phase {
            fn $fun_assign(&mut self, rhs: Phase) {
                *self = *self $op rhs;
            }
        }
    }
}
impl_addsub_phase!(Add, add, +, AddAssign, add_assign, +=);
impl_addsub_phase!(Sub, sub, -, SubAssign, sub_assign, -=);

impl std::iter::Sum for Phase {
    fn sum<I>(iter: I) -> Self
    where I: IntoIterator<Item = Self>
    {
        let mut acc = Self::zero();
        for ph in iter.into_iter() { acc += ph; }
        acc
    }
}

/// A phase label attached to a node: either an exact rational fraction of a
/// turn or a symbolic polynomial over named variables.
///
/// Defaults to exact zero.
#[derive(Clone, Debug, PartialEq)]
pub enum PhaseValue {
    /// An exact rational phase, reduced modulo one turn.
    Exact(Phase),
    /// A polynomial over named variables; see [`Poly`].
    Symbolic(Poly),
}

impl Default for PhaseValue {
    fn default() -> Self { Self::zero() }
}

impl From<Phase> for PhaseValue {
    fn from(ph: Phase) -> Self { Self::Exact(ph) }
}

impl From<Poly> for PhaseValue {
    fn from(poly: Poly) -> Self {
        match poly.as_constant() {
            Some(c) => Self::Exact(c.into()),
            None => Self::Symbolic(poly),
        }
    }
}

impl PhaseValue {
    /// Return the exact-zero phase.
    pub fn zero() -> Self { Self::Exact(Phase::zero()) }

    /// Return `true` if `self` is exactly zero.
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Exact(ph) => ph.is_zero(),
            Self::Symbolic(poly) => poly.is_zero(),
        }
    }

    /// Return `true` if `self` carries named variables.
    pub fn is_symbolic(&self) -> bool { matches!(self, Self::Symbolic(_)) }

    /// Iterate over the names of all variables appearing in `self`.
    pub fn free_vars(&self) -> impl Iterator<Item = &str> + '_ {
        let names: Vec<&str> =
            match self {
                Self::Exact(_) => Vec::new(),
                Self::Symbolic(poly) => poly.free_vars().collect(),
            };
        names.into_iter()
    }

    /// Render `self` as a node label; exact phases render in units of π.
    pub fn label(&self) -> String {
        match self {
            Self::Exact(ph) => ph.label(),
            Self::Symbolic(poly) => poly.to_string(),
        }
    }
}

impl std::fmt::Display for PhaseValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::ops::Neg for PhaseValue {
    type Output = PhaseValue;

    fn neg(self) -> Self::Output {
        match self {
            Self::Exact(ph) => Self::Exact(-ph),
            Self::Symbolic(poly) => (-poly).into(),
        }
    }
}

impl std::ops::Add<PhaseValue> for PhaseValue {
    type Output = PhaseValue;

    fn add(self, rhs: PhaseValue) -> Self::Output {
        match (self, rhs) {
            (Self::Exact(l), Self::Exact(r)) => Self::Exact(l + r),
            (Self::Exact(l), Self::Symbolic(r)) =>
                (Poly::constant(l.0) + r).into(),
            (Self::Symbolic(l), Self::Exact(r)) =>
                (l + Poly::constant(r.0)).into(),
            (Self::Symbolic(l), Self::Symbolic(r)) => (l + r).into(),
        }
    }
}

impl std::ops::AddAssign<PhaseValue> for PhaseValue {
    fn add_assign(&mut self, rhs: PhaseValue) {
        let lhs = std::mem::take(self);
        *self = lhs + rhs;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn init_mod() {
        assert_eq!(Phase::new(5, 3), Phase(R64::new(2, 3)));
        assert_eq!(Phase::new(4, 3), Phase::new(1, 3));
        assert_eq!(Phase::new(-1, 3), Phase::new(2, 3));
        assert_eq!(Phase::new(1, -3), Phase::new(2, 3));
        assert_eq!(Phase::pi(), Phase::new(1, 2));
        assert_eq!(Phase::frac(1), Phase::zero());
        assert_eq!(Phase::frac(2), Phase::pi());
        assert_eq!(Phase::frac(3), Phase::new(1, 3));
    }

    #[test]
    fn add_sub_neg() {
        assert_eq!(Phase::zero() + Phase::zero(), Phase::zero());
        assert_eq!(Phase::pi() + Phase::pi(), Phase::zero());
        assert_eq!(Phase::new(1, 3) + Phase::new(2, 3), Phase::zero());
        assert_eq!(Phase::new(2, 3) + Phase::new(2, 3), Phase::new(1, 3));
        assert_eq!(Phase::new(1, 3) - Phase::new(2, 3), Phase::new(2, 3));
        assert_eq!(-Phase::new(1, 4), Phase::new(3, 4));
    }

    #[test]
    fn approx() {
        assert_eq!(Phase::approx(0.5), Some(Phase::pi()));
        assert_eq!(Phase::approx(1.5), Some(Phase::pi()));
        assert!(Phase::approx(f64::NAN).is_none());
        assert!(Phase::approx(f64::INFINITY).is_none());
    }

    #[test]
    fn labels() {
        assert_eq!(Phase::zero().label(), "");
        assert_eq!(Phase::pi().label(), "π");
        assert_eq!(Phase::new(1, 4).label(), "π/2");
        assert_eq!(Phase::new(3, 4).label(), "(3/2)π");
    }

    #[test]
    fn value_add() {
        let a = PhaseValue::Exact(Phase::new(1, 4));
        let b = PhaseValue::Symbolic(Poly::var("x"));
        let c = a.clone() + b.clone();
        assert!(c.is_symbolic());
        assert_eq!(c.free_vars().collect::<Vec<_>>(), vec!["x"]);
        let d = b.clone() + -b;
        assert!(d.is_zero());
        assert!(!d.is_symbolic());
        assert_eq!(a.clone() + PhaseValue::zero(), a);
    }
}
