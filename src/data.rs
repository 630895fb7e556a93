//! Some helper datatypes

use crate::vec_map::NumericId;
use indexmap::IndexMap;
use std::fmt::{self, Debug, Formatter};
use std::ops::Not;
use tinyvec::TinyVec;

/// Raised when a clause becomes empty, ie. the current branch needs to be
/// abandoned
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Conflict;

/// A variable ID
///
/// Ids are handed out densely by the registry, starting from 1
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct VarId(pub u32);

impl VarId {
    #[inline]
    pub fn new(id: u32) -> Self {
        assert!(id > 0 && id < 1 << 31);
        Self(id)
    }
}

impl NumericId for VarId {
    #[inline]
    fn to_index(self) -> usize {
        self.0 as usize - 1
    }
}

/// A literal is either a variable or the negation of a variable
///
/// Encoded as a signed integer: the magnitude is the variable id, and a
/// negative sign means it's negated.  So `!lit` is exactly `-lit`.
#[derive(Copy, Clone, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct Literal {
    inner: i32,
}

impl Debug for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl Not for Literal {
    type Output = Self;

    fn not(self) -> Self {
        Self { inner: -self.inner }
    }
}

/// Required for `TinyVec`.  Please don't use.
impl Default for Literal {
    fn default() -> Self {
        Self { inner: 0 }
    }
}

impl Literal {
    /// Make a new (non-negated) literal with the given ID.
    #[inline]
    pub fn new(id: VarId) -> Self {
        Self { inner: id.0 as i32 }
    }

    /// The literal which is true exactly when `var` has the value `value`
    #[inline]
    pub fn with_value(var: VarId, value: bool) -> Self {
        let lit = Self::new(var);
        if value {
            lit
        } else {
            !lit
        }
    }

    /// From the signed integer encoding.  Zero isn't a literal.
    #[inline]
    pub fn from_i32(inner: i32) -> Option<Self> {
        if inner == 0 || inner == i32::MIN {
            None
        } else {
            Some(Self { inner })
        }
    }

    #[inline]
    pub fn to_i32(self) -> i32 {
        self.inner
    }

    #[inline]
    pub fn var_id(self) -> VarId {
        VarId(self.inner.unsigned_abs())
    }

    #[inline]
    pub fn is_negated(self) -> bool {
        self.inner < 0
    }

    /// The value this literal demands of its variable
    #[inline]
    pub fn polarity(self) -> bool {
        !self.is_negated()
    }
}

impl NumericId for Literal {
    /// Both literals of a variable sit next to each other
    #[inline]
    fn to_index(self) -> usize {
        self.var_id().to_index() * 2 + self.is_negated() as usize
    }
}

/// A clause is the disjunction (OR) of a bunch of literals
// The number 6 chosen bc it's the most a TinyVec can store in 32 bytes
// (on x86_64, given that Literal is 4 bytes)
pub type Clause = TinyVec<[Literal; 6]>;

/// A formula is the conjunction (AND) of its clauses
///
/// No clauses means it's trivially true; an empty clause means it's
/// trivially false
pub type Formula = Vec<Clause>;

/// A partial assignment of values to variables
///
/// Keeps the order variables were fixed in, so printing it is deterministic
pub type Assignment = IndexMap<VarId, bool>;

/// Build a clause from the signed integer encoding, skipping zeros
pub fn clause_from_ints(lits: &[i32]) -> Clause {
    lits.iter().copied().filter_map(Literal::from_i32).collect()
}

/// The signed integer encoding of a formula, handy for logging and tests
pub fn formula_to_ints(formula: &[Clause]) -> Vec<Vec<i32>> {
    formula
        .iter()
        .map(|c| c.iter().map(|l| l.to_i32()).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negation_is_arithmetic() {
        let a = Literal::new(VarId::new(3));
        assert_eq!((!a).to_i32(), -3);
        assert_eq!(!!a, a);
        assert_eq!((!a).var_id(), a.var_id());
        assert!((!a).is_negated());
        assert!(a.polarity());
    }

    #[test]
    fn literal_indices_are_dense() {
        let one = Literal::new(VarId::new(1));
        let two = Literal::new(VarId::new(2));
        assert_eq!(one.to_index(), 0);
        assert_eq!((!one).to_index(), 1);
        assert_eq!(two.to_index(), 2);
        assert_eq!((!two).to_index(), 3);
    }

    #[test]
    fn zero_is_not_a_literal() {
        assert_eq!(Literal::from_i32(0), None);
        assert_eq!(clause_from_ints(&[1, 0, -2]).len(), 2);
    }

    #[test]
    fn with_value() {
        let v = VarId::new(5);
        assert_eq!(Literal::with_value(v, true).to_i32(), 5);
        assert_eq!(Literal::with_value(v, false).to_i32(), -5);
    }
}
