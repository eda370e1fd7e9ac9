//! The rewrites reported by [`simplify_with`](super::simplify_with).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single simplification rule that was applied to an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Step {
    /// `a+(b+c) = a+b+c`
    FlattenSum,

    /// `a+0 = a`
    AddZero,

    /// A sum of one term is the term, an empty sum is `0`.
    CollapseSum,

    /// `2*a+a = 3*a`
    CombineLikeTerms,

    /// `1+2+a = a+3`
    SumNumbers,

    /// `a*(b*c) = a*b*c`
    /// `a/(b/c) = a*c/b`
    FlattenProduct,

    /// A product of one factor is the factor, an empty product is `1`.
    CollapseProduct,

    /// `a*0 = 0`
    MultiplyZero,

    /// `a*1 = a`
    MultiplyOne,

    /// `(-1)*(-1)*a = a`
    CancelNegatives,

    /// `2*a*3/4 = 1.5*a`
    FoldNumbers,

    /// `a*(b+c) = a*b+a*c`
    Distribute,

    /// `a*b/b = a`
    CancelFactors,

    /// `a*a = pow(a,2)`
    MergeFactors,

    /// `pow(a,1) = a`
    PowerOne,

    /// `pow(a,-b) = 1/pow(a,b)`
    NegativePower,

    /// `pow(2,3) = 8`
    FoldPower,

    /// `ifElse(c,a,a) = a`
    CollapseIfElse,

    /// `7%4 = 3`
    FoldModulus,
}
