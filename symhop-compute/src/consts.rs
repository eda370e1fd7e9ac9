//! Fixed name sets used throughout the library. Each set is built once and never mutated.

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Symbols that have a fixed meaning in generated simulation code and are therefore never
/// reported as variables of an expression.
pub static RESERVED_SYMBOLS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["mTimestep", "mTime", "Z"].into_iter().collect()
});

/// Functions understood by the engine and the code generators consuming its output.
pub static SUPPORTED_FUNCTIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "div", "rem", "mod", "tan", "cos", "sin", "atan", "acos", "asin", "atan2", "sinh", "cosh",
        "tanh", "log", "exp", "sqrt", "sign", "abs", "der", "onPositive", "onNegative",
        "signedSquareL", "limit", "integer", "floor", "ceil", "pow", "min", "max", "nonZero",
        "turbulentFlow", "delay", "equal", "notEqual", "greaterThan", "smallerThan",
        "greaterThanOrEqual", "smallerThanOrEqual", "logicalAnd", "logicalOr", "r2d", "d2r", "pi",
    ]
    .into_iter()
    .collect()
});

/// Hopsan-specific helper functions that are accepted in component equations.
pub static CUSTOM_FUNCTIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "hopsanLimit", "hopsanDxLimit", "onPositive", "onNegative", "signedSquareL", "limit",
        "nonZero", "turbulentFlow", "ifElse",
    ]
    .into_iter()
    .collect()
});

/// Symbol names rendered as Greek letters in LaTeX output.
pub static GREEK_LETTERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "alpha", "beta", "gamma", "Gamma", "delta", "Delta", "epsilon", "varepsilon", "zeta",
        "eta", "theta", "vartheta", "Theta", "iota", "kappa", "lambda", "Lambda", "mu", "nu",
        "xi", "Xi", "pi", "Pi", "rho", "varrho", "sigma", "Sigma", "tau", "upsilon", "Upsilon",
        "phi", "varphi", "Phi", "chi", "psi", "Psi", "omega", "Omega",
    ]
    .into_iter()
    .collect()
});
