use crate::symbolic::Expr;
use super::{
    builtins,
    ctxt::Ctxt,
    error::{Derivative, Equation, EvalError, UndefinedFunction, UndefinedVariable, UserFunction},
};
use levenshtein::levenshtein;

/// Any type that can be evaluated to produce a value.
pub trait Eval {
    /// Evaluate the expression to produce a value, using the given context.
    fn eval(&self, ctxt: &Ctxt) -> Result<f64, EvalError>;

    /// Evaluate the expression to produce a value, using an empty context.
    fn eval_default(&self) -> Result<f64, EvalError> {
        self.eval(&Ctxt::new())
    }
}

/// Evaluates a function call.
fn eval_call(expr: &Expr, name: &str, args: &[Expr], ctxt: &Ctxt) -> Result<f64, EvalError> {
    if let Some(func) = ctxt.get_func(name) {
        let args = args.iter().map(Expr::to_string).collect::<Vec<_>>().join(",");
        return func.eval(&args).ok_or_else(|| UserFunction { name: name.to_string() }.into());
    }

    if name == "der" {
        return Err(Derivative.into());
    }

    if let Some(builtin) = builtins::lookup(name, args.len()) {
        let values = args.iter().map(|arg| arg.eval(ctxt)).collect::<Result<Vec<_>, _>>()?;
        return Ok(builtin(&values));
    }

    // calls such as `mDelay0.getOldest()` can be bound as variables
    if let Some(value) = ctxt.get_var(&expr.to_string()) {
        return Ok(value);
    }

    let mut suggestions = builtins::NAMES
        .iter()
        .filter(|builtin| levenshtein(builtin, name) < 2)
        .map(|builtin| builtin.to_string())
        .chain(ctxt.get_similar_funcs(name))
        .collect::<Vec<_>>();
    suggestions.dedup();
    Err(UndefinedFunction { name: name.to_string(), arity: args.len(), suggestions }.into())
}

impl Eval for Expr {
    fn eval(&self, ctxt: &Ctxt) -> Result<f64, EvalError> {
        match self {
            Expr::Symbol(name) => match self.to_double() {
                Some(value) => Ok(value),
                None => ctxt.get_var(name).ok_or_else(|| {
                    UndefinedVariable { name: name.clone(), suggestions: ctxt.get_similar_vars(name) }.into()
                }),
            },
            Expr::Function(name, args) => eval_call(self, name, args, ctxt),
            Expr::Power(base, power) => Ok(base.eval(ctxt)?.powf(power.eval(ctxt)?)),
            Expr::Equation(..) => Err(Equation.into()),
            Expr::Add(terms) => terms.iter().try_fold(0.0, |sum, term| Ok(sum + term.eval(ctxt)?)),
            Expr::Mul(factors, divisors) => {
                let numerator = factors.iter().try_fold(1.0, |product, factor| {
                    Ok::<_, EvalError>(product * factor.eval(ctxt)?)
                })?;
                divisors.iter().try_fold(numerator, |quotient, divisor| Ok(quotient / divisor.eval(ctxt)?))
            },
            Expr::Modulus(dividend, divisors) => {
                divisors.iter().try_fold(dividend.eval(ctxt)?, |value, divisor| Ok(value % divisor.eval(ctxt)?))
            },
        }
    }
}

impl Expr {
    /// Evaluates the expression to a number, using the variables and user functions in the given
    /// context.
    ///
    /// Fails if any part of the expression cannot be evaluated: an unbound variable, an unknown
    /// function, an equation or a `der()` call.
    pub fn evaluate(&self, ctxt: &Ctxt) -> Result<f64, EvalError> {
        self.eval(ctxt)
    }
}

#[cfg(test)]
mod tests {
    use assert_float_eq::assert_float_absolute_eq;
    use pretty_assertions::assert_eq;
    use crate::numerical::ctxt::UserFunction as UserFunctionTrait;
    use std::f64::consts::PI;
    use super::*;

    fn eval(src: &str, vars: &[(&str, f64)]) -> Result<f64, EvalError> {
        let mut ctxt = Ctxt::new();
        for (name, value) in vars {
            ctxt.add_var(name, *value);
        }
        Expr::parse(src).unwrap().evaluate(&ctxt)
    }

    #[test]
    fn arithmetic() {
        assert_eq!(eval("1 + 2*3", &[]), Ok(7.0));
        assert_eq!(eval("x/y - 1", &[("x", 6.0), ("y", 3.0)]), Ok(1.0));
        assert_eq!(eval("-x^2", &[("x", 3.0)]), Ok(-9.0));
        assert_eq!(eval("x % 4 % 2", &[("x", 7.5)]), Ok(1.5));
        assert_float_absolute_eq!(eval("2*pi()", &[]).unwrap(), 2.0 * PI);
    }

    #[test]
    fn unsimplified_trees_evaluate() {
        let expr = Expr::parse_with("a*(b+c)/(d-e)", crate::symbolic::SimplifyLevel::None).unwrap();
        let mut ctxt = Ctxt::new();
        for (name, value) in [("a", 2.0), ("b", 1.0), ("c", 3.0), ("d", 5.0), ("e", 1.0)] {
            ctxt.add_var(name, value);
        }
        assert_eq!(expr.evaluate(&ctxt), Ok(2.0));
    }

    #[test]
    fn functions() {
        assert_eq!(eval("limit(x, 0, 1)", &[("x", 3.0)]), Ok(1.0));
        assert_eq!(eval("max(x, 2) + min(x, 2)", &[("x", 3.0)]), Ok(5.0));
        assert_eq!(eval("ifElse(x > 2, 10, 20)", &[("x", 3.0)]), Ok(10.0));
        assert_eq!(eval("a >= b && b != 0", &[("a", 1.0), ("b", 1.0)]), Ok(1.0));
        assert_float_absolute_eq!(eval("sin(x)^2 + cos(x)^2", &[("x", 0.3)]).unwrap(), 1.0);
    }

    #[test]
    fn bound_calls() {
        assert_eq!(eval("2*mDelay0.getOldest()", &[("mDelay0.getOldest()", 1.5)]), Ok(3.0));
    }

    #[test]
    fn unbound_variable() {
        let err = eval("x1 + y", &[("x", 1.0), ("y", 2.0)]).unwrap_err();
        assert_eq!(err, EvalError::UndefinedVariable(UndefinedVariable {
            name: "x1".to_string(),
            suggestions: vec!["x".to_string()],
        }));
    }

    #[test]
    fn unknown_function() {
        let err = eval("sim(x)", &[("x", 1.0)]).unwrap_err();
        assert_eq!(err, EvalError::UndefinedFunction(UndefinedFunction {
            name: "sim".to_string(),
            arity: 1,
            suggestions: vec!["sin".to_string()],
        }));

        let err = eval("max(x, 1, 2)", &[("x", 1.0)]).unwrap_err();
        assert!(matches!(err, EvalError::UndefinedFunction(UndefinedFunction { arity: 3, .. })));
    }

    #[test]
    fn unevaluable_shapes() {
        assert_eq!(eval("x = 1", &[("x", 1.0)]), Err(Equation.into()));
        assert_eq!(eval("1 + der(x)", &[("x", 1.0)]), Err(Derivative.into()));
    }

    #[derive(Debug)]
    struct Lookup;

    impl UserFunctionTrait for Lookup {
        fn eval(&self, args: &str) -> Option<f64> {
            match args {
                "x,2.0" => Some(42.0),
                _ => None,
            }
        }
    }

    #[test]
    fn user_functions() {
        let mut ctxt = Ctxt::new();
        ctxt.add_func("table", Lookup);
        ctxt.add_func("sin", Lookup);

        assert_eq!(Expr::parse("table(x, 2)").unwrap().evaluate(&ctxt), Ok(42.0));
        assert_eq!(
            Expr::parse("table(y, 2)").unwrap().evaluate(&ctxt),
            Err(UserFunction { name: "table".to_string() }.into()),
        );
        // user functions take precedence over builtins
        assert!(Expr::parse("sin(1)").unwrap().evaluate(&ctxt).is_err());
    }
}
