use levenshtein::levenshtein;
use std::{collections::HashMap, fmt::Debug, sync::Arc};

/// A function provided by the caller, evaluated before any builtin of the same name.
///
/// The function receives its arguments printed as expression strings and joined with `,`, so
/// `f(x+1, 2)` is called with `"x+1,2.0"`. It returns [`None`] if it cannot produce a value.
pub trait UserFunction: Debug + Send + Sync {
    /// Evaluates the function.
    fn eval(&self, args: &str) -> Option<f64>;
}

/// A context to use when evaluating an expression, containing the values of variables and the
/// user functions that can be called within the expression.
#[derive(Debug, Clone, Default)]
pub struct Ctxt {
    /// The variables in the context.
    vars: HashMap<String, f64>,

    /// The user functions in the context.
    funcs: HashMap<String, Arc<dyn UserFunction>>,
}

impl Ctxt {
    /// Creates a new empty context.
    pub fn new() -> Ctxt {
        Ctxt::default()
    }

    /// Add a variable to the context.
    ///
    /// The name may also be the printed form of a function call, such as `mDelay0.getOldest()`;
    /// the call then evaluates to the given value.
    pub fn add_var(&mut self, name: &str, value: f64) {
        self.vars.insert(name.to_string(), value);
    }

    /// Get the value of a variable in the context.
    pub fn get_var(&self, name: &str) -> Option<f64> {
        self.vars.get(name).copied()
    }

    /// Returns the variables in the context.
    pub fn get_vars(&self) -> &HashMap<String, f64> {
        &self.vars
    }

    /// Add a user function to the context.
    pub fn add_func(&mut self, name: &str, func: impl UserFunction + 'static) {
        self.funcs.insert(name.to_string(), Arc::new(func));
    }

    /// Get a user function in the context.
    pub fn get_func(&self, name: &str) -> Option<&dyn UserFunction> {
        self.funcs.get(name).map(|func| &**func)
    }

    /// Returns all variables in the context with a name similar to the given name.
    pub fn get_similar_vars(&self, name: &str) -> Vec<String> {
        let mut similar = self.vars
            .keys()
            .filter(|n| levenshtein(n, name) < 2)
            .cloned()
            .collect::<Vec<_>>();
        similar.sort();
        similar
    }

    /// Returns all user functions in the context with a name similar to the given name.
    pub fn get_similar_funcs(&self, name: &str) -> Vec<String> {
        let mut similar = self.funcs
            .keys()
            .filter(|n| levenshtein(n, name) < 2)
            .cloned()
            .collect::<Vec<_>>();
        similar.sort();
        similar
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[derive(Debug)]
    struct Constant(f64);

    impl UserFunction for Constant {
        fn eval(&self, _: &str) -> Option<f64> {
            Some(self.0)
        }
    }

    #[test]
    fn similar_names() {
        let mut ctxt = Ctxt::new();
        ctxt.add_var("x1", 1.0);
        ctxt.add_var("x2", 2.0);
        ctxt.add_var("speed", 3.0);
        ctxt.add_func("gain", Constant(2.0));

        assert_eq!(ctxt.get_similar_vars("x"), vec!["x1".to_string(), "x2".to_string()]);
        assert_eq!(ctxt.get_similar_vars("sped"), vec!["speed".to_string()]);
        assert_eq!(ctxt.get_similar_funcs("gains"), vec!["gain".to_string()]);
        assert!(ctxt.get_similar_funcs("offset").is_empty());
    }

    #[test]
    fn lookup() {
        let mut ctxt = Ctxt::new();
        ctxt.add_var("x", 1.5);
        ctxt.add_func("gain", Constant(2.0));

        assert_eq!(ctxt.get_var("x"), Some(1.5));
        assert_eq!(ctxt.get_var("y"), None);
        assert_eq!(ctxt.get_func("gain").and_then(|f| f.eval("")), Some(2.0));
    }
}
