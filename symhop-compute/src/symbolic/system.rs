//! Sorting of equation systems.
//!
//! A system of `n` equations in `n` state variables is solved with a Newton-Raphson iteration
//! that needs a non-zero diagonal in the Jacobian matrix. [`sort_equation_system`] reorders the
//! equations (and the rows of the Jacobian) so that equation `i` depends on state variable `i`.

use crate::{
    diagnostic::{report, Diagnostic},
    symbolic::{error::NoSortingPath, step_collector::StepCollector, Expr},
};
use log::debug;

/// Finds an assignment of one distinct entry of each row of `dependencies` to that row, by
/// depth-first search.
///
/// Row `i` lists the candidates for position `i`. At every position, `preferred[i]` is tried
/// first, if it is a candidate. An empty row yields [`None`] at its position; this is only useful
/// for building preferred orders from incomplete systems.
///
/// Returns [`None`] if no assignment exists.
///
/// ```
/// use symhop_compute::symbolic::system::find_path;
///
/// let dependencies = vec![vec![0, 1], vec![0]];
/// assert_eq!(find_path(&dependencies, &[]), Some(vec![Some(1), Some(0)]));
/// ```
pub fn find_path(dependencies: &[Vec<usize>], preferred: &[usize]) -> Option<Vec<Option<usize>>> {
    let mut order = Vec::with_capacity(dependencies.len());
    extend_path(&mut order, dependencies, preferred).then_some(order)
}

fn extend_path(order: &mut Vec<Option<usize>>, dependencies: &[Vec<usize>], preferred: &[usize]) -> bool {
    let level = order.len();
    let Some(row) = dependencies.get(level) else {
        return true;
    };

    if row.is_empty() {
        order.push(None);
        if extend_path(order, dependencies, preferred) {
            return true;
        }
        order.pop();
        return false;
    }

    let first = preferred.get(level).copied().filter(|p| row.contains(p));
    for candidate in first.into_iter().chain(row.iter().copied()) {
        if order.contains(&Some(candidate)) {
            continue;
        }
        order.push(Some(candidate));
        if extend_path(order, dependencies, preferred) {
            return true;
        }
        order.pop();
    }
    false
}

/// Reorders `equations` and the rows of `jacobian` so that every diagonal element of the Jacobian
/// is non-zero.
///
/// `jacobian[e][v]` is the derivative of equation `e` with respect to state variable `v`. The
/// equation chosen for state variable `v` is the first one that depends on it, unless
/// `preferred_order[v]` also does. The indices in `limited_variable_eqs` and
/// `limited_derivative_eqs` are remapped through the new order.
///
/// If no such order exists, an error is reported to `diagnostics`, and nothing is changed.
pub fn sort_equation_system(
    equations: &mut Vec<Expr>,
    jacobian: &mut Vec<Vec<Expr>>,
    state_vars: &[Expr],
    limited_variable_eqs: &mut [usize],
    limited_derivative_eqs: &mut [usize],
    preferred_order: &[usize],
    diagnostics: &mut dyn StepCollector<Diagnostic>,
) -> Result<(), NoSortingPath> {
    let zero = Expr::number(0.0);
    let dependencies = (0..state_vars.len())
        .map(|v| {
            (0..state_vars.len())
                .filter(|&e| jacobian.get(e).and_then(|row| row.get(v)).map_or(false, |d| *d != zero))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    let order = find_path(&dependencies, preferred_order)
        .and_then(|order| order.into_iter().collect::<Option<Vec<_>>>())
        .filter(|order| order.iter().all(|&e| e < equations.len() && e < jacobian.len()));
    let Some(order) = order else {
        report(diagnostics, Diagnostic::error("Failed to find sorting path."));
        return Err(NoSortingPath);
    };

    debug!("sorted equation system into order {:?}", order);
    *equations = order.iter().map(|&e| equations[e].clone()).collect();
    *jacobian = order.iter().map(|&e| jacobian[e].clone()).collect();
    for idx in limited_variable_eqs.iter_mut().chain(limited_derivative_eqs.iter_mut()) {
        if let Some(&e) = order.get(*idx) {
            *idx = e;
        }
    }
    Ok(())
}
