//! Shared helpers: whole-graph evaluation built on the per-node API

// not every test binary uses every helper
#![allow(dead_code)]

use std::collections::HashMap;

use symr::{Expr, Matrix, Result};

/// Recursively evaluate a graph, reading symbol values from `env`
///
/// Symbol values must carry the exact sparsity of the symbol they replace.
pub fn evaluate(e: &Expr, env: &HashMap<String, Matrix<f64>>) -> Result<Matrix<f64>> {
    if e.is_symbolic() {
        let name = e.name()?;
        let value = env
            .get(name)
            .unwrap_or_else(|| panic!("no value bound for symbol '{name}'"));
        return Ok(value.clone());
    }
    let children = (0..e.ndep())
        .map(|i| evaluate(e.dep(i).unwrap(), env))
        .collect::<Result<Vec<_>>>()?;
    e.eval(&children)
}

/// Recursively rebuild a graph, replacing symbols found in `env`
pub fn substitute(e: &Expr, env: &HashMap<String, Expr>) -> Result<Expr> {
    if e.is_symbolic() {
        return Ok(match env.get(e.name()?) {
            Some(replacement) => replacement.clone(),
            None => e.clone(),
        });
    }
    if e.ndep() == 0 {
        return Ok(e.clone());
    }
    let children = (0..e.ndep())
        .map(|i| substitute(e.dep(i).unwrap(), env))
        .collect::<Result<Vec<_>>>()?;
    e.eval_expr(&children)
}

/// Environment from (name, matrix) pairs
pub fn env(bindings: &[(&str, Matrix<f64>)]) -> HashMap<String, Matrix<f64>> {
    bindings
        .iter()
        .map(|(n, m)| (n.to_string(), m.clone()))
        .collect()
}
