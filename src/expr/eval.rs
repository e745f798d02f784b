//! Per-node evaluation
//!
//! A node is evaluated against already-computed values for its dependencies,
//! supplied in declared dependency order; walking the graph and caching per
//! node is the caller's concern. Numeric and algebraic evaluation share one
//! generic path over the scalar domain; graph-to-graph evaluation rebuilds
//! nodes through the regular constructors so construction-time
//! simplification applies to the substituted graph as well.

use super::Expr;
use super::arith::{apply_binary, apply_unary};
use super::mapping::MappingBuilder;
use super::node::ExprNode;
use super::product::multiplication;
use crate::error::{Error, Result};
use crate::matrix::{Matrix, mul_trans};
use crate::scalar::Scalar;

impl Expr {
    fn check_children(&self, supplied: usize, op: &'static str) -> Result<()> {
        if supplied != self.ndep() {
            return Err(Error::invalid_argument(
                op,
                format!(
                    "node has {} dependencies, got {} values",
                    self.ndep(),
                    supplied
                ),
            ));
        }
        Ok(())
    }

    fn check_child_pattern<T: Scalar>(&self, i: usize, child: &Matrix<T>) -> Result<()> {
        // dep(i) exists whenever i < ndep()
        let expected = match self.dep(i) {
            Some(d) => d.sparsity(),
            None => return Ok(()),
        };
        if child.sparsity() != expected {
            return Err(Error::invalid_argument(
                "eval",
                format!(
                    "dependency {} expects pattern {}, got {}",
                    i,
                    expected.dim_string(),
                    child.sparsity().dim_string()
                ),
            ));
        }
        Ok(())
    }

    /// Evaluate this node over a scalar domain
    ///
    /// `children[i]` must carry the exact sparsity pattern of dependency `i`.
    /// Instantiating `T` with `f64` gives numeric evaluation; instantiating
    /// it with an external algebraic scalar gives evaluation by substitution
    /// into that algebra.
    ///
    /// # Errors
    ///
    /// Returns `UnresolvedSymbol` for a symbolic leaf and `InvalidArgument`
    /// when the child count or a child pattern does not match.
    pub fn eval<T: Scalar>(&self, children: &[Matrix<T>]) -> Result<Matrix<T>> {
        self.check_children(children.len(), "eval")?;
        for (i, child) in children.iter().enumerate() {
            self.check_child_pattern(i, child)?;
        }
        match self.node() {
            ExprNode::Symbol { name, .. } => Err(Error::UnresolvedSymbol { name: name.clone() }),
            ExprNode::Constant(m) => Ok(Matrix::from_f64_matrix(m)),
            ExprNode::Unary { op, sparsity, .. } => {
                let x = &children[0];
                let values = if sparsity == x.sparsity() {
                    x.values()
                        .iter()
                        .map(|v| T::apply_unary(*op, v.clone()))
                        .collect()
                } else {
                    // densified result: absent operand positions contribute f(0)
                    sparsity
                        .entries()
                        .map(|(i, j)| T::apply_unary(*op, x.get(i, j)))
                        .collect()
                };
                Ok(Matrix::from_parts(sparsity.clone(), values))
            }
            ExprNode::Binary {
                op,
                sparsity,
                pairs,
                ..
            } => {
                let (x, y) = (&children[0], &children[1]);
                let values = pairs
                    .iter()
                    .map(|&(ka, kb)| {
                        let a = ka.map_or_else(T::zero, |k| x.values()[k].clone());
                        let b = kb.map_or_else(T::zero, |k| y.values()[k].clone());
                        T::apply_binary(*op, a, b)
                    })
                    .collect();
                Ok(Matrix::from_parts(sparsity.clone(), values))
            }
            ExprNode::Mapping {
                sparsity, nzmap, ..
            } => {
                let values = nzmap
                    .iter()
                    .map(|slot| match slot {
                        Some((d, src)) => children[*d].values()[*src].clone(),
                        None => T::zero(),
                    })
                    .collect();
                Ok(Matrix::from_parts(sparsity.clone(), values))
            }
            ExprNode::Multiplication { sparsity, .. } => {
                Ok(mul_trans(&children[0], &children[1], sparsity))
            }
        }
    }

    /// Evaluate this node over the graph domain
    ///
    /// Rebuilds the node with the given expressions as dependencies, through
    /// the regular constructors, so the construction-time simplifications
    /// apply: substituting a structural zero into a product collapses it, and
    /// so on. Leaves evaluate to themselves.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when the child count does not match, a
    /// child's pattern is incompatible, or the rebuilt node fails its own
    /// construction checks.
    pub fn eval_expr(&self, children: &[Expr]) -> Result<Expr> {
        self.check_children(children.len(), "eval_expr")?;
        match self.node() {
            ExprNode::Symbol { .. } | ExprNode::Constant(_) => Ok(self.clone()),
            ExprNode::Unary { op, .. } => Ok(apply_unary(*op, &children[0])),
            ExprNode::Binary { op, .. } => apply_binary(*op, &children[0], &children[1]),
            ExprNode::Mapping {
                sparsity, nzmap, ..
            } => {
                for (d, child) in children.iter().enumerate() {
                    // slots index the dependency's nonzeros, so the pattern
                    // must be carried over exactly
                    if let Some(dep) = self.dep(d) {
                        if child.sparsity() != dep.sparsity() {
                            return Err(Error::invalid_argument(
                                "eval_expr",
                                format!(
                                    "dependency {} expects pattern {}, got {}",
                                    d,
                                    dep.sparsity().dim_string(),
                                    child.sparsity().dim_string()
                                ),
                            ));
                        }
                    }
                }
                let mut b = MappingBuilder::new(sparsity.clone());
                for (d, child) in children.iter().enumerate() {
                    b.add_dependency(
                        child,
                        nzmap.iter().enumerate().filter_map(|(dst, slot)| {
                            slot.and_then(|(sd, src)| (sd == d).then_some((dst, src)))
                        }),
                    );
                }
                Ok(b.build())
            }
            ExprNode::Multiplication { .. } => {
                // the right child is stored transposed, so the inner
                // dimension is its column count
                if children[0].ncols() != children[1].ncols() {
                    return Err(Error::invalid_argument(
                        "eval_expr",
                        format!(
                            "product inner dimensions disagree: {} against transposed {}",
                            children[0].dim_string(),
                            children[1].dim_string()
                        ),
                    ));
                }
                Ok(multiplication(&children[0], &children[1]))
            }
        }
    }
}
