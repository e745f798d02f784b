//! Construction of elementwise nodes
//!
//! All elementwise graph construction funnels through [`make_binary`] and
//! [`make_unary`]: dimension checking, zero short-circuiting, operand
//! alignment and result sparsity inference happen here, driven entirely by
//! the operation metadata tables.

use super::Expr;
use super::node::{ExprNode, NzPairs};
use crate::error::{Error, Result};
use crate::ops::{BinaryInfo, BinaryOp, UnaryOp};
use crate::sparsity::{CombineMode, Sparsity, combine};

/// Elementwise binary node over two operands
///
/// Operands must have equal shapes, or one of them must be 1x1 (broadcast
/// against every element of the other). Structural zero operands
/// short-circuit to a structural zero result when the operation's metadata
/// permits.
pub(crate) fn make_binary(op: BinaryOp, x: &Expr, y: &Expr) -> Result<Expr> {
    let samedim = x.shape() == y.shape();
    if !samedim && !x.is_scalar() && !y.is_scalar() {
        return Err(Error::dimension_mismatch(op.name(), x.shape(), y.shape()));
    }

    let info = op.info();
    let (nrows, ncols) = if x.is_scalar() && !samedim {
        y.shape()
    } else {
        x.shape()
    };
    if (info.zero_when_lhs_zero && x.is_zero())
        || (info.zero_when_rhs_zero && y.is_zero())
        || (info.zero_when_both_zero && x.is_zero() && y.is_zero())
    {
        return Ok(Expr::zeros(nrows, ncols));
    }

    if samedim {
        let mode = combine_mode(info);
        let (sparsity, pairs) = combine(x.sparsity(), y.sparsity(), mode)?;
        return Ok(Expr::from_node(ExprNode::Binary {
            op,
            sparsity,
            pairs,
            lhs: x.clone(),
            rhs: y.clone(),
        }));
    }

    // Scalar broadcast: exactly one operand is 1x1.
    let (sparsity, pairs) = if x.is_scalar() {
        broadcast(info.zero_when_rhs_zero, info.zero_when_both_zero, x, y, true)
    } else {
        broadcast(info.zero_when_lhs_zero, info.zero_when_both_zero, y, x, false)
    };
    Ok(Expr::from_node(ExprNode::Binary {
        op,
        sparsity,
        pairs,
        lhs: x.clone(),
        rhs: y.clone(),
    }))
}

fn combine_mode(info: BinaryInfo) -> CombineMode {
    match (info.zero_when_lhs_zero, info.zero_when_rhs_zero) {
        (true, true) => CombineMode::Intersect,
        (true, false) => CombineMode::Left,
        (false, true) => CombineMode::Right,
        (false, false) => {
            if info.zero_when_both_zero {
                CombineMode::Union
            } else {
                CombineMode::Dense
            }
        }
    }
}

/// Align a 1x1 operand against a matrix operand
///
/// The result keeps the matrix pattern when positions structurally absent
/// from the matrix are guaranteed zero: where the scalar carries a nonzero
/// that is `zero_when_matrix_zero`, and where it is structurally empty it is
/// `zero_when_both_zero`. Otherwise the result is dense.
fn broadcast(
    zero_when_matrix_zero: bool,
    zero_when_both_zero: bool,
    scalar: &Expr,
    matrix: &Expr,
    scalar_is_lhs: bool,
) -> (Sparsity, NzPairs) {
    let k_scalar = (scalar.nnz() == 1).then_some(0);
    let keep_pattern = if k_scalar.is_some() {
        zero_when_matrix_zero
    } else {
        zero_when_both_zero
    };

    let pair = |k_matrix: Option<usize>| {
        if scalar_is_lhs {
            (k_scalar, k_matrix)
        } else {
            (k_matrix, k_scalar)
        }
    };

    if keep_pattern {
        let sparsity = matrix.sparsity().clone();
        let pairs = (0..sparsity.nnz()).map(|k| pair(Some(k))).collect();
        (sparsity, pairs)
    } else {
        let (nrows, ncols) = matrix.shape();
        let sparsity = Sparsity::dense(nrows, ncols);
        let mut pairs = Vec::with_capacity(nrows * ncols);
        for i in 0..nrows {
            let base = matrix.sparsity().row_ptrs()[i];
            let row = matrix.sparsity().row_cols(i);
            let mut p = 0;
            for j in 0..ncols {
                let k_matrix = (p < row.len() && row[p] == j).then(|| {
                    p += 1;
                    base + p - 1
                });
                pairs.push(pair(k_matrix));
            }
        }
        (sparsity, pairs)
    }
}

/// Elementwise unary node
///
/// A structurally zero operand of a zero-preserving operation short-circuits
/// to a structural zero. Non-zero-preserving operations densify: structurally
/// absent positions of the operand become explicit result nonzeros with
/// value f(0).
pub(crate) fn make_unary(op: UnaryOp, x: &Expr) -> Expr {
    if op.zero_preserving() && x.is_zero() {
        return x.zeros_like();
    }
    let sparsity = if op.zero_preserving() {
        x.sparsity().clone()
    } else {
        Sparsity::dense(x.nrows(), x.ncols())
    };
    Expr::from_node(ExprNode::Unary {
        op,
        sparsity,
        dep: x.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_takes_pattern_union() {
        let x = Expr::sym_with("x", Sparsity::diagonal(2));
        let y = Expr::sym("y", 2, 2);
        let z = make_binary(BinaryOp::Add, &x, &y).unwrap();
        assert!(z.is_dense());
        assert!(z.is_op(BinaryOp::Add));
    }

    #[test]
    fn test_mul_takes_pattern_intersection() {
        let x = Expr::sym_with("x", Sparsity::diagonal(2));
        let y = Expr::sym("y", 2, 2);
        let z = make_binary(BinaryOp::Mul, &x, &y).unwrap();
        assert_eq!(z.nnz(), 2);
        assert!(z.sparsity().is_diagonal());
    }

    #[test]
    fn test_pow_densifies() {
        let x = Expr::sym_with("x", Sparsity::diagonal(2));
        let y = Expr::sym_with("y", Sparsity::diagonal(2));
        let z = make_binary(BinaryOp::Pow, &x, &y).unwrap();
        assert!(z.is_dense());
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let x = Expr::sym("x", 2, 3);
        let y = Expr::sym("y", 3, 2);
        assert!(make_binary(BinaryOp::Add, &x, &y).is_err());
    }

    #[test]
    fn test_scalar_broadcast_mul_keeps_matrix_pattern() {
        let s = Expr::sym("s", 1, 1);
        let y = Expr::sym_with("y", Sparsity::diagonal(3));
        let z = make_binary(BinaryOp::Mul, &s, &y).unwrap();
        assert_eq!(z.shape(), (3, 3));
        assert!(z.sparsity().is_diagonal());
    }

    #[test]
    fn test_scalar_broadcast_add_densifies() {
        let s = Expr::sym("s", 1, 1);
        let y = Expr::sym_with("y", Sparsity::diagonal(3));
        let z = make_binary(BinaryOp::Add, &s, &y).unwrap();
        assert_eq!(z.shape(), (3, 3));
        assert!(z.is_dense());
    }

    #[test]
    fn test_mul_by_structural_zero_short_circuits() {
        let x = Expr::sym("x", 2, 2);
        let z = make_binary(BinaryOp::Mul, &x, &Expr::zeros(2, 2)).unwrap();
        assert!(z.is_zero());
        assert_eq!(z.ndep(), 0);
    }

    #[test]
    fn test_unary_sparsity() {
        let x = Expr::sym_with("x", Sparsity::diagonal(2));
        assert!(make_unary(UnaryOp::Sin, &x).sparsity().is_diagonal());
        assert!(make_unary(UnaryOp::Cos, &x).is_dense());
    }

    #[test]
    fn test_unary_zero_short_circuit() {
        let z = make_unary(UnaryOp::Neg, &Expr::zeros(2, 2));
        assert!(z.is_zero());
        assert_eq!(z.ndep(), 0);
    }
}
