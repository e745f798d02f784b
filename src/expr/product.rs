//! Matrix products
//!
//! The general case allocates a Multiplication node holding the left operand
//! and the transposed right operand, so evaluation merges two row-compressed
//! patterns row against row. Structurally recognizable special cases are
//! rewritten to cheaper node kinds before that happens.

use super::Expr;
use super::node::ExprNode;
use crate::error::{Error, Result};
use crate::matrix::mul_trans_pattern;
use crate::sparsity::{CombineMode, combine};

/// Multiplication node over a left operand and an already transposed right
/// operand, with the incidence sparsity
pub(crate) fn multiplication(lhs: &Expr, rhs_t: &Expr) -> Expr {
    let sparsity = mul_trans_pattern(lhs.sparsity(), rhs_t.sparsity());
    Expr::from_node(ExprNode::Multiplication {
        sparsity,
        lhs: lhs.clone(),
        rhs_t: rhs_t.clone(),
    })
}

/// Matrix product `x * y`
///
/// A 1x1 operand multiplies elementwise. Structural special cases never
/// allocate a product node: an identity operand returns the other operand, a
/// structurally zero operand returns a structural zero, and a constant
/// diagonal operand against a vector reduces to an elementwise product.
///
/// # Errors
///
/// Returns `DimensionMismatch` when the inner dimensions disagree.
pub fn prod(x: &Expr, y: &Expr) -> Result<Expr> {
    if x.is_scalar() || y.is_scalar() {
        return super::arith::mul(x, y);
    }
    if x.ncols() != y.nrows() {
        return Err(Error::dimension_mismatch("prod", x.shape(), y.shape()));
    }
    if x.is_identity() {
        return Ok(y.clone());
    }
    if y.is_identity() {
        return Ok(x.clone());
    }
    if x.is_zero() || y.is_zero() {
        return Ok(Expr::zeros(x.nrows(), y.ncols()));
    }
    // diag(d) * v == d .* v for a column vector v
    if x.is_constant() && x.sparsity().is_diagonal() && y.ncols() == 1 {
        return super::arith::mul(&x.diag()?, y);
    }
    // v^T * diag(d) == v^T .* d^T for a row vector v^T
    if y.is_constant() && y.sparsity().is_diagonal() && x.nrows() == 1 {
        return super::arith::mul(x, &y.diag()?.transpose());
    }
    Ok(multiplication(x, &y.transpose()))
}

/// Inner product of two column vectors, as a 1x1 expression
///
/// Built as a sum of per-nonzero products over the positions structurally
/// nonzero in both operands; disjoint patterns yield a structural zero.
///
/// # Errors
///
/// Returns `InvalidArgument` unless both operands are column vectors and
/// `DimensionMismatch` when their lengths differ.
pub fn inner_prod(x: &Expr, y: &Expr) -> Result<Expr> {
    if x.ncols() != 1 || y.ncols() != 1 {
        return Err(Error::invalid_argument(
            "inner_prod",
            format!(
                "expected column vectors, got {} and {}",
                x.dim_string(),
                y.dim_string()
            ),
        ));
    }
    if x.nrows() != y.nrows() {
        return Err(Error::dimension_mismatch("inner_prod", x.shape(), y.shape()));
    }
    let (_, pairs) = combine(x.sparsity(), y.sparsity(), CombineMode::Intersect)?;
    let mut sum = Expr::from(0.0);
    for (ka, kb) in pairs {
        // Intersect mode only yields positions present in both operands.
        if let (Some(ka), Some(kb)) = (ka, kb) {
            let term = super::arith::mul(&x.get_nz(ka as isize)?, &y.get_nz(kb as isize)?)?;
            sum = super::arith::add(&sum, &term)?;
        }
    }
    Ok(sum)
}

/// Outer product of two column vectors
///
/// # Errors
///
/// Returns `InvalidArgument` unless both operands are column vectors.
pub fn outer_prod(x: &Expr, y: &Expr) -> Result<Expr> {
    if x.ncols() != 1 || y.ncols() != 1 {
        return Err(Error::invalid_argument(
            "outer_prod",
            format!(
                "expected column vectors, got {} and {}",
                x.dim_string(),
                y.dim_string()
            ),
        ));
    }
    prod(x, &y.transpose())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sparsity::Sparsity;

    #[test]
    fn test_prod_allocates_multiplication_node() {
        let x = Expr::sym("x", 2, 3);
        let y = Expr::sym("y", 3, 2);
        let z = prod(&x, &y).unwrap();
        assert!(z.is_multiplication());
        assert_eq!(z.shape(), (2, 2));
        // the stored right operand is the transpose
        assert_eq!(z.dep(1).unwrap().shape(), (2, 3));
    }

    #[test]
    fn test_prod_inner_dimension_checked() {
        let x = Expr::sym("x", 2, 3);
        let y = Expr::sym("y", 2, 3);
        assert!(prod(&x, &y).is_err());
    }

    #[test]
    fn test_prod_identity_collapses() {
        let x = Expr::sym("x", 2, 2);
        assert!(prod(&Expr::eye(2), &x).unwrap().ptr_eq(&x));
        assert!(prod(&x, &Expr::eye(2)).unwrap().ptr_eq(&x));
    }

    #[test]
    fn test_prod_zero_collapses() {
        let x = Expr::sym("x", 2, 3);
        let z = prod(&x, &Expr::zeros(3, 4)).unwrap();
        assert!(z.is_zero());
        assert_eq!(z.shape(), (2, 4));
    }

    #[test]
    fn test_prod_scalar_is_elementwise() {
        let s = Expr::sym("s", 1, 1);
        let x = Expr::sym("x", 2, 2);
        let z = prod(&s, &x).unwrap();
        assert!(!z.is_multiplication());
        assert_eq!(z.shape(), (2, 2));
    }

    #[test]
    fn test_prod_diagonal_times_vector_is_elementwise() {
        let d = Expr::diagonal(&[2.0, 3.0]);
        let v = Expr::sym("v", 2, 1);
        let z = prod(&d, &v).unwrap();
        assert!(!z.is_multiplication());
        assert_eq!(z.shape(), (2, 1));
    }

    #[test]
    fn test_inner_prod_disjoint_patterns_is_zero() {
        let top = Sparsity::from_compressed(2, 1, vec![0, 1, 1], vec![0]).unwrap();
        let bottom = Sparsity::from_compressed(2, 1, vec![0, 0, 1], vec![0]).unwrap();
        let x = Expr::sym_with("x", top);
        let y = Expr::sym_with("y", bottom);
        let z = inner_prod(&x, &y).unwrap();
        assert!(z.is_zero());
        assert!(z.is_scalar());
    }

    #[test]
    fn test_inner_prod_rejects_non_vectors() {
        let x = Expr::sym("x", 2, 2);
        assert!(inner_prod(&x, &x).is_err());
    }

    #[test]
    fn test_outer_prod_shape() {
        let x = Expr::sym("x", 2, 1);
        let y = Expr::sym("y", 3, 1);
        let z = outer_prod(&x, &y).unwrap();
        assert_eq!(z.shape(), (2, 3));
    }
}
