//! Numeric kernels for Multiplication nodes

use super::Matrix;
use crate::ops::BinaryOp;
use crate::scalar::Scalar;
use crate::sparsity::{Sparsity, SparsityData};

/// Incidence pattern of `a * b_t^T`
///
/// Result (i, j) is structurally nonzero iff row i of `a` and row j of `b_t`
/// share a nonzero column. Shapes must already be validated by the caller.
pub(crate) fn mul_trans_pattern(a: &Sparsity, b_t: &Sparsity) -> Sparsity {
    let nrows = a.nrows();
    let ncols = b_t.nrows();
    let mut row_ptrs = Vec::with_capacity(nrows + 1);
    row_ptrs.push(0);
    let mut cols = Vec::new();
    for i in 0..nrows {
        for j in 0..ncols {
            if rows_intersect(a.row_cols(i), b_t.row_cols(j)) {
                cols.push(j);
            }
        }
        row_ptrs.push(cols.len());
    }
    Sparsity::from_data(SparsityData {
        nrows,
        ncols,
        row_ptrs,
        cols,
    })
}

fn rows_intersect(a: &[usize], b: &[usize]) -> bool {
    let (mut pa, mut pb) = (0, 0);
    while pa < a.len() && pb < b.len() {
        match a[pa].cmp(&b[pb]) {
            std::cmp::Ordering::Equal => return true,
            std::cmp::Ordering::Less => pa += 1,
            std::cmp::Ordering::Greater => pb += 1,
        }
    }
    false
}

/// Sparse product of `x` with the transpose of `y_t`, over a fixed pattern
///
/// `out` must be (a superset of) the incidence pattern; positions with an
/// empty intersection evaluate to zero.
pub(crate) fn mul_trans<T: Scalar>(x: &Matrix<T>, y_t: &Matrix<T>, out: &Sparsity) -> Matrix<T> {
    let mut values = Vec::with_capacity(out.nnz());
    for (i, j) in out.entries() {
        values.push(dot_rows(x, i, y_t, j));
    }
    Matrix::from_parts(out.clone(), values)
}

fn dot_rows<T: Scalar>(x: &Matrix<T>, i: usize, y_t: &Matrix<T>, j: usize) -> T {
    let xa = x.sparsity().row_ptrs()[i];
    let ya = y_t.sparsity().row_ptrs()[j];
    let x_row = x.sparsity().row_cols(i);
    let y_row = y_t.sparsity().row_cols(j);
    let (mut px, mut py) = (0, 0);
    let mut sum = T::zero();
    while px < x_row.len() && py < y_row.len() {
        match x_row[px].cmp(&y_row[py]) {
            std::cmp::Ordering::Equal => {
                let prod = T::apply_binary(
                    BinaryOp::Mul,
                    x.values()[xa + px].clone(),
                    y_t.values()[ya + py].clone(),
                );
                sum = T::apply_binary(BinaryOp::Add, sum, prod);
                px += 1;
                py += 1;
            }
            std::cmp::Ordering::Less => px += 1,
            std::cmp::Ordering::Greater => py += 1,
        }
    }
    sum
}
