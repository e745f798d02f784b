//! Sparse value matrices: a sparsity pattern plus a parallel value vector
//!
//! [`Matrix<f64>`] is the payload of constant leaves and the numeric
//! evaluation domain; a [`Matrix`] over an external algebraic scalar type is
//! the substitution domain.

mod core;
mod ops;

pub use core::Matrix;
pub(crate) use ops::{mul_trans, mul_trans_pattern};
