//! Symbolic sparse matrix expressions
//!
//! `symr` builds directed acyclic graphs of matrix-valued operations.
//! Symbolic leaves, constants, elementwise arithmetic, matrix products and
//! sparse submatrix indexing all produce [`Expr`] handles, which are cheap
//! reference-counted pointers into the shared graph. Every node carries a
//! [`Sparsity`] pattern, inferred at construction time, so structural zeros
//! are never stored and never computed with.
//!
//! Construction simplifies eagerly: adding a structural zero, multiplying by
//! a constant one, or extracting a full submatrix returns an existing node
//! instead of allocating a new one. Assignment through a handle rebinds that
//! handle only; aliasing handles keep seeing the original node.
//!
//! Evaluation is per node and generic over the scalar domain via [`Scalar`]:
//! numeric matrices, an external algebraic scalar type, or the graph itself
//! (rebuilding with substituted dependencies).
//!
//! ```
//! use symr::{Expr, Matrix};
//!
//! let x = Expr::sym("x", 2, 2);
//! let f = x.sin() * 2.0;
//!
//! // evaluation is per node, scheduled by the caller: dependencies first
//! let xv = Matrix::from_dense(2, 2, &[0.0, 0.5, 1.0, 1.5])?;
//! let sv = f.dep(0).unwrap().eval(&[xv])?;
//! let cv = f.dep(1).unwrap().eval::<f64>(&[])?;
//! let out = f.eval(&[sv, cv])?;
//! assert_eq!(out.get(0, 0), 0.0);
//! # Ok::<(), symr::Error>(())
//! ```
//!
//! Handles use non-atomic reference counting and are not `Send` or `Sync`;
//! a graph belongs to the thread that builds it.

#![warn(missing_docs)]

pub mod error;
pub mod expr;
pub mod matrix;
pub mod ops;
pub mod scalar;
pub mod sparsity;

pub use error::{Error, Result};
pub use expr::{Expr, inner_prod, outer_prod, prod, unite};
pub use matrix::Matrix;
pub use ops::{BinaryOp, UnaryOp};
pub use scalar::Scalar;
pub use sparsity::Sparsity;
