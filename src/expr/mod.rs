//! The symbolic expression graph
//!
//! Expressions are directed acyclic graphs of matrix-valued nodes, built
//! through operator overloads and the factory and indexing methods on
//! [`Expr`]. Construction eagerly applies structural simplifications, so the
//! graph handed to evaluation is already free of trivially redundant nodes.

mod arith;
mod binary;
mod eval;
mod handle;
mod indexing;
mod mapping;
mod node;
mod product;

pub use handle::Expr;
pub use mapping::unite;
pub use product::{inner_prod, outer_prod, prod};
