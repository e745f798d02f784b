//! Sparsity patterns: structural nonzero layout of a matrix
//!
//! A [`Sparsity`] describes which positions of a matrix are structurally
//! nonzero, independent of any numeric value. Patterns are reference-counted
//! and immutable once shared; every mutating operation either produces a new
//! pattern or copies on write.

mod ops;
mod pattern;

pub use ops::CombineMode;
pub use pattern::Sparsity;

pub(crate) use ops::combine;
pub(crate) use pattern::SparsityData;
