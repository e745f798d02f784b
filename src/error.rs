//! Error types for symr

use thiserror::Error;

/// Result type alias using symr's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while constructing or evaluating expression graphs
///
/// All failures are synchronous and raised at the point of contract violation;
/// they signal incorrect graph construction by the caller, never a transient
/// condition.
#[derive(Error, Debug)]
pub enum Error {
    /// Incompatible shapes in a binary operation or assignment
    #[error("Dimension mismatch in '{op}': {}x{} vs {}x{}", lhs.0, lhs.1, rhs.0, rhs.1)]
    DimensionMismatch {
        /// The operation that was attempted
        op: &'static str,
        /// Left-hand side shape (rows, cols)
        lhs: (usize, usize),
        /// Right-hand side shape (rows, cols)
        rhs: (usize, usize),
    },

    /// Flat or structural index beyond element/nonzero bounds
    #[error("Index {index} out of range: {what} has {bound} entries")]
    IndexOutOfRange {
        /// The offending index, as given (may be negative)
        index: isize,
        /// The exclusive bound that was violated
        bound: usize,
        /// What was being indexed
        what: &'static str,
    },

    /// Invalid argument provided to an operation
    #[error("Invalid argument to '{op}': {reason}")]
    InvalidArgument {
        /// The operation name
        op: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// Operation requested on operands it is not defined for
    #[error("Unsupported operation '{op}': {reason}")]
    UnsupportedOperation {
        /// The operation name
        op: &'static str,
        /// Why the operands are not supported
        reason: String,
    },

    /// A free symbol was evaluated without a substitution for it
    #[error("Cannot evaluate free symbol '{name}' without a substitution")]
    UnresolvedSymbol {
        /// Name of the symbolic leaf
        name: String,
    },
}

impl Error {
    /// Create a dimension mismatch error
    pub fn dimension_mismatch(
        op: &'static str,
        lhs: (usize, usize),
        rhs: (usize, usize),
    ) -> Self {
        Self::DimensionMismatch { op, lhs, rhs }
    }

    /// Create an index out of range error
    pub fn index_out_of_range(index: isize, bound: usize, what: &'static str) -> Self {
        Self::IndexOutOfRange { index, bound, what }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(op: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            op,
            reason: reason.into(),
        }
    }

    /// Create an unsupported operation error
    pub fn unsupported(op: &'static str, reason: impl Into<String>) -> Self {
        Self::UnsupportedOperation {
            op,
            reason: reason.into(),
        }
    }
}
