//! Core matrix implementation: struct, creation, getters

use crate::error::{Error, Result};
use crate::scalar::Scalar;
use crate::sparsity::Sparsity;

/// Sparse matrix of values over a shared sparsity pattern
///
/// `values[k]` is the value of the k-th structural nonzero, in the pattern's
/// row-major nonzero order. Positions absent from the pattern are structural
/// zeros and read as `T::zero()`.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T> {
    sparsity: Sparsity,
    values: Vec<T>,
}

impl<T: Scalar> Matrix<T> {
    /// Create a matrix from a pattern and its nonzero values
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the value count differs from the
    /// pattern's nonzero count.
    pub fn new(sparsity: Sparsity, values: Vec<T>) -> Result<Self> {
        if values.len() != sparsity.nnz() {
            return Err(Error::invalid_argument(
                "Matrix::new",
                format!(
                    "expected {} values for pattern {}, got {}",
                    sparsity.nnz(),
                    sparsity.dim_string(),
                    values.len()
                ),
            ));
        }
        Ok(Self { sparsity, values })
    }

    /// Structurally empty matrix (every element a structural zero)
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self {
            sparsity: Sparsity::empty(nrows, ncols),
            values: Vec::new(),
        }
    }

    /// Dense matrix of ones
    pub fn ones(nrows: usize, ncols: usize) -> Self {
        Self::filled(Sparsity::dense(nrows, ncols), T::one())
    }

    /// Identity matrix with a diagonal sparsity pattern
    pub fn eye(n: usize) -> Self {
        Self::filled(Sparsity::diagonal(n), T::one())
    }

    /// Dense 1x1 matrix
    pub fn scalar(value: T) -> Self {
        Self {
            sparsity: Sparsity::scalar(),
            values: vec![value],
        }
    }

    /// Diagonal matrix from the given diagonal values
    pub fn diag(values: &[T]) -> Self {
        Self {
            sparsity: Sparsity::diagonal(values.len()),
            values: values.to_vec(),
        }
    }

    /// Dense matrix from row-major element data
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `data.len() != nrows * ncols`.
    pub fn from_dense(nrows: usize, ncols: usize, data: &[T]) -> Result<Self> {
        if data.len() != nrows * ncols {
            return Err(Error::invalid_argument(
                "Matrix::from_dense",
                format!(
                    "expected {} elements for a {}x{} matrix, got {}",
                    nrows * ncols,
                    nrows,
                    ncols,
                    data.len()
                ),
            ));
        }
        Ok(Self {
            sparsity: Sparsity::dense(nrows, ncols),
            values: data.to_vec(),
        })
    }

    /// Matrix with the given pattern and every nonzero set to `value`
    pub fn filled(sparsity: Sparsity, value: T) -> Self {
        let values = vec![value; sparsity.nnz()];
        Self { sparsity, values }
    }

    /// The sparsity pattern
    #[inline]
    pub fn sparsity(&self) -> &Sparsity {
        &self.sparsity
    }

    /// Number of rows
    #[inline]
    pub fn nrows(&self) -> usize {
        self.sparsity.nrows()
    }

    /// Number of columns
    #[inline]
    pub fn ncols(&self) -> usize {
        self.sparsity.ncols()
    }

    /// Number of structural nonzeros
    #[inline]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Total number of elements
    #[inline]
    pub fn numel(&self) -> usize {
        self.sparsity.numel()
    }

    /// Whether every element is structurally nonzero
    #[inline]
    pub fn is_dense(&self) -> bool {
        self.sparsity.is_dense()
    }

    /// The nonzero values, in the pattern's nonzero order
    #[inline]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Value at (i, j); structural zeros read as `T::zero()`
    pub fn get(&self, i: usize, j: usize) -> T {
        match self.sparsity.locate(i, j) {
            Some(k) => self.values[k].clone(),
            None => T::zero(),
        }
    }

    /// Row-major dense copy of all elements
    pub fn to_dense(&self) -> Vec<T> {
        let mut out = vec![T::zero(); self.numel()];
        let ncols = self.ncols();
        for (k, (i, j)) in self.sparsity.entries().enumerate() {
            out[i * ncols + j] = self.values[k].clone();
        }
        out
    }

    /// Convert an `f64` matrix into this scalar domain
    pub fn from_f64_matrix(m: &Matrix<f64>) -> Self {
        Self {
            sparsity: m.sparsity.clone(),
            values: m.values.iter().map(|&v| T::from_f64(v)).collect(),
        }
    }

    pub(crate) fn sparsity_mut(&mut self) -> &mut Sparsity {
        &mut self.sparsity
    }

    pub(crate) fn from_parts(sparsity: Sparsity, values: Vec<T>) -> Self {
        debug_assert_eq!(sparsity.nnz(), values.len());
        Self { sparsity, values }
    }
}
