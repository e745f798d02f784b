//! Core sparsity pattern: struct, factories, getters

use std::fmt;
use std::rc::Rc;

/// Row-compressed pattern storage
///
/// Invariant: `row_ptrs` has length `nrows + 1`, is monotonic, and
/// `cols[row_ptrs[i]..row_ptrs[i + 1]]` is strictly increasing for every row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SparsityData {
    pub(crate) nrows: usize,
    pub(crate) ncols: usize,
    pub(crate) row_ptrs: Vec<usize>,
    pub(crate) cols: Vec<usize>,
}

/// Shared, row-compressed sparsity pattern of a matrix
///
/// Cloning a `Sparsity` is O(1); the underlying coordinate lists are shared.
/// Nonzero entries are indexed in row-major order, so the k-th structural
/// nonzero of a dense pattern sits at flat offset k.
#[derive(Clone)]
pub struct Sparsity(pub(crate) Rc<SparsityData>);

impl Sparsity {
    pub(crate) fn from_data(data: SparsityData) -> Self {
        debug_assert_eq!(data.row_ptrs.len(), data.nrows + 1);
        debug_assert_eq!(*data.row_ptrs.last().unwrap(), data.cols.len());
        Self(Rc::new(data))
    }

    /// Create a pattern from row-compressed components
    ///
    /// `row_ptrs` must have length `nrows + 1`, start at 0, be monotonic, and
    /// end at `cols.len()`; column indices must be strictly increasing within
    /// each row and below `ncols`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` or `IndexOutOfRange` when the components are
    /// inconsistent.
    pub fn from_compressed(
        nrows: usize,
        ncols: usize,
        row_ptrs: Vec<usize>,
        cols: Vec<usize>,
    ) -> crate::error::Result<Self> {
        use crate::error::Error;
        if row_ptrs.len() != nrows + 1 {
            return Err(Error::invalid_argument(
                "Sparsity::from_compressed",
                format!("row_ptrs must have length {}, got {}", nrows + 1, row_ptrs.len()),
            ));
        }
        if row_ptrs[0] != 0 || row_ptrs[nrows] != cols.len() {
            return Err(Error::invalid_argument(
                "Sparsity::from_compressed",
                format!(
                    "row_ptrs must span 0..={}, got {}..={}",
                    cols.len(),
                    row_ptrs[0],
                    row_ptrs[nrows]
                ),
            ));
        }
        for i in 0..nrows {
            if row_ptrs[i] > row_ptrs[i + 1] {
                return Err(Error::invalid_argument(
                    "Sparsity::from_compressed",
                    "row_ptrs must be monotonic",
                ));
            }
            let row = &cols[row_ptrs[i]..row_ptrs[i + 1]];
            if !row.windows(2).all(|w| w[0] < w[1]) {
                return Err(Error::invalid_argument(
                    "Sparsity::from_compressed",
                    format!("columns in row {i} must be strictly increasing"),
                ));
            }
            if row.last().is_some_and(|&j| j >= ncols) {
                return Err(Error::index_out_of_range(
                    *row.last().unwrap() as isize,
                    ncols,
                    "cols",
                ));
            }
        }
        Ok(Self::from_data(SparsityData {
            nrows,
            ncols,
            row_ptrs,
            cols,
        }))
    }

    /// Fully dense pattern of the given shape
    pub fn dense(nrows: usize, ncols: usize) -> Self {
        let row_ptrs = (0..=nrows).map(|i| i * ncols).collect();
        let cols = (0..nrows).flat_map(|_| 0..ncols).collect();
        Self::from_data(SparsityData {
            nrows,
            ncols,
            row_ptrs,
            cols,
        })
    }

    /// Pattern of the given shape with no structural nonzeros
    pub fn empty(nrows: usize, ncols: usize) -> Self {
        Self::from_data(SparsityData {
            nrows,
            ncols,
            row_ptrs: vec![0; nrows + 1],
            cols: Vec::new(),
        })
    }

    /// Square diagonal pattern with n structural nonzeros
    pub fn diagonal(n: usize) -> Self {
        Self::from_data(SparsityData {
            nrows: n,
            ncols: n,
            row_ptrs: (0..=n).collect(),
            cols: (0..n).collect(),
        })
    }

    /// Dense 1x1 pattern
    pub fn scalar() -> Self {
        Self::dense(1, 1)
    }

    /// Structurally empty 1x1 pattern
    pub fn scalar_empty() -> Self {
        Self::empty(1, 1)
    }

    /// Number of rows
    #[inline]
    pub fn nrows(&self) -> usize {
        self.0.nrows
    }

    /// Number of columns
    #[inline]
    pub fn ncols(&self) -> usize {
        self.0.ncols
    }

    /// Shape as (rows, cols)
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.0.nrows, self.0.ncols)
    }

    /// Number of structural nonzeros
    #[inline]
    pub fn nnz(&self) -> usize {
        self.0.cols.len()
    }

    /// Total number of elements (rows * cols)
    #[inline]
    pub fn numel(&self) -> usize {
        self.0.nrows * self.0.ncols
    }

    /// Whether every element is structurally nonzero
    #[inline]
    pub fn is_dense(&self) -> bool {
        self.numel() == self.nnz()
    }

    /// Whether this is a 1x1 pattern
    #[inline]
    pub fn is_scalar(&self) -> bool {
        self.numel() == 1
    }

    /// Whether the pattern is square with all nonzeros on the main diagonal
    pub fn is_diagonal(&self) -> bool {
        if self.0.nrows != self.0.ncols {
            return false;
        }
        self.entries().all(|(i, j)| i == j)
    }

    /// Row pointer list (length nrows + 1)
    #[inline]
    pub fn row_ptrs(&self) -> &[usize] {
        &self.0.row_ptrs
    }

    /// Column index list (length nnz, sorted within each row)
    #[inline]
    pub fn cols(&self) -> &[usize] {
        &self.0.cols
    }

    /// Column indices of the structural nonzeros in one row
    #[inline]
    pub fn row_cols(&self, row: usize) -> &[usize] {
        &self.0.cols[self.0.row_ptrs[row]..self.0.row_ptrs[row + 1]]
    }

    /// Nonzero index of element (i, j), or None if structurally zero
    pub fn locate(&self, i: usize, j: usize) -> Option<usize> {
        if i >= self.0.nrows || j >= self.0.ncols {
            return None;
        }
        let start = self.0.row_ptrs[i];
        let row = &self.0.cols[start..self.0.row_ptrs[i + 1]];
        row.binary_search(&j).ok().map(|p| start + p)
    }

    /// Iterate over structural nonzeros as (row, col) in nonzero order
    pub fn entries(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.0.nrows).flat_map(move |i| self.row_cols(i).iter().map(move |&j| (i, j)))
    }

    /// Human-readable dimension string for diagnostics
    ///
    /// Format: `(rows x cols = numel | nnz)`. Free-form, not machine-parsed.
    pub fn dim_string(&self) -> String {
        format!(
            "({}x{}={}|{})",
            self.nrows(),
            self.ncols(),
            self.numel(),
            self.nnz()
        )
    }
}

impl PartialEq for Sparsity {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0) || *self.0 == *other.0
    }
}

impl Eq for Sparsity {}

impl fmt::Debug for Sparsity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sparsity{}", self.dim_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dense_pattern() {
        let sp = Sparsity::dense(2, 3);
        assert_eq!(sp.shape(), (2, 3));
        assert_eq!(sp.nnz(), 6);
        assert!(sp.is_dense());
        assert_eq!(sp.locate(1, 2), Some(5));
        assert_eq!(sp.dim_string(), "(2x3=6|6)");
    }

    #[test]
    fn test_empty_pattern() {
        let sp = Sparsity::empty(3, 3);
        assert_eq!(sp.nnz(), 0);
        assert!(!sp.is_dense());
        assert_eq!(sp.locate(1, 1), None);
    }

    #[test]
    fn test_diagonal_pattern() {
        let sp = Sparsity::diagonal(3);
        assert!(sp.is_diagonal());
        assert_eq!(sp.nnz(), 3);
        assert_eq!(sp.locate(2, 2), Some(2));
        assert_eq!(sp.locate(0, 1), None);
        assert!(!Sparsity::dense(2, 2).is_diagonal());
        assert!(Sparsity::empty(2, 2).is_diagonal());
    }

    #[test]
    fn test_nonzero_order_is_row_major() {
        let sp = Sparsity::dense(2, 2);
        let entries: Vec<_> = sp.entries().collect();
        assert_eq!(entries, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn test_equality_is_structural() {
        let a = Sparsity::dense(2, 2);
        let b = Sparsity::dense(2, 2);
        assert_eq!(a, b);
        assert_ne!(a, Sparsity::empty(2, 2));
    }
}
