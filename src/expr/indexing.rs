//! Submatrix and nonzero access
//!
//! Reads build Mapping nodes that gather from the source expression;
//! assignments build Mapping nodes that combine the unchanged part of the
//! original expression with the assigned value. Assignment through a handle
//! rebinds that handle only; other handles to the original node are
//! unaffected.

use super::Expr;
use super::mapping::{MappingBuilder, unite};
use crate::error::{Error, Result};
use crate::sparsity::Sparsity;

/// Resolve a possibly negative index against a bound
///
/// Negative indices count from the end: -1 addresses the last valid index.
fn normalize_index(index: isize, bound: usize, what: &'static str) -> Result<usize> {
    let resolved = if index < 0 {
        index + bound as isize
    } else {
        index
    };
    if resolved < 0 || resolved as usize >= bound {
        return Err(Error::index_out_of_range(index, bound, what));
    }
    Ok(resolved as usize)
}

fn normalize_all(indices: &[isize], bound: usize, what: &'static str) -> Result<Vec<usize>> {
    indices
        .iter()
        .map(|&i| normalize_index(i, bound, what))
        .collect()
}

impl Expr {
    /// Submatrix addressed by the given rows and columns
    ///
    /// The result is `rows.len() x cols.len()`; its pattern is the
    /// restriction of this expression's pattern to the addressed region.
    /// Negative indices count from the end.
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfRange` for any index outside the shape.
    pub fn get_sub(&self, rows: &[isize], cols: &[isize]) -> Result<Expr> {
        let rows = normalize_all(rows, self.nrows(), "rows")?;
        let cols = normalize_all(cols, self.ncols(), "cols")?;
        let (sp, mapping) = self.sparsity().sub(&rows, &cols)?;
        let mut b = MappingBuilder::new(sp);
        b.add_dep(self, &mapping);
        Ok(b.build())
    }

    /// Single element (i, j) as a 1x1 expression
    ///
    /// A structurally zero position yields a structurally zero scalar.
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfRange` for an index outside the shape.
    pub fn get_element(&self, i: isize, j: isize) -> Result<Expr> {
        let i = normalize_index(i, self.nrows(), "rows")?;
        let j = normalize_index(j, self.ncols(), "cols")?;
        match self.sparsity().locate(i, j) {
            Some(k) => {
                let mut b = MappingBuilder::new(Sparsity::scalar());
                b.add_dep(self, &[k]);
                Ok(b.build())
            }
            None => Ok(Expr::zeros(1, 1)),
        }
    }

    /// The k-th structural nonzero as a 1x1 expression
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfRange` when `k` is outside the nonzero count.
    pub fn get_nz(&self, k: isize) -> Result<Expr> {
        let k = normalize_index(k, self.nnz(), "nonzeros")?;
        let mut b = MappingBuilder::new(Sparsity::scalar());
        b.add_dep(self, &[k]);
        Ok(b.build())
    }

    /// The addressed structural nonzeros as a dense column vector
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfRange` when any index is outside the nonzero count.
    pub fn get_nz_list(&self, kk: &[isize]) -> Result<Expr> {
        let kk = normalize_all(kk, self.nnz(), "nonzeros")?;
        let mut b = MappingBuilder::new(Sparsity::dense(kk.len(), 1));
        b.add_dep(self, &kk);
        Ok(b.build())
    }

    /// Assign into the addressed structural nonzeros, rebinding this handle
    ///
    /// The sparsity pattern is unchanged; only the addressed slots take their
    /// value from `value`. The value must have one nonzero per index, or be a
    /// scalar broadcast to every addressed slot. A repeated index takes the
    /// last write, in list order.
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfRange` for an index outside the nonzero count and
    /// `InvalidArgument` when the value's nonzero count fits neither case.
    pub fn set_nz(&mut self, kk: &[isize], value: &Expr) -> Result<()> {
        let kk = normalize_all(kk, self.nnz(), "nonzeros")?;
        let broadcast = value.numel() == 1 && value.nnz() <= 1;
        if !broadcast && value.nnz() != kk.len() {
            return Err(Error::invalid_argument(
                "set_nz",
                format!(
                    "expected a scalar or {} nonzeros, got {}",
                    kk.len(),
                    value.dim_string()
                ),
            ));
        }
        // A structurally empty scalar still writes a numeric zero.
        let value = if broadcast && value.nnz() == 0 {
            Expr::from(0.0)
        } else {
            value.clone()
        };

        let mut b = MappingBuilder::new(self.sparsity().clone());
        let identity: Vec<usize> = (0..self.nnz()).collect();
        b.add_dep(self, &identity);
        b.add_dependency(
            &value,
            kk.iter()
                .enumerate()
                .map(|(i, &dst)| (dst, if broadcast { 0 } else { i })),
        );
        *self = b.build();
        Ok(())
    }

    /// Assign a submatrix into the addressed region, rebinding this handle
    ///
    /// The value must be `rows.len() x cols.len()`, or a scalar broadcast
    /// over the region. When the region is not fully dense on both sides, the
    /// pattern of the result changes to match the assignment: positions of
    /// the region absent from the value become structural zeros, positions
    /// present in the value become structural nonzeros.
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfRange` for indices outside the shape,
    /// `DimensionMismatch` for a value of the wrong shape, and
    /// `InvalidArgument` when a sparse assignment is given repeated or
    /// unsorted indices.
    pub fn set_sub(&mut self, rows: &[isize], cols: &[isize], value: &Expr) -> Result<()> {
        let rows = normalize_all(rows, self.nrows(), "rows")?;
        let cols = normalize_all(cols, self.ncols(), "cols")?;
        let value = if value.is_scalar() && (rows.len(), cols.len()) != (1, 1) {
            Expr::filled(rows.len(), cols.len(), value)?
        } else {
            value.clone()
        };
        if value.shape() != (rows.len(), cols.len()) {
            return Err(Error::dimension_mismatch(
                "set_sub",
                (rows.len(), cols.len()),
                value.shape(),
            ));
        }

        if self.is_dense() && value.is_dense() {
            // The pattern cannot change; a single gather suffices. Repeated
            // and unsorted indices are fine here, with the last write taken.
            let ncols = self.ncols();
            let width = cols.len();
            let mut b = MappingBuilder::new(self.sparsity().clone());
            let identity: Vec<usize> = (0..self.nnz()).collect();
            b.add_dep(self, &identity);
            b.add_dependency(
                &value,
                rows.iter().enumerate().flat_map(|(vi, &i)| {
                    cols.iter()
                        .enumerate()
                        .map(move |(vj, &j)| (i * ncols + j, vi * width + vj))
                }),
            );
            *self = b.build();
            return Ok(());
        }

        // Sparse path: the region is cut out of the pattern, the value is
        // embedded at the addressed positions, and the two are united. The
        // embedding requires strictly increasing index lists.
        for list in [&rows, &cols] {
            if !list.windows(2).all(|w| w[0] < w[1]) {
                return Err(Error::invalid_argument(
                    "set_sub",
                    "sparse assignment requires strictly increasing index lists",
                ));
            }
        }

        let mut kept_sp = self.sparsity().clone();
        let surviving = kept_sp.erase(&rows, &cols)?;
        let mut kept = MappingBuilder::new(kept_sp);
        kept.add_dep(self, &surviving);
        let kept = kept.build();

        let mut embedded_sp = value.sparsity().clone();
        embedded_sp.enlarge(self.nrows(), self.ncols(), &rows, &cols)?;
        let mut embedded = MappingBuilder::new(embedded_sp);
        let identity: Vec<usize> = (0..value.nnz()).collect();
        embedded.add_dep(&value, &identity);
        let embedded = embedded.build();

        *self = unite(&kept, &embedded)?;
        Ok(())
    }

    /// Remove the addressed region from the pattern, rebinding this handle
    ///
    /// The shape is unchanged; the addressed positions become structural
    /// zeros.
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfRange` for indices outside the shape.
    pub fn erase(&mut self, rows: &[isize], cols: &[isize]) -> Result<()> {
        let rows = normalize_all(rows, self.nrows(), "rows")?;
        let cols = normalize_all(cols, self.ncols(), "cols")?;
        let mut sp = self.sparsity().clone();
        let surviving = sp.erase(&rows, &cols)?;
        let mut b = MappingBuilder::new(sp);
        b.add_dep(self, &surviving);
        *self = b.build();
        Ok(())
    }

    /// Embed this expression into a larger shape, rebinding this handle
    ///
    /// Old row `i` lands at `row_map[i]` and old column `j` at `col_map[j]`;
    /// both maps must be strictly increasing. All other positions are
    /// structural zeros.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for maps that do not cover the current shape
    /// or are not strictly increasing, and `IndexOutOfRange` for map entries
    /// outside the new shape.
    pub fn enlarge(
        &mut self,
        nrows: usize,
        ncols: usize,
        row_map: &[usize],
        col_map: &[usize],
    ) -> Result<()> {
        let mut sp = self.sparsity().clone();
        sp.enlarge(nrows, ncols, row_map, col_map)?;
        let mut b = MappingBuilder::new(sp);
        let identity: Vec<usize> = (0..self.nnz()).collect();
        b.add_dep(self, &identity);
        *self = b.build();
        Ok(())
    }
}
