//! Pattern operations: sub-selection, erasure, enlargement, transposition,
//! and the linear merge used to align two patterns for elementwise operations
//!
//! Every operation here produces index mappings consistent with Mapping-node
//! construction: `mapping[k]` is the source nonzero index that supplies
//! destination nonzero slot `k`.

use super::pattern::{Sparsity, SparsityData};
use crate::error::{Error, Result};

/// How two equal-shaped patterns are merged into a result pattern
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CombineMode {
    /// Positions nonzero in either operand
    Union,
    /// Positions nonzero in both operands
    Intersect,
    /// The left operand's pattern
    Left,
    /// The right operand's pattern
    Right,
    /// Every position of the shape
    Dense,
}

impl Sparsity {
    /// Sub-selection of the addressed rows and columns
    ///
    /// Returns the pattern of the `rows.len() x cols.len()` submatrix together
    /// with, for each of its nonzeros, the source nonzero index in `self`.
    pub fn sub(&self, rows: &[usize], cols: &[usize]) -> Result<(Sparsity, Vec<usize>)> {
        for &i in rows {
            if i >= self.nrows() {
                return Err(Error::index_out_of_range(i as isize, self.nrows(), "rows"));
            }
        }
        for &j in cols {
            if j >= self.ncols() {
                return Err(Error::index_out_of_range(j as isize, self.ncols(), "cols"));
            }
        }

        let mut row_ptrs = Vec::with_capacity(rows.len() + 1);
        row_ptrs.push(0);
        let mut out_cols = Vec::new();
        let mut mapping = Vec::new();
        for &i in rows {
            for (jj, &j) in cols.iter().enumerate() {
                if let Some(k) = self.locate(i, j) {
                    out_cols.push(jj);
                    mapping.push(k);
                }
            }
            row_ptrs.push(out_cols.len());
        }
        let sp = Sparsity::from_data(SparsityData {
            nrows: rows.len(),
            ncols: cols.len(),
            row_ptrs,
            cols: out_cols,
        });
        Ok((sp, mapping))
    }

    /// Remove the region addressed by `rows` x `cols`, keeping the shape
    ///
    /// Returns the original nonzero indices that survive, in nonzero order.
    /// Copy-on-write: other handles to the same pattern observe no change.
    pub fn erase(&mut self, rows: &[usize], cols: &[usize]) -> Result<Vec<usize>> {
        for &i in rows {
            if i >= self.nrows() {
                return Err(Error::index_out_of_range(i as isize, self.nrows(), "rows"));
            }
        }
        for &j in cols {
            if j >= self.ncols() {
                return Err(Error::index_out_of_range(j as isize, self.ncols(), "cols"));
            }
        }

        let mut in_row = vec![false; self.nrows()];
        for &i in rows {
            in_row[i] = true;
        }
        let mut in_col = vec![false; self.ncols()];
        for &j in cols {
            in_col[j] = true;
        }

        let mut row_ptrs = Vec::with_capacity(self.nrows() + 1);
        row_ptrs.push(0);
        let mut out_cols = Vec::new();
        let mut surviving = Vec::new();
        let mut k = 0;
        for i in 0..self.nrows() {
            for &j in self.row_cols(i) {
                if !(in_row[i] && in_col[j]) {
                    out_cols.push(j);
                    surviving.push(k);
                }
                k += 1;
            }
            row_ptrs.push(out_cols.len());
        }
        *self = Sparsity::from_data(SparsityData {
            nrows: self.nrows(),
            ncols: self.ncols(),
            row_ptrs,
            cols: out_cols,
        });
        Ok(surviving)
    }

    /// Embed this pattern into a larger shape
    ///
    /// Old row `i` lands at `row_map[i]`, old column `j` at `col_map[j]`; both
    /// maps must be strictly increasing and within the new bounds. The nonzero
    /// count and nonzero order are unchanged, so the identity mapping relates
    /// old and new nonzeros.
    pub fn enlarge(
        &mut self,
        nrows: usize,
        ncols: usize,
        row_map: &[usize],
        col_map: &[usize],
    ) -> Result<()> {
        if row_map.len() != self.nrows() || col_map.len() != self.ncols() {
            return Err(Error::invalid_argument(
                "enlarge",
                format!(
                    "index maps must cover the current shape: got {} rows and {} cols for {}",
                    row_map.len(),
                    col_map.len(),
                    self.dim_string()
                ),
            ));
        }
        for map in [row_map, col_map] {
            if !map.windows(2).all(|w| w[0] < w[1]) {
                return Err(Error::invalid_argument(
                    "enlarge",
                    "index maps must be strictly increasing",
                ));
            }
        }
        if row_map.last().is_some_and(|&i| i >= nrows) {
            return Err(Error::index_out_of_range(
                *row_map.last().unwrap() as isize,
                nrows,
                "rows",
            ));
        }
        if col_map.last().is_some_and(|&j| j >= ncols) {
            return Err(Error::index_out_of_range(
                *col_map.last().unwrap() as isize,
                ncols,
                "cols",
            ));
        }

        let mut row_ptrs = vec![0; nrows + 1];
        let mut out_cols = Vec::with_capacity(self.nnz());
        let mut old_row = 0;
        for i in 0..nrows {
            if old_row < row_map.len() && row_map[old_row] == i {
                out_cols.extend(self.row_cols(old_row).iter().map(|&j| col_map[j]));
                old_row += 1;
            }
            row_ptrs[i + 1] = out_cols.len();
        }
        *self = Sparsity::from_data(SparsityData {
            nrows,
            ncols,
            row_ptrs,
            cols: out_cols,
        });
        Ok(())
    }

    /// Transposed pattern together with the nonzero mapping
    ///
    /// `mapping[k]` is the nonzero index in `self` that supplies nonzero `k`
    /// of the transposed pattern.
    pub fn transpose(&self) -> (Sparsity, Vec<usize>) {
        let (nrows, ncols) = (self.ncols(), self.nrows());
        let mut counts = vec![0usize; nrows];
        for &j in self.cols() {
            counts[j] += 1;
        }
        let mut row_ptrs = Vec::with_capacity(nrows + 1);
        row_ptrs.push(0);
        for &c in &counts {
            row_ptrs.push(row_ptrs.last().unwrap() + c);
        }
        let mut next = row_ptrs[..nrows].to_vec();
        let mut out_cols = vec![0usize; self.nnz()];
        let mut mapping = vec![0usize; self.nnz()];
        for (k, (i, j)) in self.entries().enumerate() {
            let pos = next[j];
            next[j] += 1;
            out_cols[pos] = i;
            mapping[pos] = k;
        }
        let sp = Sparsity::from_data(SparsityData {
            nrows,
            ncols,
            row_ptrs,
            cols: out_cols,
        });
        (sp, mapping)
    }
}

/// Align two equal-shaped patterns with a single linear merge
///
/// Returns the combined pattern and, for each of its nonzeros, the source
/// nonzero index in each operand (None where the operand is structurally
/// zero at that position).
#[allow(clippy::type_complexity)]
pub(crate) fn combine(
    a: &Sparsity,
    b: &Sparsity,
    mode: CombineMode,
) -> Result<(Sparsity, Vec<(Option<usize>, Option<usize>)>)> {
    if a.shape() != b.shape() {
        return Err(Error::dimension_mismatch("combine", a.shape(), b.shape()));
    }
    let (nrows, ncols) = a.shape();

    let mut row_ptrs = Vec::with_capacity(nrows + 1);
    row_ptrs.push(0);
    let mut out_cols = Vec::new();
    let mut pairs = Vec::new();

    for i in 0..nrows {
        let a_base = a.row_ptrs()[i];
        let b_base = b.row_ptrs()[i];
        let a_row = a.row_cols(i);
        let b_row = b.row_cols(i);
        let (mut pa, mut pb) = (0, 0);

        if mode == CombineMode::Dense {
            for j in 0..ncols {
                let ka = (pa < a_row.len() && a_row[pa] == j).then(|| {
                    pa += 1;
                    a_base + pa - 1
                });
                let kb = (pb < b_row.len() && b_row[pb] == j).then(|| {
                    pb += 1;
                    b_base + pb - 1
                });
                out_cols.push(j);
                pairs.push((ka, kb));
            }
        } else {
            while pa < a_row.len() || pb < b_row.len() {
                let ja = a_row.get(pa).copied();
                let jb = b_row.get(pb).copied();
                let (j, ka, kb) = match (ja, jb) {
                    (Some(ja), Some(jb)) if ja == jb => {
                        pa += 1;
                        pb += 1;
                        (ja, Some(a_base + pa - 1), Some(b_base + pb - 1))
                    }
                    (Some(ja), jb) if jb.is_none() || ja < jb.unwrap() => {
                        pa += 1;
                        (ja, Some(a_base + pa - 1), None)
                    }
                    _ => {
                        pb += 1;
                        (jb.unwrap(), None, Some(b_base + pb - 1))
                    }
                };
                let include = match mode {
                    CombineMode::Union => true,
                    CombineMode::Intersect => ka.is_some() && kb.is_some(),
                    CombineMode::Left => ka.is_some(),
                    CombineMode::Right => kb.is_some(),
                    CombineMode::Dense => unreachable!(),
                };
                if include {
                    out_cols.push(j);
                    pairs.push((ka, kb));
                }
            }
        }
        row_ptrs.push(out_cols.len());
    }

    let sp = Sparsity::from_data(SparsityData {
        nrows,
        ncols,
        row_ptrs,
        cols: out_cols,
    });
    Ok((sp, pairs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sparsity::Sparsity;

    fn pattern_2x2(entries: &[(usize, usize)]) -> Sparsity {
        let mut row_ptrs = vec![0usize];
        let mut cols = Vec::new();
        for i in 0..2 {
            for j in 0..2 {
                if entries.contains(&(i, j)) {
                    cols.push(j);
                }
            }
            row_ptrs.push(cols.len());
        }
        Sparsity::from_data(SparsityData {
            nrows: 2,
            ncols: 2,
            row_ptrs,
            cols,
        })
    }

    #[test]
    fn test_sub_dense_column() {
        let sp = Sparsity::dense(2, 2);
        let (sub, mapping) = sp.sub(&[0, 1], &[0]).unwrap();
        assert_eq!(sub.shape(), (2, 1));
        assert_eq!(sub.nnz(), 2);
        assert_eq!(mapping, vec![0, 2]);
    }

    #[test]
    fn test_sub_out_of_range() {
        let sp = Sparsity::dense(2, 2);
        assert!(matches!(
            sp.sub(&[2], &[0]),
            Err(crate::error::Error::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn test_erase_region() {
        let mut sp = Sparsity::dense(2, 2);
        let surviving = sp.erase(&[0], &[1]).unwrap();
        // entry (0,1) (nonzero index 1) is gone
        assert_eq!(surviving, vec![0, 2, 3]);
        assert_eq!(sp.nnz(), 3);
        assert_eq!(sp.locate(0, 1), None);
        assert_eq!(sp.shape(), (2, 2));
    }

    #[test]
    fn test_erase_is_copy_on_write() {
        let mut a = Sparsity::dense(2, 2);
        let b = a.clone();
        a.erase(&[0], &[0]).unwrap();
        assert_eq!(a.nnz(), 3);
        assert_eq!(b.nnz(), 4);
    }

    #[test]
    fn test_enlarge_offsets() {
        let mut sp = Sparsity::dense(1, 1);
        sp.enlarge(3, 3, &[1], &[1]).unwrap();
        assert_eq!(sp.shape(), (3, 3));
        assert_eq!(sp.nnz(), 1);
        assert_eq!(sp.locate(1, 1), Some(0));
    }

    #[test]
    fn test_enlarge_then_erase_roundtrip() {
        let mut sp = Sparsity::dense(1, 1);
        sp.enlarge(3, 3, &[1], &[1]).unwrap();
        sp.erase(&[1], &[1]).unwrap();
        assert_eq!(sp, Sparsity::empty(3, 3));
    }

    #[test]
    fn test_enlarge_rejects_unsorted_map() {
        let mut sp = Sparsity::dense(2, 2);
        assert!(sp.enlarge(4, 4, &[2, 1], &[0, 1]).is_err());
    }

    #[test]
    fn test_transpose_mapping() {
        // [x x]      [x .]
        // [. x]  ->  [x x]
        let sp = pattern_2x2(&[(0, 0), (0, 1), (1, 1)]);
        let (t, mapping) = sp.transpose();
        assert_eq!(t.locate(0, 0), Some(0));
        assert_eq!(t.locate(1, 0), Some(1));
        assert_eq!(t.locate(1, 1), Some(2));
        assert_eq!(mapping, vec![0, 1, 2]);
    }

    #[test]
    fn test_combine_union_disjoint() {
        let a = pattern_2x2(&[(0, 0)]);
        let b = pattern_2x2(&[(1, 1)]);
        let (sp, pairs) = combine(&a, &b, CombineMode::Union).unwrap();
        assert_eq!(sp.nnz(), 2);
        assert_eq!(pairs, vec![(Some(0), None), (None, Some(0))]);
    }

    #[test]
    fn test_combine_intersect_disjoint_is_empty() {
        let a = pattern_2x2(&[(0, 0)]);
        let b = pattern_2x2(&[(1, 1)]);
        let (sp, pairs) = combine(&a, &b, CombineMode::Intersect).unwrap();
        assert_eq!(sp.nnz(), 0);
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_combine_left_keeps_lhs_pattern() {
        let a = pattern_2x2(&[(0, 0), (1, 1)]);
        let b = pattern_2x2(&[(1, 1)]);
        let (sp, pairs) = combine(&a, &b, CombineMode::Left).unwrap();
        assert_eq!(sp, a);
        assert_eq!(pairs, vec![(Some(0), None), (Some(1), Some(0))]);
    }

    #[test]
    fn test_combine_dense_covers_all_positions() {
        let a = pattern_2x2(&[(0, 1)]);
        let b = pattern_2x2(&[(1, 0)]);
        let (sp, pairs) = combine(&a, &b, CombineMode::Dense).unwrap();
        assert!(sp.is_dense());
        assert_eq!(
            pairs,
            vec![(None, None), (Some(0), None), (None, Some(0)), (None, None)]
        );
    }

    #[test]
    fn test_combine_shape_mismatch() {
        let a = Sparsity::dense(2, 3);
        let b = Sparsity::dense(3, 2);
        assert!(combine(&a, &b, CombineMode::Union).is_err());
    }
}
