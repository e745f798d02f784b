//! Mapping node construction
//!
//! A Mapping node expresses its output nonzeros purely as a gather over the
//! nonzeros of its dependencies. Submatrix extraction and assignment,
//! enlargement, pattern union and nonzero reindexing are all built through
//! the same [`MappingBuilder`].

use smallvec::SmallVec;

use super::Expr;
use super::node::{ExprNode, NzMap};
use crate::error::{Error, Result};
use crate::sparsity::{CombineMode, Sparsity, combine};

/// Incremental construction of a Mapping node
///
/// Dependencies are combined by appending further dependency/map pairs; a
/// later pair that addresses an already-assigned destination slot shadows
/// the earlier assignment (last write wins, in append order).
pub(crate) struct MappingBuilder {
    sparsity: Sparsity,
    deps: SmallVec<[Expr; 2]>,
    slots: NzMap,
}

impl MappingBuilder {
    pub(crate) fn new(sparsity: Sparsity) -> Self {
        let slots = vec![None; sparsity.nnz()];
        Self {
            sparsity,
            deps: SmallVec::new(),
            slots,
        }
    }

    /// Append a dependency supplying destination slots 0..src.len() in order
    ///
    /// `src[k]` is the source nonzero index of the dependency for slot k.
    pub(crate) fn add_dep(&mut self, dep: &Expr, src: &[usize]) {
        debug_assert_eq!(src.len(), self.slots.len());
        let entries: Vec<(usize, usize)> = src.iter().copied().enumerate().collect();
        self.add_dependency(dep, entries);
    }

    /// Append a dependency supplying the given (destination, source) slots
    pub(crate) fn add_dependency(
        &mut self,
        dep: &Expr,
        entries: impl IntoIterator<Item = (usize, usize)>,
    ) {
        let d = self.push_dep(dep);
        for (dst, src) in entries {
            self.slots[dst] = Some((d, src));
        }
    }

    fn push_dep(&mut self, dep: &Expr) -> usize {
        if let Some(d) = self.deps.iter().position(|e| e.ptr_eq(dep)) {
            return d;
        }
        self.deps.push(dep.clone());
        self.deps.len() - 1
    }

    /// Finish construction, collapsing an identity mapping to its dependency
    ///
    /// A single-dependency mapping whose pattern equals the dependency's and
    /// whose map is the identity adds nothing; the dependency handle itself
    /// is returned and no node is allocated.
    pub(crate) fn build(self) -> Expr {
        if self.deps.len() == 1
            && self.sparsity == *self.deps[0].sparsity()
            && self
                .slots
                .iter()
                .enumerate()
                .all(|(k, s)| *s == Some((0, k)))
        {
            return self.deps[0].clone();
        }
        Expr::from_node(ExprNode::Mapping {
            sparsity: self.sparsity,
            deps: self.deps,
            nzmap: self.slots,
        })
    }
}

impl Expr {
    /// Matrix of the given shape with a scalar expression at every element
    ///
    /// A structurally empty scalar produces a structural zero matrix.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when `value` is not 1x1.
    pub fn filled(nrows: usize, ncols: usize, value: &Expr) -> Result<Self> {
        if value.numel() != 1 {
            return Err(Error::invalid_argument(
                "filled",
                format!("value must be scalar, got {}", value.dim_string()),
            ));
        }
        if value.nnz() == 0 {
            return Ok(Expr::zeros(nrows, ncols));
        }
        let sp = Sparsity::dense(nrows, ncols);
        let mut b = MappingBuilder::new(sp);
        b.add_dependency(value, (0..nrows * ncols).map(|dst| (dst, 0)));
        Ok(b.build())
    }

    /// Transpose, built as a nonzero-reindexing Mapping node
    pub fn transpose(&self) -> Expr {
        let (sp, mapping) = self.sparsity().transpose();
        let mut b = MappingBuilder::new(sp);
        b.add_dep(self, &mapping);
        b.build()
    }

    /// Diagonal of a square matrix as a column vector
    ///
    /// The result has a nonzero at row i exactly where (i, i) is structurally
    /// nonzero.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when the matrix is not square.
    pub fn diag(&self) -> Result<Expr> {
        let (n, m) = self.shape();
        if n != m {
            return Err(Error::invalid_argument(
                "diag",
                format!("matrix must be square, got {}", self.dim_string()),
            ));
        }
        let mut row_ptrs = Vec::with_capacity(n + 1);
        row_ptrs.push(0);
        let mut cols = Vec::new();
        let mut src = Vec::new();
        for i in 0..n {
            if let Some(k) = self.sparsity().locate(i, i) {
                cols.push(0);
                src.push(k);
            }
            row_ptrs.push(cols.len());
        }
        let sp = Sparsity::from_compressed(n, 1, row_ptrs, cols)?;
        let mut b = MappingBuilder::new(sp);
        b.add_dep(self, &src);
        Ok(b.build())
    }
}

/// Union of two equal-shaped expressions' sparsity patterns
///
/// The result's nonzero set is exactly the union; where both operands have a
/// structural nonzero, the second operand supplies the value.
///
/// # Errors
///
/// Returns `DimensionMismatch` when the shapes differ.
pub fn unite(x: &Expr, y: &Expr) -> Result<Expr> {
    if x.shape() != y.shape() {
        return Err(Error::dimension_mismatch("unite", x.shape(), y.shape()));
    }
    let (sp, pairs) = combine(x.sparsity(), y.sparsity(), CombineMode::Union)?;
    let mut b = MappingBuilder::new(sp);
    b.add_dependency(
        x,
        pairs
            .iter()
            .enumerate()
            .filter_map(|(dst, (ka, _))| ka.map(|k| (dst, k))),
    );
    b.add_dependency(
        y,
        pairs
            .iter()
            .enumerate()
            .filter_map(|(dst, (_, kb))| kb.map(|k| (dst, k))),
    );
    Ok(b.build())
}
