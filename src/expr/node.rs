//! Expression node: the graph vertex type
//!
//! A closed tagged union over the node variants. Nodes are never mutated
//! after construction; "changing" an expression always produces a new node,
//! so graphs are acyclic by construction.

use smallvec::SmallVec;

use super::Expr;
use crate::matrix::Matrix;
use crate::ops::{BinaryOp, UnaryOp};
use crate::sparsity::Sparsity;

/// For each destination nonzero slot of a Mapping node: the dependency index
/// and source nonzero index that supply it, or None for a structural zero
pub(crate) type NzMap = Vec<Option<(usize, usize)>>;

/// Aligned operand pair list of a binary node: for each result nonzero, the
/// source nonzero index in each operand (None where structurally zero)
pub(crate) type NzPairs = Vec<(Option<usize>, Option<usize>)>;

#[derive(Debug, Clone)]
pub(crate) enum ExprNode {
    /// Named free variable of a given sparsity
    Symbol { name: String, sparsity: Sparsity },
    /// Numeric matrix embedded in the graph
    Constant(Matrix<f64>),
    /// Elementwise application of a tagged scalar function
    Unary {
        op: UnaryOp,
        sparsity: Sparsity,
        dep: Expr,
    },
    /// Elementwise operation over two operands aligned at construction time
    Binary {
        op: BinaryOp,
        sparsity: Sparsity,
        pairs: NzPairs,
        lhs: Expr,
        rhs: Expr,
    },
    /// Gather over the nonzeros of zero or more dependencies; expresses
    /// submatrix extraction and assignment, concatenation, enlargement, and
    /// nonzero reindexing uniformly
    Mapping {
        sparsity: Sparsity,
        deps: SmallVec<[Expr; 2]>,
        nzmap: NzMap,
    },
    /// General sparse matrix product; the right operand is stored transposed
    /// so that both row-compressed patterns merge row against row
    Multiplication {
        sparsity: Sparsity,
        lhs: Expr,
        rhs_t: Expr,
    },
}

impl ExprNode {
    pub(crate) fn sparsity(&self) -> &Sparsity {
        match self {
            ExprNode::Symbol { sparsity, .. }
            | ExprNode::Unary { sparsity, .. }
            | ExprNode::Binary { sparsity, .. }
            | ExprNode::Mapping { sparsity, .. }
            | ExprNode::Multiplication { sparsity, .. } => sparsity,
            ExprNode::Constant(m) => m.sparsity(),
        }
    }

    pub(crate) fn sparsity_mut(&mut self) -> &mut Sparsity {
        match self {
            ExprNode::Symbol { sparsity, .. }
            | ExprNode::Unary { sparsity, .. }
            | ExprNode::Binary { sparsity, .. }
            | ExprNode::Mapping { sparsity, .. }
            | ExprNode::Multiplication { sparsity, .. } => sparsity,
            ExprNode::Constant(m) => m.sparsity_mut(),
        }
    }

    pub(crate) fn ndep(&self) -> usize {
        match self {
            ExprNode::Symbol { .. } | ExprNode::Constant(_) => 0,
            ExprNode::Unary { .. } => 1,
            ExprNode::Binary { .. } | ExprNode::Multiplication { .. } => 2,
            ExprNode::Mapping { deps, .. } => deps.len(),
        }
    }

    pub(crate) fn dep(&self, i: usize) -> Option<&Expr> {
        match (self, i) {
            (ExprNode::Unary { dep, .. }, 0) => Some(dep),
            (ExprNode::Binary { lhs, .. }, 0) => Some(lhs),
            (ExprNode::Binary { rhs, .. }, 1) => Some(rhs),
            (ExprNode::Multiplication { lhs, .. }, 0) => Some(lhs),
            (ExprNode::Multiplication { rhs_t, .. }, 1) => Some(rhs_t),
            (ExprNode::Mapping { deps, .. }, i) => deps.get(i),
            _ => None,
        }
    }

    /// Structural zero: no nonzeros at all, or a constant with all-zero values
    pub(crate) fn is_zero(&self) -> bool {
        if self.sparsity().nnz() == 0 {
            return true;
        }
        match self {
            ExprNode::Constant(m) => m.values().iter().all(|&v| v == 0.0),
            _ => false,
        }
    }

    /// Dense constant with every value one
    pub(crate) fn is_one(&self) -> bool {
        match self {
            ExprNode::Constant(m) => m.is_dense() && m.values().iter().all(|&v| v == 1.0),
            _ => false,
        }
    }

    /// Dense constant with every value minus one
    pub(crate) fn is_minus_one(&self) -> bool {
        match self {
            ExprNode::Constant(m) => m.is_dense() && m.values().iter().all(|&v| v == -1.0),
            _ => false,
        }
    }

    /// Constant identity matrix: full diagonal pattern, all values one
    pub(crate) fn is_identity(&self) -> bool {
        match self {
            ExprNode::Constant(m) => {
                m.nrows() == m.ncols()
                    && m.nnz() == m.nrows()
                    && m.sparsity().is_diagonal()
                    && m.values().iter().all(|&v| v == 1.0)
            }
            _ => false,
        }
    }

    /// Whether the node carries no symbolic content: a constant leaf or a
    /// dependency-free mapping (a structural zero matrix)
    pub(crate) fn is_constant(&self) -> bool {
        match self {
            ExprNode::Constant(_) => true,
            ExprNode::Mapping { deps, .. } => deps.is_empty(),
            _ => false,
        }
    }
}
