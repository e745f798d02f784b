//! The user-facing expression handle
//!
//! An [`Expr`] is a shared-ownership reference to exactly one node. Copying a
//! handle is O(1); structural mutation through a handle clones the node first
//! when it is shared (copy-on-write), so aliasing handles never observe the
//! change.

use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;

use super::node::ExprNode;
use crate::error::{Error, Result};
use crate::matrix::Matrix;
use crate::ops::{BinaryOp, UnaryOp};
use crate::sparsity::Sparsity;

/// Shared handle to an expression node
///
/// The value type of the graph-construction API: every factory, operator and
/// indexing call returns one of these. Cloning increments a reference count
/// and shares the node.
#[derive(Clone)]
pub struct Expr(Rc<ExprNode>);

impl Expr {
    pub(crate) fn from_node(node: ExprNode) -> Self {
        Self(Rc::new(node))
    }

    pub(crate) fn node(&self) -> &ExprNode {
        &self.0
    }

    // === Factories ===

    /// Named symbolic matrix with a dense pattern
    pub fn sym(name: &str, nrows: usize, ncols: usize) -> Self {
        Self::sym_with(name, Sparsity::dense(nrows, ncols))
    }

    /// Named symbolic matrix with the given sparsity pattern
    pub fn sym_with(name: &str, sparsity: Sparsity) -> Self {
        Self::from_node(ExprNode::Symbol {
            name: name.to_owned(),
            sparsity,
        })
    }

    /// Constant leaf wrapping a numeric matrix
    pub fn constant(m: Matrix<f64>) -> Self {
        Self::from_node(ExprNode::Constant(m))
    }

    /// Dense constant from row-major element data
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `data.len() != nrows * ncols`.
    pub fn from_dense(nrows: usize, ncols: usize, data: &[f64]) -> Result<Self> {
        Ok(Self::constant(Matrix::from_dense(nrows, ncols, data)?))
    }

    /// Structural zero matrix: a dependency-free mapping over an empty pattern
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self::from_node(ExprNode::Mapping {
            sparsity: Sparsity::empty(nrows, ncols),
            deps: SmallVec::new(),
            nzmap: Vec::new(),
        })
    }

    /// Structural zero matrix with this expression's shape
    pub fn zeros_like(&self) -> Self {
        Self::zeros(self.nrows(), self.ncols())
    }

    /// Structural zero matrix with the shape of the given pattern
    pub fn zeros_sp(sparsity: &Sparsity) -> Self {
        Self::zeros(sparsity.nrows(), sparsity.ncols())
    }

    /// Dense constant matrix of ones
    pub fn ones(nrows: usize, ncols: usize) -> Self {
        Self::constant(Matrix::ones(nrows, ncols))
    }

    /// Constant identity matrix with a diagonal pattern
    pub fn eye(n: usize) -> Self {
        Self::constant(Matrix::eye(n))
    }

    /// Constant diagonal matrix from the given diagonal values
    pub fn diagonal(values: &[f64]) -> Self {
        Self::constant(Matrix::diag(values))
    }

    // === Structural accessors ===

    /// The sparsity pattern
    #[inline]
    pub fn sparsity(&self) -> &Sparsity {
        self.0.sparsity()
    }

    /// Mutable access to the sparsity pattern, with copy-on-write
    ///
    /// If the node is shared, it is cloned first so other handles observe no
    /// change. The caller must keep the pattern consistent with any dependent
    /// structure (nonzero counts in particular).
    pub fn sparsity_mut(&mut self) -> &mut Sparsity {
        Rc::make_mut(&mut self.0).sparsity_mut()
    }

    /// Shape as (rows, cols)
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        self.sparsity().shape()
    }

    /// Number of rows
    #[inline]
    pub fn nrows(&self) -> usize {
        self.sparsity().nrows()
    }

    /// Number of columns
    #[inline]
    pub fn ncols(&self) -> usize {
        self.sparsity().ncols()
    }

    /// Total number of elements
    #[inline]
    pub fn numel(&self) -> usize {
        self.sparsity().numel()
    }

    /// Number of structural nonzeros
    #[inline]
    pub fn nnz(&self) -> usize {
        self.sparsity().nnz()
    }

    /// Whether every element is structurally nonzero
    #[inline]
    pub fn is_dense(&self) -> bool {
        self.sparsity().is_dense()
    }

    /// Whether this is a 1x1 expression
    #[inline]
    pub fn is_scalar(&self) -> bool {
        self.numel() == 1
    }

    /// Human-readable dimension string for diagnostics
    pub fn dim_string(&self) -> String {
        self.sparsity().dim_string()
    }

    /// Number of dependencies
    #[inline]
    pub fn ndep(&self) -> usize {
        self.0.ndep()
    }

    /// The i-th dependency handle, in declared order
    #[inline]
    pub fn dep(&self, i: usize) -> Option<&Expr> {
        self.0.dep(i)
    }

    /// Name of a symbolic leaf
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for any other node variant.
    pub fn name(&self) -> Result<&str> {
        match self.node() {
            ExprNode::Symbol { name, .. } => Ok(name),
            _ => Err(Error::invalid_argument(
                "name",
                "expression is not a symbolic leaf",
            )),
        }
    }

    /// Nonzero map of a Mapping node with at most one dependency
    ///
    /// `mapping()[k]` is `Some((0, src))` when destination nonzero `k` is
    /// supplied by source nonzero `src` of the dependency, or `None` for a
    /// structural zero.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when the node is not a Mapping or has more
    /// than one dependency.
    pub fn mapping(&self) -> Result<&[Option<(usize, usize)>]> {
        match self.node() {
            ExprNode::Mapping { deps, nzmap, .. } if deps.len() <= 1 => Ok(nzmap),
            ExprNode::Mapping { .. } => Err(Error::invalid_argument(
                "mapping",
                "mapping node has more than one dependency",
            )),
            _ => Err(Error::invalid_argument(
                "mapping",
                "expression is not a mapping node",
            )),
        }
    }

    /// Whether two handles reference the identical node
    #[inline]
    pub fn ptr_eq(&self, other: &Expr) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    // === Structural predicates (never evaluate the graph) ===

    /// Structurally zero: no nonzeros, or a constant with all-zero values
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Dense constant with every value one
    pub fn is_one(&self) -> bool {
        self.0.is_one()
    }

    /// Dense constant with every value minus one
    pub fn is_minus_one(&self) -> bool {
        self.0.is_minus_one()
    }

    /// Constant identity matrix
    pub fn is_identity(&self) -> bool {
        self.0.is_identity()
    }

    /// Constant leaf or dependency-free mapping
    pub fn is_constant(&self) -> bool {
        self.0.is_constant()
    }

    /// Symbolic leaf
    pub fn is_symbolic(&self) -> bool {
        matches!(self.node(), ExprNode::Symbol { .. })
    }

    /// Mapping node
    pub fn is_mapping(&self) -> bool {
        matches!(self.node(), ExprNode::Mapping { .. })
    }

    /// Matrix product node
    pub fn is_multiplication(&self) -> bool {
        matches!(self.node(), ExprNode::Multiplication { .. })
    }

    /// Binary node with the given operation tag
    pub fn is_op(&self, op: BinaryOp) -> bool {
        matches!(self.node(), ExprNode::Binary { op: o, .. } if *o == op)
    }

    /// Unary node with the given operation tag
    pub fn is_unary_op(&self, op: UnaryOp) -> bool {
        matches!(self.node(), ExprNode::Unary { op: o, .. } if *o == op)
    }

    /// The operand of a negation node, if this is one
    pub(crate) fn neg_dep(&self) -> Option<Expr> {
        match self.node() {
            ExprNode::Unary {
                op: UnaryOp::Neg,
                dep,
                ..
            } => Some(dep.clone()),
            _ => None,
        }
    }
}

impl From<f64> for Expr {
    /// Dense 1x1 constant
    fn from(v: f64) -> Self {
        Expr::constant(Matrix::scalar(v))
    }
}

impl From<Matrix<f64>> for Expr {
    fn from(m: Matrix<f64>) -> Self {
        Expr::constant(m)
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.node() {
            ExprNode::Symbol { name, .. } => format!("Symbol({name})"),
            ExprNode::Constant(_) => "Constant".to_owned(),
            ExprNode::Unary { op, .. } => format!("Unary({})", op.name()),
            ExprNode::Binary { op, .. } => format!("Binary({})", op.name()),
            ExprNode::Mapping { deps, .. } => format!("Mapping(ndep={})", deps.len()),
            ExprNode::Multiplication { .. } => "Multiplication".to_owned(),
        };
        write!(f, "Expr[{} {}]", kind, self.dim_string())
    }
}
