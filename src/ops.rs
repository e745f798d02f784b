//! Operation tags and their structural metadata
//!
//! Simplification and sparsity inference never look at numeric values; they
//! consult the per-operation metadata defined here. Adding an operation means
//! adding a tag and a table entry, not new branches in the graph code.

/// Elementwise unary operation kind
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    /// Negation: -a
    Neg,
    /// Absolute value: |a|
    Abs,
    /// Square root: sqrt(a)
    Sqrt,
    /// Exponential: e^a
    Exp,
    /// Natural log: ln(a)
    Log,
    /// Sine: sin(a)
    Sin,
    /// Cosine: cos(a)
    Cos,
    /// Tangent: tan(a)
    Tan,
    /// Arcsine: asin(a)
    Asin,
    /// Arccosine: acos(a)
    Acos,
    /// Arctangent: atan(a)
    Atan,
    /// Hyperbolic tangent: tanh(a)
    Tanh,
    /// Floor: floor(a)
    Floor,
    /// Ceiling: ceil(a)
    Ceil,
    /// Error function: erf(a)
    Erf,
}

impl UnaryOp {
    /// Whether f(0) == 0, so the operation preserves the operand's sparsity
    ///
    /// Operations without this property densify their result: structurally
    /// absent positions take the value f(0).
    pub const fn zero_preserving(self) -> bool {
        match self {
            UnaryOp::Neg
            | UnaryOp::Abs
            | UnaryOp::Sqrt
            | UnaryOp::Sin
            | UnaryOp::Tan
            | UnaryOp::Asin
            | UnaryOp::Atan
            | UnaryOp::Tanh
            | UnaryOp::Floor
            | UnaryOp::Ceil
            | UnaryOp::Erf => true,
            UnaryOp::Exp | UnaryOp::Log | UnaryOp::Cos | UnaryOp::Acos => false,
        }
    }

    /// Operation name for diagnostics
    pub const fn name(self) -> &'static str {
        match self {
            UnaryOp::Neg => "neg",
            UnaryOp::Abs => "abs",
            UnaryOp::Sqrt => "sqrt",
            UnaryOp::Exp => "exp",
            UnaryOp::Log => "log",
            UnaryOp::Sin => "sin",
            UnaryOp::Cos => "cos",
            UnaryOp::Tan => "tan",
            UnaryOp::Asin => "asin",
            UnaryOp::Acos => "acos",
            UnaryOp::Atan => "atan",
            UnaryOp::Tanh => "tanh",
            UnaryOp::Floor => "floor",
            UnaryOp::Ceil => "ceil",
            UnaryOp::Erf => "erf",
        }
    }
}

/// Elementwise binary operation kind
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    /// Addition: a + b
    Add,
    /// Subtraction: a - b
    Sub,
    /// Multiplication: a * b
    Mul,
    /// Division: a / b
    Div,
    /// Power with a general exponent: a^b
    Pow,
    /// Power with a structurally constant exponent: a^b
    ConstPow,
    /// Minimum: min(a, b)
    Min,
    /// Maximum: max(a, b)
    Max,
}

/// Zero-absorption metadata for a binary operation
///
/// Drives both the construction-time zero short-circuits and the result
/// sparsity of a binary node:
/// - both one-sided flags set: intersection of the operand nonzero sets
/// - only one set: the zero-preserving operand's pattern
/// - neither set: union when `zero_when_both_zero`, dense otherwise
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BinaryInfo {
    /// f(0, y) == 0 for all y
    pub zero_when_lhs_zero: bool,
    /// f(x, 0) == 0 for all x
    pub zero_when_rhs_zero: bool,
    /// f(0, 0) == 0
    pub zero_when_both_zero: bool,
}

impl BinaryOp {
    /// Look up the zero-absorption metadata for this operation
    pub const fn info(self) -> BinaryInfo {
        match self {
            BinaryOp::Add | BinaryOp::Sub => BinaryInfo {
                zero_when_lhs_zero: false,
                zero_when_rhs_zero: false,
                zero_when_both_zero: true,
            },
            BinaryOp::Mul => BinaryInfo {
                zero_when_lhs_zero: true,
                zero_when_rhs_zero: true,
                zero_when_both_zero: true,
            },
            // 0 / y == 0; x / 0 and 0 / 0 are inf/nan, not structural zeros
            BinaryOp::Div => BinaryInfo {
                zero_when_lhs_zero: true,
                zero_when_rhs_zero: false,
                zero_when_both_zero: false,
            },
            // 0^0 == 1, so no structural zero can be assumed anywhere
            BinaryOp::Pow | BinaryOp::ConstPow => BinaryInfo {
                zero_when_lhs_zero: false,
                zero_when_rhs_zero: false,
                zero_when_both_zero: false,
            },
            BinaryOp::Min | BinaryOp::Max => BinaryInfo {
                zero_when_lhs_zero: false,
                zero_when_rhs_zero: false,
                zero_when_both_zero: true,
            },
        }
    }

    /// Operation name for diagnostics
    pub const fn name(self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Sub => "sub",
            BinaryOp::Mul => "mul",
            BinaryOp::Div => "div",
            BinaryOp::Pow => "pow",
            BinaryOp::ConstPow => "constpow",
            BinaryOp::Min => "min",
            BinaryOp::Max => "max",
        }
    }
}
