//! Arithmetic over expression handles
//!
//! Operator overloads build graph nodes. Algebraic identities involving
//! structural constants are applied at construction time, before any node is
//! allocated: adding a structural zero returns the other operand unchanged,
//! multiplying by a constant one returns the other operand, double negation
//! cancels. Simplification is purely structural and never inspects symbolic
//! values.

use std::ops;

use super::Expr;
use super::binary::{make_binary, make_unary};
use crate::error::{Error, Result};
use crate::ops::{BinaryOp, UnaryOp};

/// Whether simplifying `a op b` to just `b` keeps the result shape
///
/// Dropping an operand is only sound when the kept operand already has the
/// result shape, so a scalar surviving against a matrix must not be returned
/// as-is.
fn absorbs(dropped: &Expr, kept: &Expr) -> bool {
    dropped.shape() == kept.shape() || dropped.is_scalar()
}

pub(crate) fn add(x: &Expr, y: &Expr) -> Result<Expr> {
    if x.is_zero() && absorbs(x, y) {
        return Ok(y.clone());
    }
    if y.is_zero() && absorbs(y, x) {
        return Ok(x.clone());
    }
    if let Some(yd) = y.neg_dep() {
        return sub(x, &yd);
    }
    if let Some(xd) = x.neg_dep() {
        return sub(y, &xd);
    }
    make_binary(BinaryOp::Add, x, y)
}

pub(crate) fn sub(x: &Expr, y: &Expr) -> Result<Expr> {
    if y.is_zero() && absorbs(y, x) {
        return Ok(x.clone());
    }
    if x.is_zero() && absorbs(x, y) {
        return Ok(neg(y));
    }
    if x.ptr_eq(y) {
        return Ok(x.zeros_like());
    }
    if let Some(yd) = y.neg_dep() {
        return add(x, &yd);
    }
    make_binary(BinaryOp::Sub, x, y)
}

pub(crate) fn mul(x: &Expr, y: &Expr) -> Result<Expr> {
    if x.is_one() && absorbs(x, y) {
        return Ok(y.clone());
    }
    if y.is_one() && absorbs(y, x) {
        return Ok(x.clone());
    }
    if x.is_minus_one() && absorbs(x, y) {
        return Ok(neg(y));
    }
    if y.is_minus_one() && absorbs(y, x) {
        return Ok(neg(x));
    }
    make_binary(BinaryOp::Mul, x, y)
}

pub(crate) fn div(x: &Expr, y: &Expr) -> Result<Expr> {
    if y.is_one() && absorbs(y, x) {
        return Ok(x.clone());
    }
    make_binary(BinaryOp::Div, x, y)
}

pub(crate) fn neg(x: &Expr) -> Expr {
    if let Some(xd) = x.neg_dep() {
        return xd;
    }
    make_unary(UnaryOp::Neg, x)
}

/// Dispatch a binary tag through its simplifying constructor
pub(crate) fn apply_binary(op: BinaryOp, x: &Expr, y: &Expr) -> Result<Expr> {
    match op {
        BinaryOp::Add => add(x, y),
        BinaryOp::Sub => sub(x, y),
        BinaryOp::Mul => mul(x, y),
        BinaryOp::Div => div(x, y),
        _ => make_binary(op, x, y),
    }
}

/// Dispatch a unary tag through its simplifying constructor
pub(crate) fn apply_unary(op: UnaryOp, x: &Expr) -> Expr {
    match op {
        UnaryOp::Neg => neg(x),
        _ => make_unary(op, x),
    }
}

impl Expr {
    /// Elementwise power
    ///
    /// A structurally constant exponent selects the constant-power operation,
    /// which evaluators may specialize; a symbolic exponent yields the
    /// general power operation.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` unless the shapes match or one operand
    /// is 1x1.
    pub fn pow(&self, exponent: &Expr) -> Result<Expr> {
        if exponent.is_constant() {
            make_binary(BinaryOp::ConstPow, self, exponent)
        } else {
            make_binary(BinaryOp::Pow, self, exponent)
        }
    }

    /// Elementwise power with a numeric exponent
    pub fn powf(&self, exponent: f64) -> Result<Expr> {
        self.constpow(&Expr::from(exponent))
    }

    /// Elementwise power, forcing the constant-exponent operation
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when the exponent is not structurally
    /// constant and `DimensionMismatch` on incompatible shapes.
    pub fn constpow(&self, exponent: &Expr) -> Result<Expr> {
        if !exponent.is_constant() {
            return Err(Error::invalid_argument(
                "constpow",
                "exponent must be structurally constant",
            ));
        }
        make_binary(BinaryOp::ConstPow, self, exponent)
    }

    /// Elementwise minimum
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` unless the shapes match or one operand
    /// is 1x1.
    pub fn fmin(&self, other: &Expr) -> Result<Expr> {
        make_binary(BinaryOp::Min, self, other)
    }

    /// Elementwise maximum
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` unless the shapes match or one operand
    /// is 1x1.
    pub fn fmax(&self, other: &Expr) -> Result<Expr> {
        make_binary(BinaryOp::Max, self, other)
    }

    /// Matrix right division, `self / rhs` in the matrix sense
    ///
    /// # Errors
    ///
    /// Only a 1x1 divisor is supported; anything else returns
    /// `UnsupportedOperation`.
    pub fn mrdivide(&self, rhs: &Expr) -> Result<Expr> {
        if rhs.is_scalar() {
            return div(self, rhs);
        }
        Err(Error::unsupported(
            "mrdivide",
            "only scalar divisors are implemented",
        ))
    }

    /// Matrix left division, `lhs \ self` in the matrix sense
    ///
    /// # Errors
    ///
    /// Only a 1x1 divisor is supported; anything else returns
    /// `UnsupportedOperation`.
    pub fn mldivide(&self, rhs: &Expr) -> Result<Expr> {
        if self.is_scalar() {
            return div(rhs, self);
        }
        Err(Error::unsupported(
            "mldivide",
            "only scalar divisors are implemented",
        ))
    }

    /// Elementwise absolute value
    pub fn abs(&self) -> Expr {
        make_unary(UnaryOp::Abs, self)
    }

    /// Elementwise square root
    pub fn sqrt(&self) -> Expr {
        make_unary(UnaryOp::Sqrt, self)
    }

    /// Elementwise exponential
    pub fn exp(&self) -> Expr {
        make_unary(UnaryOp::Exp, self)
    }

    /// Elementwise natural logarithm
    pub fn log(&self) -> Expr {
        make_unary(UnaryOp::Log, self)
    }

    /// Elementwise sine
    pub fn sin(&self) -> Expr {
        make_unary(UnaryOp::Sin, self)
    }

    /// Elementwise cosine
    pub fn cos(&self) -> Expr {
        make_unary(UnaryOp::Cos, self)
    }

    /// Elementwise tangent
    pub fn tan(&self) -> Expr {
        make_unary(UnaryOp::Tan, self)
    }

    /// Elementwise arcsine
    pub fn asin(&self) -> Expr {
        make_unary(UnaryOp::Asin, self)
    }

    /// Elementwise arccosine
    pub fn acos(&self) -> Expr {
        make_unary(UnaryOp::Acos, self)
    }

    /// Elementwise arctangent
    pub fn atan(&self) -> Expr {
        make_unary(UnaryOp::Atan, self)
    }

    /// Elementwise hyperbolic tangent
    pub fn tanh(&self) -> Expr {
        make_unary(UnaryOp::Tanh, self)
    }

    /// Elementwise floor
    pub fn floor(&self) -> Expr {
        make_unary(UnaryOp::Floor, self)
    }

    /// Elementwise ceiling
    pub fn ceil(&self) -> Expr {
        make_unary(UnaryOp::Ceil, self)
    }

    /// Elementwise error function
    pub fn erf(&self) -> Expr {
        make_unary(UnaryOp::Erf, self)
    }
}

// Operator overloads delegate to the checked constructors and panic on
// dimension mismatch, which is the conventional contract for `std::ops`.
macro_rules! impl_binop {
    ($trait:ident, $method:ident, $func:path) => {
        impl ops::$trait for &Expr {
            type Output = Expr;
            fn $method(self, rhs: &Expr) -> Expr {
                match $func(self, rhs) {
                    Ok(e) => e,
                    Err(e) => panic!("{e}"),
                }
            }
        }

        impl ops::$trait for Expr {
            type Output = Expr;
            fn $method(self, rhs: Expr) -> Expr {
                ops::$trait::$method(&self, &rhs)
            }
        }

        impl ops::$trait<&Expr> for Expr {
            type Output = Expr;
            fn $method(self, rhs: &Expr) -> Expr {
                ops::$trait::$method(&self, rhs)
            }
        }

        impl ops::$trait<Expr> for &Expr {
            type Output = Expr;
            fn $method(self, rhs: Expr) -> Expr {
                ops::$trait::$method(self, &rhs)
            }
        }

        impl ops::$trait<f64> for &Expr {
            type Output = Expr;
            fn $method(self, rhs: f64) -> Expr {
                ops::$trait::$method(self, &Expr::from(rhs))
            }
        }

        impl ops::$trait<f64> for Expr {
            type Output = Expr;
            fn $method(self, rhs: f64) -> Expr {
                ops::$trait::$method(&self, &Expr::from(rhs))
            }
        }

        impl ops::$trait<&Expr> for f64 {
            type Output = Expr;
            fn $method(self, rhs: &Expr) -> Expr {
                ops::$trait::$method(&Expr::from(self), rhs)
            }
        }

        impl ops::$trait<Expr> for f64 {
            type Output = Expr;
            fn $method(self, rhs: Expr) -> Expr {
                ops::$trait::$method(&Expr::from(self), &rhs)
            }
        }
    };
}

impl_binop!(Add, add, add);
impl_binop!(Sub, sub, sub);
impl_binop!(Mul, mul, mul);
impl_binop!(Div, div, div);

impl ops::Neg for &Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        neg(self)
    }
}

impl ops::Neg for Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        neg(&self)
    }
}

impl ops::AddAssign<&Expr> for Expr {
    fn add_assign(&mut self, rhs: &Expr) {
        *self = &*self + rhs;
    }
}

impl ops::AddAssign for Expr {
    fn add_assign(&mut self, rhs: Expr) {
        *self = &*self + &rhs;
    }
}

impl ops::SubAssign<&Expr> for Expr {
    fn sub_assign(&mut self, rhs: &Expr) {
        *self = &*self - rhs;
    }
}

impl ops::SubAssign for Expr {
    fn sub_assign(&mut self, rhs: Expr) {
        *self = &*self - &rhs;
    }
}

impl ops::MulAssign<&Expr> for Expr {
    fn mul_assign(&mut self, rhs: &Expr) {
        *self = &*self * rhs;
    }
}

impl ops::MulAssign for Expr {
    fn mul_assign(&mut self, rhs: Expr) {
        *self = &*self * &rhs;
    }
}

impl ops::DivAssign<&Expr> for Expr {
    fn div_assign(&mut self, rhs: &Expr) {
        *self = &*self / rhs;
    }
}

impl ops::DivAssign for Expr {
    fn div_assign(&mut self, rhs: Expr) {
        *self = &*self / &rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_zero_returns_operand() {
        let x = Expr::sym("x", 2, 2);
        let z = &x + Expr::zeros(2, 2);
        assert!(z.ptr_eq(&x));
        let z = Expr::zeros(2, 2) + &x;
        assert!(z.ptr_eq(&x));
    }

    #[test]
    fn test_mul_one_returns_operand() {
        let x = Expr::sym("x", 2, 2);
        let z = &x * Expr::ones(2, 2);
        assert!(z.ptr_eq(&x));
        let z = &x * 1.0;
        assert!(z.ptr_eq(&x));
    }

    #[test]
    fn test_mul_minus_one_negates() {
        let x = Expr::sym("x", 2, 2);
        let z = &x * -1.0;
        assert!(z.is_unary_op(UnaryOp::Neg));
        assert!(z.dep(0).unwrap().ptr_eq(&x));
    }

    #[test]
    fn test_sub_self_is_zero() {
        let x = Expr::sym("x", 2, 2);
        let z = &x - &x;
        assert!(z.is_zero());
        assert_eq!(z.shape(), (2, 2));
    }

    #[test]
    fn test_double_negation_cancels() {
        let x = Expr::sym("x", 2, 2);
        let z = -(-&x);
        assert!(z.ptr_eq(&x));
    }

    #[test]
    fn test_sub_neg_becomes_add() {
        let x = Expr::sym("x", 2, 2);
        let y = Expr::sym("y", 2, 2);
        let z = &x - (-&y);
        assert!(z.is_op(BinaryOp::Add));
    }

    #[test]
    fn test_div_by_one_returns_operand() {
        let x = Expr::sym("x", 2, 2);
        let z = &x / 1.0;
        assert!(z.ptr_eq(&x));
    }

    #[test]
    fn test_pow_selects_const_exponent_op() {
        let x = Expr::sym("x", 2, 2);
        assert!(x.powf(2.0).unwrap().is_op(BinaryOp::ConstPow));
        let n = Expr::sym("n", 1, 1);
        assert!(x.pow(&n).unwrap().is_op(BinaryOp::Pow));
    }

    #[test]
    fn test_zero_times_anything_is_zero() {
        let x = Expr::sym("x", 2, 2);
        let z = &x * Expr::zeros(2, 2);
        assert!(z.is_zero());
        assert_eq!(z.ndep(), 0);
    }

    #[test]
    fn test_scalar_zero_not_absorbed_into_matrix_shape() {
        // 0-matrix + scalar must broadcast, not return the scalar
        let s = Expr::sym("s", 1, 1);
        let z = Expr::zeros(2, 2) + &s;
        assert_eq!(z.shape(), (2, 2));
    }

    #[test]
    fn test_mrdivide_scalar_only() {
        let x = Expr::sym("x", 2, 2);
        let s = Expr::sym("s", 1, 1);
        assert!(x.mrdivide(&s).is_ok());
        assert!(x.mrdivide(&x).is_err());
    }
}
