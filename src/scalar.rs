//! Scalar trait connecting value types to the operation tags
//!
//! Evaluation of an expression graph is generic over the scalar type of the
//! value matrices. `f64` gives plain numeric evaluation; an external
//! symbolic-algebra scalar type can implement [`Scalar`] to evaluate the same
//! graph in an algebraic-substitution domain.

use crate::ops::{BinaryOp, UnaryOp};

/// Trait for types that can be elements of a value matrix
pub trait Scalar: Clone + std::fmt::Debug + 'static {
    /// Zero value (the value of structurally absent entries)
    fn zero() -> Self;

    /// One value
    fn one() -> Self;

    /// Convert from an `f64` constant
    fn from_f64(v: f64) -> Self;

    /// Apply a unary operation tag to a value
    fn apply_unary(op: UnaryOp, x: Self) -> Self;

    /// Apply a binary operation tag to two values
    fn apply_binary(op: BinaryOp, x: Self, y: Self) -> Self;
}

impl Scalar for f64 {
    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn one() -> Self {
        1.0
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v
    }

    fn apply_unary(op: UnaryOp, x: Self) -> Self {
        match op {
            UnaryOp::Neg => -x,
            UnaryOp::Abs => x.abs(),
            UnaryOp::Sqrt => x.sqrt(),
            UnaryOp::Exp => x.exp(),
            UnaryOp::Log => x.ln(),
            UnaryOp::Sin => x.sin(),
            UnaryOp::Cos => x.cos(),
            UnaryOp::Tan => x.tan(),
            UnaryOp::Asin => x.asin(),
            UnaryOp::Acos => x.acos(),
            UnaryOp::Atan => x.atan(),
            UnaryOp::Tanh => x.tanh(),
            UnaryOp::Floor => x.floor(),
            UnaryOp::Ceil => x.ceil(),
            UnaryOp::Erf => erf(x),
        }
    }

    fn apply_binary(op: BinaryOp, x: Self, y: Self) -> Self {
        match op {
            BinaryOp::Add => x + y,
            BinaryOp::Sub => x - y,
            BinaryOp::Mul => x * y,
            BinaryOp::Div => x / y,
            BinaryOp::Pow | BinaryOp::ConstPow => x.powf(y),
            BinaryOp::Min => x.min(y),
            BinaryOp::Max => x.max(y),
        }
    }
}

/// Error function, Abramowitz & Stegun 7.1.26 (absolute error below 1.5e-7)
fn erf(x: f64) -> f64 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + 0.327_591_1 * x);
    let poly = ((((1.061_405_429 * t - 1.453_152_027) * t + 1.421_413_741) * t - 0.284_496_736)
        * t
        + 0.254_829_592)
        * t;
    sign * (1.0 - poly * (-x * x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_f64_unary() {
        assert_eq!(f64::apply_unary(UnaryOp::Neg, 2.0), -2.0);
        assert_eq!(f64::apply_unary(UnaryOp::Cos, 0.0), 1.0);
    }

    #[test]
    fn test_f64_erf() {
        assert!(f64::apply_unary(UnaryOp::Erf, 0.0).abs() < 1e-7);
        assert!((f64::apply_unary(UnaryOp::Erf, 1.0) - 0.842_700_79).abs() < 1e-6);
        assert!((f64::apply_unary(UnaryOp::Erf, -1.0) + 0.842_700_79).abs() < 1e-6);
        assert!((f64::apply_unary(UnaryOp::Erf, 4.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_f64_binary() {
        assert_eq!(f64::apply_binary(BinaryOp::Add, 2.0, 3.0), 5.0);
        assert_eq!(f64::apply_binary(BinaryOp::ConstPow, 2.0, 3.0), 8.0);
        assert_eq!(f64::apply_binary(BinaryOp::Min, 2.0, 3.0), 2.0);
    }
}
