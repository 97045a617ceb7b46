use std::ops::{Add, Div, Mul, Neg, Not, Rem, Shl, Shr, Sub};

use super::Tensor;
use crate::error::Result;
use crate::expr::Expr;

/// A partially indexed tensor, produced by [`Tensor::at`].
///
/// Each [`at`](Slice::at) returns a new slice with one more coordinate and
/// leaves the receiver untouched. Indices are only validated when the slice is
/// turned into an expression.
#[derive(Debug, Clone)]
pub struct Slice<'t> {
    tensor: &'t Tensor,
    indices: Vec<Expr>,
}

impl<'t> Slice<'t> {
    pub(super) fn new(tensor: &'t Tensor, indices: Vec<Expr>) -> Self {
        Self { tensor, indices }
    }

    pub fn tensor(&self) -> &'t Tensor {
        self.tensor
    }

    pub fn indices(&self) -> &[Expr] {
        &self.indices
    }

    pub fn at(&self, index: impl Into<Expr>) -> Slice<'t> {
        let mut indices = Vec::with_capacity(self.indices.len() + 1);
        indices.extend_from_slice(&self.indices);
        indices.push(index.into());
        Slice::new(self.tensor, indices)
    }

    pub fn try_finalize(&self) -> Result<Expr> {
        self.tensor.try_call(&self.indices)
    }

    /// Panics if the coordinate count is rejected by the arity policy.
    pub fn finalize(&self) -> Expr {
        self.tensor.call(&self.indices)
    }

    pub fn lt(&self, rhs: impl Into<Expr>) -> Expr {
        self.finalize().lt(rhs)
    }

    pub fn le(&self, rhs: impl Into<Expr>) -> Expr {
        self.finalize().le(rhs)
    }

    pub fn gt(&self, rhs: impl Into<Expr>) -> Expr {
        self.finalize().gt(rhs)
    }

    pub fn ge(&self, rhs: impl Into<Expr>) -> Expr {
        self.finalize().ge(rhs)
    }

    pub fn equal(&self, rhs: impl Into<Expr>) -> Expr {
        self.finalize().equal(rhs)
    }

    pub fn not_equal(&self, rhs: impl Into<Expr>) -> Expr {
        self.finalize().not_equal(rhs)
    }

    pub fn and(&self, rhs: impl Into<Expr>) -> Expr {
        self.finalize().and(rhs)
    }

    pub fn or(&self, rhs: impl Into<Expr>) -> Expr {
        self.finalize().or(rhs)
    }
}

impl From<Slice<'_>> for Expr {
    fn from(slice: Slice<'_>) -> Self {
        slice.finalize()
    }
}

impl From<&Slice<'_>> for Expr {
    fn from(slice: &Slice<'_>) -> Self {
        slice.finalize()
    }
}

macro_rules! impl_slice_binary_op {
    ($trait:ident, $fname:ident) => {
        impl<T: Into<Expr>> $trait<T> for Slice<'_> {
            type Output = Expr;
            fn $fname(self, rhs: T) -> Self::Output {
                $trait::$fname(self.finalize(), rhs.into())
            }
        }
    };
}

impl_slice_binary_op!(Add, add);
impl_slice_binary_op!(Sub, sub);
impl_slice_binary_op!(Mul, mul);
impl_slice_binary_op!(Div, div);
impl_slice_binary_op!(Rem, rem);
impl_slice_binary_op!(Shl, shl);
impl_slice_binary_op!(Shr, shr);

impl_scalar_lhs_op!(Slice<'_>; i32, i64, usize, f32, f64);

impl Neg for Slice<'_> {
    type Output = Expr;

    fn neg(self) -> Self::Output {
        -self.finalize()
    }
}

impl Not for Slice<'_> {
    type Output = Expr;

    fn not(self) -> Self::Output {
        !self.finalize()
    }
}
