//! Scalar expression trees.
//!
//! `Expr` covers the symbolic values the tensor layer needs: integer and float
//! immediates, named variables, arithmetic, comparison and logical nodes, and
//! [`TensorRead`], the element access produced by indexing a [`Tensor`].
//!
//! # Examples
//!
//! ```
//! use tensor_ir::expr::Expr;
//!
//! let i = Expr::var("i");
//! let e = (i.clone() + 1) * 2;
//! assert_eq!(e.to_string(), "((i + 1) * 2)");
//! assert_eq!(i.lt(10).to_string(), "(i < 10)");
//! ```

mod ops;
mod simplify;

use std::fmt;

pub use simplify::shapes_equal;

use crate::dtype::DType;
use crate::operation::Operation;
use crate::tensor::Tensor;

/// Float immediate compared and hashed by bit pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FloatImm(u64);

impl FloatImm {
    pub fn new(value: f64) -> Self {
        Self(value.to_bits())
    }

    pub fn value(self) -> f64 {
        f64::from_bits(self.0)
    }
}

/// Element access `tensor(indices...)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TensorRead {
    pub tensor: Tensor,
    pub indices: Vec<Expr>,
}

impl TensorRead {
    /// Output slot of the producing operation that is being read.
    pub fn value_index(&self) -> usize {
        self.tensor.value_index()
    }

    pub fn op(&self) -> Option<&Operation> {
        self.tensor.op()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    IntImm(i64),
    FloatImm(FloatImm),
    Bool(bool),
    Var(String),
    Cast(DType, Box<Self>),

    Add(Box<Self>, Box<Self>),
    Sub(Box<Self>, Box<Self>),
    Mul(Box<Self>, Box<Self>),
    Div(Box<Self>, Box<Self>),
    Rem(Box<Self>, Box<Self>),
    Shl(Box<Self>, Box<Self>),
    Shr(Box<Self>, Box<Self>),

    Lt(Box<Self>, Box<Self>),
    Le(Box<Self>, Box<Self>),
    Gt(Box<Self>, Box<Self>),
    Ge(Box<Self>, Box<Self>),
    Eq(Box<Self>, Box<Self>),
    Ne(Box<Self>, Box<Self>),

    And(Box<Self>, Box<Self>),
    Or(Box<Self>, Box<Self>),
    Not(Box<Self>),

    Read(TensorRead),
}

impl Expr {
    pub const TRUE: Expr = Expr::Bool(true);
    pub const FALSE: Expr = Expr::Bool(false);

    pub fn var(name: &str) -> Self {
        Self::Var(name.to_string())
    }

    pub fn int(value: i64) -> Self {
        Self::IntImm(value)
    }

    pub fn float(value: f64) -> Self {
        Self::FloatImm(FloatImm::new(value))
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::IntImm(0))
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Expr::IntImm(1))
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Expr::IntImm(v) => Some(*v),
            _ => None,
        }
    }

    pub fn cast(self, dtype: DType) -> Self {
        Self::Cast(dtype, Box::new(self))
    }

    pub fn lt(self, rhs: impl Into<Expr>) -> Self {
        Self::Lt(Box::new(self), Box::new(rhs.into()))
    }

    pub fn le(self, rhs: impl Into<Expr>) -> Self {
        Self::Le(Box::new(self), Box::new(rhs.into()))
    }

    pub fn gt(self, rhs: impl Into<Expr>) -> Self {
        Self::Gt(Box::new(self), Box::new(rhs.into()))
    }

    pub fn ge(self, rhs: impl Into<Expr>) -> Self {
        Self::Ge(Box::new(self), Box::new(rhs.into()))
    }

    /// Symbolic `==`; `PartialEq` stays structural.
    pub fn equal(self, rhs: impl Into<Expr>) -> Self {
        Self::Eq(Box::new(self), Box::new(rhs.into()))
    }

    /// Symbolic `!=`.
    pub fn not_equal(self, rhs: impl Into<Expr>) -> Self {
        Self::Ne(Box::new(self), Box::new(rhs.into()))
    }

    pub fn and(self, rhs: impl Into<Expr>) -> Self {
        Self::And(Box::new(self), Box::new(rhs.into()))
    }

    pub fn or(self, rhs: impl Into<Expr>) -> Self {
        Self::Or(Box::new(self), Box::new(rhs.into()))
    }

    /// Infers the element type of the expression.
    ///
    /// Arithmetic takes the type of its left operand; comparisons and logical
    /// nodes are `bool`; variables are `int32` index variables.
    pub fn dtype(&self) -> DType {
        match self {
            Expr::IntImm(_) | Expr::Var(_) => DType::I32,
            Expr::FloatImm(_) => DType::F32,
            Expr::Bool(_) => DType::BOOL,
            Expr::Cast(dtype, _) => *dtype,
            Expr::Add(l, _)
            | Expr::Sub(l, _)
            | Expr::Mul(l, _)
            | Expr::Div(l, _)
            | Expr::Rem(l, _)
            | Expr::Shl(l, _)
            | Expr::Shr(l, _) => l.dtype(),
            Expr::Lt(..)
            | Expr::Le(..)
            | Expr::Gt(..)
            | Expr::Ge(..)
            | Expr::Eq(..)
            | Expr::Ne(..)
            | Expr::And(..)
            | Expr::Or(..)
            | Expr::Not(_) => DType::BOOL,
            Expr::Read(read) => read.tensor.dtype(),
        }
    }

    /// Visits every tensor read in pre-order, outer reads before the reads
    /// nested in their indices.
    pub fn for_each_read(&self, f: &mut impl FnMut(&TensorRead)) {
        match self {
            Expr::IntImm(_) | Expr::FloatImm(_) | Expr::Bool(_) | Expr::Var(_) => {}
            Expr::Cast(_, e) | Expr::Not(e) => e.for_each_read(f),
            Expr::Add(l, r)
            | Expr::Sub(l, r)
            | Expr::Mul(l, r)
            | Expr::Div(l, r)
            | Expr::Rem(l, r)
            | Expr::Shl(l, r)
            | Expr::Shr(l, r)
            | Expr::Lt(l, r)
            | Expr::Le(l, r)
            | Expr::Gt(l, r)
            | Expr::Ge(l, r)
            | Expr::Eq(l, r)
            | Expr::Ne(l, r)
            | Expr::And(l, r)
            | Expr::Or(l, r) => {
                l.for_each_read(f);
                r.for_each_read(f);
            }
            Expr::Read(read) => {
                f(read);
                for index in &read.indices {
                    index.for_each_read(f);
                }
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::IntImm(v) => write!(f, "{v}"),
            Expr::FloatImm(v) => write!(f, "{:?}f", v.value()),
            Expr::Bool(b) => write!(f, "{b}"),
            Expr::Var(name) => write!(f, "{name}"),
            Expr::Cast(dtype, e) => write!(f, "{dtype}({e})"),
            Expr::Add(l, r) => write!(f, "({l} + {r})"),
            Expr::Sub(l, r) => write!(f, "({l} - {r})"),
            Expr::Mul(l, r) => write!(f, "({l} * {r})"),
            Expr::Div(l, r) => write!(f, "({l} / {r})"),
            Expr::Rem(l, r) => write!(f, "({l} % {r})"),
            Expr::Shl(l, r) => write!(f, "({l} << {r})"),
            Expr::Shr(l, r) => write!(f, "({l} >> {r})"),
            Expr::Lt(l, r) => write!(f, "({l} < {r})"),
            Expr::Le(l, r) => write!(f, "({l} <= {r})"),
            Expr::Gt(l, r) => write!(f, "({l} > {r})"),
            Expr::Ge(l, r) => write!(f, "({l} >= {r})"),
            Expr::Eq(l, r) => write!(f, "({l} == {r})"),
            Expr::Ne(l, r) => write!(f, "({l} != {r})"),
            Expr::And(l, r) => write!(f, "({l} && {r})"),
            Expr::Or(l, r) => write!(f, "({l} || {r})"),
            Expr::Not(e) => write!(f, "!{e}"),
            Expr::Read(read) => {
                write!(f, "{}(", read.tensor.name())?;
                for (i, index) in read.indices.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{index}")?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Expr::int(1), "1")]
    #[case(Expr::float(0.5), "0.5f")]
    #[case(Expr::var("x"), "x")]
    #[case(Expr::var("x") + 1, "(x + 1)")]
    #[case(Expr::var("y") - 2, "(y - 2)")]
    #[case(Expr::var("a") * Expr::var("b"), "(a * b)")]
    #[case(Expr::var("a") << 2, "(a << 2)")]
    #[case(Expr::var("x").le(1), "(x <= 1)")]
    #[case(Expr::var("x").equal(Expr::var("y")), "(x == y)")]
    #[case(Expr::var("x").not_equal(3), "(x != 3)")]
    #[case(Expr::var("x").and(Expr::var("y")), "(x && y)")]
    #[case(!Expr::var("x"), "!x")]
    #[case(Expr::var("x").cast(DType::F32), "float32(x)")]
    #[case(Expr::TRUE, "true")]
    fn test_display(#[case] expr: Expr, #[case] expected: &str) {
        assert_eq!(expr.to_string(), expected);
    }

    #[rstest]
    #[case(Expr::int(3), DType::I32)]
    #[case(Expr::float(3.0), DType::F32)]
    #[case(Expr::float(1.0) * Expr::var("i"), DType::F32)]
    #[case(Expr::var("i") * 2.0f32, DType::I32)]
    #[case(Expr::var("i").lt(3), DType::BOOL)]
    #[case(!Expr::TRUE, DType::BOOL)]
    #[case(Expr::var("i").cast(DType::F64), DType::F64)]
    fn test_dtype_inference(#[case] expr: Expr, #[case] expected: DType) {
        assert_eq!(expr.dtype(), expected);
    }

    #[test]
    fn test_float_imm_bitwise_identity() {
        assert_eq!(Expr::float(1.5), Expr::float(1.5));
        assert_ne!(Expr::float(0.0), Expr::float(-0.0));
        assert_eq!(Expr::float(f64::NAN), Expr::float(f64::NAN));
        assert_eq!(FloatImm::new(2.25).value(), 2.25);
    }

    #[test]
    fn test_as_int() {
        assert_eq!(Expr::int(7).as_int(), Some(7));
        assert_eq!(Expr::var("n").as_int(), None);
        assert!(Expr::int(0).is_zero());
        assert!(Expr::int(1).is_one());
    }
}
