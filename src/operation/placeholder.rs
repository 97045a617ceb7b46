use super::{OpKind, OpSignature, Operation};
use crate::dtype::DType;
use crate::expr::Expr;
use crate::iter_var::IterVar;
use crate::node::{AttrValue, AttrVisitor};
use crate::tensor::Tensor;

/// An input vertex: a single output with a fixed shape and dtype.
#[derive(Debug, Clone)]
pub struct PlaceholderOp {
    pub shape: Vec<Expr>,
    pub dtype: DType,
}

impl OpSignature for PlaceholderOp {
    fn root_iter_vars(&self) -> &[IterVar] {
        &[]
    }

    fn num_outputs(&self) -> usize {
        1
    }

    fn output_name<'a>(&'a self, op_name: &'a str, _slot: usize) -> &'a str {
        op_name
    }

    fn output_dtype(&self, _slot: usize) -> DType {
        self.dtype
    }

    fn output_shape(&self, _slot: usize) -> Vec<Expr> {
        self.shape.clone()
    }

    fn input_tensors(&self) -> Vec<Tensor> {
        Vec::new()
    }

    fn type_key(&self) -> &'static str {
        "PlaceholderOp"
    }

    fn visit_attrs(&self, visitor: &mut dyn AttrVisitor) {
        visitor.visit("shape", AttrValue::Exprs(&self.shape));
        visitor.visit("dtype", AttrValue::DType(self.dtype));
    }
}

/// Builds an input vertex.
///
/// Unlike [`Tensor::placeholder`], whose tensor has no producer, the output of
/// this operation records the vertex as its `op`, so graph utilities see it.
pub fn placeholder_op<S, E>(shape: S, name: &str, dtype: DType) -> Operation
where
    S: IntoIterator<Item = E>,
    E: Into<Expr>,
{
    let shape = shape.into_iter().map(Into::into).collect();
    Operation::new(name, OpKind::Placeholder(PlaceholderOp { shape, dtype }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_op_signature() {
        let op = placeholder_op([Expr::var("n"), Expr::int(3)], "X", DType::F64);
        assert_eq!(op.num_outputs(), 1);
        assert!(op.root_iter_vars().is_empty());
        assert!(op.input_tensors().is_empty());
        assert_eq!(op.output_name(0).unwrap(), "X");

        let x = op.output(0).unwrap();
        assert_eq!(x.rank(), 2);
        assert_eq!(x.dtype(), DType::F64);
        assert_eq!(x.op(), Some(&op));
    }

    #[test]
    fn test_placeholder_op_dump() {
        let op = placeholder_op([2], "X", DType::F32);
        assert_eq!(
            op.to_string(),
            "PlaceholderOp(name=\"X\", shape=[2], dtype=float32)"
        );
    }
}
