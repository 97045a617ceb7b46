use super::{dedup_tensors, OpKind, OpSignature, Operation};
use crate::dtype::DType;
use crate::expr::Expr;
use crate::iter_var::{IterVar, IterVarKind, Range};
use crate::node::{AttrValue, AttrVisitor, NodeRef};
use crate::tensor::Tensor;

/// A single-output vertex defined pointwise: `out(axis...) = body`.
#[derive(Debug, Clone)]
pub struct ComputeOp {
    pub axis: Vec<IterVar>,
    pub body: Expr,
}

impl ComputeOp {
    pub fn new(axis: Vec<IterVar>, body: Expr) -> Self {
        Self { axis, body }
    }
}

impl OpSignature for ComputeOp {
    fn root_iter_vars(&self) -> &[IterVar] {
        &self.axis
    }

    fn num_outputs(&self) -> usize {
        1
    }

    fn output_name<'a>(&'a self, op_name: &'a str, _slot: usize) -> &'a str {
        op_name
    }

    fn output_dtype(&self, _slot: usize) -> DType {
        self.body.dtype()
    }

    fn output_shape(&self, _slot: usize) -> Vec<Expr> {
        self.axis.iter().map(|iv| iv.dom.extent.clone()).collect()
    }

    /// Distinct tensors read by the body, in first-read order.
    fn input_tensors(&self) -> Vec<Tensor> {
        let mut reads = Vec::new();
        self.body.for_each_read(&mut |read| reads.push(read.tensor.clone()));
        dedup_tensors(reads)
    }

    fn type_key(&self) -> &'static str {
        "ComputeOp"
    }

    fn visit_attrs(&self, visitor: &mut dyn AttrVisitor) {
        let axis: Vec<NodeRef> = self.axis.iter().map(IterVar::as_node_ref).collect();
        visitor.visit("axis", AttrValue::Nodes(axis));
        visitor.visit("body", AttrValue::Expr(&self.body));
    }
}

/// Builds a compute vertex over `shape` and returns its output tensor.
///
/// `body` receives one index variable per dimension (`ax0`, `ax1`, ...).
///
/// ```
/// use tensor_ir::prelude::*;
///
/// let a = Tensor::placeholder([4, 8], "A", DType::F32);
/// let b = compute([4, 8], "B", |ix| a.at(&ix[0]).at(&ix[1]) * 2.0);
///
/// assert_eq!(b.shape(), a.shape());
/// assert_eq!(b.dtype(), DType::F32);
/// assert_eq!(b.op().unwrap().input_tensors(), vec![a.clone()]);
/// ```
pub fn compute<S, E>(shape: S, name: &str, body: impl FnOnce(&[Expr]) -> Expr) -> Tensor
where
    S: IntoIterator<Item = E>,
    E: Into<Expr>,
{
    let axis: Vec<IterVar> = shape
        .into_iter()
        .enumerate()
        .map(|(k, extent)| {
            IterVar::new(
                Range::from_extent(extent),
                &format!("ax{k}"),
                IterVarKind::DataPar,
            )
        })
        .collect();
    let indices: Vec<Expr> = axis.iter().map(IterVar::var).collect();
    let body = body(&indices);

    let op = Operation::new(name, OpKind::Compute(ComputeOp::new(axis, body)));
    op.output_unchecked(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_signature() {
        let a = Tensor::placeholder([Expr::var("n"), Expr::int(3)], "A", DType::F32);
        let c = compute(a.shape().to_vec(), "C", |ix| {
            a.at(&ix[0]).at(&ix[1]) + a.at(&ix[0]).at(0)
        });

        let op = c.op().unwrap();
        assert_eq!(c.value_index(), 0);
        assert_eq!(c.name(), "C");
        assert_eq!(c.shape(), a.shape());
        assert_eq!(op.root_iter_vars().len(), 2);
        assert_eq!(op.root_iter_vars()[1].var(), Expr::var("ax1"));
        assert_eq!(op.input_tensors(), vec![a.clone()]);
        assert_eq!(
            op.as_compute().unwrap().body.to_string(),
            "(A(ax0, ax1) + A(ax0, 0))"
        );
    }

    #[test]
    fn test_compute_dtype_follows_body() {
        let c = compute([4], "idx", |ix| ix[0].clone() * 2);
        assert_eq!(c.dtype(), DType::I32);

        let mask = compute([4], "mask", |ix| ix[0].clone().lt(2));
        assert_eq!(mask.dtype(), DType::BOOL);
    }

    #[test]
    fn test_compute_inputs_in_first_read_order() {
        let a = Tensor::placeholder([4], "A", DType::F32);
        let b = Tensor::placeholder([4], "B", DType::F32);
        let c = compute([4], "C", |ix| b.at(&ix[0]) + a.at(&ix[0]) * b.at(&ix[0]));
        assert_eq!(c.op().unwrap().input_tensors(), vec![b.clone(), a.clone()]);
    }

    #[test]
    fn test_scalar_compute() {
        let s = compute(Vec::<Expr>::new(), "s", |ix| {
            assert!(ix.is_empty());
            Expr::float(1.0)
        });
        assert_eq!(s.rank(), 0);
        assert_eq!(s.call(&[]).to_string(), "s()");
    }
}
