use super::{dedup_tensors, OpKind, OpSignature, Operation};
use crate::dtype::DType;
use crate::expr::Expr;
use crate::iter_var::IterVar;
use crate::node::{AttrValue, AttrVisitor, NodeRef};
use crate::tensor::Tensor;

/// Declared signature of one output of an [`ExternOp`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternOutput {
    pub name: String,
    pub shape: Vec<Expr>,
    pub dtype: DType,
}

impl ExternOutput {
    pub fn new<S, E>(name: &str, shape: S, dtype: DType) -> Self
    where
        S: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        Self {
            name: name.to_string(),
            shape: shape.into_iter().map(Into::into).collect(),
            dtype,
        }
    }
}

/// An opaque vertex computed outside the IR, e.g. a library call.
#[derive(Debug, Clone)]
pub struct ExternOp {
    pub inputs: Vec<Tensor>,
    pub outputs: Vec<ExternOutput>,
    /// Free-form label identifying the external routine.
    pub tag: String,
}

impl OpSignature for ExternOp {
    fn root_iter_vars(&self) -> &[IterVar] {
        &[]
    }

    fn num_outputs(&self) -> usize {
        self.outputs.len()
    }

    fn output_name<'a>(&'a self, _op_name: &'a str, slot: usize) -> &'a str {
        &self.outputs[slot].name
    }

    fn output_dtype(&self, slot: usize) -> DType {
        self.outputs[slot].dtype
    }

    fn output_shape(&self, slot: usize) -> Vec<Expr> {
        self.outputs[slot].shape.clone()
    }

    fn input_tensors(&self) -> Vec<Tensor> {
        dedup_tensors(self.inputs.iter().cloned())
    }

    fn type_key(&self) -> &'static str {
        "ExternOp"
    }

    fn visit_attrs(&self, visitor: &mut dyn AttrVisitor) {
        visitor.visit("tag", AttrValue::Str(&self.tag));
        let inputs: Vec<NodeRef> = self.inputs.iter().map(Tensor::as_node_ref).collect();
        visitor.visit("inputs", AttrValue::Nodes(inputs));
        for output in &self.outputs {
            visitor.visit("output_name", AttrValue::Str(&output.name));
            visitor.visit("output_shape", AttrValue::Exprs(&output.shape));
            visitor.visit("output_dtype", AttrValue::DType(output.dtype));
        }
    }
}

/// Builds an extern vertex with the declared outputs.
pub fn extern_op(
    name: &str,
    tag: &str,
    inputs: Vec<Tensor>,
    outputs: Vec<ExternOutput>,
) -> Operation {
    Operation::new(
        name,
        OpKind::Extern(ExternOp {
            inputs,
            outputs,
            tag: tag.to_string(),
        }),
    )
}
