//! Graph vertices that produce tensors.
//!
//! An [`Operation`] is a handle to an [`OperationNode`]: a name plus one of a
//! closed set of kinds. Every kind answers the same output-signature queries
//! through [`OpSignature`]; the handle adds range checking and builds the
//! [`Tensor`] handles for its outputs.

mod compute;
mod extern_op;
mod placeholder;

use log::debug;
use rustc_hash::FxHashSet;

pub use compute::{compute, ComputeOp};
pub use extern_op::{extern_op, ExternOp, ExternOutput};
pub use placeholder::{placeholder_op, PlaceholderOp};

use crate::dtype::DType;
use crate::error::{IrError, Result};
use crate::expr::Expr;
use crate::iter_var::IterVar;
use crate::node::{AttrValue, AttrVisitor, Node};
use crate::tensor::Tensor;

/// Output signature shared by every operation kind.
///
/// Slot arguments are already range-checked by [`Operation`].
pub trait OpSignature {
    /// Iteration variables spanning the operation's root loop nest.
    fn root_iter_vars(&self) -> &[IterVar];

    fn num_outputs(&self) -> usize;

    fn output_name<'a>(&'a self, op_name: &'a str, slot: usize) -> &'a str;

    fn output_dtype(&self, slot: usize) -> DType;

    fn output_shape(&self, slot: usize) -> Vec<Expr>;

    /// Tensors this operation reads, without duplicates.
    fn input_tensors(&self) -> Vec<Tensor>;

    fn type_key(&self) -> &'static str;

    fn visit_attrs(&self, visitor: &mut dyn AttrVisitor);
}

#[derive(Debug)]
pub enum OpKind {
    Placeholder(PlaceholderOp),
    Compute(ComputeOp),
    Extern(ExternOp),
}

impl OpKind {
    fn signature(&self) -> &dyn OpSignature {
        match self {
            OpKind::Placeholder(op) => op,
            OpKind::Compute(op) => op,
            OpKind::Extern(op) => op,
        }
    }
}

#[derive(Debug)]
pub struct OperationNode {
    pub name: String,
    pub kind: OpKind,
}

impl Node for OperationNode {
    fn type_key(&self) -> &'static str {
        self.kind.signature().type_key()
    }

    fn visit_attrs(&self, visitor: &mut dyn AttrVisitor) {
        visitor.visit("name", AttrValue::Str(&self.name));
        self.kind.signature().visit_attrs(visitor);
    }
}

node_ref! {
    /// Handle to a graph vertex producing one or more tensors.
    Operation => OperationNode
}

impl Operation {
    pub fn new(name: &str, kind: OpKind) -> Self {
        Self::from_node(OperationNode {
            name: name.to_string(),
            kind,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root_iter_vars(&self) -> &[IterVar] {
        self.kind.signature().root_iter_vars()
    }

    pub fn num_outputs(&self) -> usize {
        self.kind.signature().num_outputs()
    }

    pub fn output_name(&self, i: usize) -> Result<&str> {
        self.check_slot(i)?;
        Ok(self.kind.signature().output_name(&self.name, i))
    }

    pub fn output_dtype(&self, i: usize) -> Result<DType> {
        self.check_slot(i)?;
        Ok(self.kind.signature().output_dtype(i))
    }

    pub fn output_shape(&self, i: usize) -> Result<Vec<Expr>> {
        self.check_slot(i)?;
        Ok(self.kind.signature().output_shape(i))
    }

    /// Returns a tensor for output slot `i`.
    ///
    /// Each call builds a fresh handle. The handles of two calls denote the
    /// same output (same `op`, same `value_index`) but do not compare equal.
    pub fn output(&self, i: usize) -> Result<Tensor> {
        if let Err(err) = self.check_slot(i) {
            debug!("{err}");
            return Err(err);
        }
        Ok(self.output_unchecked(i))
    }

    /// All outputs in slot order.
    pub fn outputs(&self) -> Vec<Tensor> {
        (0..self.num_outputs())
            .map(|i| self.output_unchecked(i))
            .collect()
    }

    pub fn input_tensors(&self) -> Vec<Tensor> {
        self.kind.signature().input_tensors()
    }

    pub fn as_placeholder(&self) -> Option<&PlaceholderOp> {
        match &self.kind {
            OpKind::Placeholder(op) => Some(op),
            _ => None,
        }
    }

    pub fn as_compute(&self) -> Option<&ComputeOp> {
        match &self.kind {
            OpKind::Compute(op) => Some(op),
            _ => None,
        }
    }

    pub fn as_extern(&self) -> Option<&ExternOp> {
        match &self.kind {
            OpKind::Extern(op) => Some(op),
            _ => None,
        }
    }

    fn check_slot(&self, i: usize) -> Result<()> {
        let num_outputs = self.num_outputs();
        if i < num_outputs {
            Ok(())
        } else {
            Err(IrError::OutputIndexOutOfRange {
                op: self.name.clone(),
                index: i,
                num_outputs,
            })
        }
    }

    pub(crate) fn output_unchecked(&self, i: usize) -> Tensor {
        let signature = self.kind.signature();
        Tensor::new_unchecked(
            signature.output_shape(i),
            signature.output_name(&self.name, i).to_string(),
            signature.output_dtype(i),
            Some(self.clone()),
            i,
        )
    }
}

/// Keeps the first occurrence of every tensor handle.
pub(crate) fn dedup_tensors(tensors: impl IntoIterator<Item = Tensor>) -> Vec<Tensor> {
    let mut seen = FxHashSet::default();
    tensors
        .into_iter()
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::structural_equal;
    use rstest::rstest;
    use std::collections::HashSet;

    fn pair_op() -> Operation {
        extern_op(
            "pair",
            "split",
            vec![],
            vec![
                ExternOutput::new("first", [10], DType::F32),
                ExternOutput::new("second", [20], DType::F32),
            ],
        )
    }

    #[rstest]
    #[case(0, 10)]
    #[case(1, 20)]
    fn test_output_slots(#[case] i: usize, #[case] extent: i64) {
        let op = pair_op();
        let t = op.output(i).unwrap();
        assert_eq!(t.op(), Some(&op));
        assert_eq!(t.value_index(), i);
        assert_eq!(t.shape(), &[Expr::int(extent)]);
        assert_eq!(t.dtype(), DType::F32);
    }

    #[test]
    fn test_output_out_of_range() {
        let op = pair_op();
        let err = op.output(5).unwrap_err();
        assert_eq!(
            err,
            IrError::OutputIndexOutOfRange {
                op: "pair".to_string(),
                index: 5,
                num_outputs: 2
            }
        );
        assert!(op.output_shape(2).is_err());
        assert!(op.output_name(2).is_err());
        assert!(op.output_dtype(2).is_err());
    }

    #[test]
    fn test_repeated_output_calls() {
        let op = pair_op();
        let a = op.output(1).unwrap();
        let b = op.output(1).unwrap();
        assert_ne!(a, b);
        assert_eq!(a.op(), b.op());
        assert_eq!(a.value_index(), b.value_index());
        assert!(structural_equal(&a.as_node_ref(), &b.as_node_ref()));
    }

    #[test]
    fn test_handle_equality_and_hash() {
        let a = pair_op();
        let b = pair_op();
        assert_ne!(a, b);
        assert!(structural_equal(&a.as_node_ref(), &b.as_node_ref()));

        let set: HashSet<Operation> = [a.clone(), a.clone(), b.clone()].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert!(set.contains(&a) && set.contains(&b));
    }

    #[test]
    fn test_kind_downcast() {
        let p = placeholder_op([4], "X", DType::F32);
        assert!(p.as_placeholder().is_some());
        assert!(p.as_compute().is_none());
        assert_eq!(p.as_node_ref().type_key(), "PlaceholderOp");

        let erased = p.as_node_ref();
        let back = Operation::try_from(erased).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn test_outputs_in_slot_order() {
        let outs = pair_op().outputs();
        let names: Vec<_> = outs.iter().map(|t| t.name().to_string()).collect();
        assert_eq!(names, ["first", "second"]);
        assert_eq!(outs[1].value_index(), 1);
    }
}
