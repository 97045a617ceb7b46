//! Symbolic tensors.
//!
//! A [`Tensor`] names one array value: its shape, its element type and,
//! optionally, the [`Operation`] output slot that produces it. Tensors carry no
//! data. Indexing one yields an [`Expr::Read`] describing a single element.
//!
//! ```
//! use tensor_ir::prelude::*;
//!
//! let a = Tensor::placeholder([10, 20], "A", DType::F32);
//! let (i, j) = (Expr::var("i"), Expr::var("j"));
//!
//! let full = a.call(&[i.clone(), j.clone()]);
//! let curried: Expr = a.at(&i).at(&j).into();
//! assert_eq!(full, curried);
//! assert_eq!((a.at(i).at(j) + 1).to_string(), "(A(i, j) + 1)");
//! ```

mod slice;

use std::fmt;

use log::debug;

pub use slice::Slice;

use crate::config::{self, ArityCheck, IrConfig};
use crate::dtype::DType;
use crate::error::{IrError, Result};
use crate::expr::{shapes_equal, Expr, TensorRead};
use crate::node::{AttrValue, AttrVisitor, Node};
use crate::operation::Operation;

pub struct TensorNode {
    /// Symbolic extent of each dimension; its length is the rank.
    pub shape: Vec<Expr>,
    pub name: String,
    pub dtype: DType,
    /// Producing operation, `None` for a free-standing input.
    pub op: Option<Operation>,
    /// Output slot of `op` this tensor denotes.
    pub value_index: usize,
}

impl fmt::Debug for TensorNode {
    // The producing operation is shown by name; its body may read this tensor's
    // siblings and would make the output unreadable.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TensorNode")
            .field("shape", &self.shape)
            .field("name", &self.name)
            .field("dtype", &self.dtype)
            .field("op", &self.op.as_ref().map(|op| op.name.as_str()))
            .field("value_index", &self.value_index)
            .finish()
    }
}

impl Node for TensorNode {
    fn type_key(&self) -> &'static str {
        "Tensor"
    }

    fn visit_attrs(&self, visitor: &mut dyn AttrVisitor) {
        visitor.visit("shape", AttrValue::Exprs(&self.shape));
        visitor.visit("name", AttrValue::Str(&self.name));
        visitor.visit("dtype", AttrValue::DType(self.dtype));
        visitor.visit(
            "op",
            AttrValue::Node(self.op.as_ref().map(Operation::as_node_ref)),
        );
        visitor.visit("value_index", AttrValue::Int(self.value_index as i64));
    }
}

node_ref! {
    /// Handle to a symbolic tensor.
    ///
    /// Equality and hashing use the handle: two tensors built separately are
    /// different keys even if every field matches.
    Tensor => TensorNode
}

impl Tensor {
    /// Builds a tensor, checking it against the producing operation.
    ///
    /// `value_index` must be 0 when `op` is `None` and below
    /// `op.num_outputs()` otherwise. Unless output verification is disabled in
    /// the global [`IrConfig`], the shape and dtype must also match the
    /// operation's declared output.
    pub fn make<S, E>(
        shape: S,
        name: &str,
        dtype: DType,
        op: Option<Operation>,
        value_index: usize,
    ) -> Result<Tensor>
    where
        S: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        Self::make_with(shape, name, dtype, op, value_index, config::global())
    }

    /// [`make`](Self::make) under an explicit configuration.
    pub fn make_with<S, E>(
        shape: S,
        name: &str,
        dtype: DType,
        op: Option<Operation>,
        value_index: usize,
        config: &IrConfig,
    ) -> Result<Tensor>
    where
        S: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        let shape: Vec<Expr> = shape.into_iter().map(Into::into).collect();
        let verify = config.verify_outputs;
        if let Err(err) = check_signature(&shape, name, dtype, op.as_ref(), value_index, verify) {
            debug!("rejected tensor '{name}': {err}");
            return Err(err);
        }
        Ok(Self::new_unchecked(shape, name.to_string(), dtype, op, value_index))
    }

    /// A free-standing input tensor with no producing operation.
    pub fn placeholder<S, E>(shape: S, name: &str, dtype: DType) -> Tensor
    where
        S: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        let shape = shape.into_iter().map(Into::into).collect();
        Self::new_unchecked(shape, name.to_string(), dtype, None, 0)
    }

    pub(crate) fn new_unchecked(
        shape: Vec<Expr>,
        name: String,
        dtype: DType,
        op: Option<Operation>,
        value_index: usize,
    ) -> Tensor {
        Self::from_node(TensorNode {
            shape,
            name,
            dtype,
            op,
            value_index,
        })
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    pub fn shape(&self) -> &[Expr] {
        &self.shape
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name under which the tensor is referenced as a function, as in `A(i, j)`.
    pub fn func_name(&self) -> &str {
        &self.name
    }

    pub fn dtype(&self) -> DType {
        self.dtype
    }

    pub fn op(&self) -> Option<&Operation> {
        self.op.as_ref()
    }

    pub fn value_index(&self) -> usize {
        self.value_index
    }

    /// Builds the element access `self(indices...)` under the global arity policy.
    pub fn try_call(&self, indices: &[Expr]) -> Result<Expr> {
        self.try_call_with(indices, config::global().arity_check)
    }

    pub fn try_call_with(&self, indices: &[Expr], check: ArityCheck) -> Result<Expr> {
        if check == ArityCheck::Strict && indices.len() != self.rank() {
            let err = IrError::IndexArityMismatch {
                tensor: self.name.clone(),
                rank: self.rank(),
                given: indices.len(),
            };
            debug!("{err}");
            return Err(err);
        }
        Ok(Expr::Read(TensorRead {
            tensor: self.clone(),
            indices: indices.to_vec(),
        }))
    }

    /// Like [`try_call`](Self::try_call) but panics on an arity mismatch.
    pub fn call(&self, indices: &[Expr]) -> Expr {
        match self.try_call(indices) {
            Ok(expr) => expr,
            Err(err) => panic!("{err}"),
        }
    }

    /// Starts a partial index: `t.at(i).at(j)` is `t(i, j)`.
    pub fn at(&self, index: impl Into<Expr>) -> Slice<'_> {
        Slice::new(self, vec![index.into()])
    }
}

fn check_signature(
    shape: &[Expr],
    name: &str,
    dtype: DType,
    op: Option<&Operation>,
    value_index: usize,
    verify: bool,
) -> Result<()> {
    let Some(op) = op else {
        return if value_index == 0 {
            Ok(())
        } else {
            Err(IrError::DetachedValueIndex {
                tensor: name.to_string(),
                value_index,
            })
        };
    };

    if value_index >= op.num_outputs() {
        return Err(IrError::OutputIndexOutOfRange {
            op: op.name.clone(),
            index: value_index,
            num_outputs: op.num_outputs(),
        });
    }
    if !verify {
        return Ok(());
    }

    let mismatch = |detail: String| IrError::OutputSignatureMismatch {
        tensor: name.to_string(),
        op: op.name.clone(),
        value_index,
        detail,
    };

    let declared_shape = op.output_shape(value_index)?;
    if !shapes_equal(shape, &declared_shape) {
        return Err(mismatch(format!(
            "shape [{}] differs from declared [{}]",
            join(shape),
            join(&declared_shape)
        )));
    }
    let declared_dtype = op.output_dtype(value_index)?;
    if dtype != declared_dtype {
        return Err(mismatch(format!(
            "dtype {dtype} differs from declared {declared_dtype}"
        )));
    }
    Ok(())
}

fn join(exprs: &[Expr]) -> String {
    exprs
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
