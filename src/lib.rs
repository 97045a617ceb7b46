//! tensor-ir: symbolic tensors and the operations that produce them
//!
//! This crate is the leaf layer of a tensor-program IR. It describes which
//! tensors exist, how they are shaped and typed, and which operation produces
//! them. Scheduling, lowering and code generation are left to the layers built
//! on top of it.
//!
//! # Architecture
//!
//! - **node**: shared, immutable, type-tagged nodes with a field visitor
//! - **expr**: scalar expressions, including element reads of tensors
//! - **tensor**: `Tensor` handles and the `Slice` indexing builder
//! - **operation**: `Operation` handles over placeholder, compute and extern kinds
//! - **graph**: read/feed maps and producer-first ordering
//! - **config**: construction policy read from the environment
//!
//! # Example
//!
//! ```
//! use tensor_ir::prelude::*;
//!
//! let a = Tensor::placeholder([Expr::var("n"), Expr::int(4)], "A", DType::F32);
//! let b = compute(a.shape().to_vec(), "B", |ix| a.at(&ix[0]).at(&ix[1]) + 1.0);
//!
//! let op = b.op().unwrap();
//! assert_eq!(op.num_outputs(), 1);
//! assert_eq!(op.input_tensors(), vec![a.clone()]);
//! assert!(op.output(1).is_err());
//! ```

#[macro_use]
mod macros;

// ============================================================================
// Core Modules
// ============================================================================

pub mod config;
pub mod dtype;
pub mod error;
pub mod expr;
pub mod graph;
pub mod iter_var;
pub mod node;
pub mod operation;
pub mod tensor;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{ArityCheck, IrConfig};
pub use dtype::DType;
pub use error::{IrError, Result};
pub use expr::Expr;
pub use operation::Operation;
pub use tensor::{Slice, Tensor};

// ============================================================================
// Prelude
// ============================================================================

/// Prelude module with commonly used types and functions
pub mod prelude {
    pub use crate::config::{ArityCheck, IrConfig};
    pub use crate::dtype::{DType, TypeCode};
    pub use crate::error::{IrError, Result};
    pub use crate::expr::{shapes_equal, Expr, TensorRead};
    pub use crate::graph::{create_feed_graph, create_read_graph, post_dfs_order, ReadGraph};
    pub use crate::iter_var::{IterVar, IterVarKind, Range};
    pub use crate::operation::{
        compute, extern_op, placeholder_op, ComputeOp, ExternOp, ExternOutput, OpKind,
        OpSignature, Operation, PlaceholderOp,
    };
    pub use crate::tensor::{Slice, Tensor};
}
