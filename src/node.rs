//! Reflective node substrate.
//!
//! Every IR entity (`Tensor`, `Operation`, `IterVar`) is a cheap handle around an
//! `Arc` to an immutable node. Handles compare and hash by pointer, so two
//! separately constructed nodes with identical contents are distinct keys.
//! Structural comparison is opt-in through [`structural_equal`].
//!
//! Nodes describe their fields to generic utilities through [`Node::visit_attrs`];
//! the printer and the structural comparator in this module are written only
//! against that visitor.

use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::dtype::DType;
use crate::expr::Expr;

mod printer;
mod structural;

pub use printer::dump;
pub use structural::structural_equal;

/// Downcasting support, implemented for every `'static + Send + Sync` type.
pub trait AsAny: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// A node payload stored behind a shared handle.
pub trait Node: AsAny + fmt::Debug {
    /// Type tag of the concrete node, e.g. `"Tensor"` or `"ComputeOp"`.
    fn type_key(&self) -> &'static str;

    /// Reports every field, in declaration order, to `visitor`.
    fn visit_attrs(&self, visitor: &mut dyn AttrVisitor);
}

/// A field value as seen by an [`AttrVisitor`].
#[derive(Debug, Clone)]
pub enum AttrValue<'a> {
    Str(&'a str),
    Int(i64),
    DType(DType),
    Expr(&'a Expr),
    Exprs(&'a [Expr]),
    Node(Option<NodeRef>),
    Nodes(Vec<NodeRef>),
}

pub trait AttrVisitor {
    fn visit(&mut self, key: &'static str, value: AttrValue<'_>);
}

/// Type-erased handle to any node.
#[derive(Clone)]
pub struct NodeRef(Arc<dyn Node>);

impl NodeRef {
    pub fn new<T: Node>(node: T) -> Self {
        Self(Arc::new(node))
    }

    pub fn from_arc(node: Arc<dyn Node>) -> Self {
        Self(node)
    }

    pub fn get(&self) -> &dyn Node {
        self.0.as_ref()
    }

    pub fn type_key(&self) -> &'static str {
        self.0.type_key()
    }

    pub fn visit_attrs(&self, visitor: &mut dyn AttrVisitor) {
        self.0.visit_attrs(visitor)
    }

    /// Returns `true` if both handles point at the same node.
    pub fn same_as(&self, other: &NodeRef) -> bool {
        self.handle_id() == other.handle_id()
    }

    /// Address of the shared node; stable for the node's lifetime.
    pub fn handle_id(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }

    pub fn downcast_ref<T: Node>(&self) -> Option<&T> {
        // Explicit path: `Arc<dyn Node>` is itself `AsAny` through the blanket impl.
        AsAny::as_any(self.get()).downcast_ref::<T>()
    }

    /// Recovers the typed `Arc`, sharing the same allocation.
    pub fn downcast<T: Node>(self) -> Result<Arc<T>, NodeRef> {
        let fallback = self.clone();
        AsAny::into_any(self.0).downcast::<T>().map_err(|_| fallback)
    }
}

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl Eq for NodeRef {}

impl Hash for NodeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.handle_id().hash(state);
    }
}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.get(), f)
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&dump(self))
    }
}
