/// Declares a typed, shared handle around a node type.
///
/// The handle derefs to the node, clones by bumping the reference count, and
/// compares and hashes by pointer identity. It converts to and from the
/// type-erased [`NodeRef`](crate::node::NodeRef).
///
/// # Example
///
/// ```ignore
/// node_ref! {
///     /// Handle to a tensor node.
///     Tensor => TensorNode
/// }
/// ```
macro_rules! node_ref {
    ($(#[$meta:meta])* $handle:ident => $node:ty) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $handle(::std::sync::Arc<$node>);

        impl $handle {
            pub(crate) fn from_node(node: $node) -> Self {
                ::log::trace!("new {} node", stringify!($handle));
                Self(::std::sync::Arc::new(node))
            }

            /// Returns the node behind this handle.
            pub fn node(&self) -> &$node {
                &self.0
            }

            /// Returns `true` if both handles refer to the same node.
            pub fn same_as(&self, other: &Self) -> bool {
                ::std::sync::Arc::ptr_eq(&self.0, &other.0)
            }

            /// Address of the shared node, the basis of equality and hashing.
            pub fn handle_id(&self) -> usize {
                ::std::sync::Arc::as_ptr(&self.0) as *const () as usize
            }

            /// Number of live handles sharing the node.
            pub fn use_count(&self) -> usize {
                ::std::sync::Arc::strong_count(&self.0)
            }

            pub fn as_node_ref(&self) -> $crate::node::NodeRef {
                $crate::node::NodeRef::from_arc(self.0.clone())
            }
        }

        impl ::std::ops::Deref for $handle {
            type Target = $node;

            fn deref(&self) -> &$node {
                &self.0
            }
        }

        impl PartialEq for $handle {
            fn eq(&self, other: &Self) -> bool {
                self.same_as(other)
            }
        }

        impl Eq for $handle {}

        impl ::std::hash::Hash for $handle {
            fn hash<H: ::std::hash::Hasher>(&self, state: &mut H) {
                ::std::hash::Hash::hash(&self.handle_id(), state);
            }
        }

        impl ::std::fmt::Debug for $handle {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Debug::fmt(&*self.0, f)
            }
        }

        impl ::std::fmt::Display for $handle {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(&$crate::node::dump(&self.as_node_ref()))
            }
        }

        impl From<$handle> for $crate::node::NodeRef {
            fn from(handle: $handle) -> Self {
                $crate::node::NodeRef::from_arc(handle.0)
            }
        }

        impl TryFrom<$crate::node::NodeRef> for $handle {
            type Error = $crate::node::NodeRef;

            fn try_from(node: $crate::node::NodeRef) -> ::std::result::Result<Self, Self::Error> {
                node.downcast::<$node>().map($handle)
            }
        }
    };
}

/// Implements a binary `std::ops` trait for primitive left operands whose
/// right operand converts to an [`Expr`](crate::expr::Expr).
///
/// Several primitive types are covered, so a bare literal on the left needs a
/// type context: write `2i32 * x` or bind the result as `Expr`.
macro_rules! impl_scalar_lhs_op {
    ($rhs:ty; $($t:ty),*) => {
        $(
            impl_scalar_lhs_op!(@one $rhs, $t, Add, add);
            impl_scalar_lhs_op!(@one $rhs, $t, Sub, sub);
            impl_scalar_lhs_op!(@one $rhs, $t, Mul, mul);
            impl_scalar_lhs_op!(@one $rhs, $t, Div, div);
            impl_scalar_lhs_op!(@one $rhs, $t, Rem, rem);
        )*
    };
    (@one $rhs:ty, $t:ty, $trait:ident, $fname:ident) => {
        impl ::std::ops::$trait<$rhs> for $t {
            type Output = $crate::expr::Expr;

            fn $fname(self, rhs: $rhs) -> Self::Output {
                ::std::ops::$trait::$fname($crate::expr::Expr::from(self), $crate::expr::Expr::from(rhs))
            }
        }
    };
}
