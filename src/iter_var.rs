//! Iteration variables and their domains.

use std::fmt;

use crate::expr::Expr;
use crate::node::{AttrValue, AttrVisitor, Node};

/// Half-open interval `[min, min + extent)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Range {
    pub min: Expr,
    pub extent: Expr,
}

impl Range {
    pub fn new(min: impl Into<Expr>, extent: impl Into<Expr>) -> Self {
        Self {
            min: min.into(),
            extent: extent.into(),
        }
    }

    /// `[0, extent)`.
    pub fn from_extent(extent: impl Into<Expr>) -> Self {
        Self::new(0, extent)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "range(min={}, ext={})", self.min, self.extent)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IterVarKind {
    /// Every point can be computed independently.
    #[default]
    DataPar,
    /// Reduction axis of a commutative reduction.
    CommReduce,
    /// Iterations must run in order, e.g. a scan.
    Ordered,
    /// Carries no iteration semantics the IR can use.
    Opaque,
}

impl IterVarKind {
    pub fn as_str(self) -> &'static str {
        match self {
            IterVarKind::DataPar => "DataPar",
            IterVarKind::CommReduce => "CommReduce",
            IterVarKind::Ordered => "Ordered",
            IterVarKind::Opaque => "Opaque",
        }
    }
}

#[derive(Debug)]
pub struct IterVarNode {
    pub dom: Range,
    pub name: String,
    pub kind: IterVarKind,
}

impl Node for IterVarNode {
    fn type_key(&self) -> &'static str {
        "IterVar"
    }

    fn visit_attrs(&self, visitor: &mut dyn AttrVisitor) {
        visitor.visit("min", AttrValue::Expr(&self.dom.min));
        visitor.visit("extent", AttrValue::Expr(&self.dom.extent));
        visitor.visit("name", AttrValue::Str(&self.name));
        visitor.visit("kind", AttrValue::Str(self.kind.as_str()));
    }
}

node_ref! {
    /// Handle to an iteration variable over a [`Range`].
    IterVar => IterVarNode
}

impl IterVar {
    pub fn new(dom: Range, name: &str, kind: IterVarKind) -> Self {
        Self::from_node(IterVarNode {
            dom,
            name: name.to_string(),
            kind,
        })
    }

    /// The loop variable as an expression.
    pub fn var(&self) -> Expr {
        Expr::Var(self.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iter_var_basics() {
        let iv = IterVar::new(Range::from_extent(16), "i", IterVarKind::DataPar);
        assert_eq!(iv.var(), Expr::var("i"));
        assert_eq!(iv.dom.extent, Expr::int(16));
        assert_eq!(iv.dom.min, Expr::int(0));
        assert_eq!(
            iv.to_string(),
            "IterVar(min=0, extent=16, name=\"i\", kind=\"DataPar\")"
        );
    }

    #[test]
    fn test_iter_var_identity() {
        let a = IterVar::new(Range::from_extent(4), "k", IterVarKind::CommReduce);
        let b = IterVar::new(Range::from_extent(4), "k", IterVarKind::CommReduce);
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
        assert!(crate::node::structural_equal(&a.as_node_ref(), &b.as_node_ref()));
    }

    #[test]
    fn test_range_display() {
        assert_eq!(Range::new(1, Expr::var("n")).to_string(), "range(min=1, ext=n)");
    }
}
