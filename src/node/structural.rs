use rustc_hash::FxHashMap;

use super::{AttrValue, AttrVisitor, NodeRef};
use crate::dtype::DType;
use crate::expr::Expr;

/// Compares two nodes field by field instead of by handle.
///
/// Nested nodes are compared recursively; a shared sub-node short-circuits on
/// handle identity. Expressions are compared with `Expr`'s own equality, which
/// treats the tensors they read as handles.
pub fn structural_equal(lhs: &NodeRef, rhs: &NodeRef) -> bool {
    StructuralEq::default().equal(lhs, rhs)
}

#[derive(Debug)]
enum Field {
    Str(String),
    Int(i64),
    DType(DType),
    Expr(Expr),
    Exprs(Vec<Expr>),
    Node(Option<NodeRef>),
    Nodes(Vec<NodeRef>),
}

#[derive(Default)]
struct FieldCollector {
    fields: Vec<(&'static str, Field)>,
}

impl AttrVisitor for FieldCollector {
    fn visit(&mut self, key: &'static str, value: AttrValue<'_>) {
        let field = match value {
            AttrValue::Str(s) => Field::Str(s.to_string()),
            AttrValue::Int(i) => Field::Int(i),
            AttrValue::DType(dtype) => Field::DType(dtype),
            AttrValue::Expr(expr) => Field::Expr(expr.clone()),
            AttrValue::Exprs(exprs) => Field::Exprs(exprs.to_vec()),
            AttrValue::Node(node) => Field::Node(node),
            AttrValue::Nodes(nodes) => Field::Nodes(nodes),
        };
        self.fields.push((key, field));
    }
}

fn collect(node: &NodeRef) -> Vec<(&'static str, Field)> {
    let mut collector = FieldCollector::default();
    node.visit_attrs(&mut collector);
    collector.fields
}

#[derive(Default)]
struct StructuralEq {
    memo: FxHashMap<(usize, usize), bool>,
}

impl StructuralEq {
    fn equal(&mut self, lhs: &NodeRef, rhs: &NodeRef) -> bool {
        if lhs.same_as(rhs) {
            return true;
        }
        if lhs.type_key() != rhs.type_key() {
            return false;
        }

        let key = (lhs.handle_id(), rhs.handle_id());
        if let Some(&known) = self.memo.get(&key) {
            return known;
        }

        let lhs_fields = collect(lhs);
        let rhs_fields = collect(rhs);
        let result = lhs_fields.len() == rhs_fields.len()
            && lhs_fields
                .iter()
                .zip(rhs_fields.iter())
                .all(|((lk, lv), (rk, rv))| lk == rk && self.field_equal(lv, rv));

        self.memo.insert(key, result);
        result
    }

    fn field_equal(&mut self, lhs: &Field, rhs: &Field) -> bool {
        match (lhs, rhs) {
            (Field::Str(l), Field::Str(r)) => l == r,
            (Field::Int(l), Field::Int(r)) => l == r,
            (Field::DType(l), Field::DType(r)) => l == r,
            (Field::Expr(l), Field::Expr(r)) => l == r,
            (Field::Exprs(l), Field::Exprs(r)) => l == r,
            (Field::Node(None), Field::Node(None)) => true,
            (Field::Node(Some(l)), Field::Node(Some(r))) => self.equal(l, r),
            (Field::Nodes(l), Field::Nodes(r)) => {
                l.len() == r.len() && l.iter().zip(r.iter()).all(|(l, r)| self.equal(l, r))
            }
            _ => false,
        }
    }
}
