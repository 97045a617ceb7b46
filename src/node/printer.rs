use super::{AttrValue, AttrVisitor, NodeRef};

/// Renders a node and everything it references as
/// `TypeKey(field=value, ...)`, using only the attribute visitor.
pub fn dump(node: &NodeRef) -> String {
    let mut out = String::new();
    write_node(&mut out, node);
    out
}

fn write_node(out: &mut String, node: &NodeRef) {
    out.push_str(node.type_key());
    out.push('(');
    let mut printer = Printer { out, first: true };
    node.visit_attrs(&mut printer);
    printer.out.push(')');
}

struct Printer<'a> {
    out: &'a mut String,
    first: bool,
}

impl AttrVisitor for Printer<'_> {
    fn visit(&mut self, key: &'static str, value: AttrValue<'_>) {
        if !self.first {
            self.out.push_str(", ");
        }
        self.first = false;
        self.out.push_str(key);
        self.out.push('=');

        match value {
            AttrValue::Str(s) => self.out.push_str(&format!("{s:?}")),
            AttrValue::Int(i) => self.out.push_str(&i.to_string()),
            AttrValue::DType(dtype) => self.out.push_str(&dtype.to_string()),
            AttrValue::Expr(expr) => self.out.push_str(&expr.to_string()),
            AttrValue::Exprs(exprs) => {
                self.out.push('[');
                for (i, expr) in exprs.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.out.push_str(&expr.to_string());
                }
                self.out.push(']');
            }
            AttrValue::Node(None) => self.out.push_str("null"),
            AttrValue::Node(Some(node)) => write_node(self.out, &node),
            AttrValue::Nodes(nodes) => {
                self.out.push('[');
                for (i, node) in nodes.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    write_node(self.out, node);
                }
                self.out.push(']');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtype::DType;
    use crate::expr::Expr;
    use crate::node::Node;

    #[derive(Debug)]
    struct Group {
        tag: String,
        dims: Vec<Expr>,
        parent: Option<NodeRef>,
        children: Vec<NodeRef>,
    }

    impl Node for Group {
        fn type_key(&self) -> &'static str {
            "Group"
        }

        fn visit_attrs(&self, visitor: &mut dyn AttrVisitor) {
            visitor.visit("tag", AttrValue::Str(&self.tag));
            visitor.visit("dims", AttrValue::Exprs(&self.dims));
            visitor.visit("dtype", AttrValue::DType(DType::I64));
            visitor.visit("parent", AttrValue::Node(self.parent.clone()));
            visitor.visit("children", AttrValue::Nodes(self.children.clone()));
        }
    }

    fn group(tag: &str, dims: Vec<Expr>, children: Vec<NodeRef>) -> NodeRef {
        NodeRef::new(Group {
            tag: tag.to_string(),
            dims,
            parent: None,
            children,
        })
    }

    #[test]
    fn test_dump_every_attr_kind() {
        let inner = group("a\"b", vec![], vec![]);
        let outer = group("o", vec![Expr::var("n"), Expr::var("n") + 1], vec![inner.clone(), inner]);
        assert_eq!(
            dump(&outer),
            "Group(tag=\"o\", dims=[n, (n + 1)], dtype=int64, parent=null, children=[\
             Group(tag=\"a\\\"b\", dims=[], dtype=int64, parent=null, children=[]), \
             Group(tag=\"a\\\"b\", dims=[], dtype=int64, parent=null, children=[])])"
        );
    }
}
