mod common;

use common::{setup_logger, two_output_op};
use rstest::rstest;
use tensor_ir::prelude::*;

fn sample_ops() -> Vec<Operation> {
    let a = Tensor::placeholder([Expr::var("n")], "A", DType::F32);
    let c = compute([Expr::var("n")], "C", |ix| a.at(&ix[0]) * a.at(&ix[0]));
    vec![
        placeholder_op([2, 2], "P", DType::I32),
        c.op().unwrap().clone(),
        two_output_op("split"),
    ]
}

#[test]
fn test_output_denotes_its_slot() {
    for op in sample_ops() {
        for i in 0..op.num_outputs() {
            let t = op.output(i).unwrap();
            assert_eq!(t.op(), Some(&op));
            assert_eq!(t.value_index(), i);
            assert_eq!(t.shape(), op.output_shape(i).unwrap().as_slice());
            assert_eq!(t.dtype(), op.output_dtype(i).unwrap());
            assert_eq!(t.name(), op.output_name(i).unwrap());
        }
    }
}

#[test]
fn test_two_output_scenario() {
    let o = two_output_op("split");
    assert_eq!(o.output(0).unwrap().shape(), &[Expr::int(10)]);
    assert_eq!(o.output(1).unwrap().shape(), &[Expr::int(20)]);
    assert_eq!(o.output(1).unwrap().value_index(), 1);
}

#[rstest]
#[case(2)]
#[case(5)]
#[case(usize::MAX)]
fn test_output_out_of_range(#[case] i: usize) {
    setup_logger();
    let o = two_output_op("split");
    let err = o.output(i).unwrap_err();
    assert_eq!(
        err,
        IrError::OutputIndexOutOfRange {
            op: "split".to_string(),
            index: i,
            num_outputs: 2
        }
    );
    assert_eq!(
        err.to_string(),
        format!("operation 'split' has 2 output(s); index {i} is out of range")
    );
}

#[test]
fn test_identical_ops_are_distinct_keys() {
    let a = two_output_op("split");
    let b = two_output_op("split");
    assert_ne!(a, b);
    assert_ne!(a.handle_id(), b.handle_id());

    let mut set = rustc_hash::FxHashSet::default();
    set.insert(a.clone());
    set.insert(b);
    set.insert(a);
    assert_eq!(set.len(), 2);
}

#[test]
fn test_root_iter_vars() {
    let ops = sample_ops();
    assert!(ops[0].root_iter_vars().is_empty());
    assert!(ops[2].root_iter_vars().is_empty());

    let axis = ops[1].root_iter_vars();
    assert_eq!(axis.len(), 1);
    assert_eq!(axis[0].dom, Range::from_extent(Expr::var("n")));
    assert_eq!(axis[0].kind, IterVarKind::DataPar);
}

#[test]
fn test_compute_with_explicit_axis() {
    let x = Tensor::placeholder([8, 4], "X", DType::F32);
    let i = IterVar::new(Range::from_extent(8), "i", IterVarKind::DataPar);
    let j = IterVar::new(Range::new(0, 4), "j", IterVarKind::Opaque);
    let body = x.at(i.var()).at(j.var()) + 1.0;
    let op = Operation::new("Y", OpKind::Compute(ComputeOp::new(vec![i, j], body)));

    let y = op.output(0).unwrap();
    assert_eq!(y.shape(), x.shape());
    assert_eq!(y.dtype(), DType::F32);
    assert_eq!(op.input_tensors(), vec![x]);
}

#[test]
fn test_dump_nested_operation() {
    let p = placeholder_op([3], "P", DType::F32);
    let t = p.output(0).unwrap();
    assert_eq!(
        t.to_string(),
        "Tensor(shape=[3], name=\"P\", dtype=float32, \
         op=PlaceholderOp(name=\"P\", shape=[3], dtype=float32), value_index=0)"
    );
}
