mod common;

use common::{setup_logger, two_output_op};
use rstest::rstest;
use tensor_ir::prelude::*;

fn vars(names: &[&str]) -> Vec<Expr> {
    names.iter().map(|n| Expr::var(n)).collect()
}

#[test]
fn test_curried_indexing_matches_call() {
    let t = Tensor::placeholder([2, 3, 4], "T", DType::F32);
    let ix = vars(&["i", "j", "k"]);
    let curried: Expr = t.at(&ix[0]).at(&ix[1]).at(&ix[2]).into();
    assert_eq!(curried, t.call(&ix));
    assert_eq!(curried.to_string(), "T(i, j, k)");
}

#[test]
fn test_slice_is_not_mutated() {
    let t = Tensor::placeholder([2, 3], "T", DType::F32);
    let s1 = t.at(0);
    let s2 = s1.at(1);
    let s3 = s1.at(2);

    assert_eq!(s1.indices(), &[Expr::int(0)]);
    assert_eq!(s2.indices(), &[Expr::int(0), Expr::int(1)]);
    assert_eq!(s3.indices(), &[Expr::int(0), Expr::int(2)]);
}

#[test]
fn test_rank_zero_call() {
    let scalar = Tensor::placeholder(Vec::<Expr>::new(), "s", DType::F64);
    let e = scalar.call(&[]);
    assert_eq!(e.to_string(), "s()");
    assert_eq!(e.dtype(), DType::F64);
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(3)]
fn test_arity_mismatch(#[case] given: usize) {
    setup_logger();
    let t = Tensor::placeholder([5, 5], "M", DType::F32);
    let ix: Vec<Expr> = (0..given).map(Expr::from).collect();
    assert_eq!(
        t.try_call(&ix).unwrap_err(),
        IrError::IndexArityMismatch {
            tensor: "M".to_string(),
            rank: 2,
            given
        }
    );

    let lenient = t.try_call_with(&ix, ArityCheck::Lenient).unwrap();
    let Expr::Read(read) = lenient else {
        panic!("expected a tensor read");
    };
    assert_eq!(read.indices.len(), given);
}

#[test]
fn test_read_records_value_index() {
    let o = two_output_op("split");
    let hi = o.output(1).unwrap();
    let Expr::Read(read) = hi.at(Expr::var("i")).finalize() else {
        panic!("expected a tensor read");
    };
    assert_eq!(read.value_index(), 1);
    assert_eq!(read.op(), Some(&o));
    assert!(read.tensor.same_as(&hi));
}

#[test]
fn test_slice_operators() {
    let a = Tensor::placeholder([4, 4], "A", DType::F32);
    let b = Tensor::placeholder([4, 4], "B", DType::F32);
    let (i, j) = (Expr::var("i"), Expr::var("j"));

    let sum = a.at(&i).at(&j) + b.at(&j).at(&i);
    assert_eq!(sum.to_string(), "(A(i, j) + B(j, i))");

    let scaled = 0.5f64 * a.at(&i).at(&j) - 1;
    assert_eq!(scaled.to_string(), "((0.5f * A(i, j)) - 1)");

    let in_range = a.at(&i).at(&j).ge(0).and(a.at(&i).at(&j).lt(1.0));
    assert_eq!(in_range.to_string(), "((A(i, j) >= 0) && (A(i, j) < 1.0f))");
    assert_eq!(in_range.dtype(), DType::BOOL);

    let masked = !a.at(&i).at(&j).equal(b.at(&i).at(&j));
    assert_eq!(masked.to_string(), "!(A(i, j) == B(i, j))");

    let shifted = (a.at(&i).at(&j) << 2) % b.at(&i).at(&j);
    assert_eq!(shifted.to_string(), "((A(i, j) << 2) % B(i, j))");
}

#[test]
fn test_slice_index_expressions() {
    let a = Tensor::placeholder([8], "A", DType::F32);
    let i = Expr::var("i");
    let shifted = a.at(i.clone() + 1) - a.at(i.clone() - 1);
    assert_eq!(shifted.to_string(), "(A((i + 1)) - A((i - 1)))");

    let gather = Tensor::placeholder([8], "idx", DType::I32);
    let nested: Expr = a.at(gather.at(&i)).into();
    let mut reads = Vec::new();
    nested.for_each_read(&mut |r| reads.push(r.tensor.name().to_string()));
    assert_eq!(reads, ["A", "idx"]);
}

#[test]
#[should_panic(expected = "tensor 'A' has rank 2 but was indexed with 1 coordinate(s)")]
fn test_incomplete_slice_panics_on_use() {
    let a = Tensor::placeholder([4, 4], "A", DType::F32);
    let _ = a.at(0) * 2;
}
