use crate::{
    args, assemble,
    compare::{CmpOp, Comparable, Comparator},
    error::{AssembleError, Error},
    model::{Field, Options, RecordDecl},
    record::RecordType,
    value::Value,
};
use std::sync::Arc;

// ---- helpers -----------------------------------------------------------

fn int(v: &Value) -> i64 {
    v.as_int().unwrap_or_default()
}

fn cmp_eq() -> Comparator {
    Comparator::using()
        .name("ByInt")
        .eq(|a, b| Ok(Comparable::Value(int(a) == int(b))))
        .build()
        .unwrap()
}

fn derived(root: CmpOp) -> Comparator {
    Comparator::using()
        .eq(|a, b| Ok(Comparable::Value(int(a) == int(b))))
        .op(root, move |a, b| Ok(Comparable::Value(root.apply(int(a).cmp(&int(b))))))
        .build()
        .unwrap()
}

fn pair(options: Options) -> Arc<RecordType> {
    assemble(
        RecordDecl::new("Pair")
            .field(Field::new("a"))
            .field(Field::new("b")),
        options,
    )
    .unwrap()
}

// ---- comparator --------------------------------------------------------

#[test]
fn every_root_derives_a_consistent_order() {
    let samples = [-1, 0, 1];

    for root in CmpOp::ALL {
        let cmp = derived(root);
        for a in samples {
            for b in samples {
                for op in CmpOp::ALL {
                    let got = cmp.compare(op, &Value::Int(a), &Value::Int(b)).unwrap();
                    assert_eq!(
                        got,
                        Comparable::Value(op.apply(a.cmp(&b))),
                        "root {root}, {a} {} {b}",
                        op.symbol()
                    );
                }
            }
        }
    }
}

#[test]
fn partial_order_without_eq_is_rejected() {
    let err = Comparator::using()
        .lt(|a, b| Ok(Comparable::Value(int(a) < int(b))))
        .build()
        .unwrap_err();

    assert!(matches!(err, AssembleError::IncompleteOrdering));
}

#[test]
fn eq_only_comparator_does_not_order() {
    let cmp = cmp_eq();

    assert!(cmp.eq(&Value::Int(1), &Value::Int(1)).unwrap().is_true());
    assert_eq!(
        cmp.lt(&Value::Int(1), &Value::Int(2)).unwrap(),
        Comparable::NotComparable
    );
}

#[test]
fn same_kind_guard_on_comparator() {
    let cmp = cmp_eq();
    assert_eq!(
        cmp.eq(&Value::Int(1), &Value::from("1")).unwrap(),
        Comparable::NotComparable
    );

    let loose = Comparator::using()
        .eq(|_, _| Ok(Comparable::Value(true)))
        .require_same_type(false)
        .build()
        .unwrap();
    assert!(loose.eq(&Value::Int(1), &Value::from("1")).unwrap().is_true());
}

// ---- generated equality ------------------------------------------------

#[test]
fn equality_is_per_field_conjunction() {
    let ty = pair(Options::default());
    let a = ty.instantiate(args![1, 2]).unwrap();
    let b = ty.instantiate(args![1, 2]).unwrap();
    let c = ty.instantiate(args![1, 3]).unwrap();

    assert_eq!(ty.eq(&a, &b).unwrap(), Comparable::Value(true));
    assert_eq!(ty.ne(&a, &c).unwrap(), Comparable::Value(true));
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn nan_field_makes_records_unequal() {
    let ty = pair(Options::default());
    let a = ty.instantiate(args![f64::NAN, 1]).unwrap();

    assert_ne!(a, a.clone());
}

#[test]
fn different_types_are_not_comparable() {
    let left = pair(Options::default());
    let right = pair(Options::default());
    let a = left.instantiate(args![1, 2]).unwrap();
    let b = right.instantiate(args![1, 2]).unwrap();

    assert_eq!(left.eq(&a, &b).unwrap(), Comparable::NotComparable);
    assert_eq!(left.lt(&a, &b).unwrap(), Comparable::NotComparable);
    assert_ne!(a, b);
}

#[test]
fn relaxed_guard_compares_by_field_name() {
    let left = pair(Options::default().require_same_type(false));
    let right = pair(Options::default());
    let a = left.instantiate(args![1, 2]).unwrap();
    let b = right.instantiate(args![1, 2]).unwrap();

    assert_eq!(left.eq(&a, &b).unwrap(), Comparable::Value(true));

    let narrow = assemble(
        RecordDecl::new("Narrow").field(Field::new("a")),
        Options::default(),
    )
    .unwrap();
    let n = narrow.instantiate(args![1]).unwrap();
    assert_eq!(left.eq(&a, &n).unwrap(), Comparable::NotComparable);
}

#[test]
fn skipped_and_keyed_fields() {
    let ty = assemble(
        RecordDecl::new("Keyed")
            .field(Field::new("name").eq_key(|v| {
                Ok(Value::from(v.as_text().unwrap_or_default().to_lowercase()))
            }))
            .field(Field::new("note").eq(false)),
        Options::default().frozen(true),
    )
    .unwrap();
    let a = ty.instantiate(args!["Ann", "x"]).unwrap();
    let b = ty.instantiate(args!["ANN", "y"]).unwrap();

    assert_eq!(a, b);
    assert_eq!(a.hash_code().unwrap(), b.hash_code().unwrap());
}

// ---- generated ordering ------------------------------------------------

#[test]
fn ordering_is_lexicographic() {
    let ty = pair(Options::default());
    let small = ty.instantiate(args![1, 9]).unwrap();
    let big = ty.instantiate(args![2, 0]).unwrap();
    let same = ty.instantiate(args![1, 9]).unwrap();

    assert_eq!(ty.lt(&small, &big).unwrap(), Comparable::Value(true));
    assert_eq!(ty.ge(&small, &big).unwrap(), Comparable::Value(false));
    assert_eq!(ty.le(&small, &same).unwrap(), Comparable::Value(true));
    assert_eq!(ty.lt(&small, &same).unwrap(), Comparable::Value(false));
    assert!(small < big);
    assert_eq!(small.partial_cmp(&same), Some(std::cmp::Ordering::Equal));
}

#[test]
fn order_skips_fields_excluded_from_order() {
    let ty = assemble(
        RecordDecl::new("Ranked")
            .field(Field::new("rank"))
            .field(Field::new("label").order(false)),
        Options::default(),
    )
    .unwrap();
    let a = ty.instantiate(args![1, "z"]).unwrap();
    let b = ty.instantiate(args![1, "a"]).unwrap();

    assert_eq!(ty.le(&a, &b).unwrap(), Comparable::Value(true));
    assert_eq!(ty.ge(&a, &b).unwrap(), Comparable::Value(true));
    assert_ne!(a, b);
}

#[test]
fn incomparable_field_values_raise() {
    let ty = pair(Options::default());
    let a = ty.instantiate(args![1, 2]).unwrap();
    let b = ty.instantiate(args!["x", 2]).unwrap();

    let err = ty.lt(&a, &b).unwrap_err();
    assert!(matches!(err, Error::Type(_)));
    assert_eq!(a.partial_cmp(&b), None);
}

#[test]
fn comparator_fields_order_through_derivation() {
    let ty = assemble(
        RecordDecl::new("Custom").field(Field::new("v").cmp_using(derived(CmpOp::Lt))),
        Options::default(),
    )
    .unwrap();
    let one = ty.instantiate(args![1]).unwrap();
    let two = ty.instantiate(args![2]).unwrap();

    assert_eq!(ty.gt(&two, &one).unwrap(), Comparable::Value(true));
    assert_eq!(ty.le(&one, &one.clone()).unwrap(), Comparable::Value(true));

    let unordered = assemble(
        RecordDecl::new("Unordered").field(Field::new("v").cmp_using(cmp_eq())),
        Options::default(),
    )
    .unwrap();
    let a = unordered.instantiate(args![1]).unwrap();
    let b = unordered.instantiate(args![2]).unwrap();
    let err = unordered.lt(&a, &b).unwrap_err();
    assert!(err.to_string().contains("ByInt"));
}

// ---- hashing -----------------------------------------------------------

#[test]
fn equal_frozen_records_hash_alike() {
    let ty = pair(Options::default().frozen(true));
    let a = ty.instantiate(args![1, "x"]).unwrap();
    let b = ty.instantiate(args![1.0, "x"]).unwrap();
    let c = ty.instantiate(args![2, "x"]).unwrap();

    assert_eq!(a, b);
    assert_eq!(a.hash_code().unwrap(), b.hash_code().unwrap());
    assert_ne!(a.hash_code().unwrap(), c.hash_code().unwrap());
}

#[test]
fn hash_mixes_type_identity() {
    let left = pair(Options::default().frozen(true));
    let right = pair(Options::default().frozen(true));
    let a = left.instantiate(args![1, 2]).unwrap();
    let b = right.instantiate(args![1, 2]).unwrap();

    assert_ne!(a.hash_code().unwrap(), b.hash_code().unwrap());
}

#[test]
fn unhashable_field_value_surfaces() {
    let ty = pair(Options::default().frozen(true));
    let a = ty.instantiate(args![Value::list([1]), 2]).unwrap();

    assert!(a.hash_code().unwrap_err().is_type_error());
}
