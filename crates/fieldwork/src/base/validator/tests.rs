use super::*;
use fieldwork_core::{
    Error, args, assemble,
    model::{Field, Options, RecordDecl, Validator},
    value::{Kind, Value},
};

// ---- helpers -----------------------------------------------------------

fn check(validator: Validator, value: impl Into<Value>) -> Result<(), Error> {
    let ty = assemble(
        RecordDecl::new("Probe").field(Field::new("x").validator(validator)),
        Options::default(),
    )?;

    ty.instantiate(args![value.into()]).map(|_| ())
}

fn message(validator: Validator, value: impl Into<Value>) -> String {
    check(validator, value).unwrap_err().to_string()
}

// ---- kind --------------------------------------------------------------

#[test]
fn instance_of_checks_kind() {
    assert!(check(instance_of(Kind::Int), 1).is_ok());

    let err = check(instance_of(Kind::Int), "1").unwrap_err();
    assert!(err.is_type_error());
    assert_eq!(err.to_string(), "'x' must be int (got \"1\" that is a text).");

    let either = instance_of_any([Kind::Int, Kind::Float]);
    assert!(check(either.clone(), 1.5).is_ok());
    assert!(message(either, "a").contains("one of (int, float)"));
}

// ---- numbers -----------------------------------------------------------

#[test]
fn numeric_bounds() {
    assert!(check(lt(10), 9).is_ok());
    assert!(check(le(10), 10).is_ok());
    assert!(check(ge(10), 10.0).is_ok());
    assert!(check(gt(10), 10.5).is_ok());

    assert_eq!(message(lt(10), 10), "'x' must be < 10: 10");
    assert_eq!(message(gt(0), -1), "'x' must be > 0: -1");
}

#[test]
fn bounds_on_incomparable_kinds_are_type_errors() {
    assert!(check(lt(10), "a").unwrap_err().is_type_error());
}

// ---- length ------------------------------------------------------------

#[test]
fn length_bounds() {
    assert!(check(max_len(3), "abc").is_ok());
    assert!(check(min_len(1), Value::list([0])).is_ok());

    assert_eq!(message(max_len(2), "abc"), "Length of 'x' must be <= 2: 3");
    assert_eq!(message(min_len(2), Value::tuple([1])), "Length of 'x' must be >= 2: 1");
    assert!(check(max_len(2), 5).unwrap_err().is_type_error());
}

// ---- text --------------------------------------------------------------

#[test]
fn regex_modes() {
    let full = || matches_re(r"\d+", MatchMode::Full).unwrap();
    let prefix = || matches_re(r"\d+", MatchMode::Prefix).unwrap();
    let search = || matches_re(r"\d+", MatchMode::Search).unwrap();

    assert!(check(full(), "123").is_ok());
    assert!(check(full(), "123a").is_err());
    assert!(check(prefix(), "123a").is_ok());
    assert!(check(prefix(), "a123").is_err());
    assert!(check(search(), "a123").is_ok());

    assert_eq!(message(full(), "abc"), "'x' must match regex \"\\d+\" (\"abc\" doesn't)");
    assert!(check(full(), 5).unwrap_err().is_type_error());
}

#[test]
fn bad_pattern_is_rejected_up_front() {
    let err = matches_re("(", MatchMode::default()).unwrap_err();

    assert!(matches!(
        err,
        crate::base::BaseError::InvalidPattern { ref pattern, .. } if pattern == "("
    ));
}

// ---- collections -------------------------------------------------------

#[test]
fn membership() {
    let colors = || in_(Value::list(["red", "green"])).unwrap();

    assert!(check(colors(), "red").is_ok());
    assert_eq!(
        message(colors(), "blue"),
        "'x' must be in [\"red\", \"green\"] (got \"blue\")"
    );

    assert!(check(in_("abcdef").unwrap(), "cd").is_ok());
    assert!(check(in_(Value::map([(1, "one")])).unwrap(), 1).is_ok());
    assert!(in_(3).is_err());
}

#[test]
fn deep_validators() {
    let ints = || deep_iterable(instance_of(Kind::Int), Some(instance_of(Kind::List)));

    assert!(check(ints(), Value::list([1, 2])).is_ok());
    assert!(check(ints(), Value::list([Value::from(1), Value::from("2")])).is_err());
    assert!(check(ints(), Value::tuple([1])).unwrap_err().is_type_error());

    let table = || deep_mapping(instance_of(Kind::Text), gt(0), None);
    assert!(check(table(), Value::map([("a", 1)])).is_ok());
    assert!(check(table(), Value::map([("a", 0)])).unwrap_err().is_value_error());
    assert!(check(table(), Value::list([1])).unwrap_err().is_type_error());
}

// ---- combinators -------------------------------------------------------

#[test]
fn optional_lets_null_through() {
    let v = || optional([instance_of(Kind::Int)]);

    assert!(check(v(), Value::Null).is_ok());
    assert!(check(v(), 3).is_ok());
    assert!(check(v(), "3").is_err());
}

#[test]
fn logical_combinators() {
    assert!(check(and_([ge(0), lt(10)]), 5).is_ok());
    assert!(check(and_([ge(0), lt(10)]), 10).is_err());

    assert!(check(or_([instance_of(Kind::Int), instance_of(Kind::Text)]), "a").is_ok());
    let err = message(or_([gt(5), lt(0)]), 3);
    assert!(err.starts_with("None of [<x > 5 validator>, <x < 0 validator>]"));
    assert!(err.ends_with("satisfied for value 3"));

    assert!(check(not_(in_(Value::list([1, 2])).unwrap()), 3).is_ok());
    let err = check(not_(lt(10)), 1).unwrap_err();
    assert!(err.is_value_error());
    assert!(err.to_string().starts_with("not_ validator child"));
    assert_eq!(message(not_with(lt(10), "too small"), 1), "too small");
}

#[test]
fn not_passes_foreign_errors_through() {
    let boom = Validator::new("boom", |_, _, _| {
        Err(Error::custom(std::io::Error::other("disk on fire")))
    });
    let err = check(not_(boom), 1).unwrap_err();

    assert!(matches!(err, Error::Custom(_)));
}
