use crate::{
    compare::{CmpOp, Comparable},
    error::Error,
    record::Instance,
    value::{Number, Value},
};
use std::cmp::Ordering;

/// Equality between two values.
///
/// Numbers compare across Bool/Int/Float, NaN is unequal to itself, maps
/// ignore entry order and records defer to their type's equality.
#[must_use]
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Text(a), Value::Text(b)) => a == b,
        (Value::Bytes(a), Value::Bytes(b)) => a == b,
        (Value::List(a), Value::List(b)) | (Value::Tuple(a), Value::Tuple(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| values_equal(a, b))
        }
        (Value::Map(a), Value::Map(b)) => entries_match(a, b),
        (Value::Record(a), Value::Record(b)) => records_equal(a, b),
        _ => match (left.as_number(), right.as_number()) {
            (Some(a), Some(b)) => number_cmp(a, b) == Some(Ordering::Equal),
            _ => false,
        },
    }
}

// Multiset match: every entry of `left` pairs off with a distinct, equal
// entry of `right`.
fn entries_match(left: &[(Value, Value)], right: &[(Value, Value)]) -> bool {
    let mut used = vec![false; right.len()];

    left.len() == right.len()
        && left.iter().all(|(k, v)| {
            let slot = (0..right.len()).find(|&i| {
                !used[i] && values_equal(k, &right[i].0) && values_equal(v, &right[i].1)
            });
            match slot {
                Some(i) => {
                    used[i] = true;
                    true
                }
                None => false,
            }
        })
}

/// Ordering comparison between two values.
///
/// Unordered pairs (NaN) yield `false`; pairs of kinds that have no
/// ordering between them yield a type error.
pub fn compare_values(op: CmpOp, left: &Value, right: &Value) -> Result<bool, Error> {
    match (left, right) {
        (Value::Text(a), Value::Text(b)) => Ok(op.apply(a.cmp(b))),
        (Value::Bytes(a), Value::Bytes(b)) => Ok(op.apply(a.cmp(b))),
        (Value::List(a), Value::List(b)) | (Value::Tuple(a), Value::Tuple(b)) => {
            compare_sequences(op, a, b)
        }
        (Value::Record(a), Value::Record(b)) => compare_records(op, a, b),
        _ => match (left.as_number(), right.as_number()) {
            (Some(a), Some(b)) => Ok(number_cmp(a, b).is_some_and(|ord| op.apply(ord))),
            _ => Err(unsupported(op, left.kind_name(), right.kind_name())),
        },
    }
}

// Lexicographic comparison: the first unequal pair decides, otherwise length.
fn compare_sequences(op: CmpOp, left: &[Value], right: &[Value]) -> Result<bool, Error> {
    for (a, b) in left.iter().zip(right) {
        if !values_equal(a, b) {
            return compare_values(op, a, b);
        }
    }

    Ok(op.apply(left.len().cmp(&right.len())))
}

// Records compare through their synthesized equality, then the reflected
// side, then identity.
pub(crate) fn records_equal(left: &Instance, right: &Instance) -> bool {
    let forward = left.record_type().eq(left, right);
    match forward {
        Ok(Comparable::Value(eq)) => eq,
        Ok(Comparable::NotComparable) => match right.record_type().eq(right, left) {
            Ok(Comparable::Value(eq)) => eq,
            Ok(Comparable::NotComparable) => left.same_object(right),
            Err(_) => false,
        },
        Err(_) => false,
    }
}

fn compare_records(op: CmpOp, left: &Instance, right: &Instance) -> Result<bool, Error> {
    if let Comparable::Value(result) = left.record_type().compare(op, left, right)? {
        return Ok(result);
    }
    if let Comparable::Value(result) = right.record_type().compare(op.reflect(), right, left)? {
        return Ok(result);
    }

    Err(unsupported(
        op,
        left.record_type().name(),
        right.record_type().name(),
    ))
}

fn unsupported(op: CmpOp, left: &str, right: &str) -> Error {
    Error::type_error(format!(
        "'{}' not supported between instances of '{left}' and '{right}'",
        op.symbol()
    ))
}

// Exact numeric comparison; `None` when either side is NaN.
fn number_cmp(left: Number, right: Number) -> Option<Ordering> {
    match (left, right) {
        (Number::Int(a), Number::Int(b)) => Some(a.cmp(&b)),
        (Number::Float(a), Number::Float(b)) => a.partial_cmp(&b),
        (Number::Int(i), Number::Float(f)) => int_float_cmp(i, f),
        (Number::Float(f), Number::Int(i)) => int_float_cmp(i, f).map(Ordering::reverse),
    }
}

// Compare an integer against a float without going through a lossy cast of
// the integer.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn int_float_cmp(i: i64, f: f64) -> Option<Ordering> {
    const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;

    if f.is_nan() {
        return None;
    }
    if f >= TWO_POW_63 {
        return Some(Ordering::Less);
    }
    if f < -TWO_POW_63 {
        return Some(Ordering::Greater);
    }

    let whole = f.trunc();
    match i.cmp(&(whole as i64)) {
        Ordering::Equal if f > whole => Some(Ordering::Less),
        Ordering::Equal if f < whole => Some(Ordering::Greater),
        ord => Some(ord),
    }
}

/// Whether a float holds an integral value representable as `i64`.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn float_as_int(f: f64) -> Option<i64> {
    const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;

    if f.is_finite() && f.trunc() == f && (-TWO_POW_63..TWO_POW_63).contains(&f) {
        Some(f as i64)
    } else {
        None
    }
}
