//! Comparison synthesis: equality, ordering and hashing generated from the
//! subset of fields flagged for each concern.

mod custom;

#[cfg(test)]
mod tests;

use crate::{
    error::Error,
    model::{CmpSpec, FieldList},
    record::{Instance, RecordId},
    value::{ValueHasher, compare_values, values_equal},
};
use derive_more::Display;
use std::cmp::Ordering;

// re-exports
pub use custom::{CmpFn, Comparator, ComparatorBuilder};

///
/// Comparable
///
/// Result of a synthesized comparison. `NotComparable` is not an error: it
/// tells the caller to try another strategy (the reflected operation, or
/// identity for equality).
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Comparable<T> {
    Value(T),
    NotComparable,
}

impl<T> Comparable<T> {
    #[must_use]
    pub fn value(self) -> Option<T> {
        match self {
            Self::Value(v) => Some(v),
            Self::NotComparable => None,
        }
    }

    #[must_use]
    pub const fn is_comparable(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Comparable<U> {
        match self {
            Self::Value(v) => Comparable::Value(f(v)),
            Self::NotComparable => Comparable::NotComparable,
        }
    }
}

impl Comparable<bool> {
    /// Logical negation that keeps `NotComparable` intact.
    #[must_use]
    pub fn negate(self) -> Self {
        self.map(|b| !b)
    }

    /// True only for `Value(true)`.
    #[must_use]
    pub const fn is_true(self) -> bool {
        matches!(self, Self::Value(true))
    }
}

impl From<bool> for Comparable<bool> {
    fn from(b: bool) -> Self {
        Self::Value(b)
    }
}

///
/// CmpOp
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum CmpOp {
    #[display("lt")]
    Lt,
    #[display("le")]
    Le,
    #[display("gt")]
    Gt,
    #[display("ge")]
    Ge,
}

impl CmpOp {
    pub const ALL: [Self; 4] = [Self::Lt, Self::Le, Self::Gt, Self::Ge];

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }

    /// The operation to try on swapped operands.
    #[must_use]
    pub const fn reflect(self) -> Self {
        match self {
            Self::Lt => Self::Gt,
            Self::Le => Self::Ge,
            Self::Gt => Self::Lt,
            Self::Ge => Self::Le,
        }
    }

    #[must_use]
    pub const fn apply(self, ord: Ordering) -> bool {
        match self {
            Self::Lt => ord.is_lt(),
            Self::Le => ord.is_le(),
            Self::Gt => ord.is_gt(),
            Self::Ge => ord.is_ge(),
        }
    }
}

// ============================================================================
// Generated behaviour
// ============================================================================

/// Short-circuiting conjunction over the `eq` fields.
///
/// Each field is compared on its own, so a field holding NaN makes the
/// records unequal without affecting how other fields compare.
pub(crate) fn fields_equal(
    fields: &FieldList,
    left: &Instance,
    right: &Instance,
) -> Result<bool, Error> {
    for field in fields.iter() {
        let spec = field.eq_spec();
        if matches!(spec, CmpSpec::Skip) {
            continue;
        }

        let a = left.get(field.name())?;
        let b = right.get(field.name())?;
        let equal = match spec {
            CmpSpec::Skip => true,
            CmpSpec::Include => values_equal(a, b),
            CmpSpec::Key(key) => values_equal(&key.call(a)?, &key.call(b)?),
            CmpSpec::Using(cmp) => cmp.eq(a, b)?.is_true(),
        };

        if !equal {
            return Ok(false);
        }
    }

    Ok(true)
}

/// Lexicographic comparison over the `order` fields: the first pair that is
/// not equal decides, and equal tuples resolve by the operator itself.
pub(crate) fn fields_order(
    op: CmpOp,
    fields: &FieldList,
    left: &Instance,
    right: &Instance,
) -> Result<bool, Error> {
    for field in fields.iter() {
        let spec = field.order_spec();
        if matches!(spec, CmpSpec::Skip) {
            continue;
        }

        let a = left.get(field.name())?;
        let b = right.get(field.name())?;
        match spec {
            CmpSpec::Skip => {}
            CmpSpec::Include => {
                if !values_equal(a, b) {
                    return compare_values(op, a, b);
                }
            }
            CmpSpec::Key(key) => {
                let (a, b) = (key.call(a)?, key.call(b)?);
                if !values_equal(&a, &b) {
                    return compare_values(op, &a, &b);
                }
            }
            CmpSpec::Using(cmp) => {
                if !cmp.eq(a, b)?.is_true() {
                    return cmp.compare(op, a, b)?.value().ok_or_else(|| {
                        Error::type_error(format!(
                            "'{}' not supported by comparator '{}' for field '{}'",
                            op.symbol(),
                            cmp.name(),
                            field.name()
                        ))
                    });
                }
            }
        }
    }

    Ok(op.apply(Ordering::Equal))
}

/// Hash over the record identity and the `hash` fields' values.
pub(crate) fn fields_hash(id: RecordId, fields: &FieldList, inst: &Instance) -> Result<u64, Error> {
    let mut hasher = ValueHasher::new();
    hasher.write_u64(id.get());

    for field in fields.iter().filter(|f| f.is_hashed()) {
        let value = inst.get(field.name())?;
        match field.eq_spec() {
            CmpSpec::Key(key) => hasher.write_value(&key.call(value)?)?,
            _ => hasher.write_value(value)?,
        }
    }

    Ok(hasher.finish())
}
