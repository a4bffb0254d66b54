mod compare;
mod hash;
mod repr;
mod serialize;


use crate::record::Instance;
use serde::Serialize;
use std::fmt;

// re-exports
pub use compare::{compare_values, values_equal};
pub(crate) use compare::records_equal;
pub use hash::{ValueHasher, hash_value};

///
/// Value
///
/// Dynamic value stored in a record field.
///
/// Null        → explicit "no value"; distinct from `Supplied::Nothing`.
/// Map         → insertion-ordered entries; equality ignores order.
/// Record      → a nested record instance, compared through its own type.
///

#[derive(Clone, Debug)]
pub enum Value {
    Bool(bool),
    Bytes(Vec<u8>),
    Float(f64),
    Int(i64),
    List(Vec<Self>),
    Map(Vec<(Self, Self)>),
    Null,
    Record(Box<Instance>),
    Text(String),
    Tuple(Vec<Self>),
}

impl Value {
    ///
    /// CONSTRUCTION
    ///

    /// Build a `Value::List` from owned items.
    pub fn list<T: Into<Self>>(items: impl IntoIterator<Item = T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Build a `Value::Tuple` from owned items.
    pub fn tuple<T: Into<Self>>(items: impl IntoIterator<Item = T>) -> Self {
        Self::Tuple(items.into_iter().map(Into::into).collect())
    }

    /// Build a `Value::Map` from key/value pairs, keeping insertion order.
    ///
    /// A repeated key keeps its first position and takes the last value.
    pub fn map<K: Into<Self>, V: Into<Self>>(entries: impl IntoIterator<Item = (K, V)>) -> Self {
        let mut out: Vec<(Self, Self)> = Vec::new();

        for (key, value) in entries {
            let (key, value) = (key.into(), value.into());
            match out.iter_mut().find(|(existing, _)| values_equal(existing, &key)) {
                Some(slot) => slot.1 = value,
                None => out.push((key, value)),
            }
        }

        Self::Map(out)
    }

    ///
    /// TYPES
    ///

    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::Bool(_) => Kind::Bool,
            Self::Bytes(_) => Kind::Bytes,
            Self::Float(_) => Kind::Float,
            Self::Int(_) => Kind::Int,
            Self::List(_) => Kind::List,
            Self::Map(_) => Kind::Map,
            Self::Null => Kind::Null,
            Self::Record(inst) => Kind::Record(inst.record_type().name().to_string()),
            Self::Text(_) => Kind::Text,
            Self::Tuple(_) => Kind::Tuple,
        }
    }

    /// Short kind label used in error messages.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Bytes(_) => "bytes",
            Self::Float(_) => "float",
            Self::Int(_) => "int",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Null => "null",
            Self::Record(_) => "record",
            Self::Text(_) => "text",
            Self::Tuple(_) => "tuple",
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns true for Bool, Int and Float (bools count as numbers).
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Bool(_) | Self::Int(_) | Self::Float(_))
    }

    ///
    /// CONVERSION
    ///

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Items of a List or Tuple.
    #[must_use]
    pub const fn as_sequence(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) | Self::Tuple(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_map(&self) -> Option<&[(Self, Self)]> {
        match self {
            Self::Map(entries) => Some(entries.as_slice()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_record(&self) -> Option<&Instance> {
        match self {
            Self::Record(inst) => Some(inst),
            _ => None,
        }
    }

    /// Numeric view used for cross-kind comparisons.
    pub(crate) fn as_number(&self) -> Option<Number> {
        match self {
            Self::Bool(b) => Some(Number::Int(i64::from(*b))),
            Self::Int(i) => Some(Number::Int(*i)),
            Self::Float(f) => Some(Number::Float(*f)),
            _ => None,
        }
    }

    /// Length of sized values (text counts chars).
    #[must_use]
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::Bytes(b) => Some(b.len()),
            Self::List(items) | Self::Tuple(items) => Some(items.len()),
            Self::Map(entries) => Some(entries.len()),
            Self::Text(s) => Some(s.chars().count()),
            _ => None,
        }
    }

    /// Look up a map entry by key.
    #[must_use]
    pub fn map_get(&self, key: &Self) -> Option<&Self> {
        self.as_map()?
            .iter()
            .find(|(k, _)| values_equal(k, key))
            .map(|(_, v)| v)
    }

    /// Canonical textual rendering, as used by generated reprs.
    #[must_use]
    pub fn repr(&self) -> String {
        repr::render(self)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        values_equal(self, other)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr())
    }
}

impl Serialize for Value {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize::serialize_value(self, serializer)
    }
}

///
/// Number
///

#[derive(Clone, Copy, Debug)]
pub(crate) enum Number {
    Int(i64),
    Float(f64),
}

///
/// Kind
///
/// Type tag for values; used as field annotations and by kind checks.
/// `Record` matches instances of the named record or of any record that
/// inherits from it.
///

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[remain::sorted]
pub enum Kind {
    Any,
    Bool,
    Bytes,
    Float,
    Int,
    List,
    Map,
    Null,
    Record(String),
    Text,
    Tuple,
}

impl Kind {
    #[must_use]
    pub fn record(name: impl Into<String>) -> Self {
        Self::Record(name.into())
    }

    /// Whether `value` is of this kind.
    #[must_use]
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Any, _)
            | (Self::Bool, Value::Bool(_))
            | (Self::Bytes, Value::Bytes(_))
            | (Self::Float, Value::Float(_))
            | (Self::Int, Value::Int(_))
            | (Self::List, Value::List(_))
            | (Self::Map, Value::Map(_))
            | (Self::Null, Value::Null)
            | (Self::Text, Value::Text(_))
            | (Self::Tuple, Value::Tuple(_)) => true,
            (Self::Record(name), Value::Record(inst)) => inst.record_type().is_a(name),
            _ => false,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("any"),
            Self::Bool => f.write_str("bool"),
            Self::Bytes => f.write_str("bytes"),
            Self::Float => f.write_str("float"),
            Self::Int => f.write_str("int"),
            Self::List => f.write_str("list"),
            Self::Map => f.write_str("map"),
            Self::Null => f.write_str("null"),
            Self::Record(name) => write!(f, "record {name}"),
            Self::Text => f.write_str("text"),
            Self::Tuple => f.write_str("tuple"),
        }
    }
}

///
/// CONVERSIONS
///

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<Vec<Self>> for Value {
    fn from(items: Vec<Self>) -> Self {
        Self::List(items)
    }
}

impl From<Instance> for Value {
    fn from(inst: Instance) -> Self {
        Self::Record(Box::new(inst))
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Self::Null
    }
}
