use crate::value::Value;
use serde::{
    Serializer,
    ser::{SerializeMap, SerializeSeq},
};

// Maps with text keys become objects; any other key kind falls back to a
// sequence of [key, value] pairs.
pub(super) fn serialize_value<S: Serializer>(value: &Value, s: S) -> Result<S::Ok, S::Error> {
    match value {
        Value::Null => s.serialize_none(),
        Value::Bool(b) => s.serialize_bool(*b),
        Value::Int(i) => s.serialize_i64(*i),
        Value::Float(f) => s.serialize_f64(*f),
        Value::Text(t) => s.serialize_str(t),
        Value::Bytes(b) => s.serialize_bytes(b),
        Value::List(items) | Value::Tuple(items) => {
            let mut seq = s.serialize_seq(Some(items.len()))?;
            for item in items {
                seq.serialize_element(item)?;
            }
            seq.end()
        }
        Value::Map(entries) if entries.iter().all(|(k, _)| k.as_text().is_some()) => {
            let mut map = s.serialize_map(Some(entries.len()))?;
            for (k, v) in entries {
                map.serialize_entry(k, v)?;
            }
            map.end()
        }
        Value::Map(entries) => {
            let mut seq = s.serialize_seq(Some(entries.len()))?;
            for (k, v) in entries {
                seq.serialize_element(&(k, v))?;
            }
            seq.end()
        }
        Value::Record(inst) => serde::Serialize::serialize(inst.as_ref(), s),
    }
}
