use crate::{
    error::Error,
    value::{Value, compare::float_as_int},
};
use xxhash_rust::xxh3::Xxh3;

// Tags keep differently-kinded values from colliding on identical payloads.
const TAG_NULL: u8 = 0x00;
const TAG_INT: u8 = 0x01;
const TAG_FLOAT: u8 = 0x02;
const TAG_TEXT: u8 = 0x03;
const TAG_BYTES: u8 = 0x04;
const TAG_TUPLE: u8 = 0x05;
const TAG_RECORD: u8 = 0x06;

///
/// ValueHasher
///
/// Streaming xxh3 hasher over values. Equal values feed identical bytes, so
/// `Int(1)`, `Float(1.0)` and `Bool(true)` hash alike.
///

pub struct ValueHasher {
    inner: Xxh3,
}

impl ValueHasher {
    #[must_use]
    pub fn new() -> Self {
        Self { inner: Xxh3::new() }
    }

    pub fn write_u64(&mut self, n: u64) {
        self.inner.update(&n.to_le_bytes());
    }

    /// Feed one value; lists and maps are unhashable.
    pub fn write_value(&mut self, value: &Value) -> Result<(), Error> {
        match value {
            Value::Null => self.inner.update(&[TAG_NULL]),
            Value::Bool(b) => self.write_int(i64::from(*b)),
            Value::Int(i) => self.write_int(*i),
            Value::Float(f) => match float_as_int(*f) {
                Some(i) => self.write_int(i),
                None => {
                    self.inner.update(&[TAG_FLOAT]);
                    self.inner.update(&f.to_bits().to_le_bytes());
                }
            },
            Value::Text(s) => {
                self.inner.update(&[TAG_TEXT]);
                self.write_len(s.len());
                self.inner.update(s.as_bytes());
            }
            Value::Bytes(b) => {
                self.inner.update(&[TAG_BYTES]);
                self.write_len(b.len());
                self.inner.update(b);
            }
            Value::Tuple(items) => {
                self.inner.update(&[TAG_TUPLE]);
                self.write_len(items.len());
                for item in items {
                    self.write_value(item)?;
                }
            }
            Value::Record(inst) => {
                let code = inst.hash_code()?;
                self.inner.update(&[TAG_RECORD]);
                self.write_u64(code);
            }
            Value::List(_) | Value::Map(_) => {
                return Err(Error::type_error(format!(
                    "unhashable kind: '{}'",
                    value.kind_name()
                )));
            }
        }

        Ok(())
    }

    #[must_use]
    pub fn finish(&self) -> u64 {
        self.inner.digest()
    }

    fn write_int(&mut self, i: i64) {
        self.inner.update(&[TAG_INT]);
        self.inner.update(&i.to_le_bytes());
    }

    fn write_len(&mut self, len: usize) {
        self.write_u64(len as u64);
    }
}

impl Default for ValueHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Hash a single value.
pub fn hash_value(value: &Value) -> Result<u64, Error> {
    let mut hasher = ValueHasher::new();
    hasher.write_value(value)?;

    Ok(hasher.finish())
}
