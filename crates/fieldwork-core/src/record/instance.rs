use crate::{
    compare::{CmpOp, Comparable},
    error::{Error, FrozenError, LookupError},
    model::Supplied,
    record::RecordType,
    value::{Value, records_equal},
};
use serde::{Serialize, Serializer, ser::SerializeMap};
use std::{
    cmp::Ordering,
    collections::BTreeMap,
    fmt,
    hash::{Hash, Hasher},
    sync::{
        Arc, OnceLock, Weak,
        atomic::{AtomicU64, Ordering as AtomicOrdering},
    },
};

static NEXT_SERIAL: AtomicU64 = AtomicU64::new(1);

///
/// Instance
///
/// One value slot per field of its record type, plus free-form extras on
/// non-slotted types.
///
/// Clones share the original's identity (as seen by identity equality and
/// identity hashing); `duplicate` makes a copy with a fresh one.
///

#[derive(Clone)]
pub struct Instance {
    ty: Arc<RecordType>,
    serial: u64,
    slots: Vec<Supplied>,
    extras: BTreeMap<String, Value>,
    hash_cache: OnceLock<u64>,
}

impl Instance {
    pub(crate) fn blank(ty: Arc<RecordType>) -> Self {
        let slots = vec![Supplied::Nothing; ty.fields().len()];

        Self {
            ty,
            serial: NEXT_SERIAL.fetch_add(1, AtomicOrdering::Relaxed),
            slots,
            extras: BTreeMap::new(),
            hash_cache: OnceLock::new(),
        }
    }

    #[must_use]
    pub const fn record_type(&self) -> &Arc<RecordType> {
        &self.ty
    }

    pub(crate) const fn serial(&self) -> u64 {
        self.serial
    }

    /// Whether both handles denote the same object.
    #[must_use]
    pub const fn same_object(&self, other: &Self) -> bool {
        self.serial == other.serial
    }

    /// Copy with a new identity and an empty hash cache.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self {
            ty: Arc::clone(&self.ty),
            serial: NEXT_SERIAL.fetch_add(1, AtomicOrdering::Relaxed),
            slots: self.slots.clone(),
            extras: self.extras.clone(),
            hash_cache: OnceLock::new(),
        }
    }

    ///
    /// READ
    ///

    /// Value of a field or extra attribute.
    pub fn get(&self, name: &str) -> Result<&Value, Error> {
        match self.ty.fields().position(name) {
            Some(pos) => self.slots[pos].as_value().ok_or_else(|| {
                LookupError::Unset {
                    record: self.ty.name().to_string(),
                    field: name.to_string(),
                }
                .into()
            }),
            None => self
                .extras
                .get(name)
                .ok_or_else(|| self.no_attribute(name)),
        }
    }

    /// Raw slot of a declared field, set or not.
    pub fn raw_get(&self, name: &str) -> Result<&Supplied, Error> {
        self.ty
            .fields()
            .position(name)
            .map(|pos| &self.slots[pos])
            .ok_or_else(|| {
                LookupError::NoField {
                    record: self.ty.name().to_string(),
                    field: name.to_string(),
                }
                .into()
            })
    }

    #[must_use]
    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).is_ok()
    }

    /// Declared fields with their slots, in field order.
    pub fn slots(&self) -> impl Iterator<Item = (&str, &Supplied)> {
        self.ty.fields().names().zip(self.slots.iter())
    }

    #[must_use]
    pub const fn extras(&self) -> &BTreeMap<String, Value> {
        &self.extras
    }

    ///
    /// WRITE
    ///

    /// Assign through the type's set policy.
    ///
    /// Frozen types reject the write and leave the instance untouched.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), Error> {
        let value = value.into();

        if self.ty.is_frozen() {
            return Err(FrozenError::Instance {
                record: self.ty.name().to_string(),
                attribute: name.to_string(),
            }
            .into());
        }

        let value = match self.ty.fields().get(name) {
            Some(field) => self
                .ty
                .setattr()
                .apply(self.ty.name(), self, field, value)?,
            None => value,
        };

        self.raw_set(name, value)
    }

    /// Write storage directly, bypassing the set policy. Drops any cached
    /// hash.
    pub fn raw_set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), Error> {
        let value = value.into();

        match self.ty.fields().position(name) {
            Some(pos) => self.slots[pos] = Supplied::Value(value),
            None if !self.ty.has_slots() => {
                self.extras.insert(name.to_string(), value);
            }
            None => return Err(self.no_attribute(name)),
        }
        self.hash_cache = OnceLock::new();

        Ok(())
    }

    /// Unset a field or remove an extra attribute.
    pub fn delete(&mut self, name: &str) -> Result<(), Error> {
        if self.ty.is_frozen() {
            return Err(FrozenError::Instance {
                record: self.ty.name().to_string(),
                attribute: name.to_string(),
            }
            .into());
        }

        match self.ty.fields().position(name) {
            Some(pos) if self.slots[pos].is_nothing() => Err(self.no_attribute(name)),
            Some(pos) => {
                self.slots[pos] = Supplied::Nothing;
                self.hash_cache = OnceLock::new();
                Ok(())
            }
            None => self
                .extras
                .remove(name)
                .map(|_| ())
                .ok_or_else(|| self.no_attribute(name)),
        }
    }

    ///
    /// BEHAVIOUR
    ///

    /// Hash through the type, using the per-instance cache when enabled.
    pub fn hash_code(&self) -> Result<u64, Error> {
        if !self.ty.caches_hash() {
            return self.ty.hash(self);
        }
        if let Some(code) = self.hash_cache.get() {
            return Ok(*code);
        }

        let code = self.ty.hash(self)?;
        let _ = self.hash_cache.set(code);

        Ok(code)
    }

    #[must_use]
    pub fn repr(&self) -> String {
        self.ty.repr(self)
    }

    /// Set fields (then extras) as name/value pairs, for `restore`.
    #[must_use]
    pub fn state(&self) -> Vec<(String, Value)> {
        self.slots()
            .filter_map(|(name, slot)| slot.as_value().map(|v| (name.to_string(), v.clone())))
            .chain(self.extras.iter().map(|(k, v)| (k.clone(), v.clone())))
            .collect()
    }

    /// Weak handle, when the type allows weak references.
    pub fn downgrade(this: &Arc<Self>) -> Result<Weak<Self>, Error> {
        if !this.ty.weakref_enabled() {
            return Err(Error::type_error(format!(
                "cannot create weak reference to '{}' object",
                this.ty.name()
            )));
        }

        Ok(Arc::downgrade(this))
    }

    fn no_attribute(&self, name: &str) -> Error {
        LookupError::NoAttribute {
            record: self.ty.name().to_string(),
            attribute: name.to_string(),
        }
        .into()
    }

    // ordering with reflection; incomparable pairs yield None
    fn ordered(&self, op: CmpOp, other: &Self) -> Option<bool> {
        match self.ty.compare(op, self, other) {
            Ok(Comparable::Value(b)) => Some(b),
            Ok(Comparable::NotComparable) => {
                match other.ty.compare(op.reflect(), other, self) {
                    Ok(Comparable::Value(b)) => Some(b),
                    _ => None,
                }
            }
            Err(_) => None,
        }
    }
}

///
/// TRAITS
///

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        records_equal(self, other)
    }
}

impl PartialOrd for Instance {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.ordered(CmpOp::Lt, other)? {
            Some(Ordering::Less)
        } else if self.ordered(CmpOp::Gt, other)? {
            Some(Ordering::Greater)
        } else if self.ordered(CmpOp::Le, other)? {
            Some(Ordering::Equal)
        } else {
            None
        }
    }
}

// Unhashable instances feed nothing, which keeps `Hash` consistent with
// `PartialEq` at the cost of collisions.
impl Hash for Instance {
    fn hash<H: Hasher>(&self, state: &mut H) {
        if let Ok(code) = self.hash_code() {
            state.write_u64(code);
        }
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr())
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(self.ty.name());
        for (name, slot) in self.slots() {
            s.field(name, slot);
        }
        for (name, value) in &self.extras {
            s.field(name, value);
        }

        s.finish()
    }
}

impl Serialize for Instance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let set: Vec<(&str, &Value)> = self
            .slots()
            .filter_map(|(name, slot)| slot.as_value().map(|v| (name, v)))
            .collect();

        let mut map = serializer.serialize_map(Some(set.len()))?;
        for (name, value) in set {
            map.serialize_entry(name, value)?;
        }

        map.end()
    }
}
