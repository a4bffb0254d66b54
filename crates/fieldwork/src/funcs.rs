//! Structural helpers over record instances: conversion to plain values,
//! copy-with-changes and field introspection.

use crate::filters::Filter;
use fieldwork_core::{
    Error,
    config,
    init::Args,
    model::{Field, FieldList},
    record::{Instance, RecordType},
    registry,
    value::Value,
};
use std::{fmt, sync::Arc};

pub type SerializeFn =
    dyn Fn(Option<&Instance>, Option<&Field>, Value) -> Result<Value, Error> + Send + Sync;

// ============================================================================
// asdict
// ============================================================================

///
/// AsDict
///
/// Options for turning an instance into a `Value::Map` keyed by field name.
///
/// recurse                  → nested records become maps too, also inside
///                            lists, tuples and maps
/// retain_collection_types  → keep tuples as tuples (otherwise lists);
///                            collections used as map keys become tuples
/// value_serializer         → called on every kept field value, and on
///                            every leaf value met while recursing
///

#[derive(Clone)]
pub struct AsDict {
    pub recurse: bool,
    pub filter: Option<Filter>,
    pub retain_collection_types: bool,
    pub value_serializer: Option<Arc<SerializeFn>>,
}

impl Default for AsDict {
    fn default() -> Self {
        Self {
            recurse: true,
            filter: None,
            retain_collection_types: false,
            value_serializer: None,
        }
    }
}

impl AsDict {
    #[must_use]
    pub const fn recurse(mut self, recurse: bool) -> Self {
        self.recurse = recurse;
        self
    }

    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    #[must_use]
    pub const fn retain_collection_types(mut self, retain: bool) -> Self {
        self.retain_collection_types = retain;
        self
    }

    #[must_use]
    pub fn value_serializer<F>(mut self, f: F) -> Self
    where
        F: Fn(Option<&Instance>, Option<&Field>, Value) -> Result<Value, Error>
            + Send
            + Sync
            + 'static,
    {
        self.value_serializer = Some(Arc::new(f));
        self
    }

    pub fn apply(&self, inst: &Instance) -> Result<Value, Error> {
        let mut out = Vec::new();

        for field in inst.record_type().fields() {
            let value = inst.get(field.name())?;
            if let Some(filter) = &self.filter
                && !filter.keep(field, value)
            {
                continue;
            }

            let mut value = value.clone();
            if let Some(serialize) = &self.value_serializer {
                value = serialize(Some(inst), Some(field), value)?;
            }
            if self.recurse && is_container(&value) {
                value = self.anything(value, false)?;
            }

            out.push((Value::from(field.name()), value));
        }

        Ok(Value::Map(out))
    }

    fn anything(&self, value: Value, is_key: bool) -> Result<Value, Error> {
        match value {
            Value::Record(inst) => self.apply(&inst),
            Value::List(items) | Value::Tuple(items) if is_key => {
                Ok(Value::Tuple(self.items(items)?))
            }
            Value::List(items) => Ok(Value::List(self.items(items)?)),
            Value::Tuple(items) if self.retain_collection_types => {
                Ok(Value::Tuple(self.items(items)?))
            }
            Value::Tuple(items) => Ok(Value::List(self.items(items)?)),
            Value::Map(entries) => entries
                .into_iter()
                .map(|(k, v)| Ok((self.anything(k, true)?, self.anything(v, false)?)))
                .collect::<Result<Vec<_>, Error>>()
                .map(Value::Map),
            leaf => match &self.value_serializer {
                Some(serialize) => serialize(None, None, leaf),
                None => Ok(leaf),
            },
        }
    }

    fn items(&self, items: Vec<Value>) -> Result<Vec<Value>, Error> {
        items
            .into_iter()
            .map(|item| self.anything(item, false))
            .collect()
    }
}

const fn is_container(value: &Value) -> bool {
    matches!(
        value,
        Value::Record(_) | Value::List(_) | Value::Tuple(_) | Value::Map(_)
    )
}

impl fmt::Debug for AsDict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsDict")
            .field("recurse", &self.recurse)
            .field("filter", &self.filter)
            .field("retain_collection_types", &self.retain_collection_types)
            .field("value_serializer", &self.value_serializer.is_some())
            .finish()
    }
}

/// Every field of `inst` as a name → value map, recursing into nested
/// records.
pub fn asdict(inst: &Instance) -> Result<Value, Error> {
    AsDict::default().apply(inst)
}

// ============================================================================
// astuple
// ============================================================================

///
/// AsTuple
///
/// Options for turning an instance into a `Value::Tuple` of field values.
/// Recursion converts nested records (directly, or as members of lists,
/// tuples and maps) into tuples as well.
///

#[derive(Clone, Debug)]
pub struct AsTuple {
    pub recurse: bool,
    pub filter: Option<Filter>,
    pub retain_collection_types: bool,
}

impl Default for AsTuple {
    fn default() -> Self {
        Self {
            recurse: true,
            filter: None,
            retain_collection_types: false,
        }
    }
}

impl AsTuple {
    #[must_use]
    pub const fn recurse(mut self, recurse: bool) -> Self {
        self.recurse = recurse;
        self
    }

    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    #[must_use]
    pub const fn retain_collection_types(mut self, retain: bool) -> Self {
        self.retain_collection_types = retain;
        self
    }

    pub fn apply(&self, inst: &Instance) -> Result<Value, Error> {
        let mut out = Vec::new();

        for field in inst.record_type().fields() {
            let value = inst.get(field.name())?;
            if let Some(filter) = &self.filter
                && !filter.keep(field, value)
            {
                continue;
            }

            let value = if self.recurse {
                self.member(value.clone(), true)?
            } else {
                value.clone()
            };
            out.push(value);
        }

        Ok(Value::Tuple(out))
    }

    // top-level collections are rebuilt; deeper ones only have their records
    // converted
    fn member(&self, value: Value, top: bool) -> Result<Value, Error> {
        match value {
            Value::Record(inst) => self.apply(&inst),
            Value::List(items) if top => Ok(Value::List(self.members(items)?)),
            Value::Tuple(items) if top && !self.retain_collection_types => {
                Ok(Value::List(self.members(items)?))
            }
            Value::Tuple(items) if top => Ok(Value::Tuple(self.members(items)?)),
            Value::Map(entries) if top => entries
                .into_iter()
                .map(|(k, v)| Ok((self.member(k, false)?, self.member(v, false)?)))
                .collect::<Result<Vec<_>, Error>>()
                .map(Value::Map),
            other => Ok(other),
        }
    }

    fn members(&self, items: Vec<Value>) -> Result<Vec<Value>, Error> {
        items
            .into_iter()
            .map(|item| self.member(item, false))
            .collect()
    }
}

/// Every field value of `inst` as a tuple, recursing into nested records.
pub fn astuple(inst: &Instance) -> Result<Value, Error> {
    AsTuple::default().apply(inst)
}

// ============================================================================
// Copies
// ============================================================================

/// Copy `inst` and write `changes` straight into storage, skipping
/// converters, validators and the frozen check. Unknown names fail.
pub fn assoc<K, V>(
    inst: &Instance,
    changes: impl IntoIterator<Item = (K, V)>,
) -> Result<Instance, Error>
where
    K: AsRef<str>,
    V: Into<Value>,
{
    let mut copy = inst.duplicate();

    for (name, value) in changes {
        let name = name.as_ref();
        inst.record_type().field(name)?;
        copy.raw_set(name, value)?;
    }
    log::trace!("assoc on {}", inst.record_type().name());

    Ok(copy)
}

/// Build a new instance through the type's constructor, taking `changes`
/// (keyed by init alias) over the current values of every init field.
pub fn evolve<K, V>(
    inst: &Instance,
    changes: impl IntoIterator<Item = (K, V)>,
) -> Result<Instance, Error>
where
    K: Into<String>,
    V: Into<Value>,
{
    let changes: Vec<(String, Value)> = changes
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect();
    let ty = inst.record_type();

    let mut args = Args::new();
    for field in ty.fields().iter().filter(|f| f.init) {
        let alias = field.init_alias();
        if !changes.iter().any(|(k, _)| k == alias) {
            args = args.kwarg(alias, inst.get(field.name())?.clone());
        }
    }
    for (keyword, value) in changes {
        args = args.kwarg(keyword, value);
    }
    log::trace!("evolving {}", ty.name());

    ty.instantiate(args)
}

// ============================================================================
// Introspection
// ============================================================================

/// Whether a record type called `name` has been assembled.
#[must_use]
pub fn has(name: &str) -> bool {
    registry::lookup_name(name).is_some()
}

/// Fields of `ty` in declaration order.
#[must_use]
pub fn fields(ty: &RecordType) -> &FieldList {
    ty.fields()
}

/// Fields of `ty` as `(name, field)` pairs, in declaration order.
#[must_use]
pub fn fields_dict(ty: &RecordType) -> Vec<(&str, &Field)> {
    ty.fields().iter().map(|f| (f.name(), f)).collect()
}

/// Re-run every field's validators against the current values. Does
/// nothing while validators are disabled.
pub fn validate(inst: &Instance) -> Result<(), Error> {
    if !config::run_validators() {
        return Ok(());
    }

    for field in inst.record_type().fields() {
        field.validate(inst, inst.get(field.name())?)?;
    }

    Ok(())
}
