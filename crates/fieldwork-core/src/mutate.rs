//! Mutation interception: the single "set field" entry point is configured
//! once per record type as a hook pipeline, a plain store, or a rejection.

use crate::{
    config,
    error::{Error, FrozenError},
    model::Field,
    record::Instance,
    value::Value,
};
use std::{fmt, sync::Arc};

pub type SetHookFn = dyn Fn(&Instance, &Field, Value) -> Result<Value, Error> + Send + Sync;

///
/// SetHook
///
/// One stage of a set pipeline: receives `(instance, field, new value)` and
/// returns the value handed to the next stage.
///

#[derive(Clone)]
pub struct SetHook {
    name: String,
    hook: Arc<SetHookFn>,
}

impl SetHook {
    pub fn new<F>(name: impl Into<String>, hook: F) -> Self
    where
        F: Fn(&Instance, &Field, Value) -> Result<Value, Error> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            hook: Arc::new(hook),
        }
    }

    /// Run the field's converter.
    #[must_use]
    pub fn convert() -> Self {
        Self::new("convert", |inst, field, value| field.convert(inst, value))
    }

    /// Run the field's validators unless validators are disabled.
    #[must_use]
    pub fn validate() -> Self {
        Self::new("validate", |inst, field, value| {
            if config::run_validators() {
                field.validate(inst, &value)?;
            }

            Ok(value)
        })
    }

    /// Reject every assignment.
    #[must_use]
    pub fn frozen() -> Self {
        Self::new("frozen", |_, field, _| {
            Err(FrozenError::Attribute {
                attribute: field.name.clone(),
            }
            .into())
        })
    }

    /// Compose stages; the result of the last one is stored.
    #[must_use]
    pub fn pipe(hooks: Vec<Self>) -> Self {
        let name = hooks
            .iter()
            .map(Self::name)
            .collect::<Vec<_>>()
            .join("|");

        Self::new(name, move |inst, field, value| {
            hooks
                .iter()
                .try_fold(value, |acc, hook| hook.call(inst, field, acc))
        })
    }

    /// The pipeline used by mutable types that declare no hooks.
    #[must_use]
    pub fn default_pipeline() -> Vec<Self> {
        vec![Self::convert(), Self::validate()]
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, inst: &Instance, field: &Field, value: Value) -> Result<Value, Error> {
        (self.hook)(inst, field, value)
    }
}

impl fmt::Debug for SetHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} hook>", self.name)
    }
}

///
/// OnSetattr
///
/// Per-field override of the type's pipeline.
///

#[derive(Clone, Debug)]
pub enum OnSetattr {
    /// Store the value untouched.
    NoOp,
    Hooks(Vec<SetHook>),
}

///
/// Setattr
///
/// Type-wide assignment policy, fixed at assembly.
///

#[derive(Clone, Debug)]
pub enum Setattr {
    Plain,
    Hooks(Vec<SetHook>),
    Frozen,
}

impl Setattr {
    #[must_use]
    pub const fn is_frozen(&self) -> bool {
        matches!(self, Self::Frozen)
    }

    /// Value to store for `field` after running the applicable pipeline.
    pub(crate) fn apply(
        &self,
        record: &str,
        inst: &Instance,
        field: &Field,
        value: Value,
    ) -> Result<Value, Error> {
        let hooks = match (self, &field.on_setattr) {
            (Self::Frozen, _) => {
                return Err(FrozenError::Instance {
                    record: record.to_string(),
                    attribute: field.name.clone(),
                }
                .into());
            }
            (_, Some(OnSetattr::NoOp)) | (Self::Plain, None) => return Ok(value),
            (_, Some(OnSetattr::Hooks(hooks))) | (Self::Hooks(hooks), None) => hooks,
        };

        log::trace!("{record}.{}: running {} set hook(s)", field.name, hooks.len());

        hooks
            .iter()
            .try_fold(value, |acc, hook| hook.call(inst, field, acc))
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        args,
        assemble,
        model::{Converter, Field, Options, RecordDecl},
    };

    fn mutable_record(hooks: Option<Vec<SetHook>>) -> Instance {
        let mut options = Options::default();
        options.on_setattr = hooks;

        let ty = assemble(
            RecordDecl::new("Counter")
                .field(Field::new("n").converter(Converter::new(|v| {
                    Ok(Value::Int(v.as_int().unwrap_or_default() * 2))
                })))
                .field(Field::new("raw").default(0).on_setattr(OnSetattr::NoOp)),
            options,
        )
        .unwrap();

        ty.instantiate(args![1]).unwrap()
    }

    #[test]
    fn default_pipeline_converts_on_set() {
        let mut inst = mutable_record(None);
        inst.set("n", 21).unwrap();

        assert_eq!(inst.get("n").unwrap(), &Value::Int(42));
    }

    #[test]
    fn empty_pipeline_stores_plainly() {
        let mut inst = mutable_record(Some(Vec::new()));
        inst.set("n", 21).unwrap();

        assert_eq!(inst.get("n").unwrap(), &Value::Int(21));
    }

    #[test]
    fn no_op_field_skips_type_hooks() {
        let mut inst = mutable_record(Some(vec![SetHook::frozen()]));
        inst.set("raw", 7).unwrap();

        assert_eq!(inst.get("raw").unwrap(), &Value::Int(7));
    }

    #[test]
    fn frozen_hook_names_the_attribute() {
        let mut inst = mutable_record(Some(vec![SetHook::frozen()]));
        let err = inst.set("n", 1).unwrap_err();

        match err {
            Error::Frozen(frozen) => assert_eq!(frozen.attribute(), "n"),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(inst.get("n").unwrap(), &Value::Int(2));
    }

    #[test]
    fn pipe_feeds_each_stage() {
        let add = |n: i64| {
            SetHook::new(format!("add{n}"), move |_, _, v| {
                Ok(Value::Int(v.as_int().unwrap_or_default() + n))
            })
        };
        let mut inst = mutable_record(Some(vec![SetHook::pipe(vec![add(1), add(10)])]));
        inst.set("n", 0).unwrap();

        assert_eq!(inst.get("n").unwrap(), &Value::Int(11));
    }
}
