//! Synthesized construction: argument binding followed by the per-field
//! resolve, convert, store, validate loop.

use crate::{
    config,
    error::{Error, InitError},
    model::{Field, FieldList},
    record::Instance,
    value::Value,
};

///
/// Args
///
/// Call arguments for a constructor: positional values followed by keyword
/// pairs. Keywords bind by field alias.
///

#[derive(Clone, Debug, Default)]
pub struct Args {
    positional: Vec<Value>,
    keywords: Vec<(String, Value)>,
}

impl Args {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            positional: Vec::new(),
            keywords: Vec::new(),
        }
    }

    #[must_use]
    pub fn positional<T: Into<Value>>(values: impl IntoIterator<Item = T>) -> Self {
        Self {
            positional: values.into_iter().map(Into::into).collect(),
            keywords: Vec::new(),
        }
    }

    #[must_use]
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    #[must_use]
    pub fn kwarg(mut self, keyword: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keywords.push((keyword.into(), value.into()));
        self
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keywords.is_empty()
    }

    #[must_use]
    pub fn positional_values(&self) -> &[Value] {
        &self.positional
    }

    #[must_use]
    pub fn keywords(&self) -> &[(String, Value)] {
        &self.keywords
    }

    #[must_use]
    pub fn into_parts(self) -> (Vec<Value>, Vec<(String, Value)>) {
        (self.positional, self.keywords)
    }
}

/// Build `Args` inline: `args![1, 2, y = 3]`.
///
/// Positional values come first; `ident = expr` pairs become keywords.
#[macro_export]
macro_rules! args {
    (@munch $acc:expr;) => { $acc };
    (@munch $acc:expr; $name:ident = $value:expr) => {
        $acc.kwarg(stringify!($name), $value)
    };
    (@munch $acc:expr; $name:ident = $value:expr, $($rest:tt)*) => {
        $crate::args!(@munch $acc.kwarg(stringify!($name), $value); $($rest)*)
    };
    (@munch $acc:expr; $value:expr) => {
        $acc.arg($value)
    };
    (@munch $acc:expr; $value:expr, $($rest:tt)*) => {
        $crate::args!(@munch $acc.arg($value); $($rest)*)
    };
    () => { $crate::init::Args::new() };
    ($($rest:tt)+) => {
        $crate::args!(@munch $crate::init::Args::new(); $($rest)+)
    };
}

// ============================================================================
// Construction
// ============================================================================

/// Run the synthesized constructor for `fields` on a blank instance.
///
/// Binding errors surface before any field is written. After that, fields
/// are handled left to right, so a failure part-way leaves the earlier
/// fields set on the (discarded) instance.
pub(crate) fn construct(inst: &mut Instance, fields: &FieldList, args: Args) -> Result<(), Error> {
    let record = inst.record_type().name().to_string();
    let mut bound = bind(&record, fields, args)?;

    log::trace!("constructing {record} with {} field(s)", fields.len());

    if let Some(hook) = inst.record_type().hooks().pre_init.clone() {
        hook(inst)?;
    }

    for (field, supplied) in fields.iter().zip(bound.iter_mut()) {
        let value = if field.init {
            match supplied.take() {
                Some(value) => value,
                None => field.default.resolve(inst)?.ok_or_else(|| InitError::MissingArgument {
                    record: record.clone(),
                    parameter: field.init_alias().to_string(),
                })?,
            }
        } else {
            match field.default.resolve(inst)? {
                Some(value) => value,
                None => continue,
            }
        };

        store(inst, field, value)?;
    }

    if let Some(hook) = inst.record_type().hooks().post_init.clone() {
        hook(inst)?;
    }

    Ok(())
}

// convert, write through the raw path, then validate the stored value
fn store(inst: &mut Instance, field: &Field, value: Value) -> Result<(), Error> {
    let value = field.convert(inst, value)?;
    inst.raw_set(&field.name, value)?;

    if config::run_validators() && !field.validators.is_empty() {
        let stored = inst.get(&field.name)?;
        field.validate(inst, stored)?;
    }

    Ok(())
}

// Match call arguments to fields. The result is indexed like `fields`.
fn bind(record: &str, fields: &FieldList, args: Args) -> Result<Vec<Option<Value>>, Error> {
    let (positional, keywords) = args.into_parts();
    let mut bound: Vec<Option<Value>> = vec![None; fields.len()];

    let slots: Vec<usize> = fields
        .iter()
        .enumerate()
        .filter(|(_, f)| f.is_positional())
        .map(|(i, _)| i)
        .collect();

    if positional.len() > slots.len() {
        return Err(InitError::TooManyPositional {
            record: record.to_string(),
            expected: slots.len(),
            given: positional.len(),
        }
        .into());
    }

    for (slot, value) in slots.into_iter().zip(positional) {
        bound[slot] = Some(value);
    }

    for (keyword, value) in keywords {
        let slot = fields
            .iter()
            .position(|f| f.init && f.init_alias() == keyword)
            .ok_or_else(|| InitError::UnexpectedKeyword {
                record: record.to_string(),
                keyword: keyword.clone(),
            })?;

        if bound[slot].is_some() {
            return Err(InitError::DuplicateArgument {
                record: record.to_string(),
                parameter: keyword,
            }
            .into());
        }
        bound[slot] = Some(value);
    }

    Ok(bound)
}

/// Binding for types without any constructor: no arguments accepted.
pub(crate) fn reject_args(record: &str, args: &Args) -> Result<(), Error> {
    if let Some((keyword, _)) = args.keywords().first() {
        return Err(InitError::UnexpectedKeyword {
            record: record.to_string(),
            keyword: keyword.clone(),
        }
        .into());
    }
    if !args.positional_values().is_empty() {
        return Err(InitError::TooManyPositional {
            record: record.to_string(),
            expected: 0,
            given: args.positional_values().len(),
        }
        .into());
    }

    Ok(())
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        assemble,
        error::{InitError, LookupError},
        model::{Field, Options, RecordDecl, Validator},
    };
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    fn point() -> Arc<crate::record::RecordType> {
        assemble(
            RecordDecl::new("Point")
                .field(Field::new("x"))
                .field(Field::new("y").default(10))
                .field(Field::new("tag").default("p").kw_only(true)),
            Options::default(),
        )
        .unwrap()
    }

    #[test]
    fn args_macro_builds_positional_then_keywords() {
        let args = args![1, 2, tag = "q"];

        assert_eq!(args.positional_values(), &[Value::Int(1), Value::Int(2)]);
        assert_eq!(args.keywords()[0].0, "tag");
        assert!(args![].is_empty());
    }

    #[test]
    fn too_many_positional_counts_positional_fields_only() {
        let err = point().instantiate(args![1, 2, 3]).unwrap_err();

        match err {
            Error::Init(InitError::TooManyPositional { expected, given, .. }) => {
                assert_eq!((expected, given), (2, 3));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_keyword_is_rejected() {
        let err = point().instantiate(args![1, z = 3]).unwrap_err();

        assert!(matches!(
            err,
            Error::Init(InitError::UnexpectedKeyword { ref keyword, .. }) if keyword == "z"
        ));
    }

    #[test]
    fn positional_and_keyword_for_same_field() {
        let err = point().instantiate(args![1, x = 3]).unwrap_err();

        assert!(matches!(
            err,
            Error::Init(InitError::DuplicateArgument { ref parameter, .. }) if parameter == "x"
        ));
    }

    #[test]
    fn kw_only_field_binds_by_keyword() {
        let inst = point().instantiate(args![1, tag = "z"]).unwrap();

        assert_eq!(inst.get("tag").unwrap(), &Value::from("z"));
        assert_eq!(inst.get("y").unwrap(), &Value::Int(10));
    }

    #[test]
    fn fields_are_validated_left_to_right() {
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        let ty = assemble(
            RecordDecl::new("Pair")
                .field(Field::new("a").validator(Validator::new("count", move |_, _, _| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                })))
                .field(Field::new("b")),
            Options::default(),
        )
        .unwrap();

        let err = ty.instantiate(args![1]).unwrap_err();

        assert!(matches!(err, Error::Init(InitError::MissingArgument { .. })));
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn validators_see_earlier_fields_only() {
        let below = |other: &'static str| {
            Validator::new("below", move |inst, field, value| {
                let bound = inst.get(other)?;
                if value.as_int() < bound.as_int() {
                    Ok(())
                } else {
                    Err(Error::value_error(format!("'{}' must be below '{other}'", field.name)))
                }
            })
        };
        let above = |other: &'static str| {
            Validator::new("above", move |inst, _, value| {
                let bound = inst.get(other)?;
                if value.as_int() > bound.as_int() {
                    Ok(())
                } else {
                    Err(Error::value_error(format!("must be above '{other}'")))
                }
            })
        };

        // `lo` is stored before `hi`, so its validator cannot see `hi`
        let forward = assemble(
            RecordDecl::new("Forward")
                .field(Field::new("lo").validator(below("hi")))
                .field(Field::new("hi")),
            Options::default(),
        )
        .unwrap();
        let err = forward.instantiate(args![1, 5]).unwrap_err();
        assert!(matches!(err, Error::Lookup(LookupError::Unset { .. })));

        let backward = assemble(
            RecordDecl::new("Backward")
                .field(Field::new("lo"))
                .field(Field::new("hi").validator(above("lo"))),
            Options::default(),
        )
        .unwrap();
        assert!(backward.instantiate(args![1, 5]).is_ok());
        assert!(backward.instantiate(args![5, 1]).unwrap_err().is_value_error());

        // every field is set by the time post_init runs
        let checked = assemble(
            RecordDecl::new("Checked")
                .field(Field::new("lo"))
                .field(Field::new("hi"))
                .post_init(|inst| {
                    if inst.get("lo")?.as_int() < inst.get("hi")?.as_int() {
                        Ok(())
                    } else {
                        Err(Error::value_error("lo must be below hi"))
                    }
                }),
            Options::default(),
        )
        .unwrap();
        assert!(checked.instantiate(args![1, 5]).is_ok());
        assert!(checked.instantiate(args![5, 1]).unwrap_err().is_value_error());
    }

    #[test]
    fn non_init_field_without_default_stays_unset() {
        let ty = assemble(
            RecordDecl::new("Lazy")
                .field(Field::new("a"))
                .field(Field::new("cache").init(false)),
            Options::default(),
        )
        .unwrap();
        let inst = ty.instantiate(args![1]).unwrap();

        assert!(!inst.is_set("cache"));
        assert!(inst.get("cache").is_err());
    }

    #[test]
    fn post_init_may_write_to_frozen_instances() {
        let ty = assemble(
            RecordDecl::new("Area")
                .field(Field::new("w"))
                .field(Field::new("h"))
                .field(Field::new("area").init(false))
                .post_init(|inst| {
                    let w = inst.get("w")?.as_int().unwrap_or_default();
                    let h = inst.get("h")?.as_int().unwrap_or_default();
                    inst.raw_set("area", w * h)
                }),
            Options::default().frozen(true),
        )
        .unwrap();
        let inst = ty.instantiate(args![3, 4]).unwrap();

        assert_eq!(inst.get("area").unwrap(), &Value::Int(12));
    }

    #[test]
    fn pre_init_runs_before_fields() {
        let ty = assemble(
            RecordDecl::new("Early")
                .field(Field::new("a").default(1))
                .pre_init(|inst| {
                    assert!(!inst.is_set("a"));
                    Ok(())
                }),
            Options::default(),
        )
        .unwrap();

        assert!(ty.instantiate(args![]).is_ok());
    }
}
