use crate::base::BaseError;
use fieldwork_core::{
    Error,
    model::Validator,
    value::{Value, values_equal},
};

/// Value must be contained in `options`.
///
/// Lists and tuples test membership, maps test their keys and text tests
/// for a substring (the value must then be text as well).
pub fn in_(options: impl Into<Value>) -> Result<Validator, BaseError> {
    let options = options.into();
    if !matches!(
        options,
        Value::List(_) | Value::Tuple(_) | Value::Map(_) | Value::Text(_)
    ) {
        return Err(BaseError::InvalidArgument {
            builder: "in_",
            option: options.repr(),
            reason: format!("a {} is not a container", options.kind()),
        });
    }

    Ok(Validator::new(
        format!("in_ {}", options.repr()),
        move |_, field, value| {
            let found = match (&options, value) {
                (Value::List(items) | Value::Tuple(items), _) => {
                    items.iter().any(|item| values_equal(item, value))
                }
                (Value::Map(entries), _) => entries.iter().any(|(k, _)| values_equal(k, value)),
                (Value::Text(haystack), Value::Text(needle)) => haystack.contains(needle.as_str()),
                _ => false,
            };

            if found {
                Ok(())
            } else {
                Err(Error::value_error(format!(
                    "'{}' must be in {} (got {})",
                    field.name(),
                    options.repr(),
                    value.repr()
                )))
            }
        },
    ))
}

/// Every member of a list or tuple must pass `member`; the container itself
/// is checked first by `iterable`, when given.
#[must_use]
pub fn deep_iterable(member: Validator, iterable: Option<Validator>) -> Validator {
    let name = match &iterable {
        Some(outer) => format!("deep_iterable {} of {}", outer.name(), member.name()),
        None => format!("deep_iterable of {}", member.name()),
    };

    Validator::new(name, move |inst, field, value| {
        if let Some(outer) = &iterable {
            outer.call(inst, field, value)?;
        }

        let items = value.as_sequence().ok_or_else(|| {
            Error::type_error(format!(
                "'{}' must be a list or tuple (got {} that is a {})",
                field.name(),
                value.repr(),
                value.kind()
            ))
        })?;

        items.iter().try_for_each(|item| member.call(inst, field, item))
    })
}

/// Every key must pass `key` and every value `value`; the map itself is
/// checked first by `mapping`, when given.
#[must_use]
pub fn deep_mapping(key: Validator, value: Validator, mapping: Option<Validator>) -> Validator {
    let name = format!("deep_mapping {} to {}", key.name(), value.name());

    Validator::new(name, move |inst, field, map| {
        if let Some(outer) = &mapping {
            outer.call(inst, field, map)?;
        }

        let entries = map.as_map().ok_or_else(|| {
            Error::type_error(format!(
                "'{}' must be a map (got {} that is a {})",
                field.name(),
                map.repr(),
                map.kind()
            ))
        })?;

        entries.iter().try_for_each(|(k, v)| {
            key.call(inst, field, k)?;
            value.call(inst, field, v)
        })
    })
}
