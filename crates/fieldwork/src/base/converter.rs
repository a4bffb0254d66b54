//! Converters: value-to-value transforms run before a value is stored.

use fieldwork_core::{Error, model::Converter, value::Value};

/// Make `converter` accept `Null`.
///
/// Non-null values go through `converter` as usual. `Null` is stored as-is
/// unless `converter` fills nulls (`default_if_none`, or a pipe starting with
/// it), in which case it gets to replace the `Null`.
#[must_use]
pub fn optional(converter: Converter) -> Converter {
    Converter::contextual(move |value, inst, field| {
        if value.is_null() && !converter.is_null_filling() {
            Ok(Value::Null)
        } else {
            converter.convert(value, inst, field)
        }
    })
}

/// Replace `Null` with `default`.
#[must_use]
pub fn default_if_none(default: impl Into<Value>) -> Converter {
    let default = default.into();

    Converter::new(move |value| {
        if value.is_null() {
            Ok(default.clone())
        } else {
            Ok(value)
        }
    })
    .fills_null()
}

/// Replace `Null` with a fresh value from `factory`.
#[must_use]
pub fn default_if_none_with<F>(factory: F) -> Converter
where
    F: Fn() -> Result<Value, Error> + Send + Sync + 'static,
{
    Converter::new(move |value| {
        if value.is_null() {
            factory()
        } else {
            Ok(value)
        }
    })
    .fills_null()
}

/// Map "boolean-ish" values onto `Bool`.
///
/// true  → true, 1, "true", "t", "yes", "y", "on", "1"
/// false → false, 0, "false", "f", "no", "n", "off", "0"
///
/// Text is matched case-insensitively; anything else is a value error.
#[must_use]
pub fn to_bool() -> Converter {
    Converter::new(|value| parse_bool(&value).map(Value::Bool))
}

#[allow(clippy::float_cmp)]
fn parse_bool(value: &Value) -> Result<bool, Error> {
    let parsed = match value {
        Value::Bool(b) => Some(*b),
        Value::Int(1) => Some(true),
        Value::Int(0) => Some(false),
        Value::Float(f) if *f == 1.0 => Some(true),
        Value::Float(f) if *f == 0.0 => Some(false),
        Value::Text(s) => match s.to_lowercase().as_str() {
            "true" | "t" | "yes" | "y" | "on" | "1" => Some(true),
            "false" | "f" | "no" | "n" | "off" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    };

    parsed.ok_or_else(|| {
        Error::value_error(format!("Cannot convert value to bool: {}", value.repr()))
    })
}

/// Chain converters; each output feeds the next.
#[must_use]
pub fn pipe(converters: impl IntoIterator<Item = Converter>) -> Converter {
    Converter::pipe(converters.into_iter().collect())
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use fieldwork_core::{
        args, assemble,
        model::{Field, Options, RecordDecl},
    };

    #[test]
    fn bool_spellings() {
        for yes in ["true", "T", "Yes", "y", "ON", "1"] {
            assert!(parse_bool(&Value::from(yes)).unwrap(), "{yes}");
        }
        for no in ["false", "F", "no", "N", "off", "0"] {
            assert!(!parse_bool(&Value::from(no)).unwrap(), "{no}");
        }

        assert!(parse_bool(&Value::Int(1)).unwrap());
        assert!(!parse_bool(&Value::Bool(false)).unwrap());
    }

    fn run(converter: &Converter, value: Value) -> Result<Value, Error> {
        let ty = assemble(
            RecordDecl::new("Conv").field(Field::new("v").converter(converter.clone())),
            Options::default(),
        )?;

        ty.instantiate(args![value])?.get("v").cloned()
    }

    #[test]
    fn optional_passes_null_unless_the_inner_converter_fills_it() {
        let double = Converter::new(|v| Ok(Value::Int(v.as_int().unwrap_or_default() * 2)));

        let lenient = optional(double.clone());
        assert_eq!(run(&lenient, Value::Null).unwrap(), Value::Null);
        assert_eq!(run(&lenient, Value::Int(4)).unwrap(), Value::Int(8));

        let filled = optional(pipe([default_if_none(1), double]));
        assert_eq!(run(&filled, Value::Null).unwrap(), Value::Int(2));
        assert_eq!(run(&filled, Value::Int(3)).unwrap(), Value::Int(6));

        assert!(default_if_none(0).is_null_filling());
        assert!(!to_bool().is_null_filling());
    }

    #[test]
    fn bool_rejects_everything_else() {
        for bad in [Value::Int(2), Value::from("maybe"), Value::Null, Value::list([1])] {
            let err = parse_bool(&bad).unwrap_err();
            assert!(err.is_value_error());
            assert!(err.to_string().starts_with("Cannot convert value to bool: "));
        }
    }
}
