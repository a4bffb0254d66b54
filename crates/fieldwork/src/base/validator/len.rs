use super::no_len;
use fieldwork_core::{Error, model::Validator};

/// Length must be at most `length`.
#[must_use]
pub fn max_len(length: usize) -> Validator {
    Validator::new(format!("max_len {length}"), move |_, field, value| {
        let len = value.len().ok_or_else(|| no_len(field.name(), value))?;

        if len <= length {
            Ok(())
        } else {
            Err(Error::value_error(format!(
                "Length of '{}' must be <= {length}: {len}",
                field.name()
            )))
        }
    })
}

/// Length must be at least `length`.
#[must_use]
pub fn min_len(length: usize) -> Validator {
    Validator::new(format!("min_len {length}"), move |_, field, value| {
        let len = value.len().ok_or_else(|| no_len(field.name(), value))?;

        if len >= length {
            Ok(())
        } else {
            Err(Error::value_error(format!(
                "Length of '{}' must be >= {length}: {len}",
                field.name()
            )))
        }
    })
}
