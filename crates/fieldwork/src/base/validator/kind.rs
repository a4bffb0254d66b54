use fieldwork_core::{Error, model::Validator, value::Kind};

/// Value must be of `kind`.
#[must_use]
pub fn instance_of(kind: Kind) -> Validator {
    instance_of_any([kind])
}

/// Value must be of one of `kinds`.
#[must_use]
pub fn instance_of_any(kinds: impl IntoIterator<Item = Kind>) -> Validator {
    let kinds: Vec<Kind> = kinds.into_iter().collect();
    let expected = match kinds.as_slice() {
        [one] => one.to_string(),
        many => format!(
            "one of ({})",
            many.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
        ),
    };

    Validator::new(format!("instance_of {expected}"), move |_, field, value| {
        if kinds.iter().any(|k| k.matches(value)) {
            return Ok(());
        }

        Err(Error::type_error(format!(
            "'{}' must be {expected} (got {} that is a {}).",
            field.name(),
            value.repr(),
            value.kind()
        )))
    })
}
