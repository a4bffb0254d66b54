use fieldwork_core::{Error, model::Validator};

fn names(validators: &[Validator]) -> String {
    let names: Vec<String> = validators
        .iter()
        .map(|v| format!("<{} validator>", v.name()))
        .collect();

    format!("[{}]", names.join(", "))
}

/// `Null` passes; anything else must pass every validator in `validators`.
#[must_use]
pub fn optional(validators: impl IntoIterator<Item = Validator>) -> Validator {
    let inner = and_(validators);

    Validator::new(format!("optional {}", inner.name()), move |inst, field, value| {
        if value.is_null() {
            Ok(())
        } else {
            inner.call(inst, field, value)
        }
    })
}

/// All of `validators`, in order; the first failure is returned.
#[must_use]
pub fn and_(validators: impl IntoIterator<Item = Validator>) -> Validator {
    let validators: Vec<Validator> = validators.into_iter().collect();

    Validator::new(format!("and_ {}", names(&validators)), move |inst, field, value| {
        validators
            .iter()
            .try_for_each(|v| v.call(inst, field, value))
    })
}

/// At least one of `validators` must pass.
#[must_use]
pub fn or_(validators: impl IntoIterator<Item = Validator>) -> Validator {
    let validators: Vec<Validator> = validators.into_iter().collect();
    let listed = names(&validators);

    Validator::new(format!("or_ {listed}"), move |inst, field, value| {
        if validators.iter().any(|v| v.call(inst, field, value).is_ok()) {
            return Ok(());
        }

        Err(Error::value_error(format!(
            "None of {listed} satisfied for value {}",
            value.repr()
        )))
    })
}

/// Invert `validator`: its value and type errors mean success, and success
/// is a value error. Other errors pass through.
#[must_use]
pub fn not_(validator: Validator) -> Validator {
    let msg = format!(
        "not_ validator child '<{} validator>' did not raise a captured error",
        validator.name()
    );

    not_with(validator, msg)
}

/// `not_` with a custom failure message.
#[must_use]
pub fn not_with(validator: Validator, msg: impl Into<String>) -> Validator {
    let msg = msg.into();

    Validator::new(format!("not_ {}", validator.name()), move |inst, field, value| {
        match validator.call(inst, field, value) {
            Ok(()) => Err(Error::value_error(msg.clone())),
            Err(Error::Value(_) | Error::Type(_)) => Ok(()),
            Err(other) => Err(other),
        }
    })
}
