//! Validators: checks run on a field's value after conversion.
//!
//! Every constructor returns a core `Validator`; failures are `Error::Value`
//! or `Error::Type` and name the field.

use fieldwork_core::{Error, value::Value};

mod collection;
mod kind;
mod len;
mod logic;
mod num;
mod text;

#[cfg(test)]
mod tests;

pub use collection::{deep_iterable, deep_mapping, in_};
pub use kind::{instance_of, instance_of_any};
pub use len::{max_len, min_len};
pub use logic::{and_, not_, not_with, optional, or_};
pub use num::{ge, gt, le, lt};
pub use text::{MatchMode, matches_re};

// shared wording for validators that need a sized value
pub(crate) fn no_len(field: &str, value: &Value) -> Error {
    Error::type_error(format!(
        "'{field}' has no length (got {} that is a {})",
        value.repr(),
        value.kind_name()
    ))
}
