//! Setter hooks for a record's `on_setattr` pipeline.

use fieldwork_core::mutate::{OnSetattr, SetHook};

/// Per-field opt-out: store assigned values as they come.
pub const NO_OP: OnSetattr = OnSetattr::NoOp;

/// Run hooks in order, each receiving the previous one's result.
#[must_use]
pub fn pipe(hooks: impl IntoIterator<Item = SetHook>) -> SetHook {
    SetHook::pipe(hooks.into_iter().collect())
}

/// Reject the assignment.
#[must_use]
pub fn frozen() -> SetHook {
    SetHook::frozen()
}

/// Run the field's validators on the new value.
#[must_use]
pub fn validate() -> SetHook {
    SetHook::validate()
}

/// Run the field's converter on the new value.
#[must_use]
pub fn convert() -> SetHook {
    SetHook::convert()
}

///
/// TESTS
///
