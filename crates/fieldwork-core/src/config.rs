//! Process-wide validator switch.
//!
//! A single relaxed atomic flag, on at start-up. Toggling it while another
//! thread constructs or mutates instances is unsynchronized: callers that
//! need a consistent view must serialize those operations themselves.

use std::sync::atomic::{AtomicBool, Ordering};

static RUN_VALIDATORS: AtomicBool = AtomicBool::new(true);

/// Globally enable or disable validators.
pub fn set_run_validators(run: bool) {
    log::debug!("validators {}", if run { "enabled" } else { "disabled" });
    RUN_VALIDATORS.store(run, Ordering::Relaxed);
}

#[must_use]
pub fn run_validators() -> bool {
    RUN_VALIDATORS.load(Ordering::Relaxed)
}

/// Inverse spelling of `set_run_validators`.
pub fn set_disabled(disabled: bool) {
    set_run_validators(!disabled);
}

#[must_use]
pub fn get_disabled() -> bool {
    !run_validators()
}

///
/// DisabledGuard
///
/// Validators stay off while the guard lives; dropping it restores whatever
/// setting was in place when it was taken.
///

#[must_use = "validators are re-enabled as soon as the guard is dropped"]
pub struct DisabledGuard {
    previous: bool,
}

impl Drop for DisabledGuard {
    fn drop(&mut self) {
        set_run_validators(self.previous);
    }
}

/// Disable validators until the returned guard is dropped.
pub fn disabled() -> DisabledGuard {
    let previous = run_validators();
    set_run_validators(false);

    DisabledGuard { previous }
}

/// Run `f` with validators disabled.
pub fn with_validators_disabled<R>(f: impl FnOnce() -> R) -> R {
    let _guard = disabled();

    f()
}
