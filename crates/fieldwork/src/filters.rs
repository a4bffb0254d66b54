//! Field filters for `asdict` / `astuple`.

use derive_more::Display;
use fieldwork_core::{
    model::Field,
    value::{Kind, Value},
};
use std::{fmt, sync::Arc};

pub type FilterFn = dyn Fn(&Field, &Value) -> bool + Send + Sync;

///
/// What
///
/// One selector: a value kind or a field name.
///

#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub enum What {
    #[display("kind {_0}")]
    Kind(Kind),

    #[display("field '{_0}'")]
    Name(String),
}

impl What {
    fn hits(&self, field: &Field, value: &Value) -> bool {
        match self {
            Self::Kind(kind) => kind.matches(value),
            Self::Name(name) => field.name() == name,
        }
    }
}

impl From<Kind> for What {
    fn from(kind: Kind) -> Self {
        Self::Kind(kind)
    }
}

impl From<&str> for What {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for What {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

// a descriptor selects by its name
impl From<&Field> for What {
    fn from(field: &Field) -> Self {
        Self::Name(field.name().to_string())
    }
}

///
/// Filter
///
/// Decides, per field and value, whether `asdict` / `astuple` keep it.
///

#[derive(Clone)]
pub struct Filter(Arc<FilterFn>);

impl Filter {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Field, &Value) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    #[must_use]
    pub fn keep(&self, field: &Field, value: &Value) -> bool {
        (self.0)(field, value)
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Filter")
    }
}

/// Keep only what matches one of `what`.
#[must_use]
pub fn include<W: Into<What>>(what: impl IntoIterator<Item = W>) -> Filter {
    let what: Vec<What> = what.into_iter().map(Into::into).collect();

    Filter::new(move |field, value| what.iter().any(|w| w.hits(field, value)))
}

/// Drop whatever matches one of `what`.
#[must_use]
pub fn exclude<W: Into<What>>(what: impl IntoIterator<Item = W>) -> Filter {
    let what: Vec<What> = what.into_iter().map(Into::into).collect();

    Filter::new(move |field, value| !what.iter().any(|w| w.hits(field, value)))
}

///
/// TESTS
///
