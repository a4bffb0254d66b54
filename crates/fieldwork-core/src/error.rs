use thiserror::Error as ThisError;

///
/// Error
///
/// Every fallible operation in the crate returns this type. Structural,
/// construction, mutation and lookup failures each get a dedicated nested
/// enum so callers can discriminate without string matching.
///
/// User-supplied callables (converters, validators, factories, hooks) also
/// return `Error`; whatever they produce is forwarded untouched.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Assemble(#[from] AssembleError),

    #[error(transparent)]
    Frozen(#[from] FrozenError),

    #[error(transparent)]
    Init(#[from] InitError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// A value has the right kind but an unacceptable content.
    #[error("{0}")]
    Value(String),

    /// A value (or operand pair) has an unacceptable kind.
    #[error("{0}")]
    Type(String),

    /// Anything else a user callable wants to raise.
    #[error(transparent)]
    Custom(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    pub fn value_error(message: impl Into<String>) -> Self {
        Self::Value(message.into())
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::Type(message.into())
    }

    pub fn custom(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Custom(Box::new(err))
    }

    #[must_use]
    pub const fn is_value_error(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    #[must_use]
    pub const fn is_type_error(&self) -> bool {
        matches!(self, Self::Type(_))
    }

    #[must_use]
    pub const fn is_frozen(&self) -> bool {
        matches!(self, Self::Frozen(_))
    }

    #[must_use]
    pub const fn is_structural(&self) -> bool {
        matches!(self, Self::Assemble(_))
    }
}

///
/// AssembleError
///
/// Structural problems found while assembling a record type. Raised before
/// any instance of the type can exist.
///

#[derive(Debug, ThisError)]
#[remain::sorted]
pub enum AssembleError {
    #[error("record '{record}' declares field '{field}' more than once")]
    DuplicateField { record: String, field: String },

    #[error("record '{record}' has more than one init parameter named '{alias}'")]
    DuplicateParameter { record: String, alias: String },

    #[error("record '{record}': {message}")]
    FrozenConflict { record: String, message: String },

    #[error("eq must be defined in order to complete ordering from lt, le, gt, ge")]
    IncompleteOrdering,

    #[error("cannot create a consistent method resolution order for record '{record}'")]
    InconsistentMro { record: String },

    #[error("record '{record}': invalid name '{name}'")]
    InvalidName { record: String, name: String },

    #[error("record '{record}': {message}")]
    InvalidOption { record: String, message: String },

    #[error("record '{record}': mandatory field '{field}' follows '{after}', which has a default")]
    MandatoryAfterDefault {
        record: String,
        field: String,
        after: String,
    },

    #[error("record '{record}' requires annotations but these fields have none: {fields:?}")]
    Unannotated { record: String, fields: Vec<String> },
}

impl AssembleError {
    pub(crate) fn invalid_option(record: &str, message: impl Into<String>) -> Self {
        Self::InvalidOption {
            record: record.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn frozen_conflict(record: &str, message: impl Into<String>) -> Self {
        Self::FrozenConflict {
            record: record.to_string(),
            message: message.into(),
        }
    }
}

///
/// InitError
///
/// Argument binding failures raised by a synthesized constructor.
///

#[derive(Debug, ThisError)]
#[remain::sorted]
pub enum InitError {
    #[error("{record}() got multiple values for argument '{parameter}'")]
    DuplicateArgument { record: String, parameter: String },

    #[error("{record}() missing required argument: '{parameter}'")]
    MissingArgument { record: String, parameter: String },

    #[error("{record}() takes {expected} positional arguments but {given} were given")]
    TooManyPositional {
        record: String,
        expected: usize,
        given: usize,
    },

    #[error("{record}() got an unexpected keyword argument '{keyword}'")]
    UnexpectedKeyword { record: String, keyword: String },
}

impl InitError {
    /// Parameter or keyword the error is about, when there is one.
    #[must_use]
    pub fn parameter(&self) -> Option<&str> {
        match self {
            Self::DuplicateArgument { parameter, .. } | Self::MissingArgument { parameter, .. } => {
                Some(parameter)
            }
            Self::UnexpectedKeyword { keyword, .. } => Some(keyword),
            Self::TooManyPositional { .. } => None,
        }
    }
}

///
/// FrozenError
///
/// Assignment to an immutable instance or attribute.
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum FrozenError {
    #[error("cannot assign to field '{attribute}' of frozen record '{record}'")]
    Instance { record: String, attribute: String },

    #[error("cannot assign to frozen field '{attribute}'")]
    Attribute { attribute: String },
}

impl FrozenError {
    #[must_use]
    pub fn attribute(&self) -> &str {
        match self {
            Self::Instance { attribute, .. } | Self::Attribute { attribute } => attribute,
        }
    }
}

///
/// LookupError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
#[remain::sorted]
pub enum LookupError {
    #[error("'{record}' object has no attribute '{attribute}'")]
    NoAttribute { record: String, attribute: String },

    #[error("'{field}' is not a field of record '{record}'")]
    NoField { record: String, field: String },

    #[error("expected a record instance, got a value of kind '{kind}'")]
    NotARecord { kind: String },

    #[error("field '{field}' of '{record}' has not been set")]
    Unset { record: String, field: String },
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_errors_render_transparently() {
        let err: Error = InitError::MissingArgument {
            record: "Point".into(),
            parameter: "x".into(),
        }
        .into();

        assert_eq!(err.to_string(), "Point() missing required argument: 'x'");
        assert!(!err.is_structural());
    }

    #[test]
    fn frozen_error_carries_attribute() {
        let err = FrozenError::Instance {
            record: "P".into(),
            attribute: "x".into(),
        };

        assert_eq!(err.attribute(), "x");
        assert!(Error::from(err).is_frozen());
    }
}
