//! Ready-made building blocks for field declarations.

pub mod converter;
pub mod setter;
pub mod validator;

use fieldwork_core::Error;
use thiserror::Error as ThisError;

///
/// BaseError
///
/// Raised while building a base validator or converter, before any field
/// uses it.
///

#[derive(Debug, ThisError)]
#[remain::sorted]
pub enum BaseError {
    #[error("'{option}' is not valid for {builder}: {reason}")]
    InvalidArgument {
        builder: &'static str,
        option: String,
        reason: String,
    },

    #[error("invalid regex pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
}

impl From<BaseError> for Error {
    fn from(err: BaseError) -> Self {
        Self::custom(err)
    }
}
