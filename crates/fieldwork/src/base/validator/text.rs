use crate::base::BaseError;
use derive_more::Display;
use fieldwork_core::{Error, model::Validator};
use regex::Regex;

///
/// MatchMode
///
/// How much of the text a pattern has to cover.
///

#[derive(Clone, Copy, Debug, Default, Display, Eq, PartialEq)]
pub enum MatchMode {
    /// The whole text.
    #[default]
    #[display("fullmatch")]
    Full,

    /// A prefix of the text.
    #[display("match")]
    Prefix,

    /// Anywhere in the text.
    #[display("search")]
    Search,
}

impl MatchMode {
    fn anchor(self, pattern: &str) -> String {
        match self {
            Self::Full => format!(r"\A(?:{pattern})\z"),
            Self::Prefix => format!(r"\A(?:{pattern})"),
            Self::Search => pattern.to_string(),
        }
    }
}

/// Text value must match `pattern` under `mode`.
pub fn matches_re(pattern: &str, mode: MatchMode) -> Result<Validator, BaseError> {
    let regex = Regex::new(&mode.anchor(pattern)).map_err(|source| BaseError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })?;
    let pattern = pattern.to_string();

    Ok(Validator::new(
        format!("matches_re {mode} \"{pattern}\""),
        move |_, field, value| {
            let text = value.as_text().ok_or_else(|| {
                Error::type_error(format!(
                    "'{}' must be text to match regex \"{pattern}\" (got {} that is a {})",
                    field.name(),
                    value.repr(),
                    value.kind()
                ))
            })?;

            if regex.is_match(text) {
                Ok(())
            } else {
                Err(Error::value_error(format!(
                    "'{}' must match regex \"{pattern}\" ({} doesn't)",
                    field.name(),
                    value.repr()
                )))
            }
        },
    ))
}
