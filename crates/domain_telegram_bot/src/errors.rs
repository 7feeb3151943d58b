use std::{error::Error as StdError, fmt::Display};

pub type Result<T> = std::result::Result<T, Error>;

/// # Error
///
/// Failures of Telegram Bot API calls fall into four categories:
/// - `Transport` - the request did not complete (connection refused, timeout, ...).
///   The HTTP client error is kept as is.
/// - `Api` - Telegram answered with a non-success status. Produced only by
///   [crate::StrictCheck], carries `description` and `error_code` from the error body.
/// - `Decode` / `MissingField` - a JSON body was required, but it is malformed
///   or lacks the requested field.
/// - `Encode` - request payload could not be serialized.
#[derive(Debug)]
pub enum Error {
    Transport(restix::Error),
    Api {
        description: String,
        error_code: i64,
    },
    Decode(serde_json::Error),
    MissingField(&'static str),
    Encode(serde_json::Error),
}

impl Error {
    /// Alias for [Error::Api], immediately convert description to string.
    pub fn api<D: Display>(description: D, error_code: i64) -> Error {
        Error::Api {
            description: description.to_string(),
            error_code,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Transport(e) => write!(f, "Transport error: {e}"),
            Error::Api {
                description,
                error_code,
            } => write!(f, "Telegram API error {error_code}: {description}"),
            Error::Decode(e) => write!(f, "Decode error: {e}"),
            Error::MissingField(field) => write!(f, "Decode error: missing field `{field}`"),
            Error::Encode(e) => write!(f, "Encode error: {e}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Transport(e) => Some(e),
            Error::Decode(e) | Error::Encode(e) => Some(e),
            Error::Api { .. } | Error::MissingField(_) => None,
        }
    }
}

impl From<restix::Error> for Error {
    fn from(value: restix::Error) -> Self {
        Error::Transport(value)
    }
}
