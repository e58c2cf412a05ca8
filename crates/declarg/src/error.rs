use thiserror::Error;

use crate::arity::InsufficientValues;

/// Failures that end a parse.
///
/// Every variant stops the walk where it happened; callbacks that already ran
/// keep their effects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unknown argument: {0}")]
    UnknownArgument(String),

    /// A process argument that is not valid UTF-8, shown lossily.
    #[error("Argument is not valid UTF-8: {0}")]
    InvalidEncoding(String),

    #[error("Argument --{flag} {source}")]
    InsufficientValues {
        flag: String,
        #[source]
        source: InsufficientValues,
    },

    #[error("Required argument --{0} is missing")]
    MissingRequiredArgument(String),

    #[error("Error executing callback for --{flag}: {message}")]
    CallbackFailure { flag: String, message: String },

    #[error("internal error: {0}")]
    Internal(String),
}

impl ParseError {
    /// Long name of the argument the failure is attributed to, if any.
    pub fn flag(&self) -> Option<&str> {
        match self {
            Self::InsufficientValues { flag, .. } | Self::CallbackFailure { flag, .. } => {
                Some(flag)
            }
            Self::MissingRequiredArgument(name) => Some(name),
            Self::UnknownArgument(_) | Self::InvalidEncoding(_) | Self::Internal(_) => None,
        }
    }
}
