use crate::settings::CheckPolicy;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Every way a call into this crate can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// A configuration file or value could not be read.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// The configuration was rejected by its policy and `force_parse` was off.
///
/// Raised before any character is scanned, so there is no index.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("configuration rejected by the '{policy}' policy, set force_parse to parse anyway")]
pub struct ValidationError {
    pub policy: CheckPolicy,
}

/// What went wrong while scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// A character other than the next prefix character was found.
    #[error("expected '{0}'")]
    ExpectedPrefixChar(char),
    #[error("can't have space after prefix")]
    SpaceAfterPrefix,
    #[error("expected option, options can't be empty")]
    EmptyOption,
    #[error("parameter value can't be empty (use \"\" instead)")]
    EmptyParameterValue,
    /// Only a backslash or the active quote may follow a backslash inside quotes.
    #[error("couldn't escape with character '{0}'")]
    InvalidEscape(char),
}

/// A scanning failure at a character index of the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{kind} (at index {index})")]
pub struct ParseError {
    /// Character (not byte) offset into the source.
    pub index: usize,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(index: usize, kind: ParseErrorKind) -> Self {
        Self { index, kind }
    }
}
