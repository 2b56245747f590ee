//! Display formatting for strings, numbers, colors, dates, JSON objects and
//! arrays.
//!
//! Every transformation is a plain function in its topic module. [`Pipe`]
//! wraps the string-input ones in a closed enum so callers that pick a
//! transformation at runtime (templates, the CLI) dispatch on an explicit
//! [`FormatKind`] instead of guessing from the input.

pub mod array;
pub mod color;
pub mod date;
pub mod file;
pub mod html;
pub mod number;
pub mod object;
pub mod pipe;
pub mod string;
pub mod url;

use thiserror::Error;

pub use pipe::{FormatKind, Pipe, PipeArgs};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("'{0}' is not a number")]
    InvalidNumber(String),
    #[error("'{0}' is not a valid date")]
    InvalidDate(String),
    #[error("invalid digits info '{0}', expected '<minInt>.<minFrac>-<maxFrac>'")]
    InvalidDigitsInfo(String),
    #[error("invalid JSON input: {0}")]
    InvalidJson(String),
    #[error("invalid data URL: {0}")]
    InvalidDataUrl(String),
    #[error("unknown time zone '{0}'")]
    UnknownTimeZone(String),
    #[error("unknown date format '{0}'")]
    UnknownDateFormat(String),
    #[error("unknown format kind '{0}'")]
    UnknownKind(String),
    #[error("missing argument '{argument}' for {kind}")]
    MissingArgument { kind: &'static str, argument: &'static str },
}
