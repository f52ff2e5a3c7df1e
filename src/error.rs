use std::fmt;
use std::io;

use crate::kind::Kind;
use crate::location::FileLineCol;

/// A structured error code identifying why an operation was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorCode {
    /// Malformed GDVN text.
    Syntax,
    /// Duplicate key in a map or ordered map.
    DuplicateMapKey,
    /// Nesting depth limit exceeded while parsing.
    DepthLimitExceeded,

    /// Malformed integer digit string.
    InvalidDigits,

    /// A value did not have the kind an accessor required.
    WrongKind,
    /// A sequence or tuple index was past the end.
    IndexOutOfRange,
    /// A map lookup failed.
    KeyNotFound,

    /// Underlying I/O failure.
    Io,
    /// A value could not be converted to or from a host type.
    Conversion,
    /// Invalid configured limits or options.
    InvalidOptions,
    /// A value failed its internal consistency check.
    Invariant,
}

/// Structured extra data attached to some errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum ErrorDetail {
    /// No extra data.
    #[default]
    None,
    /// An accessor expected `expected` but the value was `actual`.
    WrongKind {
        /// The kind the operation required.
        expected: Kind,
        /// The kind the value had.
        actual: Kind,
    },
    /// The `io::ErrorKind` of an I/O failure.
    Io(io::ErrorKind),
}

/// The error type for every fallible operation in this crate.
///
/// Syntax errors always carry a location. Other errors carry one when it is
/// meaningful, e.g. duplicate keys reported by the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GdvError {
    /// The error code.
    pub code: ErrorCode,
    /// Where in the input the problem was detected, if anywhere.
    pub location: Option<FileLineCol>,
    /// Human-readable description. Empty means "use the code's default text".
    pub message: String,
    /// Structured details, when the code has any.
    pub detail: ErrorDetail,
}

impl GdvError {
    /// Construct an error with a code and message and no location.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            location: None,
            message: message.into(),
            detail: ErrorDetail::None,
        }
    }

    /// Construct an error at `location`.
    #[must_use]
    pub fn at(code: ErrorCode, location: FileLineCol, message: impl Into<String>) -> Self {
        Self {
            code,
            location: Some(location),
            message: message.into(),
            detail: ErrorDetail::None,
        }
    }

    /// Construct a syntax error at `location`.
    #[must_use]
    pub fn syntax(location: FileLineCol, message: impl Into<String>) -> Self {
        Self::at(ErrorCode::Syntax, location, message)
    }

    /// Construct a kind-mismatch error.
    #[must_use]
    pub fn wrong_kind(expected: Kind, actual: Kind) -> Self {
        Self {
            code: ErrorCode::WrongKind,
            location: None,
            message: format!(
                "expected {}, not {}",
                expected.common_name(),
                actual.common_name()
            ),
            detail: ErrorDetail::WrongKind { expected, actual },
        }
    }

    /// Construct a conversion error.
    #[must_use]
    pub fn conversion(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conversion, message)
    }

    /// Replace the message, keeping everything else.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Returns true iff this error came from malformed input text.
    #[inline]
    #[must_use]
    pub const fn is_syntax(&self) -> bool {
        matches!(
            self.code,
            ErrorCode::Syntax | ErrorCode::DuplicateMapKey | ErrorCode::DepthLimitExceeded
        )
    }

    /// The message without the location prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        if self.message.is_empty() {
            self.code.default_message()
        } else {
            &self.message
        }
    }
}

impl ErrorCode {
    const fn default_message(self) -> &'static str {
        match self {
            Self::Syntax => "syntax error",
            Self::DuplicateMapKey => "duplicate map key",
            Self::DepthLimitExceeded => "nesting depth limit exceeded",

            Self::InvalidDigits => "invalid integer digits",

            Self::WrongKind => "value has the wrong kind",
            Self::IndexOutOfRange => "index out of range",
            Self::KeyNotFound => "key not found",

            Self::Io => "I/O error",
            Self::Conversion => "conversion failed",
            Self::InvalidOptions => "invalid options",
            Self::Invariant => "value invariant violated",
        }
    }
}

impl fmt::Display for GdvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = self.message();
        match &self.location {
            Some(loc) => write!(f, "{loc}: {msg}"),
            None => f.write_str(msg),
        }
    }
}

impl std::error::Error for GdvError {}

impl From<io::Error> for GdvError {
    fn from(err: io::Error) -> Self {
        Self {
            code: ErrorCode::Io,
            location: None,
            message: err.to_string(),
            detail: ErrorDetail::Io(err.kind()),
        }
    }
}
