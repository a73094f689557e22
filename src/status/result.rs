// ABOUTME: Tri-state health code attached to every probed resource.
// ABOUTME: Error and Missing always carry a non-empty cause.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;

const UNSPECIFIED_CAUSE: &str = "unspecified failure";

/// Human-readable reason attached to an Error or Missing verdict.
///
/// Never empty: a blank message is replaced with a fixed placeholder so that
/// printers and callers can rely on having something to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cause(String);

impl Cause {
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            Self(UNSPECIFIED_CAUSE.to_string())
        } else {
            Self(message)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Cause {
    fn from(value: &str) -> Self {
        Cause::new(value)
    }
}

impl From<String> for Cause {
    fn from(value: String) -> Self {
        Cause::new(value)
    }
}

/// Numeric state codes, stable across output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StatusCode {
    NotChecked = 0,
    Success = 1,
    Error = 2,
    Missing = 3,
}

impl StatusCode {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatusCode::NotChecked => "not_checked",
            StatusCode::Success => "success",
            StatusCode::Error => "error",
            StatusCode::Missing => "missing",
        }
    }
}

/// Outcome of checking one resource.
///
/// `Missing` means the resource is confirmed absent and can be created.
/// `Error` means it exists but is unusable, or the check itself failed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusResult {
    #[default]
    NotChecked,
    Success,
    Error(Cause),
    Missing(Cause),
}

impl StatusResult {
    pub fn error(cause: impl Into<Cause>) -> Self {
        StatusResult::Error(cause.into())
    }

    pub fn missing(cause: impl Into<Cause>) -> Self {
        StatusResult::Missing(cause.into())
    }

    pub fn code(&self) -> StatusCode {
        match self {
            StatusResult::NotChecked => StatusCode::NotChecked,
            StatusResult::Success => StatusCode::Success,
            StatusResult::Error(_) => StatusCode::Error,
            StatusResult::Missing(_) => StatusCode::Missing,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, StatusResult::Success)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, StatusResult::Error(_))
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, StatusResult::Missing(_))
    }

    pub fn is_not_checked(&self) -> bool {
        matches!(self, StatusResult::NotChecked)
    }

    pub fn cause(&self) -> Option<&Cause> {
        match self {
            StatusResult::Error(cause) | StatusResult::Missing(cause) => Some(cause),
            StatusResult::NotChecked | StatusResult::Success => None,
        }
    }
}

impl fmt::Display for StatusResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusResult::NotChecked => f.write_str("not checked"),
            StatusResult::Success => f.write_str("success"),
            StatusResult::Error(cause) => write!(f, "error: {}", cause),
            StatusResult::Missing(cause) => write!(f, "missing: {}", cause),
        }
    }
}

impl Serialize for StatusResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let code = self.code();
        let mut state = serializer.serialize_struct("StatusResult", 3)?;
        state.serialize_field("state", code.as_str())?;
        state.serialize_field("code", &code.as_u8())?;
        state.serialize_field("cause", &self.cause().map(Cause::as_str))?;
        state.end()
    }
}
