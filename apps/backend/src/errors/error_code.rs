//! Error codes for the Alliance game API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in responses.

use core::fmt;

use serde::Serialize;

/// Centralized error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "&'static str")]
pub enum ErrorCode {
    // Request Validation
    /// Player name is empty, too long or contains control characters
    InvalidPlayerName,
    /// A player tried to support themselves
    SelfSupport,

    // Resource Not Found
    /// Private id does not belong to any player
    InvalidId,
    /// No player with the given name
    UnknownPlayer,
    /// General not found error
    NotFound,

    // Conflicts
    /// Player name already registered
    DuplicateName,
    /// Write arrived outside the Active phase
    RoundNotActive,

    // System Errors
    /// Frozen round data failed scoring preconditions
    DataCorruption,
    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidPlayerName => "INVALID_PLAYER_NAME",
            Self::SelfSupport => "SELF_SUPPORT",

            Self::InvalidId => "INVALID_ID",
            Self::UnknownPlayer => "UNKNOWN_PLAYER",
            Self::NotFound => "NOT_FOUND",

            Self::DuplicateName => "DUPLICATE_NAME",
            Self::RoundNotActive => "ROUND_NOT_ACTIVE",

            Self::DataCorruption => "DATA_CORRUPTION",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl From<ErrorCode> for &'static str {
    fn from(code: ErrorCode) -> Self {
        code.as_str()
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
