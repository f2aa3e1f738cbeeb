//! Code conversion, classification and text traits for [`Response`].

use super::Response;
use std::str::FromStr;

impl Response {
    /// Returns the numeric code as u16
    #[inline]
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Creates a Response from a numeric code
    pub fn from_code(code: u16) -> Option<Response> {
        Response::ALL.iter().copied().find(|r| r.code() == code)
    }

    /// Check if this is an error reply (4xx, 5xx)
    #[inline]
    pub fn is_error(&self) -> bool {
        (400..600).contains(&self.code())
    }

    /// Check if this is a connection registration reply (001-099)
    #[inline]
    pub fn is_registration(&self) -> bool {
        self.code() < 100
    }

    /// Check if this is a command reply (200-399)
    #[inline]
    pub fn is_reply(&self) -> bool {
        (200..400).contains(&self.code())
    }
}

impl FromStr for Response {
    type Err = ParseResponseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code: u16 = s.parse().map_err(|_| ParseResponseError::InvalidFormat)?;
        Response::from_code(code).ok_or(ParseResponseError::UnknownCode(code))
    }
}

impl std::fmt::Display for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:03}", self.code())
    }
}

/// Error when parsing a response code
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ParseResponseError {
    /// The string was not a valid number
    #[error("invalid response code format")]
    InvalidFormat,
    /// The numeric code is not a known response
    #[error("unknown response code: {0}")]
    UnknownCode(u16),
}
