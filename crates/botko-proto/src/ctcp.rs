//! CTCP framing.
//!
//! A CTCP request is PRIVMSG or NOTICE text wrapped in `\x01`: the verb, then
//! an optional argument after one space. See
//! <https://modern.ircdocs.horse/ctcp.html>.
//!
//! # Example
//!
//! ```
//! use botko_proto::ctcp::{Ctcp, CtcpKind};
//!
//! let ctcp = Ctcp::parse("\x01ACTION waves hello\x01").unwrap();
//! assert_eq!(ctcp.kind, CtcpKind::Action);
//! assert_eq!(ctcp.params, Some("waves hello"));
//!
//! assert_eq!(Ctcp::action("dances").to_string(), "\x01ACTION dances\x01");
//! ```

use std::fmt;

/// Frames a CTCP body.
pub const CTCP_DELIM: char = '\x01';

/// True when `text` both starts and ends with the CTCP delimiter.
pub fn is_ctcp(text: &str) -> bool {
    text.starts_with(CTCP_DELIM) && text.ends_with(CTCP_DELIM)
}

/// CTCP verbs the bot knows about.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum CtcpKind {
    /// `/me` actions.
    Action,
    /// Client version query.
    Version,
    /// Latency check, echoed back.
    Ping,
    /// Local time query.
    Time,
    /// Where to get the client.
    Source,
    /// Anything else, name kept as sent.
    Unknown(String),
}

impl CtcpKind {
    /// Case-insensitive verb lookup.
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "ACTION" => Self::Action,
            "VERSION" => Self::Version,
            "PING" => Self::Ping,
            "TIME" => Self::Time,
            "SOURCE" => Self::Source,
            _ => Self::Unknown(name.to_owned()),
        }
    }

    /// Verb as written on the wire.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Action => "ACTION",
            Self::Version => "VERSION",
            Self::Ping => "PING",
            Self::Time => "TIME",
            Self::Source => "SOURCE",
            Self::Unknown(s) => s,
        }
    }
}

impl fmt::Display for CtcpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A CTCP request borrowed from message text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ctcp<'a> {
    /// Verb.
    pub kind: CtcpKind,
    /// Everything after the verb, `None` when nothing follows.
    pub params: Option<&'a str>,
}

impl<'a> Ctcp<'a> {
    /// `None` unless `text` opens with the delimiter and carries a verb.
    /// The closing delimiter is optional.
    pub fn parse(text: &'a str) -> Option<Self> {
        let text = text.strip_prefix(CTCP_DELIM)?;
        let text = text.strip_suffix(CTCP_DELIM).unwrap_or(text);

        if text.is_empty() {
            return None;
        }

        let (command, params) = match text.split_once(' ') {
            Some((command, "")) => (command, None),
            Some((command, params)) => (command, Some(params)),
            None => (text, None),
        };

        Some(Self {
            kind: CtcpKind::parse(command),
            params,
        })
    }

    /// Create an ACTION.
    pub fn action(text: &'a str) -> Self {
        Self {
            kind: CtcpKind::Action,
            params: Some(text),
        }
    }

    /// Create a request (or reply) of the given kind.
    pub fn new(kind: CtcpKind, params: Option<&'a str>) -> Self {
        Self { kind, params }
    }
}

impl fmt::Display for Ctcp<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.params {
            Some(params) => write!(f, "{}{} {}{}", CTCP_DELIM, self.kind, params, CTCP_DELIM),
            None => write!(f, "{}{}{}", CTCP_DELIM, self.kind, CTCP_DELIM),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_version() {
        assert_eq!(
            Ctcp::parse("\x01VERSION\x01"),
            Some(Ctcp::new(CtcpKind::Version, None))
        );
        assert_eq!(
            Ctcp::parse("\x01PING 1700000000"),
            Some(Ctcp::new(CtcpKind::Ping, Some("1700000000")))
        );
    }

    #[test]
    fn test_parse_lowercase_kind() {
        let ctcp = Ctcp::parse("\x01source\x01").unwrap();
        assert_eq!(ctcp.kind, CtcpKind::Source);
    }

    #[test]
    fn test_parse_unknown() {
        let ctcp = Ctcp::parse("\x01CLIENTINFO x\x01").unwrap();
        assert_eq!(ctcp.kind, CtcpKind::Unknown("CLIENTINFO".into()));
        assert_eq!(ctcp.params, Some("x"));
    }

    #[test]
    fn test_not_ctcp() {
        assert!(Ctcp::parse("hello").is_none());
        assert_eq!(Ctcp::parse("\x01\x01"), None);
        assert!(!is_ctcp("\x01VERSION"));
        assert!(is_ctcp("\x01VERSION\x01"));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Ctcp::new(CtcpKind::Version, Some("mIRC v6.31")).to_string(),
            "\x01VERSION mIRC v6.31\x01"
        );
        assert_eq!(Ctcp::new(CtcpKind::Version, None).to_string(), "\x01VERSION\x01");
    }
}
