//! IRC message prefix types.
//!
//! An IRC message prefix identifies the origin of a message. It can be either
//! a server name or a user's `nick[[!user]@host]` mask.
//!
//! # Reference
//! - RFC 2812 Section 2.3.1: Message format

use std::fmt;
use std::str::FromStr;

use crate::error::MessageParseError;

/// IRC message prefix - identifies the origin of a message.
///
/// Components that are absent are stored as empty strings, so accessors
/// never need an `Option` dance at call sites.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub enum Prefix {
    /// Server name (e.g., "irc.example.com")
    Server(String),
    /// User prefix. `user` and `host` may be empty.
    User {
        /// Nickname.
        nick: String,
        /// Username (ident), empty when absent.
        user: String,
        /// Hostname, empty when absent.
        host: String,
    },
}

#[inline]
fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_server_name(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| is_word(c) || c == '.' || c == '-')
}

fn is_loose_nick(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| is_word(c) || matches!(c, '-' | '[' | ']' | '^' | '`' | '{' | '|' | '}' | '\\'))
}

fn is_user_name(s: &str) -> bool {
    !s.is_empty() && !s.contains([' ', '@', '\0', '\r', '\n'])
}

fn is_host_name(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| is_word(c) || matches!(c, '.' | ':' | '-'))
}

impl Prefix {
    /// Create a new user prefix from nick, user, and host components.
    ///
    /// # Example
    ///
    /// ```
    /// use botko_proto::Prefix;
    ///
    /// let prefix = Prefix::new("nick", "user", "host.example.com");
    /// assert_eq!(prefix.nick(), "nick");
    /// assert_eq!(prefix.host(), "host.example.com");
    /// assert_eq!(prefix.server(), "");
    /// ```
    pub fn new(nick: impl Into<String>, user: impl Into<String>, host: impl Into<String>) -> Self {
        Prefix::User {
            nick: nick.into(),
            user: user.into(),
            host: host.into(),
        }
    }

    /// Parse a prefix token (without the leading `:`).
    ///
    /// A token carrying `!` or `@` is a user mask and must have a host.
    /// Otherwise a dotted token is a server name and anything else a bare nick.
    pub fn parse(s: &str) -> Result<Self, MessageParseError> {
        let invalid = || MessageParseError::InvalidPrefix(s.to_owned());

        match s.split_once('@') {
            Some((left, host)) => {
                if !is_host_name(host) {
                    return Err(invalid());
                }
                let (nick, user) = match left.split_once('!') {
                    Some((nick, user)) if is_user_name(user) => (nick, user),
                    Some(_) => return Err(invalid()),
                    None => (left, ""),
                };
                if !is_loose_nick(nick) {
                    return Err(invalid());
                }
                Ok(Prefix::new(nick, user, host))
            }
            None if s.contains('!') => Err(invalid()),
            None if s.contains('.') => {
                if is_server_name(s) {
                    Ok(Prefix::Server(s.to_owned()))
                } else {
                    Err(invalid())
                }
            }
            None if is_loose_nick(s) => Ok(Prefix::new(s, "", "")),
            None => Err(invalid()),
        }
    }

    /// Server name, or "" for user prefixes.
    pub fn server(&self) -> &str {
        match self {
            Prefix::Server(name) => name,
            Prefix::User { .. } => "",
        }
    }

    /// Nickname, or "" for server prefixes.
    pub fn nick(&self) -> &str {
        match self {
            Prefix::User { nick, .. } => nick,
            Prefix::Server(_) => "",
        }
    }

    /// Username, or "" when absent.
    pub fn user(&self) -> &str {
        match self {
            Prefix::User { user, .. } => user,
            Prefix::Server(_) => "",
        }
    }

    /// Hostname, or "" when absent.
    pub fn host(&self) -> &str {
        match self {
            Prefix::User { host, .. } => host,
            Prefix::Server(_) => "",
        }
    }
}

impl FromStr for Prefix {
    type Err = MessageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Prefix::parse(s)
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prefix::Server(name) => f.write_str(name),
            Prefix::User { nick, user, host } => {
                f.write_str(nick)?;
                if !host.is_empty() {
                    if !user.is_empty() {
                        write!(f, "!{}", user)?;
                    }
                    write!(f, "@{}", host)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_user_mask() {
        let p = Prefix::parse("nick!~user@isp.example.com").unwrap();
        assert_eq!(p, Prefix::new("nick", "~user", "isp.example.com"));
        assert_eq!(p.server(), "");
    }

    #[test]
    fn test_nick_at_host() {
        let p = Prefix::parse("nick@host").unwrap();
        assert_eq!(p.nick(), "nick");
        assert_eq!(p.user(), "");
        assert_eq!(p.host(), "host");
    }

    #[test]
    fn test_server_and_bare_nick() {
        assert_eq!(
            Prefix::parse("pool.freenode.net").unwrap(),
            Prefix::Server("pool.freenode.net".into())
        );
        assert_eq!(Prefix::parse("[bot]").unwrap(), Prefix::new("[bot]", "", ""));
    }

    #[test]
    fn test_ipv6_host() {
        let p = Prefix::parse("n!u@2001:db8::1").unwrap();
        assert_eq!(p.host(), "2001:db8::1");
    }

    #[test]
    fn test_invalid_prefixes() {
        assert!(Prefix::parse("").is_err());
        assert!(Prefix::parse("nick!user").is_err()); // user without host
        assert!(Prefix::parse("nick!@host").is_err());
        assert!(Prefix::parse("ni ck").is_err());
        assert!(Prefix::parse("a/b.example").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Prefix::new("n", "u", "h").to_string(), "n!u@h");
        assert_eq!(Prefix::new("n", "", "h").to_string(), "n@h");
        assert_eq!(Prefix::new("n", "", "").to_string(), "n");
        assert_eq!(Prefix::Server("irc.x.org".into()).to_string(), "irc.x.org");
    }
}
