//! Canonical wire serialization for [`Message`] (without the line terminator).

use std::fmt;

use super::types::{Command, Message};

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Numeric(code) => write!(f, "{:03}", code),
            Command::Named(name) => f.write_str(&name.to_ascii_uppercase()),
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(prefix) = &self.prefix {
            write!(f, ":{} ", prefix)?;
        }
        write!(f, "{}", self.command)?;
        for param in self.params.iter() {
            write!(f, " {}", param)?;
        }
        if let Some(trailing) = &self.trailing {
            write!(f, " :{}", trailing)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Message, Prefix};

    #[test]
    fn test_serialize_privmsg() {
        let msg = Message::privmsg("#rust", "Hello, world!");
        assert_eq!(msg.to_string(), "PRIVMSG #rust :Hello, world!");
        assert_eq!(msg.raw, "PRIVMSG #rust :Hello, world!");
        assert_eq!(msg.tokens.len(), 2);
    }

    #[test]
    fn test_serialize_numeric_is_zero_padded() {
        let msg = Message::numeric(5, ["bot", "WHOX"])
            .with_prefix(Prefix::Server("irc.example.net".into()))
            .with_trailing("are supported");
        assert_eq!(
            msg.to_string(),
            ":irc.example.net 005 bot WHOX :are supported"
        );
    }

    #[test]
    fn test_serialize_roundtrip() {
        let msg = Message::new("join", ["#a,#b", "key"]).with_prefix(Prefix::new("n", "u", "h"));
        let parsed: Message = msg.to_string().parse().unwrap();
        assert_eq!(parsed, msg);
    }
}
