use std::ops::Index;

use crate::ctcp;
use crate::prefix::Prefix;

/// The command slot of a message: a numeric reply code or a command word.
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
pub enum Command {
    /// Three-digit numeric reply, e.g. `366`.
    Numeric(u16),
    /// Command word, always lowercase (`privmsg`, `ping`).
    Named(String),
}

impl Command {
    /// Build a command word, lowercasing it.
    pub fn named(name: &str) -> Self {
        Command::Named(name.to_ascii_lowercase())
    }
}

/// An ordered parameter list.
///
/// Indexing past the end yields `""` instead of panicking, so handlers can
/// read `params[1]` without a length check.
#[derive(Clone, PartialEq, Eq, Debug, Default, Hash)]
pub struct Params(Vec<String>);

impl Params {
    /// Create from owned strings.
    pub fn new(items: Vec<String>) -> Self {
        Params(items)
    }

    /// Get a parameter if present.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the parameters.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Join all parameters with a separator.
    pub fn join(&self, sep: &str) -> String {
        self.0.join(sep)
    }

    /// Borrow as a slice.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl Index<usize> for Params {
    type Output = str;

    fn index(&self, index: usize) -> &str {
        self.get(index).unwrap_or("")
    }
}

impl<S: Into<String>> FromIterator<S> for Params {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Params(iter.into_iter().map(Into::into).collect())
    }
}

/// An owned IRC message.
///
/// Equality ignores [`Message::raw`], which only records the line as it
/// arrived for diagnostics.
///
/// # Example
///
/// ```
/// use botko_proto::Message;
///
/// let msg: Message = ":nick!user@host PRIVMSG #chan :hello there".parse().unwrap();
/// assert_eq!(msg.command_name(), "privmsg");
/// assert_eq!(&msg.params[0], "#chan");
/// assert_eq!(&msg.tokens[1], "there");
/// assert_eq!(&msg.params[5], "");
/// ```
#[derive(Clone, Debug)]
pub struct Message {
    /// Message origin, if the line carried one.
    pub prefix: Option<Prefix>,
    /// Numeric code or command word.
    pub command: Command,
    /// Middle parameters.
    pub params: Params,
    /// Trailing parameter with the leading `:` stripped.
    pub trailing: Option<String>,
    /// Trailing parameter split on whitespace.
    pub tokens: Params,
    /// The line as received (without terminator).
    pub raw: String,
}

impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        self.prefix == other.prefix
            && self.command == other.command
            && self.params == other.params
            && self.trailing == other.trailing
    }
}

impl Eq for Message {}

impl Message {
    /// Create a message from a command word and middle parameters.
    pub fn new<I, S>(command: &str, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_parts(None, Command::named(command), params.into_iter().collect(), None)
    }

    /// Create a numeric reply with middle parameters. `code` must not be 0.
    pub fn numeric<I, S>(code: u16, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_parts(None, Command::Numeric(code), params.into_iter().collect(), None)
    }

    /// Create a PRIVMSG message to a target with text
    #[must_use]
    pub fn privmsg(target: &str, text: &str) -> Self {
        Self::new("privmsg", [target]).with_trailing(text)
    }

    /// Create a NOTICE message to a target with text
    #[must_use]
    pub fn notice(target: &str, text: &str) -> Self {
        Self::new("notice", [target]).with_trailing(text)
    }

    /// Set the prefix.
    #[must_use]
    pub fn with_prefix(self, prefix: Prefix) -> Self {
        Self::from_parts(Some(prefix), self.command, self.params, self.trailing)
    }

    /// Set the trailing parameter.
    #[must_use]
    pub fn with_trailing(self, text: impl Into<String>) -> Self {
        Self::from_parts(self.prefix, self.command, self.params, Some(text.into()))
    }

    pub(crate) fn from_parts(
        prefix: Option<Prefix>,
        command: Command,
        params: Params,
        trailing: Option<String>,
    ) -> Self {
        let tokens = trailing
            .as_deref()
            .map(|t| t.split_whitespace().collect())
            .unwrap_or_default();
        let mut msg = Message {
            prefix,
            command,
            params,
            trailing,
            tokens,
            raw: String::new(),
        };
        msg.raw = msg.to_string();
        msg
    }

    /// Numeric reply code, or 0 for command words.
    pub fn code(&self) -> u16 {
        match self.command {
            Command::Numeric(code) => code,
            Command::Named(_) => 0,
        }
    }

    /// Lowercase command word, or "" for numeric replies.
    pub fn command_name(&self) -> &str {
        match &self.command {
            Command::Named(name) => name,
            Command::Numeric(_) => "",
        }
    }

    /// Trailing text, or "" when the line had none.
    pub fn text(&self) -> &str {
        self.trailing.as_deref().unwrap_or("")
    }

    /// Server name from the prefix, or "".
    pub fn server(&self) -> &str {
        self.prefix.as_ref().map(Prefix::server).unwrap_or("")
    }

    /// Sender nickname from the prefix, or "".
    pub fn nick(&self) -> &str {
        self.prefix.as_ref().map(Prefix::nick).unwrap_or("")
    }

    /// Sender username from the prefix, or "".
    pub fn user(&self) -> &str {
        self.prefix.as_ref().map(Prefix::user).unwrap_or("")
    }

    /// Sender hostname from the prefix, or "".
    pub fn host(&self) -> &str {
        self.prefix.as_ref().map(Prefix::host).unwrap_or("")
    }

    /// True when the trailing text is a `\x01`-delimited CTCP request.
    pub fn is_ctcp(&self) -> bool {
        ctcp::is_ctcp(self.text())
    }
}
