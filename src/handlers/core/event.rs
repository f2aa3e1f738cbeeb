//! Event names and handler-name validation.
//!
//! Handler names follow one closed shape: `on_<word>` for named events,
//! `on_<digits>` for numeric replies and `on_every_<N><unit>` for periodic
//! handlers with unit one of `s`, `m`, `h` or `d`.

use crate::error::DispatchError;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use std::time::Duration;

static HANDLER_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^on_(every_[0-9]+[smhd]|[a-z]+|[0-9]+)$").expect("static regex")
});

/// Key of the dispatch table.
///
/// Numeric events are keyed by value, so `on_005` and `on_5` are the same.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventName {
    Named(String),
    Numeric(u16),
}

impl EventName {
    /// Event name as triggered: `"privmsg"`, `"366"`, `"load"`.
    ///
    /// All-digit names become numeric; anything else is kept as given.
    pub fn new(event: &str) -> Self {
        if !event.is_empty() && event.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(code) = event.parse() {
                return Self::Numeric(code);
            }
        }
        Self::Named(event.to_owned())
    }
}

impl From<&str> for EventName {
    fn from(event: &str) -> Self {
        Self::new(event)
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::Numeric(code) => write!(f, "{code}"),
        }
    }
}

/// What a validated handler name binds to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HandlerEvent {
    /// Plain dispatch table entry.
    Event(EventName),
    /// Periodic task with the given interval.
    Every(Duration),
}

impl HandlerEvent {
    /// Validate a handler name such as `on_privmsg`, `on_366` or
    /// `on_every_30m`.
    pub fn parse(handler_name: &str) -> Result<Self, DispatchError> {
        let invalid = || DispatchError::InvalidEventName(handler_name.to_owned());
        if !HANDLER_NAME.is_match(handler_name) {
            return Err(invalid());
        }
        let event = &handler_name["on_".len()..];

        let Some(every) = event.strip_prefix("every_") else {
            if event.bytes().all(|b| b.is_ascii_digit()) {
                let code = event.parse().map_err(|_| invalid())?;
                return Ok(Self::Event(EventName::Numeric(code)));
            }
            return Ok(Self::Event(EventName::Named(event.to_owned())));
        };

        let (count, unit) = every.split_at(every.len() - 1);
        let scale = match unit {
            "m" => 60,
            "h" => 60 * 60,
            "d" => 60 * 60 * 24,
            _ => 1,
        };
        let count: u64 = count.parse().map_err(|_| invalid())?;
        if count == 0 {
            return Err(DispatchError::ZeroInterval(handler_name.to_owned()));
        }
        let secs = count.checked_mul(scale).ok_or_else(invalid)?;
        Ok(Self::Every(Duration::from_secs(secs)))
    }
}
