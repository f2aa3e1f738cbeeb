//! Message parsing implementation.
//!
//! This module implements `FromStr` for `Message` using the nom-based parser.

use std::str::FromStr;

use crate::error::{MessageParseError, ProtocolError};
use crate::prefix::Prefix;

use super::nom_parser::RawMessage;
use super::types::{Command, Message, Params};

/// Reject NUL, CR and LF anywhere inside the line.
fn check_characters(line: &str) -> Result<(), MessageParseError> {
    match line.bytes().position(|b| matches!(b, b'\0' | b'\r' | b'\n')) {
        Some(position) => Err(MessageParseError::InvalidCharacterAt {
            byte: line.as_bytes()[position],
            position,
        }),
        None => Ok(()),
    }
}

fn parse_command(word: &str) -> Result<Command, MessageParseError> {
    if word.bytes().all(|b| b.is_ascii_digit()) {
        match word.parse::<u16>() {
            Ok(code) if code != 0 => Ok(Command::Numeric(code)),
            _ => Err(MessageParseError::InvalidCommand),
        }
    } else {
        Ok(Command::named(word))
    }
}

impl FromStr for Message {
    type Err = ProtocolError;

    /// Parse one protocol line. A single trailing `\r\n` (or `\n`) is ignored.
    fn from_str(s: &str) -> Result<Message, Self::Err> {
        let line = s
            .strip_suffix('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .unwrap_or(s);

        let fail = |cause| ProtocolError::InvalidMessage {
            string: line.to_owned(),
            cause,
        };

        if line.is_empty() {
            return Err(fail(MessageParseError::EmptyMessage));
        }
        check_characters(line).map_err(fail)?;

        let parsed = RawMessage::parse(line).map_err(|(position, kind)| {
            fail(MessageParseError::ParseContext {
                position,
                context: format!("{:?}", kind),
            })
        })?;

        let prefix = parsed.prefix.map(Prefix::parse).transpose().map_err(fail)?;
        let command = parse_command(parsed.command).map_err(fail)?;
        let trailing = parsed.trailing.map(str::to_owned);
        let tokens = trailing
            .as_deref()
            .map(|t| t.split_whitespace().collect())
            .unwrap_or_default();

        Ok(Message {
            prefix,
            command,
            params: parsed.middle.into_iter().collect::<Params>(),
            trailing,
            tokens,
            raw: line.to_owned(),
        })
    }
}
