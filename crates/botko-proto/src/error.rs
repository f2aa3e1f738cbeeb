//! Errors raised while parsing lines and moving them over the wire.

use thiserror::Error;

/// `Result` defaulting to [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Failure of the codec or the line parser.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// Transport failure under the codec.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A line outside the message grammar.
    #[error("invalid message: {string}")]
    InvalidMessage {
        /// The rejected line.
        string: String,
        /// What the parser tripped over.
        #[source]
        cause: MessageParseError,
    },
}

/// Why a line was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum MessageParseError {
    /// Message was empty.
    #[error("empty message")]
    EmptyMessage,

    /// Command was neither a 3-digit numeric nor a word of letters.
    #[error("invalid command")]
    InvalidCommand,

    /// Prefix matched neither the server nor the user form.
    #[error("invalid prefix: {0}")]
    InvalidPrefix(String),

    /// NUL, CR or LF inside the line.
    #[error("invalid character {byte:#04x} at position {position}")]
    InvalidCharacterAt {
        /// Offending byte.
        byte: u8,
        /// Byte offset into the line.
        position: usize,
    },

    /// The grammar stopped matching at `position`.
    #[error("parsing failed at position {position}: {context}")]
    ParseContext {
        /// Byte offset into the line.
        position: usize,
        /// Grammar element being matched.
        context: String,
    },
}
