//! # botko-proto
//!
//! IRC protocol pieces for the botko bot: line parsing into [`Message`],
//! numeric reply codes, CTCP framing, channel and nickname grammar, and a
//! tokio line codec.
//!
//! ## Parsing IRC Messages
//!
//! ```rust
//! use botko_proto::Message;
//!
//! let message: Message = ":nick!user@host PRIVMSG #channel :Hello!".parse().expect("Valid IRC message");
//! assert_eq!(message.nick(), "nick");
//! assert_eq!(message.text(), "Hello!");
//! ```
//!
//! ## Creating IRC Messages
//!
//! ```rust
//! use botko_proto::Message;
//!
//! let privmsg = Message::privmsg("#rust", "Hello, world!");
//! assert_eq!(privmsg.to_string(), "PRIVMSG #rust :Hello, world!");
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod chan;
pub mod ctcp;
pub mod error;
#[cfg(feature = "tokio")]
pub mod line;
pub mod message;
pub mod nick;
pub mod prefix;
pub mod response;

pub use self::chan::ChannelExt;
pub use self::ctcp::{Ctcp, CtcpKind};
pub use self::error::{MessageParseError, ProtocolError};
#[cfg(feature = "tokio")]
pub use self::line::LineCodec;
pub use self::message::{Command, Message, Params};
pub use self::nick::NickExt;
pub use self::prefix::Prefix;
pub use self::response::Response;
