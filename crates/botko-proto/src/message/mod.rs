//! IRC message types, parsing and serialization.
//!
//! - [`Message`]: an owned, parsed protocol line
//! - [`Command`]: numeric reply code or lowercase command word
//! - [`Params`]: parameter list whose out-of-range index is `""`

mod nom_parser;
mod parse;
mod serialize;
mod types;

pub use self::types::{Command, Message, Params};
