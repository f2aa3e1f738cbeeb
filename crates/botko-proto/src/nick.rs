//! Nickname grammar.
//!
//! RFC 2812 §2.3.1: `nickname = ( letter / special ) *( letter / digit / special / "-" )`.
//! No length cap is applied; servers announce their own via `NICKLEN`.

/// `special` from the RFC grammar.
const SPECIAL: &[u8] = b"[]\\`_^{|}";

fn starts_nick(b: u8) -> bool {
    b.is_ascii_alphabetic() || SPECIAL.contains(&b)
}

fn continues_nick(b: u8) -> bool {
    starts_nick(b) || b.is_ascii_digit() || b == b'-'
}

/// Nickname checks on string slices.
pub trait NickExt {
    /// True for a nickname the RFC grammar accepts.
    ///
    /// ```
    /// use botko_proto::NickExt;
    ///
    /// assert!("B0TK0".is_valid_nick());
    /// assert!("{botko}".is_valid_nick());
    /// assert!(!"0botko".is_valid_nick());
    /// assert!(!"bot ko".is_valid_nick());
    /// ```
    fn is_valid_nick(&self) -> bool;

    /// True when every entry of a comma list such as `"botko,BOTK0"` is a
    /// valid nickname. Empty entries are rejected.
    fn is_valid_nick_list(&self) -> bool;
}

impl NickExt for str {
    fn is_valid_nick(&self) -> bool {
        match self.as_bytes().split_first() {
            Some((&first, rest)) => starts_nick(first) && rest.iter().all(|&b| continues_nick(b)),
            None => false,
        }
    }

    fn is_valid_nick_list(&self) -> bool {
        self.split(',').all(str::is_valid_nick)
    }
}
