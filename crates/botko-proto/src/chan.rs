//! Channel name utilities.
//!
//! # Reference
//! - RFC 2812 Section 1.3: Channel names
//! - RFC 2812 Section 3.2.1: Join message

/// Prefix characters that mark a channel target.
pub const CHANNEL_PREFIXES: [char; 4] = ['#', '&', '+', '!'];

/// Extension trait for channel name checks.
pub trait ChannelExt {
    /// True when this string addresses a channel (starts with `#`, `&`, `+` or `!`).
    fn is_channel_target(&self) -> bool;

    /// Check if this string is a valid IRC channel name.
    ///
    /// Valid channel names:
    /// - Start with '#', '&', '+', or '!'
    /// - Have at least one more character
    /// - Do not contain space, comma, BEL (0x07), CR or NUL
    fn is_channel_name(&self) -> bool;
}

impl ChannelExt for str {
    fn is_channel_target(&self) -> bool {
        self.starts_with(CHANNEL_PREFIXES)
    }

    fn is_channel_name(&self) -> bool {
        let Some(rest) = self.strip_prefix(CHANNEL_PREFIXES) else {
            return false;
        };
        !rest.is_empty() && !rest.contains([' ', ',', '\x07', '\r', '\0'])
    }
}

fn is_channel_key(key: &str) -> bool {
    !key.is_empty()
        && !key
            .chars()
            .any(|c| matches!(c, ' ' | ',' | '\0' | '\x09'..='\x0D'))
}

/// Check the parameter string of a `JOIN` command: one or two
/// comma-separated channels, optionally followed by one or two keys.
///
/// ```
/// use botko_proto::chan::is_valid_join_params;
///
/// assert!(is_valid_join_params("#rust,#tokio key1,key2"));
/// assert!(!is_valid_join_params("rust"));
/// ```
pub fn is_valid_join_params(params: &str) -> bool {
    let (channels, keys) = match params.split_once(' ') {
        Some((channels, keys)) => (channels, keys.trim_start_matches(' ')),
        None => (params, ""),
    };

    let channels: Vec<&str> = channels.split(',').collect();
    if channels.len() > 2 || !channels.iter().all(|c| c.is_channel_name()) {
        return false;
    }

    if keys.is_empty() {
        return true;
    }
    let keys: Vec<&str> = keys.split(',').collect();
    keys.len() <= 2 && keys.iter().all(|k| is_channel_key(k))
}
