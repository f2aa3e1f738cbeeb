//! Line-based codec for tokio.
//!
//! Reads CRLF (or bare LF) terminated lines and writes lines with a CRLF
//! terminator appended.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::error;

/// Line terminator written after every outbound line.
pub const LINE_TERMINATOR: &str = "\r\n";

/// Default line limit (RFC 2812: 512 bytes including CRLF).
pub const MAX_LINE_LEN: usize = 512;

/// Line-based codec that handles newline-terminated messages.
///
/// Overlong lines are dropped with a warning instead of failing the stream,
/// since a framed stream ends after its first decode error.
pub struct LineCodec {
    /// Index of next byte to check for newline
    next_index: usize,
    /// Maximum line length
    max_len: usize,
    /// Discarding the rest of an overlong line
    discarding: bool,
}

impl LineCodec {
    /// Create a new codec with the standard 512 byte limit.
    pub fn new() -> Self {
        Self::with_max_len(MAX_LINE_LEN)
    }

    /// Create a new codec with custom max line length.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
            discarding: false,
        }
    }

    /// Truncate at the first CR or LF so one call can never emit two lines.
    pub fn sanitize(line: &str) -> &str {
        match line.find(['\r', '\n']) {
            Some(end) => &line[..end],
            None => line,
        }
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = error::ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<String>> {
        loop {
            let Some(offset) = src[self.next_index..].iter().position(|b| *b == b'\n') else {
                // No complete line yet
                if src.len() > self.max_len {
                    if !self.discarding {
                        tracing::warn!(limit = self.max_len, "Discarding overlong inbound line");
                    }
                    src.clear();
                    self.discarding = true;
                }
                self.next_index = src.len();
                return Ok(None);
            };

            let line = src.split_to(self.next_index + offset + 1);
            self.next_index = 0;

            if std::mem::take(&mut self.discarding) {
                continue;
            }
            if line.len() > self.max_len {
                tracing::warn!(
                    actual = line.len(),
                    limit = self.max_len,
                    "Discarding overlong inbound line"
                );
                continue;
            }

            let text = String::from_utf8_lossy(&line);
            let text = text.trim_end_matches(['\r', '\n']);
            return Ok(Some(text.to_owned()));
        }
    }
}

impl Encoder<String> for LineCodec {
    type Error = error::ProtocolError;

    fn encode(&mut self, msg: String, dst: &mut BytesMut) -> error::Result<()> {
        let mut line = Self::sanitize(&msg);
        let limit = self.max_len.saturating_sub(LINE_TERMINATOR.len());
        if line.len() > limit {
            let mut end = limit;
            while !line.is_char_boundary(end) {
                end -= 1;
            }
            tracing::warn!(
                actual = line.len(),
                limit = self.max_len,
                "Truncating overlong outbound line"
            );
            line = &line[..end];
        }
        dst.reserve(line.len() + LINE_TERMINATOR.len());
        dst.extend_from_slice(line.as_bytes());
        dst.extend_from_slice(LINE_TERMINATOR.as_bytes());
        Ok(())
    }
}
