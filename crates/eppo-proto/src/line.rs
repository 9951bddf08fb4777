//! Line-based codec for tokio.
//!
//! Reads newline-terminated lines and writes CRLF-terminated ones. A bot must
//! never drop its connection over one bad line, so the decoder is lenient:
//! invalid UTF-8 is decoded lossily and over-long lines are discarded whole.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::error::{self, ProtocolError};

/// Line-based codec that handles newline-terminated messages.
///
/// Decoded lines have their `\r\n` terminator removed.
pub struct LineCodec {
    /// Index of next byte to check for newline
    next_index: usize,
    /// Maximum line length, terminator included
    max_len: usize,
    /// Set while skipping the remainder of an over-long line
    discarding: bool,
}

impl LineCodec {
    /// Create a codec with the default limit of [`crate::MAX_LINE_LEN`].
    pub fn new() -> Self {
        Self::with_max_len(crate::MAX_LINE_LEN)
    }

    /// Create a new codec with custom max line length.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
            discarding: false,
        }
    }

    /// Maximum accepted line length.
    pub fn max_len(&self) -> usize {
        self.max_len
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<String>> {
        loop {
            let Some(offset) = src[self.next_index..].iter().position(|b| *b == b'\n') else {
                if self.discarding || src.len() > self.max_len {
                    // Nothing in the buffer can become a valid line.
                    src.clear();
                    self.next_index = 0;
                    self.discarding = true;
                } else {
                    self.next_index = src.len();
                }
                return Ok(None);
            };

            let line = src.split_to(self.next_index + offset + 1);
            self.next_index = 0;

            if self.discarding {
                self.discarding = false;
                continue;
            }
            if line.len() > self.max_len {
                continue;
            }

            let data = String::from_utf8_lossy(&line);
            return Ok(Some(data.trim_end_matches(['\r', '\n']).to_string()));
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> error::Result<Option<String>> {
        if let Some(line) = self.decode(src)? {
            return Ok(Some(line));
        }
        if src.is_empty() || self.discarding {
            src.clear();
            return Ok(None);
        }
        // Peer closed mid-line; hand out what we have.
        let line = src.split();
        self.next_index = 0;
        Ok(Some(
            String::from_utf8_lossy(&line)
                .trim_end_matches('\r')
                .to_string(),
        ))
    }
}

impl Encoder<String> for LineCodec {
    type Error = ProtocolError;

    fn encode(&mut self, msg: String, dst: &mut BytesMut) -> error::Result<()> {
        if msg.contains(['\r', '\n']) {
            return Err(ProtocolError::EmbeddedNewline(msg));
        }
        dst.reserve(msg.len() + 2);
        dst.extend_from_slice(msg.as_bytes());
        dst.extend_from_slice(b"\r\n");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_complete_line() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from("PING :test\r\n");

        let result = codec.decode(&mut buf).unwrap();
        assert_eq!(result, Some("PING :test".to_string()));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_decode_partial_line() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from("PING :");

        assert_eq!(codec.decode(&mut buf).unwrap(), None);

        buf.extend_from_slice(b"abc\n");
        assert_eq!(codec.decode(&mut buf).unwrap(), Some("PING :abc".to_string()));
    }

    #[test]
    fn test_decode_discards_too_long_line() {
        let mut codec = LineCodec::with_max_len(10);
        let mut buf = BytesMut::from("this is way too long\nPING x\n");

        assert_eq!(codec.decode(&mut buf).unwrap(), Some("PING x".to_string()));
    }

    #[test]
    fn test_decode_discards_too_long_partial_line() {
        let mut codec = LineCodec::with_max_len(10);
        let mut buf = BytesMut::from("0123456789abcdef");

        assert_eq!(codec.decode(&mut buf).unwrap(), None);
        assert!(buf.is_empty());

        buf.extend_from_slice(b"still the same line\nPING y\n");
        assert_eq!(codec.decode(&mut buf).unwrap(), Some("PING y".to_string()));
    }

    #[test]
    fn test_decode_invalid_utf8_is_lossy() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from(&b"PRIVMSG #a :caf\xe9\r\n"[..]);

        let line = codec.decode(&mut buf).unwrap().unwrap();
        assert!(line.starts_with("PRIVMSG #a :caf"));
    }

    #[test]
    fn test_decode_eof_returns_trailing_partial_line() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from("ERROR :Closing link");

        assert_eq!(
            codec.decode_eof(&mut buf).unwrap(),
            Some("ERROR :Closing link".to_string())
        );
        assert_eq!(codec.decode_eof(&mut buf).unwrap(), None);
    }

    #[test]
    fn test_encode() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::new();

        codec.encode("PONG :test".to_string(), &mut buf).unwrap();
        assert_eq!(&buf[..], b"PONG :test\r\n");
    }

    #[test]
    fn test_encode_rejects_embedded_newline() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::new();

        let result = codec.encode("PRIVMSG #a :one\r\nQUIT".to_string(), &mut buf);
        assert!(matches!(result, Err(ProtocolError::EmbeddedNewline(_))));
        assert!(buf.is_empty());
    }
}
