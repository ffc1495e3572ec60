//! Rune-safe buffering over a blocking byte source

mod ansi;

pub use ansi::AnsiFilter;

use crate::result::ExpectError;
use bytes::{Buf, BytesMut};
use std::io::{self, Read};
use tracing::{trace, warn};

/// Maximum encoded length of one UTF-8 code point.
pub const MAX_RUNE_LEN: usize = 4;

/// Outcome of decoding the front of the staging buffer.
#[derive(Debug, PartialEq, Eq)]
enum Decoded {
    Complete(char),
    Incomplete,
    Invalid(usize),
}

/// Decode the first code point of `bytes`, if there is a whole one.
fn decode_front(bytes: &[u8]) -> Decoded {
    let window = &bytes[..bytes.len().min(MAX_RUNE_LEN)];
    let text = match std::str::from_utf8(window) {
        Ok(text) => text,
        // A later code point is cut off but the first one is whole
        Err(e) if e.valid_up_to() > 0 => std::str::from_utf8(&window[..e.valid_up_to()]).unwrap_or(""),
        Err(e) => {
            return match e.error_len() {
                Some(len) => Decoded::Invalid(len),
                None => Decoded::Incomplete,
            }
        }
    };

    match text.chars().next() {
        Some(ch) => Decoded::Complete(ch),
        None => Decoded::Incomplete,
    }
}

/// Terminal condition reported by the source, replayed on every later read.
#[derive(Debug)]
enum Terminal {
    Eof,
    Fault(io::ErrorKind, String),
}

impl Terminal {
    fn to_error(&self) -> ExpectError {
        match self {
            Terminal::Eof => ExpectError::Eof {
                output: String::new(),
            },
            Terminal::Fault(kind, message) => {
                ExpectError::IoError(io::Error::new(*kind, message.clone()))
            }
        }
    }
}

/// Wraps a byte source and hands out whole code points.
///
/// Bytes are pulled from the source one at a time, so nothing beyond the code
/// point being decoded is ever taken from it. Bytes pulled but not yet returned
/// stay in a staging area and are logically still part of the stream.
pub struct RuneBuffer {
    source: Box<dyn Read + Send>,
    staging: BytesMut,
    terminal: Option<Terminal>,
}

impl RuneBuffer {
    /// Create a new buffer over `source`
    pub fn new(source: Box<dyn Read + Send>) -> Self {
        Self {
            source,
            staging: BytesMut::with_capacity(MAX_RUNE_LEN),
            terminal: None,
        }
    }

    /// Read one code point, returning it with its encoded length.
    ///
    /// On end of stream or an I/O fault, bytes of an incomplete code point stay
    /// staged. Bytes that can never form a code point are dropped and reported
    /// as [`ExpectError::InvalidUtf8`].
    pub fn read_rune(&mut self) -> Result<(char, usize), ExpectError> {
        loop {
            match decode_front(&self.staging) {
                Decoded::Complete(ch) => {
                    let len = ch.len_utf8();
                    self.staging.advance(len);
                    return Ok((ch, len));
                }
                Decoded::Invalid(len) => {
                    let bytes = self.staging.split_to(len).to_vec();
                    warn!(?bytes, "dropping malformed UTF-8 from stream");
                    return Err(ExpectError::InvalidUtf8 { bytes });
                }
                Decoded::Incomplete => self.fill_byte()?,
            }
        }
    }

    /// Read up to the next `\n`, which is consumed but not returned.
    ///
    /// A carriage return before the line feed is kept. A final line without a
    /// terminator is returned as is; once nothing is left the stream's terminal
    /// error is returned.
    pub fn read_line(&mut self) -> Result<String, ExpectError> {
        let mut line = Vec::new();

        loop {
            if self.staging.is_empty() {
                match self.fill_byte() {
                    Ok(()) => {}
                    Err(ExpectError::Eof { .. }) if !line.is_empty() => break,
                    Err(e) => {
                        self.unread(&line);
                        return Err(e);
                    }
                }
            }

            let byte = self.staging.get_u8();
            if byte == b'\n' {
                break;
            }
            line.push(byte);
        }

        Ok(String::from_utf8_lossy(&line).into_owned())
    }

    /// Push bytes back in front of the staged data.
    ///
    /// They are returned by the next reads before anything new is pulled from
    /// the source.
    pub fn unread(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }

        let mut staging = BytesMut::with_capacity(bytes.len() + self.staging.len());
        staging.extend_from_slice(bytes);
        staging.extend_from_slice(&self.staging);
        self.staging = staging;
    }

    /// Bytes pulled from the source but not yet returned
    pub fn staged(&self) -> &[u8] {
        &self.staging
    }

    /// Whether the source has reported end of stream or a fault
    pub fn is_terminated(&self) -> bool {
        self.terminal.is_some()
    }

    /// Pull exactly one byte from the source into staging.
    fn fill_byte(&mut self) -> Result<(), ExpectError> {
        if let Some(terminal) = &self.terminal {
            return Err(terminal.to_error());
        }

        let mut byte = [0u8; 1];
        loop {
            match self.source.read(&mut byte) {
                Ok(0) => {
                    trace!(staged = self.staging.len(), "source reached EOF");
                    self.terminal = Some(Terminal::Eof);
                    return Err(ExpectError::Eof {
                        output: String::new(),
                    });
                }
                Ok(_) => {
                    self.staging.extend_from_slice(&byte);
                    return Ok(());
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    warn!(error = %e, "source read failed");
                    self.terminal = Some(Terminal::Fault(e.kind(), e.to_string()));
                    return Err(ExpectError::IoError(e));
                }
            }
        }
    }
}
