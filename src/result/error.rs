//! Error types for expectstream

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during expect operations.
///
/// Every matching call on a [`Session`](crate::Session) returns
/// `Result<T, ExpectError>`. None of these errors are retried automatically;
/// issue another call to keep reading from the current stream position.
///
/// # Examples
///
/// ```no_run
/// use expectstream::{ExpectError, Session};
/// use std::time::Duration;
///
/// # async fn example(mut session: Session) -> Result<(), Box<dyn std::error::Error>> {
/// match session
///     .expect_timeout_regex_find_with_output(r"done", Duration::from_secs(5))
///     .await
/// {
///     Ok(result) => println!("Matched: {}", result.matched),
///     Err(ExpectError::Timeout { duration }) => {
///         eprintln!("Timed out after {:?}", duration);
///     }
///     Err(ExpectError::Eof { output }) => {
///         eprintln!("Stream closed, last output: {}", output);
///     }
///     Err(e) => return Err(e.into()),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Error, Debug)]
pub enum ExpectError {
    /// Timeout waiting for pattern.
    ///
    /// Only returned by timeout-bounded calls. The read that was in flight keeps
    /// running in the background, so the stream position is not guaranteed to be
    /// at any particular boundary afterwards.
    #[error("Timeout waiting for pattern (after {duration:?})")]
    Timeout {
        /// Duration that was waited before timeout
        duration: Duration,
    },

    /// End of stream reached before the pattern matched.
    ///
    /// `output` holds everything the failing call consumed.
    #[error("EOF reached before pattern matched")]
    Eof {
        /// Text read by the call before the stream ended
        output: String,
    },

    /// Accumulation window reached its configured cap without a match.
    #[error("Buffer full ({size} bytes)")]
    FullBuffer {
        /// Size of the window when it became full
        size: usize,
        /// Text read by the call before giving up
        output: String,
    },

    /// Invalid pattern.
    #[error("Invalid pattern: {0}")]
    PatternError(#[from] PatternError),

    /// The stream produced bytes that do not decode to a UTF-8 code point.
    ///
    /// The offending bytes are dropped from the stream; the next call resumes
    /// after them.
    #[error("Invalid UTF-8 sequence {bytes:02x?}")]
    InvalidUtf8 {
        /// The bytes that failed to decode
        bytes: Vec<u8>,
    },

    /// I/O error.
    ///
    /// Returned when reading from the source or writing to the sink fails.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The session was built without a sink.
    #[error("Session has no writer")]
    NoWriter,

    /// A background worker panicked or was cancelled.
    #[error("Background task failed: {0}")]
    TaskFailed(String),
}

impl ExpectError {
    /// Text consumed by the failing call, if the error carries any.
    pub fn output(&self) -> Option<&str> {
        match self {
            ExpectError::Eof { output } | ExpectError::FullBuffer { output, .. } => Some(output),
            _ => None,
        }
    }

    /// Whether the error came from the end of the stream.
    pub fn is_eof(&self) -> bool {
        matches!(self, ExpectError::Eof { .. })
    }
}

impl From<tokio::task::JoinError> for ExpectError {
    fn from(err: tokio::task::JoinError) -> Self {
        ExpectError::TaskFailed(err.to_string())
    }
}

/// Errors related to pattern creation.
///
/// Detected before any I/O happens.
#[derive(Error, Debug)]
pub enum PatternError {
    /// Invalid regex pattern.
    #[error("Invalid regex: {0}")]
    InvalidRegex(#[from] regex::Error),

    /// Empty pattern.
    ///
    /// Returned when a literal search is attempted with an empty string.
    #[error("Pattern cannot be empty")]
    EmptyPattern,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_accessor() {
        let err = ExpectError::Eof {
            output: "partial".to_string(),
        };
        assert_eq!(err.output(), Some("partial"));
        assert!(err.is_eof());

        let err = ExpectError::Timeout {
            duration: Duration::from_millis(5),
        };
        assert_eq!(err.output(), None);
        assert!(!err.is_eof());
    }

    #[test]
    fn test_display_invalid_utf8() {
        let err = ExpectError::InvalidUtf8 {
            bytes: vec![0xff, 0xfe],
        };
        assert_eq!(err.to_string(), "Invalid UTF-8 sequence [ff, fe]");
    }

    #[test]
    fn test_pattern_error_conversion() {
        let err: ExpectError = PatternError::EmptyPattern.into();
        assert!(matches!(
            err,
            ExpectError::PatternError(PatternError::EmptyPattern)
        ));
    }
}
