//! Session management for stream automation

mod accumulate;
mod builder;
mod interact;

pub use builder::SessionBuilder;

use crate::buffer::RuneBuffer;
use crate::pattern::Pattern;
use crate::result::{ExpectError, MatchResult, PatternError};
use accumulate::Accumulator;
use std::io::{Read, Write};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Main session for interacting with a byte stream.
///
/// A `Session` owns one reader (the output of the program being driven) and
/// optionally one writer (its input). Each matching call reads from the current
/// stream position and stops right after the match; whatever it read before
/// the match is reported as the unmatched prefix and is not seen again.
///
/// The reader is used by one call at a time. Matching calls and
/// [`Session::interact`] must not be used on the same session concurrently.
///
/// # Examples
///
/// ```no_run
/// use expectstream::Session;
/// use std::process::{Command, Stdio};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut child = Command::new("sh")
///     .stdin(Stdio::piped())
///     .stdout(Stdio::piped())
///     .spawn()?;
/// let mut session = Session::new(child.stdout.take().unwrap(), child.stdin.take().unwrap());
///
/// session.send_line("echo ready").await?;
/// session.expect("ready").await?;
/// # Ok(())
/// # }
/// ```
pub struct Session {
    reader: Arc<Mutex<RuneBuffer>>,
    writer: Option<Arc<Mutex<Box<dyn Write + Send>>>>,
    timeout: Option<Duration>,
    max_window_size: Option<usize>,
    strip_ansi: bool,
    channel_capacity: usize,
}

impl Session {
    /// Create a new session builder.
    ///
    /// # Examples
    ///
    /// ```
    /// use expectstream::Session;
    /// use std::io::Cursor;
    /// use std::time::Duration;
    ///
    /// let session = Session::builder()
    ///     .timeout(Duration::from_secs(60))
    ///     .max_window_size(16384)
    ///     .open_read_only(Cursor::new(b"login: ".to_vec()));
    /// ```
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Create a session over a reader and a writer with default settings.
    ///
    /// This is a shorthand for `Session::builder().open(reader, writer)`.
    pub fn new<R, W>(reader: R, writer: W) -> Self
    where
        R: Read + Send + 'static,
        W: Write + Send + 'static,
    {
        SessionBuilder::new().open(reader, writer)
    }

    /// Create a session that only reads.
    pub fn read_only<R>(reader: R) -> Self
    where
        R: Read + Send + 'static,
    {
        SessionBuilder::new().open_read_only(reader)
    }

    /// Wait for a literal string to appear.
    ///
    /// # Errors
    ///
    /// - [`PatternError::EmptyPattern`] if `literal` is empty, before any I/O
    /// - [`ExpectError::Eof`] if the stream ends without the literal
    /// - any other terminal stream error
    ///
    /// # Examples
    ///
    /// ```
    /// use expectstream::Session;
    /// use std::io::Cursor;
    ///
    /// # tokio_test::block_on(async {
    /// let mut session = Session::read_only(Cursor::new(b"Hello World\nHello\nHi".to_vec()));
    /// session.expect("Hello World").await.unwrap();
    /// session.expect("Hello").await.unwrap();
    /// session.expect("Hi").await.unwrap();
    /// # });
    /// ```
    pub async fn expect(&mut self, literal: &str) -> Result<(), ExpectError> {
        if literal.is_empty() {
            return Err(PatternError::EmptyPattern.into());
        }

        self.expect_pattern(Pattern::exact(literal)).await?;
        Ok(())
    }

    /// Wait for a regular expression to match.
    ///
    /// Returns `Ok(true)` on the first non-empty match and `Ok(false)` if the
    /// stream ends without one.
    ///
    /// # Errors
    ///
    /// Compile errors are returned before any I/O. I/O faults, malformed
    /// UTF-8 and timeouts are returned as errors.
    pub async fn expect_regex(&mut self, pattern: &str) -> Result<bool, ExpectError> {
        match self.expect_pattern(Pattern::regex(pattern)?).await {
            Ok(_) => Ok(true),
            Err(ExpectError::Eof { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Wait for a regular expression and return its capture groups.
    ///
    /// Index 0 holds the whole match, later indices the groups in the order of
    /// their opening parenthesis. Groups that did not take part are `None`.
    pub async fn expect_regex_find(
        &mut self,
        pattern: &str,
    ) -> Result<Vec<Option<String>>, ExpectError> {
        let result = self.expect_regex_find_with_output(pattern).await?;
        Ok(result.captures)
    }

    /// Wait for a regular expression and return captures plus transcript.
    ///
    /// [`MatchResult::output`] is exactly the text read by this call: anything
    /// left unconsumed by the previous call, then whatever came before the
    /// match, then the match.
    ///
    /// # Examples
    ///
    /// ```
    /// use expectstream::Session;
    /// use std::io::Cursor;
    ///
    /// # tokio_test::block_on(async {
    /// let mut session = Session::read_only(Cursor::new(b"$ ls\nfile.txt\n$ ".to_vec()));
    /// let result = session.expect_regex_find_with_output(r"(\w+)\.txt").await.unwrap();
    /// assert_eq!(result.before, "$ ls\n");
    /// assert_eq!(result.group(1), Some("file"));
    /// # });
    /// ```
    pub async fn expect_regex_find_with_output(
        &mut self,
        pattern: &str,
    ) -> Result<MatchResult, ExpectError> {
        self.expect_pattern(Pattern::regex(pattern)?).await
    }

    /// Like [`Session::expect_regex_find_with_output`], bounded by `timeout`.
    ///
    /// On expiry this returns [`ExpectError::Timeout`]. A read already blocked
    /// on the source cannot be interrupted: it keeps running in the background
    /// until the source produces data or closes, and its result is discarded.
    /// The next call on this session waits for that read to finish first.
    pub async fn expect_timeout_regex_find_with_output(
        &mut self,
        pattern: &str,
        timeout: Duration,
    ) -> Result<MatchResult, ExpectError> {
        self.expect_pattern_timeout(Pattern::regex(pattern)?, timeout)
            .await
    }

    /// Wait for a pattern, using the session's default timeout if one is set.
    pub async fn expect_pattern(&mut self, pattern: Pattern) -> Result<MatchResult, ExpectError> {
        if let Some(timeout) = self.timeout {
            return self.expect_pattern_timeout(pattern, timeout).await;
        }

        let accumulator = self.accumulator(&pattern)?;
        let reader = self.reader.clone();
        debug!(?pattern, "expecting pattern");

        tokio::task::spawn_blocking(move || {
            let mut buffer = reader.blocking_lock();
            accumulator.run(&mut buffer)
        })
        .await?
    }

    /// Wait for a pattern, giving up after `timeout`.
    pub async fn expect_pattern_timeout(
        &mut self,
        pattern: Pattern,
        timeout: Duration,
    ) -> Result<MatchResult, ExpectError> {
        let accumulator = self.accumulator(&pattern)?;
        let reader = self.reader.clone();
        debug!(?pattern, ?timeout, "expecting pattern with timeout");

        let worker = tokio::task::spawn_blocking(move || {
            let mut buffer = reader.blocking_lock();
            accumulator.run(&mut buffer)
        });

        match tokio::time::timeout(timeout, worker).await {
            Ok(joined) => joined?,
            Err(_) => {
                warn!(?timeout, "pattern not matched in time, leaving read in background");
                Err(ExpectError::Timeout { duration: timeout })
            }
        }
    }

    /// Read one line, without its `\n`; a preceding `\r` is kept.
    pub async fn read_line(&mut self) -> Result<String, ExpectError> {
        let reader = self.reader.clone();

        tokio::task::spawn_blocking(move || reader.blocking_lock().read_line()).await?
    }

    /// Send data to the writer.
    ///
    /// Writes the given bytes and flushes so the data is sent immediately.
    /// Control characters can be sent as raw bytes:
    ///
    /// ```no_run
    /// # async fn example(mut session: expectstream::Session) -> Result<(), expectstream::ExpectError> {
    /// // Ctrl-C
    /// session.send(&[0x03]).await?;
    /// // Up arrow
    /// session.send(b"\x1b[A").await?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// [`ExpectError::NoWriter`] if the session was opened read-only.
    pub async fn send(&mut self, data: &[u8]) -> Result<(), ExpectError> {
        let writer = self.writer.clone().ok_or(ExpectError::NoWriter)?;
        let data = data.to_vec();

        tokio::task::spawn_blocking(move || {
            let mut writer = writer.blocking_lock();
            writer.write_all(&data)?;
            writer.flush()
        })
        .await??;

        Ok(())
    }

    /// Send a line (appends `\n`).
    pub async fn send_line(&mut self, line: &str) -> Result<(), ExpectError> {
        let mut data = Vec::with_capacity(line.len() + 1);
        data.extend_from_slice(line.as_bytes());
        data.push(b'\n');
        self.send(&data).await
    }

    fn accumulator(&self, pattern: &Pattern) -> Result<Accumulator, ExpectError> {
        Ok(Accumulator::new(
            pattern.to_matcher()?,
            self.strip_ansi,
            self.max_window_size,
        ))
    }
}
