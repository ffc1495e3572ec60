//! Session builder for configuration

use crate::buffer::RuneBuffer;
use crate::session::Session;
use std::io::{Read, Write};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Default capacity of each channel created by [`Session::interact`]
const DEFAULT_CHANNEL_CAPACITY: usize = 32;

/// Builder for configuring sessions.
///
/// Provides a fluent interface for configuring session options before
/// attaching the session to a stream pair.
///
/// # Defaults
///
/// - Timeout: none (matching calls wait until a match or end of stream)
/// - Max window size: unbounded
/// - ANSI stripping: disabled
/// - Interactive channel capacity: 32 messages
///
/// # Examples
///
/// ```no_run
/// use expectstream::Session;
/// use std::process::{Command, Stdio};
/// use std::time::Duration;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut child = Command::new("python3")
///     .arg("-i")
///     .stdin(Stdio::piped())
///     .stdout(Stdio::piped())
///     .spawn()?;
///
/// let session = Session::builder()
///     .timeout(Duration::from_secs(60))
///     .max_window_size(16384)
///     .strip_ansi(true)
///     .open(child.stdout.take().unwrap(), child.stdin.take().unwrap());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SessionBuilder {
    timeout: Option<Duration>,
    max_window_size: Option<usize>,
    strip_ansi: bool,
    channel_capacity: usize,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionBuilder {
    /// Create a new session builder with default configuration.
    ///
    /// See the [`SessionBuilder`] documentation for default values.
    pub fn new() -> Self {
        Self {
            timeout: None,
            max_window_size: None,
            strip_ansi: false,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    /// Set a default timeout for matching calls.
    ///
    /// Calls that do not take an explicit timeout are raced against this one.
    /// A timed-out call leaves its read running in the background.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Disable the default timeout (wait indefinitely).
    pub fn no_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    /// Cap the text a single matching call may read without a match.
    ///
    /// # Arguments
    ///
    /// * `size` - Maximum window size in bytes
    pub fn max_window_size(mut self, size: usize) -> Self {
        self.max_window_size = Some(size);
        self
    }

    /// Enable or disable ANSI escape sequence stripping.
    ///
    /// When enabled, escape sequences (colors, cursor movements, etc.) are
    /// dropped before pattern matching and do not appear in transcripts.
    pub fn strip_ansi(mut self, strip: bool) -> Self {
        self.strip_ansi = strip;
        self
    }

    /// Set the capacity of the channels created by [`Session::interact`].
    ///
    /// A capacity of zero is raised to one.
    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    /// Attach the session to a reader and a writer.
    pub fn open<R, W>(self, reader: R, writer: W) -> Session
    where
        R: Read + Send + 'static,
        W: Write + Send + 'static,
    {
        let writer: Box<dyn Write + Send> = Box::new(writer);
        self.build(Box::new(reader), Some(Arc::new(Mutex::new(writer))))
    }

    /// Attach the session to a reader only.
    ///
    /// Sending and [`Session::interact`] fail with
    /// [`ExpectError::NoWriter`](crate::ExpectError::NoWriter).
    pub fn open_read_only<R>(self, reader: R) -> Session
    where
        R: Read + Send + 'static,
    {
        self.build(Box::new(reader), None)
    }

    fn build(
        self,
        reader: Box<dyn Read + Send>,
        writer: Option<Arc<Mutex<Box<dyn Write + Send>>>>,
    ) -> Session {
        Session {
            reader: Arc::new(Mutex::new(RuneBuffer::new(reader))),
            writer,
            timeout: self.timeout,
            max_window_size: self.max_window_size,
            strip_ansi: self.strip_ansi,
            channel_capacity: self.channel_capacity,
        }
    }
}
