//! Channel-based interaction with a session's streams

use crate::buffer::RuneBuffer;
use crate::result::ExpectError;
use crate::session::Session;
use std::io::Write;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, warn};

impl Session {
    /// Expose the streams as a pair of channels.
    ///
    /// Strings sent on the returned sender are written verbatim to the writer.
    /// Lines read from the reader (without `\n`, keeping any `\r`) arrive on
    /// the returned receiver, which yields `None` once the reader reaches end
    /// of stream or fails. Dropping the sender stops the writing side.
    ///
    /// Both sides run on Tokio's blocking pool and outlive this call, so this
    /// must be called from within a Tokio runtime. Matching calls on the same
    /// session must not be made while the channels are in use.
    ///
    /// # Errors
    ///
    /// [`ExpectError::NoWriter`] if the session was opened read-only.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # async fn example(mut session: expectstream::Session) -> Result<(), expectstream::ExpectError> {
    /// let (input, mut output) = session.interact()?;
    /// input.send("echo hi\n".to_string()).await.ok();
    /// while let Some(line) = output.recv().await {
    ///     if line.contains("hi") {
    ///         break;
    ///     }
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn interact(
        &mut self,
    ) -> Result<(mpsc::Sender<String>, mpsc::Receiver<String>), ExpectError> {
        let writer = self.writer.clone().ok_or(ExpectError::NoWriter)?;
        let (input_tx, input_rx) = mpsc::channel(self.channel_capacity);
        let (output_tx, output_rx) = mpsc::channel(self.channel_capacity);

        let reader = self.reader.clone();
        tokio::task::spawn_blocking(move || pump_lines(reader, output_tx));
        tokio::task::spawn_blocking(move || pump_input(writer, input_rx));

        Ok((input_tx, output_rx))
    }
}

/// Forward lines from the reader until it ends or nobody is listening.
fn pump_lines(reader: Arc<Mutex<RuneBuffer>>, lines: mpsc::Sender<String>) {
    debug!("interactive reader started");

    loop {
        let line = reader.blocking_lock().read_line();
        match line {
            Ok(line) => {
                if lines.blocking_send(line).is_err() {
                    debug!("line receiver dropped, stopping reader");
                    break;
                }
            }
            Err(e) if e.is_eof() => {
                debug!("reader reached EOF, closing line channel");
                break;
            }
            Err(e) => {
                warn!(error = %e, "interactive reader stopped");
                break;
            }
        }
    }
}

/// Write every string received until all senders are dropped.
fn pump_input(writer: Arc<Mutex<Box<dyn Write + Send>>>, mut input: mpsc::Receiver<String>) {
    debug!("interactive writer started");

    while let Some(message) = input.blocking_recv() {
        let mut writer = writer.blocking_lock();
        if let Err(e) = writer
            .write_all(message.as_bytes())
            .and_then(|()| writer.flush())
        {
            warn!(error = %e, "interactive writer stopped");
            return;
        }
    }

    debug!("input channel closed, stopping writer");
}
