//! In-memory stream stand-ins for integration tests

#![allow(dead_code)]

use std::io::{self, Read, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Read half of an in-memory pipe; blocks until data arrives or every writer
/// is dropped.
pub struct PipeReader {
    rx: mpsc::Receiver<Vec<u8>>,
    pending: Vec<u8>,
    pos: usize,
}

/// Write half of an in-memory pipe.
#[derive(Clone)]
pub struct PipeWriter {
    tx: mpsc::Sender<Vec<u8>>,
}

/// Create a connected reader/writer pair.
pub fn pipe() -> (PipeReader, PipeWriter) {
    let (tx, rx) = mpsc::channel();
    (
        PipeReader {
            rx,
            pending: Vec::new(),
            pos: 0,
        },
        PipeWriter { tx },
    )
}

impl Read for PipeReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        while self.pos == self.pending.len() {
            match self.rx.recv() {
                Ok(chunk) => {
                    self.pending = chunk;
                    self.pos = 0;
                }
                Err(_) => return Ok(0),
            }
        }

        let n = buf.len().min(self.pending.len() - self.pos);
        buf[..n].copy_from_slice(&self.pending[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

impl Write for PipeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.tx
            .send(buf.to_vec())
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "pipe reader dropped"))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Write `data` to `writer` from another thread after `delay`, then drop it.
pub fn write_after(mut writer: PipeWriter, delay: Duration, data: &'static [u8]) {
    thread::spawn(move || {
        thread::sleep(delay);
        let _ = writer.write_all(data);
    });
}

/// Source that returns one scripted chunk per `read` call.
pub struct ChunkedReader {
    chunks: Vec<Vec<u8>>,
}

impl ChunkedReader {
    pub fn new(chunks: &[&[u8]]) -> Self {
        Self {
            chunks: chunks.iter().map(|c| c.to_vec()).collect(),
        }
    }
}

impl Read for ChunkedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        while let Some(chunk) = self.chunks.first_mut() {
            if chunk.is_empty() {
                self.chunks.remove(0);
                continue;
            }
            let n = chunk.len().min(buf.len());
            buf[..n].copy_from_slice(&chunk[..n]);
            chunk.drain(..n);
            return Ok(n);
        }
        Ok(0)
    }
}
