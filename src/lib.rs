//! expectstream: expect-style automation over any byte stream
//!
//! expectstream drives an interactive program through a pair of blocking
//! streams: it writes input and scans the output for literal strings or
//! regular expressions, optionally bounded by a timeout. Spawning the program
//! is left to the caller; any `Read` / `Write` pair will do (child stdio,
//! pipes, sockets, in-memory buffers).
//!
//! # Features
//!
//! - **Exact consumption**: the stream is read one code point at a time and
//!   each call stops right after its match, so the next call starts exactly
//!   where the previous one ended
//! - **UTF-8 safe**: multi-byte characters split across reads decode correctly
//! - **Transcripts**: every match reports the text read before it
//! - **Timeouts**: calls can be raced against a timer
//! - **Channels**: the streams can be driven as a pair of async channels
//! - **ANSI stripping**: optional removal of escape sequences before matching
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use expectstream::Session;
//! use std::process::{Command, Stdio};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut child = Command::new("python3")
//!         .arg("-i")
//!         .stdin(Stdio::piped())
//!         .stdout(Stdio::piped())
//!         .stderr(Stdio::null())
//!         .spawn()?;
//!
//!     let mut session = Session::builder()
//!         .timeout(Duration::from_secs(30))
//!         .open(child.stdout.take().unwrap(), child.stdin.take().unwrap());
//!
//!     session.send_line("print(6 * 7)").await?;
//!
//!     let result = session.expect_regex_find_with_output(r"(\d+)\r?\n").await?;
//!     println!("Answer: {:?}", result.group(1));
//!
//!     Ok(())
//! }
//! ```
//!
//! # Matching
//!
//! Every call re-evaluates its pattern after each new code point and stops at
//! the first match:
//!
//! ```rust
//! use expectstream::Session;
//! use std::io::Cursor;
//!
//! # tokio_test::block_on(async {
//! let input = "prefix: 1 line\nprefix: 2 line\n";
//! let mut session = Session::read_only(Cursor::new(input.as_bytes().to_vec()));
//!
//! let first = session
//!     .expect_regex_find_with_output(r"(?m)^prefix:\s+(\d+) line$")
//!     .await
//!     .unwrap();
//! assert_eq!(first.output(), "prefix: 1 line");
//!
//! // `$` did not consume the newline, so the next call reports it
//! let second = session
//!     .expect_regex_find_with_output(r"(?m)^prefix:\s+(\d+) line$")
//!     .await
//!     .unwrap();
//! assert_eq!(second.output(), "\nprefix: 2 line");
//! assert_eq!(second.group(1), Some("2"));
//! # });
//! ```
//!
//! # Timeouts
//!
//! A blocking read cannot be interrupted. When a timeout expires the call
//! returns [`ExpectError::Timeout`] while the read stays blocked in the
//! background until the source produces data or closes; its result is
//! discarded.

#![warn(missing_docs)]

mod buffer;
mod pattern;
mod result;
mod session;

// Public API exports
pub use buffer::{AnsiFilter, RuneBuffer, MAX_RUNE_LEN};
pub use pattern::{Match, Matcher, Pattern};
pub use result::{ExpectError, MatchResult, PatternError};
pub use session::{Session, SessionBuilder};
