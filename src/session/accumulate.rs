//! The per-call accumulation loop shared by every matching operation

use crate::buffer::{AnsiFilter, RuneBuffer};
use crate::pattern::Matcher;
use crate::result::{ExpectError, MatchResult};
use tracing::{debug, trace};

/// One matching call: a compiled matcher plus the window options in effect.
pub(crate) struct Accumulator {
    matcher: Box<dyn Matcher>,
    strip_ansi: bool,
    max_window_size: Option<usize>,
}

impl Accumulator {
    pub(crate) fn new(
        matcher: Box<dyn Matcher>,
        strip_ansi: bool,
        max_window_size: Option<usize>,
    ) -> Self {
        Self {
            matcher,
            strip_ansi,
            max_window_size,
        }
    }

    /// Read code points until the matcher reports a match.
    ///
    /// The matcher is consulted after every code point. If the match ends
    /// before the end of the window, the tail goes back into the buffer so the
    /// next call sees it.
    pub(crate) fn run(&self, buffer: &mut RuneBuffer) -> Result<MatchResult, ExpectError> {
        let mut window = String::new();
        let mut filter = self.strip_ansi.then(AnsiFilter::new);

        loop {
            let ch = match buffer.read_rune() {
                Ok((ch, _)) => ch,
                Err(ExpectError::Eof { .. }) => {
                    debug!(consumed = window.len(), "stream ended before match");
                    return Err(ExpectError::Eof { output: window });
                }
                Err(e) => return Err(e),
            };

            let ch = match filter.as_mut() {
                Some(filter) => match filter.feed(ch) {
                    Some(ch) => ch,
                    None => continue,
                },
                None => ch,
            };
            window.push(ch);

            if let Some(found) = self.matcher.find(&window) {
                if found.end < window.len() {
                    buffer.unread(window[found.end..].as_bytes());
                    window.truncate(found.end);
                }
                trace!(start = found.start, end = found.end, "pattern matched");

                return Ok(MatchResult {
                    matched: window[found.start..].to_string(),
                    before: window[..found.start].to_string(),
                    captures: found.captures,
                });
            }

            if let Some(limit) = self.max_window_size {
                if window.len() >= limit {
                    debug!(size = window.len(), "window reached its limit");
                    return Err(ExpectError::FullBuffer {
                        size: window.len(),
                        output: window,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::Pattern;
    use std::io::Cursor;

    fn buffer(input: &str) -> RuneBuffer {
        RuneBuffer::new(Box::new(Cursor::new(input.as_bytes().to_vec())))
    }

    fn accumulator(pattern: Pattern) -> Accumulator {
        Accumulator::new(pattern.to_matcher().unwrap(), false, None)
    }

    #[test]
    fn test_stops_at_end_of_literal() {
        let mut buffer = buffer("abc: rest");
        let result = accumulator(Pattern::exact("c:")).run(&mut buffer).unwrap();

        assert_eq!(result.before, "ab");
        assert_eq!(result.matched, "c:");
        assert_eq!(buffer.read_rune().unwrap(), (' ', 1));
    }

    #[test]
    fn test_line_anchor_leaves_newline() {
        let mut buffer = buffer("one\ntwo\n");
        let acc = accumulator(Pattern::regex(r"(?m)^\w+$").unwrap());

        // Satisfied by the first letter alone, nothing more is read
        let first = acc.run(&mut buffer).unwrap();
        assert_eq!(first.output(), "o");

        let acc = accumulator(Pattern::regex(r"(?m)^two$").unwrap());
        let second = acc.run(&mut buffer).unwrap();
        assert_eq!(second.before, "ne\n");
        assert_eq!(second.matched, "two");
        assert_eq!(buffer.read_rune().unwrap(), ('\n', 1));
    }

    #[test]
    fn test_eof_reports_consumed_text() {
        let mut buffer = buffer("no match here");
        let err = accumulator(Pattern::exact("zzz"))
            .run(&mut buffer)
            .unwrap_err();

        assert_eq!(err.output(), Some("no match here"));
    }

    #[test]
    fn test_window_limit() {
        let mut buffer = buffer("0123456789");
        let acc = Accumulator::new(Pattern::exact("x").to_matcher().unwrap(), false, Some(4));

        match acc.run(&mut buffer) {
            Err(ExpectError::FullBuffer { size, output }) => {
                assert_eq!(size, 4);
                assert_eq!(output, "0123");
            }
            other => panic!("expected full buffer, got {:?}", other),
        }
        assert_eq!(buffer.read_rune().unwrap(), ('4', 1));
    }

    #[test]
    fn test_strip_ansi_window() {
        let mut buffer = buffer("\x1b[32mready\x1b[0m> ");
        let acc = Accumulator::new(Pattern::exact("ready> ").to_matcher().unwrap(), true, None);

        let result = acc.run(&mut buffer).unwrap();
        assert_eq!(result.output(), "ready> ");
    }

    #[test]
    fn test_invalid_utf8_ends_call() {
        let mut buffer = RuneBuffer::new(Box::new(Cursor::new(vec![b'a', 0xff, b'b'])));
        let acc = accumulator(Pattern::exact("b"));

        assert!(matches!(
            acc.run(&mut buffer),
            Err(ExpectError::InvalidUtf8 { .. })
        ));
        let result = acc.run(&mut buffer).unwrap();
        assert_eq!(result.output(), "b");
    }
}
