//! Result types for expect operations

mod error;

pub use error::{ExpectError, PatternError};

/// Result of a successful pattern match.
///
/// Holds the text the call consumed, split at the start of the match, and the
/// capture groups of the pattern.
///
/// # Examples
///
/// ```no_run
/// use expectstream::Session;
///
/// # async fn example(mut session: Session) -> Result<(), Box<dyn std::error::Error>> {
/// let result = session
///     .expect_regex_find_with_output(r"(\w+)@(\w+)\.(\w+)")
///     .await?;
///
/// // captures[0] is the full match
/// println!("Email: {:?}", result.captures[0]);
/// println!("User: {:?}", result.captures[1]);
/// println!("Transcript: {}", result.output());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// The matched text.
    pub matched: String,

    /// Text read by the call before the match started.
    ///
    /// This is often the most useful part for extracting command output. It
    /// includes anything left unconsumed by the previous call, such as a
    /// newline that a `$`-anchored pattern did not consume.
    pub before: String,

    /// Captured groups.
    ///
    /// - Index 0: the full matched text
    /// - Index 1+: each group, in the left-to-right order of its opening
    ///   parenthesis; `None` when the group did not take part in the match
    ///
    /// Literal matches carry a single entry.
    pub captures: Vec<Option<String>>,
}

impl MatchResult {
    /// Full transcript of the call: unmatched prefix followed by the match.
    pub fn output(&self) -> String {
        let mut output = String::with_capacity(self.before.len() + self.matched.len());
        output.push_str(&self.before);
        output.push_str(&self.matched);
        output
    }

    /// Get a capture group as a string slice.
    pub fn group(&self, index: usize) -> Option<&str> {
        self.captures.get(index)?.as_deref()
    }
}
