//! Pattern matching for expect operations

mod matcher;

pub use matcher::{Match, Matcher};

use crate::result::PatternError;
use regex::Regex;

/// Pattern types for matching stream output.
///
/// # Pattern Types
///
/// - **Exact**: literal substring, no capture groups
/// - **Regex**: full regular expression support with capture groups
///
/// # Examples
///
/// ```
/// use expectstream::Pattern;
///
/// // Exact string
/// let p1 = Pattern::exact("password: ");
///
/// // Regular expression
/// let p2 = Pattern::regex(r"(?m)^prompt\d+$").unwrap();
/// ```
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Exact string match.
    ///
    /// Found as soon as the text read so far contains the string.
    Exact(String),

    /// Regular expression match.
    ///
    /// The pattern is tried against everything read by the call after each new
    /// code point, so anchors such as `$` only match where the text ends at
    /// that moment. Empty matches are ignored.
    Regex(Regex),
}

impl Pattern {
    /// Create an exact string pattern.
    ///
    /// # Examples
    ///
    /// ```
    /// use expectstream::Pattern;
    ///
    /// let pattern = Pattern::exact("$ ");
    /// let pattern2 = Pattern::exact(String::from(">>> "));
    /// ```
    pub fn exact(s: impl Into<String>) -> Self {
        Pattern::Exact(s.into())
    }

    /// Create a regex pattern.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::InvalidRegex`] if the pattern does not compile.
    ///
    /// # Examples
    ///
    /// ```
    /// use expectstream::Pattern;
    ///
    /// // Match email with capture groups
    /// let pattern = Pattern::regex(r"(\w+)@(\w+)\.(\w+)").unwrap();
    ///
    /// // Case-insensitive
    /// let pattern = Pattern::regex(r"(?i)hello").unwrap();
    /// ```
    pub fn regex(pattern: &str) -> Result<Self, PatternError> {
        Ok(Pattern::Regex(Regex::new(pattern)?))
    }

    /// Convert pattern to a matcher implementation
    pub fn to_matcher(&self) -> Result<Box<dyn Matcher>, PatternError> {
        use matcher::{ExactMatcher, RegexMatcher};

        match self {
            Pattern::Exact(s) => Ok(Box::new(ExactMatcher::new(s.as_str())?)),
            Pattern::Regex(r) => Ok(Box::new(RegexMatcher::new(r.clone()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_regex() {
        assert!(matches!(
            Pattern::regex(r"(unclosed"),
            Err(PatternError::InvalidRegex(_))
        ));
    }

    #[test]
    fn test_empty_exact_rejected_by_matcher() {
        assert!(matches!(
            Pattern::exact("").to_matcher(),
            Err(PatternError::EmptyPattern)
        ));
    }

    #[test]
    fn test_to_matcher() {
        let matcher = Pattern::regex(r"x(\d)").unwrap().to_matcher().unwrap();
        let result = matcher.find("ax7").unwrap();
        assert_eq!(result.captures[1].as_deref(), Some("7"));

        let matcher = Pattern::exact("ok").to_matcher().unwrap();
        assert!(matcher.find("is ok").is_some());
    }
}
