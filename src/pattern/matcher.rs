//! Pattern matcher implementations

use crate::result::PatternError;
use regex::Regex;

/// Result of a pattern match
#[derive(Debug, Clone)]
pub struct Match {
    /// Start position of the match (byte offset into the window)
    pub start: usize,
    /// End position of the match
    pub end: usize,
    /// Captured groups, index 0 being the whole match
    pub captures: Vec<Option<String>>,
}

/// Trait for pattern matching against the accumulation window.
///
/// `find` is called again after every code point appended to the window, so a
/// matcher only has to report whether the window, as it is right now, holds a
/// match.
pub trait Matcher: Send + Sync {
    /// Find a match in the window
    fn find(&self, window: &str) -> Option<Match>;
}

/// Literal substring matcher.
///
/// Since the window grows one code point at a time, a literal is present as
/// soon as the window ends with it.
pub struct ExactMatcher {
    pattern: String,
}

impl ExactMatcher {
    /// Create a new exact matcher
    pub fn new(pattern: impl Into<String>) -> Result<Self, PatternError> {
        let pattern = pattern.into();

        if pattern.is_empty() {
            return Err(PatternError::EmptyPattern);
        }

        Ok(Self { pattern })
    }
}

impl Matcher for ExactMatcher {
    fn find(&self, window: &str) -> Option<Match> {
        if !window.ends_with(&self.pattern) {
            return None;
        }

        Some(Match {
            start: window.len() - self.pattern.len(),
            end: window.len(),
            captures: vec![Some(self.pattern.clone())],
        })
    }
}

/// Regex matcher
pub struct RegexMatcher {
    regex: Regex,
}

impl RegexMatcher {
    /// Create a new regex matcher
    pub fn new(regex: Regex) -> Self {
        Self { regex }
    }
}

impl Matcher for RegexMatcher {
    fn find(&self, window: &str) -> Option<Match> {
        // Empty matches never end a call
        let captures = self
            .regex
            .captures_iter(window)
            .find(|caps| caps.get(0).is_some_and(|m| !m.is_empty()))?;
        let full_match = captures.get(0)?;

        Some(Match {
            start: full_match.start(),
            end: full_match.end(),
            captures: captures
                .iter()
                .map(|group| group.map(|m| m.as_str().to_string()))
                .collect(),
        })
    }
}
