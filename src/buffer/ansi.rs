//! ANSI escape sequence stripping, one code point at a time

/// Position inside an escape sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum State {
    #[default]
    Text,
    Escape,
    /// CSI (Control Sequence Introducer), ends at a letter
    Csi,
    /// OSC (Operating System Command), ends at BEL or ST
    Osc,
    OscEscape,
    /// Character set selection (ESC ( X or ESC ) X)
    Charset,
}

/// Incremental filter that drops ANSI escape sequences from decoded text.
///
/// The filter sees one code point at a time, so sequences split across reads
/// are removed just like complete ones.
#[derive(Debug, Default)]
pub struct AnsiFilter {
    state: State,
}

impl AnsiFilter {
    /// Create a filter positioned outside any escape sequence
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one code point; returns it if it is visible text.
    pub fn feed(&mut self, ch: char) -> Option<char> {
        self.state = match (self.state, ch) {
            (State::Text, '\x1b') => State::Escape,
            (State::Text, _) => return Some(ch),
            (State::Escape, '[') => State::Csi,
            (State::Escape, ']') => State::Osc,
            (State::Escape, '(' | ')') => State::Charset,
            // Other escape sequences are two characters long
            (State::Escape, _) => State::Text,
            (State::Csi, c) if c.is_ascii_alphabetic() => State::Text,
            (State::Csi, _) => State::Csi,
            (State::Osc, '\x07') => State::Text,
            (State::Osc, '\x1b') => State::OscEscape,
            (State::Osc, _) => State::Osc,
            (State::OscEscape, '\\') => State::Text,
            (State::OscEscape, _) => State::Osc,
            (State::Charset, _) => State::Text,
        };
        None
    }

    /// Whether the filter is in the middle of an escape sequence
    pub fn in_sequence(&self) -> bool {
        self.state != State::Text
    }
}
