//! Directive detection
//!
//! Directives are G-code comment lines that control the rewriter:
//!
//! ```text
//! ; START_COPY:<name>   ; STOP_COPY:<name>   ; PASTE:<name>
//! ; START_CUT           ; STOP_CUT
//! ```
//!
//! Slicers and users format comments inconsistently, so matching ignores
//! ASCII spaces and case: `;start_copy:a`, `; START_COPY : a` and
//! `;  Start_Copy:a` are all the same directive.

use crate::error::DirectiveError;
use std::fmt;

/// A rewriter directive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Directive {
    /// Open a named buffer and record the following lines into it
    StartCopy,
    /// Close the open buffer
    StopCopy,
    /// Emit the contents of a named buffer
    Paste,
    /// Suppress the following lines
    StartCut,
    /// Resume emitting lines
    StopCut,
}

impl Directive {
    /// All directives, in detection priority order
    pub const ALL: [Directive; 5] = [
        Directive::StartCopy,
        Directive::StopCopy,
        Directive::Paste,
        Directive::StartCut,
        Directive::StopCut,
    ];

    /// Canonical token for this directive
    pub fn token(self) -> &'static str {
        match self {
            Self::StartCopy => "; START_COPY:",
            Self::StopCopy => "; STOP_COPY:",
            Self::Paste => "; PASTE:",
            Self::StartCut => "; START_CUT",
            Self::StopCut => "; STOP_CUT",
        }
    }

    /// Whether the directive carries a `:<name>` argument
    pub fn takes_argument(self) -> bool {
        matches!(self, Self::StartCopy | Self::StopCopy | Self::Paste)
    }

    /// Check whether `line` expresses this directive
    pub fn matches(self, line: &str) -> bool {
        detect(self.token(), line)
    }

    /// Classify a line, returning the first matching directive
    pub fn classify(line: &str) -> Option<Directive> {
        Self::ALL.into_iter().find(|directive| directive.matches(line))
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Test whether `line` starts with `token`, ignoring spaces and case.
///
/// Only the space character is removed; tabs and other whitespace are
/// significant inside the line but trimmed from its ends.
pub fn detect(token: &str, line: &str) -> bool {
    let line = line.replace(' ', "");
    let token = token.replace(' ', "").to_lowercase();
    line.trim().to_lowercase().starts_with(&token)
}

/// Extract the buffer name from a directive line.
///
/// The name is the text between the first `:` and the next `:` (or the end
/// of the line), trimmed. `line_number` is only used for error reporting.
pub fn parse_buffer_name(
    directive: Directive,
    line_number: usize,
    line: &str,
) -> Result<String, DirectiveError> {
    line.split(':')
        .nth(1)
        .map(|name| name.trim().to_string())
        .ok_or_else(|| DirectiveError::Malformed {
            line_number,
            directive: directive.token().to_string(),
            line: line.to_string(),
        })
}
