//! Directive-driven line rewriter
//!
//! A single forward pass over a toolpath. Every line is trimmed; lines are
//! echoed to the output unless a cut region is active, and directive lines
//! then append marker lines, open or close buffers, or paste buffered lines.
//!
//! The echo decision is taken before the line's directive is applied, so the
//! `START_CUT` line itself is echoed while the `STOP_CUT` line is not. Marker
//! lines are never suppressed by a cut.

use crate::checksum::Checksum;
use crate::directive::{parse_buffer_name, Directive};
use crate::error::DirectiveError;
use std::collections::HashMap;

/// Marker emitted after a `START_CUT` directive
pub const CUT_START_MARKER: &str = "; CUT START";
/// Marker emitted after a `STOP_CUT` directive
pub const CUT_STOPPED_MARKER: &str = "; CUT STOPPED";
/// Marker closing a pasted block
pub const END_OF_PASTE_MARKER: &str = "; END OF PASTE BUFFER";

/// Interpreter state for one rewriting pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriterState {
    buffers: HashMap<String, Vec<String>>,
    current_buffer: Option<String>,
    cutting: bool,
}

impl RewriterState {
    /// Create an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines recorded into `name`, if that buffer exists
    pub fn buffer(&self, name: &str) -> Option<&[String]> {
        self.buffers.get(name).map(Vec::as_slice)
    }

    /// Names of all buffers created so far
    pub fn buffer_names(&self) -> impl Iterator<Item = &str> {
        self.buffers.keys().map(String::as_str)
    }

    /// Buffer currently being recorded into
    pub fn current_buffer(&self) -> Option<&str> {
        self.current_buffer.as_deref()
    }

    /// Whether lines are being recorded. A buffer opened with an empty
    /// name does not record.
    pub fn is_copying(&self) -> bool {
        matches!(self.current_buffer.as_deref(), Some(name) if !name.is_empty())
    }

    /// Whether lines are currently suppressed
    pub fn is_cutting(&self) -> bool {
        self.cutting
    }
}

/// Counters collected during a pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteStats {
    /// Input lines processed
    pub lines_read: usize,
    /// Output lines produced, markers and pasted lines included
    pub lines_emitted: usize,
    /// Input lines suppressed by cut regions
    pub lines_cut: usize,
    /// `START_COPY` directives seen
    pub buffers_started: usize,
    /// Successful pastes
    pub pastes: usize,
    /// Paste targets that named no buffer, in order of appearance
    pub unknown_pastes: Vec<String>,
}

/// Result of a complete pass
#[derive(Debug, Clone)]
pub struct Rewrite {
    /// Output lines
    pub lines: Vec<String>,
    /// Interpreter state at the end of the pass
    pub state: RewriterState,
    /// Pass counters
    pub stats: RewriteStats,
}

impl Rewrite {
    /// Output joined with `\n`, without a trailing newline
    pub fn joined(&self) -> String {
        self.lines.join("\n")
    }

    /// Checksum of [`Rewrite::joined`]
    pub fn checksum(&self) -> Checksum {
        Checksum::of(&self.joined())
    }
}

/// Streaming rewriter
#[derive(Debug, Default)]
pub struct Rewriter {
    state: RewriterState,
    output: Vec<String>,
    stats: RewriteStats,
}

impl Rewriter {
    /// Create a rewriter with empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from an existing state
    pub fn with_state(state: RewriterState) -> Self {
        Self {
            state,
            ..Self::default()
        }
    }

    /// Current interpreter state
    pub fn state(&self) -> &RewriterState {
        &self.state
    }

    /// Output produced so far
    pub fn output(&self) -> &[String] {
        &self.output
    }

    /// Process one input line. `line_number` is 1-based and only used in errors.
    pub fn process_line(&mut self, line_number: usize, raw: &str) -> Result<(), DirectiveError> {
        let line = raw.trim();
        self.stats.lines_read += 1;

        if self.state.cutting {
            self.stats.lines_cut += 1;
        } else {
            self.output.push(line.to_string());
        }

        match Directive::classify(line) {
            Some(directive @ Directive::StartCopy) => {
                let name = parse_buffer_name(directive, line_number, line)?;
                tracing::info!("Start copy into buffer {}", name);
                self.state.buffers.insert(name.clone(), Vec::new());
                self.output
                    .push(format!("; starting to copy into buffer {}", name));
                self.state.current_buffer = Some(name);
                self.stats.buffers_started += 1;
            }
            Some(Directive::StopCopy) => {
                let name = self.state.current_buffer.take();
                tracing::info!("Stop copy into buffer {:?}", name);
                self.output.push(format!(
                    "; stopping copy into buffer {}",
                    name.as_deref().unwrap_or("None")
                ));
            }
            _ if self.state.is_copying() => {
                let RewriterState {
                    buffers,
                    current_buffer,
                    ..
                } = &mut self.state;
                if let Some(buffer) = current_buffer.as_ref().and_then(|name| buffers.get_mut(name)) {
                    buffer.push(line.to_string());
                }
            }
            Some(directive @ Directive::Paste) => {
                let name = parse_buffer_name(directive, line_number, line)?;
                self.paste(name);
            }
            Some(Directive::StartCut) => {
                tracing::info!("Cut start at line {}", line_number);
                self.output.push(CUT_START_MARKER.to_string());
                self.state.cutting = true;
            }
            Some(Directive::StopCut) => {
                tracing::info!("Cut stop at line {}", line_number);
                self.output.push(CUT_STOPPED_MARKER.to_string());
                self.state.cutting = false;
            }
            None => {}
        }

        Ok(())
    }

    fn paste(&mut self, name: String) {
        match self.state.buffers.get(&name) {
            Some(lines) => {
                tracing::info!("Paste buffer {} ({} lines)", name, lines.len());
                self.output
                    .push(format!("; pasting from buffer {} into output:", name));
                self.output.extend(lines.iter().cloned());
                self.output.push(END_OF_PASTE_MARKER.to_string());
                self.stats.pastes += 1;
            }
            None => {
                tracing::warn!("Paste of unknown buffer {:?} ignored", name);
                self.stats.unknown_pastes.push(name);
            }
        }
    }

    /// Finish the pass
    pub fn finish(mut self) -> Rewrite {
        self.stats.lines_emitted = self.output.len();
        if let Some(name) = self.state.current_buffer() {
            tracing::debug!("Buffer {} still open at end of input", name);
        }
        if self.state.is_cutting() {
            tracing::debug!("Cut region still open at end of input");
        }
        Rewrite {
            lines: self.output,
            state: self.state,
            stats: self.stats,
        }
    }
}

/// Rewrite a complete line sequence with fresh state
pub fn rewrite_lines<I, S>(lines: I) -> Result<Rewrite, DirectiveError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut rewriter = Rewriter::new();
    for (index, line) in lines.into_iter().enumerate() {
        rewriter.process_line(index + 1, line.as_ref())?;
    }
    Ok(rewriter.finish())
}
