//! Indentation-aware line buffer.

/// Accumulates generated lines, indenting each by `indent` once per depth.
///
/// Blank lines are written as a bare `\n` and never stack, so callers can
/// request a separator without tracking what came before.
pub(crate) struct CodeWriter<'a> {
    indent: &'a str,
    depth: usize,
    out: String,
}

impl<'a> CodeWriter<'a> {
    pub(crate) fn new(indent: &'a str) -> Self {
        Self {
            indent,
            depth: 0,
            out: String::new(),
        }
    }

    pub(crate) fn line(&mut self, text: &str) {
        if text.is_empty() {
            self.blank();
            return;
        }
        self.out.push_str(&self.indent.repeat(self.depth));
        self.out.push_str(text);
        self.out.push('\n');
    }

    /// One empty line, unless the buffer is empty or already ends in one.
    pub(crate) fn blank(&mut self) {
        if self.out.is_empty() || self.out.ends_with("\n\n") {
            return;
        }
        self.out.push('\n');
    }

    /// Write `text` and indent what follows.
    pub(crate) fn open(&mut self, text: &str) {
        self.line(text);
        self.depth += 1;
    }

    /// Dedent, then write `text`.
    pub(crate) fn close(&mut self, text: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.line(text);
    }

    /// Line groups separated by one blank line; empty groups are skipped.
    pub(crate) fn groups(&mut self, groups: &[Vec<String>]) {
        for (i, group) in groups.iter().filter(|g| !g.is_empty()).enumerate() {
            if i > 0 {
                self.blank();
            }
            for line in group {
                self.line(line);
            }
        }
    }

    pub(crate) fn finish(self) -> String {
        self.out
    }
}
