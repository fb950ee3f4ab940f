//! Styled terminal output on stderr.

use console::{Term, style};

/// Writes user-facing messages, keeping stdout free for piping.
pub(crate) struct Output {
    term: Term,
}

impl Output {
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }

    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    pub(crate) fn success(&self, msg: &str) {
        let _ = self.term.write_line(&style(msg).green().to_string());
    }

    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.term.write_line(&style(msg).yellow().to_string());
    }

    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&style(msg).red().to_string());
    }

    pub(crate) fn highlight(&self, msg: &str) {
        let _ = self.term.write_line(&style(msg).cyan().bold().to_string());
    }

    /// Prompts on the terminal and reads one line.
    pub(crate) fn prompt(&self, msg: &str) -> std::io::Result<String> {
        self.term.write_str(msg)?;
        self.term.read_line()
    }
}
