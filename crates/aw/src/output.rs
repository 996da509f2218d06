//! Colored terminal output utilities.

use aw_site::BuildReport;
use console::{Style, Term};

/// Terminal output formatter.
pub(crate) struct Output {
    term: Term,
    green: Style,
    yellow: Style,
    red: Style,
    dim: Style,
}

impl Output {
    /// Create a new output formatter.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            dim: Style::new().dim(),
        }
    }

    /// Print an info message.
    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    /// Print a success message (green).
    pub(crate) fn success(&self, msg: &str) {
        let _ = self.term.write_line(&self.green.apply_to(msg).to_string());
    }

    /// Print a warning message (yellow).
    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.term.write_line(&self.yellow.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }

    /// Print every warning of a build followed by a one-line summary.
    pub(crate) fn report(&self, report: &BuildReport) {
        for warning in &report.warnings {
            self.warning(&format!("warning: {warning}"));
        }
        let summary = summary_line(report);
        let _ = self.term.write_line(&self.dim.apply_to(summary).to_string());
    }
}

fn summary_line(report: &BuildReport) -> String {
    format!(
        "{} document(s), {} asset(s), {} warning(s), {} unresolved link(s)",
        report.documents,
        report.assets,
        report.warnings.len(),
        report.unresolved_links()
    )
}
