//! Progress lines on stderr, so rendered results on stdout stay clean.

use waypoint_core::ProgressSink;

pub struct TerminalProgress {
    dimmed: bool,
}

impl TerminalProgress {
    pub fn new(dimmed: bool) -> Self {
        Self { dimmed }
    }

    fn format(&self, message: &str) -> String {
        if self.dimmed {
            format!("\x1b[2m› {message}\x1b[0m")
        } else {
            format!("› {message}")
        }
    }
}

impl ProgressSink for TerminalProgress {
    fn emit(&self, message: &str) {
        log::debug!("progress: {message}");
        eprintln!("{}", self.format(message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_progress_line() {
        let progress = TerminalProgress::new(false);
        assert_eq!(progress.format("Finding a tool"), "› Finding a tool");
    }

    #[test]
    fn test_dimmed_progress_line() {
        let line = TerminalProgress::new(true).format("Finding a tool");
        assert!(line.starts_with("\x1b[2m"));
        assert!(line.contains("Finding a tool"));
    }
}
