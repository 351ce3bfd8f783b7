//! Library side of the `harscope` binary, shared with the integration tests.

use clap::ValueEnum;

pub mod commands;

/// How the analysis report is written to stdout
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Styled report for a terminal
    Pretty,
    /// `{success, data, message}` envelope
    Json,
    /// `Metric,Value` CSV lines of the headline figures
    Table,
}

impl OutputFormat {
    /// Only the terminal report gets a progress spinner; the other formats
    /// are meant to be piped.
    pub fn shows_progress(&self) -> bool {
        matches!(self, OutputFormat::Pretty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_pretty_shows_progress() {
        assert!(OutputFormat::Pretty.shows_progress());
        assert!(!OutputFormat::Json.shows_progress());
        assert!(!OutputFormat::Table.shows_progress());
    }
}
