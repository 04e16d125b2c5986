//! External compiler diagnostics.

pub mod report;
pub mod runner;

use std::process::ExitStatus;
use std::time::Duration;
use thiserror::Error;

pub use report::{CompilerIssue, IssuePosition, IssueRegion, IssueSeverity, parse_report_output};
pub use runner::{CompilerCommand, CompilerDiagnostics, LogNotifier, Notifier, project_root};

#[derive(Debug, Error)]
pub enum DiagnosticsError {
    /// The compiler exists but could not be started
    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} did not finish within {timeout:?}")]
    Timeout { program: String, timeout: Duration },

    /// The compiler exited unsuccessfully without reporting any issue
    #[error("{program} failed ({status}): {stderr}")]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    /// A report line was not a valid JSON issue list
    #[error("Malformed compiler report on line {line}: {source}")]
    Report {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error while running the compiler: {0}")]
    Io(#[from] std::io::Error),
}
