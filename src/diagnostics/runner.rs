//! Runs the external Elm compiler and collects its reports.
//!
//! Every check spawns a fresh compiler process with its own timeout. A
//! missing compiler binary is not an error: the user is told once and the
//! check yields no issues. A run that exits unsuccessfully without
//! reporting any issue is an error.

use super::DiagnosticsError;
use super::report::{CompilerIssue, parse_report_output};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::process::Command;

/// Receives user-facing messages (e.g. `window/showMessage` in an editor).
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Notifier that writes to the log.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        log::warn!(target: "elm_symbols::diagnostics", "{}", message);
    }
}

/// How to invoke the compiler. The file to check is appended after `args`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompilerCommand {
    pub path: String,
    pub args: Vec<String>,
    pub timeout: Duration,
}

impl Default for CompilerCommand {
    fn default() -> Self {
        Self {
            path: "elm-make".to_string(),
            args: vec![
                "--report=json".to_string(),
                "--output=/dev/null".to_string(),
                "--yes".to_string(),
            ],
            timeout: Duration::from_secs(10),
        }
    }
}

pub struct CompilerDiagnostics {
    command: CompilerCommand,
    notifier: Arc<dyn Notifier>,
    missing_reported: AtomicBool,
}

impl CompilerDiagnostics {
    pub fn new(command: CompilerCommand, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            command,
            notifier,
            missing_reported: AtomicBool::new(false),
        }
    }

    pub fn command(&self) -> &CompilerCommand {
        &self.command
    }

    /// Compile `file` and return the issues the compiler reported.
    pub async fn check(&self, file: &Path) -> Result<Vec<CompilerIssue>, DiagnosticsError> {
        let file = std::path::absolute(file)?;
        let program = &self.command.path;
        let mut command = Command::new(program);
        command
            .args(&self.command.args)
            .arg(&file)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(root) = project_root(&file).filter(|root| root.is_dir()) {
            command.current_dir(root);
        }

        let child = match command.spawn() {
            Ok(child) => child,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                self.report_missing_compiler();
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(DiagnosticsError::Spawn {
                    program: program.clone(),
                    source,
                });
            }
        };

        let output = tokio::time::timeout(self.command.timeout, child.wait_with_output())
            .await
            .map_err(|_| DiagnosticsError::Timeout {
                program: program.clone(),
                timeout: self.command.timeout,
            })??;

        let stderr = String::from_utf8_lossy(&output.stderr).trim_end().to_string();
        if !stderr.is_empty() {
            log::debug!(
                target: "elm_symbols::diagnostics",
                "{} stderr: {}",
                program,
                stderr
            );
        }

        let issues = parse_report_output(&String::from_utf8_lossy(&output.stdout))?;
        // A failing compile with nothing to show means the compiler itself broke
        if !output.status.success() && issues.is_empty() {
            return Err(DiagnosticsError::Failed {
                program: program.clone(),
                status: output.status,
                stderr,
            });
        }
        log::debug!(
            target: "elm_symbols::diagnostics",
            "{} reported {} issue(s) for {} (exit status {})",
            program,
            issues.len(),
            file.display(),
            output.status
        );
        Ok(issues)
    }

    fn report_missing_compiler(&self) {
        if self.missing_reported.swap(true, Ordering::SeqCst) {
            return;
        }
        self.notifier.notify(&format!(
            "The Elm compiler ({}) was not found. Install it or set compiler.path to enable diagnostics.",
            self.command.path
        ));
    }
}

/// Nearest ancestor directory holding `elm.json` or `elm-package.json`,
/// falling back to the file's own directory.
pub fn project_root(file: &Path) -> Option<PathBuf> {
    let parent = file.parent().filter(|dir| !dir.as_os_str().is_empty())?;
    let root = parent
        .ancestors()
        .find(|dir| dir.join("elm.json").is_file() || dir.join("elm-package.json").is_file())
        .unwrap_or(parent);
    Some(root.to_path_buf())
}
