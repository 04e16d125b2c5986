//! Compiler report format.
//!
//! With `--report=json` the compiler prints one JSON array of issues per
//! line, interleaved with plain progress lines such as `Success! Compiled 1
//! module.`. Only lines starting with `[` carry issues.

use super::DiagnosticsError;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct IssuePosition {
    /// One-based line.
    pub line: u32,
    /// One-based column.
    pub column: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct IssueRegion {
    pub start: IssuePosition,
    pub end: IssuePosition,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IssueSeverity {
    Error,
    Warning,
}

/// One problem reported by the compiler.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct CompilerIssue {
    pub tag: String,
    pub overview: String,
    #[serde(default)]
    pub subregion: Option<IssueRegion>,
    #[serde(default)]
    pub details: String,
    pub region: IssueRegion,
    #[serde(rename = "type")]
    pub issue_type: String,
    pub file: String,
}

impl CompilerIssue {
    pub fn severity(&self) -> IssueSeverity {
        if self.issue_type.eq_ignore_ascii_case("warning") {
            IssueSeverity::Warning
        } else {
            IssueSeverity::Error
        }
    }
}

/// Collect the issues from the compiler's standard output.
pub fn parse_report_output(output: &str) -> Result<Vec<CompilerIssue>, DiagnosticsError> {
    let mut issues = Vec::new();
    for (index, line) in output.lines().enumerate() {
        let line = line.trim();
        if !line.starts_with('[') {
            continue;
        }
        let parsed: Vec<CompilerIssue> =
            serde_json::from_str(line).map_err(|source| DiagnosticsError::Report {
                line: index + 1,
                source,
            })?;
        issues.extend(parsed);
    }
    Ok(issues)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_ERROR: &str = r#"[{"tag":"NAMING ERROR","overview":"Cannot find variable `fo`","subregion":null,"details":"Maybe you want `foo`?","region":{"start":{"line":7,"column":5},"end":{"line":7,"column":7}},"type":"error","file":"src/Main.elm"}]"#;

    #[test]
    fn parses_issue_lines_and_skips_progress() {
        let output = format!("Compiling ...\n{ONE_ERROR}\n\n");
        let issues = parse_report_output(&output).unwrap();

        assert_eq!(issues.len(), 1);
        let issue = &issues[0];
        assert_eq!(issue.tag, "NAMING ERROR");
        assert_eq!(issue.file, "src/Main.elm");
        assert_eq!(issue.region.start, IssuePosition { line: 7, column: 5 });
        assert_eq!(issue.region.end, IssuePosition { line: 7, column: 7 });
        assert_eq!(issue.subregion, None);
        assert_eq!(issue.severity(), IssueSeverity::Error);
    }

    #[test]
    fn warnings_are_recognised() {
        let line = ONE_ERROR.replace(r#""type":"error""#, r#""type":"warning""#);
        let issues = parse_report_output(&line).unwrap();
        assert_eq!(issues[0].severity(), IssueSeverity::Warning);
    }

    #[test]
    fn empty_report_has_no_issues() {
        assert!(parse_report_output("Success! Compiled 1 module.\n[]\n").unwrap().is_empty());
    }

    #[test]
    fn malformed_issue_line_is_an_error() {
        let err = parse_report_output("ok\n[{\"tag\":").unwrap_err();
        match err {
            DiagnosticsError::Report { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }
}
