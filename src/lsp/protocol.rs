//! Conversion of engine results into LSP wire types.

use tower_lsp_server::ls_types::{
    CompletionItem, CompletionItemKind, Diagnostic, DiagnosticSeverity, Documentation,
    MarkupContent, MarkupKind, NumberOrString, Position, Range,
};

use crate::analysis::{CandidateKind, CompletionCandidate};
use crate::diagnostics::{CompilerIssue, IssuePosition, IssueSeverity};

/// Source name attached to compiler diagnostics.
pub const DIAGNOSTIC_SOURCE: &str = "elm";

pub fn completion_item_kind(kind: CandidateKind) -> CompletionItemKind {
    match kind {
        CandidateKind::Value => CompletionItemKind::FUNCTION,
        CandidateKind::Type => CompletionItemKind::ENUM,
        CandidateKind::TypeAlias => CompletionItemKind::STRUCT,
        CandidateKind::Constructor => CompletionItemKind::ENUM_MEMBER,
        CandidateKind::Operator => CompletionItemKind::OPERATOR,
    }
}

pub fn to_completion_item(candidate: CompletionCandidate) -> CompletionItem {
    CompletionItem {
        kind: Some(completion_item_kind(candidate.kind)),
        documentation: candidate.documentation.map(|value| {
            Documentation::MarkupContent(MarkupContent {
                kind: MarkupKind::Markdown,
                value,
            })
        }),
        label: candidate.label,
        ..Default::default()
    }
}

/// Compiler positions are one-based; LSP positions are zero-based.
fn to_position(position: IssuePosition) -> Position {
    Position {
        line: position.line.saturating_sub(1),
        character: position.column.saturating_sub(1),
    }
}

pub fn to_diagnostic(issue: &CompilerIssue) -> Diagnostic {
    let severity = match issue.severity() {
        IssueSeverity::Error => DiagnosticSeverity::ERROR,
        IssueSeverity::Warning => DiagnosticSeverity::WARNING,
    };
    let message = if issue.details.is_empty() {
        issue.overview.clone()
    } else {
        format!("{}\n\n{}", issue.overview, issue.details)
    };

    Diagnostic {
        range: Range {
            start: to_position(issue.region.start),
            end: to_position(issue.region.end),
        },
        severity: Some(severity),
        code: Some(NumberOrString::String(issue.tag.clone())),
        source: Some(DIAGNOSTIC_SOURCE.to_string()),
        message,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::IssueRegion;

    #[test]
    fn candidate_maps_to_markdown_completion_item() {
        let item = to_completion_item(CompletionCandidate::new(
            "X.Red",
            CandidateKind::Constructor,
            Some("```elm\nRed : Color\n```".to_string()),
        ));

        assert_eq!(item.label, "X.Red");
        assert_eq!(item.kind, Some(CompletionItemKind::ENUM_MEMBER));
        match item.documentation {
            Some(Documentation::MarkupContent(content)) => {
                assert_eq!(content.kind, MarkupKind::Markdown);
                assert_eq!(content.value, "```elm\nRed : Color\n```");
            }
            other => panic!("expected markdown documentation, got {other:?}"),
        }
    }

    #[test]
    fn candidate_without_documentation_has_none() {
        let item = to_completion_item(CompletionCandidate::new("foo", CandidateKind::Value, None));
        assert_eq!(item.kind, Some(CompletionItemKind::FUNCTION));
        assert!(item.documentation.is_none());
    }

    #[test]
    fn issue_maps_to_zero_based_diagnostic() {
        let issue = CompilerIssue {
            tag: "TYPE MISMATCH".to_string(),
            overview: "The 1st argument to `add` is not what I expect.".to_string(),
            subregion: None,
            details: "Expected Int, got String.".to_string(),
            region: IssueRegion {
                start: IssuePosition { line: 3, column: 9 },
                end: IssuePosition { line: 3, column: 14 },
            },
            issue_type: "error".to_string(),
            file: "src/Main.elm".to_string(),
        };

        let diagnostic = to_diagnostic(&issue);
        assert_eq!(diagnostic.range.start, Position { line: 2, character: 8 });
        assert_eq!(diagnostic.range.end, Position { line: 2, character: 13 });
        assert_eq!(diagnostic.severity, Some(DiagnosticSeverity::ERROR));
        assert_eq!(
            diagnostic.code,
            Some(NumberOrString::String("TYPE MISMATCH".to_string()))
        );
        assert_eq!(diagnostic.source.as_deref(), Some("elm"));
        assert!(diagnostic.message.ends_with("Expected Int, got String."));
    }
}
