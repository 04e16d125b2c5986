pub mod analysis;
pub mod config;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod language;
pub mod lsp;
pub mod syntax;
pub mod workspace;

pub use analysis::{
    CandidateKind, CompletionCandidate, CompletionEngine, ExposureTable, VirtualImportRegistry,
    format_hint, resolve_exposure,
};
pub use config::WorkspaceSettings;
pub use diagnostics::{CompilerCommand, CompilerDiagnostics, CompilerIssue};
pub use document::{Forest, ForestSnapshot};
pub use error::{ElmSymbolsError, Result};
pub use language::ElmParser;
pub use syntax::{SyntaxTree, TreeBuilder};
pub use workspace::Workspace;
