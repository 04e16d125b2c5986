//! Module-aware completion candidates.
//!
//! Candidates come from two places: the requesting document's own top-level
//! declarations, and the exposure tables of every module it imports
//! (explicitly or through the virtual imports). Visibility follows the
//! compiler's rules:
//!
//! - qualified access (`Alias.name`) is always legal for an exposed symbol
//! - unqualified access needs `exposing (..)` or the name in the import's list
//! - constructors need `Type(..)` on both sides
//! - operators are never qualified
//!
//! Shadowing is not resolved here: equal labels from different sources are
//! all returned.

use super::exposure::{DefinitionRef, ExposedSymbol, SymbolKind};
use super::hint::format_hint;
use super::virtual_imports::VirtualImportRegistry;
use crate::document::{Forest, ForestSnapshot};
use crate::syntax::{DeclarationKind, ExposedKind, ExposingSpec, Import, SyntaxTree};
use std::sync::Arc;
use url::Url;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CandidateKind {
    Value,
    Type,
    TypeAlias,
    Constructor,
    Operator,
}

impl From<SymbolKind> for CandidateKind {
    fn from(kind: SymbolKind) -> Self {
        match kind {
            SymbolKind::Value => CandidateKind::Value,
            SymbolKind::Type => CandidateKind::Type,
            SymbolKind::TypeAlias => CandidateKind::TypeAlias,
            SymbolKind::Operator => CandidateKind::Operator,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionCandidate {
    /// Bare (`map`) or qualified (`List.map`) name.
    pub label: String,
    pub kind: CandidateKind,
    pub documentation: Option<String>,
}

impl CompletionCandidate {
    pub fn new(label: impl Into<String>, kind: CandidateKind, documentation: Option<String>) -> Self {
        Self {
            label: label.into(),
            kind,
            documentation,
        }
    }
}

pub struct CompletionEngine {
    forest: Arc<Forest>,
    virtual_imports: Arc<VirtualImportRegistry>,
}

impl CompletionEngine {
    pub fn new(forest: Arc<Forest>, virtual_imports: Arc<VirtualImportRegistry>) -> Self {
        Self {
            forest,
            virtual_imports,
        }
    }

    pub fn forest(&self) -> &Arc<Forest> {
        &self.forest
    }

    /// Every candidate visible in the document at `uri`.
    ///
    /// Unknown documents yield an empty list.
    pub fn complete(&self, uri: &Url) -> Vec<CompletionCandidate> {
        let snapshot = self.forest.snapshot();
        let Some(tree) = snapshot.get_tree(uri) else {
            log::debug!(
                target: "elm_symbols::completion",
                "Completion requested for unknown document {}",
                uri
            );
            return Vec::new();
        };

        let mut candidates = Vec::new();
        collect_same_file(&tree, &mut candidates);

        let own_module = tree.module_name();
        for import in self.virtual_imports.merge_with(tree.imports()) {
            if own_module == Some(import.module_name.as_str()) {
                continue;
            }
            collect_from_import(&snapshot, &import, &mut candidates);
        }

        log::debug!(
            target: "elm_symbols::completion",
            "{} candidates for {}",
            candidates.len(),
            uri
        );
        candidates
    }
}

fn collect_same_file(tree: &SyntaxTree, out: &mut Vec<CompletionCandidate>) {
    for (id, declaration) in tree.iter_declarations() {
        let doc = || non_empty(format_hint(tree, id, None));
        match &declaration.kind {
            DeclarationKind::Value { name: Some(name) } | DeclarationKind::Port { name } => {
                out.push(CompletionCandidate::new(name, CandidateKind::Value, doc()));
            }
            DeclarationKind::Union { name, variants, .. } => {
                out.push(CompletionCandidate::new(name, CandidateKind::Type, doc()));
                for (index, variant) in variants.iter().enumerate() {
                    out.push(CompletionCandidate::new(
                        &variant.name,
                        CandidateKind::Constructor,
                        non_empty(format_hint(tree, id, Some(index))),
                    ));
                }
            }
            DeclarationKind::Alias { name, .. } => {
                out.push(CompletionCandidate::new(name, CandidateKind::TypeAlias, doc()));
            }
            DeclarationKind::Value { name: None } | DeclarationKind::Infix { .. } => {}
        }
    }
}

fn collect_from_import(
    snapshot: &ForestSnapshot,
    import: &Import,
    out: &mut Vec<CompletionCandidate>,
) {
    let table = snapshot.get_exposing_by_module_name(&import.module_name);
    if table.is_empty() {
        return;
    }
    let target_tree = snapshot
        .uri_for_module(&import.module_name)
        .and_then(|uri| snapshot.get_tree(uri));
    let hints = Hints {
        tree: target_tree.as_deref(),
    };

    let qualifier = import.qualifier();
    for symbol in &table {
        if symbol.kind != SymbolKind::Operator {
            out.push(CompletionCandidate::new(
                format!("{qualifier}.{}", symbol.name),
                symbol.kind.into(),
                hints.get(&symbol.definition),
            ));
        }
        for ctor in &symbol.exposed_union_constructors {
            out.push(CompletionCandidate::new(
                format!("{qualifier}.{}", ctor.name),
                CandidateKind::Constructor,
                hints.get(&ctor.definition),
            ));
        }
    }

    match &import.exposing {
        None => {}
        Some(ExposingSpec::All) => {
            for symbol in &table {
                push_unqualified(symbol, true, &hints, out);
            }
        }
        Some(ExposingSpec::Explicit(items)) => {
            for item in items {
                match table.find(item) {
                    Some(symbol) => push_unqualified(
                        symbol,
                        item.kind == ExposedKind::TypeWithConstructors,
                        &hints,
                        out,
                    ),
                    None => log::trace!(
                        target: "elm_symbols::completion",
                        "{} does not expose {}",
                        import.module_name,
                        item
                    ),
                }
            }
        }
    }
}

fn push_unqualified(
    symbol: &ExposedSymbol,
    with_constructors: bool,
    hints: &Hints<'_>,
    out: &mut Vec<CompletionCandidate>,
) {
    out.push(CompletionCandidate::new(
        &symbol.name,
        symbol.kind.into(),
        hints.get(&symbol.definition),
    ));
    if with_constructors {
        for ctor in &symbol.exposed_union_constructors {
            out.push(CompletionCandidate::new(
                &ctor.name,
                CandidateKind::Constructor,
                hints.get(&ctor.definition),
            ));
        }
    }
}

/// Hint lookup against the tree an exposure table was computed from.
struct Hints<'a> {
    tree: Option<&'a SyntaxTree>,
}

impl Hints<'_> {
    fn get(&self, definition: &DefinitionRef) -> Option<String> {
        self.tree
            .and_then(|tree| non_empty(format_hint(tree, definition.decl, definition.variant)))
    }
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() { None } else { Some(text) }
}
