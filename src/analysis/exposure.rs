//! Resolution of the symbols a module exposes to importers.
//!
//! [`resolve_exposure`] is a pure function of one document's tree: it reads
//! the module header and top-level declarations and never looks at other
//! modules.

use crate::syntax::{DeclId, DeclarationKind, ExposedItem, ExposedKind, ExposingSpec, SyntaxTree};
use std::collections::HashSet;
use std::sync::Arc;
use url::Url;

/// Where an exposed symbol is defined.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DefinitionRef {
    pub uri: Url,
    pub decl: DeclId,
    /// Index of the union variant when the reference points at a constructor.
    pub variant: Option<usize>,
}

impl DefinitionRef {
    pub fn declaration(uri: Url, decl: DeclId) -> Self {
        Self {
            uri,
            decl,
            variant: None,
        }
    }

    pub fn constructor(uri: Url, decl: DeclId, variant: usize) -> Self {
        Self {
            uri,
            decl,
            variant: Some(variant),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// Functions, constants and ports.
    Value,
    /// Custom (union) types.
    Type,
    TypeAlias,
    Operator,
}

impl SymbolKind {
    /// Whether an exposing-list item of `kind` may refer to a symbol of this kind.
    fn accepts(self, kind: ExposedKind) -> bool {
        match self {
            SymbolKind::Value => kind == ExposedKind::Value,
            SymbolKind::Operator => kind == ExposedKind::Operator,
            SymbolKind::Type | SymbolKind::TypeAlias => kind.is_type_level(),
        }
    }
}

/// A constructor exposed through its parent union type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExposedConstructor {
    pub name: String,
    pub definition: DefinitionRef,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExposedSymbol {
    pub name: String,
    pub kind: SymbolKind,
    pub definition: DefinitionRef,
    /// Empty unless `kind` is [`SymbolKind::Type`] and its constructors are exposed.
    pub exposed_union_constructors: Vec<ExposedConstructor>,
}

impl ExposedSymbol {
    pub fn constructor_names(&self) -> impl Iterator<Item = &str> {
        self.exposed_union_constructors
            .iter()
            .map(|ctor| ctor.name.as_str())
    }
}

/// Ordered, immutable table of the symbols one module exposes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExposureTable {
    symbols: Arc<[ExposedSymbol]>,
}

impl ExposureTable {
    pub fn new(symbols: Vec<ExposedSymbol>) -> Self {
        Self {
            symbols: symbols.into(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ExposedSymbol> {
        self.symbols.iter()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Find the symbol an exposing-list item refers to.
    pub fn find(&self, item: &ExposedItem) -> Option<&ExposedSymbol> {
        self.symbols
            .iter()
            .find(|symbol| symbol.name == item.name && symbol.kind.accepts(item.kind))
    }

    pub fn get(&self, name: &str) -> Option<&ExposedSymbol> {
        self.symbols.iter().find(|symbol| symbol.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.symbols.iter().map(|symbol| symbol.name.as_str())
    }
}

impl<'a> IntoIterator for &'a ExposureTable {
    type Item = &'a ExposedSymbol;
    type IntoIter = std::slice::Iter<'a, ExposedSymbol>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Compute the exposure table of the module in `tree`.
///
/// A tree without a module header exposes nothing. When two declarations
/// share a name, the first one wins.
pub fn resolve_exposure(uri: &Url, tree: &SyntaxTree) -> ExposureTable {
    let Some(module) = tree.module() else {
        return ExposureTable::empty();
    };

    let mut seen = HashSet::new();
    let mut symbols = Vec::new();

    for (id, declaration) in tree.iter_declarations() {
        let (name, kind) = match &declaration.kind {
            DeclarationKind::Value { name: Some(name) } | DeclarationKind::Port { name } => {
                (name, SymbolKind::Value)
            }
            DeclarationKind::Value { name: None } => continue,
            DeclarationKind::Union { name, .. } => (name, SymbolKind::Type),
            DeclarationKind::Alias { name, .. } => (name, SymbolKind::TypeAlias),
            DeclarationKind::Infix { operator, .. } => (operator, SymbolKind::Operator),
        };

        let expose_constructors = match &module.exposing {
            ExposingSpec::All => true,
            ExposingSpec::Explicit(items) => {
                let Some(item) = items
                    .iter()
                    .find(|item| item.name == *name && kind.accepts(item.kind))
                else {
                    continue;
                };
                item.kind == ExposedKind::TypeWithConstructors
            }
        };

        if !seen.insert(name.clone()) {
            log::debug!(
                target: "elm_symbols::exposure",
                "Duplicate top-level name {} in {}; keeping the first declaration",
                name,
                module.name
            );
            continue;
        }

        let exposed_union_constructors = match &declaration.kind {
            DeclarationKind::Union { variants, .. } if expose_constructors => variants
                .iter()
                .enumerate()
                .map(|(index, variant)| ExposedConstructor {
                    name: variant.name.clone(),
                    definition: DefinitionRef::constructor(uri.clone(), id, index),
                })
                .collect(),
            _ => Vec::new(),
        };

        symbols.push(ExposedSymbol {
            name: name.clone(),
            kind,
            definition: DefinitionRef::declaration(uri.clone(), id),
            exposed_union_constructors,
        });
    }

    ExposureTable::new(symbols)
}
