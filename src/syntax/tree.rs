//! Outline syntax tree for one Elm module.
//!
//! Trees are produced by an external parser (see [`crate::syntax::lower`]),
//! shared behind `Arc` by the forest and never mutated once built.

use super::position::Range;
use std::fmt;

/// Parsed outline of a single source file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SyntaxTree {
    module: Option<ModuleDeclaration>,
    imports: Vec<Import>,
    declarations: Vec<Declaration>,
}

impl SyntaxTree {
    pub fn new(
        module: Option<ModuleDeclaration>,
        imports: Vec<Import>,
        declarations: Vec<Declaration>,
    ) -> Self {
        Self {
            module,
            imports,
            declarations,
        }
    }

    /// The module header, absent when the source has none or it failed to parse.
    pub fn module(&self) -> Option<&ModuleDeclaration> {
        self.module.as_ref()
    }

    pub fn module_name(&self) -> Option<&str> {
        self.module.as_ref().map(|module| module.name.as_str())
    }

    pub fn imports(&self) -> &[Import] {
        &self.imports
    }

    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    pub fn declaration(&self, id: DeclId) -> Option<&Declaration> {
        self.declarations.get(id.0)
    }

    /// Iterate declarations together with their ids.
    pub fn iter_declarations(&self) -> impl Iterator<Item = (DeclId, &Declaration)> {
        self.declarations
            .iter()
            .enumerate()
            .map(|(index, decl)| (DeclId(index), decl))
    }
}

/// `module Name exposing (...)`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleDeclaration {
    pub name: String,
    pub exposing: ExposingSpec,
}

/// Exposing clause of a module header or an import.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExposingSpec {
    /// `exposing (..)`
    All,
    /// `exposing (a, B, C(..), (+))`
    Explicit(Vec<ExposedItem>),
}

impl ExposingSpec {
    /// Build an explicit list from item notations such as `"Maybe(..)"` or `"(::)"`.
    pub fn explicit<'a>(items: impl IntoIterator<Item = &'a str>) -> Self {
        ExposingSpec::Explicit(items.into_iter().map(ExposedItem::from_notation).collect())
    }

    /// Union of two clauses for the same module. `All` absorbs everything;
    /// a type listed both bare and as `Type(..)` keeps its constructors.
    pub fn union(self, other: &ExposingSpec) -> ExposingSpec {
        match (self, other) {
            (ExposingSpec::All, _) | (_, ExposingSpec::All) => ExposingSpec::All,
            (ExposingSpec::Explicit(mut items), ExposingSpec::Explicit(extra)) => {
                for item in extra {
                    let existing = items.iter_mut().find(|existing| {
                        existing.name == item.name
                            && existing.kind.is_type_level() == item.kind.is_type_level()
                    });
                    match existing {
                        Some(existing) => {
                            if item.kind == ExposedKind::TypeWithConstructors {
                                existing.kind = ExposedKind::TypeWithConstructors;
                            }
                        }
                        None => items.push(item.clone()),
                    }
                }
                ExposingSpec::Explicit(items)
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExposedKind {
    Value,
    Type,
    TypeWithConstructors,
    TypeAlias,
    Operator,
}

impl ExposedKind {
    /// Whether an item of this kind names a type-level declaration.
    pub fn is_type_level(self) -> bool {
        matches!(
            self,
            ExposedKind::Type | ExposedKind::TypeWithConstructors | ExposedKind::TypeAlias
        )
    }
}

/// One entry of an explicit exposing list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExposedItem {
    pub name: String,
    pub kind: ExposedKind,
}

impl ExposedItem {
    pub fn new(name: impl Into<String>, kind: ExposedKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Parse the surface notation of a single exposed item.
    ///
    /// `foo` is a value, `Foo` a type, `Foo(..)` a type with its constructors
    /// and `(+)` an operator. The operator name is stored without parentheses.
    pub fn from_notation(notation: &str) -> Self {
        let notation = notation.trim();
        if let Some(type_name) = notation.strip_suffix("(..)") {
            return Self::new(type_name.trim(), ExposedKind::TypeWithConstructors);
        }
        if let Some(operator) = notation
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return Self::new(operator.trim(), ExposedKind::Operator);
        }
        let kind = if notation.starts_with(|c: char| c.is_uppercase()) {
            ExposedKind::Type
        } else {
            ExposedKind::Value
        };
        Self::new(notation, kind)
    }
}

impl fmt::Display for ExposedItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ExposedKind::TypeWithConstructors => write!(f, "{}(..)", self.name),
            ExposedKind::Operator => write!(f, "({})", self.name),
            _ => f.write_str(&self.name),
        }
    }
}

/// `import Module.Name as Alias exposing (...)`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Import {
    pub module_name: String,
    pub alias: Option<String>,
    /// `None` means the import is qualified-only.
    pub exposing: Option<ExposingSpec>,
}

impl Import {
    pub fn new(module_name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            alias: None,
            exposing: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_exposing(mut self, exposing: ExposingSpec) -> Self {
        self.exposing = Some(exposing);
        self
    }

    /// Prefix used for qualified access: the alias when present, else the module name.
    pub fn qualifier(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.module_name)
    }
}

/// Index of a declaration within its tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DeclId(pub usize);

/// A top-level declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    pub kind: DeclarationKind,
    pub range: Range,
    /// Body of the attached `{-| ... -}` comment, markers stripped.
    pub doc: Option<String>,
    /// Source text shown in hints: the type annotation for values and ports,
    /// the declaration itself for types, aliases and infix declarations.
    pub signature: Option<String>,
}

impl Declaration {
    pub fn new(kind: DeclarationKind, range: Range) -> Self {
        Self {
            kind,
            range,
            doc: None,
            signature: None,
        }
    }

    /// The single bound name, if the declaration has one.
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            DeclarationKind::Value { name } => name.as_deref(),
            DeclarationKind::Union { name, .. } => Some(name),
            DeclarationKind::Alias { name, .. } => Some(name),
            DeclarationKind::Infix { operator, .. } => Some(operator),
            DeclarationKind::Port { name } => Some(name),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeclarationKind {
    /// `name args = body`; `name` is `None` for destructuring heads such as `( a, b ) = ...`.
    Value { name: Option<String> },
    /// `type Name params = A args | B args`
    Union {
        name: String,
        params: Vec<String>,
        variants: Vec<UnionVariant>,
    },
    /// `type alias Name params = ...`
    Alias { name: String, params: Vec<String> },
    /// `infix left 0 (|>) = apR`
    Infix { operator: String, function: String },
    /// `port name : ...`
    Port { name: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnionVariant {
    pub name: String,
    /// Source text of each constructor argument, e.g. `Int` or `(List a)`.
    pub arguments: Vec<String>,
    pub range: Range,
}

impl UnionVariant {
    pub fn new(name: impl Into<String>, arguments: Vec<String>, range: Range) -> Self {
        Self {
            name: name.into(),
            arguments,
            range,
        }
    }
}
