//! Imports every module sees without writing them.

use crate::syntax::{ExposingSpec, Import};
use arc_swap::ArcSwap;
use std::collections::HashSet;
use std::sync::Arc;

/// Ordered set of synthetic imports, swappable at runtime.
pub struct VirtualImportRegistry {
    imports: ArcSwap<Vec<Import>>,
}

impl std::fmt::Debug for VirtualImportRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualImportRegistry")
            .field("imports", &self.imports.load_full())
            .finish()
    }
}

impl Default for VirtualImportRegistry {
    fn default() -> Self {
        Self::new(elm_default_imports())
    }
}

impl VirtualImportRegistry {
    pub fn new(imports: Vec<Import>) -> Self {
        Self {
            imports: ArcSwap::new(Arc::new(imports)),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn imports(&self) -> Arc<Vec<Import>> {
        self.imports.load_full()
    }

    pub fn replace(&self, imports: Vec<Import>) {
        self.imports.store(Arc::new(imports));
    }

    /// Merge a document's explicit imports with the virtual ones.
    ///
    /// Explicit imports come first, folded per module by
    /// [`fold_repeated_imports`]. A virtual import is dropped when any
    /// explicit import names the same module, or when an earlier virtual
    /// import already did.
    pub fn merge_with(&self, explicit: &[Import]) -> Vec<Import> {
        let virtual_imports = self.imports.load();
        let mut merged = fold_repeated_imports(explicit);
        let mut seen: HashSet<String> = merged
            .iter()
            .map(|import| import.module_name.clone())
            .collect();

        for import in virtual_imports.iter() {
            if seen.insert(import.module_name.clone()) {
                merged.push(import.clone());
            }
        }
        merged
    }
}

/// Collapse repeated imports of one module the way the compiler reads them.
///
/// Every exposing clause of the module is unioned into its first import, so
/// `import Html` followed by `import Html exposing (div)` behaves as a single
/// `import Html exposing (div)`. A later import under a new alias only adds
/// that qualifier; one under an already-seen qualifier adds nothing.
pub fn fold_repeated_imports(explicit: &[Import]) -> Vec<Import> {
    let mut folded: Vec<Import> = Vec::with_capacity(explicit.len());
    for import in explicit {
        let Some(first) = folded
            .iter()
            .position(|seen| seen.module_name == import.module_name)
        else {
            folded.push(import.clone());
            continue;
        };

        if let Some(exposing) = &import.exposing {
            let target = &mut folded[first];
            target.exposing = Some(match target.exposing.take() {
                Some(current) => current.union(exposing),
                None => exposing.clone(),
            });
        }

        let known_qualifier = folded.iter().any(|seen| {
            seen.module_name == import.module_name && seen.qualifier() == import.qualifier()
        });
        if !known_qualifier {
            log::debug!(
                target: "elm_symbols::imports",
                "{} imported again as {}",
                import.module_name,
                import.qualifier()
            );
            folded.push(Import {
                module_name: import.module_name.clone(),
                alias: import.alias.clone(),
                exposing: None,
            });
        }
    }
    folded
}

/// The imports the Elm compiler adds to every module.
pub fn elm_default_imports() -> Vec<Import> {
    vec![
        Import::new("Basics").with_exposing(ExposingSpec::All),
        Import::new("List").with_exposing(ExposingSpec::explicit(["List", "(::)"])),
        Import::new("Maybe").with_exposing(ExposingSpec::explicit(["Maybe(..)"])),
        Import::new("Result").with_exposing(ExposingSpec::explicit(["Result(..)"])),
        Import::new("String").with_exposing(ExposingSpec::explicit(["String"])),
        Import::new("Char").with_exposing(ExposingSpec::explicit(["Char"])),
        Import::new("Tuple"),
        Import::new("Debug"),
        Import::new("Platform").with_exposing(ExposingSpec::explicit(["Program"])),
        Import::new("Platform.Cmd")
            .with_alias("Cmd")
            .with_exposing(ExposingSpec::explicit(["Cmd"])),
        Import::new("Platform.Sub")
            .with_alias("Sub")
            .with_exposing(ExposingSpec::explicit(["Sub"])),
    ]
}
