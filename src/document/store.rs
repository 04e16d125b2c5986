//! The forest: one syntax tree per known document plus a module-name index.
//!
//! State is an immutable [`ForestState`] behind an `ArcSwap`. Writers build a
//! new state under a mutex and swap it in; readers take a [`ForestSnapshot`]
//! and keep working against the versions they started with.

use super::model::Document;
use crate::analysis::exposure::{ExposureTable, resolve_exposure};
use crate::analysis::exposure_cache::ExposureCache;
use crate::error::LockResultExt;
use crate::syntax::SyntaxTree;
use arc_swap::ArcSwap;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use url::Url;

#[derive(Clone, Debug, Default)]
struct ForestState {
    documents: HashMap<Url, Arc<Document>>,
    /// Module name -> authoritative document.
    modules: HashMap<String, Url>,
    next_registration: u64,
    next_generation: u64,
}

impl ForestState {
    /// Recompute which document owns `module_name`: the most recently registered one.
    fn reindex_module(&mut self, module_name: &str) {
        let mut owners: Vec<&Arc<Document>> = self
            .documents
            .values()
            .filter(|doc| doc.module_name() == Some(module_name))
            .collect();
        owners.sort_by_key(|doc| doc.registration());

        match owners.last() {
            Some(owner) => {
                if owners.len() > 1 {
                    let shadowed: Vec<&str> = owners[..owners.len() - 1]
                        .iter()
                        .map(|doc| doc.uri().as_str())
                        .collect();
                    log::warn!(
                        target: "elm_symbols::forest",
                        "Module {} is declared by several documents; using {} and ignoring {}",
                        module_name,
                        owner.uri(),
                        shadowed.join(", ")
                    );
                }
                let uri = owner.uri().clone();
                self.modules.insert(module_name.to_string(), uri);
            }
            None => {
                self.modules.remove(module_name);
            }
        }
    }
}

/// Store of every known document's tree.
pub struct Forest {
    state: ArcSwap<ForestState>,
    write_lock: Mutex<()>,
    exposure_cache: Arc<ExposureCache>,
}

impl Default for Forest {
    fn default() -> Self {
        Self::new()
    }
}

impl Forest {
    pub fn new() -> Self {
        Self {
            state: ArcSwap::new(Arc::new(ForestState::default())),
            write_lock: Mutex::new(()),
            exposure_cache: Arc::new(ExposureCache::new()),
        }
    }

    /// Insert a document or replace its text and tree wholesale.
    ///
    /// A replaced document keeps its original registration order.
    pub fn set_document(&self, uri: Url, text: String, tree: SyntaxTree, version: i32) {
        let _guard = self.write_lock.lock().recover_poison("Forest::set_document");
        let mut next = ForestState::clone(&self.state.load());

        let previous = next.documents.get(&uri).cloned();
        let registration = match &previous {
            Some(doc) => doc.registration(),
            None => {
                next.next_registration += 1;
                next.next_registration
            }
        };

        next.next_generation += 1;

        let document = Arc::new(Document::new(
            uri.clone(),
            text,
            Arc::new(tree),
            version,
            registration,
            next.next_generation,
        ));
        let new_module = document.module_name().map(str::to_string);
        next.documents.insert(uri.clone(), document);

        if let Some(old_module) = previous.as_ref().and_then(|doc| doc.module_name())
            && Some(old_module) != new_module.as_deref()
        {
            next.reindex_module(old_module);
        }
        if let Some(module_name) = &new_module {
            next.reindex_module(module_name);
        }

        self.state.store(Arc::new(next));
        self.exposure_cache.remove(&uri);

        log::debug!(
            target: "elm_symbols::forest",
            "Stored {} (module {}, version {})",
            uri,
            new_module.as_deref().unwrap_or("<none>"),
            version
        );
    }

    /// Remove a document (on close or delete).
    pub fn remove(&self, uri: &Url) -> Option<Arc<Document>> {
        let _guard = self.write_lock.lock().recover_poison("Forest::remove");
        let mut next = ForestState::clone(&self.state.load());

        let removed = next.documents.remove(uri)?;
        if let Some(module_name) = removed.module_name() {
            next.reindex_module(module_name);
        }

        self.state.store(Arc::new(next));
        self.exposure_cache.remove(uri);
        Some(removed)
    }

    /// A consistent read-only view of the current state.
    pub fn snapshot(&self) -> ForestSnapshot {
        ForestSnapshot {
            state: self.state.load_full(),
            exposure_cache: Arc::clone(&self.exposure_cache),
        }
    }

    pub fn get_tree(&self, uri: &Url) -> Option<Arc<SyntaxTree>> {
        self.snapshot().get_tree(uri)
    }

    pub fn get_document(&self, uri: &Url) -> Option<Arc<Document>> {
        self.snapshot().get_document(uri)
    }

    pub fn get_exposing_by_module_name(&self, module_name: &str) -> ExposureTable {
        self.snapshot().get_exposing_by_module_name(module_name)
    }

    pub fn uri_for_module(&self, module_name: &str) -> Option<Url> {
        self.snapshot().uri_for_module(module_name).cloned()
    }

    pub fn module_names(&self) -> Vec<String> {
        self.snapshot().module_names()
    }

    pub fn len(&self) -> usize {
        self.state.load().documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[cfg(test)]
    pub(crate) fn exposure_cache(&self) -> &ExposureCache {
        &self.exposure_cache
    }
}

/// Immutable view of the forest taken at the start of a request.
#[derive(Clone)]
pub struct ForestSnapshot {
    state: Arc<ForestState>,
    exposure_cache: Arc<ExposureCache>,
}

impl ForestSnapshot {
    pub fn get_document(&self, uri: &Url) -> Option<Arc<Document>> {
        self.state.documents.get(uri).cloned()
    }

    pub fn get_tree(&self, uri: &Url) -> Option<Arc<SyntaxTree>> {
        self.state.documents.get(uri).map(|doc| Arc::clone(doc.tree()))
    }

    pub fn uri_for_module(&self, module_name: &str) -> Option<&Url> {
        self.state.modules.get(module_name)
    }

    /// Sorted list of every indexed module name.
    pub fn module_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.state.modules.keys().cloned().collect();
        names.sort();
        names
    }

    /// Exposure table of the module registered under `module_name`.
    ///
    /// Unknown modules yield an empty table.
    pub fn get_exposing_by_module_name(&self, module_name: &str) -> ExposureTable {
        let Some(document) = self
            .uri_for_module(module_name)
            .and_then(|uri| self.state.documents.get(uri))
        else {
            log::trace!(
                target: "elm_symbols::forest",
                "No document registered for module {}",
                module_name
            );
            return ExposureTable::empty();
        };
        self.exposure_of(document)
    }

    fn exposure_of(&self, document: &Document) -> ExposureTable {
        if let Some(table) = self
            .exposure_cache
            .get_if_valid(document.uri(), document.version(), document.generation())
        {
            return table;
        }

        let table = resolve_exposure(document.uri(), document.tree());
        self.exposure_cache.store(
            document.uri().clone(),
            document.version(),
            document.generation(),
            table.clone(),
        );
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{ExposingSpec, TreeBuilder};

    fn uri(path: &str) -> Url {
        Url::parse(&format!("file:///project/src/{path}")).unwrap()
    }

    fn module(name: &str, value: &str) -> SyntaxTree {
        TreeBuilder::module(name, ExposingSpec::All)
            .value(value, None, None)
            .build()
    }

    #[test]
    fn get_tree_returns_current_tree() {
        let forest = Forest::new();
        let a = uri("A.elm");
        assert!(forest.get_tree(&a).is_none());

        forest.set_document(a.clone(), "module A".into(), module("A", "one"), 1);
        forest.set_document(a.clone(), "module A".into(), module("A", "two"), 2);

        let tree = forest.get_tree(&a).unwrap();
        assert_eq!(tree.declarations()[0].name(), Some("two"));
        assert_eq!(forest.get_document(&a).unwrap().version(), 2);
        assert_eq!(forest.len(), 1);
    }

    #[test]
    fn exposure_is_cached_per_version() {
        let forest = Forest::new();
        let a = uri("A.elm");
        forest.set_document(a.clone(), String::new(), module("A", "one"), 1);

        let first = forest.get_exposing_by_module_name("A");
        assert_eq!(first.names().collect::<Vec<_>>(), vec!["one"]);
        let generation = forest.get_document(&a).unwrap().generation();
        assert!(forest.exposure_cache().get_if_valid(&a, 1, generation).is_some());

        forest.set_document(a.clone(), String::new(), module("A", "two"), 2);
        assert!(forest.exposure_cache().get_if_valid(&a, 1, generation).is_none());

        let second = forest.get_exposing_by_module_name("A");
        assert_eq!(second.names().collect::<Vec<_>>(), vec!["two"]);
    }

    #[test]
    fn unknown_module_has_empty_exposure() {
        let forest = Forest::new();
        assert!(forest.get_exposing_by_module_name("Nope").is_empty());
    }

    #[test]
    fn last_registered_module_wins_collision() {
        let forest = Forest::new();
        let first = uri("First.elm");
        let second = uri("Second.elm");
        forest.set_document(first.clone(), String::new(), module("Shared", "fromFirst"), 1);
        forest.set_document(second.clone(), String::new(), module("Shared", "fromSecond"), 1);

        assert_eq!(forest.uri_for_module("Shared"), Some(second.clone()));

        // Editing the first document does not make it the most recent registration.
        forest.set_document(first.clone(), String::new(), module("Shared", "edited"), 2);
        assert_eq!(forest.uri_for_module("Shared"), Some(second.clone()));

        forest.remove(&second);
        assert_eq!(forest.uri_for_module("Shared"), Some(first));
        let names: Vec<String> = forest
            .get_exposing_by_module_name("Shared")
            .names()
            .map(String::from)
            .collect();
        assert_eq!(names, vec!["edited"]);
    }

    #[test]
    fn renaming_module_updates_index() {
        let forest = Forest::new();
        let a = uri("A.elm");
        forest.set_document(a.clone(), String::new(), module("Old", "x"), 1);
        forest.set_document(a.clone(), String::new(), module("New", "x"), 2);

        assert_eq!(forest.module_names(), vec!["New".to_string()]);
        assert!(forest.uri_for_module("Old").is_none());
    }

    #[test]
    fn remove_forgets_document_and_module() {
        let forest = Forest::new();
        let a = uri("A.elm");
        forest.set_document(a.clone(), String::new(), module("A", "x"), 1);
        let _ = forest.get_exposing_by_module_name("A");

        let removed = forest.remove(&a).unwrap();
        assert_eq!(removed.module_name(), Some("A"));
        assert!(forest.get_tree(&a).is_none());
        assert!(forest.uri_for_module("A").is_none());
        assert!(forest.exposure_cache().is_empty());
        assert!(forest.remove(&a).is_none());
        assert!(forest.is_empty());
    }

    #[test]
    fn snapshot_keeps_versions_it_started_with() {
        let forest = Forest::new();
        let a = uri("A.elm");
        forest.set_document(a.clone(), String::new(), module("A", "before"), 1);

        let snapshot = forest.snapshot();
        forest.set_document(a.clone(), String::new(), module("A", "after"), 2);

        let names: Vec<String> = snapshot
            .get_exposing_by_module_name("A")
            .names()
            .map(String::from)
            .collect();
        assert_eq!(names, vec!["before"]);
        assert_eq!(snapshot.get_document(&a).unwrap().version(), 1);

        let current: Vec<String> = forest
            .get_exposing_by_module_name("A")
            .names()
            .map(String::from)
            .collect();
        assert_eq!(current, vec!["after"]);
    }

    #[test]
    fn stale_snapshot_does_not_override_same_version_replacement() {
        let forest = Forest::new();
        let a = uri("A.elm");
        forest.set_document(a.clone(), String::new(), module("A", "before"), 0);

        let old = forest.snapshot();
        forest.set_document(a.clone(), String::new(), module("A", "after"), 0);

        let from_old: Vec<String> = old
            .get_exposing_by_module_name("A")
            .names()
            .map(String::from)
            .collect();
        assert_eq!(from_old, vec!["before"]);

        let current: Vec<String> = forest
            .get_exposing_by_module_name("A")
            .names()
            .map(String::from)
            .collect();
        assert_eq!(current, vec!["after"]);

        // The old reader again, now that the current table is cached.
        let _ = old.get_exposing_by_module_name("A");
        let current: Vec<String> = forest
            .get_exposing_by_module_name("A")
            .names()
            .map(String::from)
            .collect();
        assert_eq!(current, vec!["after"]);
    }

    #[test]
    fn writes_continue_after_poisoned_lock() {
        let forest = Arc::new(Forest::new());
        let poisoner = Arc::clone(&forest);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.write_lock.lock().unwrap();
            panic!("poison the forest lock");
        })
        .join();
        assert!(forest.write_lock.is_poisoned());

        let a = uri("A.elm");
        forest.set_document(a.clone(), String::new(), module("A", "x"), 1);
        assert_eq!(forest.uri_for_module("A"), Some(a.clone()));
        assert!(forest.remove(&a).is_some());
    }
}
