//! A project directory indexed into a [`Forest`].
//!
//! Files are discovered on disk, parsed on the rayon pool, then registered
//! in sorted path order so module collisions resolve the same way on every run.

use crate::analysis::{CompletionCandidate, CompletionEngine, VirtualImportRegistry};
use crate::config::WorkspaceSettings;
use crate::diagnostics::{CompilerDiagnostics, Notifier};
use crate::document::Forest;
use crate::error::{ElmSymbolsError, Result};
use crate::language::ElmParser;
use crate::syntax::SyntaxTree;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use url::Url;

/// Directories never descended into.
const SKIPPED_DIRS: &[&str] = &["elm-stuff", "node_modules"];

/// Recursively collect `.elm` files under `root`, sorted.
///
/// Hidden directories and build output are skipped. Unreadable directories
/// are logged and skipped.
pub fn discover_elm_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if dir == root => return Err(err.into()),
            Err(err) => {
                log::warn!(target: "elm_symbols::workspace", "Skipping {}: {}", dir.display(), err);
                continue;
            }
        };
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            let file_type = entry.file_type()?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if file_type.is_dir() {
                if !name.starts_with('.') && !SKIPPED_DIRS.contains(&name.as_ref()) {
                    pending.push(path);
                }
            } else if path.extension().is_some_and(|ext| ext == "elm") {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Outcome of indexing a batch of files.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IndexSummary {
    pub indexed: usize,
    pub failed: usize,
}

/// Parse `files` in parallel with `parse` and register the results in `forest`
/// at version 0. Files that cannot be read or parsed are logged and counted.
pub fn index_files<F>(forest: &Forest, files: &[PathBuf], parse: F) -> IndexSummary
where
    F: Fn(&Url, &str) -> Result<SyntaxTree> + Sync,
{
    let results: Vec<(PathBuf, Result<(Url, String, SyntaxTree)>)> = files
        .par_iter()
        .map(|path| (path.clone(), load_file(path, &parse)))
        .collect();

    let mut summary = IndexSummary::default();
    for (path, result) in results {
        match result {
            Ok((uri, text, tree)) => {
                forest.set_document(uri, text, tree, 0);
                summary.indexed += 1;
            }
            Err(err) => {
                log::warn!(target: "elm_symbols::workspace", "Failed to index {}: {}", path.display(), err);
                summary.failed += 1;
            }
        }
    }

    log::info!(
        target: "elm_symbols::workspace",
        "Indexed {} file(s), {} failed",
        summary.indexed,
        summary.failed
    );
    summary
}

fn load_file<F>(path: &Path, parse: &F) -> Result<(Url, String, SyntaxTree)>
where
    F: Fn(&Url, &str) -> Result<SyntaxTree>,
{
    let absolute = std::path::absolute(path)?;
    let uri = Url::from_file_path(&absolute)
        .map_err(|_| ElmSymbolsError::internal(format!("not a file path: {}", absolute.display())))?;
    let text = fs::read_to_string(path)?;
    let tree = parse(&uri, &text)?;
    Ok((uri, text, tree))
}

/// A project root with its forest, parser, and resolved settings.
pub struct Workspace {
    root: PathBuf,
    settings: WorkspaceSettings,
    parser: ElmParser,
    forest: Arc<Forest>,
    virtual_imports: Arc<VirtualImportRegistry>,
}

impl Workspace {
    /// Load the grammar named by `settings` and index every file under `root`.
    pub fn open(root: &Path, settings: WorkspaceSettings) -> Result<Self> {
        let library = settings.parser_library.clone().ok_or_else(|| {
            ElmSymbolsError::config("parserLibrary is not set; point it at the Elm tree-sitter grammar")
        })?;
        let parser = ElmParser::load(&library, &settings.parser_symbol)?;
        let workspace = Self {
            root: root.to_path_buf(),
            virtual_imports: Arc::new(VirtualImportRegistry::new(settings.virtual_imports.clone())),
            settings,
            parser,
            forest: Arc::new(Forest::new()),
        };

        let files = discover_elm_files(root)?;
        index_files(&workspace.forest, &files, |uri, text| {
            workspace.parser.parse(uri.as_str(), text)
        });
        Ok(workspace)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn settings(&self) -> &WorkspaceSettings {
        &self.settings
    }

    pub fn forest(&self) -> &Arc<Forest> {
        &self.forest
    }

    pub fn virtual_imports(&self) -> &Arc<VirtualImportRegistry> {
        &self.virtual_imports
    }

    /// Re-parse `text` and replace the document at `uri`.
    pub fn update_document(&self, uri: Url, text: String, version: i32) -> Result<()> {
        let tree = self.parser.parse(uri.as_str(), &text)?;
        self.forest.set_document(uri, text, tree, version);
        Ok(())
    }

    pub fn completion_engine(&self) -> CompletionEngine {
        CompletionEngine::new(self.forest.clone(), self.virtual_imports.clone())
    }

    /// Completion candidates for the file at `path`.
    pub fn complete_file(&self, path: &Path) -> Result<Vec<CompletionCandidate>> {
        let absolute = std::path::absolute(path)?;
        let uri = Url::from_file_path(&absolute)
            .map_err(|_| ElmSymbolsError::internal(format!("not a file path: {}", absolute.display())))?;
        if self.forest.get_document(&uri).is_none() {
            return Err(ElmSymbolsError::document_not_found(uri.as_str()));
        }
        Ok(self.completion_engine().complete(&uri))
    }

    pub fn diagnostics(&self, notifier: Arc<dyn Notifier>) -> CompilerDiagnostics {
        CompilerDiagnostics::new(self.settings.compiler.clone(), notifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{ExposingSpec, TreeBuilder};
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    /// Stand-in parser: the module name is the first line of the file.
    fn first_line_parser(_uri: &Url, text: &str) -> Result<SyntaxTree> {
        match text.lines().next() {
            Some(name) if !name.is_empty() => {
                Ok(TreeBuilder::module(name, ExposingSpec::All).value("x", None, None).build())
            }
            _ => Err(ElmSymbolsError::parse("test", "empty file")),
        }
    }

    #[test]
    fn discovery_skips_build_output_and_hidden_dirs() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/Main.elm", "Main");
        write(dir.path(), "src/Page/Home.elm", "Page.Home");
        write(dir.path(), "src/notes.md", "");
        write(dir.path(), "elm-stuff/0.19.1/Cached.elm", "Cached");
        write(dir.path(), ".git/Hooks.elm", "Hooks");
        write(dir.path(), "node_modules/pkg/Dep.elm", "Dep");

        let files = discover_elm_files(dir.path()).unwrap();
        assert_eq!(
            files,
            vec![
                dir.path().join("src/Main.elm"),
                dir.path().join("src/Page/Home.elm"),
            ]
        );
    }

    #[test]
    fn discovery_of_missing_root_fails() {
        let dir = TempDir::new().unwrap();
        assert!(discover_elm_files(&dir.path().join("absent")).is_err());
    }

    #[test]
    fn indexing_registers_parsed_files_and_counts_failures() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/A.elm", "A\n");
        write(dir.path(), "src/B.elm", "B\n");
        write(dir.path(), "src/Empty.elm", "");

        let forest = Forest::new();
        let files = discover_elm_files(dir.path()).unwrap();
        let summary = index_files(&forest, &files, first_line_parser);

        assert_eq!(summary, IndexSummary { indexed: 2, failed: 1 });
        assert_eq!(forest.module_names(), vec!["A".to_string(), "B".to_string()]);
        let uri = forest.uri_for_module("B").unwrap();
        assert_eq!(uri.to_file_path().unwrap(), dir.path().join("src/B.elm"));
        assert_eq!(forest.get_document(&uri).unwrap().version(), 0);
    }

    #[test]
    fn colliding_modules_resolve_to_last_path_in_order() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a/Utils.elm", "Utils\n");
        write(dir.path(), "b/Utils.elm", "Utils\n");

        let forest = Forest::new();
        let files = discover_elm_files(dir.path()).unwrap();
        index_files(&forest, &files, first_line_parser);

        let uri = forest.uri_for_module("Utils").unwrap();
        assert_eq!(uri.to_file_path().unwrap(), dir.path().join("b/Utils.elm"));
    }

    #[test]
    fn open_without_parser_library_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        let err = Workspace::open(dir.path(), WorkspaceSettings::default())
            .err()
            .unwrap();
        assert!(matches!(err, ElmSymbolsError::Config { .. }));
    }
}
