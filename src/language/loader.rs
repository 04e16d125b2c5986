use libloading::{Library, Symbol};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tree_sitter::Language;

/// Symbol exported by tree-sitter-elm builds.
pub const DEFAULT_LANGUAGE_SYMBOL: &str = "tree_sitter_elm";

#[derive(Debug, Error)]
pub enum ParserLoadError {
    #[error("Failed to load library {path}: {source}")]
    Library {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),
}

/// A grammar loaded from a dynamic library.
///
/// The library handle is kept alongside the language because the language
/// tables live inside the library's memory.
pub struct LoadedGrammar {
    language: Language,
    path: PathBuf,
    _library: Library,
}

impl LoadedGrammar {
    pub fn language(&self) -> &Language {
        &self.language
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Load a Tree-sitter language from a dynamic library
///
/// # Arguments
/// * `path` - Path to the dynamic library file
/// * `func_name` - Name of the exported language function (e.g. `tree_sitter_elm`)
pub fn load_grammar(path: &Path, func_name: &str) -> Result<LoadedGrammar, ParserLoadError> {
    let library = unsafe { Library::new(path) }.map_err(|source| ParserLoadError::Library {
        path: path.to_path_buf(),
        source,
    })?;

    let language = {
        let language_fn: Symbol<unsafe extern "C" fn() -> Language> =
            unsafe { library.get(func_name.as_bytes()) }
                .map_err(|_| ParserLoadError::SymbolNotFound(func_name.to_string()))?;
        unsafe { language_fn() }
    };

    log::info!(
        target: "elm_symbols::parser_loader",
        "Loaded {} from {}",
        func_name,
        path.display()
    );

    Ok(LoadedGrammar {
        language,
        path: path.to_path_buf(),
        _library: library,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_library_reports_its_path() {
        let err = load_grammar(Path::new("/nonexistent/elm.so"), DEFAULT_LANGUAGE_SYMBOL)
            .err()
            .expect("loading a missing library must fail");
        match err {
            ParserLoadError::Library { path, .. } => {
                assert_eq!(path, PathBuf::from("/nonexistent/elm.so"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
