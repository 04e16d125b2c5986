use super::loader::{LoadedGrammar, ParserLoadError, load_grammar};
use crate::error::{ElmSymbolsError, Result};
use crate::syntax::{SyntaxTree, lower_tree};
use std::path::Path;
use tree_sitter::{Language, Parser};

/// Parses Elm source into outline trees.
///
/// `tree_sitter::Parser` is not `Sync`, so a parser is created per call; the
/// grammar itself is shared.
pub struct ElmParser {
    language: Language,
    /// Where the grammar came from, for error messages.
    origin: String,
    /// Keeps a dynamically loaded grammar's library mapped.
    _grammar: Option<LoadedGrammar>,
}

impl ElmParser {
    pub fn new(grammar: LoadedGrammar) -> Self {
        Self {
            language: grammar.language().clone(),
            origin: grammar.path().display().to_string(),
            _grammar: Some(grammar),
        }
    }

    /// Use a grammar linked into the binary, e.g. `tree_sitter_elm::LANGUAGE.into()`.
    pub fn from_language(language: Language) -> Self {
        Self {
            language,
            origin: "<linked grammar>".to_string(),
            _grammar: None,
        }
    }

    /// Load the grammar from `library` and wrap it in a parser.
    pub fn load(library: &Path, symbol: &str) -> Result<Self> {
        let grammar = load_grammar(library, symbol).map_err(|err| match err {
            ParserLoadError::Library { path, source } => {
                ElmSymbolsError::parser_load(path.display().to_string(), source.to_string())
            }
            ParserLoadError::SymbolNotFound(symbol) => ElmSymbolsError::parser_load(
                library.display().to_string(),
                format!("symbol {symbol} not found"),
            ),
        })?;
        Ok(Self::new(grammar))
    }

    /// Parse `text` into an outline tree. `uri` is only used for error reporting.
    pub fn parse(&self, uri: &str, text: &str) -> Result<SyntaxTree> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|err| ElmSymbolsError::parser_load(self.origin.as_str(), err.to_string()))?;
        let tree = parser
            .parse(text, None)
            .ok_or_else(|| ElmSymbolsError::parse(uri, "parser returned no tree"))?;
        if tree.root_node().has_error() {
            log::debug!(
                target: "elm_symbols::parser",
                "{} contains syntax errors; lowering what parsed",
                uri
            );
        }
        Ok(lower_tree(&tree, text))
    }
}
