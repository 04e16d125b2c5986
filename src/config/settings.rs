use crate::diagnostics::CompilerCommand;
use crate::error::{ElmSymbolsError, Result};
use crate::language::DEFAULT_LANGUAGE_SYMBOL;
use crate::syntax::{ExposingSpec, Import};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Settings as written in `elm-symbols.toml` or sent by a client.
///
/// Every field is optional so layers can be merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElmSymbolsSettings {
    /// Shared library containing the Elm tree-sitter grammar
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parser_library: Option<String>,
    /// Exported language function, `tree_sitter_elm` by default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parser_symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compiler: Option<CompilerConfig>,
    /// Replaces the Elm default imports when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub virtual_imports: Option<Vec<VirtualImportConfig>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualImportConfig {
    pub module: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exposing: Option<ExposingConfig>,
}

/// `exposing = ".."` or `exposing = ["Maybe(..)", "withDefault"]`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ExposingConfig {
    Wildcard(String),
    Items(Vec<String>),
}

impl VirtualImportConfig {
    pub fn to_import(&self) -> Result<Import> {
        if self.module.trim().is_empty() {
            return Err(ElmSymbolsError::config("virtual import without a module name"));
        }
        let mut import = Import::new(self.module.trim());
        if let Some(alias) = &self.alias {
            import = import.with_alias(alias.trim());
        }
        match &self.exposing {
            None => {}
            Some(ExposingConfig::Wildcard(text)) if text.trim() == ".." => {
                import = import.with_exposing(ExposingSpec::All);
            }
            Some(ExposingConfig::Wildcard(text)) => {
                return Err(ElmSymbolsError::config(format!(
                    "virtual import {}: exposing must be \"..\" or a list, got {:?}",
                    self.module, text
                )));
            }
            Some(ExposingConfig::Items(items)) => {
                import = import.with_exposing(ExposingSpec::explicit(items.iter().map(String::as_str)));
            }
        }
        Ok(import)
    }
}

/// Fully resolved settings used at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceSettings {
    pub parser_library: Option<PathBuf>,
    pub parser_symbol: String,
    pub compiler: CompilerCommand,
    pub virtual_imports: Vec<Import>,
}

impl Default for WorkspaceSettings {
    fn default() -> Self {
        WorkspaceSettings::from(ElmSymbolsSettings::default())
    }
}

impl From<ElmSymbolsSettings> for WorkspaceSettings {
    fn from(settings: ElmSymbolsSettings) -> Self {
        let defaults = CompilerCommand::default();
        let compiler = match settings.compiler {
            Some(config) => CompilerCommand {
                path: config.path.unwrap_or(defaults.path),
                args: config.args.unwrap_or(defaults.args),
                timeout: config
                    .timeout_ms
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.timeout),
            },
            None => defaults,
        };

        let virtual_imports = match settings.virtual_imports {
            Some(configs) => configs
                .iter()
                .filter_map(|config| match config.to_import() {
                    Ok(import) => Some(import),
                    Err(err) => {
                        log::warn!(target: "elm_symbols::config", "Skipping {}", err);
                        None
                    }
                })
                .collect(),
            None => crate::analysis::elm_default_imports(),
        };

        Self {
            parser_library: settings.parser_library.map(PathBuf::from),
            parser_symbol: settings
                .parser_symbol
                .unwrap_or_else(|| DEFAULT_LANGUAGE_SYMBOL.to_string()),
            compiler,
            virtual_imports,
        }
    }
}
