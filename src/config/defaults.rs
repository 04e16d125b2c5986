//! Built-in defaults, the lowest settings layer.

use super::settings::{CompilerConfig, ElmSymbolsSettings};
use crate::diagnostics::CompilerCommand;
use crate::language::DEFAULT_LANGUAGE_SYMBOL;

/// Defaults for everything except `virtual_imports`, which stays unset so
/// the Elm default imports apply unless a layer replaces them.
pub fn default_settings() -> ElmSymbolsSettings {
    let compiler = CompilerCommand::default();
    ElmSymbolsSettings {
        parser_library: None,
        parser_symbol: Some(DEFAULT_LANGUAGE_SYMBOL.to_string()),
        compiler: Some(CompilerConfig {
            path: Some(compiler.path),
            args: Some(compiler.args),
            timeout_ms: Some(compiler.timeout.as_millis() as u64),
        }),
        virtual_imports: None,
    }
}
