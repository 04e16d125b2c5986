pub mod defaults;
pub mod loader;
pub mod settings;
pub mod user;

pub use loader::{ConfigLayer, LayerNote, NoteLevel, ResolvedSettings, resolve_settings};
pub use settings::{
    CompilerConfig, ElmSymbolsSettings, ExposingConfig, VirtualImportConfig, WorkspaceSettings,
};
pub use user::{
    CONFIG_FILE_NAME, ConfigFileError, ConfigFileResult, load_user_config, read_config_file,
    user_config_path,
};

/// Merge multiple settings layers in order.
/// Later configs in the slice have higher precedence.
/// Use this for layered config: `merge_all(&[defaults, user, project, session])`
pub fn merge_all(configs: &[Option<ElmSymbolsSettings>]) -> Option<ElmSymbolsSettings> {
    configs.iter().cloned().reduce(merge_settings).flatten()
}

/// Merge two settings, preferring values from `primary` over `fallback`
pub fn merge_settings(
    fallback: Option<ElmSymbolsSettings>,
    primary: Option<ElmSymbolsSettings>,
) -> Option<ElmSymbolsSettings> {
    match (fallback, primary) {
        (None, None) => None,
        (Some(settings), None) => Some(settings),
        (None, Some(settings)) => Some(settings),
        (Some(fallback), Some(primary)) => Some(ElmSymbolsSettings {
            parser_library: primary.parser_library.or(fallback.parser_library),
            parser_symbol: primary.parser_symbol.or(fallback.parser_symbol),
            compiler: merge_compiler(fallback.compiler, primary.compiler),
            // A list replaces the lower layer's list wholesale
            virtual_imports: primary.virtual_imports.or(fallback.virtual_imports),
        }),
    }
}

fn merge_compiler(
    fallback: Option<CompilerConfig>,
    primary: Option<CompilerConfig>,
) -> Option<CompilerConfig> {
    match (fallback, primary) {
        (None, None) => None,
        (Some(config), None) | (None, Some(config)) => Some(config),
        (Some(fallback), Some(primary)) => Some(CompilerConfig {
            path: primary.path.or(fallback.path),
            args: primary.args.or(fallback.args),
            timeout_ms: primary.timeout_ms.or(fallback.timeout_ms),
        }),
    }
}
