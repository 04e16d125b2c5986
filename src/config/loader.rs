//! Resolution of the settings a workspace runs with.
//!
//! Layers, lowest precedence first: built-in defaults, the user config, the
//! project's `elm-symbols.toml`, then JSON passed with `--settings`. A layer
//! that cannot be read or parsed is skipped and noted; resolution itself
//! always yields settings.

use super::defaults::default_settings;
use super::user::{CONFIG_FILE_NAME, load_user_config, read_config_file};
use super::{ElmSymbolsSettings, WorkspaceSettings, merge_all};
use std::fmt;
use std::path::Path;

/// A source of settings above the built-in defaults.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigLayer {
    User,
    Project,
    CommandLine,
}

impl fmt::Display for ConfigLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConfigLayer::User => "user config",
            ConfigLayer::Project => "project config",
            ConfigLayer::CommandLine => "--settings",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoteLevel {
    Info,
    Warning,
}

/// What happened to one layer while resolving.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerNote {
    pub layer: ConfigLayer,
    pub level: NoteLevel,
    pub message: String,
}

impl LayerNote {
    pub fn log(&self) {
        match self.level {
            NoteLevel::Info => {
                log::info!(target: "elm_symbols::config", "{}: {}", self.layer, self.message)
            }
            NoteLevel::Warning => {
                log::warn!(target: "elm_symbols::config", "{}: {}", self.layer, self.message)
            }
        }
    }

    pub fn is_warning(&self) -> bool {
        self.level == NoteLevel::Warning
    }
}

#[derive(Debug)]
pub struct ResolvedSettings {
    pub settings: WorkspaceSettings,
    pub notes: Vec<LayerNote>,
}

/// Resolve settings for the project at `root`, with `command_line` as the
/// top layer when given.
pub fn resolve_settings(root: Option<&Path>, command_line: Option<&str>) -> ResolvedSettings {
    let mut notes = Vec::new();

    let user = accept_layer(
        ConfigLayer::User,
        load_user_config().map_err(|err| err.to_string()),
        &mut notes,
    );
    let project = root.and_then(|root| {
        accept_layer(
            ConfigLayer::Project,
            read_config_file(&root.join(CONFIG_FILE_NAME)).map_err(|err| err.to_string()),
            &mut notes,
        )
    });
    let command_line = command_line.and_then(|json| {
        accept_layer(
            ConfigLayer::CommandLine,
            serde_json::from_str::<ElmSymbolsSettings>(json)
                .map(Some)
                .map_err(|err| format!("invalid JSON settings: {}", err)),
            &mut notes,
        )
    });

    let settings = merge_all(&[Some(default_settings()), user, project, command_line])
        .map(WorkspaceSettings::from)
        .unwrap_or_default();
    ResolvedSettings { settings, notes }
}

fn accept_layer(
    layer: ConfigLayer,
    loaded: Result<Option<ElmSymbolsSettings>, String>,
    notes: &mut Vec<LayerNote>,
) -> Option<ElmSymbolsSettings> {
    let (level, message, settings) = match loaded {
        Ok(None) => return None,
        Ok(Some(settings)) => (NoteLevel::Info, "applied".to_string(), Some(settings)),
        Err(message) => (NoteLevel::Warning, format!("skipped, {}", message), None),
    };
    notes.push(LayerNote {
        layer,
        level,
        message,
    });
    settings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{ExposingSpec, Import};
    use serial_test::serial;
    use std::env;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    /// Runs `f` with XDG_CONFIG_HOME pointed at `dir`, restoring it afterwards.
    fn with_user_config_dir<T>(dir: &Path, f: impl FnOnce() -> T) -> T {
        let original_xdg = env::var("XDG_CONFIG_HOME").ok();
        // SAFETY: #[serial(xdg_env)] prevents concurrent modification of XDG_CONFIG_HOME
        unsafe {
            env::set_var("XDG_CONFIG_HOME", dir);
        }
        let result = f();
        // SAFETY: #[serial(xdg_env)] prevents concurrent modification of XDG_CONFIG_HOME
        unsafe {
            match original_xdg {
                Some(val) => env::set_var("XDG_CONFIG_HOME", val),
                None => env::remove_var("XDG_CONFIG_HOME"),
            }
        }
        result
    }

    fn write_user_config(dir: &Path, contents: &str) {
        let config_dir = dir.join("elm-symbols");
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join(CONFIG_FILE_NAME), contents).unwrap();
    }

    fn layers(notes: &[LayerNote], level: NoteLevel) -> Vec<ConfigLayer> {
        notes
            .iter()
            .filter(|note| note.level == level)
            .map(|note| note.layer)
            .collect()
    }

    #[test]
    #[serial(xdg_env)]
    fn project_config_refines_user_config() {
        let user_dir = TempDir::new().unwrap();
        let project_dir = TempDir::new().unwrap();
        write_user_config(
            user_dir.path(),
            r#"
            parserLibrary = "/user/elm.so"

            [compiler]
            timeoutMs = 1000
            "#,
        );
        fs::write(
            project_dir.path().join(CONFIG_FILE_NAME),
            r#"
            [compiler]
            path = "./node_modules/.bin/elm-make"
            "#,
        )
        .unwrap();

        let resolved = with_user_config_dir(user_dir.path(), || {
            resolve_settings(Some(project_dir.path()), None)
        });

        let settings = resolved.settings;
        assert_eq!(
            settings.parser_library.as_deref(),
            Some(Path::new("/user/elm.so"))
        );
        assert_eq!(settings.compiler.path, "./node_modules/.bin/elm-make");
        assert_eq!(settings.compiler.timeout, Duration::from_millis(1000));
        assert_eq!(
            layers(&resolved.notes, NoteLevel::Info),
            vec![ConfigLayer::User, ConfigLayer::Project]
        );
        assert!(layers(&resolved.notes, NoteLevel::Warning).is_empty());
    }

    #[test]
    #[serial(xdg_env)]
    fn command_line_json_wins_over_files() {
        let user_dir = TempDir::new().unwrap();
        let project_dir = TempDir::new().unwrap();
        fs::write(
            project_dir.path().join(CONFIG_FILE_NAME),
            r#"
            [[virtualImports]]
            module = "Basics"
            exposing = ".."

            [compiler]
            path = "elm-make-0.18"
            "#,
        )
        .unwrap();

        let resolved = with_user_config_dir(user_dir.path(), || {
            resolve_settings(
                Some(project_dir.path()),
                Some(r#"{ "virtualImports": [ { "module": "Html", "exposing": ["Html", "div"] } ] }"#),
            )
        });

        assert_eq!(
            resolved.settings.virtual_imports,
            vec![Import::new("Html").with_exposing(ExposingSpec::explicit(["Html", "div"]))]
        );
        assert_eq!(resolved.settings.compiler.path, "elm-make-0.18");
        assert_eq!(
            layers(&resolved.notes, NoteLevel::Info),
            vec![ConfigLayer::Project, ConfigLayer::CommandLine]
        );
    }

    #[test]
    #[serial(xdg_env)]
    fn broken_layers_are_skipped_with_a_warning() {
        let user_dir = TempDir::new().unwrap();
        let project_dir = TempDir::new().unwrap();
        write_user_config(user_dir.path(), "parserLibrary = [");
        fs::write(project_dir.path().join(CONFIG_FILE_NAME), "compiler = 3").unwrap();

        let resolved = with_user_config_dir(user_dir.path(), || {
            resolve_settings(Some(project_dir.path()), Some(r#"{ "parserLibrary": 42 }"#))
        });

        assert_eq!(
            layers(&resolved.notes, NoteLevel::Warning),
            vec![
                ConfigLayer::User,
                ConfigLayer::Project,
                ConfigLayer::CommandLine
            ]
        );
        assert!(resolved.notes[2].message.contains("invalid JSON settings"));
        assert_eq!(resolved.settings, WorkspaceSettings::default());
    }

    #[test]
    #[serial(xdg_env)]
    fn without_any_config_defaults_apply() {
        let user_dir = TempDir::new().unwrap();
        let resolved = with_user_config_dir(user_dir.path(), || resolve_settings(None, None));
        assert!(resolved.notes.is_empty());
        assert_eq!(resolved.settings, WorkspaceSettings::default());
    }

    #[test]
    fn layer_names_appear_in_messages() {
        assert_eq!(ConfigLayer::User.to_string(), "user config");
        assert_eq!(ConfigLayer::CommandLine.to_string(), "--settings");
    }
}
