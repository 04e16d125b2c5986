//! Configuration files: the user-wide one and the reader shared with the
//! project layer.
//!
//! Location: $XDG_CONFIG_HOME/elm-symbols/elm-symbols.toml, falling back to
//! the platform config directory.

use super::settings::ElmSymbolsSettings;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "elm-symbols.toml";

#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type ConfigFileResult<T> = Result<T, ConfigFileError>;

/// Returns the path to the user configuration file, or None when no config
/// directory can be determined.
pub fn user_config_path() -> Option<PathBuf> {
    let base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg_config) if !xdg_config.is_empty() => PathBuf::from(xdg_config),
        _ => dirs::config_dir()?,
    };
    Some(base.join("elm-symbols").join(CONFIG_FILE_NAME))
}

/// Load the user config. A missing file is `Ok(None)`.
pub fn load_user_config() -> ConfigFileResult<Option<ElmSymbolsSettings>> {
    match user_config_path() {
        Some(path) => read_config_file(&path),
        None => Ok(None),
    }
}

/// Read one `elm-symbols.toml`. A missing file is `Ok(None)`.
pub fn read_config_file(path: &Path) -> ConfigFileResult<Option<ElmSymbolsSettings>> {
    if !path.is_file() {
        return Ok(None);
    }
    let contents = fs::read_to_string(path).map_err(|source| ConfigFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents)
        .map(Some)
        .map_err(|source| ConfigFileError::Parse {
            path: path.to_path_buf(),
            source,
        })
}
