//! Error handling types for elm-symbols
//!
//! Completion never surfaces these errors to its callers; they are used by the
//! indexing, parsing, configuration and process-running layers.

use std::sync::PoisonError;
use thiserror::Error;

/// Crate-wide error type
#[derive(Debug, Error)]
pub enum ElmSymbolsError {
    /// The Elm grammar could not be loaded from a shared library
    #[error("Failed to load parser from {path}: {message}")]
    ParserLoad { path: String, message: String },

    /// Source text could not be turned into a syntax tree
    #[error("Failed to parse {uri}: {message}")]
    Parse { uri: String, message: String },

    /// Configuration error
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// Document not found in the forest
    #[error("Document not found: {uri}")]
    DocumentNotFound { uri: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for elm-symbols operations
pub type Result<T> = std::result::Result<T, ElmSymbolsError>;

/// Poisoned-lock recovery for `Mutex::lock` results
pub trait LockResultExt<T> {
    /// The guard, recovered from a poisoned lock if needed. Logs which
    /// operation hit the poison.
    fn recover_poison(self, context: &str) -> T;
}

impl<T> LockResultExt<T> for std::result::Result<T, PoisonError<T>> {
    fn recover_poison(self, context: &str) -> T {
        match self {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!(
                    target: "elm_symbols::lock_recovery",
                    "Recovered from poisoned lock in {}",
                    context
                );
                poisoned.into_inner()
            }
        }
    }
}

impl ElmSymbolsError {
    pub fn parser_load(path: impl Into<String>, message: impl Into<String>) -> Self {
        ElmSymbolsError::ParserLoad {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn parse(uri: impl Into<String>, message: impl Into<String>) -> Self {
        ElmSymbolsError::Parse {
            uri: uri.into(),
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        ElmSymbolsError::Config {
            message: message.into(),
        }
    }

    pub fn document_not_found(uri: impl Into<String>) -> Self {
        ElmSymbolsError::DocumentNotFound { uri: uri.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ElmSymbolsError::Internal(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn recover_poison_returns_inner_guard() {
        let shared = Arc::new(Mutex::new(41));
        let poisoner = Arc::clone(&shared);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        let mut guard = shared.lock().recover_poison("test");
        *guard += 1;
        assert_eq!(*guard, 42);
    }

    #[test]
    fn error_messages_name_the_subject() {
        let err = ElmSymbolsError::document_not_found("file:///src/Main.elm");
        assert_eq!(err.to_string(), "Document not found: file:///src/Main.elm");

        let err = ElmSymbolsError::parser_load("/tmp/elm.so", "no such file");
        assert_eq!(
            err.to_string(),
            "Failed to load parser from /tmp/elm.so: no such file"
        );
    }
}
