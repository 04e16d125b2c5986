pub mod loader;
pub mod parser;

pub use loader::{DEFAULT_LANGUAGE_SYMBOL, LoadedGrammar, ParserLoadError, load_grammar};
pub use parser::ElmParser;
