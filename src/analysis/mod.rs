pub mod completion;
pub mod exposure;
pub mod exposure_cache;
pub mod hint;
pub mod virtual_imports;

pub use completion::{CandidateKind, CompletionCandidate, CompletionEngine};
pub use exposure::{
    DefinitionRef, ExposedConstructor, ExposedSymbol, ExposureTable, SymbolKind, resolve_exposure,
};
pub use exposure_cache::ExposureCache;
pub use hint::format_hint;
pub use virtual_imports::{VirtualImportRegistry, elm_default_imports, fold_repeated_imports};
