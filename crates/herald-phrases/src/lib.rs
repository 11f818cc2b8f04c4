//! # herald-phrases
//!
//! Hierarchical, lazily-resolved phrase engine for Herald.
//!
//! Locale sources are nested YAML documents flattened into dotted keys at
//! startup. Phrases are resolved on demand, either through a flat key
//! (`engine.resolve("en", "rules.greeting", &args)`) or through a chained
//! accessor (`engine.lang("en").at("rules").traverse("greeting")`).
//!
//! Resolution never fails: unknown languages, unknown keys, missing include
//! files and unfilled placeholders all degrade to visible inline markers.

mod accessor;
mod args;
mod catalogue;
mod engine;
mod flatten;
mod format;

// Re-export public API — all consumers use `herald_phrases::*` paths.
pub use accessor::{LangAccessor, Node, PathHandle};
pub use args::Args;
pub use catalogue::LanguageDescriptor;
pub use engine::{
    is_unresolved, EngineOptions, PhraseEngine, CATALOGUE_FILE, INCLUDE_PREFIX, SELF_PREFIX,
};
pub use flatten::{flatten, Phrase, PhraseTable};
pub use format::escape_html;
