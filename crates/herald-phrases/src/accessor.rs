//! Chained phrase paths, resolved on demand.
//!
//! ```ignore
//! let en = engine.lang("en");
//! // Flat key.
//! let text = en.phrase("greeting.hello", &Args::new().with("name", "Ann"));
//! // Chained key; plain leaves come back already resolved.
//! let same = en.at("greeting").traverse("hello").resolve(&Args::new().with("name", "Ann"));
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Add;

use crate::args::Args;
use crate::catalogue::LanguageDescriptor;
use crate::engine::PhraseEngine;

/// Root accessor bound to one language.
#[derive(Clone)]
pub struct LangAccessor<'a> {
    engine: &'a PhraseEngine,
    lang: String,
}

impl<'a> LangAccessor<'a> {
    pub(crate) fn new(engine: &'a PhraseEngine, lang: &str) -> Self {
        Self {
            engine,
            lang: lang.to_string(),
        }
    }

    pub fn code(&self) -> &str {
        &self.lang
    }

    /// Catalogue entry, `None` if the language is not loaded.
    pub fn descriptor(&self) -> Option<&'a LanguageDescriptor> {
        self.engine.language(&self.lang)
    }

    /// Start a path at `segment`.
    pub fn at(&self, segment: &str) -> PathHandle<'a> {
        PathHandle {
            engine: self.engine,
            lang: self.lang.clone(),
            segments: vec![segment.to_string()],
        }
    }

    /// Resolve a flat dotted key.
    pub fn phrase(&self, key: &str, args: &Args) -> String {
        self.engine.resolve(&self.lang, key, args)
    }

    /// Resolve a flat dotted key without arguments.
    pub fn text(&self, key: &str) -> String {
        self.phrase(key, &Args::new())
    }
}

impl fmt::Debug for LangAccessor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LangAccessor")
            .field("lang", &self.lang)
            .finish()
    }
}

/// A partial or complete dotted key in one language.
///
/// Comparing, hashing, measuring or displaying a handle resolves it with
/// no arguments.
#[derive(Clone)]
pub struct PathHandle<'a> {
    engine: &'a PhraseEngine,
    lang: String,
    segments: Vec<String>,
}

impl<'a> PathHandle<'a> {
    pub fn lang(&self) -> &str {
        &self.lang
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The dotted key this handle names.
    pub fn key(&self) -> String {
        self.segments.join(".")
    }

    /// Extend the path by one segment.
    ///
    /// A leaf that needs no arguments comes back resolved as [`Node::Text`];
    /// anything else is a longer [`Node::Path`].
    pub fn traverse(&self, segment: &str) -> Node<'a> {
        let mut segments = self.segments.clone();
        segments.push(segment.to_string());
        let handle = PathHandle {
            engine: self.engine,
            lang: self.lang.clone(),
            segments,
        };

        let key = handle.key();
        if self.engine.is_plain(&self.lang, &key) {
            let text = self.engine.resolve(&self.lang, &key, &Args::new());
            Node::Text { handle, text }
        } else {
            Node::Path(handle)
        }
    }

    pub fn resolve(&self, args: &Args) -> String {
        self.engine.resolve(&self.lang, &self.key(), args)
    }

    /// Length in characters of the argument-free resolution.
    pub fn len(&self) -> usize {
        self.to_string().chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for PathHandle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.resolve(&Args::new()))
    }
}

impl fmt::Debug for PathHandle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathHandle")
            .field("lang", &self.lang)
            .field("key", &self.key())
            .finish()
    }
}

impl PartialEq for PathHandle<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for PathHandle<'_> {}

impl PartialEq<str> for PathHandle<'_> {
    fn eq(&self, other: &str) -> bool {
        self.to_string() == other
    }
}

impl PartialEq<&str> for PathHandle<'_> {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

impl PartialEq<String> for PathHandle<'_> {
    fn eq(&self, other: &String) -> bool {
        self.to_string() == *other
    }
}

impl Hash for PathHandle<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl Add<&str> for &PathHandle<'_> {
    type Output = String;

    fn add(self, rhs: &str) -> String {
        self.to_string() + rhs
    }
}

impl Add<&str> for PathHandle<'_> {
    type Output = String;

    fn add(self, rhs: &str) -> String {
        &self + rhs
    }
}

/// Result of one traversal step.
#[derive(Debug, Clone)]
pub enum Node<'a> {
    /// Argument-free leaf, already resolved.
    Text { handle: PathHandle<'a>, text: String },
    /// Not (yet) an argument-free leaf.
    Path(PathHandle<'a>),
}

impl<'a> Node<'a> {
    pub fn handle(&self) -> &PathHandle<'a> {
        match self {
            Self::Text { handle, .. } | Self::Path(handle) => handle,
        }
    }

    /// Continue the path. Past a leaf this names a key that does not exist.
    pub fn traverse(&self, segment: &str) -> Node<'a> {
        self.handle().traverse(segment)
    }

    /// The resolved text, if this step reached an argument-free leaf.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text, .. } => Some(text),
            Self::Path(_) => None,
        }
    }

    pub fn resolve(&self, args: &Args) -> String {
        match self {
            Self::Text { text, .. } => text.clone(),
            Self::Path(handle) => handle.resolve(args),
        }
    }

    pub fn into_string(self) -> String {
        match self {
            Self::Text { text, .. } => text,
            Self::Path(handle) => handle.to_string(),
        }
    }
}

impl fmt::Display for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text { text, .. } => f.write_str(text),
            Self::Path(handle) => fmt::Display::fmt(handle, f),
        }
    }
}

impl PartialEq<&str> for Node<'_> {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

impl PartialEq<String> for Node<'_> {
    fn eq(&self, other: &String) -> bool {
        self.to_string() == *other
    }
}

impl Add<&str> for Node<'_> {
    type Output = String;

    fn add(self, rhs: &str) -> String {
        self.into_string() + rhs
    }
}
