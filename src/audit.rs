//! Translation audit: keys missing from a language, and phrases that do
//! not resolve cleanly (missing include files, dangling self-references).

use herald_phrases::{is_unresolved, Args, PhraseEngine};
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    /// Present in the default language, absent here.
    MissingKey,
    /// Resolves to (or embeds) a not-found marker.
    Unresolved(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub lang: String,
    pub key: String,
    pub kind: IssueKind,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            IssueKind::MissingKey => write!(f, "[{}] missing key: {}", self.lang, self.key),
            IssueKind::Unresolved(text) => {
                write!(f, "[{}] unresolved {}: {}", self.lang, self.key, text)
            }
        }
    }
}

/// Audit every loaded language against the engine's default language.
pub fn audit(engine: &PhraseEngine) -> Vec<Issue> {
    let reference: Vec<&str> = engine.keys(engine.default_language());
    let args = Args::new();
    let mut issues = Vec::new();

    for lang in engine.languages() {
        let code = lang.code.as_str();
        let keys = engine.keys(code);
        let present: HashSet<&str> = keys.iter().copied().collect();

        for key in &reference {
            if !present.contains(key) {
                issues.push(Issue {
                    lang: code.to_string(),
                    key: key.to_string(),
                    kind: IssueKind::MissingKey,
                });
            }
        }

        for key in keys {
            let text = engine.resolve(code, key, &args);
            if is_unresolved(&text) {
                issues.push(Issue {
                    lang: code.to_string(),
                    key: key.to_string(),
                    kind: IssueKind::Unresolved(text),
                });
            }
        }
    }
    issues
}
