//! Locale registry loading and phrase resolution.

#[cfg(test)]
mod tests;

use encoding_rs::Encoding;
use herald_core::config::{shellexpand, I18nConfig};
use herald_core::error::HeraldError;
use serde_yaml::Value;
use std::borrow::Cow;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info, warn};

use crate::accessor::LangAccessor;
use crate::args::Args;
use crate::catalogue::{self, LanguageDescriptor};
use crate::flatten::{flatten, PhraseTable};
use crate::format::{escape_html, render};

/// Catalogue file name inside the locale directory.
pub const CATALOGUE_FILE: &str = "_langs_list.json";

/// Phrase value prefix that loads the real text from a file.
pub const INCLUDE_PREFIX: &str = "+read!";

/// Placeholder prefix that embeds another phrase: `{_self.some.key}`.
pub const SELF_PREFIX: &str = "_self.";

/// Language code stored for users that have not picked a language yet.
const UNSET_LANGUAGE: &str = "--";

/// Common prefix of every not-found marker.
const NOT_FOUND: &str = "-- N/F [";

/// Whether `text` carries a not-found marker from a failed resolution.
pub fn is_unresolved(text: &str) -> bool {
    text.contains(NOT_FOUND)
}

/// Engine-wide behaviour switches.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// HTML-escape substitution values before formatting.
    pub escape_html: bool,
    /// Fallback for [`PhraseEngine::lang_or_default`].
    pub default_language: String,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            escape_html: false,
            default_language: "en".to_string(),
        }
    }
}

impl From<&I18nConfig> for EngineOptions {
    fn from(cfg: &I18nConfig) -> Self {
        Self {
            escape_html: cfg.escape_html,
            default_language: cfg.default.clone(),
        }
    }
}

/// One loaded language.
#[derive(Debug)]
struct Locale {
    descriptor: LanguageDescriptor,
    encoding: &'static Encoding,
    phrases: PhraseTable,
    /// Include-marker keys → file text, filled on first resolution.
    includes: HashMap<String, OnceLock<String>>,
}

/// The phrase registry: every loaded language with its flattened phrases.
///
/// Built once at startup and shared by reference. The only mutation after
/// load is the first-read fill of include files, which is convergent.
#[derive(Debug)]
pub struct PhraseEngine {
    root: PathBuf,
    options: EngineOptions,
    /// Loaded language codes, in catalogue order.
    order: Vec<String>,
    locales: HashMap<String, Locale>,
}

impl PhraseEngine {
    /// Load the catalogue under `root` and every language it lists.
    ///
    /// A missing or malformed catalogue is fatal. A language whose source is
    /// missing or broken is logged and left out.
    pub fn load(root: impl AsRef<Path>, options: EngineOptions) -> Result<Self, HeraldError> {
        let root = root.as_ref().to_path_buf();
        let catalogue_path = root.join(CATALOGUE_FILE);
        if !catalogue_path.is_file() {
            return Err(HeraldError::Locale(format!(
                "catalogue not found: {}",
                catalogue_path.display()
            )));
        }

        let content = std::fs::read_to_string(&catalogue_path).map_err(|e| {
            HeraldError::Locale(format!(
                "failed to read {}: {e}",
                catalogue_path.display()
            ))
        })?;
        let catalogue = catalogue::parse(&content).map_err(|e| {
            HeraldError::Locale(format!(
                "malformed catalogue {}: {e}",
                catalogue_path.display()
            ))
        })?;

        let mut order = Vec::with_capacity(catalogue.len());
        let mut locales = HashMap::with_capacity(catalogue.len());
        for descriptor in catalogue {
            let code = descriptor.code.clone();
            match load_locale(&root, descriptor) {
                Ok(locale) => {
                    info!(
                        "loaded locale {} {} ({} phrases)",
                        locale.descriptor.flag_glyph,
                        locale.descriptor.display_name,
                        locale.phrases.len()
                    );
                    order.push(code.clone());
                    locales.insert(code, locale);
                }
                Err(e) => warn!("skipping locale '{code}': {e}"),
            }
        }

        if !locales.contains_key(&options.default_language) {
            warn!(
                "default language '{}' is not loaded",
                options.default_language
            );
        }

        Ok(Self {
            root,
            options,
            order,
            locales,
        })
    }

    /// Build from the `[i18n]` config section.
    pub fn from_config(cfg: &I18nConfig) -> Result<Self, HeraldError> {
        Self::load(shellexpand(&cfg.directory), EngineOptions::from(cfg))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn default_language(&self) -> &str {
        &self.options.default_language
    }

    /// Loaded languages, in catalogue order.
    pub fn languages(&self) -> impl Iterator<Item = &LanguageDescriptor> + '_ {
        self.order
            .iter()
            .filter_map(|code| self.locales.get(code))
            .map(|locale| &locale.descriptor)
    }

    pub fn language(&self, code: &str) -> Option<&LanguageDescriptor> {
        self.locales.get(code).map(|locale| &locale.descriptor)
    }

    pub fn is_loaded(&self, code: &str) -> bool {
        self.locales.contains_key(code)
    }

    /// Sorted phrase keys of one language; empty for unknown languages.
    pub fn keys(&self, code: &str) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .locales
            .get(code)
            .map(|locale| locale.phrases.keys().map(String::as_str).collect())
            .unwrap_or_default();
        keys.sort_unstable();
        keys
    }

    /// Language-bound root accessor. Unknown languages resolve to markers.
    pub fn lang(&self, code: &str) -> LangAccessor<'_> {
        LangAccessor::new(self, code)
    }

    /// Like [`lang`](Self::lang), but refuses languages that are not loaded.
    pub fn try_lang(&self, code: &str) -> Result<LangAccessor<'_>, HeraldError> {
        if !self.is_loaded(code) {
            return Err(HeraldError::Locale(format!("language not loaded: {code}")));
        }
        Ok(self.lang(code))
    }

    /// Accessor for a user's stored language, falling back to the default
    /// when it is unset (`--`) or not loaded.
    pub fn lang_or_default(&self, code: &str) -> LangAccessor<'_> {
        if code != UNSET_LANGUAGE && self.is_loaded(code) {
            self.lang(code)
        } else {
            self.lang(&self.options.default_language)
        }
    }

    /// Resolve `key` in `lang` against `args`. Never fails.
    pub fn resolve(&self, lang: &str, key: &str, args: &Args) -> String {
        self.resolve_with(lang, key, args, true)
    }

    fn resolve_with(&self, lang: &str, key: &str, args: &Args, expand_self: bool) -> String {
        let Some(locale) = self.locales.get(lang) else {
            warn!("unknown language '{lang}' requested for '{key}'");
            return format!("{NOT_FOUND}{lang}] ? {key} --");
        };
        let Some(phrase) = locale.phrases.get(key) else {
            warn!("missing phrase '{key}' in '{lang}'");
            return format!("{NOT_FOUND}{lang}] {key} --");
        };

        let mut text = phrase.joined();
        if let Some(cell) = locale.includes.get(key) {
            match self.include_text(locale, key, &text, cell) {
                Ok(loaded) => text = Cow::Borrowed(loaded),
                Err(marker) => return marker,
            }
        }

        render(&text, |name| {
            if let Some(target) = name.strip_prefix(SELF_PREFIX) {
                // Embedded phrases are not expanded a second time.
                return Some(if expand_self {
                    self.resolve_with(lang, target, args, false)
                } else {
                    format!("{{{name}}}")
                });
            }
            args.get(name).map(|value| {
                if self.options.escape_html {
                    escape_html(value)
                } else {
                    value.to_string()
                }
            })
        })
    }

    /// Text of an include-marker phrase, read on first use.
    ///
    /// A missing file yields the not-found marker and is retried next time.
    fn include_text<'a>(
        &self,
        locale: &Locale,
        key: &str,
        marker: &str,
        cell: &'a OnceLock<String>,
    ) -> Result<&'a str, String> {
        if let Some(text) = cell.get() {
            return Ok(text.as_str());
        }

        let lang = &locale.descriptor.code;
        let relative = marker
            .strip_prefix(INCLUDE_PREFIX)
            .unwrap_or(marker)
            .trim();
        let path = self.root.join(relative);
        let not_found = || format!("{NOT_FOUND}{lang}] {key} (file: {relative}) --");
        if !path.is_file() {
            warn!("include file for '{key}' in '{lang}' not found: {}", path.display());
            return Err(not_found());
        }

        match read_encoded(&path, locale.encoding) {
            Ok(text) => {
                debug!("cached include {} for '{key}' in '{lang}'", path.display());
                // A concurrent first read may have stored the same text already.
                Ok(cell.get_or_init(|| text).as_str())
            }
            Err(e) => {
                warn!("failed to read include {}: {e}", path.display());
                Err(not_found())
            }
        }
    }

    /// Whether `key` is a leaf that needs no substitution arguments.
    pub(crate) fn is_plain(&self, lang: &str, key: &str) -> bool {
        let Some(locale) = self.locales.get(lang) else {
            return false;
        };
        let Some(phrase) = locale.phrases.get(key) else {
            return false;
        };
        match locale.includes.get(key) {
            Some(cell) => cell.get().is_some_and(|text| !text.contains('{')),
            None => !phrase.joined().contains('{'),
        }
    }
}

fn load_locale(root: &Path, descriptor: LanguageDescriptor) -> Result<Locale, HeraldError> {
    let path = root.join(format!("{}.yaml", descriptor.code));
    if !path.is_file() {
        return Err(HeraldError::Locale(format!(
            "source not found: {}",
            path.display()
        )));
    }

    let encoding = descriptor.text_encoding().ok_or_else(|| {
        HeraldError::Locale(format!("unknown encoding '{}'", descriptor.encoding))
    })?;
    let content = read_encoded(&path, encoding)?;
    let source: Value = serde_yaml::from_str(&content).map_err(|e| {
        HeraldError::Locale(format!("malformed source {}: {e}", path.display()))
    })?;

    let phrases = match source {
        Value::Mapping(map) => flatten(&map),
        Value::Null => PhraseTable::new(),
        _ => {
            return Err(HeraldError::Locale(format!(
                "source {} is not a mapping",
                path.display()
            )))
        }
    };

    let includes = phrases
        .iter()
        .filter(|(_, phrase)| phrase.joined().starts_with(INCLUDE_PREFIX))
        .map(|(key, _)| (key.clone(), OnceLock::new()))
        .collect();

    Ok(Locale {
        descriptor,
        encoding,
        phrases,
        includes,
    })
}

/// Read a file and decode it with `encoding`. A BOM, if present, wins.
fn read_encoded(path: &Path, encoding: &'static Encoding) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    let (text, used, had_errors) = encoding.decode(&bytes);
    if had_errors {
        warn!(
            "{}: malformed {} sequences replaced",
            path.display(),
            used.name()
        );
    }
    Ok(text.into_owned())
}
