//! Language catalogue (`_langs_list.json`).

use encoding_rs::Encoding;
use herald_core::error::HeraldError;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One catalogue entry. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageDescriptor {
    /// Language code; defaults to the catalogue key.
    #[serde(default)]
    pub code: String,
    /// English display name.
    #[serde(rename = "name")]
    pub display_name: String,
    /// Name of the language in itself.
    pub native_name: String,
    #[serde(rename = "flag")]
    pub flag_glyph: String,
    /// WHATWG encoding label for the language's files.
    #[serde(default = "default_encoding")]
    pub encoding: String,
}

fn default_encoding() -> String {
    "utf-8".to_string()
}

impl LanguageDescriptor {
    /// Resolve the declared encoding label, `None` if unknown.
    pub fn text_encoding(&self) -> Option<&'static Encoding> {
        Encoding::for_label(self.encoding.trim().as_bytes())
    }

    /// Label for a language picker: `"<flag> <native name>"`.
    pub fn label(&self) -> String {
        format!("{} {}", self.flag_glyph, self.native_name)
    }
}

/// Parse the catalogue, keeping the file's entry order.
pub(crate) fn parse(content: &str) -> Result<Vec<LanguageDescriptor>, HeraldError> {
    let entries: serde_json::Map<String, serde_json::Value> = serde_json::from_str(content)?;
    let mut languages = Vec::with_capacity(entries.len());
    for (code, value) in entries {
        let mut descriptor: LanguageDescriptor = serde_json::from_value(value)?;
        if descriptor.code.trim().is_empty() {
            descriptor.code = code;
        } else if descriptor.code != code {
            warn!(
                "catalogue entry '{code}' declares code '{}', using '{code}'",
                descriptor.code
            );
            descriptor.code = code;
        }
        languages.push(descriptor);
    }
    Ok(languages)
}
