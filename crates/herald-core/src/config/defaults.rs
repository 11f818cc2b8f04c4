//! Serde default value functions.

pub(super) fn default_name() -> String {
    "herald".to_string()
}

pub(super) fn default_log_level() -> String {
    "info".to_string()
}

pub(super) fn default_locale_dir() -> String {
    "locales".to_string()
}

pub(super) fn default_language() -> String {
    "en".to_string()
}

pub(super) fn default_log_file() -> String {
    "herald.log".to_string()
}
