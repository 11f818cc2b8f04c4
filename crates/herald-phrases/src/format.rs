//! Placeholder substitution for phrase templates.

use tracing::debug;

/// Render `template`, filling each `{name}` field through `lookup`.
///
/// `{{` and `}}` produce literal braces. A `:spec` or `!conv` suffix on a
/// field is dropped. Fields `lookup` cannot fill render as `--name--`.
/// An unterminated `{` is kept as-is.
pub(crate) fn render<F>(template: &str, mut lookup: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(pos) = rest.find(['{', '}']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        if let Some(after) = tail.strip_prefix("{{") {
            out.push('{');
            rest = after;
            continue;
        }
        if let Some(after) = tail.strip_prefix("}}") {
            out.push('}');
            rest = after;
            continue;
        }
        if let Some(after) = tail.strip_prefix('}') {
            out.push('}');
            rest = after;
            continue;
        }

        let body = &tail[1..];
        match body.find(['{', '}']) {
            Some(end) if body[end..].starts_with('}') => {
                let name = field_name(&body[..end]);
                match lookup(name) {
                    Some(value) => out.push_str(&value),
                    None => {
                        debug!("no value for placeholder '{name}'");
                        out.push_str("--");
                        out.push_str(name);
                        out.push_str("--");
                    }
                }
                rest = &body[end + 1..];
            }
            _ => {
                out.push('{');
                rest = body;
            }
        }
    }
    out.push_str(rest);
    out
}

fn field_name(field: &str) -> &str {
    field.split([':', '!']).next().unwrap_or(field)
}

/// Escape HTML special characters for Telegram's HTML parse mode.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
