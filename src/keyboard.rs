//! Inline keyboard layouts built from the phrase engine.

use herald_phrases::{LangAccessor, PhraseEngine};

/// Callback-data prefix of language picker buttons.
const SET_LANG: &str = "set_lang";

/// Buttons per row in the language picker.
const LANGS_PER_ROW: usize = 2;

/// One inline keyboard button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub text: String,
    pub callback_data: String,
}

impl Button {
    pub fn new(text: impl Into<String>, callback_data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: callback_data.into(),
        }
    }
}

/// Rows of buttons, top to bottom.
pub type Keyboard = Vec<Vec<Button>>;

/// Language picker: one `"<flag> <native name>"` button per loaded language,
/// two per row. Choosing one continues with `next_step`.
pub fn language_keyboard(engine: &PhraseEngine, next_step: &str) -> Keyboard {
    let buttons: Vec<Button> = engine
        .languages()
        .map(|lang| {
            Button::new(
                lang.label(),
                format!("{SET_LANG}:{}:{next_step}", lang.code),
            )
        })
        .collect();
    buttons
        .chunks(LANGS_PER_ROW)
        .map(<[Button]>::to_vec)
        .collect()
}

/// Split `set_lang:<code>:<next>` callback data into `(code, next)`.
pub fn parse_set_lang(data: &str) -> Option<(&str, &str)> {
    let rest = data.strip_prefix(SET_LANG)?.strip_prefix(':')?;
    let (code, next) = rest.split_once(':')?;
    if code.is_empty() {
        return None;
    }
    Some((code, next))
}

/// A language picked from the picker, with the step to continue with.
#[derive(Debug)]
pub struct LanguageChoice<'a> {
    pub lang: LangAccessor<'a>,
    pub next_step: &'a str,
}

/// Handle `set_lang:<code>:<next>` callback data. `None` for other callbacks
/// and for languages that are not loaded.
pub fn set_language<'a>(engine: &'a PhraseEngine, data: &'a str) -> Option<LanguageChoice<'a>> {
    let (code, next_step) = parse_set_lang(data)?;
    let lang = engine.try_lang(code).ok()?;
    Some(LanguageChoice { lang, next_step })
}

/// Accept/decline keyboard for a `<callback_class>:accept|decline` prompt.
pub fn accept_keyboard(callback_class: &str, lang: &LangAccessor<'_>) -> Keyboard {
    let buttons = lang.at("buttons");
    vec![
        vec![Button::new(
            buttons.traverse("accept").into_string(),
            format!("{callback_class}:accept"),
        )],
        vec![Button::new(
            buttons.traverse("decline").into_string(),
            format!("{callback_class}:decline"),
        )],
    ]
}
