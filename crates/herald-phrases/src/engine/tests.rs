use super::*;
use tempfile::TempDir;

const EN_ONLY: &str = r#"{"en": {"name": "English", "native_name": "English", "code": "en", "flag": "🇬🇧", "encoding": "utf-8"}}"#;

/// Write `files` (relative path, content) under a fresh temp dir.
fn fixture(files: &[(&str, &str)]) -> TempDir {
    let tmp = tempfile::tempdir().unwrap();
    for (rel, content) in files {
        let path = tmp.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }
    tmp
}

fn load(tmp: &TempDir) -> PhraseEngine {
    PhraseEngine::load(tmp.path(), EngineOptions::default()).unwrap()
}

fn no_args() -> Args {
    Args::new()
}

#[test]
fn test_end_to_end_greeting() {
    let tmp = fixture(&[
        (CATALOGUE_FILE, EN_ONLY),
        ("en.yaml", "greeting:\n  hello: 'Hi {name}!'\n"),
    ]);
    let engine = load(&tmp);

    assert_eq!(
        engine.resolve("en", "greeting.hello", &Args::new().with("name", "Ann")),
        "Hi Ann!"
    );
    let missing = engine.resolve("en", "greeting.bye", &no_args());
    assert!(missing.contains("greeting.bye"), "got: {missing}");
    assert!(is_unresolved(&missing));
}

#[test]
fn test_unknown_language_marker() {
    let tmp = fixture(&[(CATALOGUE_FILE, EN_ONLY), ("en.yaml", "a: A\n")]);
    let engine = load(&tmp);

    for key in ["a", "x.y.z", ""] {
        let text = engine.resolve("xx", key, &no_args());
        assert!(text.contains("xx"), "got: {text}");
        assert!(text.contains(key), "got: {text}");
        assert!(is_unresolved(&text));
    }
}

#[test]
fn test_unknown_key_marker() {
    let tmp = fixture(&[(CATALOGUE_FILE, EN_ONLY), ("en.yaml", "a: A\n")]);
    let engine = load(&tmp);
    let text = engine.resolve("en", "not.a.key", &no_args());
    assert_eq!(text, "-- N/F [en] not.a.key --");
}

#[test]
fn test_missing_placeholder_marker() {
    let tmp = fixture(&[(CATALOGUE_FILE, EN_ONLY), ("en.yaml", "hello: 'Hello {name}'\n")]);
    let engine = load(&tmp);
    let text = engine.resolve("en", "hello", &no_args());
    assert!(text.contains("--name--"));
    assert!(!text.contains('{') && !text.contains('}'), "got: {text}");
}

#[test]
fn test_sequence_leaf_joined_with_newline() {
    let tmp = fixture(&[
        (CATALOGUE_FILE, EN_ONLY),
        ("en.yaml", "help:\n  - line1\n  - line2\n"),
    ]);
    let engine = load(&tmp);
    assert_eq!(engine.resolve("en", "help", &no_args()), "line1\nline2");
}

#[test]
fn test_sequence_lines_are_formatted() {
    let tmp = fixture(&[
        (CATALOGUE_FILE, EN_ONLY),
        ("en.yaml", "status:\n  - 'User: {user}'\n  - 'Plan: {plan}'\n"),
    ]);
    let engine = load(&tmp);
    let args = Args::new().with("user", "ann").with("plan", "pro");
    assert_eq!(engine.resolve("en", "status", &args), "User: ann\nPlan: pro");
}

#[test]
fn test_plain_phrase_is_stable() {
    let tmp = fixture(&[(CATALOGUE_FILE, EN_ONLY), ("en.yaml", "a:\n  b: Static text\n")]);
    let engine = load(&tmp);
    let first = engine.resolve("en", "a.b", &no_args());
    for _ in 0..5 {
        assert_eq!(engine.resolve("en", "a.b", &no_args()), first);
    }
    assert_eq!(first, "Static text");
}

#[test]
fn test_include_is_read_once() {
    let tmp = fixture(&[
        (CATALOGUE_FILE, EN_ONLY),
        ("en.yaml", "rules:\n  text: '+read!texts/rules.txt'\n"),
        ("texts/rules.txt", "Be kind, {name}."),
    ]);
    let engine = load(&tmp);
    let args = Args::new().with("name", "Ann");

    let first = engine.resolve("en", "rules.text", &args);
    assert_eq!(first, "Be kind, Ann.");

    // The cached copy survives the file going away.
    std::fs::remove_file(tmp.path().join("texts/rules.txt")).unwrap();
    let second = engine.resolve("en", "rules.text", &args);
    assert_eq!(first, second);
}

#[test]
fn test_missing_include_is_retried() {
    let tmp = fixture(&[
        (CATALOGUE_FILE, EN_ONLY),
        ("en.yaml", "rules: '+read! texts/late.txt'\n"),
    ]);
    let engine = load(&tmp);

    let text = engine.resolve("en", "rules", &no_args());
    assert_eq!(text, "-- N/F [en] rules (file: texts/late.txt) --");

    std::fs::create_dir_all(tmp.path().join("texts")).unwrap();
    std::fs::write(tmp.path().join("texts/late.txt"), "Now here").unwrap();
    assert_eq!(engine.resolve("en", "rules", &no_args()), "Now here");
}

#[test]
fn test_include_uses_language_encoding() {
    let catalogue = r#"{"ru": {"name": "Russian", "native_name": "Русский", "code": "ru", "flag": "🇷🇺", "encoding": "windows-1251"}}"#;
    let tmp = fixture(&[(CATALOGUE_FILE, catalogue)]);
    let (source, _, _) = encoding_rs::WINDOWS_1251.encode("rules: '+read!rules_ru.txt'\ntitle: Правила\n");
    std::fs::write(tmp.path().join("ru.yaml"), source).unwrap();
    let (body, _, _) = encoding_rs::WINDOWS_1251.encode("Привет, {name}!");
    std::fs::write(tmp.path().join("rules_ru.txt"), body).unwrap();

    let engine = load(&tmp);
    assert_eq!(engine.resolve("ru", "title", &no_args()), "Правила");
    assert_eq!(
        engine.resolve("ru", "rules", &Args::new().with("name", "Аня")),
        "Привет, Аня!"
    );
}

#[test]
fn test_concurrent_first_include_reads_converge() {
    let tmp = fixture(&[
        (CATALOGUE_FILE, EN_ONLY),
        ("en.yaml", "long: '+read!long.txt'\n"),
        ("long.txt", "line\n".repeat(1000).as_str()),
    ]);
    let engine = load(&tmp);
    let expected = "line\n".repeat(1000);

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(|| engine.resolve("en", "long", &no_args())))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn test_self_reference_expands_once() {
    let tmp = fixture(&[
        (CATALOGUE_FILE, EN_ONLY),
        (
            "en.yaml",
            "brand: Herald\nwelcome: 'Welcome to {_self.brand}, {name}!'\nnested: 'Note: {_self.welcome}'\n",
        ),
    ]);
    let engine = load(&tmp);
    let args = Args::new().with("name", "Ann");

    assert_eq!(
        engine.resolve("en", "welcome", &args),
        "Welcome to Herald, Ann!"
    );

    // One level only: the embedded phrase keeps its own token.
    let nested = engine.resolve("en", "nested", &args);
    assert_eq!(nested, "Note: Welcome to {_self.brand}, Ann!");
    assert_eq!(nested.matches("Welcome").count(), 1);
}

#[test]
fn test_self_reference_cycle_terminates() {
    let tmp = fixture(&[
        (CATALOGUE_FILE, EN_ONLY),
        ("en.yaml", "a: 'A{_self.b}'\nb: 'B{_self.a}'\nme: 'x{_self.me}'\n"),
    ]);
    let engine = load(&tmp);
    assert_eq!(engine.resolve("en", "a", &no_args()), "AB{_self.a}");
    assert_eq!(engine.resolve("en", "me", &no_args()), "xx{_self.me}");
}

#[test]
fn test_self_reference_to_missing_key() {
    let tmp = fixture(&[(CATALOGUE_FILE, EN_ONLY), ("en.yaml", "a: 'See {_self.gone}'\n")]);
    let engine = load(&tmp);
    let text = engine.resolve("en", "a", &no_args());
    assert_eq!(text, "See -- N/F [en] gone --");
    assert!(is_unresolved(&text));
}

#[test]
fn test_escape_html_applies_to_values_only() {
    let tmp = fixture(&[
        (CATALOGUE_FILE, EN_ONLY),
        ("en.yaml", "hi: '<b>Hi</b> {name}'\n"),
    ]);
    let options = EngineOptions {
        escape_html: true,
        ..EngineOptions::default()
    };
    let engine = PhraseEngine::load(tmp.path(), options).unwrap();
    let text = engine.resolve("en", "hi", &Args::new().with("name", "<script>&"));
    assert_eq!(text, "<b>Hi</b> &lt;script&gt;&amp;");

    let raw = load(&tmp).resolve("en", "hi", &Args::new().with("name", "<i>"));
    assert_eq!(raw, "<b>Hi</b> <i>");
}

#[test]
fn test_missing_catalogue_is_fatal() {
    let tmp = fixture(&[("en.yaml", "a: A\n")]);
    let err = PhraseEngine::load(tmp.path(), EngineOptions::default()).unwrap_err();
    assert!(
        matches!(err, HeraldError::Locale(ref msg) if msg.contains("catalogue not found")),
        "unexpected error: {err}"
    );
}

#[test]
fn test_malformed_catalogue_is_fatal() {
    let tmp = fixture(&[(CATALOGUE_FILE, "{\"en\": ")]);
    let err = PhraseEngine::load(tmp.path(), EngineOptions::default()).unwrap_err();
    assert!(
        matches!(err, HeraldError::Locale(ref msg) if msg.contains("malformed catalogue")),
        "unexpected error: {err}"
    );
}

#[test]
fn test_broken_languages_are_dropped() {
    let catalogue = r#"{
        "en": {"name": "English", "native_name": "English", "flag": "🇬🇧"},
        "de": {"name": "German", "native_name": "Deutsch", "flag": "🇩🇪"},
        "fr": {"name": "French", "native_name": "Français", "flag": "🇫🇷"},
        "es": {"name": "Spanish", "native_name": "Español", "flag": "🇪🇸"},
        "it": {"name": "Italian", "native_name": "Italiano", "flag": "🇮🇹", "encoding": "klingon"}
    }"#;
    let tmp = fixture(&[
        (CATALOGUE_FILE, catalogue),
        ("en.yaml", "a: A\n"),
        // de.yaml missing
        ("fr.yaml", "a: [unclosed\n"),
        ("es.yaml", "- just\n- a list\n"),
        ("it.yaml", "a: A\n"),
    ]);
    let engine = load(&tmp);

    let codes: Vec<&str> = engine.languages().map(|l| l.code.as_str()).collect();
    assert_eq!(codes, ["en"]);
    for dropped in ["de", "fr", "es", "it"] {
        assert!(!engine.is_loaded(dropped));
        let text = engine.resolve(dropped, "a", &no_args());
        assert!(text.contains(dropped) && text.contains('?'), "got: {text}");
    }
    assert_eq!(engine.resolve("en", "a", &no_args()), "A");
}

#[test]
fn test_empty_source_loads_empty_table() {
    let tmp = fixture(&[(CATALOGUE_FILE, EN_ONLY), ("en.yaml", "")]);
    let engine = load(&tmp);
    assert!(engine.is_loaded("en"));
    assert!(engine.keys("en").is_empty());
}

#[test]
fn test_languages_keep_catalogue_order() {
    let catalogue = r#"{
        "uk": {"name": "Ukrainian", "native_name": "Українська", "flag": "🇺🇦"},
        "en": {"name": "English", "native_name": "English", "flag": "🇬🇧"},
        "de": {"name": "German", "native_name": "Deutsch", "flag": "🇩🇪"}
    }"#;
    let tmp = fixture(&[
        (CATALOGUE_FILE, catalogue),
        ("uk.yaml", "a: А\n"),
        ("en.yaml", "a: A\n"),
        ("de.yaml", "a: A\n"),
    ]);
    let engine = load(&tmp);
    let codes: Vec<&str> = engine.languages().map(|l| l.code.as_str()).collect();
    assert_eq!(codes, ["uk", "en", "de"]);
    assert_eq!(
        engine.language("uk").map(|l| l.native_name.as_str()),
        Some("Українська")
    );
}

#[test]
fn test_keys_sorted() {
    let tmp = fixture(&[
        (CATALOGUE_FILE, EN_ONLY),
        ("en.yaml", "b:\n  y: 1\n  x: 2\na: 3\n"),
    ]);
    let engine = load(&tmp);
    assert_eq!(engine.keys("en"), ["a", "b.x", "b.y"]);
    assert!(engine.keys("xx").is_empty());
}

#[test]
fn test_lang_selection_helpers() {
    let tmp = fixture(&[(CATALOGUE_FILE, EN_ONLY), ("en.yaml", "a: A\n")]);
    let engine = load(&tmp);

    assert!(engine.try_lang("en").is_ok());
    assert!(matches!(
        engine.try_lang("xx"),
        Err(HeraldError::Locale(_))
    ));
    assert_eq!(engine.lang_or_default("--").code(), "en");
    assert_eq!(engine.lang_or_default("xx").code(), "en");
    assert_eq!(engine.lang_or_default("en").code(), "en");
    assert_eq!(engine.default_language(), "en");
}

#[test]
fn test_plain_detection() {
    let tmp = fixture(&[
        (CATALOGUE_FILE, EN_ONLY),
        (
            "en.yaml",
            "plain: Hi\nargs: 'Hi {name}'\ninc: '+read!inc.txt'\nlines: [a, b]\n",
        ),
        ("inc.txt", "Included"),
    ]);
    let engine = load(&tmp);
    assert!(engine.is_plain("en", "plain"));
    assert!(engine.is_plain("en", "lines"));
    assert!(!engine.is_plain("en", "args"));
    assert!(!engine.is_plain("en", "missing"));
    assert!(!engine.is_plain("xx", "plain"));

    // Includes become plain once their text is known to need no arguments.
    assert!(!engine.is_plain("en", "inc"));
    assert_eq!(engine.resolve("en", "inc", &no_args()), "Included");
    assert!(engine.is_plain("en", "inc"));
}

#[test]
fn test_options_from_config() {
    let cfg = I18nConfig {
        directory: "locales".into(),
        default: "ru".into(),
        escape_html: true,
    };
    let options = EngineOptions::from(&cfg);
    assert!(options.escape_html);
    assert_eq!(options.default_language, "ru");
}
