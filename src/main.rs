mod audit;
mod keyboard;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use herald_core::config::{self, shellexpand, Config};
use herald_phrases::{Args, PhraseEngine};
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(
    name = "herald",
    version,
    about = "Herald — notification and subscription bot"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// List the loaded languages.
    Langs,
    /// Resolve one phrase.
    Get {
        /// Language code (e.g. `en`).
        lang: String,
        /// Dotted phrase key (e.g. `greeting.hello`).
        key: String,
        /// Substitutions as `name=value`.
        #[arg(trailing_var_arg = true)]
        args: Vec<String>,
    },
    /// Preview the language picker and the rules prompt in one language.
    Keyboard {
        /// Language for the rules prompt.
        lang: String,
        /// Step that follows the language choice.
        #[arg(long, default_value = "rules")]
        next: String,
    },
    /// Handle a language picker callback (`set_lang:<code>:<next>`).
    Callback {
        /// Raw callback data.
        data: String,
    },
    /// Report missing keys and unresolvable phrases.
    Audit,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(&cli.config)?;
    let _guard = init_logging(&cfg)?;

    // Built once, shared by every consumer.
    let engine = Arc::new(
        PhraseEngine::from_config(&cfg.i18n).context("failed to load phrase catalogue")?,
    );
    tracing::info!(
        "{} phrase engine ready: {} language(s) from {}",
        cfg.herald.name,
        engine.languages().count(),
        engine.root().display()
    );

    match cli.command {
        Commands::Langs => {
            for lang in engine.languages() {
                let marker = if lang.code == engine.default_language() {
                    " (default)"
                } else {
                    ""
                };
                println!(
                    "{} {:<6} {} / {} [{}]{marker}",
                    lang.flag_glyph, lang.code, lang.display_name, lang.native_name, lang.encoding
                );
            }
        }
        Commands::Get { lang, key, args } => {
            let args = parse_args(&args)?;
            println!("{}", engine.resolve(&lang, &key, &args));
        }
        Commands::Keyboard { lang, next } => {
            print_keyboard(&keyboard::language_keyboard(&engine, &next));
            println!();
            let lang = engine.lang_or_default(&lang);
            println!("{}", lang.text("rules.greeting"));
            print_keyboard(&keyboard::accept_keyboard("rules", &lang));
        }
        Commands::Callback { data } => {
            let Some(choice) = keyboard::set_language(&engine, &data) else {
                anyhow::bail!("unsupported callback or language: {data}");
            };
            if let Some(lang) = choice.lang.descriptor() {
                println!("{} ({})", lang.label(), lang.code);
            }
            println!("{}", choice.lang.text("select_lang.selected"));
            match choice.next_step {
                "rules" => {
                    println!("{}", choice.lang.text("rules.greeting"));
                    print_keyboard(&keyboard::accept_keyboard("rules", &choice.lang));
                }
                _ => println!("{}", choice.lang.text("error.internal_error")),
            }
        }
        Commands::Audit => {
            let issues = audit::audit(&engine);
            for issue in &issues {
                println!("{issue}");
            }
            if !issues.is_empty() {
                anyhow::bail!("{} translation issue(s) found", issues.len());
            }
            println!("No issues found.");
        }
    }

    Ok(())
}

/// Install the console layer and, when configured, a file layer.
fn init_logging(cfg: &Config) -> anyhow::Result<Option<WorkerGuard>> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.herald.log_level));

    let (file_layer, guard) = match &cfg.log.directory {
        Some(dir) => {
            let dir = shellexpand(dir);
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create log directory {dir}"))?;
            let appender = tracing_appender::rolling::never(&dir, &cfg.log.file);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    Ok(guard)
}

/// Parse `name=value` pairs into substitution arguments.
fn parse_args(pairs: &[String]) -> anyhow::Result<Args> {
    let mut args = Args::new();
    for pair in pairs {
        let Some((name, value)) = pair.split_once('=') else {
            anyhow::bail!("invalid argument '{pair}', expected name=value");
        };
        args.insert(name.trim(), value);
    }
    Ok(args)
}

fn print_keyboard(kb: &keyboard::Keyboard) {
    for row in kb {
        let cells: Vec<String> = row
            .iter()
            .map(|b| format!("[{}]({})", b.text, b.callback_data))
            .collect();
        println!("{}", cells.join("  "));
    }
}
