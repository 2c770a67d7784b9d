use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use lingo_i18n::config::ENV_LOCALE;
use lingo_i18n::{
    Catalog, FilePreferences, I18nConfig, LOCALE_PREFERENCE_KEY, LocaleCode, LocaleStore,
    PreferenceStore, Resolver, fill,
};
use tracing::level_filters::LevelFilter;

#[derive(Debug, Parser)]
#[command(
    name = "lingo",
    about = "Resolve dotted translation keys against the selected locale"
)]
struct Cli {
    /// Optional TOML config file. Environment variables override its values.
    #[arg(long = "config", value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Directory of <code>.json translation tables (defaults to the bundled set)
    #[arg(long = "catalog-dir", value_name = "DIR", global = true)]
    catalog_dir: Option<PathBuf>,

    /// Preferences file holding the persisted locale
    #[arg(long = "prefs", value_name = "PATH", global = true)]
    prefs: Option<PathBuf>,

    /// Locale for this invocation only; not persisted
    #[arg(long = "locale", value_name = "CODE", global = true)]
    locale: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the translation for each key (the key itself when missing)
    Translate {
        #[arg(value_name = "KEY", required = true)]
        keys: Vec<String>,

        /// Placeholder value as NAME=VALUE (repeatable)
        #[arg(long = "arg", value_name = "NAME=VALUE", value_parser = parse_arg)]
        args: Vec<(String, String)>,
    },
    /// List selectable locales; the active one is marked with `*`
    Locales,
    /// Switch to a locale and remember it
    Use {
        #[arg(value_name = "CODE")]
        code: String,
    },
    /// Report keys missing from, or extra in, each locale
    Coverage {
        /// Locale whose keys are the reference set (defaults to the default locale)
        #[arg(long, value_name = "CODE")]
        reference: Option<String>,
    },
    /// List every key of the active locale
    Keys,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if let Err(err) = run(cli) {
        tracing::error!(error = %format!("{err:#}"), "lingo failed");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    let catalog = Arc::new(load_catalog(config.catalog_dir.as_deref())?);
    let prefs = Arc::new(FilePreferences::new(&config.preferences_path));

    if let Some(code) = cli.locale.as_deref().map(str::trim)
        && !code.is_empty()
        && !catalog.contains(code)
    {
        tracing::warn!(locale = code, "unknown --locale ignored");
    }
    // Session overrides win over the stored choice but are never written back.
    let persisted = prefs.get(LOCALE_PREFERENCE_KEY);
    let env_locale = std::env::var(ENV_LOCALE).ok();
    let selected = catalog.select_known([
        cli.locale.as_deref(),
        env_locale.as_deref(),
        persisted.as_deref(),
    ]);
    let store = LocaleStore::initialize(
        Arc::clone(&catalog),
        &config.default_locale,
        selected.map(LocaleCode::as_str),
        prefs,
    )
    .context("failed to initialise locale store")?;

    dispatch(cli.command, &Resolver::new(Arc::new(store)), &config)
}

fn dispatch(command: Command, resolver: &Resolver, config: &I18nConfig) -> Result<()> {
    let store = resolver.store();
    match command {
        Command::Translate { keys, args } => {
            let args: Vec<(&str, &str)> = args
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str()))
                .collect();
            for key in keys {
                println!("{}", fill(&resolver.translate(&key), &args));
            }
        }
        Command::Locales => {
            let active = store.active_locale();
            for option in store.list_locales() {
                let marker = if option.code == active { '*' } else { ' ' };
                println!("{marker} {}\t{}", option.code, option.label);
            }
        }
        Command::Use { code } => {
            if !store.set_locale(&code) {
                let known: Vec<String> = store
                    .catalog()
                    .codes()
                    .map(ToString::to_string)
                    .collect();
                bail!("unknown locale `{code}` (known: {})", known.join(", "));
            }
            let active = store.active_locale();
            match store.list_locales().into_iter().find(|option| option.code == active) {
                Some(option) => println!("{} ({})", option.code, option.label),
                None => println!("{active}"),
            }
        }
        Command::Coverage { reference } => {
            let reference = reference.unwrap_or_else(|| config.default_locale.clone());
            let Some(report) = store.catalog().coverage(&reference) else {
                bail!("unknown reference locale `{reference}`");
            };
            println!("reference {} ({} keys)", report.reference, report.total_keys);
            for locale in &report.locales {
                println!(
                    "{}\t{}/{} present, {} missing, {} extra",
                    locale.locale,
                    locale.present,
                    report.total_keys,
                    locale.missing.len(),
                    locale.extra.len()
                );
                for path in &locale.missing {
                    println!("  - {path}");
                }
                for path in &locale.extra {
                    println!("  + {path}");
                }
            }
        }
        Command::Keys => {
            let code = store.active_locale();
            if let Some(entry) = store.catalog().entry(code.as_str()) {
                for path in entry.table().leaf_paths() {
                    println!("{path}");
                }
            }
        }
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<I18nConfig> {
    let mut config = I18nConfig::load(cli.config.as_deref())?;
    if let Some(dir) = &cli.catalog_dir {
        config.catalog_dir = Some(dir.clone());
    }
    if let Some(path) = &cli.prefs {
        config.preferences_path = path.clone();
    }
    Ok(config)
}

fn load_catalog(dir: Option<&Path>) -> Result<Catalog> {
    match dir {
        Some(dir) => Catalog::load_dir(dir)
            .with_context(|| format!("failed to load catalog from {}", dir.display())),
        None => Catalog::builtin().context("bundled catalog is invalid"),
    }
}

fn parse_arg(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got `{raw}`")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_arg_splits_on_first_equals() {
        assert_eq!(
            parse_arg("pid=1=2").expect("arg"),
            ("pid".to_string(), "1=2".to_string())
        );
        assert_eq!(
            parse_arg(" count =3").expect("arg"),
            ("count".to_string(), "3".to_string())
        );
        assert!(parse_arg("novalue").is_err());
        assert!(parse_arg("=x").is_err());
    }

    #[test]
    fn cli_parses_translate_with_args() {
        let cli = Cli::try_parse_from([
            "lingo",
            "--locale",
            "en",
            "translate",
            "confirm.killProcess",
            "--arg",
            "pid=7",
        ])
        .expect("parse");
        assert_eq!(cli.locale.as_deref(), Some("en"));
        match cli.command {
            Command::Translate { keys, args } => {
                assert_eq!(keys, vec!["confirm.killProcess".to_string()]);
                assert_eq!(args, vec![("pid".to_string(), "7".to_string())]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn cli_requires_a_key_to_translate() {
        assert!(Cli::try_parse_from(["lingo", "translate"]).is_err());
    }
}
