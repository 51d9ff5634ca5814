//! Config command - show or edit configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigManager};
use crate::error::{PkgSizeError, PkgSizeResult};
use crate::ui::{self, UiContext};
use toml_edit::{value, DocumentMut, Item, Table};

/// Kind of value a config key holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueKind {
    Text,
    Bool,
    Integer,
}

/// Keys accepted by `config set`
const VALID_KEYS: &[(&str, ValueKind)] = &[
    ("general.log_format", ValueKind::Text),
    ("install.client", ValueKind::Text),
    ("install.registry", ValueKind::Text),
    ("bundler.command", ValueKind::Text),
    ("bundler.gzip_level", ValueKind::Integer),
    ("cache.enabled", ValueKind::Bool),
    ("cache.path", ValueKind::Text),
];

/// Execute the config command
pub async fn execute(args: ConfigArgs, manager: &ConfigManager, config: &Config) -> PkgSizeResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(config)?,
        Some(ConfigAction::Path) => println!("{}", manager.path().display()),
        Some(ConfigAction::Init { force }) => init_config(manager, force).await?,
        Some(ConfigAction::Set { key, value }) => set_value(manager, &key, &value).await?,
    }

    Ok(())
}

fn show_config(config: &Config) -> PkgSizeResult<()> {
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

async fn init_config(manager: &ConfigManager, force: bool) -> PkgSizeResult<()> {
    let ctx = UiContext::detect();
    let path = manager.path();

    if path.exists() && !force {
        ui::step_warn_hint(
            &ctx,
            &format!("Config already exists at {}", path.display()),
            "Use --force to overwrite",
        );
        return Ok(());
    }

    manager.save(&Config::default()).await?;
    ui::step_ok_detail(
        &ctx,
        "Configuration initialized",
        &path.display().to_string(),
    );

    Ok(())
}

async fn set_value(manager: &ConfigManager, key: &str, raw: &str) -> PkgSizeResult<()> {
    let ctx = UiContext::detect();
    let content = manager.read_raw().await?;
    let updated = apply_set(&content, key, raw).map_err(|e| match e {
        PkgSizeError::ConfigInvalid { reason, .. } => PkgSizeError::ConfigInvalid {
            path: manager.path().to_path_buf(),
            reason,
        },
        other => other,
    })?;

    manager.write_raw(&updated).await?;
    ui::step_ok(&ctx, &format!("Set {} = {}", key, raw));
    Ok(())
}

/// Set `key` in the TOML text, keeping its comments and layout.
/// The result must still deserialize as a `Config`.
fn apply_set(content: &str, key: &str, raw: &str) -> PkgSizeResult<String> {
    let kind = VALID_KEYS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, kind)| *kind)
        .ok_or_else(|| {
            let keys: Vec<&str> = VALID_KEYS.iter().map(|(k, _)| *k).collect();
            PkgSizeError::User(format!(
                "Unknown config key: {}. Valid keys: {}",
                key,
                keys.join(", ")
            ))
        })?;

    let mut doc: DocumentMut = content.parse().map_err(|e: toml_edit::TomlError| {
        PkgSizeError::ConfigInvalid {
            path: Default::default(),
            reason: e.to_string(),
        }
    })?;

    let (section, field) = key
        .split_once('.')
        .ok_or_else(|| PkgSizeError::Internal(format!("config key without section: {}", key)))?;

    let table = doc
        .entry(section)
        .or_insert_with(|| Item::Table(Table::new()))
        .as_table_mut()
        .ok_or_else(|| PkgSizeError::User(format!("Expected [{}] to be a table", section)))?;

    table[field] = match kind {
        ValueKind::Text => value(raw),
        ValueKind::Bool => value(parse_bool(raw)?),
        ValueKind::Integer => value(parse_integer(raw)?),
    };

    let updated = doc.to_string();
    toml::from_str::<Config>(&updated).map_err(|e| PkgSizeError::User(format!(
        "Invalid value for {}: {}",
        key,
        e.message()
    )))?;
    Ok(updated)
}

fn parse_bool(raw: &str) -> PkgSizeResult<bool> {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(PkgSizeError::User(format!(
            "Invalid boolean value: {}. Use true/false",
            raw
        ))),
    }
}

fn parse_integer(raw: &str) -> PkgSizeResult<i64> {
    raw.parse()
        .map_err(|_| PkgSizeError::User(format!("Invalid number: {}", raw)))
}
