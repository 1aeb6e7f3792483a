//! The `tagsmith config` command for configuration management.

use clap::{Args, Subcommand};
use tagsmith_core::Config;

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for configuration management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display current configuration
    Show,

    /// Show config file path
    Path,

    /// Initialize a new config file with defaults
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },

    /// Set one value, keeping the rest of the file as written
    Set {
        /// Dotted key, e.g. `tags.suffix` or `translation.google.enabled`
        key: String,

        /// New value (TOML literal; bare words are taken as strings)
        value: String,
    },
}

/// Execute the config command.
pub async fn execute(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let config = Config::load()?;
            let toml = config.to_toml()?;
            println!("{}", toml);
        }

        ConfigCommand::Path => {
            let path = Config::default_path();
            println!("{}", path.display());
        }

        ConfigCommand::Init { force } => {
            let path = Config::default_path();

            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at: {}\nUse --force to overwrite.",
                    path.display()
                );
            }

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let config = Config::default();
            let toml = config.to_toml()?;
            std::fs::write(&path, toml)?;

            tracing::info!("Config file created at: {}", path.display());
            println!("Configuration initialized at: {}", path.display());
        }

        ConfigCommand::Set { key, value } => {
            let path = Config::default_path();
            let content = if path.exists() {
                std::fs::read_to_string(&path)?
            } else {
                String::new()
            };

            let updated = set_value(&content, &key, &value)?;

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, updated)?;

            tracing::info!("Set {key} in {}", path.display());
            println!("{key} = {value}");
        }
    }

    Ok(())
}

/// Set `key` to `value` in a TOML document and validate the result.
///
/// Only keys present in the default configuration are accepted. Comments
/// and formatting elsewhere in the document are left alone.
fn set_value(content: &str, key: &str, value: &str) -> anyhow::Result<String> {
    if !is_known_key(key)? {
        anyhow::bail!("Unknown config key: {key}");
    }

    let mut doc: toml_edit::DocumentMut = content.parse()?;
    let parts: Vec<&str> = key.split('.').collect();
    let Some((field, tables)) = parts.split_last() else {
        anyhow::bail!("Empty config key");
    };

    let mut table = doc.as_table_mut();
    for name in tables {
        table = table
            .entry(name)
            .or_insert(toml_edit::table())
            .as_table_mut()
            .ok_or_else(|| anyhow::anyhow!("'{name}' is not a table in the config file"))?;
    }
    table.insert(field, toml_edit::Item::Value(parse_value(value)));

    let rendered = doc.to_string();
    Config::from_toml_str(&rendered)?;
    Ok(rendered)
}

/// Whether `key` names a leaf value of the default configuration.
fn is_known_key(key: &str) -> anyhow::Result<bool> {
    let defaults: toml_edit::DocumentMut = Config::default().to_toml()?.parse()?;
    let mut item = defaults.as_item();
    for part in key.split('.') {
        match item.get(part) {
            Some(next) => item = next,
            None => return Ok(false),
        }
    }
    Ok(item.is_value())
}

fn parse_value(raw: &str) -> toml_edit::Value {
    match raw.trim().parse::<toml_edit::Value>() {
        Ok(mut value) => {
            value.decor_mut().clear();
            value
        }
        Err(_) => toml_edit::Value::from(raw.trim()),
    }
}
