//! CLI command handlers

use anyhow::{Context, Result};
use clap::Subcommand;

use kubegraph::config::{self, ConfigLoader, paths};

/// Configuration management subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Get configuration value
    Get {
        /// Configuration key ("defaultNamespace", "output" or "context")
        key: Option<String>,
    },
    /// Set configuration value
    Set {
        /// Configuration key ("defaultNamespace", "output" or "context")
        key: String,
        /// Configuration value; empty unsets optional keys
        value: String,
    },
    /// List all configuration
    List,
    /// Show configuration file path
    Path,
    /// Validate configuration
    Validate,
}

/// Handle configuration subcommands
pub fn handle_config_command(cmd: ConfigSubcommand) -> Result<()> {
    match cmd {
        ConfigSubcommand::Get { key } => {
            let config = ConfigLoader::load().context("Failed to load configuration")?;

            if let Some(key) = key {
                println!("{}", config::get_config_value(&config, &key)?);
            } else {
                let yaml =
                    serde_yaml::to_string(&config).context("Failed to serialize configuration")?;
                print!("{}", yaml);
            }
        }
        ConfigSubcommand::Set { key, value } => {
            // Only the file layer is persisted, not environment overrides
            let path = paths::root_config_path();
            let mut config = ConfigLoader::load_layers(&path)
                .context("Failed to load configuration")?;

            config::set_config_value(&mut config, &key, &value)
                .with_context(|| format!("Failed to set {} = {}", key, value))?;

            ConfigLoader::save(&config, &path).context("Failed to save configuration")?;
            println!("Configuration saved to {}", path.display());
        }
        ConfigSubcommand::List => {
            let config = ConfigLoader::load().context("Failed to load configuration")?;
            let yaml =
                serde_yaml::to_string(&config).context("Failed to serialize configuration")?;
            print!("{}", yaml);
        }
        ConfigSubcommand::Path => {
            println!("{}", paths::root_config_path().display());
        }
        ConfigSubcommand::Validate => {
            ConfigLoader::validate().context("Configuration validation failed")?;
            println!("Configuration is valid");
        }
    }

    Ok(())
}
