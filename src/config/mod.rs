//! Configuration system for kubegraph
//!
//! A single YAML file under the config directory, overridable through
//! environment variables and, last, command line flags.

pub mod loader;
pub mod paths;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::Config;

use crate::graph::OutputFormat;

/// Keys accepted by `config get` / `config set`
pub const CONFIG_KEYS: &[&str] = &["defaultNamespace", "output", "context"];

/// Get a configuration value by key
///
/// Unset optional values are returned as an empty string.
pub fn get_config_value(config: &Config, key: &str) -> anyhow::Result<String> {
    match key {
        "defaultNamespace" => Ok(config.default_namespace.clone().unwrap_or_default()),
        "output" => Ok(config.output.to_string()),
        "context" => Ok(config.context.clone().unwrap_or_default()),
        _ => Err(unknown_key(key)),
    }
}

/// Set a configuration value by key
///
/// An empty value unsets `defaultNamespace` and `context`.
pub fn set_config_value(config: &mut Config, key: &str, value: &str) -> anyhow::Result<()> {
    match key {
        "defaultNamespace" => {
            config.default_namespace = non_empty(value);
        }
        "output" => {
            config.output = value
                .parse::<OutputFormat>()
                .map_err(|e| anyhow::anyhow!(e))?;
        }
        "context" => {
            config.context = non_empty(value);
        }
        _ => return Err(unknown_key(key)),
    }

    Ok(())
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn unknown_key(key: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "Unknown configuration key: {} (expected one of: {})",
        key,
        CONFIG_KEYS.join(", ")
    )
}
