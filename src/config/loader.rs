//! Configuration loading and merging logic
//!
//! Handles loading configuration from multiple sources and merging them
//! according to precedence rules.

use super::{paths, schema::Config};
use crate::graph::OutputFormat;
use anyhow::{Context, Result};
use std::path::Path;

/// Environment variable overriding `defaultNamespace`
pub const ENV_NAMESPACE: &str = "KUBEGRAPH_NAMESPACE";
/// Environment variable overriding `output`
pub const ENV_OUTPUT: &str = "KUBEGRAPH_OUTPUT";
/// Environment variable overriding `context`
pub const ENV_CONTEXT: &str = "KUBEGRAPH_CONTEXT";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with all layers merged
    ///
    /// Precedence order (highest to lowest):
    /// 1. Environment variable overrides
    /// 2. Root config file
    /// 3. Built-in defaults
    ///
    /// A missing config file is not an error; an unreadable or invalid one is.
    pub fn load() -> Result<Config> {
        let config = Self::load_layers(&paths::root_config_path())?;
        Ok(Self::apply_overrides(config, |key| std::env::var(key).ok()))
    }

    /// Load the config file at `path` on top of the defaults
    pub fn load_layers(path: &Path) -> Result<Config> {
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Config::default());
        }
        Self::load_file(path)
    }

    /// Load configuration from a file
    pub fn load_file(path: &Path) -> Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        // An empty file is a valid, empty config
        if contents.trim().is_empty() {
            return Ok(Config::default());
        }

        let config: Config = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::debug!("Loaded config file {}", path.display());
        Ok(config)
    }

    /// Validate the root config file
    ///
    /// Fails on invalid YAML, unknown keys and invalid values.
    pub fn validate() -> Result<()> {
        Self::load_layers(&paths::root_config_path()).map(|_| ())
    }

    /// Apply environment overrides, reading variables through `lookup`
    ///
    /// Empty values are ignored. An unparsable output format is logged and
    /// ignored.
    pub fn apply_overrides<F>(mut config: Config, lookup: F) -> Config
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.is_empty());

        if let Some(namespace) = var(ENV_NAMESPACE) {
            config.default_namespace = Some(namespace);
        }

        if let Some(output) = var(ENV_OUTPUT) {
            match output.parse::<OutputFormat>() {
                Ok(format) => config.output = format,
                Err(e) => tracing::warn!("Ignoring {}: {}", ENV_OUTPUT, e),
            }
        }

        if let Some(context) = var(ENV_CONTEXT) {
            config.context = Some(context);
        }

        config
    }

    /// Save configuration to a file
    pub fn save(config: &Config, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            paths::ensure_dir(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let yaml =
            serde_yaml::to_string(config).context("Failed to serialize configuration to YAML")?;

        std::fs::write(path, yaml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = ConfigLoader::load_layers(&tmp.path().join("config.yaml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.yaml");
        std::fs::write(&path, "\n").unwrap();
        assert_eq!(ConfigLoader::load_file(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.yaml");
        std::fs::write(&path, "output: [tree\n").unwrap();
        let err = ConfigLoader::load_layers(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_save_then_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("config.yaml");
        let config = Config {
            default_namespace: Some("team-a".to_string()),
            output: OutputFormat::Dot,
            context: Some("kind-dev".to_string()),
        };

        ConfigLoader::save(&config, &path).unwrap();
        assert_eq!(ConfigLoader::load_file(&path).unwrap(), config);
    }

    #[test]
    fn test_env_overrides() {
        let config = ConfigLoader::apply_overrides(
            Config::default(),
            env(&[
                (ENV_NAMESPACE, "team-b"),
                (ENV_OUTPUT, "dot"),
                (ENV_CONTEXT, "prod"),
            ]),
        );

        assert_eq!(config.default_namespace.as_deref(), Some("team-b"));
        assert_eq!(config.output, OutputFormat::Dot);
        assert_eq!(config.context.as_deref(), Some("prod"));
    }

    #[test]
    fn test_env_overrides_ignore_empty_and_invalid() {
        let base = Config {
            default_namespace: Some("team-a".to_string()),
            output: OutputFormat::Dot,
            context: None,
        };
        let config = ConfigLoader::apply_overrides(
            base.clone(),
            env(&[(ENV_NAMESPACE, ""), (ENV_OUTPUT, "svg")]),
        );
        assert_eq!(config, base);
    }
}
