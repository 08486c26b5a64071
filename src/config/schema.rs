//! Configuration schema definitions
//!
//! Defines the structure of the configuration file using serde for
//! serialization.

use serde::{Deserialize, Serialize};

use crate::graph::OutputFormat;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    /// Namespace used when `--namespace` is not given
    ///
    /// Unset means the namespace of the kubeconfig context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_namespace: Option<String>,

    /// Output format used when neither `--output` nor `--dot` is given
    #[serde(default)]
    pub output: OutputFormat,

    /// Kubeconfig context used when `--context` is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}
