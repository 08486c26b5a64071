//! Kubernetes client module
//!
//! Builds the API client from kubeconfig and provides [`KubeStore`], the
//! cluster-backed [`crate::graph::ResourceStore`].
//!
//! Proxies configured through `HTTP_PROXY` / `HTTPS_PROXY` / `NO_PROXY` are
//! honored by the client itself.

mod store;

pub use store::KubeStore;

use std::path::Path;

use anyhow::{Context, Result};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};

/// Initialize a Kubernetes client
///
/// With neither `kubeconfig` nor `context` the default loading strategy is
/// used:
/// 1. In-cluster config (if running in a pod)
/// 2. KUBECONFIG environment variable
/// 3. ~/.kube/config
///
/// Otherwise the given kubeconfig file (or the default one) is read and the
/// given context (or its current context) is selected.
///
/// Returns the client together with the namespace of the selected context,
/// which is `default` when the context does not set one.
pub async fn create_client(
    kubeconfig: Option<&Path>,
    context: Option<&str>,
) -> Result<(Client, String)> {
    let config = load_config(kubeconfig, context).await?;
    let namespace = config.default_namespace.clone();

    tracing::debug!(
        "Cluster {} with default namespace '{}'",
        config.cluster_url,
        namespace
    );

    let client = Client::try_from(config).context("Failed to create Kubernetes client")?;
    Ok((client, namespace))
}

async fn load_config(kubeconfig: Option<&Path>, context: Option<&str>) -> Result<Config> {
    if kubeconfig.is_none() && context.is_none() {
        return Config::infer()
            .await
            .context("Failed to infer Kubernetes configuration");
    }

    let raw = match kubeconfig {
        Some(path) => Kubeconfig::read_from(path)
            .with_context(|| format!("Failed to read kubeconfig: {}", path.display()))?,
        None => Kubeconfig::read().context("Failed to read kubeconfig")?,
    };

    let options = KubeConfigOptions {
        context: context.map(String::from),
        ..Default::default()
    };

    Config::from_custom_kubeconfig(raw, &options)
        .await
        .with_context(|| match context {
            Some(ctx) => format!("Failed to load kubeconfig context '{}'", ctx),
            None => "Failed to load kubeconfig current context".to_string(),
        })
}
