//! The graph command: build and print the graph of one object

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use kubegraph::config::{Config, ConfigLoader};
use kubegraph::graph::{GraphBuilder, OutputFormat, Printer, resolve_resource};
use kubegraph::kube::{KubeStore, create_client};

/// Arguments of the graph command
#[derive(Args, Debug, Default)]
pub struct GraphArgs {
    /// Kind of the object: pod, service, ingress, replicaset, deployment,
    /// daemonset, statefulset or an alias (po, svc, ing, rs, deploy, ds, sts)
    pub kind: Option<String>,

    /// Name of the object
    pub name: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, conflicts_with = "dot")]
    pub output: Option<OutputFormat>,

    /// Print a DOT graph (same as `--output dot`)
    #[arg(long, visible_alias = "dot-graph")]
    pub dot: bool,

    /// Namespace of the object
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// Path to the kubeconfig file
    #[arg(long, value_name = "PATH")]
    pub kubeconfig: Option<PathBuf>,

    /// Kubeconfig context to use
    #[arg(long)]
    pub context: Option<String>,
}

impl GraphArgs {
    /// Output format: `--dot`, then `--output`, then config
    pub fn output_format(&self, config: &Config) -> OutputFormat {
        if self.dot {
            OutputFormat::Dot
        } else {
            self.output.unwrap_or(config.output)
        }
    }

    /// Namespace: `--namespace`, then config, then the kubeconfig context
    pub fn namespace(&self, config: &Config, context_namespace: &str) -> String {
        self.namespace
            .clone()
            .or_else(|| config.default_namespace.clone())
            .unwrap_or_else(|| context_namespace.to_string())
    }

    /// Context: `--context`, then config
    pub fn context(&self, config: &Config) -> Option<String> {
        self.context.clone().or_else(|| config.context.clone())
    }
}

/// Build the graph of the requested object and print it to stdout
pub async fn run_graph(args: GraphArgs) -> Result<()> {
    let (Some(kind), Some(name)) = (args.kind.as_deref(), args.name.as_deref()) else {
        anyhow::bail!("requires KIND and NAME arguments");
    };

    // Reject unsupported kinds before touching the cluster
    resolve_resource(kind)?;

    let config = ConfigLoader::load().context("Failed to load configuration")?;
    let context = args.context(&config);
    let (client, context_namespace) =
        create_client(args.kubeconfig.as_deref(), context.as_deref()).await?;

    let namespace = args.namespace(&config, &context_namespace);
    let format = args.output_format(&config);
    tracing::debug!("namespace={} output={}", namespace, format);

    let store = KubeStore::new(client);
    let graph = GraphBuilder::new(&store, namespace)
        .build(kind, name)
        .await
        .with_context(|| format!("Failed to build graph for {} '{}'", kind, name))?;

    let mut stdout = std::io::stdout().lock();
    Printer::new(format)
        .print(&graph, &mut stdout)
        .context("Failed to write graph")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_precedence() {
        let dot_config = Config {
            output: OutputFormat::Dot,
            ..Default::default()
        };

        assert_eq!(
            GraphArgs::default().output_format(&Config::default()),
            OutputFormat::Tree
        );
        assert_eq!(
            GraphArgs::default().output_format(&dot_config),
            OutputFormat::Dot
        );

        let args = GraphArgs {
            output: Some(OutputFormat::Tree),
            ..Default::default()
        };
        assert_eq!(args.output_format(&dot_config), OutputFormat::Tree);

        let args = GraphArgs {
            dot: true,
            ..Default::default()
        };
        assert_eq!(args.output_format(&Config::default()), OutputFormat::Dot);
    }

    #[test]
    fn test_namespace_precedence() {
        let config = Config {
            default_namespace: Some("from-config".to_string()),
            ..Default::default()
        };

        assert_eq!(
            GraphArgs::default().namespace(&Config::default(), "default"),
            "default"
        );
        assert_eq!(
            GraphArgs::default().namespace(&config, "from-context"),
            "from-config"
        );

        let args = GraphArgs {
            namespace: Some("from-flag".to_string()),
            ..Default::default()
        };
        assert_eq!(args.namespace(&config, "from-context"), "from-flag");
    }

    #[test]
    fn test_context_precedence() {
        let config = Config {
            context: Some("from-config".to_string()),
            ..Default::default()
        };
        assert_eq!(
            GraphArgs::default().context(&config).as_deref(),
            Some("from-config")
        );

        let args = GraphArgs {
            context: Some("from-flag".to_string()),
            ..Default::default()
        };
        assert_eq!(args.context(&config).as_deref(), Some("from-flag"));
    }

    #[tokio::test]
    async fn test_missing_arguments() {
        let err = run_graph(GraphArgs::default()).await.unwrap_err();
        assert_eq!(err.to_string(), "requires KIND and NAME arguments");

        let args = GraphArgs {
            kind: Some("pod".to_string()),
            ..Default::default()
        };
        let err = run_graph(args).await.unwrap_err();
        assert_eq!(err.to_string(), "requires KIND and NAME arguments");
    }

    #[tokio::test]
    async fn test_unsupported_kind_fails_before_connecting() {
        let args = GraphArgs {
            kind: Some("foo".to_string()),
            name: Some("bar".to_string()),
            ..Default::default()
        };
        let err = run_graph(args).await.unwrap_err();
        assert_eq!(err.to_string(), "kind 'foo' not supported");
    }
}
