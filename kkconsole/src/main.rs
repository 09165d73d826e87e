use clap::Parser;
use std::path::{Path, PathBuf};

use kkconsole::{inventory, render, runner};
use kkconsole_core::session::{teardown_pair, WebSocketTransport};
use kkconsole_core::spec::kubernetes::{container_manager_allowed, docker_supported, upgrade_targets};
use kkconsole_core::wizard::{OperationKind, Wizard};
use kkconsole_core::{BackendClient, ConsoleConfig, ConsoleError, ConsoleResult, SpecDocument};

#[derive(Parser)]
#[command(name = "kkconsole")]
#[command(about = "Console for KubeKey cluster lifecycle operations", long_about = None)]
struct Cli {
    /// Configuration file (TOML); environment variables are used when absent
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// List clusters managed by the backend
    Clusters,
    /// List installable Kubernetes versions, or KubeSphere versions for one
    Versions {
        /// Show KubeSphere versions compatible with this Kubernetes version
        #[arg(long)]
        kubernetes: Option<String>,
    },
    /// Install a new cluster from a cluster document
    Install {
        /// Cluster document (YAML)
        #[arg(long)]
        spec: PathBuf,

        /// Also deploy this KubeSphere version
        #[arg(long)]
        ks_version: Option<String>,

        /// Namespace for KubeKey jobs
        #[arg(long)]
        namespace: Option<String>,

        /// Skip confirmation
        #[arg(long)]
        yes: bool,
    },
    /// Add nodes to an existing cluster
    AddNode {
        #[arg(long)]
        cluster: String,

        /// Hosts to add (YAML list with per-host roles)
        #[arg(long)]
        hosts: PathBuf,

        #[arg(long)]
        yes: bool,
    },
    /// Remove one node from a cluster
    DeleteNode {
        #[arg(long)]
        cluster: String,

        #[arg(long)]
        node: String,

        #[arg(long)]
        yes: bool,
    },
    /// Tear a cluster down
    DeleteCluster {
        #[arg(long)]
        cluster: String,

        #[arg(long)]
        yes: bool,
    },
    /// Upgrade a cluster's Kubernetes version
    Upgrade {
        #[arg(long)]
        cluster: String,

        #[arg(long)]
        kubernetes_version: String,

        /// docker or containerd; defaults to the current manager when still supported
        #[arg(long)]
        container_manager: Option<String>,

        /// KubeSphere version to upgrade to alongside Kubernetes
        #[arg(long)]
        ks_version: Option<String>,

        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> ConsoleResult<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ConsoleConfig::from_file(path)?,
        None => ConsoleConfig::from_env()?,
    };
    init_logging(&config)?;

    match cli.command {
        Commands::Clusters => {
            let clusters = BackendClient::new(&config.backend)?.list_clusters().await?;
            print!("{}", render::cluster_table(&clusters));
        }
        Commands::Versions { kubernetes } => {
            let client = BackendClient::new(&config.backend)?;
            let versions = match kubernetes {
                Some(version) => client.kubesphere_versions(&version).await,
                None => client.kubernetes_versions().await,
            };
            for version in versions {
                println!("{}", version);
            }
        }
        Commands::Install {
            spec,
            ks_version,
            namespace,
            yes,
        } => {
            let document = read_document(&spec)?;
            let mut wizard = Wizard::new(OperationKind::Install, document, &config);
            if let Some(version) = ks_version {
                wizard.options_mut().kubesphere_enabled = true;
                wizard.options_mut().kubesphere_version = version;
            }
            if let Some(namespace) = namespace {
                wizard.options_mut().kubekey_namespace = namespace;
            }
            run_operation(wizard, yes).await?;
        }
        Commands::AddNode {
            cluster,
            hosts,
            yes,
        } => {
            let document = fetch_cluster(&config, &cluster).await?;
            let mut wizard = Wizard::new(OperationKind::AddNode, document, &config);
            let entries = inventory::parse_host_entries(&read_file(&hosts)?)?;
            let added = inventory::add_entries(wizard.document_mut(), entries)?;
            tracing::info!(cluster = %cluster, added, "hosts staged");
            run_operation(wizard, yes).await?;
        }
        Commands::DeleteNode { cluster, node, yes } => {
            let document = fetch_cluster(&config, &cluster).await?;
            let mut wizard = Wizard::new(OperationKind::DeleteNode, document, &config);
            wizard.select_target_node(node);
            run_operation(wizard, yes).await?;
        }
        Commands::DeleteCluster { cluster, yes } => {
            let document = fetch_cluster(&config, &cluster).await?;
            let wizard = Wizard::new(OperationKind::DeleteCluster, document, &config);
            run_operation(wizard, yes).await?;
        }
        Commands::Upgrade {
            cluster,
            kubernetes_version,
            container_manager,
            ks_version,
            yes,
        } => {
            let client = BackendClient::new(&config.backend)?;
            let document = client.find_cluster(&cluster).await?;
            check_upgrade_target(&client, &document, &kubernetes_version).await?;

            let current_manager = document
                .get_str("spec.kubernetes.containerManager")
                .unwrap_or_default()
                .to_string();
            let manager = container_manager.unwrap_or_else(|| {
                if current_manager == "docker" && docker_supported(&kubernetes_version) {
                    current_manager
                } else {
                    "containerd".to_string()
                }
            });
            if !container_manager_allowed(&kubernetes_version, &manager) {
                return Err(ConsoleError::configuration(
                    "container-manager",
                    format!("'{}' is not supported by {}", manager, kubernetes_version),
                ));
            }

            let mut wizard = Wizard::new(OperationKind::UpgradeCluster, document, &config);
            wizard
                .document_mut()
                .select_kubernetes_version(&kubernetes_version)?;
            wizard
                .document_mut()
                .set("spec.kubernetes.containerManager", manager)?;
            if let Some(version) = ks_version {
                wizard.options_mut().kubesphere_version = version;
            }
            run_operation(wizard, yes).await?;
        }
    }

    Ok(())
}

fn init_logging(config: &ConsoleConfig) -> ConsoleResult<()> {
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    for target in ["kkconsole", "kkconsole_core"] {
        let directive = format!("{}={}", target, config.logging.level)
            .parse()
            .map_err(|e| {
                ConsoleError::configuration("logging", format!("Invalid log directive: {}", e))
            })?;
        filter = filter.add_directive(directive);
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn read_file(path: &Path) -> ConsoleResult<String> {
    std::fs::read_to_string(path).map_err(|e| {
        ConsoleError::configuration("input", format!("Failed to read {}: {}", path.display(), e))
    })
}

fn read_document(path: &Path) -> ConsoleResult<SpecDocument> {
    let document = SpecDocument::from_yaml(&read_file(path)?)?;
    document.validate_inventory()?;
    Ok(document)
}

async fn fetch_cluster(config: &ConsoleConfig, name: &str) -> ConsoleResult<SpecDocument> {
    BackendClient::new(&config.backend)?.find_cluster(name).await
}

async fn check_upgrade_target(
    client: &BackendClient,
    document: &SpecDocument,
    target: &str,
) -> ConsoleResult<()> {
    let options = client.kubernetes_versions().await;
    if options.is_empty() {
        tracing::warn!("no version options from backend, skipping upgrade target check");
        return Ok(());
    }
    let current = document.get_str("spec.kubernetes.version").unwrap_or_default();
    if upgrade_targets(&options, current).iter().any(|v| v == target) {
        return Ok(());
    }
    Err(ConsoleError::configuration(
        "kubernetes-version",
        format!("{} is not an upgrade target for {} {}", target, document.name(), current),
    ))
}

async fn run_operation(mut wizard: Wizard, yes: bool) -> ConsoleResult<()> {
    runner::walk_to_confirm(&mut wizard)?;
    print!("{}", render::operation_summary(&wizard));

    if !yes {
        let proceed = dialoguer::Confirm::new()
            .with_prompt(format!("Run {} now?", wizard.kind()))
            .default(false)
            .interact()
            .map_err(|e| ConsoleError::internal(format!("Confirmation prompt failed: {}", e)))?;
        if !proceed {
            println!("Cancelled");
            return Ok(());
        }
    }

    let (guard, signal) = teardown_pair();
    let watcher = tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::warn!("interrupted, closing session");
                guard.teardown();
            }
            Err(e) => {
                tracing::warn!(error = %e, "cannot listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        }
    });

    let mut stdout = std::io::stdout();
    let result = runner::execute(&mut wizard, &WebSocketTransport, signal, &mut stdout).await;
    watcher.abort();
    result
}
