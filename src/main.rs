// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use argo_provisioner::apply::{Reconciler, Registry, Router};
use argo_provisioner::bootstrap::{provision, ProvisionPlan};
use argo_provisioner::config::Config;
use argo_provisioner::kubernetes::{create_client, load_manifests};

#[derive(Parser, Debug)]
#[command(name = "argo-provisioner", version, about = "Provision namespaced Argo workflow environments")]
struct Cli {
    /// Target namespace (default: DEFAULT_NAMESPACE)
    #[arg(short = 'n', long = "namespace", global = true)]
    namespace: Option<String>,

    /// Kubeconfig file to use instead of the inferred configuration
    #[arg(long = "kubeconfig", global = true)]
    kubeconfig: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create, patch or recreate every object of the given manifests
    Apply {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Delete the objects of the given manifests if they exist
    Delete {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Patch the objects of the given manifests in place
    Patch {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Create the namespace, install into it and submit workflows
    Bootstrap {
        /// Manifests installed when the namespace is new
        #[arg(long = "install")]
        install: Vec<PathBuf>,
        /// Workflow manifests submitted on every run
        #[arg(long = "workflow")]
        workflows: Vec<PathBuf>,
    },
    /// Print the routing table
    Routes,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::from_env()?;
    if let Some(path) = cli.kubeconfig {
        config.kubeconfig = Some(path);
    }
    let namespace = cli
        .namespace
        .unwrap_or_else(|| config.default_namespace.clone());

    let router = Router::new(Registry::builtin()).with_patch_strategy(config.patch_strategy);

    let command = match cli.command {
        Commands::Routes => {
            for group in router.registry().groups() {
                println!("{}", group.name());
                for operation in group.operation_names() {
                    println!("  {}", operation);
                }
            }
            return Ok(());
        }
        command => command,
    };

    let client = create_client(&config).await?;
    info!("Connected to Kubernetes cluster");
    let reconciler = Reconciler::new(client, router);

    match command {
        Commands::Apply { files } => {
            for path in files {
                let responses = reconciler.apply_manifest(&path, &namespace).await?;
                for res in responses {
                    println!("applied (uid={})", res.uid().unwrap_or("?"));
                }
            }
        }
        Commands::Delete { files } => {
            for path in files {
                for descriptor in load_manifests(&path)? {
                    if reconciler.delete_if_exists(&descriptor, &namespace).await? {
                        println!("{} deleted", descriptor.describe());
                    } else {
                        println!("{} not found", descriptor.describe());
                    }
                }
            }
        }
        Commands::Patch { files } => {
            for path in files {
                for descriptor in load_manifests(&path)? {
                    reconciler.patch_only(&descriptor, &namespace).await?;
                    println!("{} patched", descriptor.describe());
                }
            }
        }
        Commands::Bootstrap { install, workflows } => {
            let plan = ProvisionPlan::from_files(&install, &workflows)
                .context("loading bootstrap manifests")?;
            let report = provision(&reconciler, &config, &namespace, &plan).await?;
            info!(
                "Namespace {} ready: created={}, applied={}, workflows={:?}",
                namespace, report.namespace_created, report.applied, report.workflows
            );
        }
        Commands::Routes => unreachable!("routes is handled before connecting"),
    }

    Ok(())
}
