// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cluster client creation

use crate::config::Config;
use crate::error::{ProvisionError, Result};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::Client;
use std::path::Path;
use tracing::{info, instrument};

/// Create the client every API call goes through.
///
/// Uses the kubeconfig file from the configuration when set, otherwise the
/// default inference (`KUBECONFIG`, `~/.kube/config`, then in-cluster).
#[instrument(skip(config))]
pub async fn create_client(config: &Config) -> Result<Client> {
    match config.kubeconfig.as_deref() {
        Some(path) => create_client_from_file(path).await,
        None => Client::try_default().await.map_err(|e| {
            ProvisionError::KubeconfigError(format!("Failed to infer client config: {}", e))
        }),
    }
}

/// Create a Kubernetes client from a kubeconfig file
async fn create_client_from_file(path: &Path) -> Result<Client> {
    info!("Loading kubeconfig from {}", path.display());

    let kubeconfig = Kubeconfig::read_from(path).map_err(|e| {
        ProvisionError::KubeconfigError(format!(
            "Failed to read kubeconfig {}: {}",
            path.display(),
            e
        ))
    })?;

    let client_config = kube::Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
        .await
        .map_err(|e| ProvisionError::KubeconfigError(format!("Failed to create config: {}", e)))?;

    Client::try_from(client_config)
        .map_err(|e| ProvisionError::KubeconfigError(format!("Failed to create client: {}", e)))
}
