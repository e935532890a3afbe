// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::{bootstrap, DEFAULT_NAMESPACE};
use anyhow::{bail, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// How the invoker sends a patch body to the API server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PatchStrategy {
    /// `application/merge-patch+json`, works for every kind including CRDs
    #[default]
    Merge,
    /// `application/strategic-merge-patch+json`, built-in kinds only
    Strategic,
}

impl FromStr for PatchStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "merge" => Ok(PatchStrategy::Merge),
            "strategic" => Ok(PatchStrategy::Strategic),
            other => bail!("unknown patch strategy '{}' (expected merge or strategic)", other),
        }
    }
}

/// Provisioner configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Namespace used when none is given on the command line
    pub default_namespace: String,
    pub patch_strategy: PatchStrategy,
    /// Cluster role bound to the bootstrap service account
    pub admin_cluster_role: String,
    pub service_account: String,
    /// Explicit kubeconfig file; when unset the client is inferred from the environment
    pub kubeconfig: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            default_namespace: DEFAULT_NAMESPACE.to_string(),
            patch_strategy: PatchStrategy::default(),
            admin_cluster_role: bootstrap::ADMIN_CLUSTER_ROLE.to_string(),
            service_account: bootstrap::SERVICE_ACCOUNT.to_string(),
            kubeconfig: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        let patch_strategy = match lookup("PATCH_STRATEGY") {
            Some(value) => value.parse()?,
            None => defaults.patch_strategy,
        };

        Ok(Config {
            default_namespace: lookup("DEFAULT_NAMESPACE").unwrap_or(defaults.default_namespace),
            patch_strategy,
            admin_cluster_role: lookup("ADMIN_CLUSTER_ROLE").unwrap_or(defaults.admin_cluster_role),
            service_account: lookup("BOOTSTRAP_SERVICE_ACCOUNT")
                .unwrap_or(defaults.service_account),
            kubeconfig: lookup("KUBECONFIG_PATH").map(PathBuf::from),
        })
    }
}
