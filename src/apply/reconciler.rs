// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Idempotent apply: create, then patch, then delete and recreate.

use crate::apply::invoker::{Action, ApiResponse, RoutedApi};
use crate::apply::router::Router;
use crate::error::{ProvisionError, Reason, Result};
use crate::kubernetes::manifests::load_manifests;
use crate::types::descriptor::ObjectDescriptor;
use kube::Client;
use std::path::Path;
use tracing::{debug, error, info, instrument, warn};

/// Applies object descriptors against one cluster connection.
///
/// Holds no state between calls; concurrent calls on the same object are
/// only serialized by the API server's own conflict detection.
#[derive(Clone)]
pub struct Reconciler {
    client: Client,
    router: Router,
}

impl Reconciler {
    pub fn new(client: Client, router: Router) -> Self {
        Self { client, router }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    fn resolve(&self, descriptor: &ObjectDescriptor) -> Result<RoutedApi<'_>> {
        self.router
            .resolve(descriptor, self.client.clone())
            .map_err(|e| fatal(descriptor, e))
    }

    /// Run a single action without any fallback
    pub async fn invoke(
        &self,
        action: Action,
        descriptor: &ObjectDescriptor,
        namespace: &str,
    ) -> Result<ApiResponse> {
        let api = self.resolve(descriptor)?;
        api.invoke(action, descriptor, namespace)
            .await
            .map_err(|e| fatal(descriptor, e))
    }

    /// Make sure `descriptor` exists in the cluster, whatever state it was in.
    ///
    /// A `Conflict` on create moves on to patch, an `Unprocessable Entity` on
    /// patch moves on to delete and recreate. Other failures of create or
    /// patch are returned unchanged; any failure while recreating is wrapped
    /// in [`ProvisionError::LadderExhausted`].
    #[instrument(skip(self, descriptor), fields(object = %descriptor.describe()))]
    pub async fn upsert(&self, descriptor: &ObjectDescriptor, namespace: &str) -> Result<ApiResponse> {
        let api = self.resolve(descriptor)?;

        match api.invoke(Action::Create, descriptor, namespace).await {
            Ok(res) => {
                debug!("{} created -> uid={}", descriptor.describe(), uid(&res));
                return Ok(res);
            }
            Err(e) if e.reason() == Some(Reason::Conflict) => {
                debug!("{} already exists, patching", descriptor.describe());
            }
            Err(e) => return Err(fatal(descriptor, e)),
        }

        match api.invoke(Action::Patch, descriptor, namespace).await {
            Ok(res) => {
                debug!("{} PATCHED -> uid={}", descriptor.describe(), uid(&res));
                return Ok(res);
            }
            Err(e) if e.reason() == Some(Reason::UnprocessableEntity) => {
                debug!(
                    "Patching {} rejected, attempting deletion and recreation",
                    descriptor.describe()
                );
            }
            Err(e) => return Err(fatal(descriptor, e)),
        }

        recreate(&api, descriptor, namespace)
            .await
            .map_err(|source| {
                error!("FAILURE updating {}: {}", descriptor.describe(), source);
                ProvisionError::LadderExhausted {
                    object: descriptor.describe(),
                    source: Box::new(source),
                }
            })
    }

    /// Delete the object; a missing object is not an error.
    ///
    /// Returns `true` when something was deleted and `false` when it did not exist.
    #[instrument(skip(self, descriptor), fields(object = %descriptor.describe()))]
    pub async fn delete_if_exists(&self, descriptor: &ObjectDescriptor, namespace: &str) -> Result<bool> {
        let api = self.resolve(descriptor)?;

        match api.invoke(Action::Delete, descriptor, namespace).await {
            Ok(res) => {
                debug!("{} DELETED. uid was: {}", descriptor.describe(), uid(&res));
                Ok(true)
            }
            Err(e) if e.reason() == Some(Reason::NotFound) => {
                warn!("{} does not exist (anymore)", descriptor.describe());
                Ok(false)
            }
            Err(e) if e.is_remote() => {
                error!("Deleting {} FAILED: {}", descriptor.describe(), e);
                Err(ProvisionError::DeleteFailed {
                    object: descriptor.describe(),
                    source: Box::new(e),
                })
            }
            Err(e) => Err(fatal(descriptor, e)),
        }
    }

    /// Patch the object in place with no fallback.
    ///
    /// A rejected patch (`Unprocessable Entity`) is wrapped in
    /// [`ProvisionError::PatchRejected`]; other failures are returned unchanged.
    #[instrument(skip(self, descriptor), fields(object = %descriptor.describe()))]
    pub async fn patch_only(&self, descriptor: &ObjectDescriptor, namespace: &str) -> Result<ApiResponse> {
        let api = self.resolve(descriptor)?;

        match api.invoke(Action::Patch, descriptor, namespace).await {
            Ok(res) => {
                debug!("{} PATCHED -> uid={}", descriptor.describe(), uid(&res));
                Ok(res)
            }
            Err(e) if e.reason() == Some(Reason::UnprocessableEntity) => {
                error!("Patch for {} rejected: {}", descriptor.describe(), e);
                Err(ProvisionError::PatchRejected {
                    object: descriptor.describe(),
                    source: Box::new(e),
                })
            }
            Err(e) => Err(fatal(descriptor, e)),
        }
    }

    /// Upsert every object of a manifest file, in file order
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub async fn apply_manifest(
        &self,
        path: impl AsRef<Path>,
        namespace: &str,
    ) -> Result<Vec<ApiResponse>> {
        let descriptors = load_manifests(path.as_ref())?;
        let mut responses = Vec::with_capacity(descriptors.len());

        for descriptor in &descriptors {
            responses.push(self.upsert(descriptor, namespace).await?);
        }

        info!(
            "Applied {} object(s) from {} to namespace {}",
            responses.len(),
            path.as_ref().display(),
            namespace
        );
        Ok(responses)
    }
}

async fn recreate(api: &RoutedApi<'_>, descriptor: &ObjectDescriptor, namespace: &str) -> Result<ApiResponse> {
    api.invoke(Action::Delete, descriptor, namespace).await?;
    debug!("{} DELETED", descriptor.describe());

    let res = api.invoke(Action::Create, descriptor, namespace).await?;
    debug!("{} CREATED -> uid={}", descriptor.describe(), uid(&res));
    Ok(res)
}

fn fatal(descriptor: &ObjectDescriptor, err: ProvisionError) -> ProvisionError {
    error!("Applying {} failed: {}", descriptor.describe(), err);
    err
}

fn uid(res: &ApiResponse) -> &str {
    res.uid().unwrap_or("?")
}
