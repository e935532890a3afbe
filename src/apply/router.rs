// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Maps an object descriptor onto the capability set that serves it.

use crate::apply::invoker::RoutedApi;
use crate::apply::naming::capitalize;
use crate::apply::registry::{GroupApi, Registry};
use crate::config::PatchStrategy;
use crate::constants::routing::{CLIENT_SUFFIX, CORE_GROUP, GROUP_SUFFIX};
use crate::error::{ProvisionError, Result};
use crate::types::descriptor::ObjectDescriptor;
use kube::Client;

/// An apiVersion split into group and version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiVersion<'a> {
    pub group: &'a str,
    pub version: &'a str,
}

impl<'a> ApiVersion<'a> {
    /// Split `group/version`; a bare `version` belongs to the core group
    pub fn parse(api_version: &'a str) -> Self {
        match api_version.split_once('/') {
            Some((group, version)) if !version.is_empty() => Self { group, version },
            Some((version, _)) => Self {
                group: CORE_GROUP,
                version,
            },
            None => Self {
                group: CORE_GROUP,
                version: api_version,
            },
        }
    }

    /// Capability-set identifier, e.g. `RbacAuthorizationV1Api`
    pub fn client_name(&self) -> String {
        let group = self
            .group
            .rsplit_once(GROUP_SUFFIX)
            .map_or(self.group, |(head, _)| head);
        let group: String = group.split('.').map(capitalize).collect();
        format!("{}{}{}", group, capitalize(self.version), CLIENT_SUFFIX)
    }
}

/// Resolves descriptors against a static registry
#[derive(Debug, Clone)]
pub struct Router {
    registry: Registry,
    patch_strategy: PatchStrategy,
}

impl Default for Router {
    fn default() -> Self {
        Self::new(Registry::builtin())
    }
}

impl Router {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            patch_strategy: PatchStrategy::default(),
        }
    }

    pub fn with_patch_strategy(mut self, patch_strategy: PatchStrategy) -> Self {
        self.patch_strategy = patch_strategy;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Find the capability set for a descriptor. Computed fresh on every call.
    pub fn route(&self, descriptor: &ObjectDescriptor) -> Result<&GroupApi> {
        let name = ApiVersion::parse(descriptor.api_version()).client_name();
        self.registry
            .group(&name)
            .ok_or(ProvisionError::Routing(name))
    }

    /// Route a descriptor and bind the capability set to a client connection
    pub fn resolve(&self, descriptor: &ObjectDescriptor, client: Client) -> Result<RoutedApi<'_>> {
        let group = self.route(descriptor)?;
        Ok(RoutedApi::new(group, client, self.patch_strategy))
    }
}
