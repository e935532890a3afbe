// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Performs exactly one API call for one (action, descriptor) pair.

use crate::apply::naming::kind_token;
use crate::apply::registry::GroupApi;
use crate::config::PatchStrategy;
use crate::error::{ProvisionError, Result};
use crate::types::descriptor::ObjectDescriptor;
use kube::api::{Api, DeleteParams, Patch, PatchParams, PostParams};
use kube::core::response::Status;
use kube::core::{ApiResource, DynamicObject};
use kube::Client;
use std::fmt;
use tracing::debug;

/// The intent of a single step of the apply ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Action {
    Create,
    Patch,
    Delete,
    Replace,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Create, Action::Patch, Action::Delete, Action::Replace];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Create => "create",
            Action::Patch => "patch",
            Action::Delete => "delete",
            Action::Replace => "replace",
        })
    }
}

/// Raw response of an API call
#[derive(Debug, Clone)]
pub enum ApiResponse {
    Object(DynamicObject),
    /// Returned by some deletes instead of the deleted object
    Status(Status),
}

impl ApiResponse {
    /// uid of the object the call acted on, if the server reported one
    pub fn uid(&self) -> Option<&str> {
        match self {
            ApiResponse::Object(obj) => obj.metadata.uid.as_deref(),
            ApiResponse::Status(status) => status
                .details
                .as_ref()
                .map(|d| d.uid.as_str())
                .filter(|uid| !uid.is_empty()),
        }
    }

    pub fn into_object(self) -> Option<DynamicObject> {
        match self {
            ApiResponse::Object(obj) => Some(obj),
            ApiResponse::Status(_) => None,
        }
    }
}

/// What goes into the request body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallBody {
    /// The full descriptor
    Object,
    /// Empty delete options
    DeleteOptions,
}

/// A fully shaped call, computed without touching the network
#[derive(Debug, Clone)]
pub struct Call<'a> {
    pub action: Action,
    pub operation: String,
    pub namespace: Option<String>,
    pub name: Option<String>,
    pub body: CallBody,
    pub resource: &'a ApiResource,
}

/// Shape the call for `action` on `descriptor` within a capability set.
pub fn plan<'a>(
    group: &'a GroupApi,
    action: Action,
    descriptor: &ObjectDescriptor,
    namespace: &str,
) -> Result<Call<'a>> {
    let token = kind_token(descriptor.kind());
    let operation = group
        .operation(action, &token)
        .ok_or_else(|| ProvisionError::UnsupportedOperation {
            action,
            kind: descriptor.kind().to_string(),
        })?;

    let namespace = if operation.namespaced {
        if namespace.is_empty() {
            return Err(ProvisionError::InvalidDescriptor(format!(
                "{} requires a namespace",
                operation.name()
            )));
        }
        Some(namespace.to_string())
    } else {
        None
    };

    let name = match action {
        Action::Create => None,
        _ => Some(descriptor.require_name()?.to_string()),
    };

    let body = match action {
        Action::Delete => CallBody::DeleteOptions,
        _ => CallBody::Object,
    };

    Ok(Call {
        action,
        operation: operation.name(),
        namespace,
        name,
        body,
        resource: &operation.entry.resource,
    })
}

/// A capability set bound to a client connection
pub struct RoutedApi<'a> {
    group: &'a GroupApi,
    client: Client,
    patch_strategy: PatchStrategy,
}

impl<'a> RoutedApi<'a> {
    pub fn new(group: &'a GroupApi, client: Client, patch_strategy: PatchStrategy) -> Self {
        Self {
            group,
            client,
            patch_strategy,
        }
    }

    pub fn plan(
        &self,
        action: Action,
        descriptor: &ObjectDescriptor,
        namespace: &str,
    ) -> Result<Call<'a>> {
        plan(self.group, action, descriptor, namespace)
    }

    /// Perform one remote call. No retries happen here.
    pub async fn invoke(
        &self,
        action: Action,
        descriptor: &ObjectDescriptor,
        namespace: &str,
    ) -> Result<ApiResponse> {
        let call = self.plan(action, descriptor, namespace)?;
        debug!(
            "Invoking {}.{} for {}",
            self.group.name(),
            call.operation,
            descriptor.describe()
        );

        let api: Api<DynamicObject> = match call.namespace.as_deref() {
            Some(ns) => Api::namespaced_with(self.client.clone(), ns, call.resource),
            None => Api::all_with(self.client.clone(), call.resource),
        };
        let body = descriptor.as_object();
        let name = call.name.as_deref().unwrap_or_default();

        let response = match call.action {
            Action::Create => ApiResponse::Object(api.create(&PostParams::default(), body).await?),
            Action::Patch => {
                let patch = match self.patch_strategy {
                    PatchStrategy::Merge => Patch::Merge(body),
                    PatchStrategy::Strategic => Patch::Strategic(body),
                };
                ApiResponse::Object(api.patch(name, &PatchParams::default(), &patch).await?)
            }
            Action::Replace => {
                ApiResponse::Object(api.replace(name, &PostParams::default(), body).await?)
            }
            Action::Delete => api
                .delete(name, &DeleteParams::default())
                .await?
                .either(ApiResponse::Object, ApiResponse::Status),
        };

        Ok(response)
    }
}
