// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Static routing table from capability sets to the resource kinds they serve.
//!
//! A capability set is the group of operations available for one API group
//! and version, named the way the Kubernetes client libraries name their API
//! classes (`CoreV1Api`, `RbacAuthorizationV1Api`, ...). Each set lists the
//! kinds it serves, split by scope, so an operation is found by looking at
//! the cluster-scoped kinds first and the namespaced kinds second.

use crate::apply::naming::kind_token;
use crate::apply::router::ApiVersion;
use crate::apply::Action;
use crate::types::workflow::Workflow;
use k8s_openapi::api::apps::v1::{DaemonSet, Deployment, StatefulSet};
use k8s_openapi::api::batch::v1::{CronJob, Job};
use k8s_openapi::api::core::v1::{
    ConfigMap, Namespace, PersistentVolumeClaim, Pod, Secret, Service, ServiceAccount,
};
use k8s_openapi::api::networking::v1::{Ingress, NetworkPolicy};
use k8s_openapi::api::policy::v1::PodDisruptionBudget;
use k8s_openapi::api::rbac::v1::{ClusterRole, ClusterRoleBinding, Role, RoleBinding};
use k8s_openapi::api::scheduling::v1::PriorityClass;
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use k8s_openapi::ClusterResourceScope;
use kube::core::ApiResource;
use kube::discovery::Scope;
use kube::Resource;
use std::any::TypeId;
use std::collections::{BTreeMap, BTreeSet};

/// One resource kind served by a capability set
#[derive(Debug, Clone)]
pub struct ResourceEntry {
    pub resource: ApiResource,
    pub scope: Scope,
    actions: BTreeSet<Action>,
}

impl ResourceEntry {
    /// Entry supporting every action
    pub fn new(resource: ApiResource, scope: Scope) -> Self {
        Self {
            resource,
            scope,
            actions: Action::ALL.into_iter().collect(),
        }
    }

    /// Entry for a statically typed resource, scope taken from its type
    pub fn of<K>() -> Self
    where
        K: Resource<DynamicType = ()>,
        K::Scope: 'static,
    {
        let scope = if TypeId::of::<K::Scope>() == TypeId::of::<ClusterResourceScope>() {
            Scope::Cluster
        } else {
            Scope::Namespaced
        };
        Self::new(ApiResource::erase::<K>(&()), scope)
    }

    /// Restrict the entry to the given actions
    pub fn with_actions(mut self, actions: impl IntoIterator<Item = Action>) -> Self {
        self.actions = actions.into_iter().collect();
        self
    }

    pub fn supports(&self, action: Action) -> bool {
        self.actions.contains(&action)
    }

    pub fn kind_token(&self) -> String {
        kind_token(&self.resource.kind)
    }
}

/// A resolved operation on a capability set
#[derive(Debug, Clone)]
pub struct Operation<'a> {
    pub action: Action,
    pub kind_token: String,
    pub namespaced: bool,
    pub entry: &'a ResourceEntry,
}

impl Operation<'_> {
    /// Operation name in client-library style, e.g. `create_namespaced_role_binding`
    pub fn name(&self) -> String {
        if self.namespaced {
            format!("{}_namespaced_{}", self.action, self.kind_token)
        } else {
            format!("{}_{}", self.action, self.kind_token)
        }
    }
}

/// All operations of one API group and version
#[derive(Debug, Clone, Default)]
pub struct GroupApi {
    name: String,
    cluster: BTreeMap<String, ResourceEntry>,
    namespaced: BTreeMap<String, ResourceEntry>,
}

impl GroupApi {
    fn new(name: String) -> Self {
        Self {
            name,
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn insert(&mut self, entry: ResourceEntry) {
        let token = entry.kind_token();
        match entry.scope {
            Scope::Cluster => self.cluster.insert(token, entry),
            Scope::Namespaced => self.namespaced.insert(token, entry),
        };
    }

    /// Find the operation for an action on a kind.
    ///
    /// The namespace-agnostic `{action}_{kind}` wins when it exists, otherwise
    /// `{action}_namespaced_{kind}` is used.
    pub fn operation(&self, action: Action, kind_token: &str) -> Option<Operation<'_>> {
        if let Some(entry) = self.cluster.get(kind_token).filter(|e| e.supports(action)) {
            return Some(Operation {
                action,
                kind_token: kind_token.to_string(),
                namespaced: false,
                entry,
            });
        }

        self.namespaced
            .get(kind_token)
            .filter(|e| e.supports(action))
            .map(|entry| Operation {
                action,
                kind_token: kind_token.to_string(),
                namespaced: true,
                entry,
            })
    }

    /// Every operation name this capability set exposes, sorted
    pub fn operation_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .cluster
            .keys()
            .chain(self.namespaced.keys())
            .flat_map(|token| {
                Action::ALL
                    .into_iter()
                    .filter_map(move |action| self.operation(action, token).map(|op| op.name()))
            })
            .collect();
        names.sort();
        names
    }
}

/// Routing table keyed by capability-set identifier
#[derive(Debug, Clone, Default)]
pub struct Registry {
    groups: BTreeMap<String, GroupApi>,
}

impl Registry {
    /// Registry with the built-in kinds needed to install and run workflows
    pub fn builtin() -> Self {
        Registry::default()
            .with::<Namespace>()
            .with::<ConfigMap>()
            .with::<Secret>()
            .with::<ServiceAccount>()
            .with::<Service>()
            .with::<Pod>()
            .with::<PersistentVolumeClaim>()
            .with::<Deployment>()
            .with::<StatefulSet>()
            .with::<DaemonSet>()
            .with::<Job>()
            .with::<CronJob>()
            .with::<Role>()
            .with::<RoleBinding>()
            .with::<ClusterRole>()
            .with::<ClusterRoleBinding>()
            .with::<CustomResourceDefinition>()
            .with::<PriorityClass>()
            .with::<Ingress>()
            .with::<NetworkPolicy>()
            .with::<PodDisruptionBudget>()
            .with::<Workflow>()
    }

    /// Add a statically typed resource kind
    pub fn with<K>(mut self) -> Self
    where
        K: Resource<DynamicType = ()>,
        K::Scope: 'static,
    {
        self.register(ResourceEntry::of::<K>());
        self
    }

    /// Add a resource kind, e.g. a CRD known only by group/version/kind/plural
    pub fn register(&mut self, entry: ResourceEntry) {
        let name = ApiVersion::parse(&entry.resource.api_version).client_name();
        self.groups
            .entry(name.clone())
            .or_insert_with(|| GroupApi::new(name))
            .insert(entry);
    }

    pub fn group(&self, name: &str) -> Option<&GroupApi> {
        self.groups.get(name)
    }

    pub fn groups(&self) -> impl Iterator<Item = &GroupApi> {
        self.groups.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::core::GroupVersionKind;

    #[test]
    fn test_builtin_namespace_is_cluster_scoped() {
        let registry = Registry::builtin();
        let core = registry.group("CoreV1Api").unwrap();

        let op = core.operation(Action::Create, "namespace").unwrap();

        assert!(!op.namespaced);
        assert_eq!(op.name(), "create_namespace");
        assert_eq!(op.entry.resource.plural, "namespaces");
    }

    #[test]
    fn test_builtin_role_binding_is_namespaced() {
        let registry = Registry::builtin();
        let rbac = registry.group("RbacAuthorizationV1Api").unwrap();

        let op = rbac.operation(Action::Create, "role_binding").unwrap();
        assert!(op.namespaced);
        assert_eq!(op.name(), "create_namespaced_role_binding");

        let op = rbac.operation(Action::Delete, "cluster_role_binding").unwrap();
        assert_eq!(op.name(), "delete_cluster_role_binding");
    }

    #[test]
    fn test_workflow_crd_is_registered() {
        let registry = Registry::builtin();
        let argo = registry.group("ArgoprojIoV1alpha1Api").unwrap();

        let op = argo.operation(Action::Patch, "workflow").unwrap();

        assert_eq!(op.name(), "patch_namespaced_workflow");
        assert_eq!(op.entry.resource.group, "argoproj.io");
    }

    #[test]
    fn test_unknown_kind_has_no_operation() {
        let registry = Registry::builtin();
        let core = registry.group("CoreV1Api").unwrap();

        assert!(core.operation(Action::Create, "deployment").is_none());
    }

    #[test]
    fn test_restricted_actions() {
        let mut registry = Registry::default();
        let gvk = GroupVersionKind::gvk("example.com", "v1", "Widget");
        registry.register(
            ResourceEntry::new(ApiResource::from_gvk_with_plural(&gvk, "widgets"), Scope::Namespaced)
                .with_actions([Action::Create, Action::Delete]),
        );
        let group = registry.group("ExampleComV1Api").unwrap();

        assert!(group.operation(Action::Create, "widget").is_some());
        assert!(group.operation(Action::Patch, "widget").is_none());
        assert_eq!(
            group.operation_names(),
            vec!["create_namespaced_widget", "delete_namespaced_widget"]
        );
    }
}
