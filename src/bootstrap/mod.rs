// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Namespace bootstrap: create the namespace, install the supporting
//! manifests and admin binding, then submit workflows.

pub mod rbac;
pub mod workflows;

pub use rbac::admin_role_binding;
pub use workflows::{submit_workflow, validate_workflow};

use crate::apply::Reconciler;
use crate::config::Config;
use crate::error::Result;
use crate::kubernetes::{create_namespace, load_manifests};
use crate::types::descriptor::ObjectDescriptor;
use std::path::PathBuf;
use tracing::{info, instrument};

/// Objects to install into a new namespace and workflows to run in it
#[derive(Debug, Clone, Default)]
pub struct ProvisionPlan {
    pub install: Vec<ObjectDescriptor>,
    pub workflows: Vec<ObjectDescriptor>,
}

impl ProvisionPlan {
    /// Load the plan from manifest files
    pub fn from_files(install: &[PathBuf], workflows: &[PathBuf]) -> Result<Self> {
        let mut plan = ProvisionPlan::default();
        for path in install {
            plan.install.extend(load_manifests(path)?);
        }
        for path in workflows {
            for descriptor in load_manifests(path)? {
                validate_workflow(&descriptor)?;
                plan.workflows.push(descriptor);
            }
        }
        Ok(plan)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvisionReport {
    pub namespace_created: bool,
    /// Number of objects upserted, the admin role binding included
    pub applied: usize,
    /// Names of the submitted workflows
    pub workflows: Vec<String>,
}

/// Provision `namespace`.
///
/// Installation only happens when the namespace is new; an existing
/// namespace is assumed to be installed already. Workflows are submitted in
/// both cases.
#[instrument(skip(reconciler, config, plan))]
pub async fn provision(
    reconciler: &Reconciler,
    config: &Config,
    namespace: &str,
    plan: &ProvisionPlan,
) -> Result<ProvisionReport> {
    let mut report = ProvisionReport {
        namespace_created: create_namespace(reconciler.client(), namespace).await?,
        ..Default::default()
    };

    if report.namespace_created {
        for descriptor in &plan.install {
            reconciler.upsert(descriptor, namespace).await?;
            report.applied += 1;
        }

        let binding = ObjectDescriptor::from_resource(&admin_role_binding(namespace, config))?;
        reconciler.upsert(&binding, namespace).await?;
        report.applied += 1;

        info!(
            "Installed {} object(s) into namespace {}",
            report.applied, namespace
        );
    } else {
        info!("Namespace {} already exists, skipping installation", namespace);
    }

    for workflow in &plan.workflows {
        report
            .workflows
            .push(submit_workflow(reconciler, workflow, namespace).await?);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apply::Router;
    use crate::kubernetes::parse_manifests;
    use crate::test_utils::{object_json, status_json, MockService};

    const INSTALL: &str = r#"
apiVersion: v1
kind: ServiceAccount
metadata:
  name: argo
---
apiVersion: apps/v1
kind: Deployment
metadata:
  name: workflow-controller
spec:
  replicas: 1
"#;

    const WORKFLOW: &str = r#"
apiVersion: argoproj.io/v1alpha1
kind: Workflow
metadata:
  generateName: artifact-passing-
spec:
  entrypoint: artifact-example
"#;

    fn plan() -> ProvisionPlan {
        ProvisionPlan {
            install: parse_manifests(INSTALL).unwrap(),
            workflows: parse_manifests(WORKFLOW).unwrap(),
        }
    }

    fn with_workflow_submission(mock: MockService) -> MockService {
        mock.on_post(
            "/apis/argoproj.io/v1alpha1/namespaces/ns1/workflows",
            201,
            &object_json("argoproj.io/v1alpha1", "Workflow", "artifact-passing-abcde", Some("ns1"), "uid-wf"),
        )
    }

    #[tokio::test]
    async fn test_new_namespace_is_installed() {
        let mock = with_workflow_submission(
            MockService::new()
                .on_post("/api/v1/namespaces", 201, &object_json("v1", "Namespace", "ns1", None, "uid-ns"))
                .on_post(
                    "/api/v1/namespaces/ns1/serviceaccounts",
                    201,
                    &object_json("v1", "ServiceAccount", "argo", Some("ns1"), "uid-sa"),
                )
                .on_post(
                    "/apis/apps/v1/namespaces/ns1/deployments",
                    201,
                    &object_json("apps/v1", "Deployment", "workflow-controller", Some("ns1"), "uid-dep"),
                )
                .on_post(
                    "/apis/rbac.authorization.k8s.io/v1/namespaces/ns1/rolebindings",
                    201,
                    &object_json("rbac.authorization.k8s.io/v1", "RoleBinding", "default-admin", Some("ns1"), "uid-rb"),
                ),
        );
        let reconciler = Reconciler::new(mock.client(), Router::default());

        let report = provision(&reconciler, &Config::default(), "ns1", &plan()).await.unwrap();

        assert_eq!(
            report,
            ProvisionReport {
                namespace_created: true,
                applied: 3,
                workflows: vec!["artifact-passing-abcde".to_string()],
            }
        );
        assert_eq!(mock.count("POST"), 5);
    }

    #[tokio::test]
    async fn test_existing_namespace_only_submits_workflows() {
        let mock = with_workflow_submission(MockService::new().on_post(
            "/api/v1/namespaces",
            409,
            &status_json(409, "AlreadyExists", "namespaces \"ns1\" already exists"),
        ));
        let reconciler = Reconciler::new(mock.client(), Router::default());

        let report = provision(&reconciler, &Config::default(), "ns1", &plan()).await.unwrap();

        assert!(!report.namespace_created);
        assert_eq!(report.applied, 0);
        assert_eq!(report.workflows.len(), 1);
        assert_eq!(mock.count("POST"), 2);
    }

    #[tokio::test]
    async fn test_install_failure_stops_provisioning() {
        let mock = with_workflow_submission(
            MockService::new()
                .on_post("/api/v1/namespaces", 201, &object_json("v1", "Namespace", "ns1", None, "uid-ns"))
                .on_post(
                    "/api/v1/namespaces/ns1/serviceaccounts",
                    403,
                    &status_json(403, "Forbidden", "forbidden"),
                ),
        );
        let reconciler = Reconciler::new(mock.client(), Router::default());

        let err = provision(&reconciler, &Config::default(), "ns1", &plan()).await.unwrap_err();

        assert_eq!(err.reason(), Some(crate::error::Reason::Other(403)));
        assert!(mock
            .requests()
            .iter()
            .all(|r| !r.path.contains("workflows")));
    }
}
