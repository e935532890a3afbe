// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use kube::CustomResource;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Argo Workflow, only the fields the provisioner inspects are typed.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, schemars::JsonSchema)]
#[kube(group = "argoproj.io", version = "v1alpha1", kind = "Workflow")]
#[kube(namespaced)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entrypoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_template_ref: Option<WorkflowTemplateRef>,
    #[serde(flatten)]
    pub rest: BTreeMap<String, Value>,
}

#[derive(Serialize, Deserialize, Clone, Debug, schemars::JsonSchema)]
pub struct WorkflowTemplateRef {
    pub name: String,
}

impl Workflow {
    /// A workflow can run when it names an entrypoint or references a template
    pub fn is_runnable(&self) -> bool {
        self.spec.entrypoint.as_deref().is_some_and(|e| !e.is_empty())
            || self.spec.workflow_template_ref.is_some()
    }
}
