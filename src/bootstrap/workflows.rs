// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Argo workflow submission

use crate::apply::{Action, Reconciler};
use crate::error::{ProvisionError, Result};
use crate::types::descriptor::ObjectDescriptor;
use crate::types::workflow::Workflow;
use kube::Resource;
use tracing::{info, instrument};

/// Check that a descriptor is a runnable Argo workflow
pub fn validate_workflow(descriptor: &ObjectDescriptor) -> Result<Workflow> {
    if descriptor.kind() != Workflow::kind(&()) || descriptor.api_version() != Workflow::api_version(&()) {
        return Err(ProvisionError::InvalidDescriptor(format!(
            "{} is not an {} {}",
            descriptor.describe(),
            Workflow::api_version(&()),
            Workflow::kind(&())
        )));
    }

    let workflow: Workflow = serde_json::from_value(descriptor.to_value()?)?;
    if !workflow.is_runnable() {
        return Err(ProvisionError::InvalidDescriptor(format!(
            "{} has neither an entrypoint nor a workflowTemplateRef",
            descriptor.describe()
        )));
    }
    Ok(workflow)
}

/// Submit a workflow; every submission creates a new run.
///
/// Returns the name the API server gave the workflow.
#[instrument(skip(reconciler, descriptor), fields(object = %descriptor.describe()))]
pub async fn submit_workflow(
    reconciler: &Reconciler,
    descriptor: &ObjectDescriptor,
    namespace: &str,
) -> Result<String> {
    validate_workflow(descriptor)?;

    let response = reconciler.invoke(Action::Create, descriptor, namespace).await?;
    let name = response
        .into_object()
        .and_then(|obj| obj.metadata.name)
        .ok_or_else(|| {
            ProvisionError::InvalidDescriptor(format!(
                "API server returned no name for submitted {}",
                descriptor.describe()
            ))
        })?;

    info!("Submitted workflow {} in namespace {}", name, namespace);
    Ok(name)
}
