// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Namespace management utilities

use crate::error::{ProvisionError, Result};
use k8s_openapi::api::core::v1::Namespace;
use kube::{
    api::{ObjectMeta, PostParams},
    Api, Client,
};
use tracing::{debug, info, instrument};

/// Create a namespace.
///
/// Returns `true` when it was created and `false` when it already existed.
#[instrument(skip(client))]
pub async fn create_namespace(client: &Client, namespace: &str) -> Result<bool> {
    let namespaces: Api<Namespace> = Api::all(client.clone());
    let ns = Namespace {
        metadata: ObjectMeta {
            name: Some(namespace.to_string()),
            ..Default::default()
        },
        ..Default::default()
    };

    match namespaces.create(&PostParams::default(), &ns).await {
        Ok(created) if created.metadata.name.as_deref() == Some(namespace) => {
            info!("Namespace {} created successfully", namespace);
            Ok(true)
        }
        Ok(created) => Err(ProvisionError::NamespaceError(format!(
            "API server returned namespace {:?} when creating {}",
            created.metadata.name, namespace
        ))),
        Err(kube::Error::Api(err)) if err.code == 409 => {
            debug!("Namespace {} already exists", namespace);
            Ok(false)
        }
        Err(e) => Err(ProvisionError::NamespaceError(format!(
            "Failed to create namespace {}: {}",
            namespace, e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{object_json, status_json, MockService};

    #[tokio::test]
    async fn test_create_new_namespace() {
        let mock = MockService::new().on_post(
            "/api/v1/namespaces",
            201,
            &object_json("v1", "Namespace", "ns1", None, "test-uid"),
        );

        assert!(create_namespace(&mock.client(), "ns1").await.unwrap());
    }

    #[tokio::test]
    async fn test_existing_namespace_is_not_an_error() {
        let mock = MockService::new().on_post(
            "/api/v1/namespaces",
            409,
            &status_json(409, "AlreadyExists", "namespaces \"ns1\" already exists"),
        );

        assert!(!create_namespace(&mock.client(), "ns1").await.unwrap());
    }

    #[tokio::test]
    async fn test_other_failures_are_reported() {
        let mock = MockService::new().on_post(
            "/api/v1/namespaces",
            403,
            &status_json(403, "Forbidden", "forbidden"),
        );

        let err = create_namespace(&mock.client(), "ns1").await.unwrap_err();

        assert!(matches!(err, ProvisionError::NamespaceError(_)), "{:?}", err);
    }
}
