// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Untyped Kubernetes object descriptors as read from manifests.

use crate::error::{ProvisionError, Result};
use kube::core::DynamicObject;
use serde::Serialize;
use serde_json::Value;

/// A complete object spec (apiVersion, kind, metadata and body) to be applied.
///
/// `kind` and `apiVersion` are guaranteed to be present and non-empty.
/// Metadata is held as an `ObjectMeta`: keys it does not know are dropped
/// when the descriptor is built. The rest of the body is kept as written.
#[derive(Debug, Clone)]
pub struct ObjectDescriptor {
    object: DynamicObject,
}

impl ObjectDescriptor {
    /// Build a descriptor from a JSON document
    pub fn from_value(value: Value) -> Result<Self> {
        let Some(fields) = value.as_object() else {
            return Err(ProvisionError::InvalidDescriptor(
                "object descriptor must be a mapping".to_string(),
            ));
        };

        for key in ["apiVersion", "kind"] {
            let present = fields
                .get(key)
                .and_then(Value::as_str)
                .is_some_and(|s| !s.is_empty());
            if !present {
                return Err(ProvisionError::InvalidDescriptor(format!(
                    "missing or empty {}",
                    key
                )));
            }
        }

        if !fields.get("metadata").is_some_and(Value::is_object) {
            return Err(ProvisionError::InvalidDescriptor(
                "missing metadata".to_string(),
            ));
        }

        let object: DynamicObject = serde_json::from_value(value)?;
        Ok(Self { object })
    }

    /// Build a descriptor from a single YAML document
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let value: serde_yaml::Value = serde_yaml::from_str(yaml)?;
        Self::from_value(serde_json::to_value(value)?)
    }

    /// Build a descriptor from a typed resource (e.g. a `k8s_openapi` struct)
    pub fn from_resource<K: Serialize>(resource: &K) -> Result<Self> {
        Self::from_value(serde_json::to_value(resource)?)
    }

    pub fn kind(&self) -> &str {
        self.object
            .types
            .as_ref()
            .map(|t| t.kind.as_str())
            .unwrap_or_default()
    }

    pub fn api_version(&self) -> &str {
        self.object
            .types
            .as_ref()
            .map(|t| t.api_version.as_str())
            .unwrap_or_default()
    }

    pub fn name(&self) -> Option<&str> {
        self.object.metadata.name.as_deref()
    }

    pub fn namespace(&self) -> Option<&str> {
        self.object.metadata.namespace.as_deref()
    }

    /// The object name, required by every action except create
    pub fn require_name(&self) -> Result<&str> {
        self.name().ok_or_else(|| {
            ProvisionError::InvalidDescriptor(format!("{} has no metadata.name", self.kind()))
        })
    }

    /// Human readable identity used in logs and errors: `Kind 'name'`
    pub fn describe(&self) -> String {
        let name = self
            .name()
            .or(self.object.metadata.generate_name.as_deref())
            .unwrap_or("<unnamed>");
        format!("{} '{}'", self.kind(), name)
    }

    pub fn as_object(&self) -> &DynamicObject {
        &self.object
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(&self.object)?)
    }
}
