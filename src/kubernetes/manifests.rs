// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Manifest file loading

use crate::error::{ProvisionError, Result};
use crate::types::descriptor::ObjectDescriptor;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

/// Read every object from a YAML manifest file
pub fn load_manifests(path: &Path) -> Result<Vec<ObjectDescriptor>> {
    let contents = std::fs::read_to_string(path).map_err(|source| ProvisionError::Manifest {
        path: path.to_path_buf(),
        source,
    })?;
    parse_manifests(&contents)
}

/// Parse a (multi-document) YAML string.
///
/// Empty documents are skipped. `kind: List` documents, and `*List` kinds
/// whose items are all objects with their own `kind`, are expanded into
/// their items.
pub fn parse_manifests(yaml: &str) -> Result<Vec<ObjectDescriptor>> {
    let mut descriptors = Vec::new();

    for document in serde_yaml::Deserializer::from_str(yaml) {
        let value = serde_yaml::Value::deserialize(document)?;
        if value.is_null() {
            continue;
        }
        let value: Value = serde_json::to_value(value)?;

        if is_list(&value) {
            let items = value
                .get("items")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            for item in items {
                descriptors.push(ObjectDescriptor::from_value(item)?);
            }
        } else {
            descriptors.push(ObjectDescriptor::from_value(value)?);
        }
    }

    Ok(descriptors)
}

fn is_list(value: &Value) -> bool {
    let Some(items) = value.get("items").and_then(Value::as_array) else {
        return false;
    };
    match value.get("kind").and_then(Value::as_str) {
        Some("List") => true,
        Some(kind) if kind.ends_with("List") => items
            .iter()
            .all(|item| item.get("kind").and_then(Value::as_str).is_some()),
        _ => false,
    }
}
