// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities for client creation, namespaces and manifest files.

pub mod client;
pub mod manifests;
pub mod namespaces;

pub use client::create_client;
pub use manifests::{load_manifests, parse_manifests};
pub use namespaces::create_namespace;
