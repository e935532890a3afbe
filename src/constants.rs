// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// API routing conventions
pub mod routing {
    /// Group used for apiVersions without a `/` (e.g. `v1`)
    pub const CORE_GROUP: &str = "core";
    /// Vendor suffix stripped from group names before building a client name
    pub const GROUP_SUFFIX: &str = ".k8s.io";
    /// Suffix of every capability-set identifier, e.g. `CoreV1Api`
    pub const CLIENT_SUFFIX: &str = "Api";
}

/// Defaults for the namespace bootstrap
pub mod bootstrap {
    /// Name of the role binding granting the service account admin rights
    pub const ROLE_BINDING_NAME: &str = "default-admin";
    pub const ADMIN_CLUSTER_ROLE: &str = "admin";
    pub const SERVICE_ACCOUNT: &str = "default";
}

pub const DEFAULT_NAMESPACE: &str = "default";
