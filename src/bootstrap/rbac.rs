// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::config::Config;
use crate::constants::bootstrap::ROLE_BINDING_NAME;
use k8s_openapi::api::rbac::v1::{RoleBinding, RoleRef, Subject};
use kube::api::ObjectMeta;

/// Role binding granting the bootstrap service account the admin cluster role
/// inside `namespace`
pub fn admin_role_binding(namespace: &str, config: &Config) -> RoleBinding {
    RoleBinding {
        metadata: ObjectMeta {
            name: Some(ROLE_BINDING_NAME.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        role_ref: RoleRef {
            api_group: "rbac.authorization.k8s.io".to_string(),
            kind: "ClusterRole".to_string(),
            name: config.admin_cluster_role.clone(),
        },
        subjects: Some(vec![Subject {
            kind: "ServiceAccount".to_string(),
            name: config.service_account.clone(),
            namespace: Some(namespace.to_string()),
            api_group: None,
        }]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::descriptor::ObjectDescriptor;

    #[test]
    fn test_binding_targets_namespace_service_account() {
        let binding = admin_role_binding("ns1", &Config::default());

        assert_eq!(binding.metadata.name.as_deref(), Some("default-admin"));
        assert_eq!(binding.role_ref.name, "admin");
        let subject = &binding.subjects.as_ref().unwrap()[0];
        assert_eq!(subject.kind, "ServiceAccount");
        assert_eq!(subject.name, "default");
        assert_eq!(subject.namespace.as_deref(), Some("ns1"));
    }

    #[test]
    fn test_binding_uses_configured_role() {
        let config = Config {
            admin_cluster_role: "edit".to_string(),
            service_account: "runner".to_string(),
            ..Default::default()
        };

        let descriptor = ObjectDescriptor::from_resource(&admin_role_binding("ns1", &config)).unwrap();
        let value = descriptor.to_value().unwrap();

        assert_eq!(descriptor.api_version(), "rbac.authorization.k8s.io/v1");
        assert_eq!(descriptor.kind(), "RoleBinding");
        assert_eq!(value["roleRef"]["name"], "edit");
        assert_eq!(value["subjects"][0]["name"], "runner");
    }
}
