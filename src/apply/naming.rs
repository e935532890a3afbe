// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Name conversions between Kubernetes identifiers and operation names.

use once_cell::sync::Lazy;
use regex::Regex;

static WORD_START: Lazy<Regex> = Lazy::new(|| Regex::new(r"(.)([A-Z][a-z]+)").unwrap());
static LOWER_UPPER: Lazy<Regex> = Lazy::new(|| Regex::new(r"([a-z0-9])([A-Z])").unwrap());

/// Convert a PascalCase kind into its snake_case operation token.
///
/// `ClusterRoleBinding` becomes `cluster_role_binding`, acronyms stay in one
/// piece (`HTTPRoute` becomes `http_route`).
pub fn kind_token(kind: &str) -> String {
    let split = WORD_START.replace_all(kind, "${1}_${2}");
    LOWER_UPPER
        .replace_all(&split, "${1}_${2}")
        .to_lowercase()
}

/// Upper-case the first character and lower-case the rest
pub fn capitalize(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
