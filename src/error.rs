// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::apply::Action;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Machine-readable reason decoded from a structured Kubernetes API error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    /// 409: the object already exists
    Conflict,
    /// 422: the request is semantically invalid (e.g. an immutable field changed)
    UnprocessableEntity,
    /// 404: the object does not exist
    NotFound,
    Other(u16),
}

impl Reason {
    pub fn from_code(code: u16) -> Self {
        match code {
            404 => Reason::NotFound,
            409 => Reason::Conflict,
            422 => Reason::UnprocessableEntity,
            other => Reason::Other(other),
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::Conflict => f.write_str("Conflict"),
            Reason::UnprocessableEntity => f.write_str("Unprocessable Entity"),
            Reason::NotFound => f.write_str("Not Found"),
            Reason::Other(code) => write!(f, "HTTP {}", code),
        }
    }
}

#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("Kubernetes API error ({reason}): {source}")]
    Remote {
        reason: Reason,
        #[source]
        source: kube::Error,
    },

    #[error("Kubernetes client error: {0}")]
    Client(#[source] kube::Error),

    #[error("No API client matches {0}")]
    Routing(String),

    #[error("No {action} operation available for kind {kind}")]
    UnsupportedOperation { action: Action, kind: String },

    #[error("Invalid object descriptor: {0}")]
    InvalidDescriptor(String),

    #[error("Failure updating {object}: {source}")]
    LadderExhausted {
        object: String,
        #[source]
        source: Box<ProvisionError>,
    },

    #[error("Patch for {object} rejected: {source}")]
    PatchRejected {
        object: String,
        #[source]
        source: Box<ProvisionError>,
    },

    #[error("Deleting {object} failed: {source}")]
    DeleteFailed {
        object: String,
        #[source]
        source: Box<ProvisionError>,
    },

    #[error("Failed to read manifest {}: {source}", path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to convert object: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse kubeconfig: {0}")]
    KubeconfigError(String),

    #[error("Namespace creation failed: {0}")]
    NamespaceError(String),
}

impl From<kube::Error> for ProvisionError {
    fn from(err: kube::Error) -> Self {
        let reason = match &err {
            kube::Error::Api(response) => Reason::from_code(response.code),
            _ => return ProvisionError::Client(err),
        };
        ProvisionError::Remote { reason, source: err }
    }
}

impl ProvisionError {
    /// The decoded remote reason, if this error came back from the API server.
    pub fn reason(&self) -> Option<Reason> {
        match self {
            ProvisionError::Remote { reason, .. } => Some(*reason),
            _ => None,
        }
    }

    /// True for failures produced by the remote call itself, as opposed to
    /// local routing or descriptor problems.
    pub fn is_remote(&self) -> bool {
        matches!(self, ProvisionError::Remote { .. } | ProvisionError::Client(_))
    }
}

pub type Result<T> = std::result::Result<T, ProvisionError>;
