// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Generic apply engine: routing, single-call invocation and the
//! create/patch/recreate reconciliation ladder.

pub mod invoker;
pub mod naming;
pub mod reconciler;
pub mod registry;
pub mod router;

pub use invoker::{Action, ApiResponse, RoutedApi};
pub use reconciler::Reconciler;
pub use registry::{GroupApi, Registry, ResourceEntry};
pub use router::{ApiVersion, Router};
