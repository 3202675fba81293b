// Copyright (c) 2022 MASSA LABS <info@massa.net>
//! Interfaces of the remote systems the onboarding talks to: the two APIs
//! of a worker node and the registrar service.
//!
//! Implementations over JSON-RPC live in `don_sdk`. With the `test-exports`
//! feature, mocks of every trait and an in-memory registrar that can drop
//! writes are exported for tests.
#![warn(missing_docs)]

mod error;
mod node_api;
mod registrar;

pub use error::{ApiError, ApiResult};
pub use node_api::{NodeAdminApi, NodeClient, NodeOperationalApi};
pub use registrar::RegistrarService;

#[cfg(any(test, feature = "test-exports"))]
pub use node_api::{MockNodeAdminApi, MockNodeOperationalApi};
#[cfg(any(test, feature = "test-exports"))]
pub use registrar::MockRegistrarService;

/// Test utils
#[cfg(any(test, feature = "test-exports"))]
pub mod test_exports;
