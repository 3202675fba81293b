// Copyright (c) 2022 MASSA LABS <info@massa.net>
//! Onboarding of a DON (decentralized oracle network) to a registrar.
//!
//! Every node is registered with the registrar under a single role label and
//! linked to it, then configured for each supported chain. The registrar may
//! acknowledge a chain config write without ever applying it, so each write
//! is verified by polling the registrar and compensated by a delete before
//! being tried again.
//!
//! Fleet construction and log replay stop at the first failing node, while
//! chain onboarding keeps going and reports every failing node at once.
#![warn(missing_docs)]

mod backoff;
mod config;
mod context;
mod don;
mod error;
mod node;
mod reconcile;

pub use config::{ChainConfigCheck, OnboardingConfig};
pub use context::OnboardingContext;
pub use don::Don;
pub use error::{NodeErrors, OnboardingError, OnboardingResult};
pub use node::{Node, NodeInfo};

#[cfg(test)]
mod tests;
