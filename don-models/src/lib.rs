// Copyright (c) 2022 MASSA LABS <info@massa.net>
//! Plain data shared by the onboarding crates: identifiers, chains, node
//! roles, chain configuration records and job proposals.

#![warn(missing_docs)]
#![warn(unused_crate_dependencies)]

/// chain identifiers and descriptors
pub mod chain;
/// chain configuration records, as submitted and as read back
pub mod chain_config;
/// default values and settings loader
pub mod config;
/// models error
pub mod error;
/// string identifiers
pub mod ids;
/// job proposals and registrar link view
pub mod job_proposal;
/// exported key material
pub mod keys;
/// registration and link requests
pub mod registrar;
/// node role and its wire label
pub mod role;

pub use error::{ModelsError, ModelsResult};
