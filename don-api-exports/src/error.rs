// Copyright (c) 2022 MASSA LABS <info@massa.net>

use displaydoc::Display;
use thiserror::Error;

/// Result of a remote call
pub type ApiResult<T, E = ApiError> = core::result::Result<T, E>;

/// Error of a remote call. The onboarding does not distinguish a rejected
/// call from an unreachable peer.
#[non_exhaustive]
#[derive(Display, Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// {method} call failed: {reason}
    ClientError {
        /// remote method
        method: String,
        /// transport or remote error message
        reason: String,
    },
    /// unexpected response to {method}: {reason}
    UnexpectedResponse {
        /// remote method
        method: String,
        /// what was wrong
        reason: String,
    },
    /// not found: {0}
    NotFound(String),
    /// could not build client: {0}
    BuildError(String),
}
