// Copyright (c) 2022 MASSA LABS <info@massa.net>

use displaydoc::Display;
use thiserror::Error;

/// Result alias for models operations
pub type ModelsResult<T, E = ModelsError> = core::result::Result<T, E>;

/// models error
#[non_exhaustive]
#[derive(Display, Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelsError {
    /// chain id parse error: {0}
    ChainIdParseError(String),
    /// unknown chain type: {0}
    UnknownChainType(String),
    /// invalid node role label: {0}
    InvalidRoleLabel(String),
    /// settings error: {0}
    SettingsError(String),
}
