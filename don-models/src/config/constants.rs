// Copyright (c) 2022 MASSA LABS <info@massa.net>

use std::time::Duration;

/// Upper bound of the chain config attempt counter. The counter starts at 1
/// and the loop runs while it is below this bound.
pub const CHAIN_CONFIG_MAX_ATTEMPTS: u32 = 5;

/// Retries of the visibility check after each chain config submission
pub const CHAIN_CONFIG_VERIFY_MAX_RETRIES: u32 = 3;

/// First delay of the Fibonacci backoff between visibility checks
pub const CHAIN_CONFIG_VERIFY_BACKOFF_BASE: Duration = Duration::from_secs(1);

/// Nodes onboarded at the same time, 1 onboards them one after the other
pub const MAX_CONCURRENT_NODES: usize = 1;

/// Default base configuration file
pub const BASE_CONFIG_PATH: &str = "base_config/config.toml";

/// Default override configuration file
pub const OVERRIDE_CONFIG_PATH: &str = "config/config.toml";
