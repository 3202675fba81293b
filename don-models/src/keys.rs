// Copyright (c) 2022 MASSA LABS <info@massa.net>

use serde::{Deserialize, Serialize};

/// Expected acknowledgment of a log replay request
pub const REPLAY_STARTED_ACK: &str = "Replay started";

/// Encrypted account key exported by a node for a chain.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ExportedKey {
    /// account address
    pub address: String,
    /// key-store document, kept opaque
    pub crypto: serde_json::Value,
}
