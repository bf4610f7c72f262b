//! Coordinator configuration.

use serde::{Deserialize, Serialize};

/// Settings shared by every coordinator a [`Lobby`](crate::Lobby) spawns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Capacity of each coordinator's command mailbox. When it is full,
    /// callers wait for room rather than dropping commands.
    pub command_buffer: usize,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self { command_buffer: 64 }
    }
}
