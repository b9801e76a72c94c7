//! Decision log rows.

use serde::{Deserialize, Serialize};

/// One user verdict on a tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub user: String,
    pub tile: String,
    pub decision: String,
}

impl LogEntry {
    /// Column names, in storage order.
    pub const COLUMNS: [&'static str; 3] = ["user", "tile", "decision"];

    #[must_use]
    pub fn new(
        user: impl Into<String>,
        tile: impl Into<String>,
        decision: impl Into<String>,
    ) -> Self {
        Self { user: user.into(), tile: tile.into(), decision: decision.into() }
    }

    /// Fields in storage order.
    #[must_use]
    pub fn fields(&self) -> [&str; 3] {
        [&self.user, &self.tile, &self.decision]
    }
}
