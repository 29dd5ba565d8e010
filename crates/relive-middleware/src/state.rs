//! Process start identifier.

use std::sync::LazyLock;

use chrono::Utc;
use serde::Serialize;

static PROCESS_START: LazyLock<ServerStartTime> = LazyLock::new(ServerStartTime::now);

/// Unix timestamp (seconds) taken once when the server starts.
///
/// Clients remember the first value they receive and reload the page when a
/// reconnect reports a different one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ServerStartTime(i64);

impl ServerStartTime {
    /// Capture the current time.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now().timestamp())
    }

    /// Start time shared by everything in this process.
    ///
    /// Taken on first use and fixed for the life of the process.
    #[must_use]
    pub fn process() -> Self {
        *PROCESS_START
    }

    /// Use a known timestamp.
    #[must_use]
    pub const fn from_unix(seconds: i64) -> Self {
        Self(seconds)
    }

    /// Timestamp in unix seconds.
    #[must_use]
    pub const fn as_unix(self) -> i64 {
        self.0
    }
}
