// ── Application traffic domain types ──

use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::mac::MacAddress;

/// Byte counters for one application on one client since local midnight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppUsage {
    pub application_id: i64,
    pub name: String,
    pub upload: i64,
    pub download: i64,
    pub traffic: i64,
}

/// One published cycle of the application traffic poller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppTrafficSnapshot {
    /// Local midnight of the current accumulation day.
    pub reset_at: DateTime<Local>,
    pub window_start: DateTime<Local>,
    pub window_end: DateTime<Local>,
    /// client MAC → application id → usage. Clients with no matching
    /// application records this cycle are absent.
    pub clients: BTreeMap<MacAddress, BTreeMap<i64, AppUsage>>,
}

impl AppTrafficSnapshot {
    pub fn usage(&self, client: &MacAddress, application_id: i64) -> Option<&AppUsage> {
        self.clients.get(client)?.get(&application_id)
    }
}
