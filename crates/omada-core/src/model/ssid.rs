// ── SSID domain types ──

use serde::{Deserialize, Serialize};

/// One SSID, flattened with the WLAN group that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SsidState {
    pub ssid_id: String,
    pub ssid_name: String,
    pub wlan_id: String,
    pub wlan_name: Option<String>,
    pub broadcast: bool,
    pub guest: bool,
}
