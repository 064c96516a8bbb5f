// ── Client domain types ──

use serde::{Deserialize, Serialize};

use super::mac::MacAddress;

/// How a client reaches the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionKind {
    Wireless,
    Wired,
}

/// Normalized projection of one connected client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSnapshot {
    pub mac: MacAddress,
    /// `name`, else `hostName`, else `"Unknown"`.
    pub name: String,
    pub host_name: Option<String>,
    pub ip: Option<String>,
    pub vendor: Option<String>,
    pub device_type: Option<String>,
    pub os_name: Option<String>,
    pub active: bool,
    pub wireless: bool,
    pub ssid: Option<String>,
    pub signal_level: Option<i64>,
    pub rssi: Option<i64>,
    pub channel: Option<i64>,
    pub ap_name: Option<String>,
    pub ap_mac: Option<MacAddress>,
    pub switch_name: Option<String>,
    pub switch_mac: Option<MacAddress>,
    pub port: Option<i64>,
    pub gateway_name: Option<String>,
    pub gateway_mac: Option<MacAddress>,
    pub network_name: Option<String>,
    pub vlan: Option<i64>,
    /// Current download rate, bytes/s.
    pub activity: i64,
    /// Current upload rate, bytes/s.
    pub upload_activity: i64,
    pub traffic_down: i64,
    pub traffic_up: i64,
    pub uptime_secs: Option<i64>,
    pub last_seen: Option<i64>,
    pub blocked: bool,
    pub guest: bool,
}

impl ClientSnapshot {
    pub fn connection(&self) -> ConnectionKind {
        if self.wireless {
            ConnectionKind::Wireless
        } else {
            ConnectionKind::Wired
        }
    }
}
