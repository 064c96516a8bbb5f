// ── Device domain types ──

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

use super::client::ClientSnapshot;
use super::mac::MacAddress;

/// Canonical device type, normalized from the controller's `type` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Gateway,
    Switch,
    Ap,
    Other,
}

impl DeviceType {
    /// Classify a raw `type` value (`"gateway"`, `"switch"`, `"ap"`, ...).
    pub fn from_raw(raw: &str) -> Self {
        let lower = raw.to_ascii_lowercase();
        if lower.contains("gateway") {
            Self::Gateway
        } else if lower.contains("switch") {
            Self::Switch
        } else if lower == "ap" || lower.contains("eap") {
            Self::Ap
        } else {
            Self::Other
        }
    }
}

/// Where a device attaches upstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Uplink {
    pub device_mac: Option<MacAddress>,
    pub device_name: Option<String>,
    pub port: Option<i64>,
    /// Human-readable link speed, e.g. `"1 Gbps"`.
    pub link_speed: Option<String>,
    pub duplex: Option<bool>,
}

/// Client counts per radio band (access points only).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandClients {
    pub total: i64,
    pub band_2g: i64,
    pub band_5g: i64,
    pub band_5g2: i64,
    pub band_6g: i64,
}

/// Normalized projection of one adopted device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceSnapshot {
    pub mac: MacAddress,
    pub name: String,
    pub model: String,
    pub model_name: Option<String>,
    pub device_type: DeviceType,
    /// The controller's raw `type` string, `"unknown"` when absent.
    pub type_name: String,
    pub serial: Option<String>,
    pub ip: Option<String>,
    pub public_ip: Option<String>,
    pub status: Option<i64>,
    /// Human-readable `detailStatus`.
    pub detail_status: Option<String>,
    pub uptime_secs: Option<u64>,
    pub cpu_util: Option<f64>,
    pub mem_util: Option<f64>,
    pub firmware_version: Option<String>,
    pub need_upgrade: bool,
    pub client_count: i64,
    pub last_seen: Option<i64>,

    // ── Enrichments ──────────────────────────────────────────────────
    pub uplink: Option<Uplink>,
    /// Gateway temperature in °C.
    pub temperature: Option<f64>,
    pub band_clients: Option<BandClients>,
    /// Clients whose parent is this device.
    pub clients: Vec<ClientSnapshot>,
}

impl DeviceSnapshot {
    pub fn is_gateway(&self) -> bool {
        self.device_type == DeviceType::Gateway
    }

    pub fn is_ap(&self) -> bool {
        self.device_type == DeviceType::Ap
    }

    /// `true` when the controller reports the device as connected
    /// (`status` 1; the finer-grained reason lives in `detail_status`).
    pub fn is_connected(&self) -> bool {
        self.status == Some(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_type_classification() {
        assert_eq!(DeviceType::from_raw("gateway"), DeviceType::Gateway);
        assert_eq!(DeviceType::from_raw("Switch"), DeviceType::Switch);
        assert_eq!(DeviceType::from_raw("ap"), DeviceType::Ap);
        assert_eq!(DeviceType::from_raw("olt"), DeviceType::Other);
        assert_eq!(DeviceType::Ap.to_string(), "ap");
    }
}
