// Raw wire types for Open API `result` payloads
//
// Every field the controller may omit is optional; normalization into
// domain snapshots happens in `omada-core`.

use serde::{Deserialize, Serialize};

// ── Sites ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteEntry {
    pub site_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub time_zone: Option<String>,
    #[serde(default)]
    pub scenario: Option<String>,
}

// ── Devices ─────────────────────────────────────────────────────────

/// Uptime arrives either as seconds or as `"4day(s) 17h 26m 57s"`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawUptime {
    Seconds(i64),
    Text(String),
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceEntry {
    #[serde(default)]
    pub mac: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub device_type: Option<String>,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub sn: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub public_ip: Option<String>,
    #[serde(default)]
    pub status: Option<i64>,
    #[serde(default)]
    pub status_category: Option<i64>,
    #[serde(default)]
    pub detail_status: Option<i64>,
    #[serde(default)]
    pub uptime: Option<RawUptime>,
    #[serde(default)]
    pub cpu_util: Option<f64>,
    #[serde(default)]
    pub mem_util: Option<f64>,
    #[serde(default)]
    pub firmware_version: Option<String>,
    #[serde(default)]
    pub need_upgrade: Option<bool>,
    #[serde(default)]
    pub client_num: Option<i64>,
    #[serde(default)]
    pub last_seen: Option<i64>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub led_setting: Option<i64>,
    #[serde(default)]
    pub tag_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UplinkEntry {
    pub device_mac: String,
    #[serde(default)]
    pub uplink_device_mac: Option<String>,
    #[serde(default)]
    pub uplink_device_name: Option<String>,
    #[serde(default)]
    pub uplink_device_port: Option<i64>,
    #[serde(default)]
    pub link_speed: Option<i64>,
    #[serde(default)]
    pub duplex: Option<bool>,
}

/// Per-band client counts for one AP.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BandStatsEntry {
    pub mac: String,
    #[serde(default)]
    pub client_num: Option<i64>,
    #[serde(default, rename = "clientNum2g")]
    pub client_num_2g: Option<i64>,
    #[serde(default, rename = "clientNum5g")]
    pub client_num_5g: Option<i64>,
    #[serde(default, rename = "clientNum5g2")]
    pub client_num_5g2: Option<i64>,
    #[serde(default, rename = "clientNum6g")]
    pub client_num_6g: Option<i64>,
}

// ── Switch ports / PoE ──────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoePortEntry {
    #[serde(default)]
    pub port: Option<i64>,
    #[serde(default)]
    pub switch_mac: Option<String>,
    #[serde(default)]
    pub switch_name: Option<String>,
    #[serde(default)]
    pub port_name: Option<String>,
    #[serde(default)]
    pub support_poe: Option<bool>,
    /// `1` when the owning switch supports PoE at all.
    #[serde(default)]
    pub switch_support_poe: Option<i64>,
    /// PoE mode: `1` enabled, `0` disabled.
    #[serde(default)]
    pub poe: Option<i64>,
    #[serde(default)]
    pub power: Option<f64>,
    #[serde(default)]
    pub voltage: Option<f64>,
    #[serde(default)]
    pub current: Option<f64>,
    #[serde(default)]
    pub poe_status: Option<f64>,
    #[serde(default)]
    pub pd_class: Option<String>,
    #[serde(default)]
    pub poe_display_type: Option<i64>,
    #[serde(default)]
    pub connected_status: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoeUsageEntry {
    pub mac: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub port_num: Option<i64>,
    #[serde(default)]
    pub total_power_used: Option<f64>,
    #[serde(default)]
    pub total_percent_used: Option<f64>,
    #[serde(default)]
    pub total_power: Option<f64>,
}

// ── Gateways ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayInfo {
    #[serde(default)]
    pub mac: Option<String>,
    #[serde(default)]
    pub temp: Option<f64>,
    #[serde(default)]
    pub cpu_util: Option<f64>,
    #[serde(default)]
    pub mem_util: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WanPortEntry {
    #[serde(default)]
    pub port_name: Option<String>,
    /// `1` link up, `0` down.
    #[serde(default)]
    pub status: Option<i64>,
    /// `1` internet reachable through this port.
    #[serde(default)]
    pub internet_state: Option<i64>,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub rx_rate: Option<f64>,
    #[serde(default)]
    pub tx_rate: Option<f64>,
    #[serde(default)]
    pub rx: Option<f64>,
    #[serde(default)]
    pub tx: Option<f64>,
    #[serde(default)]
    pub latency: Option<f64>,
    #[serde(default)]
    pub loss: Option<f64>,
    #[serde(default)]
    pub speed: Option<i64>,
}

// ── Wireless ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WlanEntry {
    pub wlan_id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SsidEntry {
    pub ssid_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub broadcast: Option<bool>,
    #[serde(default)]
    pub band: Option<i64>,
    #[serde(default)]
    pub security: Option<i64>,
    #[serde(default)]
    pub guest_net_enable: Option<bool>,
}

/// An SSID flattened with the WLAN group that owns it.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WlanSsid {
    pub wlan_id: String,
    pub wlan_name: Option<String>,
    pub ssid: SsidEntry,
}

// ── Clients ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientEntry {
    #[serde(default)]
    pub mac: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub host_name: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub device_type: Option<String>,
    #[serde(default)]
    pub os_name: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub wireless: Option<bool>,
    #[serde(default)]
    pub ssid: Option<String>,
    #[serde(default)]
    pub signal_level: Option<i64>,
    #[serde(default)]
    pub rssi: Option<i64>,
    #[serde(default)]
    pub ap_name: Option<String>,
    #[serde(default)]
    pub ap_mac: Option<String>,
    #[serde(default)]
    pub channel: Option<i64>,
    #[serde(default)]
    pub switch_name: Option<String>,
    #[serde(default)]
    pub switch_mac: Option<String>,
    #[serde(default)]
    pub port: Option<i64>,
    #[serde(default)]
    pub gateway_name: Option<String>,
    #[serde(default)]
    pub gateway_mac: Option<String>,
    #[serde(default)]
    pub network_name: Option<String>,
    #[serde(default)]
    pub vid: Option<i64>,
    #[serde(default)]
    pub activity: Option<i64>,
    #[serde(default)]
    pub upload_activity: Option<i64>,
    #[serde(default)]
    pub traffic_down: Option<i64>,
    #[serde(default)]
    pub traffic_up: Option<i64>,
    #[serde(default)]
    pub uptime: Option<i64>,
    #[serde(default)]
    pub last_seen: Option<i64>,
    #[serde(default)]
    pub blocked: Option<bool>,
    #[serde(default)]
    pub guest: Option<bool>,
}

// ── Applications ────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationEntry {
    pub application_id: i64,
    #[serde(default)]
    pub application_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub family: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppTrafficEntry {
    pub application_id: i64,
    #[serde(default)]
    pub application_name: Option<String>,
    #[serde(default)]
    pub upload: Option<i64>,
    #[serde(default)]
    pub download: Option<i64>,
    #[serde(default)]
    pub traffic: Option<i64>,
}
