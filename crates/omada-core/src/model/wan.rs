// ── WAN port domain types ──

use serde::{Deserialize, Serialize};

/// Link state of one gateway WAN port.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WanPortState {
    pub port_name: String,
    pub connected: bool,
    pub internet: bool,
    pub ip: Option<String>,
    /// Download rate (KB/s, as reported).
    pub rx_rate: f64,
    /// Upload rate (KB/s, as reported).
    pub tx_rate: f64,
    pub rx_total: f64,
    pub tx_total: f64,
    /// Milliseconds; only meaningful while connected.
    pub latency: Option<f64>,
    /// Percent; only meaningful while connected.
    pub loss: Option<f64>,
    pub link_speed: Option<String>,
}
