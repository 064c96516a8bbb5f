// ── Site domain types ──

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::device::DeviceSnapshot;
use super::mac::MacAddress;
use super::port::{PoeBudget, PoePortState, PortKey};
use super::ssid::SsidState;
use super::wan::WanPortState;

/// A site visible to the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub id: String,
    pub name: String,
    pub region: Option<String>,
    pub time_zone: Option<String>,
}

/// One published cycle of the site aggregator.
///
/// An empty enrichment map means the enrichment was not applicable or
/// failed this cycle; the two cases are not distinguished here beyond
/// `failed_steps`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSnapshot {
    pub site_id: String,
    pub site_name: String,
    pub devices: BTreeMap<MacAddress, DeviceSnapshot>,
    pub poe_ports: BTreeMap<PortKey, PoePortState>,
    pub poe_budget: BTreeMap<MacAddress, PoeBudget>,
    pub wan_status: BTreeMap<MacAddress, Vec<WanPortState>>,
    pub ssids: Vec<SsidState>,
    /// Names of best-effort steps that failed while building this snapshot.
    pub failed_steps: Vec<String>,
    pub fetched_at: DateTime<Utc>,
}

impl SiteSnapshot {
    pub fn gateways(&self) -> impl Iterator<Item = &DeviceSnapshot> {
        self.devices.values().filter(|d| d.is_gateway())
    }

    /// WAN port `index` of a gateway, if present.
    pub fn wan_port(&self, gateway: &MacAddress, index: usize) -> Option<&WanPortState> {
        self.wan_status.get(gateway).and_then(|ports| ports.get(index))
    }
}
