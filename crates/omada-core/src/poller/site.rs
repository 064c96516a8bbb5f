// ── Site data aggregator ──
//
// One cycle: fetch the device list (mandatory), then run every enrichment
// step concurrently and fold the outcomes through the step policy table.
// A failed best-effort step contributes nothing; its name is recorded in
// `SiteSnapshot::failed_steps`.

use std::collections::BTreeMap;
use std::future::Future;

use chrono::Utc;
use futures_util::future::join_all;
use omada_api::OmadaClient;
use strum::Display;
use tracing::{debug, warn};

use crate::convert::{
    band_clients_from_raw, client_from_raw, device_from_raw, poe_budget_from_raw,
    poe_port_from_raw, ssid_from_raw, uplink_from_raw, wan_port_from_raw,
};
use crate::error::CoreError;
use crate::model::{
    BandClients, ClientSnapshot, DeviceSnapshot, DeviceType, MacAddress, PoeBudget, PoePortState,
    PortKey, Site, SiteSnapshot, SsidState, Uplink, WanPortState,
};

use super::Poller;

// ── Steps and policy ─────────────────────────────────────────────────

/// One sub-fetch of a site cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Step {
    Devices,
    Uplink,
    Poe,
    PoeBudget,
    Wan,
    GatewayTemp,
    Ssids,
    Clients,
    BandStats,
}

/// What a failed step does to the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// The cycle fails.
    Fatal,
    /// Logged and skipped.
    BestEffort,
}

impl Step {
    /// Steps that run after the device list, in merge order.
    pub const ENRICHMENTS: [Step; 8] = [
        Step::Uplink,
        Step::Poe,
        Step::PoeBudget,
        Step::Wan,
        Step::GatewayTemp,
        Step::Ssids,
        Step::Clients,
        Step::BandStats,
    ];

    pub fn policy(self) -> Policy {
        match self {
            Step::Devices => Policy::Fatal,
            _ => Policy::BestEffort,
        }
    }
}

/// The contribution of one successful enrichment step.
enum Enrichment {
    Uplink(Vec<(MacAddress, Uplink)>),
    Poe(BTreeMap<PortKey, PoePortState>),
    PoeBudget(BTreeMap<MacAddress, PoeBudget>),
    Wan(BTreeMap<MacAddress, Vec<WanPortState>>),
    GatewayTemp(Vec<(MacAddress, f64)>),
    Ssids(Vec<SsidState>),
    Clients(Vec<ClientSnapshot>),
    BandStats(Vec<(MacAddress, BandClients)>),
}

type StepResult = Result<Option<Enrichment>, CoreError>;

// ── Aggregator ───────────────────────────────────────────────────────

/// Builds a [`SiteSnapshot`] for one site per cycle.
pub struct SiteAggregator {
    client: OmadaClient,
    site: Site,
}

impl SiteAggregator {
    pub fn new(client: OmadaClient, site: Site) -> Self {
        Self { client, site }
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    /// Run one full cycle.
    pub async fn fetch(&self) -> Result<SiteSnapshot, CoreError> {
        let site_id = self.site.id.as_str();
        debug!(site = %self.site.name, "fetching site data");
        let mut failed_steps = Vec::new();

        let raw = self
            .settle(
                Step::Devices,
                self.client.list_devices(site_id).await.map_err(CoreError::from),
                &mut failed_steps,
            )?
            .unwrap_or_default();
        let mut devices: BTreeMap<MacAddress, DeviceSnapshot> = raw
            .into_iter()
            .filter_map(device_from_raw)
            .map(|d| (d.mac.clone(), d))
            .collect();
        debug!(site = %self.site.name, devices = devices.len(), "devices fetched");

        let outcomes = {
            let devices = &devices;
            join_all(
                Step::ENRICHMENTS
                    .iter()
                    .map(|&step| async move { (step, self.enrich(step, devices).await) }),
            )
            .await
        };

        let mut snapshot = SiteSnapshot {
            site_id: self.site.id.clone(),
            site_name: self.site.name.clone(),
            devices: BTreeMap::new(),
            poe_ports: BTreeMap::new(),
            poe_budget: BTreeMap::new(),
            wan_status: BTreeMap::new(),
            ssids: Vec::new(),
            failed_steps: Vec::new(),
            fetched_at: Utc::now(),
        };

        for (step, outcome) in outcomes {
            match self.settle(step, outcome, &mut failed_steps)? {
                Some(Some(enrichment)) => apply(enrichment, &mut devices, &mut snapshot),
                Some(None) => debug!(site = %self.site.name, step = %step, "step not applicable"),
                None => {}
            }
        }

        snapshot.devices = devices;
        snapshot.failed_steps = failed_steps;
        Ok(snapshot)
    }

    /// Fold one step outcome through the policy table.
    ///
    /// `Ok(None)` means a best-effort step failed and was recorded in
    /// `failed_steps`; a fatal step's error is returned as-is.
    fn settle<T>(
        &self,
        step: Step,
        outcome: Result<T, CoreError>,
        failed_steps: &mut Vec<String>,
    ) -> Result<Option<T>, CoreError> {
        match outcome {
            Ok(value) => Ok(Some(value)),
            Err(e) => match step.policy() {
                Policy::Fatal => {
                    warn!(site = %self.site.name, step = %step, error = %e, "mandatory fetch failed");
                    Err(e)
                }
                Policy::BestEffort => {
                    warn!(site = %self.site.name, step = %step, error = %e, "enrichment failed, skipping");
                    failed_steps.push(step.to_string());
                    Ok(None)
                }
            },
        }
    }

    async fn enrich(&self, step: Step, devices: &BTreeMap<MacAddress, DeviceSnapshot>) -> StepResult {
        let site_id = self.site.id.as_str();
        let macs_of = |pred: fn(&DeviceSnapshot) -> bool| -> Vec<String> {
            devices
                .values()
                .filter(|d| pred(d))
                .map(|d| d.mac.to_string())
                .collect()
        };

        match step {
            Step::Devices => Ok(None),

            Step::Uplink => {
                let macs = macs_of(|d| !d.is_gateway());
                if macs.is_empty() {
                    return Ok(None);
                }
                let raw = self.client.device_uplink_info(site_id, &macs).await?;
                Ok(Some(Enrichment::Uplink(
                    raw.into_iter().map(uplink_from_raw).collect(),
                )))
            }

            Step::Poe => {
                let raw = self.client.list_poe_ports(site_id).await?;
                Ok(Some(Enrichment::Poe(
                    raw.into_iter().filter_map(poe_port_from_raw).collect(),
                )))
            }

            Step::PoeBudget => {
                if !devices.values().any(|d| d.device_type == DeviceType::Switch) {
                    return Ok(None);
                }
                let raw = self.client.poe_usage(site_id).await?;
                Ok(Some(Enrichment::PoeBudget(
                    raw.into_iter()
                        .map(poe_budget_from_raw)
                        .map(|b| (b.switch_mac.clone(), b))
                        .collect(),
                )))
            }

            Step::Wan => {
                let gateways = macs_of(DeviceSnapshot::is_gateway);
                if gateways.is_empty() {
                    return Ok(None);
                }
                let per_gateway = self
                    .per_gateway(&gateways, |mac| async move {
                        let ports = self.client.gateway_wan_status(site_id, &mac).await?;
                        Ok::<_, CoreError>(ports
                            .into_iter()
                            .enumerate()
                            .map(|(i, p)| wan_port_from_raw(i, p))
                            .collect::<Vec<_>>())
                    })
                    .await?;
                Ok(Some(Enrichment::Wan(per_gateway.into_iter().collect())))
            }

            Step::GatewayTemp => {
                let gateways = macs_of(DeviceSnapshot::is_gateway);
                if gateways.is_empty() {
                    return Ok(None);
                }
                let per_gateway = self
                    .per_gateway(&gateways, |mac| async move {
                        Ok::<_, CoreError>(self.client.gateway_info(site_id, &mac).await?.temp)
                    })
                    .await?;
                Ok(Some(Enrichment::GatewayTemp(
                    per_gateway
                        .into_iter()
                        .filter_map(|(mac, temp)| temp.map(|t| (mac, t)))
                        .collect(),
                )))
            }

            Step::Ssids => {
                let raw = self.client.list_site_ssids(site_id).await?;
                Ok(Some(Enrichment::Ssids(
                    raw.into_iter().map(ssid_from_raw).collect(),
                )))
            }

            Step::Clients => {
                let raw = self.client.list_clients(site_id).await?;
                Ok(Some(Enrichment::Clients(
                    raw.into_iter().filter_map(client_from_raw).collect(),
                )))
            }

            Step::BandStats => {
                let aps = macs_of(DeviceSnapshot::is_ap);
                if aps.is_empty() {
                    return Ok(None);
                }
                let raw = self.client.ap_band_stats(site_id, &aps).await?;
                Ok(Some(Enrichment::BandStats(
                    raw.into_iter().map(band_clients_from_raw).collect(),
                )))
            }
        }
    }

    /// Run `fetch` for every gateway concurrently.
    ///
    /// Any gateway failing fails the whole step, so a step never publishes
    /// data for only some of the gateways.
    async fn per_gateway<T, F, Fut>(
        &self,
        gateways: &[String],
        fetch: F,
    ) -> Result<Vec<(MacAddress, T)>, CoreError>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        let results = join_all(gateways.iter().map(|mac| fetch(mac.clone()))).await;

        gateways
            .iter()
            .zip(results)
            .map(|(mac, result)| {
                result
                    .map(|value| (MacAddress::new(mac), value))
                    .inspect_err(|e| {
                        debug!(site = %self.site.name, gateway = %mac, error = %e, "gateway fetch failed");
                    })
            })
            .collect()
    }
}

impl Poller for SiteAggregator {
    type Snapshot = SiteSnapshot;

    fn label(&self) -> String {
        format!("site:{}", self.site.name)
    }

    fn poll_once(&mut self) -> impl Future<Output = Result<SiteSnapshot, CoreError>> + Send {
        self.fetch()
    }
}

// ── Merge ────────────────────────────────────────────────────────────

fn apply(
    enrichment: Enrichment,
    devices: &mut BTreeMap<MacAddress, DeviceSnapshot>,
    snapshot: &mut SiteSnapshot,
) {
    match enrichment {
        Enrichment::Uplink(uplinks) => {
            for (mac, uplink) in uplinks {
                if let Some(device) = devices.get_mut(&mac).filter(|d| !d.is_gateway()) {
                    device.uplink = Some(uplink);
                }
            }
        }
        Enrichment::Poe(ports) => snapshot.poe_ports = ports,
        Enrichment::PoeBudget(budget) => snapshot.poe_budget = budget,
        Enrichment::Wan(wan) => snapshot.wan_status = wan,
        Enrichment::GatewayTemp(temps) => {
            for (mac, temp) in temps {
                if let Some(device) = devices.get_mut(&mac).filter(|d| d.is_gateway()) {
                    device.temperature = Some(temp);
                }
            }
        }
        Enrichment::Ssids(ssids) => snapshot.ssids = ssids,
        Enrichment::Clients(clients) => assign_clients(devices, clients),
        Enrichment::BandStats(counts) => {
            for (mac, count) in counts {
                if let Some(device) = devices.get_mut(&mac).filter(|d| d.is_ap()) {
                    device.band_clients = Some(count);
                }
            }
        }
    }
}

/// The device a client hangs off: AP for wireless clients, else switch,
/// else gateway.
pub fn parent_of(client: &ClientSnapshot) -> Option<&MacAddress> {
    if client.wireless {
        if let Some(ap) = &client.ap_mac {
            return Some(ap);
        }
    }
    client.switch_mac.as_ref().or(client.gateway_mac.as_ref())
}

/// Attach every client to exactly one parent device.
///
/// Clients whose parent is unknown or not in `devices` are dropped.
pub fn assign_clients(
    devices: &mut BTreeMap<MacAddress, DeviceSnapshot>,
    clients: Vec<ClientSnapshot>,
) {
    for device in devices.values_mut() {
        device.clients.clear();
    }
    for client in clients {
        let Some(parent) = parent_of(&client).cloned() else {
            continue;
        };
        if let Some(device) = devices.get_mut(&parent) {
            device.clients.push(client);
        }
    }
    for device in devices.values_mut() {
        device.clients.sort_by(|a, b| a.mac.cmp(&b.mac));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use omada_api::models::{ClientEntry, DeviceEntry};
    use omada_api::{ClientCredentials, NoopTokenStore, Session, TokenSet};
    use secrecy::SecretString;
    use serde_json::json;
    use url::Url;

    use super::*;

    fn idle_aggregator() -> SiteAggregator {
        let session = Session {
            base_url: Url::parse("http://127.0.0.1:1").unwrap(),
            omada_id: "omadac".into(),
            credentials: ClientCredentials {
                client_id: "id".into(),
                client_secret: SecretString::from("secret".to_owned()),
            },
            tokens: TokenSet::expired(),
        };
        let client =
            OmadaClient::with_client(reqwest::Client::new(), session, Arc::new(NoopTokenStore))
                .unwrap();
        let site = Site {
            id: "site_001".into(),
            name: "Main Office".into(),
            region: None,
            time_zone: None,
        };
        SiteAggregator::new(client, site)
    }

    fn devices() -> BTreeMap<MacAddress, DeviceSnapshot> {
        [
            json!({ "mac": "AA-BB-CC-DD-EE-01", "type": "ap" }),
            json!({ "mac": "AA-BB-CC-DD-EE-02", "type": "switch" }),
            json!({ "mac": "AA-BB-CC-DD-EE-03", "type": "gateway" }),
        ]
        .into_iter()
        .map(|v| device_from_raw(serde_json::from_value::<DeviceEntry>(v).unwrap()).unwrap())
        .map(|d| (d.mac.clone(), d))
        .collect()
    }

    fn client(value: serde_json::Value) -> ClientSnapshot {
        client_from_raw(serde_json::from_value::<ClientEntry>(value).unwrap()).unwrap()
    }

    fn clients_of(devices: &BTreeMap<MacAddress, DeviceSnapshot>, mac: &str) -> Vec<String> {
        devices[&MacAddress::new(mac)]
            .clients
            .iter()
            .map(|c| c.mac.to_string())
            .collect()
    }

    #[test]
    fn wireless_client_prefers_ap_over_switch() {
        let mut devices = devices();
        let roaming = client(json!({
            "mac": "11-22-33-44-55-AA",
            "wireless": true,
            "apMac": "AA-BB-CC-DD-EE-01",
            "switchMac": "AA-BB-CC-DD-EE-02",
        }));
        assign_clients(&mut devices, vec![roaming]);

        assert_eq!(clients_of(&devices, "AA-BB-CC-DD-EE-01"), ["11-22-33-44-55-AA"]);
        assert!(clients_of(&devices, "AA-BB-CC-DD-EE-02").is_empty());
    }

    #[test]
    fn wired_and_gateway_fallbacks() {
        let mut devices = devices();
        assign_clients(
            &mut devices,
            vec![
                client(json!({ "mac": "11-22-33-44-55-BB", "switchMac": "aa:bb:cc:dd:ee:02", "port": 10 })),
                client(json!({ "mac": "11-22-33-44-55-CC", "gatewayMac": "AA-BB-CC-DD-EE-03" })),
                client(json!({ "mac": "11-22-33-44-55-DD" })),
                client(json!({ "mac": "11-22-33-44-55-EE", "switchMac": "AA-BB-CC-DD-EE-99" })),
            ],
        );

        assert_eq!(clients_of(&devices, "AA-BB-CC-DD-EE-02"), ["11-22-33-44-55-BB"]);
        assert_eq!(clients_of(&devices, "AA-BB-CC-DD-EE-03"), ["11-22-33-44-55-CC"]);
        let total: usize = devices.values().map(|d| d.clients.len()).sum();
        assert_eq!(total, 2);
    }

    #[test]
    fn wireless_client_without_ap_falls_back_to_switch() {
        let c = client(json!({
            "mac": "11-22-33-44-55-AA",
            "wireless": true,
            "switchMac": "AA-BB-CC-DD-EE-02",
        }));
        assert_eq!(parent_of(&c).map(MacAddress::as_str), Some("AA-BB-CC-DD-EE-02"));
    }

    #[test]
    fn only_device_fetch_is_fatal() {
        assert_eq!(Step::Devices.policy(), Policy::Fatal);
        assert!(Step::ENRICHMENTS.iter().all(|s| s.policy() == Policy::BestEffort));
        assert_eq!(Step::GatewayTemp.to_string(), "gateway-temp");
    }

    #[test]
    fn policy_fold_fails_fatal_steps_and_records_best_effort_ones() {
        let aggregator = idle_aggregator();
        let mut failed = Vec::new();

        let devices = aggregator.settle::<u32>(Step::Devices, Err(CoreError::Timeout), &mut failed);
        assert!(matches!(devices, Err(CoreError::Timeout)));
        assert!(failed.is_empty());

        let wan = aggregator
            .settle::<u32>(Step::Wan, Err(CoreError::Timeout), &mut failed)
            .unwrap();
        assert_eq!(wan, None);
        assert_eq!(failed, ["wan"]);

        let ssids = aggregator.settle(Step::Ssids, Ok(3_u32), &mut failed).unwrap();
        assert_eq!(ssids, Some(3));
        assert_eq!(failed, ["wan"]);
    }

    #[test]
    fn uplink_never_lands_on_gateway() {
        let mut devices = devices();
        let mut snapshot = SiteSnapshot {
            site_id: "s".into(),
            site_name: "s".into(),
            devices: BTreeMap::new(),
            poe_ports: BTreeMap::new(),
            poe_budget: BTreeMap::new(),
            wan_status: BTreeMap::new(),
            ssids: Vec::new(),
            failed_steps: Vec::new(),
            fetched_at: Utc::now(),
        };
        let uplink = Uplink {
            port: Some(1),
            ..Uplink::default()
        };
        apply(
            Enrichment::Uplink(vec![
                (MacAddress::new("AA-BB-CC-DD-EE-02"), uplink.clone()),
                (MacAddress::new("AA-BB-CC-DD-EE-03"), uplink),
            ]),
            &mut devices,
            &mut snapshot,
        );
        assert!(devices[&MacAddress::new("AA-BB-CC-DD-EE-02")].uplink.is_some());
        assert!(devices[&MacAddress::new("AA-BB-CC-DD-EE-03")].uplink.is_none());
    }
}
