// ── Controller abstraction ──
//
// Lifecycle management for one Omada controller connection: builds the
// shared client (one session, one token manager), verifies credentials,
// spawns the per-site pollers, and routes one-shot reads and actions.

use std::sync::Arc;

use omada_api::models::ApplicationEntry;
use omada_api::{
    ClientCredentials, OmadaClient, Session, TlsMode, TokenSet, TokenStore, TransportConfig,
};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::{ControllerConfig, TlsVerification};
use crate::convert::{client_from_raw, site_from_raw};
use crate::error::CoreError;
use crate::model::{AppTrafficSnapshot, ClientSnapshot, MacAddress, Site, SiteSnapshot};
use crate::poller::{
    self, AppTrafficPoller, ClientPresencePoller, ClientPresenceSnapshot, PollHandle,
    SiteAggregator,
};

// ── Site pollers ─────────────────────────────────────────────────

/// Read handles for the pollers running against one site.
#[derive(Clone)]
pub struct SitePollers {
    pub site: Site,
    pub devices: PollHandle<SiteSnapshot>,
    /// Present when client MACs are selected.
    pub clients: Option<PollHandle<ClientPresenceSnapshot>>,
    /// Present when both client MACs and application ids are selected.
    pub traffic: Option<PollHandle<AppTrafficSnapshot>>,
}

// ── Controller ───────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<ControllerInner>`.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: ControllerConfig,
    client: OmadaClient,
    cancel: CancellationToken,
    auth_failed: Arc<watch::Sender<bool>>,
    pollers: Mutex<Vec<SitePollers>>,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Controller {
    /// Build the client from configuration. Does NOT touch the network;
    /// call [`start()`](Self::start) to verify and begin polling.
    pub fn new(config: ControllerConfig, store: Arc<dyn TokenStore>) -> Result<Self, CoreError> {
        let session = Session {
            base_url: config.url.clone(),
            omada_id: config.omada_id.clone(),
            credentials: ClientCredentials {
                client_id: config.client_id.clone(),
                client_secret: config.client_secret.clone(),
            },
            tokens: config.tokens.clone().unwrap_or_else(TokenSet::expired),
        };
        let client = OmadaClient::new(session, &build_transport(&config), store)?;
        let (auth_failed, _) = watch::channel(false);

        Ok(Self {
            inner: Arc::new(ControllerInner {
                config,
                client,
                cancel: CancellationToken::new(),
                auth_failed: Arc::new(auth_failed),
                pollers: Mutex::new(Vec::new()),
                task_handles: Mutex::new(Vec::new()),
            }),
        })
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.inner.config
    }

    /// The shared API client.
    pub fn client(&self) -> &OmadaClient {
        &self.inner.client
    }

    /// Flips to `true` when the credential chain is broken and new client
    /// credentials are required.
    pub fn auth_failed(&self) -> watch::Receiver<bool> {
        self.inner.auth_failed.subscribe()
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Verify credentials, resolve the configured sites, and spawn one set
    /// of pollers per site.
    pub async fn start(&self) -> Result<Vec<SitePollers>, CoreError> {
        let sites = self.list_sites().await.inspect_err(|e| {
            if e.requires_operator() {
                self.inner.auth_failed.send_replace(true);
            }
        })?;
        let sites = select_sites(sites, &self.inner.config.sites)?;

        let config = &self.inner.config;
        let intervals = config.intervals.clamped();
        let mut started = Vec::with_capacity(sites.len());
        let mut handles = self.inner.task_handles.lock().await;

        for site in sites {
            let (devices, task) = poller::spawn(
                SiteAggregator::new(self.inner.client.clone(), site.clone()),
                intervals.devices,
                self.inner.cancel.child_token(),
                Arc::clone(&self.inner.auth_failed),
            );
            handles.push(task);

            let clients = if config.clients.is_empty() {
                None
            } else {
                let presence = ClientPresencePoller::new(
                    self.inner.client.clone(),
                    site.clone(),
                    config.clients.iter().cloned(),
                );
                let (handle, task) = poller::spawn(
                    presence,
                    intervals.clients,
                    self.inner.cancel.child_token(),
                    Arc::clone(&self.inner.auth_failed),
                );
                handles.push(task);
                Some(handle)
            };

            let traffic = if config.clients.is_empty() || config.applications.is_empty() {
                None
            } else {
                let traffic = AppTrafficPoller::new(
                    self.inner.client.clone(),
                    site.clone(),
                    config.clients.iter().cloned(),
                    config.applications.iter().copied(),
                );
                let (handle, task) = poller::spawn(
                    traffic,
                    intervals.applications,
                    self.inner.cancel.child_token(),
                    Arc::clone(&self.inner.auth_failed),
                );
                handles.push(task);
                Some(handle)
            };

            info!(site = %site.name, "pollers started");
            started.push(SitePollers {
                site,
                devices,
                clients,
                traffic,
            });
        }

        *self.inner.pollers.lock().await = started.clone();
        Ok(started)
    }

    /// Handles of the running pollers (empty before `start`).
    pub async fn pollers(&self) -> Vec<SitePollers> {
        self.inner.pollers.lock().await.clone()
    }

    /// Stop all pollers and wait for them to exit.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();
        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        self.inner.pollers.lock().await.clear();
        debug!("controller shut down");
    }

    // ── One-shot reads ───────────────────────────────────────────

    pub async fn list_sites(&self) -> Result<Vec<Site>, CoreError> {
        let raw = self.inner.client.list_sites().await?;
        Ok(raw.into_iter().map(site_from_raw).collect())
    }

    /// Find a site by id or (case-insensitive) name.
    pub async fn find_site(&self, key: &str) -> Result<Site, CoreError> {
        let sites = self.list_sites().await?;
        select_sites(sites, &[key.to_owned()])?
            .into_iter()
            .next()
            .ok_or_else(|| CoreError::SiteNotFound { name: key.into() })
    }

    /// Run one site-aggregator cycle without spawning a poller.
    pub async fn site_snapshot(&self, site: &Site) -> Result<SiteSnapshot, CoreError> {
        SiteAggregator::new(self.inner.client.clone(), site.clone())
            .fetch()
            .await
    }

    pub async fn list_clients(&self, site: &Site) -> Result<Vec<ClientSnapshot>, CoreError> {
        let raw = self.inner.client.list_clients(&site.id).await?;
        Ok(raw.into_iter().filter_map(client_from_raw).collect())
    }

    pub async fn list_applications(
        &self,
        site: &Site,
    ) -> Result<Vec<ApplicationEntry>, CoreError> {
        Ok(self.inner.client.list_applications(&site.id).await?)
    }

    // ── Actions ──────────────────────────────────────────────────

    pub async fn reboot_device(&self, site: &Site, mac: &MacAddress) -> Result<(), CoreError> {
        info!(site = %site.name, %mac, "rebooting device");
        Ok(self.inner.client.reboot_device(&site.id, mac.as_str()).await?)
    }

    pub async fn locate_device(
        &self,
        site: &Site,
        mac: &MacAddress,
        enable: bool,
    ) -> Result<(), CoreError> {
        Ok(self
            .inner
            .client
            .locate_device(&site.id, mac.as_str(), enable)
            .await?)
    }

    pub async fn set_port_poe(
        &self,
        site: &Site,
        switch: &MacAddress,
        port: u32,
        enable: bool,
    ) -> Result<(), CoreError> {
        info!(site = %site.name, %switch, port, enable, "setting port PoE");
        Ok(self
            .inner
            .client
            .set_port_poe(&site.id, switch.as_str(), port, enable)
            .await?)
    }

    pub async fn set_port_profile_override(
        &self,
        site: &Site,
        switch: &MacAddress,
        port: u32,
        enable: bool,
    ) -> Result<(), CoreError> {
        Ok(self
            .inner
            .client
            .set_port_profile_override(&site.id, switch.as_str(), port, enable)
            .await?)
    }

    pub async fn block_client(&self, site: &Site, mac: &MacAddress) -> Result<(), CoreError> {
        Ok(self.inner.client.block_client(&site.id, mac.as_str()).await?)
    }

    pub async fn unblock_client(&self, site: &Site, mac: &MacAddress) -> Result<(), CoreError> {
        Ok(self.inner.client.unblock_client(&site.id, mac.as_str()).await?)
    }

    pub async fn reconnect_client(&self, site: &Site, mac: &MacAddress) -> Result<(), CoreError> {
        Ok(self
            .inner
            .client
            .reconnect_client(&site.id, mac.as_str())
            .await?)
    }

    /// Patch an SSID's basic configuration with the given JSON fields.
    pub async fn update_ssid(
        &self,
        site: &Site,
        wlan_id: &str,
        ssid_id: &str,
        patch: &serde_json::Value,
    ) -> Result<(), CoreError> {
        info!(site = %site.name, wlan_id, ssid_id, "updating SSID");
        Ok(self
            .inner
            .client
            .update_ssid(&site.id, wlan_id, ssid_id, patch)
            .await?)
    }

    /// Current token triple, for display.
    pub async fn tokens(&self) -> TokenSet {
        self.inner.client.token_manager().tokens().await
    }
}

// ── Helpers ──────────────────────────────────────────────────────

/// Keep the sites named by `wanted` (id or case-insensitive name), in
/// `wanted` order. An empty `wanted` keeps every site.
fn select_sites(sites: Vec<Site>, wanted: &[String]) -> Result<Vec<Site>, CoreError> {
    if wanted.is_empty() {
        return Ok(sites);
    }
    wanted
        .iter()
        .map(|key| {
            sites
                .iter()
                .find(|s| s.id == *key || s.name.eq_ignore_ascii_case(key))
                .cloned()
                .ok_or_else(|| CoreError::SiteNotFound { name: key.clone() })
        })
        .collect()
}

fn build_transport(config: &ControllerConfig) -> TransportConfig {
    TransportConfig {
        tls: match &config.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        },
        timeout: config.timeout,
    }
}
