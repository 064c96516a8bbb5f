// ── Runtime connection configuration ──
//
// These types describe *how* to connect to an Omada controller and what to
// poll. They carry credential data and tuning, but never touch disk.
// The CLI constructs a `ControllerConfig` and hands it in.

use std::time::Duration;

use omada_api::TokenSet;
use secrecy::SecretString;
use url::Url;

use crate::model::MacAddress;

/// Shortest interval any poller accepts.
pub const MIN_INTERVAL: Duration = Duration::from_secs(10);
/// Longest interval any poller accepts.
pub const MAX_INTERVAL: Duration = Duration::from_secs(3600);

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict). Default for cloud controllers.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed local controllers).
    DangerAcceptInvalid,
}

/// Poll cadence for each poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollIntervals {
    pub devices: Duration,
    pub clients: Duration,
    pub applications: Duration,
}

impl Default for PollIntervals {
    fn default() -> Self {
        Self {
            devices: Duration::from_secs(60),
            clients: Duration::from_secs(30),
            applications: Duration::from_secs(300),
        }
    }
}

impl PollIntervals {
    /// Clamp every interval into `MIN_INTERVAL..=MAX_INTERVAL`.
    pub fn clamped(self) -> Self {
        let clamp = |d: Duration| d.clamp(MIN_INTERVAL, MAX_INTERVAL);
        Self {
            devices: clamp(self.devices),
            clients: clamp(self.clients),
            applications: clamp(self.applications),
        }
    }
}

/// Configuration for one controller connection.
///
/// Built by the CLI, passed to `Controller`; core never reads config files.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Open API base URL (e.g., `https://use1-omada-northbound.tplinkcloud.com`).
    pub url: Url,
    /// The controller identifier (`omadacId`).
    pub omada_id: String,
    pub client_id: String,
    pub client_secret: SecretString,
    /// Previously persisted tokens; `None` starts expired so the first call
    /// re-issues from client credentials.
    pub tokens: Option<TokenSet>,
    pub tls: TlsVerification,
    /// Per-call timeout.
    pub timeout: Duration,
    pub intervals: PollIntervals,
    /// Site ids or names to poll. Empty means every site.
    pub sites: Vec<String>,
    /// Clients tracked by the presence and traffic pollers.
    pub clients: Vec<MacAddress>,
    /// Application ids tracked by the traffic poller.
    pub applications: Vec<i64>,
}

impl ControllerConfig {
    pub fn new(
        url: Url,
        omada_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: SecretString,
    ) -> Self {
        Self {
            url,
            omada_id: omada_id.into(),
            client_id: client_id.into(),
            client_secret,
            tokens: None,
            tls: TlsVerification::default(),
            timeout: omada_api::DEFAULT_TIMEOUT,
            intervals: PollIntervals::default(),
            sites: Vec::new(),
            clients: Vec::new(),
            applications: Vec::new(),
        }
    }
}
