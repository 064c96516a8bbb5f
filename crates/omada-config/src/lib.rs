//! Shared configuration for the Omada CLI.
//!
//! TOML profiles, client-secret resolution (env + keyring + plaintext),
//! the cloud region table, the on-disk token cache, and translation to
//! `omada_core::ControllerConfig`. Core never reads these files.

mod token_cache;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use omada_core::{ControllerConfig, MacAddress, PollIntervals, TlsVerification};

pub use token_cache::TokenCache;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no client secret configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{profile}' not found in config")]
    UnknownProfile { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Cloud regions ───────────────────────────────────────────────────

/// TP-Link cloud regions hosting the northbound Open API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Us,
    Eu,
    Ap,
}

impl Region {
    pub const ALL: [Region; 3] = [Region::Us, Region::Eu, Region::Ap];

    pub fn api_url(self) -> &'static str {
        match self {
            Self::Us => "https://use1-omada-northbound.tplinkcloud.com",
            Self::Eu => "https://euw1-omada-northbound.tplinkcloud.com",
            Self::Ap => "https://aps1-omada-northbound.tplinkcloud.com",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Us => "United States",
            Self::Eu => "Europe",
            Self::Ap => "Asia Pacific (Singapore)",
        }
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named controller profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile {
                profile: name.into(),
            })
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named controller profile.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Open API base URL. Takes precedence over `region`.
    pub api_url: Option<String>,

    /// Cloud region: "us", "eu", or "ap".
    pub region: Option<Region>,

    /// Controller identifier (`omadacId`).
    pub omada_id: String,

    /// Application client id from Platform Integration.
    pub client_id: String,

    /// Client secret (plaintext; prefer keyring or env var).
    pub client_secret: Option<String>,

    /// Environment variable name containing the client secret.
    pub client_secret_env: Option<String>,

    /// Site ids or names to poll. Empty polls every site.
    #[serde(default)]
    pub sites: Vec<String>,

    /// Client MACs tracked by the presence and traffic pollers.
    #[serde(default)]
    pub clients: Vec<String>,

    /// Application ids tracked by the traffic poller.
    #[serde(default)]
    pub applications: Vec<i64>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Skip TLS verification (self-signed local controllers).
    pub insecure: Option<bool>,

    /// Per-call timeout in seconds.
    pub timeout: Option<u64>,

    /// Poll intervals in seconds.
    pub device_interval: Option<u64>,
    pub client_interval: Option<u64>,
    pub app_interval: Option<u64>,
}

impl Profile {
    /// The API root: `api_url` if set, else the region's cloud endpoint.
    pub fn base_url(&self) -> Result<url::Url, ConfigError> {
        let raw = match (&self.api_url, self.region) {
            (Some(url), _) => url.as_str(),
            (None, Some(region)) => region.api_url(),
            (None, None) => {
                return Err(ConfigError::Validation {
                    field: "api_url".into(),
                    reason: "either api_url or region must be set".into(),
                });
            }
        };
        raw.parse().map_err(|_| ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("invalid URL: {raw}"),
        })
    }

    /// Configured intervals over the defaults, clamped to the accepted range.
    pub fn intervals(&self) -> PollIntervals {
        let defaults = PollIntervals::default();
        let pick = |secs: Option<u64>, fallback| secs.map_or(fallback, Duration::from_secs);
        PollIntervals {
            devices: pick(self.device_interval, defaults.devices),
            clients: pick(self.client_interval, defaults.clients),
            applications: pick(self.app_interval, defaults.applications),
        }
        .clamped()
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "omada", "omada")
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("omada");
    p
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Where the token cache lives.
pub fn token_cache_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join("tokens.toml"),
        |dirs| dirs.data_dir().join("tokens.toml"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Defaults, then the TOML file at `path`, then `OMADA_`-prefixed env vars
/// (`OMADA_PROFILES__HOME__CLIENT_ID` sets `profiles.home.client_id`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("OMADA_").split("__"))
        .extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the client secret: `client_secret_env` → keyring → plaintext.
pub fn resolve_client_secret(
    profile: &Profile,
    profile_name: &str,
) -> Result<SecretString, ConfigError> {
    if let Some(ref env_name) = profile.client_secret_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    if let Ok(entry) = keyring::Entry::new("omada", &format!("{profile_name}/client-secret")) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    if let Some(ref secret) = profile.client_secret {
        return Ok(SecretString::from(secret.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store the client secret in the system keyring for `profile_name`.
pub fn store_client_secret(profile_name: &str, secret: &str) -> Result<(), ConfigError> {
    keyring::Entry::new("omada", &format!("{profile_name}/client-secret"))
        .and_then(|entry| entry.set_password(secret))
        .map_err(|e| ConfigError::Validation {
            field: "keyring".into(),
            reason: e.to_string(),
        })
}

/// Parse the profile's client MACs, rejecting anything that is not 48 bits.
pub fn parse_clients(profile: &Profile) -> Result<Vec<MacAddress>, ConfigError> {
    profile
        .clients
        .iter()
        .map(|raw| {
            let hex_digits = raw.chars().filter(char::is_ascii_hexdigit).count();
            if hex_digits == 12 {
                Ok(MacAddress::new(raw))
            } else {
                Err(ConfigError::Validation {
                    field: "clients".into(),
                    reason: format!("not a MAC address: {raw}"),
                })
            }
        })
        .collect()
}

/// Build a `ControllerConfig` from a profile, with no flag overrides.
///
/// `tokens` seeds the session (normally from [`TokenCache::load`]); `None`
/// starts expired so the first call re-issues from client credentials.
pub fn profile_to_controller_config(
    profile: &Profile,
    profile_name: &str,
    tokens: Option<omada_api::TokenSet>,
) -> Result<ControllerConfig, ConfigError> {
    let url = profile.base_url()?;
    if profile.omada_id.is_empty() {
        return Err(ConfigError::Validation {
            field: "omada_id".into(),
            reason: "must not be empty".into(),
        });
    }
    let secret = resolve_client_secret(profile, profile_name)?;

    let tls = if profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let mut config = ControllerConfig::new(url, &profile.omada_id, &profile.client_id, secret);
    config.tokens = tokens;
    config.tls = tls;
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or_else(default_timeout));
    config.intervals = profile.intervals();
    config.sites.clone_from(&profile.sites);
    config.clients = parse_clients(profile)?;
    config.applications.clone_from(&profile.applications);
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    const SAMPLE: &str = r#"
default_profile = "home"

[defaults]
output = "json"

[profiles.home]
region = "eu"
omada_id = "omadac-1"
client_id = "client-id"
client_secret = "plain-secret"
sites = ["Main Office"]
clients = ["aa:bb:cc:dd:ee:01"]
applications = [7, 9]
device_interval = 5
app_interval = 600

[profiles.lab]
api_url = "https://10.0.0.2:8043"
omada_id = "omadac-2"
client_id = "lab-id"
insecure = true
"#;

    fn write_sample() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, SAMPLE).unwrap();
        (dir, path)
    }

    #[test]
    fn loads_profiles_from_toml() {
        let (_dir, path) = write_sample();
        let config = load_config_from(&path).unwrap();

        assert_eq!(config.default_profile.as_deref(), Some("home"));
        assert_eq!(config.defaults.output, "json");
        assert_eq!(config.defaults.timeout, 30);

        let home = config.profile("home").unwrap();
        assert_eq!(home.region, Some(Region::Eu));
        assert_eq!(home.applications, vec![7, 9]);
        assert!(matches!(
            config.profile("missing"),
            Err(ConfigError::UnknownProfile { .. })
        ));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.default_profile.as_deref(), Some("default"));
        assert!(config.profiles.is_empty());
    }

    #[test]
    fn api_url_wins_over_region() {
        let mut profile = Profile {
            region: Some(Region::Ap),
            ..Profile::default()
        };
        assert_eq!(
            profile.base_url().unwrap().as_str(),
            "https://aps1-omada-northbound.tplinkcloud.com/"
        );

        profile.api_url = Some("https://omada.local:8043".into());
        assert_eq!(profile.base_url().unwrap().host_str(), Some("omada.local"));

        let neither = Profile::default();
        assert!(matches!(
            neither.base_url(),
            Err(ConfigError::Validation { field, .. }) if field == "api_url"
        ));
    }

    #[test]
    fn profile_builds_controller_config() {
        let (_dir, path) = write_sample();
        let config = load_config_from(&path).unwrap();
        let home = config.profile("home").unwrap();

        let built = profile_to_controller_config(home, "home-test-no-keyring", None).unwrap();
        assert_eq!(built.url.as_str(), "https://euw1-omada-northbound.tplinkcloud.com/");
        assert_eq!(built.omada_id, "omadac-1");
        assert_eq!(built.client_secret.expose_secret(), "plain-secret");
        assert_eq!(built.tls, TlsVerification::SystemDefaults);
        assert_eq!(built.clients, vec![MacAddress::new("AA-BB-CC-DD-EE-01")]);
        assert_eq!(built.intervals.devices, Duration::from_secs(10));
        assert_eq!(built.intervals.clients, Duration::from_secs(30));
        assert_eq!(built.intervals.applications, Duration::from_secs(600));
        assert!(built.tokens.is_none());
    }

    #[test]
    fn profile_without_secret_is_rejected() {
        let (_dir, path) = write_sample();
        let config = load_config_from(&path).unwrap();
        let lab = config.profile("lab").unwrap();
        assert!(matches!(
            profile_to_controller_config(lab, "lab-test-no-keyring", None),
            Err(ConfigError::NoCredentials { .. })
        ));
    }

    #[test]
    fn bad_client_mac_is_rejected() {
        let profile = Profile {
            clients: vec!["not-a-mac".into()],
            ..Profile::default()
        };
        assert!(matches!(
            parse_clients(&profile),
            Err(ConfigError::Validation { field, .. }) if field == "clients"
        ));
    }

    #[test]
    fn save_then_load_preserves_profile() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.profiles.insert(
            "default".into(),
            Profile {
                region: Some(Region::Us),
                omada_id: "omadac-9".into(),
                client_id: "cid".into(),
                ..Profile::default()
            },
        );
        save_config_to(&config, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        let profile = loaded.profile("default").unwrap();
        assert_eq!(profile.omada_id, "omadac-9");
        assert_eq!(profile.region, Some(Region::Us));
    }
}
