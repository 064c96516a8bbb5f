//! Polling engine between `omada-api` and consumers (the `omada` CLI).
//!
//! - **[`Controller`]**: facade over one controller connection. Owns the
//!   shared [`OmadaClient`](omada_api::OmadaClient) (one session, one
//!   single-flight token manager), verifies credentials on
//!   [`start()`](Controller::start), and spawns per-site pollers.
//!
//! - **Pollers** ([`poller`]): [`SiteAggregator`] (devices plus best-effort
//!   enrichments), [`ClientPresencePoller`] and [`AppTrafficPoller`]. Each runs
//!   on its own interval and publishes a [`PollState`] through a `watch`
//!   channel; a failed cycle keeps the last good snapshot.
//!
//! - **Domain model** ([`model`]): immutable snapshots keyed by the
//!   normalized [`MacAddress`], built fresh every cycle by [`convert`].

pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod model;
pub mod poller;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ControllerConfig, PollIntervals, TlsVerification};
pub use controller::{Controller, SitePollers};
pub use error::CoreError;
pub use omada_api::models::ApplicationEntry;
pub use poller::{
    AppTrafficPoller, ClientPresencePoller, ClientPresenceSnapshot, PollHandle, PollState, Poller,
    SiteAggregator,
};

pub use model::{
    AppTrafficSnapshot, AppUsage, BandClients, ClientSnapshot, ConnectionKind, DeviceSnapshot,
    DeviceType, MacAddress, PoeBudget, PoePortState, PortKey, Site, SiteSnapshot, SsidState,
    Uplink, WanPortState,
};
