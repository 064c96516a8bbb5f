// ── Domain model ──
//
// Normalized, read-only projections of raw Open API records. Every poll
// cycle builds fresh values; published snapshots are never mutated.

pub mod client;
pub mod device;
pub mod mac;
pub mod port;
pub mod site;
pub mod ssid;
pub mod traffic;
pub mod wan;

pub use client::{ClientSnapshot, ConnectionKind};
pub use device::{BandClients, DeviceSnapshot, DeviceType, Uplink};
pub use mac::MacAddress;
pub use port::{PoeBudget, PoePortState, PortKey};
pub use site::{Site, SiteSnapshot};
pub use ssid::SsidState;
pub use traffic::{AppTrafficSnapshot, AppUsage};
pub use wan::WanPortState;
