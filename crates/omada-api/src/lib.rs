// omada-api: Async Rust client for the TP-Link Omada Open API
//
// Layers, leaves first:
//   auth      -- session data, token pair, persistence hook
//   token     -- token lifecycle manager (refresh / re-issue, single-flight)
//   envelope  -- `{errorCode, msg, result}` and the error-code table
//   client    -- resilient request executor + pagination
//   sites, devices, clients, switches, gateways, wireless, applications
//             -- typed endpoint methods on `OmadaClient`

pub mod auth;
pub mod client;
pub mod envelope;
pub mod error;
pub mod models;
pub mod token;
pub mod transport;

mod applications;
mod clients;
mod devices;
mod gateways;
mod sites;
mod switches;
mod wireless;

pub use auth::{ClientCredentials, NoopTokenStore, Session, TokenSet, TokenStore};
pub use client::{OmadaClient, PAGE_SIZE, paginate_all};
pub use envelope::Page;
pub use error::Error;
pub use token::{TOKEN_EXPIRY_BUFFER_SECS, TokenManager};
pub use transport::{DEFAULT_TIMEOUT, TlsMode, TransportConfig};
