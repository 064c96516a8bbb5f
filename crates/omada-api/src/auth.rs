use std::fmt;

use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use url::Url;

/// Static application credentials created in the controller's
/// Platform Integration page. They never rotate.
#[derive(Debug, Clone)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: SecretString,
}

/// An access/refresh token pair and the instant the access token expires.
#[derive(Debug, Clone)]
pub struct TokenSet {
    pub access_token: SecretString,
    pub refresh_token: SecretString,
    pub expires_at: DateTime<Utc>,
}

impl TokenSet {
    /// A placeholder pair that is already expired and carries no refresh
    /// token, so the first `ensure_valid()` re-issues from client credentials.
    pub fn expired() -> Self {
        Self {
            access_token: SecretString::from(String::new()),
            refresh_token: SecretString::from(String::new()),
            expires_at: DateTime::<Utc>::default(),
        }
    }

    /// `true` once `now` has entered the renewal window before expiry.
    pub fn needs_refresh(&self, now: DateTime<Utc>, buffer: Duration) -> bool {
        now >= self.expires_at - buffer
    }

    /// `true` when there is no refresh token to attempt a refresh with.
    pub fn has_refresh_token(&self) -> bool {
        !self.refresh_token.expose_secret().is_empty()
    }
}

/// Connection parameters plus the current token pair for one controller.
///
/// Created once at startup and handed to [`TokenManager`](crate::TokenManager),
/// which becomes its only mutator.
#[derive(Debug, Clone)]
pub struct Session {
    /// Northbound API root, e.g. `https://use1-omada-northbound.tplinkcloud.com`.
    pub base_url: Url,
    /// Controller identifier (`omadacId`).
    pub omada_id: String,
    pub credentials: ClientCredentials,
    pub tokens: TokenSet,
}

// ── Persistence hook ────────────────────────────────────────────────

/// Receives every freshly refreshed or re-issued token pair.
///
/// The host stores it durably and feeds it back into [`Session::tokens`]
/// on restart, so a restart does not burn a client-credentials grant.
pub trait TokenStore: Send + Sync {
    fn store(&self, tokens: &TokenSet);
}

impl<F> TokenStore for F
where
    F: Fn(&TokenSet) + Send + Sync,
{
    fn store(&self, tokens: &TokenSet) {
        self(tokens);
    }
}

/// A [`TokenStore`] that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTokenStore;

impl TokenStore for NoopTokenStore {
    fn store(&self, _tokens: &TokenSet) {}
}

// ── Token grant wire type ───────────────────────────────────────────

/// `result` of a successful token grant.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TokenGrant {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl TokenGrant {
    pub(crate) fn into_token_set(self, now: DateTime<Utc>) -> TokenSet {
        TokenSet {
            access_token: SecretString::from(self.access_token),
            refresh_token: SecretString::from(self.refresh_token),
            expires_at: now + Duration::seconds(self.expires_in),
        }
    }
}

impl fmt::Debug for TokenGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenGrant")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .finish_non_exhaustive()
    }
}
