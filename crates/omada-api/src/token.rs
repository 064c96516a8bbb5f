// Token lifecycle manager
//
// Sole owner and mutator of the session's token pair. All refresh activity
// is serialized through one async mutex, so concurrent callers that find
// an expiring token queue behind a single network refresh and then observe
// the refreshed pair.

use std::sync::Arc;

use chrono::{Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;

use crate::auth::{ClientCredentials, Session, TokenGrant, TokenSet, TokenStore};
use crate::envelope::{Envelope, RefreshOutcome, classify_refresh};
use crate::error::Error;

/// Renew this many seconds before the controller-reported expiry.
pub const TOKEN_EXPIRY_BUFFER_SECS: i64 = 300;

const TOKEN_PATH: &str = "openapi/authorize/token";

/// Result of a `refresh_token` grant attempt that did not fail fatally.
enum RefreshAttempt {
    Granted(TokenGrant),
    /// The refresh token is unusable; the string says why.
    Fallback(String),
}

/// Keeps exactly one valid access token alive for a [`Session`].
pub struct TokenManager {
    http: reqwest::Client,
    token_url: Url,
    omada_id: String,
    credentials: ClientCredentials,
    tokens: Mutex<TokenSet>,
    buffer: Duration,
    store: Arc<dyn TokenStore>,
}

impl TokenManager {
    /// Take ownership of a session's token pair.
    pub fn new(
        http: reqwest::Client,
        session: Session,
        store: Arc<dyn TokenStore>,
    ) -> Result<Self, Error> {
        let token_url = base_with_slash(&session.base_url)?.join(TOKEN_PATH)?;
        Ok(Self {
            http,
            token_url,
            omada_id: session.omada_id,
            credentials: session.credentials,
            tokens: Mutex::new(session.tokens),
            buffer: Duration::seconds(TOKEN_EXPIRY_BUFFER_SECS),
            store,
        })
    }

    /// Override the renewal buffer.
    pub fn with_buffer(mut self, buffer: Duration) -> Self {
        self.buffer = buffer;
        self
    }

    /// Return a usable access token, refreshing first if it is inside the
    /// renewal window.
    pub async fn ensure_valid(&self) -> Result<SecretString, Error> {
        let mut tokens = self.tokens.lock().await;
        if tokens.needs_refresh(Utc::now(), self.buffer) {
            debug!(expires_at = %tokens.expires_at, "access token expiring, refreshing");
            self.refresh_locked(&mut tokens).await?;
        }
        Ok(tokens.access_token.clone())
    }

    /// Refresh unconditionally.
    pub async fn force_refresh(&self) -> Result<SecretString, Error> {
        let mut tokens = self.tokens.lock().await;
        self.refresh_locked(&mut tokens).await?;
        Ok(tokens.access_token.clone())
    }

    /// Refresh after the controller rejected `rejected`.
    ///
    /// If another caller already rotated the token while this one waited on
    /// the lock, the current token is returned without a second refresh.
    pub async fn refresh_rejected(&self, rejected: &SecretString) -> Result<SecretString, Error> {
        let mut tokens = self.tokens.lock().await;
        if tokens.access_token.expose_secret() != rejected.expose_secret() {
            debug!("access token already rotated by a concurrent caller");
            return Ok(tokens.access_token.clone());
        }
        self.refresh_locked(&mut tokens).await?;
        Ok(tokens.access_token.clone())
    }

    /// A copy of the current token pair.
    pub async fn tokens(&self) -> TokenSet {
        self.tokens.lock().await.clone()
    }

    // ── Grants ───────────────────────────────────────────────────────

    async fn refresh_locked(&self, tokens: &mut TokenSet) -> Result<(), Error> {
        let grant = if tokens.has_refresh_token() {
            match self.try_refresh(&tokens.refresh_token).await? {
                RefreshAttempt::Granted(grant) => {
                    debug!(expires_in = grant.expires_in, "access token refreshed");
                    grant
                }
                RefreshAttempt::Fallback(reason) => {
                    info!(%reason, "refresh token unusable, re-issuing from client credentials");
                    self.reissue().await?
                }
            }
        } else {
            info!("no refresh token on record, issuing from client credentials");
            self.reissue().await?
        };

        *tokens = grant.into_token_set(Utc::now());
        self.store.store(tokens);
        Ok(())
    }

    /// `refresh_token` grant: every parameter in the query string, no body.
    async fn try_refresh(&self, refresh_token: &SecretString) -> Result<RefreshAttempt, Error> {
        let resp = self
            .http
            .post(self.token_url.clone())
            .query(&[
                ("grant_type", "refresh_token"),
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.expose_secret()),
                ("refresh_token", refresh_token.expose_secret()),
            ])
            .send()
            .await;

        let resp = match resp {
            Ok(resp) => resp,
            Err(e) => return Ok(RefreshAttempt::Fallback(format!("transport error: {e}"))),
        };

        let status = resp.status().as_u16();
        if status != 200 {
            return Ok(RefreshAttempt::Fallback(format!("HTTP {status}")));
        }

        let envelope = Envelope::parse(&resp.text().await?)?;
        match classify_refresh(status, Some(envelope.error_code)) {
            RefreshOutcome::Success => Ok(RefreshAttempt::Granted(envelope.into_result()?)),
            RefreshOutcome::Reissue => Ok(RefreshAttempt::Fallback(format!(
                "error {}: {}",
                envelope.error_code,
                envelope.message()
            ))),
            RefreshOutcome::Fatal => {
                warn!(code = envelope.error_code, "token refresh rejected");
                Err(Error::Authentication {
                    message: format!(
                        "token refresh failed: {} (code {})",
                        envelope.message(),
                        envelope.error_code
                    ),
                })
            }
        }
    }

    /// `client_credentials` grant: grant type in the query, identity in the body.
    ///
    /// A transport failure here is surfaced as [`Error::Transport`]; only an
    /// explicit rejection from the controller breaks the credential chain.
    async fn reissue(&self) -> Result<TokenGrant, Error> {
        let resp = self
            .http
            .post(self.token_url.clone())
            .query(&[("grant_type", "client_credentials")])
            .json(&json!({
                "omadacId": self.omada_id,
                "client_id": self.credentials.client_id,
                "client_secret": self.credentials.client_secret.expose_secret(),
            }))
            .send()
            .await?;

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            return Err(Error::Authentication {
                message: format!("client credentials grant returned HTTP {}", status.as_u16()),
            });
        }

        let envelope = Envelope::parse(&resp.text().await?)?;
        if envelope.error_code != 0 {
            warn!(code = envelope.error_code, "client credentials grant rejected");
            return Err(Error::Authentication {
                message: format!(
                    "client credentials rejected: {} (code {})",
                    envelope.message(),
                    envelope.error_code
                ),
            });
        }

        let grant: TokenGrant = envelope.into_result()?;
        info!(expires_in = grant.expires_in, "issued new token pair from client credentials");
        Ok(grant)
    }
}

/// `Url::join` drops the last path segment unless the base ends in `/`.
pub(crate) fn base_with_slash(base: &Url) -> Result<Url, Error> {
    if base.path().ends_with('/') {
        Ok(base.clone())
    } else {
        Ok(Url::parse(&format!("{base}/"))?)
    }
}
