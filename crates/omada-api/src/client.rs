// Resilient request executor for the Omada Open API.
//
// Base paths: /openapi/v1/{omadacId}/ and /openapi/v2/{omadacId}/
// Auth: `Authorization: AccessToken=<token>`, managed by `TokenManager`.

use std::future::Future;
use std::sync::Arc;

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::auth::{Session, TokenStore};
use crate::envelope::{Envelope, Outcome, Page, classify};
use crate::error::Error;
use crate::token::{TokenManager, base_with_slash};
use crate::transport::TransportConfig;

/// Page size for listings; large enough that most sites fit in one page.
pub const PAGE_SIZE: u32 = 1000;

/// Result of sending a request once.
enum Attempt {
    Done(Envelope),
    /// Rejected as unauthorized; the string is the controller's reason.
    Rejected(String),
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for one Omada controller.
///
/// Cheaply cloneable; all clones share one [`TokenManager`], so every
/// poller on a connection goes through the same single-flight refresh.
#[derive(Clone)]
pub struct OmadaClient {
    http: reqwest::Client,
    base_url: Url,
    omada_id: String,
    tokens: Arc<TokenManager>,
}

impl OmadaClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a session and transport config.
    pub fn new(
        session: Session,
        transport: &TransportConfig,
        store: Arc<dyn TokenStore>,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(http, session, store)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        session: Session,
        store: Arc<dyn TokenStore>,
    ) -> Result<Self, Error> {
        let base_url = base_with_slash(&session.base_url)?;
        let omada_id = session.omada_id.clone();
        let tokens = TokenManager::new(http.clone(), session, store)?;
        Ok(Self {
            http,
            base_url,
            omada_id,
            tokens: Arc::new(tokens),
        })
    }

    pub fn token_manager(&self) -> &Arc<TokenManager> {
        &self.tokens
    }

    pub fn omada_id(&self) -> &str {
        &self.omada_id
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Path builders ────────────────────────────────────────────────

    /// `openapi/v1/{omadacId}/{suffix}`
    pub(crate) fn v1(&self, suffix: &str) -> String {
        format!("openapi/v1/{}/{suffix}", self.omada_id)
    }

    /// `openapi/v2/{omadacId}/{suffix}`
    pub(crate) fn v2(&self, suffix: &str) -> String {
        format!("openapi/v2/{}/{suffix}", self.omada_id)
    }

    /// `openapi/v1/{omadacId}/sites/{site}/{suffix}`
    pub(crate) fn site(&self, site_id: &str, suffix: &str) -> String {
        self.v1(&format!("sites/{site_id}/{suffix}"))
    }

    // ── Executor ─────────────────────────────────────────────────────

    /// Issue one authenticated call and decode its `result`.
    ///
    /// On a transient-auth rejection (HTTP 401, or an access-token error
    /// code in a 200 body) the token is refreshed and the call is resent
    /// exactly once; a second rejection surfaces as
    /// [`Error::TokenRejected`]. Transport failures are never retried here.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, String)],
        body: Option<&serde_json::Value>,
    ) -> Result<T, Error> {
        let url = self.base_url.join(path)?;
        debug!("{method} {url}");

        let token = self.tokens.ensure_valid().await?;
        match self.send_once(&method, &url, params, body, &token).await? {
            Attempt::Done(envelope) => envelope.into_result(),
            Attempt::Rejected(reason) => {
                debug!(%url, %reason, "access token rejected, refreshing and retrying once");
                let token = self.tokens.refresh_rejected(&token).await?;
                match self.send_once(&method, &url, params, body, &token).await? {
                    Attempt::Done(envelope) => envelope.into_result(),
                    Attempt::Rejected(message) => Err(Error::TokenRejected { message }),
                }
            }
        }
    }

    async fn send_once(
        &self,
        method: &Method,
        url: &Url,
        params: &[(&str, String)],
        body: Option<&serde_json::Value>,
        token: &SecretString,
    ) -> Result<Attempt, Error> {
        let mut auth = HeaderValue::from_str(&format!("AccessToken={}", token.expose_secret()))
            .map_err(|e| Error::Authentication {
                message: format!("invalid access token header value: {e}"),
            })?;
        auth.set_sensitive(true);

        let mut req = self
            .http
            .request(method.clone(), url.clone())
            .header(AUTHORIZATION, auth);
        if !params.is_empty() {
            req = req.query(params);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req.send().await?;
        let status = resp.status().as_u16();
        let text = resp.text().await?;

        if status != 200 {
            return match classify(status, None) {
                Outcome::TransientAuth => Ok(Attempt::Rejected(format!("HTTP {status}"))),
                Outcome::Success | Outcome::Hard => Err(Error::Http {
                    status,
                    body: text.chars().take(200).collect(),
                }),
            };
        }

        let envelope = Envelope::parse(&text)?;
        match classify(status, Some(envelope.error_code)) {
            Outcome::Success => Ok(Attempt::Done(envelope)),
            Outcome::TransientAuth => Ok(Attempt::Rejected(format!(
                "error {}: {}",
                envelope.error_code,
                envelope.message()
            ))),
            Outcome::Hard => Err(Error::Api {
                code: envelope.error_code,
                message: envelope.message(),
            }),
        }
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        self.execute(Method::GET, path, params, None).await
    }

    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, Error> {
        self.execute(Method::POST, path, &[], Some(body)).await
    }

    pub(crate) async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, Error> {
        self.execute(Method::PUT, path, &[], Some(body)).await
    }

    pub(crate) async fn patch<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, Error> {
        self.execute(Method::PATCH, path, &[], Some(body)).await
    }
}

// ── Pagination helper ────────────────────────────────────────────────

/// Collect all pages into a single `Vec<T>`.
///
/// Pages are 1-based. Stops on a short page or once the cumulative count
/// reaches the server-reported `totalRows`.
pub async fn paginate_all<T, F, Fut>(page_size: u32, fetch: F) -> Result<Vec<T>, Error>
where
    F: Fn(u32, u32) -> Fut,
    Fut: Future<Output = Result<Page<T>, Error>>,
{
    let mut all = Vec::new();
    let mut page: u32 = 1;
    let page_len = usize::try_from(page_size).unwrap_or(usize::MAX);

    loop {
        let chunk = fetch(page, page_size).await?;
        let received = chunk.data.len();
        all.extend(chunk.data);

        if received < page_len || i64::try_from(all.len()).unwrap_or(i64::MAX) >= chunk.total_rows {
            break;
        }

        page += 1;
    }

    Ok(all)
}

/// `page`/`pageSize` query parameters.
pub(crate) fn page_params(page: u32, page_size: u32) -> Vec<(&'static str, String)> {
    vec![("page", page.to_string()), ("pageSize", page_size.to_string())]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    fn page_of(total: i64, count: usize) -> Page<u32> {
        Page {
            total_rows: total,
            current_page: 0,
            current_size: 0,
            data: vec![0; count],
        }
    }

    #[tokio::test]
    async fn paginate_all_fetches_exactly_enough_pages() {
        let calls = AtomicU32::new(0);
        let items = paginate_all(1000, |page, size| {
            calls.fetch_add(1, Ordering::SeqCst);
            let remaining = 1500_usize.saturating_sub(((page - 1) * size) as usize);
            let count = remaining.min(size as usize);
            async move { Ok(page_of(1500, count)) }
        })
        .await
        .unwrap();

        assert_eq!(items.len(), 1500);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn paginate_all_stops_at_reported_total() {
        let calls = AtomicU32::new(0);
        let items = paginate_all(2, |_, _| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { Ok(page_of(2, 2)) }
        })
        .await
        .unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn paginate_all_propagates_page_errors() {
        let result: Result<Vec<u32>, Error> = paginate_all(10, |_, _| async {
            Err(Error::Api {
                code: -1,
                message: "boom".into(),
            })
        })
        .await;
        assert!(matches!(result, Err(Error::Api { code: -1, .. })));
    }
}
