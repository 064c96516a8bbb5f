#![allow(clippy::unwrap_used)]
// Integration tests for `TokenManager` using wiremock.

use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use futures_util::future::join_all;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockBuilder, MockServer, ResponseTemplate};

use omada_api::{ClientCredentials, Error, Session, TokenManager, TokenSet, TokenStore};

const TOKEN_PATH: &str = "/openapi/authorize/token";

// ── Helpers ─────────────────────────────────────────────────────────

fn tokens(access: &str, refresh: &str, expires_in: Duration) -> TokenSet {
    TokenSet {
        access_token: SecretString::from(access.to_owned()),
        refresh_token: SecretString::from(refresh.to_owned()),
        expires_at: Utc::now() + expires_in,
    }
}

fn grant(access: &str, refresh: &str) -> serde_json::Value {
    json!({
        "errorCode": 0,
        "msg": "Open API Get Access Token successfully.",
        "result": {
            "accessToken": access,
            "tokenType": "bearer",
            "expiresIn": 7200,
            "refreshToken": refresh,
        }
    })
}

fn error_body(code: i64, msg: &str) -> serde_json::Value {
    json!({ "errorCode": code, "msg": msg })
}

type Saved = Arc<Mutex<Vec<TokenSet>>>;

async fn setup(initial: TokenSet) -> (MockServer, TokenManager, Saved) {
    setup_with_http(initial, reqwest::Client::new()).await
}

async fn setup_with_http(
    initial: TokenSet,
    http: reqwest::Client,
) -> (MockServer, TokenManager, Saved) {
    let server = MockServer::start().await;
    let saved: Saved = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&saved);
    let store: Arc<dyn TokenStore> =
        Arc::new(move |t: &TokenSet| sink.lock().unwrap().push(t.clone()));

    let session = Session {
        base_url: Url::parse(&server.uri()).unwrap(),
        omada_id: "omadac-1".into(),
        credentials: ClientCredentials {
            client_id: "client-id".into(),
            client_secret: SecretString::from("client-secret".to_owned()),
        },
        tokens: initial,
    };
    let manager = TokenManager::new(http, session, store).unwrap();
    (server, manager, saved)
}

fn refresh_grant() -> MockBuilder {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(query_param("grant_type", "refresh_token"))
}

fn credentials_grant() -> MockBuilder {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(query_param("grant_type", "client_credentials"))
}

// ── Proactive refresh ───────────────────────────────────────────────

#[tokio::test]
async fn test_ensure_valid_refreshes_inside_buffer() {
    let (server, manager, saved) = setup(tokens("old-at", "old-rt", Duration::minutes(2))).await;

    refresh_grant()
        .and(query_param("refresh_token", "old-rt"))
        .and(query_param("client_id", "client-id"))
        .and(query_param("client_secret", "client-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(grant("new-at", "new-rt")))
        .expect(1)
        .mount(&server)
        .await;

    let token = manager.ensure_valid().await.unwrap();
    assert_eq!(token.expose_secret(), "new-at");

    let current = manager.tokens().await;
    assert_eq!(current.refresh_token.expose_secret(), "new-rt");
    assert!(current.expires_at > Utc::now() + Duration::minutes(110));

    let saved = saved.lock().unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].access_token.expose_secret(), "new-at");
}

#[tokio::test]
async fn test_ensure_valid_noop_outside_buffer() {
    let (server, manager, saved) = setup(tokens("at", "rt", Duration::minutes(30))).await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(grant("x", "y")))
        .expect(0)
        .mount(&server)
        .await;

    let token = manager.ensure_valid().await.unwrap();
    assert_eq!(token.expose_secret(), "at");
    assert!(saved.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_concurrent_callers_share_one_refresh() {
    let (server, manager, _) = setup(tokens("old-at", "old-rt", Duration::seconds(10))).await;

    refresh_grant()
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(grant("new-at", "new-rt"))
                .set_delay(std::time::Duration::from_millis(50)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let results = join_all((0..8).map(|_| manager.ensure_valid())).await;
    for token in results {
        assert_eq!(token.unwrap().expose_secret(), "new-at");
    }
}

#[tokio::test]
async fn test_force_refresh_ignores_expiry() {
    let (server, manager, _) = setup(tokens("at", "rt", Duration::hours(2))).await;

    refresh_grant()
        .respond_with(ResponseTemplate::new(200).set_body_json(grant("forced-at", "forced-rt")))
        .expect(1)
        .mount(&server)
        .await;

    let token = manager.force_refresh().await.unwrap();
    assert_eq!(token.expose_secret(), "forced-at");
}

#[tokio::test]
async fn test_refresh_rejected_skips_when_already_rotated() {
    let (server, manager, _) = setup(tokens("current-at", "rt", Duration::hours(2))).await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(grant("x", "y")))
        .expect(0)
        .mount(&server)
        .await;

    let stale = SecretString::from("stale-at".to_owned());
    let token = manager.refresh_rejected(&stale).await.unwrap();
    assert_eq!(token.expose_secret(), "current-at");
}

// ── Re-issue fallback ───────────────────────────────────────────────

#[tokio::test]
async fn test_expired_refresh_token_code_triggers_one_reissue() {
    let (server, manager, saved) = setup(tokens("old-at", "old-rt", Duration::zero())).await;

    refresh_grant()
        .respond_with(
            ResponseTemplate::new(200).set_body_json(error_body(-44114, "Refresh token expired.")),
        )
        .expect(1)
        .mount(&server)
        .await;

    credentials_grant()
        .and(body_partial_json(json!({
            "omadacId": "omadac-1",
            "client_id": "client-id",
            "client_secret": "client-secret",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(grant("issued-at", "issued-rt")))
        .expect(1)
        .mount(&server)
        .await;

    let token = manager.ensure_valid().await.unwrap();
    assert_eq!(token.expose_secret(), "issued-at");
    assert_eq!(
        manager.tokens().await.refresh_token.expose_secret(),
        "issued-rt"
    );
    assert_eq!(saved.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_http_401_on_refresh_triggers_reissue() {
    let (server, manager, _) = setup(tokens("old-at", "old-rt", Duration::zero())).await;

    refresh_grant()
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    credentials_grant()
        .respond_with(ResponseTemplate::new(200).set_body_json(grant("issued-at", "issued-rt")))
        .expect(1)
        .mount(&server)
        .await;

    let token = manager.ensure_valid().await.unwrap();
    assert_eq!(token.expose_secret(), "issued-at");
}

#[tokio::test]
async fn test_refresh_timeout_falls_back_to_reissue() {
    let http = reqwest::Client::builder()
        .timeout(std::time::Duration::from_millis(300))
        .build()
        .unwrap();
    let (server, manager, saved) =
        setup_with_http(tokens("old-at", "old-rt", Duration::zero()), http).await;

    refresh_grant()
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(grant("late-at", "late-rt"))
                .set_delay(std::time::Duration::from_secs(2)),
        )
        .expect(1)
        .mount(&server)
        .await;

    credentials_grant()
        .respond_with(ResponseTemplate::new(200).set_body_json(grant("issued-at", "issued-rt")))
        .expect(1)
        .mount(&server)
        .await;

    let token = manager.ensure_valid().await.unwrap();
    assert_eq!(token.expose_secret(), "issued-at");
    assert_eq!(saved.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_missing_refresh_token_goes_straight_to_reissue() {
    let (server, manager, _) = setup(TokenSet::expired()).await;

    refresh_grant()
        .respond_with(ResponseTemplate::new(200).set_body_json(grant("x", "y")))
        .expect(0)
        .mount(&server)
        .await;

    credentials_grant()
        .respond_with(ResponseTemplate::new(200).set_body_json(grant("issued-at", "issued-rt")))
        .expect(1)
        .mount(&server)
        .await;

    let token = manager.ensure_valid().await.unwrap();
    assert_eq!(token.expose_secret(), "issued-at");
}

#[tokio::test]
async fn test_rejected_client_credentials_is_fatal() {
    let (server, manager, saved) = setup(tokens("old-at", "old-rt", Duration::zero())).await;

    refresh_grant()
        .respond_with(
            ResponseTemplate::new(200).set_body_json(error_body(-44114, "Refresh token expired.")),
        )
        .mount(&server)
        .await;

    credentials_grant()
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(error_body(-44106, "The client id or client secret is invalid.")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let result = manager.ensure_valid().await;
    assert!(
        matches!(&result, Err(e) if e.is_credential_failure()),
        "expected credential failure, got: {result:?}"
    );
    assert!(saved.lock().unwrap().is_empty());
    assert_eq!(manager.tokens().await.access_token.expose_secret(), "old-at");
}

#[tokio::test]
async fn test_reissue_http_401_is_fatal() {
    let (server, manager, _) = setup(TokenSet::expired()).await;

    credentials_grant()
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = manager.ensure_valid().await;
    assert!(matches!(result, Err(Error::Authentication { .. })));
}

#[tokio::test]
async fn test_unrelated_refresh_error_does_not_reissue() {
    let (server, manager, _) = setup(tokens("old-at", "old-rt", Duration::zero())).await;

    refresh_grant()
        .respond_with(ResponseTemplate::new(200).set_body_json(error_body(-1, "General error.")))
        .mount(&server)
        .await;

    credentials_grant()
        .respond_with(ResponseTemplate::new(200).set_body_json(grant("x", "y")))
        .expect(0)
        .mount(&server)
        .await;

    let result = manager.ensure_valid().await;
    assert!(matches!(result, Err(Error::Authentication { .. })));
}
