// SPDX-FileCopyrightText: 2026 Tribuna Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end request scenarios against the full router.
//!
//! Stub identity implementations and a tempfile-backed audit ledger stand in
//! for the external services; the upstream search API is a wiremock server.
//! Every request goes through `tower::ServiceExt::oneshot`, so the whole
//! middleware stack (CORS included) is exercised.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tempfile::tempdir;
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tribuna_core::{IdentityVerifier, TenantDirectory, TenantId, TribunaError, UserId};
use tribuna_datajud::DatajudClient;
use tribuna_gateway::{AuditRecorder, GatewayState, TenantResolver, build_router};
use tribuna_quota::QuotaTracker;
use tribuna_resilience::RetryPolicy;
use tribuna_storage::{AuditLedger, Database};

/// Accepts exactly the credential `valid-token`.
struct StubVerifier;

#[async_trait]
impl IdentityVerifier for StubVerifier {
    async fn verify(&self, credential: &str) -> Result<UserId, TribunaError> {
        if credential == "valid-token" {
            Ok(UserId("user-1".to_string()))
        } else {
            Err(TribunaError::Unauthenticated(
                "credential rejected by identity service".to_string(),
            ))
        }
    }
}

struct StubDirectory {
    tenant: Option<TenantId>,
}

#[async_trait]
impl TenantDirectory for StubDirectory {
    async fn tenant_of(&self, _user: &UserId) -> Result<Option<TenantId>, TribunaError> {
        Ok(self.tenant.clone())
    }
}

struct Setup {
    upstream: Option<String>,
    quota_limit: u32,
    retry: RetryPolicy,
    retryable_statuses: Vec<u16>,
    tenant: Option<String>,
}

impl Default for Setup {
    fn default() -> Self {
        Self {
            upstream: None,
            quota_limit: 100,
            // Millisecond delays keep retry tests fast in real time.
            retry: RetryPolicy::new(3, Duration::from_millis(1), Duration::from_millis(4)),
            retryable_statuses: vec![429],
            tenant: Some("firm-a".to_string()),
        }
    }
}

struct TestGateway {
    router: Router,
    ledger: Arc<AuditLedger>,
    _dir: tempfile::TempDir,
}

async fn build_gateway(setup: Setup) -> TestGateway {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("audit.db");
    let db = Database::open(db_path.to_str().unwrap(), true).await.unwrap();
    let ledger = Arc::new(AuditLedger::new(db));

    let datajud = setup.upstream.map(|base| {
        Arc::new(DatajudClient::new("test-key", &base, Duration::from_secs(5)).unwrap())
    });

    let state = GatewayState {
        quota: Arc::new(QuotaTracker::new()),
        quota_limit: setup.quota_limit,
        quota_window: Duration::from_secs(3600),
        retry: setup.retry,
        retryable_statuses: setup.retryable_statuses,
        datajud,
        resolver: TenantResolver::new(
            Arc::new(StubVerifier),
            Arc::new(StubDirectory {
                tenant: setup.tenant.map(TenantId),
            }),
        ),
        audit: AuditRecorder::new(ledger.clone()),
        started_at: std::time::Instant::now(),
    };

    TestGateway {
        router: build_router(state, "*"),
        ledger,
        _dir: dir,
    }
}

fn authed_request(token: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header("authorization", format!("Bearer {token}"))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn search_request(body: serde_json::Value) -> Request<Body> {
    authed_request("valid-token", body)
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// A plausible upstream result envelope with `total` matching documents.
fn hits_json(total: u64) -> serde_json::Value {
    json!({
        "took": 5,
        "hits": {
            "total": { "value": total, "relation": "eq" },
            "hits": [
                {
                    "_source": {
                        "numeroProcesso": "00012345620248130001",
                        "classe": { "codigo": 7, "nome": "Procedimento Comum" }
                    }
                }
            ]
        }
    })
}

fn firm_a() -> TenantId {
    TenantId("firm-a".to_string())
}

#[tokio::test]
async fn quota_admits_limit_then_denies_without_upstream_call() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api_publica_tjmg/_search"))
        .and(header("authorization", "APIKey test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hits_json(5)))
        .expect(2)
        .mount(&upstream)
        .await;

    let gw = build_gateway(Setup {
        upstream: Some(upstream.uri()),
        quota_limit: 2,
        ..Default::default()
    })
    .await;
    let body = json!({"tribunal": "tjmg", "searchType": "numero", "query": "123"});

    for _ in 0..2 {
        let response = gw
            .router
            .clone()
            .oneshot(search_request(body.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["cached"], false);
        assert_eq!(json["data"]["hits"]["total"]["value"], 5);
    }

    let third = gw
        .router
        .clone()
        .oneshot(search_request(body))
        .await
        .unwrap();
    assert_eq!(third.status(), StatusCode::TOO_MANY_REQUESTS);
    let json = json_body(third).await;
    assert!(json["error"].as_str().unwrap().contains("quota"));

    // Only the two admitted requests reached the upstream and the ledger.
    assert_eq!(gw.ledger.count_for_tenant(&firm_a()).await.unwrap(), 2);
}

#[tokio::test]
async fn validation_failures_never_reach_upstream_or_audit() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hits_json(1)))
        .expect(0)
        .mount(&upstream)
        .await;

    let gw = build_gateway(Setup {
        upstream: Some(upstream.uri()),
        ..Default::default()
    })
    .await;

    let missing_tribunal = gw
        .router
        .clone()
        .oneshot(search_request(json!({"searchType": "parte", "query": "Silva"})))
        .await
        .unwrap();
    assert_eq!(missing_tribunal.status(), StatusCode::BAD_REQUEST);
    let json = json_body(missing_tribunal).await;
    assert!(json["error"].as_str().unwrap().contains("tribunal"));

    let unknown_kind = gw
        .router
        .clone()
        .oneshot(search_request(
            json!({"tribunal": "tjmg", "searchType": "fulltext", "query": "x"}),
        ))
        .await
        .unwrap();
    assert_eq!(unknown_kind.status(), StatusCode::BAD_REQUEST);

    let not_json = gw
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/")
                .header("authorization", "Bearer valid-token")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(not_json.status(), StatusCode::BAD_REQUEST);

    assert_eq!(gw.ledger.count_for_tenant(&firm_a()).await.unwrap(), 0);
}

#[tokio::test]
async fn requests_without_valid_credential_get_401() {
    let gw = build_gateway(Setup::default()).await;
    let body = json!({"tribunal": "tjmg", "searchType": "numero", "query": "123"});

    let no_header = gw
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(no_header.status(), StatusCode::UNAUTHORIZED);
    let json = json_body(no_header).await;
    assert!(json["error"].as_str().unwrap().contains("Authorization"));

    let bad_token = gw
        .router
        .clone()
        .oneshot(authed_request("forged", body))
        .await
        .unwrap();
    assert_eq!(bad_token.status(), StatusCode::UNAUTHORIZED);

    assert_eq!(gw.ledger.count_for_tenant(&firm_a()).await.unwrap(), 0);
}

#[tokio::test]
async fn verified_user_without_tenant_gets_403() {
    let gw = build_gateway(Setup {
        tenant: None,
        ..Default::default()
    })
    .await;

    let response = gw
        .router
        .clone()
        .oneshot(search_request(
            json!({"tribunal": "tjmg", "searchType": "numero", "query": "123"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = json_body(response).await;
    assert!(json["error"].as_str().unwrap().contains("tenant"));
}

#[tokio::test]
async fn transient_upstream_429_is_retried_until_success() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api_publica_trf1/_search"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .up_to_n_times(2)
        .expect(2)
        .mount(&upstream)
        .await;
    Mock::given(method("POST"))
        .and(path("/api_publica_trf1/_search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hits_json(1)))
        .expect(1)
        .mount(&upstream)
        .await;

    let gw = build_gateway(Setup {
        upstream: Some(upstream.uri()),
        ..Default::default()
    })
    .await;

    let response = gw
        .router
        .clone()
        .oneshot(search_request(
            json!({"tribunal": "trf1", "searchType": "parte", "query": "Silva"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["data"]["hits"]["total"]["value"], 1);

    // One request, one audit row, recorded with the final outcome.
    let rows = gw.ledger.recent_for_tenant(&firm_a(), 10).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status_code, 200);
    assert_eq!(rows[0].result_count, 1);
    assert_eq!(rows[0].error_message, None);
}

#[tokio::test]
async fn retries_exhausted_surface_the_last_upstream_status() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .expect(3)
        .mount(&upstream)
        .await;

    let gw = build_gateway(Setup {
        upstream: Some(upstream.uri()),
        ..Default::default()
    })
    .await;

    let response = gw
        .router
        .clone()
        .oneshot(search_request(
            json!({"tribunal": "tjmg", "searchType": "numero", "query": "123"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let json = json_body(response).await;
    assert!(json["error"].as_str().unwrap().contains("429"));

    let rows = gw.ledger.recent_for_tenant(&firm_a(), 10).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status_code, 429);
    assert_eq!(rows[0].result_count, 0);
    assert!(rows[0].error_message.as_deref().unwrap().contains("429"));
}

#[tokio::test]
async fn non_retryable_upstream_status_surfaces_immediately() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(1)
        .mount(&upstream)
        .await;

    let gw = build_gateway(Setup {
        upstream: Some(upstream.uri()),
        ..Default::default()
    })
    .await;

    let response = gw
        .router
        .clone()
        .oneshot(search_request(
            json!({"tribunal": "tjmg", "searchType": "classe", "query": "7"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let rows = gw.ledger.recent_for_tenant(&firm_a(), 10).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status_code, 503);
}

#[tokio::test]
async fn numero_search_strips_formatting_and_lowercases_tribunal() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api_publica_tjsp/_search"))
        .and(body_partial_json(json!({
            "query": { "match": { "numeroProcesso": "00012345620248130001" } },
            "size": 20
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(hits_json(1)))
        .expect(1)
        .mount(&upstream)
        .await;

    let gw = build_gateway(Setup {
        upstream: Some(upstream.uri()),
        ..Default::default()
    })
    .await;

    let response = gw
        .router
        .clone()
        .oneshot(search_request(json!({
            "tribunal": "TJSP",
            "searchType": "numero",
            "query": "0001234-56.2024.8.13.0001"
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn pagination_offset_is_forwarded() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"size": 20, "from": 40})))
        .respond_with(ResponseTemplate::new(200).set_body_json(hits_json(50)))
        .expect(1)
        .mount(&upstream)
        .await;

    let gw = build_gateway(Setup {
        upstream: Some(upstream.uri()),
        ..Default::default()
    })
    .await;

    let response = gw
        .router
        .clone()
        .oneshot(search_request(json!({
            "tribunal": "tjmg",
            "searchType": "parte",
            "query": "Silva",
            "pagina": 3
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn missing_api_key_is_request_level_500_and_audited() {
    let gw = build_gateway(Setup::default()).await;

    let response = gw
        .router
        .clone()
        .oneshot(search_request(
            json!({"tribunal": "tjmg", "searchType": "numero", "query": "123"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = json_body(response).await;
    assert!(json["error"].as_str().unwrap().contains("API key"));

    // The request passed auth and quota, so it is audited like any other
    // failed upstream phase.
    let rows = gw.ledger.recent_for_tenant(&firm_a(), 10).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status_code, 500);
    assert!(rows[0].error_message.is_some());
}

#[tokio::test]
async fn audit_rows_cover_success_and_failure() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api_publica_tjmg/_search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hits_json(4)))
        .up_to_n_times(1)
        .mount(&upstream)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&upstream)
        .await;

    let gw = build_gateway(Setup {
        upstream: Some(upstream.uri()),
        ..Default::default()
    })
    .await;
    let body = json!({"tribunal": "tjmg", "searchType": "numero", "query": "123"});

    let ok = gw
        .router
        .clone()
        .oneshot(search_request(body.clone()))
        .await
        .unwrap();
    assert_eq!(ok.status(), StatusCode::OK);

    let failed = gw
        .router
        .clone()
        .oneshot(search_request(body))
        .await
        .unwrap();
    assert_eq!(failed.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let rows = gw.ledger.recent_for_tenant(&firm_a(), 10).await.unwrap();
    assert_eq!(rows.len(), 2);
    let mut statuses: Vec<u16> = rows.iter().map(|r| r.status_code).collect();
    statuses.sort_unstable();
    assert_eq!(statuses, vec![200, 500]);

    let failure = rows.iter().find(|r| r.status_code == 500).unwrap();
    assert_eq!(failure.result_count, 0);
    assert!(failure.error_message.is_some());
    let success = rows.iter().find(|r| r.status_code == 200).unwrap();
    assert_eq!(success.result_count, 4);
    assert_eq!(success.error_message, None);
}

#[tokio::test]
async fn method_and_route_fallbacks_are_json() {
    let gw = build_gateway(Setup::default()).await;

    let get_root = gw
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(get_root.status(), StatusCode::METHOD_NOT_ALLOWED);
    let json = json_body(get_root).await;
    assert!(json["error"].as_str().unwrap().contains("POST"));

    let unknown = gw
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
    let json = json_body(unknown).await;
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn preflight_answers_204_with_cors_headers() {
    let gw = build_gateway(Setup::default()).await;

    let response = gw
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/")
                .header("origin", "https://app.example.com")
                .header("access-control-request-method", "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(
        response
            .headers()
            .contains_key("access-control-allow-origin")
    );
}

#[tokio::test]
async fn health_reports_ok_without_auth() {
    let gw = build_gateway(Setup::default()).await;

    let response = gw
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].as_str().is_some_and(|v| !v.is_empty()));
}
