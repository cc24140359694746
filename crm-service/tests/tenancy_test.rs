//! Tenant middleware behavior over a real router, exercised with
//! in-process requests (no server, no database).

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::from_fn_with_state,
    routing::get,
    Json, Router,
};
use crm_core::middleware::tenant::{
    tenant_context_middleware, TenantContext, TenantResolver, TenantResolverConfig, TENANT_HEADER,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

/// Echoes what the middleware produced: the context extension and the
/// rewritten request header.
async fn whoami(tenant: TenantContext, req: Request<Body>) -> Json<Value> {
    let header = req
        .headers()
        .get(TENANT_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());
    Json(json!({
        "tenant_id": tenant.tenant_id,
        "header": header,
    }))
}

fn test_router(default_tenant: Option<&str>) -> Router {
    let resolver = TenantResolver::new(TenantResolverConfig {
        default_tenant_id: default_tenant.map(String::from),
    });

    let api = Router::new()
        .route("/api/whoami", get(whoami))
        .layer(from_fn_with_state(resolver, tenant_context_middleware));

    Router::new()
        .route("/health", get(|| async { "ok" }))
        // Mounted outside the middleware on purpose, to exercise the
        // extractor's misuse guard.
        .route("/unwired", get(|tenant: TenantContext| async move {
            tenant.tenant_id
        }))
        .merge(api)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn header_pin_reaches_handler_context_and_header() {
    let app = test_router(Some("fallback-org"));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/whoami?tenantId=query-org")
                .header(TENANT_HEADER, "header-org")
                .header("cookie", "tenant_id=cookie-org")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["tenant_id"], "header-org");
    assert_eq!(body["header"], "header-org");
}

#[tokio::test]
async fn query_parameter_is_used_when_no_header() {
    let app = test_router(Some("fallback-org"));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/whoami?tenantId=query-org")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["tenant_id"], "query-org");
    // The middleware rewrote the header so downstream code reads it
    // without re-resolving.
    assert_eq!(body["header"], "query-org");
}

#[tokio::test]
async fn cookie_is_used_when_no_header_or_query() {
    let app = test_router(Some("fallback-org"));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/whoami")
                .header("cookie", "session=xyz; tenant_id=cookie-org")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["tenant_id"], "cookie-org");
}

#[tokio::test]
async fn configured_default_applies_when_nothing_is_sent() {
    let app = test_router(Some("fallback-org"));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/whoami")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["tenant_id"], "fallback-org");
}

#[tokio::test]
async fn response_does_not_echo_the_tenant_header() {
    let app = test_router(Some("fallback-org"));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/whoami")
                .header(TENANT_HEADER, "header-org")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.headers().get(TENANT_HEADER).is_none());
}

#[tokio::test]
async fn health_is_served_without_tenant_resolution() {
    let app = test_router(None);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn extractor_outside_the_middleware_is_an_internal_error() {
    let app = test_router(None);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/unwired")
                .header(TENANT_HEADER, "header-org")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
