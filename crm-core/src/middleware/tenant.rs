//! Tenant resolution middleware for multi-tenancy support.
//!
//! Every business row in the CRM carries a tenant identifier, so every
//! request must be pinned to exactly one tenant before it reaches a
//! handler. The resolver derives the identifier from (in order):
//! 1. The `x-tenant-id` request header
//! 2. The `tenantId` query-string parameter
//! 3. The `tenant_id` cookie (a previously selected tenant)
//! 4. The configured default identifier
//!
//! Resolution is purely syntactic; whether the tenant exists or the user
//! may act on it is enforced by scoped queries and permission checks
//! downstream.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, HeaderValue, Uri, header, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::error::AppError;

/// Header carrying an explicit tenant pin; also rewritten by the
/// middleware so downstream handlers can read it without re-resolving.
pub const TENANT_HEADER: &str = "x-tenant-id";

/// Query-string override, used by public/demo routes with no session.
pub const TENANT_QUERY_PARAM: &str = "tenantId";

/// Cookie persisting a user's previously selected tenant.
pub const TENANT_COOKIE: &str = "tenant_id";

/// Last-resort identifier when no source matches and no default is
/// configured. Resolution always succeeds; misconfiguration is logged,
/// not turned into a failed request.
pub const FALLBACK_TENANT_ID: &str = "default";

/// Resolver configuration, injected at construction so tests can supply
/// arbitrary defaults without touching process environment state.
#[derive(Debug, Clone, Default)]
pub struct TenantResolverConfig {
    pub default_tenant_id: Option<String>,
}

/// Derives a tenant identifier from an inbound request.
#[derive(Debug, Clone)]
pub struct TenantResolver {
    config: TenantResolverConfig,
}

impl TenantResolver {
    pub fn new(config: TenantResolverConfig) -> Self {
        Self { config }
    }

    /// Resolve the tenant identifier for a request. First match wins:
    /// header, query parameter, cookie, configured default, fallback.
    /// Host subdomains are deliberately not a source; tenants are not
    /// bound to host names, and the same deployment serves them all.
    pub fn resolve(&self, headers: &HeaderMap, uri: &Uri) -> String {
        if let Some(id) = header_tenant(headers) {
            return id;
        }
        if let Some(id) = query_tenant(uri) {
            return id;
        }
        if let Some(id) = cookie_tenant(headers) {
            return id;
        }
        if let Some(id) = self.config.default_tenant_id.as_deref() {
            if !id.is_empty() {
                return id.to_string();
            }
        }
        tracing::warn!(
            path = %uri.path(),
            "No tenant source matched and no default is configured; using fallback tenant"
        );
        FALLBACK_TENANT_ID.to_string()
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn header_tenant(headers: &HeaderMap) -> Option<String> {
    headers
        .get(TENANT_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(non_empty)
}

fn query_tenant(uri: &Uri) -> Option<String> {
    let query = uri.query()?;
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query).ok()?;
    pairs
        .into_iter()
        .find(|(name, _)| name == TENANT_QUERY_PARAM)
        .and_then(|(_, value)| non_empty(&value))
}

fn cookie_tenant(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == TENANT_COOKIE)
        .and_then(|(_, value)| non_empty(value))
}

/// Build a `Set-Cookie` value persisting the selected tenant.
pub fn tenant_cookie(tenant_id: &str) -> String {
    format!("{TENANT_COOKIE}={tenant_id}; Path=/; HttpOnly; SameSite=Lax")
}

/// Paths served without tenant resolution: liveness probes and static
/// assets have no tenant-scoped data to protect.
pub fn is_exempt_path(path: &str) -> bool {
    path == "/health"
        || path == "/metrics"
        || path == "/favicon.ico"
        || path.starts_with("/static/")
}

/// Tenant context extracted from the request.
/// Available in handlers via the `FromRequestParts` extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantContext {
    pub tenant_id: String,
}

impl TenantContext {
    pub fn new(tenant_id: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
        }
    }
}

/// Middleware pinning every non-exempt request to a tenant.
///
/// Resolves the tenant once, rewrites the `x-tenant-id` request header to
/// the resolved value, and inserts a [`TenantContext`] extension. Headers
/// only; the body and query string are never touched, and the response
/// does not echo the header.
pub async fn tenant_context_middleware(
    State(resolver): State<TenantResolver>,
    mut request: Request,
    next: Next,
) -> Response {
    if is_exempt_path(request.uri().path()) {
        return next.run(request).await;
    }

    let tenant_id = resolver.resolve(request.headers(), request.uri());

    if let Ok(value) = HeaderValue::from_str(&tenant_id) {
        request.headers_mut().insert(TENANT_HEADER, value);
    }
    request
        .extensions_mut()
        .insert(TenantContext::new(tenant_id));

    next.run(request).await
}

/// Extractor for [`TenantContext`] from request extensions.
///
/// Rejects with an internal error when the extension is missing: that
/// means the handler was mounted outside the tenant middleware, which is
/// a wiring bug rather than a client error.
#[async_trait]
impl<S> FromRequestParts<S> for TenantContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TenantContext>()
            .cloned()
            .ok_or_else(|| {
                AppError::InternalError(anyhow::anyhow!(
                    "Tenant context not found; route is not behind the tenant middleware"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver_with_default(default: Option<&str>) -> TenantResolver {
        TenantResolver::new(TenantResolverConfig {
            default_tenant_id: default.map(|s| s.to_string()),
        })
    }

    fn request_parts(uri: &str, headers: &[(&str, &str)]) -> (HeaderMap, Uri) {
        let mut map = HeaderMap::new();
        for (name, value) in headers {
            map.insert(
                axum::http::HeaderName::try_from(*name).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        (map, uri.parse().unwrap())
    }

    #[test]
    fn header_wins_over_query_and_cookie() {
        let resolver = resolver_with_default(Some("fallback-org"));
        let (headers, uri) = request_parts(
            "/api/patients?tenantId=query-org",
            &[
                (TENANT_HEADER, "header-org"),
                ("cookie", "tenant_id=cookie-org; session=abc"),
            ],
        );
        assert_eq!(resolver.resolve(&headers, &uri), "header-org");
    }

    #[test]
    fn query_parameter_wins_when_no_header() {
        let resolver = resolver_with_default(Some("fallback-org"));
        let (headers, uri) = request_parts(
            "/api/patients?page=2&tenantId=query-org",
            &[("cookie", "tenant_id=cookie-org")],
        );
        assert_eq!(resolver.resolve(&headers, &uri), "query-org");
    }

    #[test]
    fn cookie_wins_when_no_header_or_query() {
        let resolver = resolver_with_default(Some("fallback-org"));
        let (headers, uri) = request_parts(
            "/api/patients",
            &[("cookie", "session=abc; tenant_id=cookie-org")],
        );
        assert_eq!(resolver.resolve(&headers, &uri), "cookie-org");
    }

    #[test]
    fn configured_default_when_no_source_matches() {
        let resolver = resolver_with_default(Some("fallback-org"));
        let (headers, uri) = request_parts("/api/patients", &[]);
        assert_eq!(resolver.resolve(&headers, &uri), "fallback-org");
    }

    #[test]
    fn well_known_fallback_when_nothing_is_configured() {
        let resolver = resolver_with_default(None);
        let (headers, uri) = request_parts("/api/patients", &[]);
        assert_eq!(resolver.resolve(&headers, &uri), FALLBACK_TENANT_ID);
    }

    #[test]
    fn empty_sources_are_skipped() {
        let resolver = resolver_with_default(Some("fallback-org"));
        let (headers, uri) = request_parts(
            "/api/patients?tenantId=",
            &[(TENANT_HEADER, "  "), ("cookie", "tenant_id=")],
        );
        assert_eq!(resolver.resolve(&headers, &uri), "fallback-org");
    }

    #[test]
    fn resolution_is_idempotent_for_an_unchanged_request() {
        let resolver = resolver_with_default(None);
        let (headers, uri) =
            request_parts("/api/patients?tenantId=query-org", &[]);
        let first = resolver.resolve(&headers, &uri);
        let second = resolver.resolve(&headers, &uri);
        assert_eq!(first, second);
    }

    #[test]
    fn exempt_paths_cover_probes_and_static_assets() {
        assert!(is_exempt_path("/health"));
        assert!(is_exempt_path("/metrics"));
        assert!(is_exempt_path("/favicon.ico"));
        assert!(is_exempt_path("/static/app.css"));
        assert!(!is_exempt_path("/api/tenant"));
        assert!(!is_exempt_path("/api/patients"));
    }

    #[test]
    fn tenant_cookie_is_scoped_to_root_path() {
        let cookie = tenant_cookie("tenant-1");
        assert!(cookie.starts_with("tenant_id=tenant-1"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("HttpOnly"));
    }
}
