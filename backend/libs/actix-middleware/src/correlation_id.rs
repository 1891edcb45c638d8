//! Request correlation middleware
//!
//! Reads a caller supplied identifier from the `request_id` query parameter and
//! threads it through the lifetime of one inbound request:
//! - request extensions, as a [`CorrelationContext`] handlers can extract
//! - the `X-Request-ID` response header
//! - every log line, via the `request` tracing span
//!
//! Downstream clients are expected to forward [`CorrelationContext::request_id`]
//! as the `request_id` query parameter of each outgoing call.
//!
//! ## Design
//! - If the query string carries a well formed `request_id`: use it
//! - Otherwise: generate `req-<unix nanos>`, unique per process
//!
//! ## Example
//! ```rust
//! use actix_middleware::{CorrelationContext, CorrelationIdMiddleware};
//! use actix_web::{web, App, HttpResponse};
//!
//! async fn handler(ctx: CorrelationContext) -> HttpResponse {
//!     HttpResponse::Ok().body(ctx.request_id().to_string())
//! }
//!
//! let app = App::new()
//!     .wrap(CorrelationIdMiddleware)
//!     .route("/", web::get().to(handler));
//! ```

use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderName, HeaderValue},
    web, Error, FromRequest, HttpMessage, HttpRequest,
};
use futures::future::LocalBoxFuture;
use serde::Deserialize;
use std::future::{ready, Ready};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tracing::Instrument;

/// Query parameter carrying the correlation identifier, inbound and outbound
pub const REQUEST_ID_PARAM: &str = "request_id";

/// Response header echoing the correlation identifier
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Caller supplied identifiers shorter than this are replaced
pub const MIN_REQUEST_ID_LEN: usize = 6;

const MAX_REQUEST_ID_LEN: usize = 128;

static LAST_GENERATED: AtomicU64 = AtomicU64::new(0);

/// Per-request correlation data. Cheap to clone into fan-out tasks.
#[derive(Debug, Clone)]
pub struct CorrelationContext {
    request_id: Arc<str>,
    started_at: Instant,
}

impl CorrelationContext {
    pub fn new(request_id: impl Into<Arc<str>>) -> Self {
        Self {
            request_id: request_id.into(),
            started_at: Instant::now(),
        }
    }

    /// Context with a freshly generated identifier
    pub fn generated() -> Self {
        Self::new(generate_request_id())
    }

    /// Use `candidate` if it is well formed, otherwise generate a new identifier
    pub fn from_candidate(candidate: Option<&str>) -> Self {
        match candidate {
            Some(id) if is_valid_request_id(id) => Self::new(id),
            _ => Self::generated(),
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

/// Generate a `req-<nanos>` identifier.
///
/// Two calls never return the same value within a process, even when the clock
/// does not advance between them.
pub fn generate_request_id() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();

    let previous = LAST_GENERATED
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(now.max(last + 1))
        })
        .unwrap_or_else(|last| last);

    format!("req-{}", now.max(previous + 1))
}

fn is_valid_request_id(id: &str) -> bool {
    (MIN_REQUEST_ID_LEN..=MAX_REQUEST_ID_LEN).contains(&id.len())
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

#[derive(Deserialize)]
struct RequestIdQuery {
    request_id: Option<String>,
}

fn request_id_from_query(query: &str) -> Option<String> {
    web::Query::<RequestIdQuery>::from_query(query)
        .ok()
        .and_then(|q| q.into_inner().request_id)
}

/// Middleware that establishes the [`CorrelationContext`] for each request
#[derive(Clone)]
pub struct CorrelationIdMiddleware;

impl<S, B> Transform<S, ServiceRequest> for CorrelationIdMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = CorrelationIdMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CorrelationIdMiddlewareService { service }))
    }
}

pub struct CorrelationIdMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for CorrelationIdMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let candidate = request_id_from_query(req.query_string());
        let ctx = CorrelationContext::from_candidate(candidate.as_deref());
        let request_id = ctx.request_id.clone();

        let span = tracing::info_span!(
            "request",
            request_id = %request_id,
            method = %req.method(),
            path = %req.path(),
        );

        req.extensions_mut().insert(ctx);

        let fut = span.in_scope(|| self.service.call(req));

        Box::pin(
            async move {
                let mut res = fut.await?;
                if let Ok(value) = HeaderValue::from_str(&request_id) {
                    res.headers_mut()
                        .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
                }
                Ok(res)
            }
            .instrument(span),
        )
    }
}

/// Correlation context of the current request.
///
/// Falls back to a generated context when the middleware is not installed.
pub fn correlation_context(req: &HttpRequest) -> CorrelationContext {
    req.extensions()
        .get::<CorrelationContext>()
        .cloned()
        .unwrap_or_else(CorrelationContext::generated)
}

impl FromRequest for CorrelationContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Ok(correlation_context(req)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique_and_prefixed() {
        let ids: Vec<String> = (0..1000).map(|_| generate_request_id()).collect();
        let mut unique = ids.clone();
        unique.sort();
        unique.dedup();

        assert_eq!(unique.len(), ids.len());
        assert!(ids.iter().all(|id| id.starts_with("req-")));
        assert!(ids.iter().all(|id| id.len() >= MIN_REQUEST_ID_LEN));
    }

    #[test]
    fn test_request_id_validation() {
        assert!(is_valid_request_id("abcdef"));
        assert!(is_valid_request_id("req-1700000000.001_x"));
        assert!(!is_valid_request_id("abc"));
        assert!(!is_valid_request_id(""));
        assert!(!is_valid_request_id("has space"));
        assert!(!is_valid_request_id("new\nline-injected"));
        assert!(!is_valid_request_id(&"a".repeat(MAX_REQUEST_ID_LEN + 1)));
    }

    #[test]
    fn test_query_extraction() {
        assert_eq!(
            request_id_from_query("s=rust&request_id=trace-42&page=2"),
            Some("trace-42".to_string())
        );
        assert_eq!(request_id_from_query("s=rust"), None);
        assert_eq!(request_id_from_query(""), None);
    }
}

#[cfg(test)]
mod http_tests {
    use super::*;
    use actix_web::{test, App, HttpResponse};

    async fn echo(ctx: CorrelationContext) -> HttpResponse {
        HttpResponse::Ok().body(ctx.request_id().to_string())
    }

    #[actix_web::test]
    async fn test_supplied_request_id_is_propagated() {
        let app = test::init_service(
            App::new()
                .wrap(CorrelationIdMiddleware)
                .route("/echo", web::get().to(echo)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/echo?request_id=client-abc123")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(
            resp.headers().get(REQUEST_ID_HEADER).unwrap(),
            "client-abc123"
        );
        let body = test::read_body(resp).await;
        assert_eq!(body, "client-abc123");
    }

    #[actix_web::test]
    async fn test_short_or_missing_request_id_is_replaced() {
        let app = test::init_service(
            App::new()
                .wrap(CorrelationIdMiddleware)
                .route("/echo", web::get().to(echo)),
        )
        .await;

        for uri in ["/echo?request_id=abc", "/echo"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;

            let header = resp
                .headers()
                .get(REQUEST_ID_HEADER)
                .unwrap()
                .to_str()
                .unwrap()
                .to_string();
            assert!(header.starts_with("req-"), "unexpected id {}", header);

            let body = test::read_body(resp).await;
            assert_eq!(body, header.as_bytes());
        }
    }

    #[actix_web::test]
    async fn test_header_set_on_error_responses() {
        let app = test::init_service(App::new().wrap(CorrelationIdMiddleware)).await;

        let req = test::TestRequest::get()
            .uri("/missing?request_id=lost-request")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 404);
        assert_eq!(resp.headers().get(REQUEST_ID_HEADER).unwrap(), "lost-request");
    }

    #[actix_web::test]
    async fn test_extractor_without_middleware_generates() {
        let req = test::TestRequest::get().to_http_request();
        let ctx = correlation_context(&req);
        assert!(ctx.request_id().starts_with("req-"));
    }
}
