//! Logging middleware
//!
//! Emits one structured `HTTP request completed` event per request carrying the
//! correlation identifier, method, path, status and duration.

use crate::correlation_id::CorrelationContext;
use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::time::Instant;

/// Middleware that logs HTTP requests and responses
#[derive(Clone, Default)]
pub struct Logging;

impl<S, B> Transform<S, ServiceRequest> for Logging
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = LoggingService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(LoggingService { service }))
    }
}

pub struct LoggingService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for LoggingService<S>
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
        // Duration counts from when the correlation context was created
        let (request_id, start) = match req.extensions().get::<CorrelationContext>() {
            Some(ctx) => (ctx.request_id().to_string(), ctx.started_at()),
            None => (String::new(), Instant::now()),
        };
        let method = req.method().clone();
        let path = req.path().to_string();

        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await;
            let elapsed = start.elapsed();

            match &res {
                Ok(res) => {
                    let status = res.status();
                    if status.is_server_error() {
                        tracing::error!(
                            request_id = %request_id,
                            method = %method,
                            path = %path,
                            status = status.as_u16(),
                            duration_ms = elapsed.as_millis() as u64,
                            "HTTP request completed"
                        );
                    } else {
                        tracing::info!(
                            request_id = %request_id,
                            method = %method,
                            path = %path,
                            status = status.as_u16(),
                            duration_ms = elapsed.as_millis() as u64,
                            "HTTP request completed"
                        );
                    }
                }
                Err(err) => {
                    tracing::error!(
                        request_id = %request_id,
                        method = %method,
                        path = %path,
                        status = err.as_response_error().status_code().as_u16(),
                        duration_ms = elapsed.as_millis() as u64,
                        error = %err,
                        "HTTP request completed"
                    );
                }
            }

            res
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correlation_id::{CorrelationIdMiddleware, REQUEST_ID_HEADER};
    use actix_web::{test, web, App, HttpResponse};

    #[actix_web::test]
    async fn test_logging_passes_response_through() {
        let app = test::init_service(
            App::new()
                .wrap(Logging)
                .wrap(CorrelationIdMiddleware)
                .route("/ok", web::get().to(|| async { HttpResponse::Ok().body("fine") }))
                .route(
                    "/fail",
                    web::get().to(|| async { HttpResponse::ServiceUnavailable().finish() }),
                ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/ok?request_id=logging-test")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers().get(REQUEST_ID_HEADER).unwrap(), "logging-test");
        assert_eq!(test::read_body(resp).await, "fine");

        let req = test::TestRequest::get().uri("/fail").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 503);
    }
}
