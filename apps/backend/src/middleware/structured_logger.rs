use std::future::{ready, Ready};
use std::time::Instant;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::StatusCode;
use actix_web::{Error as ActixError, HttpMessage};
use futures_util::future::LocalBoxFuture;
use tracing::{error, info, warn};

use super::request_trace::TraceId;

/// Emits a `request_completed` event for every request.
///
/// Carries the matched route pattern (e.g. `/api/v1/courses/{course_id}`) rather
/// than the raw path, so course ids do not fan out log cardinality.
pub struct StructuredLogger;

impl<S, B> Transform<S, ServiceRequest> for StructuredLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type InitError = ();
    type Transform = StructuredLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(StructuredLoggerMiddleware { service }))
    }
}

pub struct StructuredLoggerMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for StructuredLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let started = Instant::now();
        let line = CompletionLine {
            method: req.method().to_string(),
            route: req
                .match_pattern()
                .unwrap_or_else(|| req.path().to_string()),
            trace_id: req
                .extensions()
                .get::<TraceId>()
                .map(|t| t.0.clone())
                .unwrap_or_else(|| "unknown".to_string()),
        };

        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;
            let status = match &result {
                Ok(res) => res.status(),
                Err(err) => err.as_response_error().status_code(),
            };
            line.emit(status, started.elapsed().as_millis() as u64);
            result
        })
    }
}

/// Request fields captured before the inner service consumes the request.
struct CompletionLine {
    method: String,
    route: String,
    trace_id: String,
}

impl CompletionLine {
    fn emit(&self, status: StatusCode, duration_ms: u64) {
        let code = status.as_u16();
        let (method, route, trace_id) = (&self.method, &self.route, &self.trace_id);
        match status.as_u16() {
            500..=599 => {
                error!(http.method = %method, http.route = %route, http.status_code = code, duration_ms, trace_id = %trace_id, "request_completed")
            }
            400..=499 => {
                warn!(http.method = %method, http.route = %route, http.status_code = code, duration_ms, trace_id = %trace_id, "request_completed")
            }
            _ => {
                info!(http.method = %method, http.route = %route, http.status_code = code, duration_ms, trace_id = %trace_id, "request_completed")
            }
        }
    }
}
