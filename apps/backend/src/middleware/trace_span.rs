//! Wraps each request in a `request` span so handler, service and repo events
//! carry the request's trace id.
//!
//! Reads the [`TraceId`] set by `RequestTrace`, which therefore has to be the
//! outermost `wrap` call.

use std::future::{ready, Ready};

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpMessage};
use futures_util::future::LocalBoxFuture;
use tracing::{info_span, Instrument, Span};

use super::request_trace::TraceId;

#[derive(Clone, Default)]
pub struct TraceSpan;

impl<S, B> Transform<S, ServiceRequest> for TraceSpan
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceSpanMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceSpanMiddleware { service }))
    }
}

pub struct TraceSpanMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for TraceSpanMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let span = match req.extensions().get::<TraceId>() {
            Some(TraceId(id)) => request_span(&req, id),
            None => request_span(&req, "missing-trace-id"),
        };
        Box::pin(self.service.call(req).instrument(span))
    }
}

fn request_span(req: &ServiceRequest, trace_id: &str) -> Span {
    info_span!(
        "request",
        trace_id = %trace_id,
        http.method = %req.method(),
        url.path = %req.path()
    )
}
