use std::future::Future;
use std::ops::{Deref, DerefMut};
use std::pin::Pin;

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use serde_json::error::Category;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::trace_ctx;

/// JSON request body for course writes.
///
/// A body that cannot be read or decoded into `T` is rejected with a 400
/// `BAD_REQUEST` problem-details response. The detail never echoes the body.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T> ValidatedJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> DerefMut for ValidatedJson<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

impl<T> FromRequest for ValidatedJson<T>
where
    T: DeserializeOwned + 'static,
{
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, AppError>>>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let payload = payload.take();
        let content_type = req
            .headers()
            .get("content-type")
            .and_then(|ct| ct.to_str().ok())
            .unwrap_or_default()
            .to_owned();

        Box::pin(async move {
            let body = collect_body(payload).await?;
            decode_body(&body, &content_type).map(ValidatedJson)
        })
    }
}

async fn collect_body(mut payload: Payload) -> Result<Bytes, AppError> {
    let mut buf = BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| {
            warn!(trace_id = %trace_ctx::trace_id(), error = %e, "Request body read failed");
            AppError::bad_request(ErrorCode::BadRequest, "Failed to read request body")
        })?;
        buf.extend_from_slice(&chunk);
    }
    Ok(buf.freeze())
}

fn decode_body<T: DeserializeOwned>(body: &[u8], content_type: &str) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        debug!(
            trace_id = %trace_ctx::trace_id(),
            error = %e,
            content_type,
            body_size = body.len(),
            "Request body is not a valid course payload"
        );
        AppError::bad_request(ErrorCode::BadRequest, json_error_detail(&e))
    })
}

/// Client-facing description of a decode failure.
fn json_error_detail(error: &serde_json::Error) -> String {
    match error.classify() {
        Category::Syntax => format!("Invalid JSON at line {}", error.line()),
        Category::Eof => "Invalid JSON: unexpected end of input".into(),
        Category::Data => "Invalid JSON: wrong types for one or more fields".into(),
        Category::Io => "Invalid JSON: body could not be read".into(),
    }
}
