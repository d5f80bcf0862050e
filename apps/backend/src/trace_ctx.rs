//! Task-local trace id for the request being handled.
//!
//! `RequestTrace` establishes the scope; error responses and log lines read it
//! back through [`trace_id`]. Service and repo code should not depend on it.

use tokio::task_local;

task_local! {
    static TRACE_ID: String;
}

/// Trace id for the current task, or `"unknown"` outside a request scope.
pub fn trace_id() -> String {
    TRACE_ID
        .try_with(|id| id.clone())
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Run `future` with `trace_id` as the task's trace id.
pub async fn with_trace_id<F, R>(trace_id: String, future: F) -> R
where
    F: std::future::Future<Output = R>,
{
    TRACE_ID.scope(trace_id, future).await
}
