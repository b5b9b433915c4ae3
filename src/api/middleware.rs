//! API middleware.

use crate::error::ApiError;
use axum::response::{IntoResponse, Response};
use std::any::Any;
use tracing::error;

/// Turns a handler panic into a 500 response with the usual error body.
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };
    error!("Handler panicked: {}", detail);

    ApiError::Internal("request handler panicked".to_string()).into_response()
}
