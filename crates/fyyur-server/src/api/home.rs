use axum::response::{IntoResponse, Response};
use std::any::Any;

use crate::flash::Flashes;
use crate::page::Page;

/// GET /
pub async fn index(flashes: Flashes) -> Response {
    Page::home(flashes).into_response()
}

/// Fallback for unmatched routes.
pub async fn not_found() -> Response {
    Page::not_found().into_response()
}

/// Panic hook for the catch-panic layer.
pub fn server_error(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!("handler panicked: {detail}");
    Page::server_error().into_response()
}
