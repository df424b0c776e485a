//! API request handlers

pub mod players;
pub mod teams;

use axum::{
    http::HeaderName,
    response::{IntoResponse, Response},
    Json,
};
use league_core::Page;
use serde::Serialize;

pub const TOTAL_COUNT_HEADER: HeaderName = HeaderName::from_static("x-total-count");

/// Page content as the body, total in `X-Total-Count`
pub(crate) fn paged_response<T: Serialize>(page: Page<T>) -> Response {
    (
        [(TOTAL_COUNT_HEADER, page.total_elements.to_string())],
        Json(page.content),
    )
        .into_response()
}
