use actix_web::HttpResponse;
use log::warn;

use crate::models::request::ErrorResponse;

pub mod clip;
pub mod plan;
pub mod sprinkler_types;
pub mod statistics;

/// 400 with an `{"error": ...}` body.
pub(crate) fn bad_request(err: impl std::fmt::Display) -> HttpResponse {
    let error = err.to_string();
    warn!("Rejected request: {error}");
    HttpResponse::BadRequest().json(ErrorResponse { error })
}
