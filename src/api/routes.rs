use actix_web::{error::InternalError, web, HttpResponse};

use crate::{
    api::handlers::{
        clip::post_clip,
        plan::{post_layout, post_placement, post_route, post_validate_zone},
        sprinkler_types::{get_sprinkler_type, list_sprinkler_types},
        statistics::post_statistics,
    },
    models::request::ErrorResponse,
};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(list_sprinkler_types)
            .service(get_sprinkler_type)
            .service(post_validate_zone)
            .service(post_clip)
            .service(post_placement)
            .service(post_route)
            .service(post_statistics)
            .service(post_layout),
    );
}

/// Turns body deserialization failures into `400 {"error": ...}`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let error = format!("JSON deserialization error: {err}");
        InternalError::from_response(err, HttpResponse::BadRequest().json(ErrorResponse { error }))
            .into()
    })
}
