use std::collections::HashMap;

use actix_web::{http::Method, post, web, HttpResponse, Responder};

use crate::{
    api::handlers::bad_request,
    config::PlannerConfig,
    logic::clipper::{clip_circle_to_polygon, coverage_fraction, ClipResult, MAX_CIRCLE_SAMPLES},
    models::request::{link, ApiResponse, ClipApiResponse, ClipKind, ClipRequest, ClipResponse, ErrorResponse},
};

impl From<&ClipResult> for ClipKind {
    fn from(result: &ClipResult) -> Self {
        match result {
            ClipResult::FullCircle => ClipKind::FullCircle,
            ClipResult::Polygon(_) => ClipKind::Polygon,
            ClipResult::Empty => ClipKind::Empty,
        }
    }
}

/// POST /api/clip
/// Clips a sprinkler's coverage circle to a zone polygon.
#[utoipa::path(
    post,
    path = "/api/clip",
    tag = "geometry",
    request_body = ClipRequest,
    responses(
        (status = 200, description = "Visible part of the circle", body = ClipApiResponse),
        (status = 400, description = "Non-positive radius or sample count out of range", body = ErrorResponse),
    )
)]
#[post("/clip")]
pub async fn post_clip(
    config: web::Data<PlannerConfig>,
    body: web::Json<ClipRequest>,
) -> impl Responder {
    let request = body.into_inner();
    if !request.radius_meters.is_finite() || request.radius_meters <= 0.0 {
        return bad_request("radiusMeters must be strictly positive.");
    }
    let samples = request.samples.unwrap_or(config.clip_samples);
    if !(3..=MAX_CIRCLE_SAMPLES).contains(&samples) {
        return bad_request(format!(
            "samples must be between 3 and {MAX_CIRCLE_SAMPLES}, got {samples}."
        ));
    }

    let result = clip_circle_to_polygon(request.center, request.radius_meters, &request.polygon, samples);
    let coverage_fraction = coverage_fraction(&result, request.radius_meters);
    let kind = ClipKind::from(&result);
    let points = match result {
        ClipResult::Polygon(points) => points,
        ClipResult::FullCircle | ClipResult::Empty => Vec::new(),
    };

    let mut links = HashMap::new();
    links.insert("self".into(), link("/api/clip", Method::POST));
    HttpResponse::Ok().json(ApiResponse::new(
        ClipResponse { kind, points, coverage_fraction },
        links,
    ))
}
