use std::collections::HashMap;

use actix_web::{http::Method, post, web, HttpResponse, Responder};

use crate::{
    api::handlers::bad_request,
    logic::statistics::compute_statistics,
    models::{
        pipe::MainPipe,
        request::{link, ApiResponse, ErrorResponse, StatisticsApiResponse, StatisticsRequest},
    },
};

/// POST /api/statistics
/// Summarises areas, pipe lengths and coverage for the posted collections.
#[utoipa::path(
    post,
    path = "/api/statistics",
    tag = "statistics",
    request_body = StatisticsRequest,
    responses(
        (status = 200, description = "Project summary", body = StatisticsApiResponse),
        (status = 400, description = "Main pipe with fewer than two points", body = ErrorResponse),
    )
)]
#[post("/statistics")]
pub async fn post_statistics(body: web::Json<StatisticsRequest>) -> impl Responder {
    let request = body.into_inner();
    let main_pipe = match request.main_pipe.map(MainPipe::new).transpose() {
        Ok(main_pipe) => main_pipe,
        Err(e) => return bad_request(e),
    };

    let summary = compute_statistics(
        &request.zones,
        &request.sprinklers,
        &request.pipes,
        main_pipe.as_ref(),
    );

    let mut links = HashMap::new();
    links.insert("self".into(), link("/api/statistics", Method::POST));
    HttpResponse::Ok().json(ApiResponse::new(summary, links))
}
