use std::collections::HashMap;

use actix_web::{get, http::Method, web, HttpResponse, Responder};

use crate::{
    data::sprinkler_types::{
        compatible_types, default_type_for, get_all_sprinkler_types, get_sprinkler_type_by_id,
    },
    models::request::{
        link, ApiResponse, ErrorResponse, Pagination, PaginatedResponse, SprinklerTypeApiResponse,
        SprinklerTypeListResponse, SprinklerTypeQuery,
    },
};

/// GET /api/sprinkler-types
/// Returns the sprinkler catalogue, optionally narrowed to one zone type.
#[utoipa::path(
    get,
    path = "/api/sprinkler-types",
    tag = "sprinkler-types",
    params(SprinklerTypeQuery),
    responses(
        (status = 200, description = "Sprinkler catalogue", body = SprinklerTypeListResponse),
        (status = 400, description = "Unknown zone type", body = ErrorResponse),
    )
)]
#[get("/sprinkler-types")]
pub async fn list_sprinkler_types(query: web::Query<SprinklerTypeQuery>) -> impl Responder {
    let zone_type = query.into_inner().zone_type;
    let types = match zone_type {
        Some(zone_type) => compatible_types(zone_type),
        None => get_all_sprinkler_types(),
    };
    let total = types.len();

    let mut links = HashMap::new();
    links.insert("self".into(), link("/api/sprinkler-types", Method::GET));
    if let Some(default) = zone_type.and_then(default_type_for) {
        links.insert(
            "default".into(),
            link(format!("/api/sprinkler-types/{}", default.id), Method::GET),
        );
    }
    HttpResponse::Ok().json(PaginatedResponse::new(
        types,
        links,
        Pagination { page: 1, per_page: total, total, total_pages: 1 },
    ))
}

/// GET /api/sprinkler-types/{id}
/// Returns a single sprinkler type by id.
#[utoipa::path(
    get,
    path = "/api/sprinkler-types/{id}",
    tag = "sprinkler-types",
    params(("id" = String, Path, description = "Sprinkler type id, e.g. `rotor`")),
    responses(
        (status = 200, description = "Sprinkler type", body = SprinklerTypeApiResponse),
        (status = 404, description = "No such type", body = ErrorResponse),
    )
)]
#[get("/sprinkler-types/{id}")]
pub async fn get_sprinkler_type(path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    match get_sprinkler_type_by_id(&id) {
        None => HttpResponse::NotFound().json(ErrorResponse {
            error: format!("Sprinkler type '{id}' not found."),
        }),
        Some(sprinkler_type) => {
            let mut links = HashMap::new();
            links.insert("self".into(), link(format!("/api/sprinkler-types/{id}"), Method::GET));
            links.insert("collection".into(), link("/api/sprinkler-types", Method::GET));
            HttpResponse::Ok().json(ApiResponse::new(sprinkler_type, links))
        }
    }
}
