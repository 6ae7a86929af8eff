use std::collections::{BTreeMap, HashMap};

use actix_web::{http::Method, post, web, HttpResponse, Responder};
use chrono::Utc;
use log::info;

use crate::{
    api::handlers::bad_request,
    config::PlannerConfig,
    error::{PlannerError, Result},
    logic::{
        placer::{auto_place_all, auto_place_zone, avoidance_zones},
        router::{group_by_zone, route_network},
        validation::validate_zone_polygon,
    },
    models::{
        pipe::MainPipe,
        project::Project,
        request::{
            link, ApiResponse, ErrorResponse, LayoutApiResponse, LayoutRequest, LayoutResponse,
            PlacementApiResponse, PlacementRequest, PlacementResponse, RouteApiResponse,
            RouteRequest, RouteResponse, ValidateZoneApiResponse, ValidateZoneRequest,
            ValidateZoneResponse,
        },
    },
};

/// POST /api/zones/validate
/// Checks a drawn outline against the vertex and maximum-area rules.
#[utoipa::path(
    post,
    path = "/api/zones/validate",
    tag = "plan",
    request_body = ValidateZoneRequest,
    responses(
        (status = 200, description = "Outline accepted", body = ValidateZoneApiResponse),
        (status = 400, description = "Degenerate or oversized outline", body = ErrorResponse),
    )
)]
#[post("/zones/validate")]
pub async fn post_validate_zone(
    config: web::Data<PlannerConfig>,
    body: web::Json<ValidateZoneRequest>,
) -> impl Responder {
    match validate_zone_polygon(&body.coordinates, config.max_zone_area_m2) {
        Ok(area_m2) => {
            let mut links = HashMap::new();
            links.insert("self".into(), link("/api/zones/validate", Method::POST));
            HttpResponse::Ok().json(ApiResponse::new(
                ValidateZoneResponse {
                    area_m2,
                    max_area_m2: config.max_zone_area_m2,
                },
                links,
            ))
        }
        Err(e) => bad_request(e),
    }
}

/// POST /api/placement
/// Auto-places sprinklers in every configured zone, or in `zoneId` only.
#[utoipa::path(
    post,
    path = "/api/placement",
    tag = "plan",
    request_body = PlacementRequest,
    responses(
        (status = 200, description = "Sprinklers grouped by zone", body = PlacementApiResponse),
        (status = 400, description = "Unknown zone id", body = ErrorResponse),
    )
)]
#[post("/placement")]
pub async fn post_placement(body: web::Json<PlacementRequest>) -> impl Responder {
    let request = body.into_inner();

    let sprinklers_by_zone = match request.zone_id.as_deref() {
        None => auto_place_all(&request.zones),
        Some(zone_id) => {
            let Some(zone) = request.zones.iter().find(|z| z.id == zone_id) else {
                return bad_request(PlannerError::UnknownZone(zone_id.to_string()));
            };
            let avoidance = avoidance_zones(zone, &request.zones);
            BTreeMap::from([(zone.id.clone(), auto_place_zone(zone, &avoidance))])
        }
    };
    let total = sprinklers_by_zone.values().map(Vec::len).sum();

    let mut links = HashMap::new();
    links.insert("self".into(), link("/api/placement", Method::POST));
    links.insert("route".into(), link("/api/route", Method::POST));
    HttpResponse::Ok().json(ApiResponse::new(
        PlacementResponse { sprinklers_by_zone, total },
        links,
    ))
}

/// POST /api/route
/// Builds sub-main and lateral pipes from the main pipe to every zone's sprinklers.
#[utoipa::path(
    post,
    path = "/api/route",
    tag = "plan",
    request_body = RouteRequest,
    responses(
        (status = 200, description = "Generated pipe network", body = RouteApiResponse),
        (status = 400, description = "Main pipe with fewer than two points", body = ErrorResponse),
    )
)]
#[post("/route")]
pub async fn post_route(body: web::Json<RouteRequest>) -> impl Responder {
    let request = body.into_inner();
    let main_pipe = match request.main_pipe.map(MainPipe::new).transpose() {
        Ok(main_pipe) => main_pipe,
        Err(e) => return bad_request(e),
    };

    let pipes = route_network(main_pipe.as_ref(), &group_by_zone(&request.sprinklers));
    let total_length_meters = pipes.iter().map(|p| p.length_meters).sum();

    let mut links = HashMap::new();
    links.insert("self".into(), link("/api/route", Method::POST));
    links.insert("statistics".into(), link("/api/statistics", Method::POST));
    HttpResponse::Ok().json(ApiResponse::new(
        RouteResponse { pipes, total_length_meters },
        links,
    ))
}

/// POST /api/layout
/// Builds a whole project: validated zones, auto-placement, routing and summary.
#[utoipa::path(
    post,
    path = "/api/layout",
    tag = "plan",
    request_body = LayoutRequest,
    responses(
        (status = 200, description = "Complete irrigation layout", body = LayoutApiResponse),
        (status = 400, description = "A zone or the main pipe was rejected", body = ErrorResponse),
    )
)]
#[post("/layout")]
pub async fn post_layout(
    config: web::Data<PlannerConfig>,
    body: web::Json<LayoutRequest>,
) -> impl Responder {
    let project = match build_project(body.into_inner(), config.max_zone_area_m2) {
        Ok(project) => project.auto_place_all(),
        Err(e) => return bad_request(e),
    };
    let summary = project.statistics();
    info!(
        "Layout generated: {} sprinklers, {} pipes, {:.1}% coverage",
        summary.sprinkler_count,
        project.pipes().len(),
        summary.coverage_percentage
    );

    let mut links = HashMap::new();
    links.insert("self".into(), link("/api/layout", Method::POST));
    links.insert("sprinklerTypes".into(), link("/api/sprinkler-types", Method::GET));
    HttpResponse::Ok().json(ApiResponse::new(
        LayoutResponse {
            sprinklers: project.sprinklers().to_vec(),
            pipes: project.pipes().to_vec(),
            main_pipe: project.main_pipe().cloned(),
            water_source: project.water_source().cloned(),
            summary,
            generated_at: Utc::now(),
        },
        links,
    ))
}

fn build_project(request: LayoutRequest, max_zone_area_m2: f64) -> Result<Project> {
    let mut project = Project::new(max_zone_area_m2);
    for zone in request.zones {
        project = project.add_zone(zone)?;
    }
    if let Some(water_source) = request.water_source {
        project = project.set_water_source(water_source);
    }
    if let Some(points) = request.main_pipe {
        project = project.set_main_pipe(points)?;
    }
    Ok(project)
}
