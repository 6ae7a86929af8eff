use utoipa::OpenApi;

use crate::models::{
    pipe::{MainPipe, Pipe, PipeKind, WaterSource, WaterSourceKind},
    request::{
        ClipApiResponse, ClipKind, ClipRequest, ClipResponse, ErrorResponse, LayoutApiResponse,
        LayoutRequest, LayoutResponse, Link, Pagination, PlacementApiResponse, PlacementRequest,
        PlacementResponse, RouteApiResponse, RouteRequest, RouteResponse, SprinklerTypeApiResponse,
        SprinklerTypeListResponse, StatisticsApiResponse, StatisticsRequest,
        ValidateZoneApiResponse, ValidateZoneRequest, ValidateZoneResponse,
    },
    sprinkler::{Sprinkler, SprinklerType},
    statistics::{LongestPipe, PipeLengths, Summary, ZoneStatistics},
    zone::{SprinklerConfig, Zone, ZoneType},
    Coordinate,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Irrigation Planner API",
        description = "Garden irrigation planner: clip sprinkler coverage to zones, auto-place sprinklers on rotated grids, route sub-main and lateral pipes from a main line and summarise coverage.",
        version = "1.0.0",
        license(name = "MIT"),
    ),
    paths(
        crate::api::handlers::sprinkler_types::list_sprinkler_types,
        crate::api::handlers::sprinkler_types::get_sprinkler_type,
        crate::api::handlers::plan::post_validate_zone,
        crate::api::handlers::clip::post_clip,
        crate::api::handlers::plan::post_placement,
        crate::api::handlers::plan::post_route,
        crate::api::handlers::statistics::post_statistics,
        crate::api::handlers::plan::post_layout,
    ),
    components(
        schemas(
            // Enums
            ZoneType, PipeKind, WaterSourceKind, ClipKind,
            // Domain
            Coordinate, SprinklerConfig, Zone, SprinklerType, Sprinkler, WaterSource, MainPipe, Pipe,
            ZoneStatistics, LongestPipe, PipeLengths, Summary,
            // Requests
            ValidateZoneRequest, ClipRequest, PlacementRequest, RouteRequest, StatisticsRequest,
            LayoutRequest,
            // Responses
            ValidateZoneResponse, ClipResponse, PlacementResponse, RouteResponse, LayoutResponse,
            // Shared
            Link, Pagination, ErrorResponse,
            // Concrete response envelopes (via #[aliases])
            SprinklerTypeApiResponse,
            SprinklerTypeListResponse,
            ValidateZoneApiResponse,
            ClipApiResponse,
            PlacementApiResponse,
            RouteApiResponse,
            StatisticsApiResponse,
            LayoutApiResponse,
        )
    ),
    tags(
        (name = "sprinkler-types", description = "Sprinkler catalogue: list and detail"),
        (name = "geometry",        description = "Circle-to-zone clipping"),
        (name = "plan",            description = "Zone validation, placement, routing and full layouts"),
        (name = "statistics",      description = "Area, pipe length and coverage summary"),
    )
)]
pub struct ApiDoc;
