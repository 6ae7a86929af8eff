use std::collections::{BTreeMap, HashMap};

use actix_web::http::Method;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use utoipa::{IntoParams, ToSchema};

use crate::models::{
    pipe::{MainPipe, Pipe, WaterSource},
    sprinkler::{Sprinkler, SprinklerType},
    statistics::Summary,
    zone::{Zone, ZoneType},
    Coordinate,
};

/// Serde adapter for `actix_web::http::Method` (serialises as its uppercase string).
mod method_serde {
    use actix_web::http::Method;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(method: &Method, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(method.as_str())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Method, D::Error> {
        let s = String::deserialize(d)?;
        Method::from_bytes(s.as_bytes()).map_err(serde::de::Error::custom)
    }
}

/// A single HAL-style hyperlink.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Link {
    pub href: String,
    #[serde(with = "method_serde")]
    #[schema(value_type = String, example = "GET")]
    pub method: Method,
}

/// Map of relation name → link, serialised as the `_links` field in responses.
pub type Links = HashMap<String, Link>;

/// Helper to build a `Link` from an href and an HTTP method.
pub fn link(href: impl Into<String>, method: Method) -> Link {
    Link {
        href: href.into(),
        method,
    }
}

/// Pagination metadata included in responses that return lists.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
}

/// Generic single-item response envelope.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[aliases(
    SprinklerTypeApiResponse = ApiResponse<SprinklerType>,
    ValidateZoneApiResponse = ApiResponse<ValidateZoneResponse>,
    ClipApiResponse = ApiResponse<ClipResponse>,
    PlacementApiResponse = ApiResponse<PlacementResponse>,
    RouteApiResponse = ApiResponse<RouteResponse>,
    StatisticsApiResponse = ApiResponse<Summary>,
    LayoutApiResponse = ApiResponse<LayoutResponse>,
)]
pub struct ApiResponse<T> {
    pub payload: T,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(rename = "_links")]
    #[schema(value_type = Object)]
    pub links: Links,
}

impl<T> ApiResponse<T> {
    pub fn new(payload: T, links: Links) -> Self {
        Self {
            payload,
            errors: vec![],
            links,
        }
    }
}

/// Generic paginated list response envelope.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[aliases(SprinklerTypeListResponse = PaginatedResponse<SprinklerType>)]
pub struct PaginatedResponse<T> {
    pub payload: Vec<T>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(rename = "_links")]
    #[schema(value_type = Object)]
    pub links: Links,
    pub pagination: Pagination,
}

impl<T> PaginatedResponse<T> {
    pub fn new(payload: Vec<T>, links: Links, pagination: Pagination) -> Self {
        Self {
            payload,
            errors: vec![],
            links,
            pagination,
        }
    }
}

/// Body of every 4xx response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SprinklerTypeQuery {
    /// Only list types suited to this zone type.
    pub zone_type: Option<ZoneType>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidateZoneRequest {
    pub coordinates: Vec<Coordinate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidateZoneResponse {
    pub area_m2: f64,
    pub max_area_m2: f64,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClipRequest {
    pub center: Coordinate,
    pub radius_meters: f64,
    pub polygon: Vec<Coordinate>,
    /// Ring discretisation; the server default applies when omitted.
    pub samples: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum ClipKind {
    FullCircle,
    Polygon,
    Empty,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClipResponse {
    pub kind: ClipKind,
    /// Clipped ring; empty unless `kind` is `polygon`.
    pub points: Vec<Coordinate>,
    /// Share of the nominal circle area that stays inside the zone, in `[0, 1]`.
    pub coverage_fraction: f64,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlacementRequest {
    pub zones: Vec<Zone>,
    /// Place a single zone instead of every configured top-level zone.
    pub zone_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlacementResponse {
    pub sprinklers_by_zone: BTreeMap<String, Vec<Sprinkler>>,
    pub total: usize,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteRequest {
    pub main_pipe: Option<Vec<Coordinate>>,
    pub sprinklers: Vec<Sprinkler>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteResponse {
    pub pipes: Vec<Pipe>,
    pub total_length_meters: f64,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsRequest {
    pub zones: Vec<Zone>,
    #[serde(default)]
    pub sprinklers: Vec<Sprinkler>,
    #[serde(default)]
    pub pipes: Vec<Pipe>,
    pub main_pipe: Option<Vec<Coordinate>>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRequest {
    /// Zones in creation order; nested zones must follow their parent.
    pub zones: Vec<Zone>,
    pub main_pipe: Option<Vec<Coordinate>>,
    pub water_source: Option<WaterSource>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResponse {
    pub sprinklers: Vec<Sprinkler>,
    pub pipes: Vec<Pipe>,
    pub main_pipe: Option<MainPipe>,
    pub water_source: Option<WaterSource>,
    pub summary: Summary,
    pub generated_at: DateTime<Utc>,
}
