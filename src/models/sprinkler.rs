use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use utoipa::ToSchema;

use crate::models::{zone::ZoneType, Coordinate};

/// Zone id given to manually placed sprinklers that fall outside every zone.
pub const UNASSIGNED_ZONE_ID: &str = "unassigned";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SprinklerType {
    pub id: String,
    pub name: String,
    pub description: String,
    pub default_radius_meters: f64,
    pub compatible_zone_types: Vec<ZoneType>,
    /// Display colour as a CSS hex string.
    pub color: String,
}

impl SprinklerType {
    pub fn is_compatible_with(&self, zone_type: ZoneType) -> bool {
        self.compatible_zone_types.contains(&zone_type)
    }
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sprinkler {
    pub id: String,
    pub position: Coordinate,
    pub sprinkler_type_id: String,
    /// Effective throw radius after any zone override.
    pub radius_meters: f64,
    pub zone_id: String,
    /// Display rotation in degrees; never used by geometry.
    pub orientation: Option<f64>,
}

impl Sprinkler {
    #[inline]
    pub fn is_unassigned(&self) -> bool {
        self.zone_id == UNASSIGNED_ZONE_ID
    }

    /// Nominal coverage `π·r²`, ignoring overlap and zone clipping.
    #[inline]
    pub fn coverage_area_m2(&self) -> f64 {
        PI * self.radius_meters * self.radius_meters
    }
}
