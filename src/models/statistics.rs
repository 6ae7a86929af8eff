use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use utoipa::ToSchema;

use crate::models::zone::ZoneType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ZoneStatistics {
    pub zone_id: String,
    pub zone_type: ZoneType,
    pub area_m2: f64,
    pub sprinkler_count: usize,
    pub nested: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LongestPipe {
    pub id: String,
    pub length_meters: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PipeLengths {
    pub main_meters: f64,
    pub submain_meters: f64,
    pub lateral_meters: f64,
    pub total_meters: f64,
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub zones: Vec<ZoneStatistics>,
    pub total_zone_area_m2: f64,
    /// Top-level, non-forbidden area minus nested sub-zones.
    pub usable_area_m2: f64,
    pub sprinkler_count: usize,
    pub unassigned_sprinkler_count: usize,
    pub submain_count: usize,
    pub lateral_count: usize,
    pub pipe_lengths: PipeLengths,
    pub longest_submain: Option<LongestPipe>,
    pub longest_lateral: Option<LongestPipe>,
    /// Upper-bound estimate in `[0, 100]`; overlap and clipping are ignored.
    pub coverage_percentage: f64,
}
