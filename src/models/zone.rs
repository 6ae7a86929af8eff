use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use utoipa::ToSchema;

use crate::models::Coordinate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ZoneType {
    Grass,
    Flowers,
    Trees,
    /// Nothing may be placed inside; acts purely as an avoidance region.
    Forbidden,
}

/// Which sprinkler a zone is auto-populated with, and at what throw radius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SprinklerConfig {
    pub sprinkler_type_id: String,
    /// Overrides the catalog default when strictly positive.
    pub radius_meters: f64,
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub id: String,
    #[serde(rename = "type")]
    pub zone_type: ZoneType,
    /// Simple polygon, implicitly closed (last vertex connects to the first).
    pub coordinates: Vec<Coordinate>,
    /// Set when this zone is nested inside a grass zone.
    pub parent_zone_id: Option<String>,
    pub sprinkler_config: Option<SprinklerConfig>,
}

impl Zone {
    pub fn new(id: impl Into<String>, zone_type: ZoneType, coordinates: Vec<Coordinate>) -> Self {
        Self {
            id: id.into(),
            zone_type,
            coordinates,
            parent_zone_id: None,
            sprinkler_config: None,
        }
    }

    pub fn with_parent(mut self, parent_zone_id: impl Into<String>) -> Self {
        self.parent_zone_id = Some(parent_zone_id.into());
        self
    }

    pub fn with_sprinkler_config(
        mut self,
        sprinkler_type_id: impl Into<String>,
        radius_meters: f64,
    ) -> Self {
        self.sprinkler_config = Some(SprinklerConfig {
            sprinkler_type_id: sprinkler_type_id.into(),
            radius_meters,
        });
        self
    }

    #[inline]
    pub fn is_top_level(&self) -> bool {
        self.parent_zone_id.is_none()
    }

    #[inline]
    pub fn is_forbidden(&self) -> bool {
        self.zone_type == ZoneType::Forbidden
    }

    /// Top-level, non-forbidden and configured: the zones auto-place-all fills.
    pub fn is_placement_target(&self) -> bool {
        self.is_top_level() && !self.is_forbidden() && self.sprinkler_config.is_some()
    }
}
