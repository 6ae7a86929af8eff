use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{PlannerError, Result};
use crate::logic::geo::{distance, polyline_length};
use crate::models::Coordinate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum WaterSourceKind {
    Main,
    Pump,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WaterSource {
    pub position: Coordinate,
    #[serde(rename = "type")]
    pub kind: WaterSourceKind,
}

/// The single trunk line every sub-main branches from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MainPipe {
    pub points: Vec<Coordinate>,
    pub length_meters: f64,
}

impl MainPipe {
    pub fn new(points: Vec<Coordinate>) -> Result<Self> {
        if points.len() < 2 {
            return Err(PlannerError::MainPipeTooShort(points.len()));
        }
        if let Some(bad) = points.iter().find(|p| !p.is_finite()) {
            return Err(PlannerError::NonFiniteCoordinate(*bad));
        }
        let length_meters = polyline_length(&points);
        Ok(Self {
            points,
            length_meters,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PipeKind {
    Submain,
    Lateral,
}

/// One straight segment of the branch network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pipe {
    pub id: String,
    pub start: Coordinate,
    pub end: Coordinate,
    #[serde(rename = "type")]
    pub kind: PipeKind,
    pub length_meters: f64,
    pub zone_id: String,
    pub connected_sprinklers: Vec<String>,
}

impl Pipe {
    pub fn new(
        id: impl Into<String>,
        start: Coordinate,
        end: Coordinate,
        kind: PipeKind,
        zone_id: impl Into<String>,
        connected_sprinklers: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            start,
            end,
            kind,
            length_meters: distance(start, end),
            zone_id: zone_id.into(),
            connected_sprinklers,
        }
    }

    pub fn touches(&self, sprinkler_id: &str) -> bool {
        self.connected_sprinklers.iter().any(|id| id == sprinkler_id)
    }
}
