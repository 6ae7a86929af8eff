use thiserror::Error;

use crate::models::{zone::ZoneType, Coordinate};

/// Rejections raised at the project-editing boundary.
///
/// Geometry itself never fails: degenerate input degrades to empty results.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlannerError {
    #[error("Zone polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),

    #[error("Coordinate {0:?} is not a finite lat/lng pair")]
    NonFiniteCoordinate(Coordinate),

    #[error("Zone area {area_m2:.1} m² exceeds the maximum of {max_m2:.1} m²")]
    ZoneTooLarge { area_m2: f64, max_m2: f64 },

    #[error("Zone '{0}' already exists")]
    DuplicateZone(String),

    #[error("Zone '{0}' not found")]
    UnknownZone(String),

    #[error("Parent zone '{0}' must be an existing top-level grass zone")]
    InvalidParent(String),

    #[error("A {0:?} zone cannot be nested inside another zone")]
    InvalidNestedType(ZoneType),

    #[error("Sprinkler type '{0}' not found")]
    UnknownSprinklerType(String),

    #[error("Sprinkler '{0}' not found")]
    UnknownSprinkler(String),

    #[error("Point lies inside avoidance zone '{0}'")]
    InsideAvoidanceZone(String),

    #[error("Cannot connect sprinkler '{0}' to itself")]
    SelfConnection(String),

    #[error("Main pipe needs at least 2 points, got {0}")]
    MainPipeTooShort(usize),

    #[error("A main pipe already exists; reset the project to draw a new one")]
    MainPipeExists,
}

pub type Result<T> = std::result::Result<T, PlannerError>;
