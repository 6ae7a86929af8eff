use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod pipe;
pub mod project;
pub mod request;
pub mod sprinkler;
pub mod statistics;
pub mod zone;

/// A position in decimal degrees (planar WGS84 approximation).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    #[inline]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}
