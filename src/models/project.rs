use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::config::DEFAULT_MAX_ZONE_AREA_M2;
use crate::models::{
    pipe::{MainPipe, Pipe, WaterSource},
    sprinkler::Sprinkler,
    zone::Zone,
};

/// Snapshot of one irrigation plan.
///
/// Never mutated in place: every edit in `logic::project` returns a new
/// `Project` with whole collections replaced.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub(crate) zones: Vec<Zone>,
    pub(crate) sprinklers: Vec<Sprinkler>,
    pub(crate) pipes: Vec<Pipe>,
    pub(crate) main_pipe: Option<MainPipe>,
    pub(crate) water_source: Option<WaterSource>,
    pub(crate) max_zone_area_m2: f64,
    #[serde(default)]
    pub(crate) next_manual_id: u64,
}

impl Default for Project {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ZONE_AREA_M2)
    }
}

impl Project {
    pub fn new(max_zone_area_m2: f64) -> Self {
        Self {
            zones: Vec::new(),
            sprinklers: Vec::new(),
            pipes: Vec::new(),
            main_pipe: None,
            water_source: None,
            max_zone_area_m2,
            next_manual_id: 0,
        }
    }

    /// Zones in creation order.
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn sprinklers(&self) -> &[Sprinkler] {
        &self.sprinklers
    }

    pub fn pipes(&self) -> &[Pipe] {
        &self.pipes
    }

    pub fn main_pipe(&self) -> Option<&MainPipe> {
        self.main_pipe.as_ref()
    }

    pub fn water_source(&self) -> Option<&WaterSource> {
        self.water_source.as_ref()
    }

    pub fn max_zone_area_m2(&self) -> f64 {
        self.max_zone_area_m2
    }

    pub fn zone(&self, id: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| z.id == id)
    }

    pub fn sprinkler(&self, id: &str) -> Option<&Sprinkler> {
        self.sprinklers.iter().find(|s| s.id == id)
    }

    pub fn sprinklers_in_zone<'a>(&'a self, zone_id: &'a str) -> impl Iterator<Item = &'a Sprinkler> {
        self.sprinklers.iter().filter(move |s| s.zone_id == zone_id)
    }
}
