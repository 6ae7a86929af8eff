//! Whole-collection edits over a [`Project`].
//!
//! Every edit borrows the current project and returns a new one. Sprinkler or
//! main-pipe changes always regenerate the branch network from scratch.

use std::collections::HashSet;

use log::{debug, info};

use crate::data::sprinkler_types::get_sprinkler_type_by_id;
use crate::error::{PlannerError, Result};
use crate::logic::{
    placer::{auto_place_all, auto_place_zone, avoidance_zones, place_manual},
    router::{group_by_zone, route_network},
    statistics::compute_statistics,
    validation::{validate_nesting, validate_zone_polygon},
};
use crate::models::{
    pipe::{MainPipe, Pipe, PipeKind, WaterSource},
    project::Project,
    sprinkler::Sprinkler,
    statistics::Summary,
    zone::Zone,
    Coordinate,
};

impl Project {
    /// Adds a validated zone; oversized or badly nested outlines are rejected.
    pub fn add_zone(&self, zone: Zone) -> Result<Project> {
        if self.zone(&zone.id).is_some() {
            return Err(PlannerError::DuplicateZone(zone.id));
        }
        validate_zone_polygon(&zone.coordinates, self.max_zone_area_m2)?;
        validate_nesting(&zone, &self.zones)?;

        let mut next = self.clone();
        next.zones.push(zone);
        Ok(next)
    }

    /// Removes a zone with its sprinklers; a grass zone takes its nested zones along.
    pub fn delete_zone(&self, zone_id: &str) -> Result<Project> {
        if self.zone(zone_id).is_none() {
            return Err(PlannerError::UnknownZone(zone_id.to_string()));
        }
        let removed: HashSet<&str> = self
            .zones
            .iter()
            .filter(|z| z.id == zone_id || z.parent_zone_id.as_deref() == Some(zone_id))
            .map(|z| z.id.as_str())
            .collect();
        debug!("Deleting zones {removed:?}");

        let mut next = self.clone();
        next.zones.retain(|z| !removed.contains(z.id.as_str()));
        next.sprinklers
            .retain(|s| !removed.contains(s.zone_id.as_str()));
        Ok(next.with_regenerated_pipes())
    }

    /// Replaces one zone's sprinklers with a fresh corner + grid placement.
    pub fn auto_place_zone(&self, zone_id: &str) -> Result<Project> {
        let zone = self
            .zone(zone_id)
            .ok_or_else(|| PlannerError::UnknownZone(zone_id.to_string()))?;
        let avoidance = avoidance_zones(zone, &self.zones);
        let placed = auto_place_zone(zone, &avoidance);

        let mut next = self.clone();
        next.sprinklers.retain(|s| s.zone_id != zone_id);
        next.sprinklers.extend(placed);
        Ok(next.with_regenerated_pipes())
    }

    /// Clears every sprinkler, then fills each placement-target zone in creation order.
    pub fn auto_place_all(&self) -> Project {
        let placements = auto_place_all(&self.zones);

        let mut next = self.clone();
        next.sprinklers = self
            .zones
            .iter()
            .filter_map(|z| placements.get(&z.id))
            .flatten()
            .cloned()
            .collect();
        next.with_regenerated_pipes()
    }

    /// Places a single sprinkler by hand; `radius_m <= 0` uses the catalog default.
    pub fn place_sprinkler(
        &self,
        position: Coordinate,
        sprinkler_type_id: &str,
        radius_m: f64,
    ) -> Result<Project> {
        let sprinkler_type = get_sprinkler_type_by_id(sprinkler_type_id)
            .ok_or_else(|| PlannerError::UnknownSprinklerType(sprinkler_type_id.to_string()))?;
        let id = format!("manual-{}", self.next_manual_id);
        let sprinkler = place_manual(id, position, &sprinkler_type, radius_m, &self.zones)?;

        let mut next = self.clone();
        next.next_manual_id += 1;
        next.sprinklers.push(sprinkler);
        Ok(next.with_regenerated_pipes())
    }

    pub fn remove_sprinkler(&self, sprinkler_id: &str) -> Result<Project> {
        if self.sprinkler(sprinkler_id).is_none() {
            return Err(PlannerError::UnknownSprinkler(sprinkler_id.to_string()));
        }
        let mut next = self.clone();
        next.sprinklers.retain(|s| s.id != sprinkler_id);
        Ok(next.with_regenerated_pipes())
    }

    pub fn clear_zone_sprinklers(&self, zone_id: &str) -> Project {
        let mut next = self.clone();
        next.sprinklers.retain(|s| s.zone_id != zone_id);
        next.with_regenerated_pipes()
    }

    pub fn set_water_source(&self, water_source: WaterSource) -> Project {
        let mut next = self.clone();
        next.water_source = Some(water_source);
        next
    }

    /// Draws the main pipe. There is only ever one; redrawing requires a reset.
    pub fn set_main_pipe(&self, points: Vec<Coordinate>) -> Result<Project> {
        if self.main_pipe.is_some() {
            return Err(PlannerError::MainPipeExists);
        }
        let main_pipe = MainPipe::new(points)?;
        info!("Main pipe drawn: {:.1} m", main_pipe.length_meters);

        let mut next = self.clone();
        next.main_pipe = Some(main_pipe);
        Ok(next.with_regenerated_pipes())
    }

    /// Discards every sub-main and lateral and routes the network again.
    pub fn create_smart_pipe_layout(&self) -> Project {
        self.clone().with_regenerated_pipes()
    }

    /// Manual overlay: a lateral straight between two sprinklers.
    pub fn connect_sprinklers(&self, from_id: &str, to_id: &str) -> Result<Project> {
        if from_id == to_id {
            return Err(PlannerError::SelfConnection(from_id.to_string()));
        }
        let from = self
            .sprinkler(from_id)
            .ok_or_else(|| PlannerError::UnknownSprinkler(from_id.to_string()))?;
        let to = self
            .sprinkler(to_id)
            .ok_or_else(|| PlannerError::UnknownSprinkler(to_id.to_string()))?;
        if self.pipes.iter().any(|p| p.touches(from_id) && p.touches(to_id)) {
            debug!("'{from_id}' and '{to_id}' are already connected");
            return Ok(self.clone());
        }

        let pipe = Pipe::new(
            format!("manual-pipe-{}", self.next_manual_id),
            from.position,
            to.position,
            PipeKind::Lateral,
            from.zone_id.clone(),
            vec![from.id.clone(), to.id.clone()],
        );

        let mut next = self.clone();
        next.next_manual_id += 1;
        next.pipes.push(pipe);
        Ok(next)
    }

    /// Manual overlay: drops the selected pipes; unknown ids are ignored.
    pub fn delete_pipes(&self, pipe_ids: &[&str]) -> Project {
        let mut next = self.clone();
        next.pipes.retain(|p| !pipe_ids.contains(&p.id.as_str()));
        next
    }

    /// Keeps the zones; clears sprinklers, pipes, the main pipe and the water source.
    pub fn reset(&self) -> Project {
        Project {
            zones: self.zones.clone(),
            ..Project::new(self.max_zone_area_m2)
        }
    }

    pub fn statistics(&self) -> Summary {
        compute_statistics(
            &self.zones,
            &self.sprinklers,
            &self.pipes,
            self.main_pipe.as_ref(),
        )
    }

    fn with_regenerated_pipes(mut self) -> Project {
        self.pipes = route_network(self.main_pipe.as_ref(), &group_by_zone(&self.sprinklers));
        self
    }

    /// Sprinklers grouped by owning zone, in zone creation order.
    pub fn sprinklers_by_zone(&self) -> Vec<(&Zone, Vec<&Sprinkler>)> {
        self.zones
            .iter()
            .map(|z| (z, self.sprinklers_in_zone(&z.id).collect()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::geo::{offset, point_in_polygon};
    use crate::models::{pipe::WaterSourceKind, zone::ZoneType};

    const ORIGIN: Coordinate = Coordinate::new(45.0, 5.0);

    fn rect(east: f64, north: f64, w: f64, h: f64) -> Vec<Coordinate> {
        let sw = offset(ORIGIN, east, north);
        vec![sw, offset(sw, w, 0.0), offset(sw, w, h), offset(sw, 0.0, h)]
    }

    fn garden() -> Project {
        Project::default()
            .add_zone(
                Zone::new("lawn", ZoneType::Grass, rect(0.0, 0.0, 20.0, 10.0))
                    .with_sprinkler_config("spray", 4.0),
            )
            .unwrap()
            .add_zone(
                Zone::new("bed", ZoneType::Flowers, rect(8.0, 3.0, 4.0, 4.0)).with_parent("lawn"),
            )
            .unwrap()
    }

    fn main_pipe_points() -> Vec<Coordinate> {
        vec![offset(ORIGIN, -5.0, -5.0), offset(ORIGIN, 25.0, -5.0)]
    }

    #[test]
    fn test_add_zone_rejects_oversized() {
        let project = Project::new(60.0);
        let result = project.add_zone(Zone::new("big", ZoneType::Grass, rect(0.0, 0.0, 10.0, 10.0)));
        assert!(matches!(result, Err(PlannerError::ZoneTooLarge { .. })));
        assert!(project.zones().is_empty());
    }

    #[test]
    fn test_add_zone_rejects_duplicates() {
        let result = garden().add_zone(Zone::new("lawn", ZoneType::Grass, rect(0.0, 0.0, 2.0, 2.0)));
        assert_eq!(result, Err(PlannerError::DuplicateZone("lawn".into())));
    }

    #[test]
    fn test_auto_place_all_respects_nested_bed() {
        let project = garden().auto_place_all();
        let bed = project.zone("bed").unwrap().coordinates.clone();
        assert!(!project.sprinklers().is_empty());
        assert!(project.sprinklers().iter().all(|s| s.zone_id == "lawn"));
        assert!(project
            .sprinklers()
            .iter()
            .all(|s| !point_in_polygon(s.position, &bed)));
    }

    #[test]
    fn test_auto_place_all_twice_is_identical() {
        let once = garden().auto_place_all();
        assert_eq!(once.auto_place_all(), once);
    }

    #[test]
    fn test_main_pipe_triggers_routing_and_is_drawn_once() {
        let project = garden()
            .auto_place_all()
            .set_main_pipe(main_pipe_points())
            .unwrap();
        let submains = project
            .pipes()
            .iter()
            .filter(|p| p.kind == PipeKind::Submain)
            .count();
        assert_eq!(submains, 1);
        assert!(project.pipes().len() >= project.sprinklers().len());

        assert_eq!(
            project.set_main_pipe(main_pipe_points()),
            Err(PlannerError::MainPipeExists)
        );
    }

    #[test]
    fn test_smart_layout_is_idempotent() {
        let project = garden()
            .auto_place_all()
            .set_main_pipe(main_pipe_points())
            .unwrap();
        let again = project.create_smart_pipe_layout();
        assert_eq!(again.pipes(), project.pipes());
        assert_eq!(again.create_smart_pipe_layout().pipes(), project.pipes());
    }

    #[test]
    fn test_manual_overlay_is_replaced_on_regeneration() {
        let project = garden()
            .auto_place_all()
            .set_main_pipe(main_pipe_points())
            .unwrap();
        let a = project.sprinklers()[0].id.clone();
        let b = project
            .sprinklers()
            .iter()
            .map(|s| s.id.clone())
            .find(|id| *id != a && !project.pipes().iter().any(|p| p.touches(&a) && p.touches(id)))
            .unwrap();

        let connected = project.connect_sprinklers(&a, &b).unwrap();
        assert_eq!(connected.pipes().len(), project.pipes().len() + 1);
        assert_eq!(connected.connect_sprinklers(&b, &a).unwrap(), connected);
        assert!(connected.pipes().iter().any(|p| p.id == "manual-pipe-0"));

        let trimmed = connected.delete_pipes(&["manual-pipe-0", "lawn-submain"]);
        assert_eq!(trimmed.pipes().len(), project.pipes().len() - 1);

        assert_eq!(trimmed.create_smart_pipe_layout().pipes(), project.pipes());
    }

    #[test]
    fn test_connect_rejects_bad_ids() {
        let project = garden().auto_place_all();
        let a = project.sprinklers()[0].id.clone();
        assert_eq!(
            project.connect_sprinklers(&a, &a),
            Err(PlannerError::SelfConnection(a.clone()))
        );
        assert_eq!(
            project.connect_sprinklers(&a, "ghost"),
            Err(PlannerError::UnknownSprinkler("ghost".into()))
        );
    }

    #[test]
    fn test_manual_sprinklers_and_removal() {
        let project = garden();
        let placed = project
            .place_sprinkler(offset(ORIGIN, 2.0, 2.0), "spray", 0.0)
            .unwrap()
            .place_sprinkler(offset(ORIGIN, 100.0, 100.0), "rotor", 0.0)
            .unwrap();
        let ids: Vec<_> = placed.sprinklers().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["manual-0", "manual-1"]);
        assert_eq!(placed.sprinklers()[0].zone_id, "lawn");
        assert!(placed.sprinklers()[1].is_unassigned());

        let in_bed = placed.place_sprinkler(offset(ORIGIN, 10.0, 5.0), "spray", 0.0);
        assert_eq!(in_bed, Err(PlannerError::InsideAvoidanceZone("bed".into())));

        let removed = placed.remove_sprinkler("manual-0").unwrap();
        assert_eq!(removed.sprinklers().len(), 1);
        assert!(removed.remove_sprinkler("manual-0").is_err());

        assert_eq!(
            project.place_sprinkler(ORIGIN, "fire-hose", 0.0),
            Err(PlannerError::UnknownSprinklerType("fire-hose".into()))
        );
    }

    #[test]
    fn test_delete_grass_zone_cascades() {
        let project = garden()
            .auto_place_all()
            .set_main_pipe(main_pipe_points())
            .unwrap();
        let deleted = project.delete_zone("lawn").unwrap();
        assert!(deleted.zones().is_empty());
        assert!(deleted.sprinklers().is_empty());
        assert!(deleted.pipes().is_empty());
        assert!(deleted.main_pipe().is_some());
        assert!(project.delete_zone("ghost").is_err());
    }

    #[test]
    fn test_delete_nested_zone_keeps_parent() {
        let deleted = garden().delete_zone("bed").unwrap();
        assert_eq!(deleted.zones().len(), 1);
        assert_eq!(deleted.zones()[0].id, "lawn");
    }

    #[test]
    fn test_clear_and_replace_one_zone() {
        let project = garden().auto_place_all();
        let cleared = project.clear_zone_sprinklers("lawn");
        assert!(cleared.sprinklers().is_empty());
        let refilled = cleared.auto_place_zone("lawn").unwrap();
        assert_eq!(refilled.sprinklers(), project.sprinklers());
        assert!(cleared.auto_place_zone("ghost").is_err());
    }

    #[test]
    fn test_reset_keeps_zones_only() {
        let project = garden()
            .auto_place_all()
            .set_water_source(WaterSource {
                position: ORIGIN,
                kind: WaterSourceKind::Pump,
            })
            .set_main_pipe(main_pipe_points())
            .unwrap();
        let reset = project.reset();
        assert_eq!(reset.zones(), project.zones());
        assert!(reset.sprinklers().is_empty());
        assert!(reset.pipes().is_empty());
        assert!(reset.main_pipe().is_none());
        assert!(reset.water_source().is_none());
        assert!(reset.set_main_pipe(main_pipe_points()).is_ok());
    }

    #[test]
    fn test_statistics_reflect_project() {
        let project = garden()
            .auto_place_all()
            .set_main_pipe(main_pipe_points())
            .unwrap();
        let summary = project.statistics();
        assert_eq!(summary.sprinkler_count, project.sprinklers().len());
        assert!((summary.pipe_lengths.main_meters - 30.0).abs() < 0.1);
        assert!((0.0..=100.0).contains(&summary.coverage_percentage));
        assert_eq!(summary.submain_count, 1);
    }

    #[test]
    fn test_sprinklers_by_zone_in_creation_order() {
        let project = garden().auto_place_all();
        let grouped = project.sprinklers_by_zone();
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].0.id, "lawn");
        assert!(!grouped[0].1.is_empty());
        assert!(grouped[1].1.is_empty());
    }
}
