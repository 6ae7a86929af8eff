//! Heuristic branch-network router.
//!
//! Each zone gets one sub-main from the main pipe to its closest sprinkler.
//! Laterals then chain the sprinklers row by row, starting from that
//! attachment point. Row detection is a greedy latitude clustering, not a
//! true grid fit, so rotated or irregular layouts get serviceable rather than
//! optimal networks.

use std::collections::BTreeMap;

use log::{debug, info};

use crate::logic::geo::{closest_point_on_polyline, distance};
use crate::models::{
    pipe::{MainPipe, Pipe, PipeKind},
    sprinkler::{Sprinkler, UNASSIGNED_ZONE_ID},
    Coordinate,
};

/// Latitude band, in degrees, within which sprinklers share a row.
///
/// Latitude-independent, so rows are slightly wider in metres near the
/// equator than near the poles.
pub const ROW_TOLERANCE_DEG: f64 = 0.00008;

/// The sprinkler a zone's sub-main attaches to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attachment {
    /// Index into the zone's sprinkler slice.
    pub index: usize,
    /// Closest point on the main pipe.
    pub projection: Coordinate,
    pub distance_m: f64,
}

pub fn closest_point_on_main_pipe(point: Coordinate, main_pipe: &MainPipe) -> Coordinate {
    closest_point_on_polyline(point, &main_pipe.points)
}

/// The sprinkler nearest the main pipe; the first one wins ties.
pub fn find_closest_sprinkler_to_main_pipe(
    sprinklers: &[Sprinkler],
    main_pipe: &MainPipe,
) -> Option<Attachment> {
    let mut best: Option<Attachment> = None;
    for (index, sprinkler) in sprinklers.iter().enumerate() {
        let projection = closest_point_on_main_pipe(sprinkler.position, main_pipe);
        let distance_m = distance(sprinkler.position, projection);
        if best.map_or(true, |b| distance_m < b.distance_m) {
            best = Some(Attachment {
                index,
                projection,
                distance_m,
            });
        }
    }
    best
}

/// Groups sprinklers into rows of indices.
///
/// Sprinklers are visited north to south; one joins the current row while its
/// latitude is within [`ROW_TOLERANCE_DEG`] of the row's first member. Rows
/// come out north to south, each sorted west to east.
pub fn detect_grid_layout(sprinklers: &[Sprinkler]) -> Vec<Vec<usize>> {
    let mut order: Vec<usize> = (0..sprinklers.len()).collect();
    order.sort_by(|&a, &b| {
        sprinklers[b]
            .position
            .lat
            .total_cmp(&sprinklers[a].position.lat)
    });

    let mut rows: Vec<Vec<usize>> = Vec::new();
    for index in order {
        let lat = sprinklers[index].position.lat;
        match rows.last_mut() {
            Some(row) if (sprinklers[row[0]].position.lat - lat).abs() < ROW_TOLERANCE_DEG => {
                row.push(index);
            }
            _ => rows.push(vec![index]),
        }
    }

    for row in &mut rows {
        row.sort_by(|&a, &b| {
            sprinklers[a]
                .position
                .lng
                .total_cmp(&sprinklers[b].position.lng)
        });
    }
    rows
}

/// Pipe accumulator for one zone, numbering laterals as they are emitted.
struct ZoneNetwork<'a> {
    zone_id: &'a str,
    sprinklers: &'a [Sprinkler],
    pipes: Vec<Pipe>,
    laterals: usize,
}

impl<'a> ZoneNetwork<'a> {
    fn new(zone_id: &'a str, sprinklers: &'a [Sprinkler]) -> Self {
        Self {
            zone_id,
            sprinklers,
            pipes: Vec::new(),
            laterals: 0,
        }
    }

    fn submain(&mut self, attachment: &Attachment) {
        let sprinkler = &self.sprinklers[attachment.index];
        self.pipes.push(Pipe::new(
            format!("{}-submain", self.zone_id),
            attachment.projection,
            sprinkler.position,
            PipeKind::Submain,
            self.zone_id,
            vec![sprinkler.id.clone()],
        ));
    }

    fn lateral(&mut self, from: usize, to: usize) {
        let (a, b) = (&self.sprinklers[from], &self.sprinklers[to]);
        self.pipes.push(Pipe::new(
            format!("{}-lateral-{}", self.zone_id, self.laterals),
            a.position,
            b.position,
            PipeKind::Lateral,
            self.zone_id,
            vec![a.id.clone(), b.id.clone()],
        ));
        self.laterals += 1;
    }

    /// Chains a row as a path, walking outward from `row[from]` in both directions.
    fn chain_outward(&mut self, row: &[usize], from: usize) {
        for k in (0..from).rev() {
            self.lateral(row[k + 1], row[k]);
        }
        for k in from + 1..row.len() {
            self.lateral(row[k - 1], row[k]);
        }
    }

    /// Closest pair `(a, b)` with `a` from `anchor_row` and `b` from `row`.
    fn nearest_pair(&self, anchor_row: &[usize], row: &[usize]) -> Option<(usize, usize)> {
        let mut best: Option<(usize, usize, f64)> = None;
        for &a in anchor_row {
            for (pos, &b) in row.iter().enumerate() {
                let d = distance(self.sprinklers[a].position, self.sprinklers[b].position);
                if best.map_or(true, |(_, _, best_d)| d < best_d) {
                    best = Some((a, pos, d));
                }
            }
        }
        best.map(|(a, pos, _)| (a, pos))
    }
}

/// Sub-main plus laterals for a single zone's sprinklers.
pub fn route_zone(zone_id: &str, sprinklers: &[Sprinkler], main_pipe: &MainPipe) -> Vec<Pipe> {
    let Some(attachment) = find_closest_sprinkler_to_main_pipe(sprinklers, main_pipe) else {
        return Vec::new();
    };

    let mut network = ZoneNetwork::new(zone_id, sprinklers);
    network.submain(&attachment);

    let rows = detect_grid_layout(sprinklers);
    if rows.iter().all(|row| row.len() < 2) {
        // No row structure to exploit: star out from the attachment sprinkler.
        for index in (0..sprinklers.len()).filter(|&i| i != attachment.index) {
            network.lateral(attachment.index, index);
        }
        debug!("Zone '{zone_id}': star layout over {} sprinklers", sprinklers.len());
        return network.pipes;
    }

    let Some((anchor_row, anchor_pos)) = rows.iter().enumerate().find_map(|(r, row)| {
        row.iter()
            .position(|&i| i == attachment.index)
            .map(|pos| (r, pos))
    }) else {
        return network.pipes;
    };

    network.chain_outward(&rows[anchor_row], anchor_pos);
    for (r, row) in rows.iter().enumerate() {
        if r == anchor_row {
            continue;
        }
        if let Some((from, to_pos)) = network.nearest_pair(&rows[anchor_row], row) {
            network.lateral(from, row[to_pos]);
            network.chain_outward(row, to_pos);
        }
    }
    debug!(
        "Zone '{zone_id}': {} rows, {} laterals",
        rows.len(),
        network.laterals
    );
    network.pipes
}

/// Splits a flat sprinkler list into per-zone buckets, preserving order within each.
pub fn group_by_zone(sprinklers: &[Sprinkler]) -> BTreeMap<String, Vec<Sprinkler>> {
    let mut by_zone: BTreeMap<String, Vec<Sprinkler>> = BTreeMap::new();
    for sprinkler in sprinklers {
        by_zone
            .entry(sprinkler.zone_id.clone())
            .or_default()
            .push(sprinkler.clone());
    }
    by_zone
}

/// Sub-main and lateral pipes for every zone, in zone-id order.
///
/// A missing or empty main pipe routes nothing. Unassigned sprinklers belong
/// to no zone and are left unconnected.
pub fn route_network(
    main_pipe: Option<&MainPipe>,
    sprinklers_by_zone: &BTreeMap<String, Vec<Sprinkler>>,
) -> Vec<Pipe> {
    let Some(main_pipe) = main_pipe.filter(|m| !m.points.is_empty()) else {
        debug!("No main pipe, skipping routing");
        return Vec::new();
    };

    let pipes: Vec<Pipe> = sprinklers_by_zone
        .iter()
        .filter(|(zone_id, _)| zone_id.as_str() != UNASSIGNED_ZONE_ID)
        .flat_map(|(zone_id, sprinklers)| route_zone(zone_id, sprinklers, main_pipe))
        .collect();
    info!(
        "Routed {} pipes across {} zones",
        pipes.len(),
        sprinklers_by_zone.len()
    );
    pipes
}
