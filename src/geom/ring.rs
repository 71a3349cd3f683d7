//! Boundary-ring normalization.
//!
//! The two input polygons rarely agree on vertex count or starting index.
//! This module turns them into a pair of slot-aligned rings of equal length
//! L = max(n1, n2): each ring starts at its anchor vertex, the target
//! boundary is traversed in reverse so both rings wind the same way around
//! the tube axis, and the smaller boundary is expanded by duplicating
//! vertices in contiguous proportional runs. Every slot remembers which
//! original boundary vertex it aliases, so duplicated slots collapse onto
//! shared existing mesh vertices downstream.

use super::core::{Point3, Tolerance};
use super::handle::{HandleEnd, HandleError};

/// A slot-aligned boundary ring, anchor at slot 0.
#[derive(Debug, Clone)]
pub(crate) struct BoundaryRing {
    /// Slot positions.
    pub points: Vec<Point3>,
    /// Original boundary index aliased by each slot.
    pub indices: Vec<usize>,
}

impl BoundaryRing {
    pub fn len(&self) -> usize {
        self.points.len()
    }
}

/// Validate both polygons and produce two rings of equal slot count.
///
/// The returned rings share the invariant that slot i of one corresponds to
/// slot i of the other for the rest of the pipeline; no later stage revisits
/// vertex counts.
pub(crate) fn normalize_pair(
    source: &[Point3],
    source_anchor: usize,
    target: &[Point3],
    target_anchor: usize,
) -> Result<(BoundaryRing, BoundaryRing), HandleError> {
    validate_polygon(HandleEnd::Source, source, source_anchor)?;
    validate_polygon(HandleEnd::Target, target, target_anchor)?;

    let slots = source.len().max(target.len());
    let src = aligned_ring(source, source_anchor, false);
    let dst = aligned_ring(target, target_anchor, true);
    Ok((spread_to_slots(&src, slots), spread_to_slots(&dst, slots)))
}

fn validate_polygon(
    end: HandleEnd,
    points: &[Point3],
    anchor: usize,
) -> Result<(), HandleError> {
    if points.len() < 3 {
        return Err(HandleError::PolygonTooSmall { end, count: points.len() });
    }
    for (index, p) in points.iter().enumerate() {
        if !p.x.is_finite() || !p.y.is_finite() || !p.z.is_finite() {
            return Err(HandleError::NonFinitePoint { end, index });
        }
    }
    if anchor >= points.len() {
        return Err(HandleError::AnchorOutOfBounds { end, index: anchor, count: points.len() });
    }
    Ok(())
}

/// Rotate a boundary so its anchor vertex sits at slot 0, traversing it in
/// reverse order first when `reverse` is set (the target boundary, so both
/// rings wind the same way around the tube).
fn aligned_ring(points: &[Point3], anchor: usize, reverse: bool) -> BoundaryRing {
    let n = points.len();
    let mut indices = Vec::with_capacity(n);
    for slot in 0..n {
        let index = if reverse {
            (anchor + n - slot) % n
        } else {
            (anchor + slot) % n
        };
        indices.push(index);
    }
    let ring_points = indices.iter().map(|&index| points[index]).collect();
    BoundaryRing { points: ring_points, indices }
}

/// Expand a ring to `slots` positions by duplicating vertices in contiguous
/// runs: vertex i of an n-vertex ring occupies slots
/// [round(i·slots/n), round((i+1)·slots/n)). Consecutive duplicates, never
/// interleaved repeats.
fn spread_to_slots(ring: &BoundaryRing, slots: usize) -> BoundaryRing {
    let n = ring.len();
    if n == slots {
        return ring.clone();
    }

    let mut points = Vec::with_capacity(slots);
    let mut indices = Vec::with_capacity(slots);
    for i in 0..n {
        let run_start = slot_boundary(i, n, slots);
        let run_end = slot_boundary(i + 1, n, slots);
        for _ in run_start..run_end {
            points.push(ring.points[i]);
            indices.push(ring.indices[i]);
        }
    }
    debug_assert_eq!(points.len(), slots);
    BoundaryRing { points, indices }
}

fn slot_boundary(i: usize, n: usize, slots: usize) -> usize {
    ((i * slots) as f64 / n as f64).round() as usize
}

/// Resolve an anchor given as a bare position (the single-vertex selection
/// workflow: both faces share one selected vertex) to a vertex index on
/// `points`. Returns the closest vertex within `tol`, preferring the lowest
/// index on ties.
#[must_use]
pub fn anchor_index_of(points: &[Point3], position: Point3, tol: Tolerance) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, p) in points.iter().enumerate() {
        let dist_sq = p.distance_squared_to(position);
        if dist_sq <= tol.eps_squared() && best.map_or(true, |(_, d)| dist_sq < d) {
            best = Some((index, dist_sq));
        }
    }
    best.map(|(index, _)| index)
}
