//! Handle construction: the public entry points tying the pipeline together.
//!
//! A handle connects two mesh faces with a closed tube of quad strips. The
//! caller supplies the two face boundaries as ordered 3D point sequences,
//! one anchor vertex index per boundary (which vertex lines up with which
//! is the caller's selection-order policy), and a [`HandleOptions`]. The
//! result is a batch of new interior points plus the tube's faces expressed
//! as [`VertexRef`]s, computed entirely in isolation: nothing is mutated
//! here, all fatal errors are raised before any geometry exists, and the
//! caller grafts the result atomically and removes the two consumed faces.

use serde::Serialize;

use super::core::{Point3, Tolerance};
use super::interpolate::SectionInterpolator;
use super::polar::polar_ring;
use super::ring::normalize_pair;
use super::strip::{HandleGeometry, VertexRef, build_strip};

/// Which input polygon an error or diagnostic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HandleEnd {
    Source,
    Target,
}

/// Options controlling handle generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HandleOptions {
    /// Number of interior cross-sections between the two faces.
    pub segments: u32,
    /// Bulge magnitude where the handle leaves the source face.
    pub weight_start: f64,
    /// Bulge magnitude where the handle meets the target face.
    pub weight_end: f64,
    /// Extra full revolutions applied across the span; the sign picks the
    /// rotation direction.
    pub twists: i32,
}

impl Default for HandleOptions {
    fn default() -> Self {
        Self { segments: 10, weight_start: 10.0, weight_end: 10.0, twists: 0 }
    }
}

impl HandleOptions {
    /// Options with the same bulge weight at both ends.
    #[must_use]
    pub fn symmetric(weight: f64) -> Self {
        Self { weight_start: weight, weight_end: weight, ..Default::default() }
    }

    /// Options for a straight loft between the faces: no bulge, no twist.
    #[must_use]
    pub fn straight() -> Self {
        Self { weight_start: 0.0, weight_end: 0.0, twists: 0, ..Default::default() }
    }
}

/// Errors that abort handle construction. All are raised before any
/// geometry is produced; a failed call leaves nothing to roll back.
#[derive(Debug, thiserror::Error)]
pub enum HandleError {
    #[error("{end:?} polygon needs at least 3 vertices, got {count}")]
    PolygonTooSmall { end: HandleEnd, count: usize },
    #[error("anchor index {index} is not on the {end:?} polygon boundary ({count} vertices)")]
    AnchorOutOfBounds { end: HandleEnd, index: usize, count: usize },
    #[error("{end:?} polygon has a non-finite coordinate at vertex {index}")]
    NonFinitePoint { end: HandleEnd, index: usize },
    #[error("weight parameter `{name}` must be finite, got {value}")]
    NonFiniteWeight { name: &'static str, value: f64 },
}

/// Diagnostics collected while building a handle.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HandleDiagnostics {
    /// Slot count L shared by every cross-section.
    pub points_per_ring: usize,
    pub interior_ring_count: usize,
    pub interior_point_count: usize,
    pub face_count: usize,
    /// Zero-area quads produced by duplicated slots on a bunched end ring.
    pub degenerate_face_count: usize,
    /// Slots on each end ring that duplicate a boundary vertex.
    pub duplicated_slots_source: usize,
    pub duplicated_slots_target: usize,
    /// The plane fit fell back to a deterministic axis (collinear ring, or
    /// an anchor sitting on the center).
    pub plane_fallback_source: bool,
    pub plane_fallback_target: bool,
    /// Extra rotation applied at the target end, radians.
    pub total_twist_angle: f64,
}

/// Build a handle connecting two face boundaries.
///
/// `source` and `target` are the ordered boundaries of the two faces being
/// consumed; `source_anchor` / `target_anchor` are vertex indices on them.
/// The two boundaries may have different vertex counts; the smaller one is
/// expanded by duplicating vertices, so some tube quads can be degenerate.
///
/// # Example
/// ```
/// use handle_engine::geom::{HandleOptions, Point3, make_handle};
///
/// let bottom = vec![
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
///     Point3::new(-1.0, 0.0, 0.0),
///     Point3::new(0.0, -1.0, 0.0),
/// ];
/// let top: Vec<Point3> = bottom
///     .iter()
///     .rev()
///     .map(|p| Point3::new(p.x, p.y, 2.0))
///     .collect();
///
/// let (geometry, diagnostics) =
///     make_handle(&bottom, 0, &top, 3, HandleOptions::straight()).unwrap();
/// assert_eq!(diagnostics.face_count, 4 * 11);
/// assert_eq!(geometry.points.len(), 4 * 10);
/// ```
#[must_use = "the computed geometry must be grafted by the caller"]
pub fn make_handle(
    source: &[Point3],
    source_anchor: usize,
    target: &[Point3],
    target_anchor: usize,
    options: HandleOptions,
) -> Result<(HandleGeometry, HandleDiagnostics), HandleError> {
    make_handle_with_tolerance(
        source,
        source_anchor,
        target,
        target_anchor,
        options,
        Tolerance::default_geom(),
    )
}

/// Build a handle with an explicit geometric tolerance.
pub fn make_handle_with_tolerance(
    source: &[Point3],
    source_anchor: usize,
    target: &[Point3],
    target_anchor: usize,
    options: HandleOptions,
    tol: Tolerance,
) -> Result<(HandleGeometry, HandleDiagnostics), HandleError> {
    validate_options(&options)?;

    let (src_ring, dst_ring) =
        normalize_pair(source, source_anchor, target, target_anchor)?;
    let slots = src_ring.len();
    log::debug!("normalized boundary rings to {slots} slots");

    let src_polar = polar_ring(&src_ring, tol);
    let dst_polar = polar_ring(&dst_ring, tol);

    let interpolator = SectionInterpolator::new(
        &src_polar,
        &dst_polar,
        options.weight_start,
        options.weight_end,
        options.twists,
        tol,
    );

    let segments = options.segments as usize;
    let span = (segments + 1) as f64;
    let mut interior = Vec::with_capacity(segments);
    for k in 1..=segments {
        interior.push(interpolator.section_at(k as f64 / span));
    }
    log::debug!("synthesized {} interior cross-sections", interior.len());

    let geometry = build_strip(&src_ring, &dst_ring, &interior);
    debug_assert!(geometry
        .faces
        .iter()
        .flatten()
        .all(|vertex| match *vertex {
            VertexRef::Source(i) => i < source.len(),
            VertexRef::Target(i) => i < target.len(),
            VertexRef::Interior(i) => i < geometry.points.len(),
        }));

    let diagnostics = HandleDiagnostics {
        points_per_ring: slots,
        interior_ring_count: segments,
        interior_point_count: geometry.points.len(),
        face_count: geometry.face_count(),
        degenerate_face_count: geometry.degenerate_face_count(),
        duplicated_slots_source: slots.saturating_sub(source.len()),
        duplicated_slots_target: slots.saturating_sub(target.len()),
        plane_fallback_source: src_polar.plane_fallback,
        plane_fallback_target: dst_polar.plane_fallback,
        total_twist_angle: interpolator.total_twist(),
    };
    log::debug!(
        "handle strip: {} faces, {} new points",
        diagnostics.face_count,
        diagnostics.interior_point_count
    );

    Ok((geometry, diagnostics))
}

fn validate_options(options: &HandleOptions) -> Result<(), HandleError> {
    if !options.weight_start.is_finite() {
        return Err(HandleError::NonFiniteWeight {
            name: "weight_start",
            value: options.weight_start,
        });
    }
    if !options.weight_end.is_finite() {
        return Err(HandleError::NonFiniteWeight {
            name: "weight_end",
            value: options.weight_end,
        });
    }
    Ok(())
}
