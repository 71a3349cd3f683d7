//! Quad-strip assembly from the ordered ring sequence.

use serde::Serialize;

use super::core::Point3;
use super::ring::BoundaryRing;

/// Reference to one tube vertex: a boundary vertex of an input polygon (by
/// its original index) or a newly emitted interior point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VertexRef {
    /// Index into the source polygon's boundary.
    Source(usize),
    /// Index into the target polygon's boundary, in its original
    /// (unreversed) order.
    Target(usize),
    /// Index into [`HandleGeometry::points`].
    Interior(usize),
}

/// The computed handle: interior points plus the quad faces of the tube.
///
/// Interior points are ring-major: slot `i` of interior ring `k` (1-based)
/// is `points[(k - 1) * points_per_ring + i]`. The source and target rings
/// are never re-emitted; faces reference them through
/// [`VertexRef::Source`] / [`VertexRef::Target`] so the caller can graft the
/// tube onto existing mesh vertices and then drop the two consumed faces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandleGeometry {
    pub points: Vec<Point3>,
    pub faces: Vec<[VertexRef; 4]>,
    pub points_per_ring: usize,
}

impl HandleGeometry {
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    #[must_use]
    pub fn interior_ring_count(&self) -> usize {
        if self.points_per_ring == 0 {
            0
        } else {
            self.points.len() / self.points_per_ring
        }
    }

    /// The slot points of interior ring `k` (1-based).
    #[must_use]
    pub fn interior_ring(&self, k: usize) -> &[Point3] {
        let start = (k - 1) * self.points_per_ring;
        &self.points[start..start + self.points_per_ring]
    }

    /// Quads that repeat a vertex reference (zero area). These come from
    /// duplicated slots on a bunched end ring and are emitted as ordinary
    /// faces.
    #[must_use]
    pub fn degenerate_face_count(&self) -> usize {
        self.faces
            .iter()
            .filter(|face| (0..4).any(|i| (i + 1..4).any(|j| face[i] == face[j])))
            .count()
    }
}

/// Stitch the ring sequence [source, interior 1..=S, target] into quads.
///
/// For each adjacent ring pair (j, j+1) and slot i the quad is
/// (ring_j[i], ring_j[i+1], ring_{j+1}[i+1], ring_{j+1}[i]) with slot
/// indices mod L, giving every band the same winding around the tube.
pub(crate) fn build_strip(
    source: &BoundaryRing,
    target: &BoundaryRing,
    interior: &[Vec<Point3>],
) -> HandleGeometry {
    let slots = source.len();
    let ring_count = interior.len() + 2;

    let mut points = Vec::with_capacity(interior.len() * slots);
    for ring in interior {
        points.extend_from_slice(ring);
    }

    let vertex_ref = |ring: usize, slot: usize| -> VertexRef {
        if ring == 0 {
            VertexRef::Source(source.indices[slot])
        } else if ring == ring_count - 1 {
            VertexRef::Target(target.indices[slot])
        } else {
            VertexRef::Interior((ring - 1) * slots + slot)
        }
    };

    let mut faces = Vec::with_capacity((ring_count - 1) * slots);
    for ring in 0..ring_count - 1 {
        for slot in 0..slots {
            let next = (slot + 1) % slots;
            faces.push([
                vertex_ref(ring, slot),
                vertex_ref(ring, next),
                vertex_ref(ring + 1, next),
                vertex_ref(ring + 1, slot),
            ]);
        }
    }

    HandleGeometry { points, faces, points_per_ring: slots }
}
