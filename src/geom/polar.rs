//! Plane fitting and polar mapping of boundary rings.
//!
//! Every ring gets an orthonormal `PlaneFrame` (centroid, Newell normal,
//! anchor-aligned in-plane axes) and a polar representation of its vertices
//! within that frame. The interpolation stage works entirely in these polar
//! coordinates and maps back to 3D through interpolated frames.
//!
//! Collinear or otherwise degenerate rings never abort the pipeline: the
//! frame falls back to a deterministic axis choice and the fallback is
//! reported to the caller through the diagnostics.

use std::f64::consts::TAU;

use super::core::{Point3, Tolerance, Vec3};
use super::ring::BoundaryRing;

/// One ring vertex in the polar coordinates of its section plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarPoint {
    /// In-plane distance from the section center.
    pub radius: f64,
    /// Angle from the section x-axis; mapper output is wrapped to [0, 2π).
    pub angle: f64,
}

/// Orthonormal section frame: `y_axis = normal × x_axis`, with the x-axis
/// pointing from the center toward the ring's anchor vertex so that angle 0
/// corresponds to the anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneFrame {
    pub center: Point3,
    pub x_axis: Vec3,
    pub y_axis: Vec3,
    pub normal: Vec3,
}

impl PlaneFrame {
    /// Map a polar point back into 3D through this frame.
    #[must_use]
    pub fn point_at(&self, polar: PolarPoint) -> Point3 {
        let offset = self.x_axis * (polar.radius * polar.angle.cos())
            + self.y_axis * (polar.radius * polar.angle.sin());
        self.center + offset
    }

    /// Express a 3D point in the polar coordinates of this frame.
    /// The out-of-plane component is dropped.
    #[must_use]
    pub fn polar_at(&self, point: Point3) -> PolarPoint {
        let offset = point - self.center;
        let u = offset.dot(self.x_axis);
        let v = offset.dot(self.y_axis);
        PolarPoint { radius: u.hypot(v), angle: wrap_angle(v.atan2(u)) }
    }
}

/// A ring together with its fitted frame and polar vertices.
#[derive(Debug, Clone)]
pub(crate) struct PolarRing {
    pub frame: PlaneFrame,
    pub points: Vec<PolarPoint>,
    /// The frame fell back to a deterministic axis (collinear ring, or an
    /// anchor sitting on the center).
    pub plane_fallback: bool,
}

pub(crate) fn polar_ring(ring: &BoundaryRing, tol: Tolerance) -> PolarRing {
    let (frame, plane_fallback) = fit_plane_frame(&ring.points, tol);
    let points = ring.points.iter().map(|&p| frame.polar_at(p)).collect();
    PolarRing { frame, points, plane_fallback }
}

/// Fit a section frame to a ring of points, treating slot 0 as the anchor.
///
/// The center is the arithmetic mean, the normal comes from Newell's method
/// over the ring (so a reversed ring yields the opposite normal), and the
/// x-axis is the center→anchor direction projected into the plane. The
/// second return value reports whether any fallback axis was used.
#[must_use]
pub fn fit_plane_frame(points: &[Point3], tol: Tolerance) -> (PlaneFrame, bool) {
    let center = centroid(points);
    let mut fallback = false;

    let raw = newell_normal(points, center);
    let normal = if raw.length_squared() > tol.eps_squared() {
        raw.normalized().unwrap_or(Vec3::Z)
    } else {
        fallback = true;
        fallback_normal(points, tol)
    };

    let x_axis = match in_plane_axis(points, center, normal, tol) {
        Some((axis, slot)) => {
            if slot != 0 {
                fallback = true;
            }
            axis
        }
        None => {
            fallback = true;
            arbitrary_perpendicular(normal)
        }
    };
    let y_axis = normal.cross(x_axis);

    (PlaneFrame { center, x_axis, y_axis, normal }, fallback)
}

fn centroid(points: &[Point3]) -> Point3 {
    if points.is_empty() {
        return Point3::ORIGIN;
    }
    let sum_x: f64 = points.iter().map(|p| p.x).sum();
    let sum_y: f64 = points.iter().map(|p| p.y).sum();
    let sum_z: f64 = points.iter().map(|p| p.z).sum();
    let n = points.len() as f64;
    Point3::new(sum_x / n, sum_y / n, sum_z / n)
}

/// Newell's method relative to the centroid. Unnormalized; the magnitude is
/// twice the ring's projected area.
fn newell_normal(points: &[Point3], center: Point3) -> Vec3 {
    let mut normal = Vec3::ZERO;
    for i in 0..points.len() {
        let a = points[i] - center;
        let b = points[(i + 1) % points.len()] - center;
        normal = normal + a.cross(b);
    }
    normal
}

/// Deterministic normal for collinear rings: the first non-degenerate edge
/// direction crossed with the coordinate axis it is least aligned with.
fn fallback_normal(points: &[Point3], tol: Tolerance) -> Vec3 {
    for i in 0..points.len() {
        let edge = points[(i + 1) % points.len()] - points[i];
        if edge.length_squared() <= tol.eps_squared() {
            continue;
        }
        let Some(dir) = edge.normalized() else {
            continue;
        };
        if let Some(normal) = dir.cross(least_aligned_axis(dir)).normalized() {
            return normal;
        }
    }
    Vec3::Z
}

fn least_aligned_axis(dir: Vec3) -> Vec3 {
    let ax = dir.x.abs();
    let ay = dir.y.abs();
    let az = dir.z.abs();
    if ax <= ay && ax <= az {
        Vec3::X
    } else if ay <= az {
        Vec3::Y
    } else {
        Vec3::Z
    }
}

/// In-plane axis toward the first slot with a usable offset from the center.
/// Slot 0 (the anchor) wins whenever its offset is non-degenerate.
fn in_plane_axis(
    points: &[Point3],
    center: Point3,
    normal: Vec3,
    tol: Tolerance,
) -> Option<(Vec3, usize)> {
    for (slot, point) in points.iter().enumerate() {
        let offset = *point - center;
        let planar = offset - normal * offset.dot(normal);
        if planar.length_squared() > tol.eps_squared() {
            if let Some(axis) = planar.normalized() {
                return Some((axis, slot));
            }
        }
    }
    None
}

fn arbitrary_perpendicular(normal: Vec3) -> Vec3 {
    normal
        .cross(least_aligned_axis(normal))
        .normalized()
        .unwrap_or(Vec3::X)
}

/// Wrap an angle into [0, 2π).
fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU { 0.0 } else { wrapped }
}
