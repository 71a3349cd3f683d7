//! Interior cross-section synthesis.
//!
//! Between the two end rings, each interior section gets a center on the
//! straight line between the end centers (pushed outward by the end-weight
//! bulge), a plane orientation spherically interpolated between the two end
//! frames, and per-slot polar coordinates lerped index-for-index with the
//! twist term added as a rigid rotation of the whole section.

use std::f64::consts::{PI, TAU};

use super::core::{Point3, Tolerance, Transform, Vec3};
use super::polar::{PlaneFrame, PolarPoint, PolarRing};

/// Cubic Hermite tangent basis: zero at both ends, unit slope at t = 0,
/// peak 4/27 at t = 1/3. Scales the end-weight bulge of the center path.
pub(crate) fn hermite_bump(t: f64) -> f64 {
    t * t * t - 2.0 * t * t + t
}

/// Wrap an angle difference to (−π, π] so interpolation takes the short way
/// around the circle and the twist count stays the only source of extra
/// revolutions.
pub(crate) fn short_way(delta: f64) -> f64 {
    let wrapped = delta.rem_euclid(TAU);
    if wrapped > PI { wrapped - TAU } else { wrapped }
}

/// Per-slot interpolation span between the two end rings.
struct SlotSpan {
    start_radius: f64,
    end_radius: f64,
    start_angle: f64,
    /// Short-way angle difference toward the end ring.
    angle_delta: f64,
}

/// Synthesizes interior sections between two polar rings.
pub(crate) struct SectionInterpolator {
    start_frame: PlaneFrame,
    end_frame: PlaneFrame,
    /// Relative end-frame rotation; `None` when the frames coincide.
    rotation: Option<(Vec3, f64)>,
    slots: Vec<SlotSpan>,
    weight_start: f64,
    weight_end: f64,
    twist_angle: f64,
}

impl SectionInterpolator {
    pub fn new(
        start: &PolarRing,
        end: &PolarRing,
        weight_start: f64,
        weight_end: f64,
        twists: i32,
        tol: Tolerance,
    ) -> Self {
        debug_assert_eq!(start.points.len(), end.points.len());
        let slots = start
            .points
            .iter()
            .zip(&end.points)
            .map(|(a, b)| SlotSpan {
                start_radius: a.radius,
                end_radius: b.radius,
                start_angle: a.angle,
                angle_delta: short_way(b.angle - a.angle),
            })
            .collect();

        Self {
            start_frame: start.frame,
            end_frame: end.frame,
            rotation: frame_rotation(&start.frame, &end.frame, tol),
            slots,
            weight_start,
            weight_end,
            twist_angle: f64::from(twists) * TAU,
        }
    }

    /// Section frame at parameter `t`: the bulged center plus the partially
    /// applied start→end rotation.
    pub fn frame_at(&self, t: f64) -> PlaneFrame {
        let center = self.center_at(t);
        let (x_axis, y_axis, normal) = match self.rotation {
            None => (
                self.start_frame.x_axis,
                self.start_frame.y_axis,
                self.start_frame.normal,
            ),
            Some((axis, angle)) => {
                let rotation =
                    Transform::rotate_axis(axis, angle * t).unwrap_or_else(Transform::identity);
                (
                    rotation.apply_vec(self.start_frame.x_axis),
                    rotation.apply_vec(self.start_frame.y_axis),
                    rotation.apply_vec(self.start_frame.normal),
                )
            }
        };
        PlaneFrame { center, x_axis, y_axis, normal }
    }

    /// All slot points of the section at parameter `t`.
    pub fn section_at(&self, t: f64) -> Vec<Point3> {
        let frame = self.frame_at(t);
        self.slots
            .iter()
            .map(|slot| {
                let polar = PolarPoint {
                    radius: slot.start_radius + (slot.end_radius - slot.start_radius) * t,
                    angle: slot.start_angle + t * (slot.angle_delta + self.twist_angle),
                };
                frame.point_at(polar)
            })
            .collect()
    }

    /// Total extra rotation applied at t = 1, radians.
    pub fn total_twist(&self) -> f64 {
        self.twist_angle
    }

    fn center_at(&self, t: f64) -> Point3 {
        let base = self.start_frame.center.lerp(self.end_frame.center, t);
        // The end frames' normals both point forward along the tube (the
        // target ring was reversed), so the minus sign bulges outward at
        // the target end.
        let bulge = self.start_frame.normal * (self.weight_start * hermite_bump(t))
            - self.end_frame.normal * (self.weight_end * hermite_bump(1.0 - t));
        base + bulge
    }
}

/// Relative rotation taking the start frame's axes onto the end frame's, as
/// an axis and angle. `None` when the frames already coincide.
fn frame_rotation(
    start: &PlaneFrame,
    end: &PlaneFrame,
    tol: Tolerance,
) -> Option<(Vec3, f64)> {
    let r = relative_matrix(start, end);
    let trace = r[0][0] + r[1][1] + r[2][2];
    let cos_angle = ((trace - 1.0) * 0.5).clamp(-1.0, 1.0);
    let angle = cos_angle.acos();

    if angle <= tol.eps {
        return None;
    }
    if angle < PI - Tolerance::LOOSE.eps {
        let axis = Vec3::new(
            r[2][1] - r[1][2],
            r[0][2] - r[2][0],
            r[1][0] - r[0][1],
        );
        return axis.normalized().map(|axis| (axis, angle));
    }

    // Near π the skew part of the matrix vanishes; recover the axis from
    // the dominant column of R + I instead.
    let b = [
        [r[0][0] + 1.0, r[0][1], r[0][2]],
        [r[1][0], r[1][1] + 1.0, r[1][2]],
        [r[2][0], r[2][1], r[2][2] + 1.0],
    ];
    let mut column = 0;
    for candidate in 1..3 {
        if b[candidate][candidate] > b[column][column] {
            column = candidate;
        }
    }
    let axis = Vec3::new(b[0][column], b[1][column], b[2][column]);
    axis.normalized().map(|axis| (axis, angle))
}

/// R = F_end · F_startᵀ with the frame axes (x, y, normal) as columns.
fn relative_matrix(start: &PlaneFrame, end: &PlaneFrame) -> [[f64; 3]; 3] {
    let start_axes = [start.x_axis, start.y_axis, start.normal];
    let end_axes = [end.x_axis, end.y_axis, end.normal];
    let mut r = [[0.0; 3]; 3];
    for k in 0..3 {
        let e = [end_axes[k].x, end_axes[k].y, end_axes[k].z];
        let s = [start_axes[k].x, start_axes[k].y, start_axes[k].z];
        for (i, ei) in e.iter().enumerate() {
            for (j, sj) in s.iter().enumerate() {
                r[i][j] += ei * sj;
            }
        }
    }
    r
}
