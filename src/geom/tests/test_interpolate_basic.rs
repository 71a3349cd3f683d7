use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::geom::interpolate::{SectionInterpolator, hermite_bump, short_way};
use crate::geom::polar::polar_ring;
use crate::geom::ring::normalize_pair;
use crate::geom::{Point3, Tolerance, Vec3};

const EPS: f64 = 1e-9;

fn square(z: f64, clockwise: bool) -> Vec<Point3> {
    let mut points = vec![
        Point3::new(1.0, 0.0, z),
        Point3::new(0.0, 1.0, z),
        Point3::new(-1.0, 0.0, z),
        Point3::new(0.0, -1.0, z),
    ];
    if clockwise {
        points[1..].reverse();
    }
    points
}

fn interpolator(
    source: Vec<Point3>,
    target: Vec<Point3>,
    weight_start: f64,
    weight_end: f64,
    twists: i32,
) -> SectionInterpolator {
    let tol = Tolerance::default_geom();
    let (src, dst) = normalize_pair(&source, 0, &target, 0).expect("normalize should succeed");
    let src_polar = polar_ring(&src, tol);
    let dst_polar = polar_ring(&dst, tol);
    SectionInterpolator::new(&src_polar, &dst_polar, weight_start, weight_end, twists, tol)
}

fn assert_vec_close(a: Vec3, b: Vec3, eps: f64) {
    assert!((a - b).length() <= eps, "expected {a:?} ≈ {b:?}");
}

#[test]
fn bump_is_zero_at_both_ends() {
    assert!(hermite_bump(0.0).abs() <= EPS);
    assert!(hermite_bump(1.0).abs() <= EPS);
    // Peak 4/27 at t = 1/3.
    assert!((hermite_bump(1.0 / 3.0) - 4.0 / 27.0).abs() <= EPS);
    assert!((hermite_bump(0.5) - 0.125).abs() <= EPS);
}

#[test]
fn short_way_never_exceeds_half_a_turn() {
    assert!((short_way(350.0_f64.to_radians()) - (-10.0_f64.to_radians())).abs() <= EPS);
    assert!((short_way(-350.0_f64.to_radians()) - 10.0_f64.to_radians()).abs() <= EPS);
    assert!((short_way(PI) - PI).abs() <= EPS);
    assert!((short_way(-PI) - PI).abs() <= EPS);
    assert!(short_way(0.0).abs() <= EPS);
    assert!((short_way(TAU).abs()) <= EPS);
}

#[test]
fn frames_match_the_end_rings() {
    // Facing squares: identical end frames, no rotation to apply.
    let interp = interpolator(square(0.0, false), square(2.0, true), 0.0, 0.0, 0);

    let start = interp.frame_at(0.0);
    let end = interp.frame_at(1.0);

    assert_vec_close(start.normal, Vec3::Z, EPS);
    assert_vec_close(end.normal, Vec3::Z, EPS);
    assert_vec_close(start.x_axis, Vec3::X, EPS);
    assert_vec_close(end.x_axis, Vec3::X, EPS);
    assert!(start.center.distance_to(Point3::new(0.0, 0.0, 0.0)) <= EPS);
    assert!(end.center.distance_to(Point3::new(0.0, 0.0, 2.0)) <= EPS);
}

#[test]
fn opposed_frames_rotate_half_a_turn_about_the_anchor_axis() {
    // Both squares counterclockwise in world space: the target ring flips,
    // so the section plane rotates by π across the span, about the shared
    // anchor direction.
    let interp = interpolator(square(0.0, false), square(2.0, false), 0.0, 0.0, 0);

    let start = interp.frame_at(0.0);
    let middle = interp.frame_at(0.5);
    let end = interp.frame_at(1.0);

    assert_vec_close(start.normal, Vec3::Z, EPS);
    assert_vec_close(end.normal, -Vec3::Z, EPS);
    assert_vec_close(end.y_axis, -Vec3::Y, EPS);

    // Halfway the plane is vertical: rotated π/2 about +X.
    assert_vec_close(middle.x_axis, Vec3::X, EPS);
    assert_vec_close(middle.y_axis, Vec3::Z, EPS);
    assert_vec_close(middle.normal, -Vec3::Y, EPS);
}

#[test]
fn weights_displace_the_center_along_the_end_normals() {
    let interp = interpolator(square(0.0, false), square(2.0, true), 2.0, 0.0, 0);

    // Straight path plus 2·bump(t) along the source normal (+Z).
    let quarter = interp.frame_at(0.25);
    let expected_z = 0.5 + 2.0 * hermite_bump(0.25);
    assert!(quarter.center.distance_to(Point3::new(0.0, 0.0, expected_z)) <= EPS);

    // Zero weights collapse to the straight line.
    let straight = interpolator(square(0.0, false), square(2.0, true), 0.0, 0.0, 0);
    let halfway = straight.frame_at(0.5);
    assert!(halfway.center.distance_to(Point3::new(0.0, 0.0, 1.0)) <= EPS);
}

#[test]
fn twist_rotates_sections_rigidly() {
    let plain = interpolator(square(0.0, false), square(2.0, true), 0.0, 0.0, 0);
    let twisted = interpolator(square(0.0, false), square(2.0, true), 0.0, 0.0, 1);

    assert!((plain.total_twist()).abs() <= EPS);
    assert!((twisted.total_twist() - TAU).abs() <= EPS);

    // One full twist adds t·2π to every slot: at t = 0.5 the section is the
    // plain one rotated by π about the tube axis.
    let plain_ring = plain.section_at(0.5);
    let twisted_ring = twisted.section_at(0.5);
    for (p, q) in plain_ring.iter().zip(&twisted_ring) {
        assert!((q.x + p.x).abs() <= EPS);
        assert!((q.y + p.y).abs() <= EPS);
        assert!((q.z - p.z).abs() <= EPS);
    }
}

#[test]
fn slot_angles_interpolate_the_short_way() {
    // Rotate the target anchor a quarter turn: the section swings through
    // the π/2 arc toward it, never the 3π/2 long way.
    let source = square(0.0, false);
    let target = square(2.0, true);

    let tol = Tolerance::default_geom();
    let (src, dst) = normalize_pair(&source, 0, &target, 1).expect("normalize should succeed");
    let src_polar = polar_ring(&src, tol);
    let dst_polar = polar_ring(&dst, tol);
    let interp = SectionInterpolator::new(&src_polar, &dst_polar, 0.0, 0.0, 0, tol);

    let ring = interp.section_at(0.5);
    let center = Point3::new(0.0, 0.0, 1.0);
    for point in &ring {
        assert!((point.distance_to(center) - 1.0).abs() <= EPS);
    }
    // Slot 0 went from angle 0 toward the target anchor through the short
    // arc; its midpoint sits a quarter turn away at most.
    let anchor_mid = ring[0];
    let angle = anchor_mid.y.atan2(anchor_mid.x).abs();
    assert!(angle <= FRAC_PI_2 + EPS, "slot took the long way: {angle}");
}
