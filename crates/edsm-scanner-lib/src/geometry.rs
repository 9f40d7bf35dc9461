//! Pure 3D helpers used by the corridor search.
//!
//! All distances are in light-years. [`distance_to_route`] measures the
//! perpendicular distance to the infinite line through the two endpoints, so a
//! system far beyond either end of the route can still score as close to it.

use crate::system::{SystemPoint, SystemRef};

/// Route lengths below this are treated as a single point.
const DEGENERATE_ROUTE_EPSILON: f64 = 1e-9;

/// Euclidean distance between two points.
pub fn distance(a: &SystemPoint, b: &SystemPoint) -> f64 {
    squared_distance(a, b).sqrt()
}

/// True when `target` lies inside (or on) the sphere of `radius` around `center`.
pub fn sphere_contains(center: &SystemPoint, radius: f64, target: &SystemPoint) -> bool {
    squared_distance(center, target) <= radius * radius
}

/// Perpendicular distance from `point` to the line through `origin` and
/// `destination`.
///
/// Endpoints (by identity) score exactly zero. When both endpoints denote the
/// same system, or their coordinates coincide, the plain distance from the
/// origin is returned instead.
pub fn distance_to_route(origin: &SystemRef, destination: &SystemRef, point: &SystemRef) -> f64 {
    if point.same_system(origin) || point.same_system(destination) {
        return 0.0;
    }

    let line = sub(&destination.coords, &origin.coords);
    let line_length = norm(&line);
    if origin.same_system(destination) || line_length < DEGENERATE_ROUTE_EPSILON {
        return distance(&origin.coords, &point.coords);
    }

    let to_point = sub(&point.coords, &origin.coords);
    norm(&cross(&to_point, &line)) / line_length
}

fn squared_distance(a: &SystemPoint, b: &SystemPoint) -> f64 {
    let d = sub(a, b);
    dot(&d, &d)
}

fn sub(a: &SystemPoint, b: &SystemPoint) -> SystemPoint {
    SystemPoint::new(a.x - b.x, a.y - b.y, a.z - b.z)
}

fn dot(a: &SystemPoint, b: &SystemPoint) -> f64 {
    a.x * b.x + a.y * b.y + a.z * b.z
}

fn cross(a: &SystemPoint, b: &SystemPoint) -> SystemPoint {
    SystemPoint::new(
        a.y * b.z - a.z * b.y,
        a.z * b.x - a.x * b.z,
        a.x * b.y - a.y * b.x,
    )
}

fn norm(v: &SystemPoint) -> f64 {
    dot(v, v).sqrt()
}
