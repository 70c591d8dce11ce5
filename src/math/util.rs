use super::{LineSegment2d, Point2d};
use cgmath::prelude::*;

/// Tolerance used when comparing distances for equality.
const DIST_EPSILON: f64 = 1e-9;

/// Finds the point on the segment `s1`-`s2` closest to `point`.
///
/// # Parameters
/// * `point` - The point to project
/// * `s1` - The start of the segment
/// * `s2` - The end of the segment
pub fn closest_point_to_segment(point: Point2d, s1: Point2d, s2: Point2d) -> Point2d {
    let u = point - s1;
    let v = s2 - s1;
    let len2 = v.magnitude2();
    if len2 == 0.0 {
        return s1;
    }

    let t = v.dot(u) / len2;
    if (0.0..=1.0).contains(&t) {
        s1 + t * v
    } else if point.distance2(s1) < point.distance2(s2) {
        s1
    } else {
        s2
    }
}

/// Computes the shortest distance between `point` and the segment `s1`-`s2`.
pub fn distance_to_segment(point: Point2d, s1: Point2d, s2: Point2d) -> f64 {
    point.distance(closest_point_to_segment(point, s1, s2))
}

/// Determines whether `point` lies on the segment `s1`-`s2`, within a small tolerance.
pub fn point_on_segment(point: Point2d, s1: Point2d, s2: Point2d) -> bool {
    let a = point.distance(s1);
    let b = point.distance(s2);
    let c = s1.distance(s2);
    (a + b - c).abs() <= DIST_EPSILON * f64::max(1.0, c)
}

/// Determines whether the triangle with the given corners has three acute angles.
/// Right-angled and degenerate triangles are not acute.
pub fn is_acute_triangle(p1: Point2d, p2: Point2d, p3: Point2d) -> bool {
    let mut sides = [
        p1.distance2(p2),
        p1.distance2(p3),
        p2.distance2(p3),
    ];
    sides.sort_by(f64::total_cmp);
    sides[2] < sides[0] + sides[1]
}

impl LineSegment2d {
    /// Finds the point on this segment closest to `point`.
    pub fn closest_point(&self, point: Point2d) -> Point2d {
        closest_point_to_segment(point, self.start, self.end)
    }

    /// Computes the shortest distance between `point` and this segment.
    pub fn distance_to(&self, point: Point2d) -> f64 {
        distance_to_segment(point, self.start, self.end)
    }

    /// Determines whether `point` lies on this segment.
    pub fn contains_point(&self, point: Point2d) -> bool {
        point_on_segment(point, self.start, self.end)
    }
}
