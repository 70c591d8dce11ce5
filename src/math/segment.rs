use super::{Point2d, Vector2d};
use crate::error::{PlanError, PlanResult};
use crate::util::Interval;
use cgmath::prelude::*;

/// A directed straight line segment, travelled from `start` to `end`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineSegment2d {
    /// The point at which travel along the segment begins.
    pub start: Point2d,
    /// The point at which travel along the segment ends.
    pub end: Point2d,
}

impl LineSegment2d {
    /// Creates a segment from its two end points.
    pub const fn from_ends(start: Point2d, end: Point2d) -> Self {
        Self { start, end }
    }

    /// Creates a segment, rejecting zero-length and non-finite segments.
    pub fn try_from_ends(start: Point2d, end: Point2d) -> PlanResult<Self> {
        let segment = Self::from_ends(start, end);
        segment.check()?;
        Ok(segment)
    }

    /// Returns an error if the segment has no length (or non-finite coordinates),
    /// as no direction of travel can be derived from it.
    pub fn check(&self) -> PlanResult<()> {
        let length = self.length();
        if length > 0.0 && length.is_finite() {
            Ok(())
        } else {
            Err(PlanError::DegenerateSegment {
                start: [self.start.x, self.start.y],
                end: [self.end.x, self.end.y],
            })
        }
    }

    /// The length of the segment.
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// The vector from `start` to `end`.
    pub fn vector(&self) -> Vector2d {
        self.end - self.start
    }

    /// A unit vector pointing from `start` to `end`.
    /// Only meaningful for a segment which passes [Self::check].
    pub fn direction(&self) -> Vector2d {
        self.vector() / self.length()
    }

    /// The point `dist` units along the segment from its start.
    pub fn sample(&self, dist: f64) -> Point2d {
        self.start + dist * self.direction()
    }

    /// The range of valid distances along the segment, `[0, length]`.
    pub fn bounds(&self) -> Interval<f64> {
        Interval::new(0.0, self.length())
    }

    /// The portion of this segment between the given distances along it.
    pub fn subsegment(&self, dists: Interval<f64>) -> Self {
        Self::from_ends(self.sample(dists.min), self.sample(dists.max))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn sampling_is_arclength_parameterised() {
        let seg = LineSegment2d::from_ends(Point2d::new(1.0, 1.0), Point2d::new(4.0, 5.0));
        assert_approx_eq!(seg.length(), 5.0);
        let p = seg.sample(2.5);
        assert_approx_eq!(p.x, 2.5);
        assert_approx_eq!(p.y, 3.0);
        let end = seg.sample(seg.length());
        assert_approx_eq!(end.x, 4.0);
        assert_approx_eq!(end.y, 5.0);
    }

    #[test]
    fn subsegment_of_bounds() {
        let seg = LineSegment2d::from_ends(Point2d::new(0.0, 1.0), Point2d::new(0.0, 3.0));
        assert_eq!(seg.bounds(), Interval::new(0.0, 2.0));
        let sub = seg.subsegment(Interval::new(0.5, 1.5));
        assert_approx_eq!(sub.start.y, 1.5);
        assert_approx_eq!(sub.end.y, 2.5);
        assert_approx_eq!(sub.length(), 1.0);
    }

    #[test]
    fn degenerate_segments_are_rejected() {
        let p = Point2d::new(0.3, 0.3);
        assert!(LineSegment2d::try_from_ends(p, p).is_err());
        assert!(LineSegment2d::try_from_ends(p, Point2d::new(f64::NAN, 0.0)).is_err());
        assert!(LineSegment2d::try_from_ends(p, Point2d::new(0.3, 0.4)).is_ok());
    }
}
