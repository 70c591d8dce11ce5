//! Fixed vehicle routes.

use crate::error::{PlanError, PlanResult};
use crate::math::{LineSegment2d, Point2d};
use crate::util::cyclic_index;
use itertools::Itertools;

/// A closed tour which vehicles follow forever.
///
/// After the last vertex, a vehicle heads back to the first, so a route
/// with two vertices is travelled back and forth.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    vertices: Vec<Point2d>,
}

impl Route {
    /// Creates a route, rejecting routes with fewer than two vertices
    /// or with consecutive vertices in the same place.
    pub fn new(vertices: Vec<Point2d>) -> PlanResult<Self> {
        if vertices.len() < 2 {
            return Err(PlanError::RouteTooShort(vertices.len()));
        }
        for (a, b) in vertices.iter().circular_tuple_windows() {
            LineSegment2d::try_from_ends(*a, *b)?;
        }
        Ok(Self { vertices })
    }

    /// A horizontal and vertical grid of two-vertex routes across the unit square.
    ///
    /// # Parameters
    /// * `nx` - The number of horizontal routes
    /// * `ny` - The number of vertical routes
    pub fn grid(nx: usize, ny: usize) -> Vec<Self> {
        let offset = |i: usize, n: usize| {
            if n == 1 {
                0.5
            } else {
                i as f64 / (n - 1) as f64
            }
        };
        let horizontal = (0..nx).map(|i| {
            let y = offset(i, nx);
            [Point2d::new(0.0, y), Point2d::new(1.0, y)]
        });
        let vertical = (0..ny).map(|i| {
            let x = offset(i, ny);
            [Point2d::new(x, 0.0), Point2d::new(x, 1.0)]
        });
        horizontal
            .chain(vertical)
            .map(|ends| Self {
                vertices: ends.to_vec(),
            })
            .collect()
    }

    /// A square tour inset from the edges of the unit square.
    pub fn square(inset: f64) -> PlanResult<Self> {
        Self::new(vec![
            Point2d::new(inset, inset),
            Point2d::new(1.0 - inset, inset),
            Point2d::new(1.0 - inset, 1.0 - inset),
            Point2d::new(inset, 1.0 - inset),
        ])
    }

    /// The vertices of the route, in the order they are visited.
    pub fn vertices(&self) -> &[Point2d] {
        &self.vertices
    }

    /// The number of vertices on the route.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Gets the vertex at the given index, wrapping around the end of the route.
    pub fn vertex(&self, idx: usize) -> Point2d {
        self.vertices[idx % self.vertices.len()]
    }

    /// The index of the vertex after `idx`.
    pub fn next_idx(&self, idx: usize) -> usize {
        cyclic_index(idx, 1, self.vertices.len())
    }

    /// Places a vehicle part way around the route.
    ///
    /// `phase` is in `[0, 1)`; the vehicle is put midway along the edge
    /// leading to the vertex `floor(phase * len)`. Returns the index of that
    /// vertex and the vehicle's position.
    pub fn place(&self, phase: f64) -> (usize, Point2d) {
        let count = self.vertices.len();
        let target_idx = usize::min((phase * count as f64) as usize, count);
        let target_idx = if target_idx == count { 0 } else { target_idx };
        let prev = self.vertex(target_idx + count - 1);
        let target = self.vertices[target_idx];
        let pos = Point2d::new(0.5 * (prev.x + target.x), 0.5 * (prev.y + target.y));
        (target_idx, pos)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn grid_routes() {
        let routes = Route::grid(3, 1);
        assert_eq!(routes.len(), 4);
        assert_eq!(routes[1].vertices(), &[Point2d::new(0.0, 0.5), Point2d::new(1.0, 0.5)]);
        assert_eq!(routes[2].vertices(), &[Point2d::new(0.0, 1.0), Point2d::new(1.0, 1.0)]);
        assert_eq!(routes[3].vertices(), &[Point2d::new(0.5, 0.0), Point2d::new(0.5, 1.0)]);
    }

    #[test]
    fn invalid_routes() {
        let p = Point2d::new(0.2, 0.2);
        assert!(matches!(Route::new(vec![p]), Err(PlanError::RouteTooShort(1))));
        assert!(Route::new(vec![p, p]).is_err());
        assert!(Route::square(0.5).is_err());
        assert!(Route::square(0.1).is_ok());
    }

    #[test]
    fn placement() {
        let route = Route::square(0.0).unwrap();
        assert_eq!(route.place(0.0), (0, Point2d::new(0.0, 0.5)));
        assert_eq!(route.place(0.5), (2, Point2d::new(1.0, 0.5)));
        assert_eq!(route.place(0.99), (3, Point2d::new(0.5, 1.0)));
        assert_eq!(route.next_idx(3), 0);
    }
}
