//! Miscellaneous utility structs and functions.

use std::fmt::Debug;

/// A closed interval on the real number line.
#[derive(Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interval<T> {
    pub min: T,
    pub max: T,
}

impl<T> Interval<T> {
    /// Creates a new interval.
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

impl<T: PartialOrd + Copy> Interval<T> {
    /// Returns true if this interval contains the value.
    pub fn contains(&self, value: T) -> bool {
        value >= self.min && value <= self.max
    }

    /// Returns true if the interval contains no values, i.e. its bounds are inverted.
    pub fn is_empty(&self) -> bool {
        !(self.min <= self.max)
    }

    /// Computes the overlap of two intervals, if there is any.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let min = if self.min > other.min { self.min } else { other.min };
        let max = if self.max < other.max { self.max } else { other.max };
        let overlap = Self { min, max };
        (!overlap.is_empty()).then_some(overlap)
    }

    /// The smallest interval containing both intervals.
    pub fn hull(&self, other: &Self) -> Self {
        let min = if self.min < other.min { self.min } else { other.min };
        let max = if self.max > other.max { self.max } else { other.max };
        Self { min, max }
    }
}

impl<T: Debug> Debug for Interval<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Interval({:?}, {:?})", &self.min, &self.max)
    }
}

/// The index `offset` places after `start` in a cyclic sequence of `count` elements.
pub fn cyclic_index(start: usize, offset: usize, count: usize) -> usize {
    (start + offset) % count
}
