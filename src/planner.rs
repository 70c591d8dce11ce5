//! Exact planning of when and where a walking passenger can board a vehicle,
//! and where they should get off.

pub use dropoff::{best_dropoff, best_dropoff_on_segment, DropoffCandidate, TimetableDropoff};
pub use reachable::{reachable_region, ReachableRegion};
pub use timetable::{AccessibleTimetable, TimedSegment, Timetable};

mod dropoff;
mod reachable;
mod timetable;
