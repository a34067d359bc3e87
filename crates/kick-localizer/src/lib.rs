//! Pose estimation for a single robot from dead reckoning and two-landmark fixes.
//!
//! The two landmarks are the goal centers. Between fixes the estimate is advanced by
//! integrating commanded body-frame velocities; a fix intersects the two range
//! circles around the goals and recovers the heading from the bearings.

mod localizer;
mod readings;

pub use localizer::*;
pub use readings::*;
