use kick_core::{wrap_signed, Angle, FieldGeometry, TeamColor, Vector2};
use serde::{Deserialize, Serialize};

/// A robot pose in field coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vector2,
    pub orientation: Angle,
}

impl Pose {
    pub fn new(x: f64, y: f64, orientation: f64) -> Self {
        Self {
            position: Vector2::new(x, y),
            orientation: Angle::from_radians(orientation),
        }
    }

    pub fn x(&self) -> f64 {
        self.position.x
    }

    pub fn y(&self) -> f64 {
        self.position.y
    }
}

/// Range and bearing of both goals as seen from a robot.
///
/// Bearings are measured in the robot frame, counter-clockwise positive, from the
/// robot's heading to the direction of the goal center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandmarkReadings {
    pub yellow_distance: f64,
    pub blue_distance: f64,
    pub yellow_bearing: f64,
    pub blue_bearing: f64,
    /// The goal seen by the front-facing sensor
    pub front_goal: TeamColor,
}

impl LandmarkReadings {
    /// The noiseless readings a robot at `pose` would observe. The front goal is the
    /// one with the smaller absolute bearing.
    pub fn observe(field: &FieldGeometry, pose: &Pose) -> Self {
        let observe_goal = |color: TeamColor| {
            let delta = field.goal_center(color) - pose.position;
            let bearing = wrap_signed(delta.y.atan2(delta.x) - pose.orientation.radians());
            (delta.norm(), bearing)
        };
        let (yellow_distance, yellow_bearing) = observe_goal(TeamColor::Yellow);
        let (blue_distance, blue_bearing) = observe_goal(TeamColor::Blue);
        let front_goal = if blue_bearing.abs() <= yellow_bearing.abs() {
            TeamColor::Blue
        } else {
            TeamColor::Yellow
        };

        Self {
            yellow_distance,
            blue_distance,
            yellow_bearing,
            blue_bearing,
            front_goal,
        }
    }

    pub fn distance(&self, color: TeamColor) -> f64 {
        match color {
            TeamColor::Yellow => self.yellow_distance,
            TeamColor::Blue => self.blue_distance,
        }
    }

    pub fn bearing(&self, color: TeamColor) -> f64 {
        match color {
            TeamColor::Yellow => self.yellow_bearing,
            TeamColor::Blue => self.blue_bearing,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_observe_from_center() {
        let field = FieldGeometry::default();
        let pose = Pose {
            position: field.center(),
            orientation: Angle::ZERO,
        };

        let readings = LandmarkReadings::observe(&field, &pose);
        assert_relative_eq!(readings.yellow_distance, field.width / 2.0, epsilon = 1e-12);
        assert_relative_eq!(readings.blue_distance, field.width / 2.0, epsilon = 1e-12);
        assert_relative_eq!(readings.blue_bearing, 0.0, epsilon = 1e-12);
        assert_relative_eq!(readings.yellow_bearing, PI, epsilon = 1e-12);
        assert_eq!(readings.front_goal, TeamColor::Blue);
    }

    #[test]
    fn test_observe_facing_yellow() {
        let field = FieldGeometry::default();
        let pose = Pose::new(1.0, field.height / 2.0 + 0.5, PI);

        let readings = LandmarkReadings::observe(&field, &pose);
        assert_eq!(readings.front_goal, TeamColor::Yellow);
        // Both goals lie below the robot, i.e. to its left when facing -x
        assert!(readings.yellow_bearing > 0.0);
        assert!(readings.blue_bearing > 0.0);
    }
}
