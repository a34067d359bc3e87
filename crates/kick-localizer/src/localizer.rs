use std::f64::consts::PI;

use kick_core::{
    distance, wrap_positive, wrap_signed, Angle, Circle, CircleIntersections, FieldGeometry,
    TeamColor, Vector2,
};
use thiserror::Error;

use crate::{LandmarkReadings, Pose};

/// How far `|offset / distance|` may exceed 1 through rounding before the sample is
/// rejected instead of clamped.
const ZERO_ANGLE_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FixError {
    #[error(
        "range circles do not intersect (yellow {yellow_distance}, blue {blue_distance}, \
         goal separation {separation})"
    )]
    NoIntersection {
        yellow_distance: f64,
        blue_distance: f64,
        separation: f64,
    },
    #[error("bearing signs are inconclusive and there is no prior pose to compare against")]
    Ambiguous,
    #[error("zero-bearing angle for the {landmark} goal is undefined (asin of {ratio})")]
    OrientationUndefined { landmark: TeamColor, ratio: f64 },
}

/// Which rule picked the intersection candidate of a fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disambiguation {
    /// Both bearings had the same sign; the front goal decided.
    BearingSign,
    /// Bearing signs differed; the candidate closest to the prior estimate won.
    Continuity,
}

/// Result of a successful absolute correction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fix {
    pub pose: Pose,
    pub disambiguation: Disambiguation,
    /// Arc between the headings recovered from each goal, in [0, pi]. Large values
    /// hint at inconsistent readings.
    pub heading_disagreement: f64,
}

/// Pose estimator for one robot.
///
/// The estimate changes only through [`Localizer::move_by`] (dead reckoning) and
/// [`Localizer::update`] (landmark fix), or when explicitly seeded.
#[derive(Debug, Clone)]
pub struct Localizer {
    field: FieldGeometry,
    pose: Pose,
    /// Whether `pose` comes from a seed or a previous fix. Without one, a fix whose
    /// bearing signs disagree cannot be resolved.
    has_reference: bool,
}

impl Localizer {
    /// Create a localizer with no prior estimate.
    pub fn new(field: FieldGeometry) -> Self {
        Self {
            field,
            pose: Pose::default(),
            has_reference: false,
        }
    }

    /// Create a localizer seeded with a known pose, eg. the robot's start position.
    pub fn with_pose(field: FieldGeometry, pose: Pose) -> Self {
        let mut localizer = Self::new(field);
        localizer.set_pose(pose);
        localizer
    }

    /// Overwrite the estimate with a trusted pose.
    pub fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
        self.has_reference = true;
    }

    /// Forget the estimate. The next fix must be decided by the bearing signs.
    pub fn reset(&mut self) {
        self.pose = Pose::default();
        self.has_reference = false;
    }

    pub fn has_reference(&self) -> bool {
        self.has_reference
    }

    /// The current estimate.
    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// Dead reckoning: advance the estimate by body-frame velocities `(vx, vy)` and
    /// angular velocity `omega` applied for `dt` seconds.
    ///
    /// The heading is updated first and the velocity is rotated into the world frame
    /// with the new heading.
    pub fn move_by(&mut self, vx: f64, vy: f64, omega: f64, dt: f64) {
        let orientation = wrap_positive(self.pose.orientation.radians() + omega * dt);
        let (sin, cos) = orientation.sin_cos();
        self.pose.position.x += (vx * cos - vy * sin) * dt;
        self.pose.position.y += (vx * sin + vy * cos) * dt;
        self.pose.orientation = Angle::from_radians(orientation);
    }

    /// Absolute correction from the ranges and bearings of both goals.
    ///
    /// On error the previous estimate is kept untouched and the sample should be
    /// treated as dropped.
    pub fn update(&mut self, readings: &LandmarkReadings) -> Result<Fix, FixError> {
        let fix = self.solve(readings).map_err(|err| {
            log::debug!("Dropping landmark fix: {}", err);
            err
        })?;

        self.pose = fix.pose;
        self.has_reference = true;
        Ok(fix)
    }

    fn solve(&self, readings: &LandmarkReadings) -> Result<Fix, FixError> {
        let yellow_circle = Circle::new(
            self.field.goal_center(TeamColor::Yellow),
            readings.yellow_distance,
        );
        let blue_circle = Circle::new(
            self.field.goal_center(TeamColor::Blue),
            readings.blue_distance,
        );
        let candidates =
            yellow_circle
                .intersections(&blue_circle)
                .ok_or(FixError::NoIntersection {
                    yellow_distance: readings.yellow_distance,
                    blue_distance: readings.blue_distance,
                    separation: self.field.goal_separation(),
                })?;

        let (position, disambiguation) = self.pick_candidate(&candidates, readings)?;

        let offset = position.y - self.field.height / 2.0;
        let zero_yellow = zero_bearing_angle(offset, readings.yellow_distance, TeamColor::Yellow)?;
        let zero_blue = zero_bearing_angle(offset, readings.blue_distance, TeamColor::Blue)?;

        let yellow_bearing = wrap_positive(readings.yellow_bearing);
        let blue_bearing = wrap_positive(readings.blue_bearing);
        let from_yellow = Angle::from_radians(PI - (yellow_bearing - zero_yellow));
        let from_blue = Angle::from_radians(-zero_blue - blue_bearing);

        Ok(Fix {
            pose: Pose {
                position,
                orientation: Angle::circular_mean(from_yellow, from_blue),
            },
            disambiguation,
            heading_disagreement: Angle::distance(from_yellow, from_blue),
        })
    }

    /// Choose between the two circle intersections.
    ///
    /// With both goals on the same side of the heading, the front goal tells which
    /// side of the goal line the robot is on. Otherwise the candidate closest to the
    /// current estimate wins.
    fn pick_candidate(
        &self,
        candidates: &CircleIntersections,
        readings: &LandmarkReadings,
    ) -> Result<(Vector2, Disambiguation), FixError> {
        let yellow_sign = wrap_signed(readings.yellow_bearing);
        let blue_sign = wrap_signed(readings.blue_bearing);
        let facing_blue = readings.front_goal == TeamColor::Blue;

        if yellow_sign > 0.0 && blue_sign > 0.0 {
            let position = if facing_blue {
                candidates.low
            } else {
                candidates.high
            };
            return Ok((position, Disambiguation::BearingSign));
        }
        if yellow_sign < 0.0 && blue_sign < 0.0 {
            let position = if facing_blue {
                candidates.high
            } else {
                candidates.low
            };
            return Ok((position, Disambiguation::BearingSign));
        }

        if !self.has_reference {
            return Err(FixError::Ambiguous);
        }
        let prior = self.pose.position;
        let position = if distance(candidates.high, prior) < distance(candidates.low, prior) {
            candidates.high
        } else {
            candidates.low
        };
        Ok((position, Disambiguation::Continuity))
    }
}

/// Heading offset of a goal caused by the robot sitting off the field's center line.
fn zero_bearing_angle(offset: f64, distance: f64, landmark: TeamColor) -> Result<f64, FixError> {
    let ratio = offset / distance;
    if !ratio.is_finite() || ratio.abs() > 1.0 + ZERO_ANGLE_TOLERANCE {
        return Err(FixError::OrientationUndefined { landmark, ratio });
    }
    if ratio.abs() > 1.0 {
        log::warn!(
            "Clamping zero-bearing ratio {} for the {} goal",
            ratio,
            landmark
        );
    }
    Ok(ratio.clamp(-1.0, 1.0).asin())
}

#[cfg(test)]
mod tests {
    use std::f64::consts::TAU;

    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;

    fn field() -> FieldGeometry {
        FieldGeometry {
            width: 4.5,
            height: 3.0,
            goal_width: 0.7,
        }
    }

    fn assert_pose_eq(actual: Pose, expected: Pose) {
        assert_relative_eq!(actual.x(), expected.x(), epsilon = 1e-6);
        assert_relative_eq!(actual.y(), expected.y(), epsilon = 1e-6);
        assert!(
            Angle::distance(actual.orientation, expected.orientation) < 1e-6,
            "orientation {} != {}",
            actual.orientation,
            expected.orientation
        );
    }

    #[test]
    fn test_round_trip_in_every_quadrant() {
        let field = field();
        let poses = [
            Pose::new(3.2, 2.3, 5f64.to_radians()),
            Pose::new(1.0, 2.4, 190f64.to_radians()),
            Pose::new(1.2, 0.6, 170f64.to_radians()),
            Pose::new(3.5, 0.8, 10f64.to_radians()),
        ];

        for pose in poses {
            let readings = LandmarkReadings::observe(&field, &pose);
            let mut localizer = Localizer::new(field.clone());

            let fix = localizer.update(&readings).unwrap();
            assert_eq!(fix.disambiguation, Disambiguation::BearingSign);
            assert!(fix.heading_disagreement < 1e-9);
            assert_pose_eq(localizer.pose(), pose);
        }
    }

    #[test]
    fn test_round_trip_with_heading_near_zero() {
        let field = field();
        let pose = Pose::new(2.8, 1.1, -2f64.to_radians());
        let readings = LandmarkReadings::observe(&field, &pose);
        let mut localizer = Localizer::with_pose(field, Pose::new(2.7, 1.0, 0.0));

        localizer.update(&readings).unwrap();
        assert_pose_eq(localizer.pose(), pose);
    }

    #[test]
    fn test_mixed_signs_use_prior_estimate() {
        let field = field();
        let pose = Pose::new(3.2, 2.3, 20f64.to_radians());
        let readings = LandmarkReadings::observe(&field, &pose);
        assert!(readings.yellow_bearing.signum() != readings.blue_bearing.signum());

        let mut localizer = Localizer::with_pose(field.clone(), Pose::new(3.0, 2.1, 0.3));
        let fix = localizer.update(&readings).unwrap();
        assert_eq!(fix.disambiguation, Disambiguation::Continuity);
        assert_pose_eq(localizer.pose(), pose);

        // A prior on the wrong side of the goal line picks the mirrored candidate
        let mut localizer = Localizer::with_pose(field.clone(), Pose::new(3.2, 0.5, 0.3));
        localizer.update(&readings).unwrap();
        assert_relative_eq!(localizer.pose().y(), field.height - pose.y(), epsilon = 1e-9);
    }

    #[test]
    fn test_mixed_signs_without_prior_is_ambiguous() {
        let field = field();
        let pose = Pose::new(3.2, 2.3, 20f64.to_radians());
        let readings = LandmarkReadings::observe(&field, &pose);

        let mut localizer = Localizer::new(field);
        assert_eq!(localizer.update(&readings), Err(FixError::Ambiguous));
        assert!(!localizer.has_reference());
        assert_eq!(localizer.pose(), Pose::default());
    }

    #[test]
    fn test_first_fix_enables_continuity() {
        let field = field();
        let mut localizer = Localizer::new(field.clone());
        let first = Pose::new(3.2, 2.3, 5f64.to_radians());
        localizer
            .update(&LandmarkReadings::observe(&field, &first))
            .unwrap();

        let second = Pose::new(3.25, 2.3, 20f64.to_radians());
        let fix = localizer
            .update(&LandmarkReadings::observe(&field, &second))
            .unwrap();
        assert_eq!(fix.disambiguation, Disambiguation::Continuity);
        assert_pose_eq(localizer.pose(), second);
    }

    #[test]
    fn test_non_intersecting_circles_keep_pose() {
        let field = field();
        let seed = Pose::new(1.0, 1.0, 1.0);
        let mut localizer = Localizer::with_pose(field.clone(), seed);

        let readings = LandmarkReadings {
            yellow_distance: field.width / 2.0 - 0.5,
            blue_distance: field.width / 2.0 - 0.5,
            yellow_bearing: 0.5,
            blue_bearing: 0.5,
            front_goal: TeamColor::Blue,
        };

        let result = localizer.update(&readings);
        assert!(matches!(result, Err(FixError::NoIntersection { .. })));
        assert_eq!(localizer.pose(), seed);
    }

    #[test]
    fn test_degenerate_distance_is_rejected() {
        let field = field();
        let seed = Pose::new(1.0, 1.0, 1.0);
        let mut localizer = Localizer::with_pose(field.clone(), seed);

        // Tangent circles touching at the yellow goal center: 0 / 0 offset ratio
        let readings = LandmarkReadings {
            yellow_distance: 0.0,
            blue_distance: field.width,
            yellow_bearing: 0.5,
            blue_bearing: 0.5,
            front_goal: TeamColor::Blue,
        };

        let result = localizer.update(&readings);
        assert!(matches!(
            result,
            Err(FixError::OrientationUndefined {
                landmark: TeamColor::Yellow,
                ..
            })
        ));
        assert_eq!(localizer.pose(), seed);
    }

    #[test]
    fn test_zero_bearing_angle_domain() {
        assert_relative_eq!(
            zero_bearing_angle(0.5, 1.0, TeamColor::Blue).unwrap(),
            PI / 6.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            zero_bearing_angle(1.0 + 1e-12, 1.0, TeamColor::Blue).unwrap(),
            PI / 2.0,
            epsilon = 1e-9
        );
        assert!(zero_bearing_angle(1.5, 1.0, TeamColor::Yellow).is_err());
    }

    #[test]
    fn test_move_straight() {
        let mut localizer = Localizer::with_pose(field(), Pose::new(1.0, 1.0, PI / 2.0));
        localizer.move_by(1.0, 0.0, 0.0, 0.5);

        let pose = localizer.pose();
        assert_relative_eq!(pose.x(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(pose.y(), 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_move_uses_updated_heading() {
        let mut localizer = Localizer::with_pose(field(), Pose::new(0.0, 0.0, 0.0));
        localizer.move_by(1.0, 0.0, PI, 0.5);

        let pose = localizer.pose();
        assert_relative_eq!(pose.orientation.radians(), PI / 2.0, epsilon = 1e-12);
        assert_relative_eq!(pose.x(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(pose.y(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_move_sideways() {
        let mut localizer = Localizer::with_pose(field(), Pose::new(0.0, 0.0, 0.0));
        localizer.move_by(0.0, 2.0, 0.0, 0.25);
        assert_relative_eq!(localizer.pose().x(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(localizer.pose().y(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_orientation_stays_wrapped() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut localizer = Localizer::new(field());

        for _ in 0..10_000 {
            let omega = rng.gen_range(-50.0..50.0);
            let dt = rng.gen_range(0.0..0.2);
            localizer.move_by(0.1, -0.1, omega, dt);

            let orientation = localizer.pose().orientation.radians();
            assert!((0.0..TAU).contains(&orientation), "{}", orientation);
        }

        // Exact negative multiples of the turn must not land on 2pi
        let mut localizer = Localizer::new(field());
        localizer.move_by(0.0, 0.0, -TAU, 1.0);
        assert!(localizer.pose().orientation.radians() < TAU);
    }
}
