use kick_core::{
    Angle, Circle, FieldGeometry, MotionCmd, RobotConfig, RobotData, TeamColor, Vector2,
};
use kick_localizer::{Fix, FixError, LandmarkReadings, Localizer, Pose};

/// A robot on the field: true pose, the current motion command, and the robot's
/// own pose estimator.
#[derive(Debug, Clone)]
pub struct Robot {
    side: TeamColor,
    position: Vector2,
    orientation: Angle,
    config: RobotConfig,
    field: FieldGeometry,
    cmd: MotionCmd,
    localizer: Localizer,
}

impl Robot {
    /// Place a robot at its configured start pose. The localizer is seeded with
    /// the same pose.
    pub fn new(side: TeamColor, config: &RobotConfig, field: &FieldGeometry) -> Self {
        let pose = Pose::new(config.start_x, config.start_y, config.start_orientation);
        Self {
            side,
            position: pose.position,
            orientation: pose.orientation,
            config: config.clone(),
            field: field.clone(),
            cmd: MotionCmd::zero(),
            localizer: Localizer::with_pose(field.clone(), pose),
        }
    }

    pub fn side(&self) -> TeamColor {
        self.side
    }

    pub fn position(&self) -> Vector2 {
        self.position
    }

    pub fn orientation(&self) -> Angle {
        self.orientation
    }

    pub fn pose(&self) -> Pose {
        Pose {
            position: self.position,
            orientation: self.orientation,
        }
    }

    pub fn radius(&self) -> f64 {
        self.config.radius
    }

    pub fn config(&self) -> &RobotConfig {
        &self.config
    }

    pub fn field(&self) -> &FieldGeometry {
        &self.field
    }

    pub fn circle(&self) -> Circle {
        Circle::new(self.position, self.config.radius)
    }

    pub fn cmd(&self) -> MotionCmd {
        self.cmd
    }

    /// Set the command applied from the next physics step on. Linear and angular
    /// speeds are clamped to the robot's limits.
    pub fn set_cmd(&mut self, cmd: MotionCmd) {
        let mut cmd = cmd;
        let speed = cmd.velocity().norm();
        if speed > self.config.max_speed {
            let scale = self.config.max_speed / speed;
            cmd.sx *= scale;
            cmd.sy *= scale;
        }
        cmd.w = cmd
            .w
            .clamp(-self.config.max_angular_speed, self.config.max_angular_speed);
        self.cmd = cmd;
    }

    /// Advance the robot by `dt` seconds under the current command.
    ///
    /// The heading is integrated first and the body velocity is rotated with the
    /// new heading. The robot stays inside the field; the localizer dead-reckons
    /// with the commanded velocities.
    pub fn step(&mut self, dt: f64) {
        let cmd = self.cmd;
        self.orientation = Angle::from_radians(self.orientation.radians() + cmd.w * dt);
        self.position += self.orientation.rotate_vector(&cmd.velocity()) * dt;

        let r = self.config.radius;
        self.position.x = self.position.x.clamp(r, (self.field.width - r).max(r));
        self.position.y = self.position.y.clamp(r, (self.field.height - r).max(r));

        self.localizer.move_by(cmd.sx, cmd.sy, cmd.w, dt);
    }

    /// Consume a pending kick request.
    pub(crate) fn take_kick(&mut self) -> bool {
        std::mem::take(&mut self.cmd.kick)
    }

    /// Move the robot to a new pose and reseed its localizer there.
    pub(crate) fn teleport(&mut self, position: Vector2, orientation: Angle) {
        self.position = position;
        self.orientation = orientation;
        self.localizer.set_pose(self.pose());
    }

    /// Noiseless distances and bearings of both goals from the true pose.
    pub fn goal_readings(&self) -> LandmarkReadings {
        LandmarkReadings::observe(&self.field, &self.pose())
    }

    /// Correct the pose estimate from the current goal readings.
    pub fn localize(&mut self) -> Result<Fix, FixError> {
        let readings = self.goal_readings();
        self.localizer.update(&readings)
    }

    pub fn localizer(&self) -> &Localizer {
        &self.localizer
    }

    pub fn localizer_mut(&mut self) -> &mut Localizer {
        &mut self.localizer
    }

    pub fn data(&self) -> RobotData {
        let estimate = self.localizer.pose();
        RobotData {
            side: self.side,
            position: self.position,
            orientation: self.orientation,
            radius: self.config.radius,
            estimated_position: estimate.position,
            estimated_orientation: estimate.orientation,
        }
    }
}
