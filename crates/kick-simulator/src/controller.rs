use kick_core::{wrap_signed, MotionCmd, Vector2};

use crate::{utils::IntervalTrigger, EntityRegistry};

/// Something that drives robots once per tick, after robot physics.
pub trait Controller: Send {
    fn step(&mut self, dt: f64, world: &mut EntityRegistry);

    /// Called when the match restarts.
    fn reset(&mut self) {}
}

const TURN_GAIN: f64 = 4.0;
/// Only drive forward when the target is within this angle of the heading
const DRIVE_CONE: f64 = 0.6;
/// Only kick when the opponent goal is within this angle of the heading
const KICK_CONE: f64 = 0.5;
const KICK_MARGIN: f64 = 0.01;

/// Scripted player: chases the nearest ball using its own pose estimate and
/// kicks when it touches one while facing the opponent goal. The estimate is
/// corrected from the goal readings every `fix_interval` seconds.
#[derive(Debug, Clone)]
pub struct SimpleAi {
    robot: String,
    fix_trigger: IntervalTrigger,
    fix_interval: f64,
    time: f64,
}

impl SimpleAi {
    pub fn new(robot: impl Into<String>) -> Self {
        Self::with_fix_interval(robot, 0.5)
    }

    pub fn with_fix_interval(robot: impl Into<String>, fix_interval: f64) -> Self {
        Self {
            robot: robot.into(),
            fix_trigger: IntervalTrigger::new(fix_interval),
            fix_interval,
            time: 0.0,
        }
    }

    pub fn robot(&self) -> &str {
        &self.robot
    }

    pub fn fix_interval(&self) -> f64 {
        self.fix_interval
    }
}

impl Controller for SimpleAi {
    fn step(&mut self, dt: f64, world: &mut EntityRegistry) {
        self.time += dt;
        let relocalize = self.fix_trigger.trigger(self.time);

        let Some(robot) = world.robot_mut(&self.robot) else {
            log::warn!("SimpleAi: no robot named {}", self.robot);
            return;
        };
        if relocalize {
            if let Err(err) = robot.localize() {
                log::debug!("{}: landmark fix dropped: {}", self.robot, err);
            }
        }

        let pose = robot.localizer().pose();
        let reach = robot.radius();
        let max_speed = robot.config().max_speed;
        let side = robot.side();
        let goal = world.field().goal_center(side.opponent());
        let heading_to = |target: Vector2| {
            let delta = target - pose.position;
            wrap_signed(delta.y.atan2(delta.x) - pose.orientation.radians())
        };

        let cmd = match world.nearest_ball(pose.position) {
            Some(ball) => {
                let ball_error = heading_to(ball.position);
                let sx = if ball_error.abs() < DRIVE_CONE {
                    max_speed * (1.0 - ball_error.abs() / DRIVE_CONE)
                } else {
                    0.0
                };
                let cmd = MotionCmd::new(sx, 0.0, ball_error * TURN_GAIN);

                let touching =
                    (ball.position - pose.position).norm() < reach + ball.radius() + KICK_MARGIN;
                if touching && heading_to(goal).abs() < KICK_CONE {
                    cmd.with_kick()
                } else {
                    cmd
                }
            }
            None => MotionCmd::zero(),
        };

        if let Some(robot) = world.robot_mut(&self.robot) {
            robot.set_cmd(cmd);
        }
    }

    fn reset(&mut self) {
        self.time = 0.0;
        self.fix_trigger.reset();
    }
}

#[cfg(test)]
mod tests {
    use kick_core::{FieldGeometry, RobotConfig, TeamColor};

    use super::*;
    use crate::Robot;

    fn world_with_robot(x: f64, y: f64, orientation: f64) -> EntityRegistry {
        let mut world = EntityRegistry::new(FieldGeometry::default());
        let config = RobotConfig {
            start_x: x,
            start_y: y,
            start_orientation: orientation,
            ..Default::default()
        };
        let robot = Robot::new(TeamColor::Yellow, &config, world.field());
        world.add_robot("yellow", robot);
        world
    }

    #[test]
    fn test_turns_towards_ball() {
        let mut world = world_with_robot(1.0, 1.0, 0.0);
        world.add_ball(Vector2::new(1.0, 2.0), Vector2::zeros(), 0.021);

        let mut ai = SimpleAi::new("yellow");
        ai.step(0.01, &mut world);

        let cmd = world.robot("yellow").unwrap().cmd();
        assert!(cmd.w > 0.0);
        assert_eq!(cmd.sx, 0.0);
        assert!(!cmd.kick);
    }

    #[test]
    fn test_kicks_towards_opponent_goal() {
        let mut world = world_with_robot(2.0, 1.5, 0.0);
        world.add_ball(Vector2::new(2.14, 1.5), Vector2::zeros(), 0.021);

        let mut ai = SimpleAi::new("yellow");
        ai.step(0.01, &mut world);

        let cmd = world.robot("yellow").unwrap().cmd();
        assert!(cmd.kick);
        assert!(cmd.sx > 0.0);
    }

    #[test]
    fn test_idle_without_balls() {
        let mut world = world_with_robot(2.0, 1.5, 0.0);
        let mut ai = SimpleAi::new("yellow");
        ai.step(0.01, &mut world);
        assert_eq!(world.robot("yellow").unwrap().cmd(), MotionCmd::zero());

        let mut lost = SimpleAi::new("nobody");
        lost.step(0.01, &mut world);
    }
}
