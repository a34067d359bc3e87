use std::{f64::consts::PI, fs, path::Path};

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

use crate::{TeamColor, Vector2};

/// Lowest accepted tick rate, in Hz. Slower rates give tick intervals too long
/// to schedule.
pub const MIN_TARGET_FRAMERATE: f64 = 1.0;

/// Field dimensions. The field spans `[0, width] x [0, height]`; the yellow goal
/// is centered on the left edge and the blue goal on the right edge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldGeometry {
    /// Distance between the goal lines, in m
    pub width: f64,
    /// Distance between the touch lines, in m
    pub height: f64,
    /// Distance between the goal posts, in m
    pub goal_width: f64,
}

impl FieldGeometry {
    /// Center of the goal defended by `color`.
    pub fn goal_center(&self, color: TeamColor) -> Vector2 {
        match color {
            TeamColor::Yellow => Vector2::new(0.0, self.height / 2.0),
            TeamColor::Blue => Vector2::new(self.width, self.height / 2.0),
        }
    }

    /// Distance between the two goal centers.
    pub fn goal_separation(&self) -> f64 {
        self.width
    }

    pub fn center(&self) -> Vector2 {
        Vector2::new(self.width / 2.0, self.height / 2.0)
    }
}

impl Default for FieldGeometry {
    fn default() -> Self {
        Self {
            width: 4.5,
            height: 3.0,
            goal_width: 0.7,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallConfig {
    /// Radius of a ball in m
    pub radius: f64,
    /// Linear damping (rolling friction) in 1/s
    pub damping: f64,
}

impl Default for BallConfig {
    fn default() -> Self {
        Self {
            radius: 0.021,
            damping: 0.4,
        }
    }
}

/// Start pose and physical limits of one robot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotConfig {
    pub start_x: f64,
    pub start_y: f64,
    /// Start heading in radians, counter-clockwise from +x
    pub start_orientation: f64,
    /// Radius of the robot in m
    pub radius: f64,
    /// Maximum body-frame speed in m/s
    pub max_speed: f64,
    /// Maximum angular speed in rad/s
    pub max_angular_speed: f64,
    /// Speed given to a ball by a kick, in m/s
    pub kick_speed: f64,
}

impl RobotConfig {
    pub fn start_position(&self) -> Vector2 {
        Vector2::new(self.start_x, self.start_y)
    }

    fn default_for(color: TeamColor) -> Self {
        let field = FieldGeometry::default();
        let (start_x, start_y, start_orientation) = match color {
            TeamColor::Yellow => (0.5, 0.5, 0.0),
            TeamColor::Blue => (field.width - 0.5, field.height - 0.5, PI),
        };
        Self {
            start_x,
            start_y,
            start_orientation,
            radius: 0.125,
            max_speed: 2.0,
            max_angular_speed: 2.0 * PI,
            kick_speed: 3.0,
        }
    }
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self::default_for(TeamColor::Yellow)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Target tick rate in Hz
    pub target_framerate: f64,
}

impl SimulationConfig {
    /// Target tick interval in seconds.
    pub fn target_interval(&self) -> f64 {
        1.0 / self.target_framerate
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            target_framerate: 60.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of balls spawned at match start
    pub balls: u32,
    /// Whether balls bounce off the field boundary
    pub use_walls: bool,
    /// How far past a field edge a ball may travel before it is taken out of play
    pub ball_remove_threshold: f64,
    /// Seed for ball placement. `None` picks a fresh seed every match.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            balls: 11,
            use_walls: true,
            ball_remove_threshold: 0.1,
            seed: None,
        }
    }
}

/// Everything needed to set up a match. Read once at initialization and treated as
/// immutable for the match's lifetime.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub field: FieldGeometry,
    pub ball: BallConfig,
    pub yellow_robot: RobotConfig,
    pub blue_robot: RobotConfig,
    pub simulation: SimulationConfig,
    pub game: GameConfig,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            field: FieldGeometry::default(),
            ball: BallConfig::default(),
            yellow_robot: RobotConfig::default_for(TeamColor::Yellow),
            blue_robot: RobotConfig::default_for(TeamColor::Blue),
            simulation: SimulationConfig::default(),
            game: GameConfig::default(),
        }
    }
}

impl MatchConfig {
    /// Load a config from a JSON file. Missing fields take their default values.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: MatchConfig = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn robot(&self, color: TeamColor) -> &RobotConfig {
        match color {
            TeamColor::Yellow => &self.yellow_robot,
            TeamColor::Blue => &self.blue_robot,
        }
    }

    /// Reject configurations the simulation is not defined for.
    pub fn validate(&self) -> Result<()> {
        let field = &self.field;
        ensure!(
            field.width > 0.0 && field.height > 0.0,
            "Field dimensions must be positive, got {}x{}",
            field.width,
            field.height
        );
        ensure!(
            field.goal_width > 0.0 && field.goal_width <= field.height,
            "Goal width must be in (0, {}], got {}",
            field.height,
            field.goal_width
        );
        ensure!(
            self.ball.radius > 0.0,
            "Ball radius must be positive, got {}",
            self.ball.radius
        );
        ensure!(
            self.ball.damping >= 0.0,
            "Ball damping must not be negative, got {}",
            self.ball.damping
        );
        ensure!(
            2.0 * self.ball.radius < field.width.min(field.height),
            "Ball radius {} does not fit on the field",
            self.ball.radius
        );
        for color in [TeamColor::Yellow, TeamColor::Blue] {
            let robot = self.robot(color);
            ensure!(
                robot.radius > 0.0,
                "{} robot radius must be positive, got {}",
                color,
                robot.radius
            );
            ensure!(
                robot.max_speed >= 0.0 && robot.max_angular_speed >= 0.0 && robot.kick_speed >= 0.0,
                "{} robot speed limits must not be negative",
                color
            );
        }
        ensure!(
            self.simulation.target_framerate.is_finite()
                && self.simulation.target_framerate >= MIN_TARGET_FRAMERATE,
            "Target framerate must be at least {} Hz, got {}",
            MIN_TARGET_FRAMERATE,
            self.simulation.target_framerate
        );
        ensure!(
            self.game.ball_remove_threshold >= 0.0,
            "Ball remove threshold must not be negative, got {}",
            self.game.ball_remove_threshold
        );
        Ok(())
    }
}
