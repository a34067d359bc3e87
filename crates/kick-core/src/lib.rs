mod angle;
mod ball_id;
mod config;
mod geom;
mod team_color;
mod vec_map;
mod world;

pub use angle::*;
pub use ball_id::*;
pub use config::*;
pub use geom::*;
pub use team_color::*;
pub use vec_map::*;
pub use world::*;

use serde::{Deserialize, Serialize};

pub type Vector2 = nalgebra::Vector2<f64>;

/// A motion command for one robot.
///
/// Velocities are in the robot's local frame: `+sx` is forward, `+sy` is to the left.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MotionCmd {
    /// Forward velocity \[m/s]
    pub sx: f64,
    /// Sideways velocity, `+` left \[m/s]
    pub sy: f64,
    /// Angular velocity, `+` counter-clockwise \[rad/s]
    pub w: f64,
    /// Kick any ball currently touching the robot
    pub kick: bool,
}

impl MotionCmd {
    pub fn zero() -> MotionCmd {
        MotionCmd::default()
    }

    pub fn new(sx: f64, sy: f64, w: f64) -> MotionCmd {
        MotionCmd {
            sx,
            sy,
            w,
            kick: false,
        }
    }

    pub fn with_kick(mut self) -> MotionCmd {
        self.kick = true;
        self
    }

    /// Body-frame linear velocity.
    pub fn velocity(&self) -> Vector2 {
        Vector2::new(self.sx, self.sy)
    }
}
