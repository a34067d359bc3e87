//! Match simulation: entities, collisions, scoring and the tick pacing that drives
//! them.

mod ball;
pub mod collision;
mod controller;
mod game;
mod observer;
mod pacing;
mod registry;
mod robot;
pub mod scoring;
mod utils;

pub use ball::Ball;
pub use controller::{Controller, SimpleAi};
pub use game::{Match, MatchBuilder};
pub use observer::{LogObserver, MatchObserver};
pub use pacing::TickPacer;
pub use registry::EntityRegistry;
pub use robot::Robot;
pub use scoring::Scoreboard;
pub use utils::IntervalTrigger;
