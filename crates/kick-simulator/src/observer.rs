use kick_core::{MatchEvent, RemovalReason, Vector2};

/// Receives match notifications synchronously, in the order they happen.
///
/// Observers only get shared references to the payloads and cannot touch the
/// match while a tick is running.
pub trait MatchObserver: Send {
    fn on_event(&mut self, event: &MatchEvent);

    /// Called when a ball overlaps a robot, another ball, or a wall.
    fn on_collision(&mut self, _position: Vector2) {}
}

/// Writes the notable notifications to the log.
#[derive(Debug, Default)]
pub struct LogObserver {
    collisions: u64,
}

impl LogObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of collision signals seen so far.
    pub fn collisions(&self) -> u64 {
        self.collisions
    }
}

impl MatchObserver for LogObserver {
    fn on_event(&mut self, event: &MatchEvent) {
        match event {
            MatchEvent::BallAdded(ball) => {
                log::trace!("Ball {} added at {}", ball.id, ball.position.transpose())
            }
            MatchEvent::BallRemoved { ball, reason } => match reason {
                RemovalReason::Goal { scored_for } => {
                    log::info!("Ball {} scored for {}", ball.id, scored_for)
                }
                RemovalReason::OutOfPlay => log::info!("Ball {} left the field", ball.id),
            },
            MatchEvent::RobotAdded { name, robot } => {
                log::debug!("Robot {} added at {}", name, robot.position.transpose())
            }
            MatchEvent::ScoreChanged { yellow, blue } => {
                log::info!("Score: yellow {} - {} blue", yellow, blue)
            }
            MatchEvent::Restarted => log::info!("Match restarted"),
            MatchEvent::GameOver {
                yellow,
                blue,
                duration,
            } => log::info!(
                "Game over after {:.1}s: yellow {} - {} blue",
                duration,
                yellow,
                blue
            ),
            MatchEvent::BallUpdated(_) | MatchEvent::RobotUpdated { .. } => {}
        }
    }

    fn on_collision(&mut self, _position: Vector2) {
        self.collisions += 1;
    }
}
