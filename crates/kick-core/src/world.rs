use serde::{Deserialize, Serialize};

use crate::{Angle, BallId, TeamColor, Vector2};

/// Snapshot of a single ball.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct BallData {
    pub id: BallId,
    /// Position of the ball center, in m
    pub position: Vector2,
    /// Velocity in m/s
    pub velocity: Vector2,
    pub radius: f64,
}

/// Snapshot of a single robot.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RobotData {
    pub side: TeamColor,
    pub position: Vector2,
    /// Heading, counter-clockwise from +x
    pub orientation: Angle,
    pub radius: f64,
    /// The robot's own pose estimate, as reported by its localizer
    pub estimated_position: Vector2,
    pub estimated_orientation: Angle,
}

/// Why a ball left the active set.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(tag = "type", content = "data")]
pub enum RemovalReason {
    /// The ball entered a goal; the point went to `scored_for`.
    Goal { scored_for: TeamColor },
    /// The ball travelled too far past a field edge.
    OutOfPlay,
}

/// Notifications emitted by a match, in the order they happen.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum MatchEvent {
    BallAdded(BallData),
    BallUpdated(BallData),
    BallRemoved {
        ball: BallData,
        reason: RemovalReason,
    },
    RobotAdded {
        name: String,
        robot: RobotData,
    },
    RobotUpdated {
        name: String,
        robot: RobotData,
    },
    ScoreChanged {
        yellow: u32,
        blue: u32,
    },
    Restarted,
    GameOver {
        yellow: u32,
        blue: u32,
        /// Simulated match duration in seconds
        duration: f64,
    },
}

impl MatchEvent {
    /// Short name of the notification kind, used for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            MatchEvent::BallAdded(_) => "ball-added",
            MatchEvent::BallUpdated(_) => "ball-updated",
            MatchEvent::BallRemoved { .. } => "ball-removed",
            MatchEvent::RobotAdded { .. } => "robot-added",
            MatchEvent::RobotUpdated { .. } => "robot-updated",
            MatchEvent::ScoreChanged { .. } => "score-changed",
            MatchEvent::Restarted => "restarted",
            MatchEvent::GameOver { .. } => "game-over",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serializes_with_tag() {
        let event = MatchEvent::ScoreChanged { yellow: 2, blue: 1 };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "ScoreChanged");
        assert_eq!(json["data"]["yellow"], 2);
        assert_eq!(event.kind(), "score-changed");
    }

    #[test]
    fn test_removal_reason_round_trip() {
        let reason = RemovalReason::Goal {
            scored_for: TeamColor::Blue,
        };
        let json = serde_json::to_string(&reason).unwrap();
        assert_eq!(serde_json::from_str::<RemovalReason>(&json).unwrap(), reason);
    }
}
