use kick_core::{FieldGeometry, TeamColor};

use crate::Ball;

/// The side that gets a point for `ball`, if it is inside a goal zone.
///
/// A ball in the yellow goal scores for blue and vice versa.
pub fn goal_scored(ball: &Ball, field: &FieldGeometry) -> Option<TeamColor> {
    let in_mouth = (ball.position.y - field.height / 2.0).abs() <= field.goal_width / 2.0;
    if !in_mouth {
        return None;
    }

    if ball.position.x <= ball.radius() {
        Some(TeamColor::Blue)
    } else if ball.position.x >= field.width - ball.radius() {
        Some(TeamColor::Yellow)
    } else {
        None
    }
}

/// Score counters and the ball ledger of one match.
///
/// Every ball ever added is either still active, scored, or lost:
/// `active + scored + lost == added`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scoreboard {
    yellow: u32,
    blue: u32,
    added: u32,
    lost: u32,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self, color: TeamColor) -> u32 {
        match color {
            TeamColor::Yellow => self.yellow,
            TeamColor::Blue => self.blue,
        }
    }

    pub fn yellow(&self) -> u32 {
        self.yellow
    }

    pub fn blue(&self) -> u32 {
        self.blue
    }

    /// Balls that went into a goal.
    pub fn scored(&self) -> u32 {
        self.yellow + self.blue
    }

    pub fn added(&self) -> u32 {
        self.added
    }

    /// Balls that left the field without scoring.
    pub fn lost(&self) -> u32 {
        self.lost
    }

    /// Balls that can still be scored or already were.
    pub fn remaining(&self) -> u32 {
        self.added - self.lost
    }

    pub(crate) fn record_added(&mut self) {
        self.added += 1;
    }

    pub(crate) fn record_lost(&mut self) {
        self.lost += 1;
    }

    /// Award a point and return the new `(yellow, blue)` totals.
    pub(crate) fn award(&mut self, color: TeamColor) -> (u32, u32) {
        match color {
            TeamColor::Yellow => self.yellow += 1,
            TeamColor::Blue => self.blue += 1,
        }
        (self.yellow, self.blue)
    }

    /// Whether every ball still in the game has been scored.
    pub fn is_decided(&self) -> bool {
        self.scored() >= self.remaining()
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}
