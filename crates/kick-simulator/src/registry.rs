use std::collections::BTreeMap;

use kick_core::{BallId, Circle, FieldGeometry, VecMap, Vector2};

use crate::{Ball, Robot};

/// The live balls and robots of a match.
///
/// Balls are keyed by a [`BallId`] assigned at creation and never reused while the
/// registry lives, so removals queued during a pass stay valid no matter how
/// many other balls leave first. Robots are keyed by name and iterate in
/// registration order.
///
/// Adding and removing balls is reserved to the match, which keeps the ball
/// ledger and emits the matching notifications.
#[derive(Debug, Clone)]
pub struct EntityRegistry {
    field: FieldGeometry,
    balls: BTreeMap<BallId, Ball>,
    next_ball_id: BallId,
    robots: VecMap<String, Robot>,
}

impl EntityRegistry {
    pub fn new(field: FieldGeometry) -> Self {
        Self {
            field,
            balls: BTreeMap::new(),
            next_ball_id: BallId::new(0),
            robots: VecMap::new(),
        }
    }

    pub fn field(&self) -> &FieldGeometry {
        &self.field
    }

    pub fn ball(&self, id: BallId) -> Option<&Ball> {
        self.balls.get(&id)
    }

    pub fn ball_mut(&mut self, id: BallId) -> Option<&mut Ball> {
        self.balls.get_mut(&id)
    }

    /// Active balls in creation order.
    pub fn balls(&self) -> impl Iterator<Item = &Ball> {
        self.balls.values()
    }

    pub fn ball_ids(&self) -> Vec<BallId> {
        self.balls.keys().copied().collect()
    }

    pub fn ball_count(&self) -> usize {
        self.balls.len()
    }

    /// The active ball whose center is closest to `point`.
    pub fn nearest_ball(&self, point: Vector2) -> Option<&Ball> {
        self.balls.values().min_by(|a, b| {
            let da = (a.position - point).norm_squared();
            let db = (b.position - point).norm_squared();
            da.total_cmp(&db)
        })
    }

    pub fn robot(&self, name: &str) -> Option<&Robot> {
        self.robots.get(name)
    }

    pub fn robot_mut(&mut self, name: &str) -> Option<&mut Robot> {
        self.robots.get_mut(name)
    }

    /// Robots with their names, in registration order.
    pub fn robots(&self) -> impl Iterator<Item = (&str, &Robot)> {
        self.robots.iter().map(|(name, robot)| (name.as_str(), robot))
    }

    pub fn robot_names(&self) -> Vec<String> {
        self.robots.keys().cloned().collect()
    }

    pub(crate) fn add_ball(&mut self, position: Vector2, velocity: Vector2, radius: f64) -> BallId {
        let id = self.next_ball_id;
        self.next_ball_id = id.next();
        self.balls
            .insert(id, Ball::new(id, position, radius).with_velocity(velocity));
        id
    }

    pub(crate) fn remove_ball(&mut self, id: BallId) -> Option<Ball> {
        self.balls.remove(&id)
    }

    /// Register a robot. A robot already registered under `name` is replaced.
    pub(crate) fn add_robot(&mut self, name: impl Into<String>, robot: Robot) -> Option<Robot> {
        self.robots.insert(name.into(), robot)
    }

    /// Set the velocity of every ball overlapping `area`. Returns how many were hit.
    pub(crate) fn kick_balls(&mut self, area: &Circle, velocity: Vector2) -> usize {
        let mut kicked = 0;
        for ball in self.balls.values_mut() {
            if ball.circle().overlaps(area) {
                ball.velocity = velocity;
                kicked += 1;
            }
        }
        kicked
    }

    /// Drop all entities and restart ball ids from zero.
    pub(crate) fn clear(&mut self) {
        self.balls.clear();
        self.robots.clear();
        self.next_ball_id = BallId::new(0);
    }
}
