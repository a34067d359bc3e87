use kick_core::{BallData, BallId, Circle, Vector2};

/// A ball in play.
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    id: BallId,
    pub position: Vector2,
    pub velocity: Vector2,
    radius: f64,
}

impl Ball {
    pub fn new(id: BallId, position: Vector2, radius: f64) -> Self {
        Self {
            id,
            position,
            velocity: Vector2::zeros(),
            radius,
        }
    }

    pub fn with_velocity(mut self, velocity: Vector2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn id(&self) -> BallId {
        self.id
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn circle(&self) -> Circle {
        Circle::new(self.position, self.radius)
    }

    /// Integrate the position over `dt` seconds, then apply linear damping.
    pub fn step(&mut self, dt: f64, damping: f64) {
        self.position += self.velocity * dt;
        self.velocity *= (1.0 - damping * dt).max(0.0);
    }

    pub fn data(&self) -> BallData {
        BallData {
            id: self.id,
            position: self.position,
            velocity: self.velocity,
            radius: self.radius,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_step_moves_and_damps() {
        let mut ball = Ball::new(BallId::new(0), Vector2::new(1.0, 1.0), 0.02)
            .with_velocity(Vector2::new(1.0, -0.5));
        ball.step(0.1, 0.5);

        assert_relative_eq!(ball.position.x, 1.1, epsilon = 1e-12);
        assert_relative_eq!(ball.position.y, 0.95, epsilon = 1e-12);
        assert_relative_eq!(ball.velocity.x, 0.95, epsilon = 1e-12);
        assert_relative_eq!(ball.velocity.y, -0.475, epsilon = 1e-12);
    }

    #[test]
    fn test_damping_never_reverses_velocity() {
        let mut ball = Ball::new(BallId::new(0), Vector2::zeros(), 0.02)
            .with_velocity(Vector2::new(2.0, 0.0));
        ball.step(10.0, 1.0);
        assert_eq!(ball.velocity, Vector2::zeros());
    }
}
