use kick_core::FieldGeometry;

use crate::Ball;

/// Reflect a ball off the field boundary `[0, width] x [0, height]`.
///
/// A ball crossing an edge is put back against it and the velocity component
/// normal to that edge is turned inward. Returns true if any edge was hit.
pub fn collide_walls(ball: &mut Ball, field: &FieldGeometry) -> bool {
    let r = ball.radius();
    let mut hit = false;

    if ball.position.x < r {
        ball.position.x = r;
        ball.velocity.x = ball.velocity.x.abs();
        hit = true;
    } else if ball.position.x > field.width - r {
        ball.position.x = field.width - r;
        ball.velocity.x = -ball.velocity.x.abs();
        hit = true;
    }

    if ball.position.y < r {
        ball.position.y = r;
        ball.velocity.y = ball.velocity.y.abs();
        hit = true;
    } else if ball.position.y > field.height - r {
        ball.position.y = field.height - r;
        ball.velocity.y = -ball.velocity.y.abs();
        hit = true;
    }

    hit
}

/// Whether a ball is more than `threshold` past any field edge.
pub fn is_out_of_play(ball: &Ball, field: &FieldGeometry, threshold: f64) -> bool {
    let p = ball.position;
    p.x < -threshold
        || p.x > field.width + threshold
        || p.y < -threshold
        || p.y > field.height + threshold
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use kick_core::{BallId, Vector2};

    use super::*;

    fn ball_at(x: f64, y: f64, vx: f64, vy: f64) -> Ball {
        Ball::new(BallId::new(0), Vector2::new(x, y), 0.1).with_velocity(Vector2::new(vx, vy))
    }

    #[test]
    fn test_reflects_off_left_wall() {
        let field = FieldGeometry::default();
        let mut ball = ball_at(0.05, 1.0, -1.0, 0.3);

        assert!(collide_walls(&mut ball, &field));
        assert_relative_eq!(ball.position.x, 0.1);
        assert_relative_eq!(ball.velocity.x, 1.0);
        assert_relative_eq!(ball.velocity.y, 0.3);
    }

    #[test]
    fn test_reflects_off_corner() {
        let field = FieldGeometry::default();
        let mut ball = ball_at(field.width, field.height + 0.5, 1.0, 2.0);

        assert!(collide_walls(&mut ball, &field));
        assert_relative_eq!(ball.position.x, field.width - 0.1);
        assert_relative_eq!(ball.position.y, field.height - 0.1);
        assert_relative_eq!(ball.velocity.x, -1.0);
        assert_relative_eq!(ball.velocity.y, -2.0);
    }

    #[test]
    fn test_no_contact_inside_field() {
        let field = FieldGeometry::default();
        let mut ball = ball_at(1.0, 1.0, -1.0, 1.0);
        let before = ball.clone();

        assert!(!collide_walls(&mut ball, &field));
        assert_eq!(ball, before);
    }

    #[test]
    fn test_out_of_play_threshold() {
        let field = FieldGeometry::default();
        assert!(!is_out_of_play(&ball_at(-0.05, 1.0, 0.0, 0.0), &field, 0.1));
        assert!(is_out_of_play(&ball_at(-0.15, 1.0, 0.0, 0.0), &field, 0.1));
        assert!(is_out_of_play(
            &ball_at(1.0, field.height + 0.2, 0.0, 0.0),
            &field,
            0.1
        ));
        assert!(!is_out_of_play(&ball_at(field.width, field.height, 0.0, 0.0), &field, 0.0));
    }
}
