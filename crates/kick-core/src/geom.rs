use serde::{Deserialize, Serialize};

use crate::Vector2;

/// A circle in field coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vector2,
    pub radius: f64,
}

/// The two points where a pair of circles cross.
///
/// `low` is the point with the smaller y coordinate, `high` the one with the larger.
/// For tangent circles both points coincide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleIntersections {
    pub low: Vector2,
    pub high: Vector2,
}

impl Circle {
    pub fn new(center: Vector2, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Whether the two circles overlap. Circles that merely touch do not.
    pub fn overlaps(&self, other: &Circle) -> bool {
        circles_overlap(self.center, self.radius, other.center, other.radius)
    }

    /// Finds the intersection points of two circles.
    ///
    /// Returns `None` if the centers coincide, the circles are too far apart, or one
    /// circle lies entirely inside the other.
    pub fn intersections(&self, other: &Circle) -> Option<CircleIntersections> {
        let delta = other.center - self.center;
        let d = delta.norm();
        if d < 1e-12 {
            return None;
        }
        if d > self.radius + other.radius || d < (self.radius - other.radius).abs() {
            return None;
        }

        // Distance from our center to the chord midpoint, then half chord length
        let a = (self.radius.powi(2) - other.radius.powi(2) + d.powi(2)) / (2.0 * d);
        let h = (self.radius.powi(2) - a.powi(2)).max(0.0).sqrt();
        let mid = self.center + delta * (a / d);
        let offset = Vector2::new(-delta.y, delta.x) * (h / d);

        let p1 = mid + offset;
        let p2 = mid - offset;
        let (low, high) = if p1.y <= p2.y { (p1, p2) } else { (p2, p1) };
        Some(CircleIntersections { low, high })
    }
}

/// Euclidean distance between two points.
pub fn distance(a: Vector2, b: Vector2) -> f64 {
    (b - a).norm()
}

/// Circle-circle overlap test: true iff the centers are closer than the radius sum.
pub fn circles_overlap(c1: Vector2, r1: f64, c2: Vector2, r2: f64) -> bool {
    distance(c1, c2) < r1 + r2
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_symmetric_intersection() {
        let a = Circle::new(Vector2::new(0.0, 0.0), 5.0);
        let b = Circle::new(Vector2::new(8.0, 0.0), 5.0);

        let points = a.intersections(&b).unwrap();
        assert_relative_eq!(points.low.x, 4.0, epsilon = 1e-10);
        assert_relative_eq!(points.low.y, -3.0, epsilon = 1e-10);
        assert_relative_eq!(points.high.x, 4.0, epsilon = 1e-10);
        assert_relative_eq!(points.high.y, 3.0, epsilon = 1e-10);
    }

    #[test]
    fn test_points_lie_on_both_circles() {
        let a = Circle::new(Vector2::new(0.0, 1.5), 2.2);
        let b = Circle::new(Vector2::new(4.5, 1.5), 3.1);

        let points = a.intersections(&b).unwrap();
        for p in [points.low, points.high] {
            assert_relative_eq!(distance(p, a.center), a.radius, epsilon = 1e-10);
            assert_relative_eq!(distance(p, b.center), b.radius, epsilon = 1e-10);
        }
        assert!(points.low.y < points.high.y);
    }

    #[test]
    fn test_separate_circles() {
        let a = Circle::new(Vector2::new(0.0, 0.0), 1.0);
        let b = Circle::new(Vector2::new(3.0, 0.0), 1.0);
        assert!(a.intersections(&b).is_none());
    }

    #[test]
    fn test_contained_circle() {
        let a = Circle::new(Vector2::new(0.0, 0.0), 5.0);
        let b = Circle::new(Vector2::new(1.0, 0.0), 1.0);
        assert!(a.intersections(&b).is_none());
    }

    #[test]
    fn test_concentric_circles() {
        let a = Circle::new(Vector2::new(1.0, 1.0), 2.0);
        assert!(a.intersections(&a).is_none());
    }

    #[test]
    fn test_tangent_circles() {
        let a = Circle::new(Vector2::new(0.0, 0.0), 1.0);
        let b = Circle::new(Vector2::new(2.0, 0.0), 1.0);

        let points = a.intersections(&b).unwrap();
        assert_relative_eq!(points.low.x, 1.0, epsilon = 1e-10);
        assert_relative_eq!(points.low.y, 0.0, epsilon = 1e-10);
        assert_eq!(points.low, points.high);
    }

    #[test]
    fn test_overlap_is_strict() {
        let a = Circle::new(Vector2::new(0.0, 0.0), 1.0);
        let touching = Circle::new(Vector2::new(2.0, 0.0), 1.0);
        let overlapping = Circle::new(Vector2::new(1.9, 0.0), 1.0);

        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&overlapping));
        assert!(overlapping.overlaps(&a));
    }
}
