//! Various math tools that are mostly useful for the tessellators.

use crate::math::{vector, Point, Vector};

/// The vector perpendicular to `v`: `v` rotated a quarter turn towards the
/// outside of a clockwise contour.
#[inline]
pub fn perpendicular(v: Vector) -> Vector {
    vector(v.y, -v.x)
}

/// Whether the corner `(p1, p2, p3)` turns in the clockwise direction used
/// by the tessellators.
///
/// Collinear corners are not considered convex.
#[inline]
pub fn is_convex_corner(p1: Point, p2: Point, p3: Point) -> bool {
    (p2 - p1).cross(p3 - p2) > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::point;

    #[test]
    fn perpendicular_quarter_turn() {
        assert_eq!(perpendicular(vector(1.0, 0.0)), vector(0.0, -1.0));
        assert_eq!(perpendicular(vector(0.0, 1.0)), vector(1.0, 0.0));
        // Rotating twice negates.
        let v = vector(3.0, -2.0);
        assert_eq!(perpendicular(perpendicular(v)), -v);
    }

    #[test]
    fn convex_corner() {
        let a = point(0.0, 0.0);
        let b = point(1.0, 0.0);
        assert!(is_convex_corner(a, b, point(1.0, 1.0)));
        assert!(!is_convex_corner(a, b, point(1.0, -1.0)));
        // Straight through.
        assert!(!is_convex_corner(a, b, point(2.0, 0.0)));
    }
}
