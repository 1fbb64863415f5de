use crate::math::Point;
use crate::CubicBezierSegment;

/// A 2D quadratic bézier segment defined by its endpoints and a control point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct QuadraticBezierSegment {
    pub from: Point,
    pub ctrl: Point,
    pub to: Point,
}

impl QuadraticBezierSegment {
    /// Sample the curve at `t` (expected to be between zero and one).
    pub fn sample(&self, t: f32) -> Point {
        let p01 = self.from.lerp(self.ctrl, t);
        let p12 = self.ctrl.lerp(self.to, t);

        p01.lerp(p12, t)
    }

    /// Elevate this segment to the cubic bézier describing the same curve,
    /// lifting the control point by the standard 1/3-2/3 rule.
    pub fn to_cubic(&self) -> CubicBezierSegment {
        CubicBezierSegment {
            from: self.from,
            ctrl1: self.from.lerp(self.ctrl, 2.0 / 3.0),
            ctrl2: self.to.lerp(self.ctrl, 2.0 / 3.0),
            to: self.to,
        }
    }

    /// Approximate the curve with a sequence of line segments.
    ///
    /// See [`CubicBezierSegment::for_each_flattened`].
    pub fn for_each_flattened<F: FnMut(Point)>(&self, callback: &mut F) {
        self.to_cubic().for_each_flattened(callback);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::point;

    #[test]
    fn to_cubic_preserves_curve() {
        let curve = QuadraticBezierSegment {
            from: point(0.0, 0.0),
            ctrl: point(10.0, 10.0),
            to: point(20.0, 0.0),
        };
        let cubic = curve.to_cubic();
        for i in 0..=20 {
            let t = i as f32 / 20.0;
            assert!((curve.sample(t) - cubic.sample(t)).length() < 1e-4);
        }
    }
}
