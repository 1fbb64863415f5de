use crate::math::Point;

/// Maximum number of times a curve is split in half before the subdivision
/// gives up and emits the endpoint, bounding the amount of work per curve.
const MAX_DEPTH: u32 = 10;

/// A 2D cubic bézier segment defined by its endpoints and two control points.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CubicBezierSegment {
    pub from: Point,
    pub ctrl1: Point,
    pub ctrl2: Point,
    pub to: Point,
}

impl CubicBezierSegment {
    /// Sample the curve at `t` (expected to be between zero and one).
    pub fn sample(&self, t: f32) -> Point {
        let p01 = self.from.lerp(self.ctrl1, t);
        let p12 = self.ctrl1.lerp(self.ctrl2, t);
        let p23 = self.ctrl2.lerp(self.to, t);
        let p012 = p01.lerp(p12, t);
        let p123 = p12.lerp(p23, t);

        p012.lerp(p123, t)
    }

    /// Split this curve into two sub-curves at the mid-point.
    pub fn split_in_half(&self) -> (CubicBezierSegment, CubicBezierSegment) {
        let p01 = self.from.lerp(self.ctrl1, 0.5);
        let p12 = self.ctrl1.lerp(self.ctrl2, 0.5);
        let p23 = self.ctrl2.lerp(self.to, 0.5);
        let p012 = p01.lerp(p12, 0.5);
        let p123 = p12.lerp(p23, 0.5);
        let mid = p012.lerp(p123, 0.5);

        (
            CubicBezierSegment {
                from: self.from,
                ctrl1: p01,
                ctrl2: p012,
                to: mid,
            },
            CubicBezierSegment {
                from: mid,
                ctrl1: p123,
                ctrl2: p23,
                to: self.to,
            },
        )
    }

    /// Approximate the curve with a sequence of line segments.
    ///
    /// The callback is invoked with the endpoint of each segment, in order.
    /// The starting point is not emitted: the caller already has it.
    ///
    /// A sub-curve stops subdividing when the combined deviation of its two
    /// control points from the chord is small relative to the chord,
    /// `(d₂ + d₃)² < 0.25·|chord|²`, or when `MAX_DEPTH` is reached.
    pub fn for_each_flattened<F: FnMut(Point)>(&self, callback: &mut F) {
        self.flattened_recursive(0, callback);
    }

    fn flattened_recursive<F: FnMut(Point)>(&self, depth: u32, callback: &mut F) {
        let chord = self.to - self.from;
        let d2 = (self.ctrl1 - self.to).cross(chord).abs();
        let d3 = (self.ctrl2 - self.to).cross(chord).abs();

        if (d2 + d3) * (d2 + d3) < 0.25 * chord.square_length() || depth >= MAX_DEPTH {
            callback(self.to);
            return;
        }

        let (first, second) = self.split_in_half();
        first.flattened_recursive(depth + 1, callback);
        second.flattened_recursive(depth + 1, callback);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{point, Point};

    fn flatten(curve: &CubicBezierSegment) -> Vec<Point> {
        let mut polyline = vec![curve.from];
        curve.for_each_flattened(&mut |p| polyline.push(p));
        polyline
    }

    fn distance_to_segment(p: Point, a: Point, b: Point) -> f32 {
        let ab = b - a;
        let len2 = ab.square_length();
        if len2 == 0.0 {
            return (p - a).length();
        }
        let t = ((p - a).dot(ab) / len2).max(0.0).min(1.0);
        (p - a.lerp(b, t)).length()
    }

    #[test]
    fn flatten_line() {
        // Control points on the chord: a single segment suffices.
        let curve = CubicBezierSegment {
            from: point(0.0, 0.0),
            ctrl1: point(1.0, 1.0),
            ctrl2: point(2.0, 2.0),
            to: point(3.0, 3.0),
        };
        let polyline = flatten(&curve);
        assert_eq!(polyline, vec![point(0.0, 0.0), point(3.0, 3.0)]);
    }

    #[test]
    fn flatten_ends_at_endpoint() {
        let curve = CubicBezierSegment {
            from: point(0.0, 0.0),
            ctrl1: point(0.0, 100.0),
            ctrl2: point(100.0, -100.0),
            to: point(100.0, 0.0),
        };
        let polyline = flatten(&curve);
        assert!(polyline.len() > 2);
        assert_eq!(*polyline.last().unwrap(), curve.to);
    }

    #[test]
    fn flatten_deviation_bound() {
        let curve = CubicBezierSegment {
            from: point(0.0, 0.0),
            ctrl1: point(30.0, 90.0),
            ctrl2: point(80.0, -40.0),
            to: point(100.0, 20.0),
        };
        let polyline = flatten(&curve);

        let max_chord = polyline
            .windows(2)
            .map(|w| (w[1] - w[0]).length())
            .fold(0.0f32, f32::max);

        // The flatness criterion keeps the control deviation of every
        // emitted sub-curve under half of its chord length.
        for i in 0..=100 {
            let p = curve.sample(i as f32 / 100.0);
            let d = polyline
                .windows(2)
                .map(|w| distance_to_segment(p, w[0], w[1]))
                .fold(f32::MAX, f32::min);
            assert!(d <= 0.5 * max_chord + 1e-3, "sample {i} deviates by {d}");
        }
    }

    #[test]
    fn split_in_half_matches_samples() {
        let curve = CubicBezierSegment {
            from: point(-5.0, 3.0),
            ctrl1: point(0.0, 10.0),
            ctrl2: point(7.0, -2.0),
            to: point(10.0, 4.0),
        };
        let (first, second) = curve.split_in_half();
        for i in 0..=10 {
            let t = i as f32 / 10.0;
            let a = first.sample(t);
            let b = curve.sample(t * 0.5);
            assert!((a - b).length() < 1e-4);
            let c = second.sample(t);
            let d = curve.sample(0.5 + t * 0.5);
            assert!((c - d).length() < 1e-4);
        }
    }
}
