//! Stroke triangulation: a polyline is extruded into a triangle strip with
//! miter joins and butt or round caps, then expanded into a triangle list.

use crate::LineCap;
use lumen_geom::math::{vector, Point, Vector};
use lumen_geom::utils::perpendicular;

/// Sine and cosine of the 18° wedge angle of a round cap: eleven wedges
/// sweep the 180° semicircle.
const CAP_WEDGE_SIN: f32 = 0.309;
const CAP_WEDGE_COS: f32 = 0.951;
const CAP_WEDGES: u32 = 11;

/// Triangulate the stroke of `points` with the given width and cap,
/// appending triangle-list vertices to `triangles`.
///
/// Fewer than two points produce nothing. A polyline whose first and last
/// point coincide is treated as closed: both ends get the averaged seam
/// miter instead of caps.
pub(crate) fn triangulate_stroke(
    points: &[Point],
    line_width: f32,
    line_cap: LineCap,
    triangles: &mut Vec<Point>,
) {
    if points.len() < 2 {
        return;
    }

    let mut strip: Vec<Point> = Vec::with_capacity(points.len() * 2);
    let h = line_width * 0.5;
    let closed = points[0] == points[points.len() - 1];

    // Start of the line.
    if closed {
        let offset = seam_miter(
            points[points.len() - 2],
            points[0],
            points[1],
        );
        strip.push(points[0] + offset * h);
        strip.push(points[0] - offset * h);
    } else {
        match line_cap {
            LineCap::Round => {
                let side = perpendicular(points[1] - points[0]).normalize();
                let mut n = side;
                for _ in 0..CAP_WEDGES {
                    strip.push(points[0]);
                    strip.push(points[0] - n * h);
                    n = rotate_wedge(n);
                }
                // Land back on the extruded edge so the first segment
                // connects to the fan.
                strip.push(points[0] + side * h);
                strip.push(points[0] - side * h);
            }
            LineCap::Butt | LineCap::Square => {
                let side = perpendicular(points[1] - points[0]).normalize();
                strip.push(points[0] + side * h);
                strip.push(points[0] - side * h);
            }
        }
    }

    // Interior corners: a miter pair per vertex.
    for i in 1..points.len() - 1 {
        let v1 = (points[i] - points[i - 1]).normalize();
        let v2 = (points[i + 1] - points[i]).normalize();

        let miter = perpendicular(v1 + v2).normalize();

        // Which side of the corner is outside, and how far the miter tip
        // sits from the spine: 1 / cos of the half angle.
        let out_sign = if v1.cross(v2) > 0.0 { 1.0 } else { -1.0 };
        let scaled = miter / miter.dot(perpendicular(v1) * out_sign);

        strip.push(points[i] + scaled * (out_sign * h));
        strip.push(points[i] - scaled * (out_sign * h));
    }

    // End of the line.
    let last = points.len() - 1;
    if closed {
        let offset = seam_miter(points[last - 1], points[last], points[1]);
        strip.push(points[last] + offset * h);
        strip.push(points[last] - offset * h);
    } else {
        match line_cap {
            LineCap::Round => {
                let side = perpendicular(points[last] - points[last - 1]).normalize();
                strip.push(points[last] + side * h);
                strip.push(points[last] - side * h);

                let mut n = side;
                for _ in 0..CAP_WEDGES {
                    strip.push(points[last]);
                    strip.push(points[last] + n * h);
                    n = rotate_wedge(n);
                }
            }
            LineCap::Butt | LineCap::Square => {
                let side = perpendicular(points[last] - points[last - 1]).normalize();
                strip.push(points[last] + side * h);
                strip.push(points[last] - side * h);
            }
        }
    }

    // Strip -> list.
    triangles.reserve((strip.len() - 2) * 3);
    for i in 1..strip.len() - 1 {
        triangles.push(strip[i - 1]);
        triangles.push(strip[i]);
        triangles.push(strip[i + 1]);
    }
}

/// The averaged miter offset at the seam of a closed polyline, where the
/// last edge meets the first one.
fn seam_miter(before: Point, at: Point, after: Point) -> Vector {
    let normal_in = perpendicular((at - before).normalize());
    let normal_out = perpendicular((after - at).normalize());
    let average = (normal_in + normal_out) * 0.5;

    // Dividing by the squared length both normalizes and applies the
    // 1 / cos(half angle) miter scale.
    average / average.square_length()
}

fn rotate_wedge(n: Vector) -> Vector {
    vector(
        n.x * CAP_WEDGE_COS - n.y * CAP_WEDGE_SIN,
        n.x * CAP_WEDGE_SIN + n.y * CAP_WEDGE_COS,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_geom::math::{point, vector};

    fn stroke(points: &[Point], width: f32, cap: LineCap) -> Vec<Point> {
        let mut triangles = Vec::new();
        triangulate_stroke(points, width, cap, &mut triangles);
        triangles
    }

    #[test]
    fn degenerate_strokes_produce_nothing() {
        assert!(stroke(&[], 10.0, LineCap::Butt).is_empty());
        assert!(stroke(&[point(1.0, 1.0)], 10.0, LineCap::Butt).is_empty());
    }

    #[test]
    fn butt_cap_segment() {
        let triangles = stroke(
            &[point(0.0, 0.0), point(10.0, 0.0)],
            4.0,
            LineCap::Butt,
        );

        // Two strip pairs expand to two triangles.
        assert_eq!(triangles.len(), 2 * 3);

        // The quad spans the segment offset by half the width each side.
        for p in &triangles {
            assert!(p.y.abs() == 2.0);
            assert!((0.0..=10.0).contains(&p.x));
        }
    }

    #[test]
    fn square_cap_matches_butt() {
        let points = [point(0.0, 0.0), point(7.0, 3.0), point(12.0, -4.0)];
        assert_eq!(
            stroke(&points, 5.0, LineCap::Butt),
            stroke(&points, 5.0, LineCap::Square)
        );
    }

    #[test]
    fn round_cap_three_point_polyline_counts() {
        // Round caps at both open ends: 12 pairs each, one miter pair in the
        // middle, 50 strip vertices in total, expanded to 48 triangles.
        let triangles = stroke(
            &[point(0.0, 0.0), point(100.0, 100.0), point(200.0, 150.0)],
            20.0,
            LineCap::Round,
        );
        assert_eq!(triangles.len(), 48 * 3);
    }

    #[test]
    fn round_cap_covers_the_tip() {
        let points = [point(0.0, 0.0), point(10.0, 0.0)];
        let butt = stroke(&points, 4.0, LineCap::Butt);
        let round = stroke(&points, 4.0, LineCap::Round);
        assert!(round.len() > butt.len());

        // Cap vertices reach beyond the endpoint but stay on the half-width
        // circle around it.
        let mut past_the_end = 0;
        for p in &round {
            if p.x > 10.0 {
                past_the_end += 1;
                let r = (*p - point(10.0, 0.0)).length();
                assert!(r < 2.0 + 1e-3);
            }
        }
        assert!(past_the_end > 0);
    }

    #[test]
    fn miter_join_offsets() {
        // A right-angle corner: the miter tip sits at sqrt(2) * h from the
        // spine, in the corner's bisector direction.
        let triangles = stroke(
            &[point(0.0, 0.0), point(10.0, 0.0), point(10.0, 10.0)],
            2.0,
            LineCap::Butt,
        );

        let h = 1.0;
        let expected = point(10.0, 0.0) + vector(1.0, -1.0).normalize() * (h * 2.0f32.sqrt());
        let found = triangles
            .iter()
            .any(|p| (*p - expected).length() < 1e-4);
        assert!(found, "missing miter tip at {expected:?}");
    }

    #[test]
    fn closed_polyline_uses_seam_miters() {
        let square = [
            point(0.0, 0.0),
            point(10.0, 0.0),
            point(10.0, 10.0),
            point(0.0, 10.0),
            point(0.0, 0.0),
        ];
        let triangles = stroke(&square, 2.0, LineCap::Round);

        // Seam pair + three interior pairs + seam pair = 10 strip vertices,
        // 8 triangles; the round cap setting plays no role on closed paths.
        assert_eq!(triangles.len(), 8 * 3);

        // Both seam miters land on the corner diagonal at sqrt(2) * h.
        let outer = point(0.0, 0.0) + vector(-1.0, -1.0).normalize() * 2.0f32.sqrt();
        assert!(triangles.iter().any(|p| (*p - outer).length() < 1e-4));
    }
}
