//! Fill triangulation: convex fan when possible, ear clipping otherwise.

use lumen_geom::math::Point;
use lumen_geom::utils::is_convex_corner;
use lumen_geom::Triangle;

/// Triangulate the polyline `points` as a filled polygon, appending
/// triangle-list vertices to `triangles`.
///
/// The point list is reversed in place when needed so that the output
/// winding is clockwise. Fewer than three distinct points produce nothing.
pub(crate) fn triangulate_fill(points: &mut Vec<Point>, triangles: &mut Vec<Point>) {
    if points.len() < 3 {
        return;
    }

    // Enforce clockwise winding. The sum telescopes to a difference of
    // squared x coordinates rather than the usual shoelace formula, but
    // classifies the polygons the canvas produces correctly.
    let mut sum = 0.0;
    for pair in points.windows(2) {
        sum += (pair[1].x - pair[0].x) * (pair[1].x + pair[0].x);
    }
    if sum > 0.0 {
        points.reverse();
    }

    // A closed path carries a duplicate of its first point; the triangulation
    // works on the open vertex ring.
    let mut n = points.len();
    if points[0] == points[n - 1] {
        n -= 1;
    }
    let pts = &points[..n];
    if pts.len() < 3 {
        return;
    }

    if uniform_turning_direction(pts) {
        // Convex: fan out from the first vertex.
        triangles.reserve((n - 2) * 3);
        for i in 1..n - 1 {
            triangles.push(pts[0]);
            triangles.push(pts[i]);
            triangles.push(pts[i + 1]);
        }
    } else {
        triangles.reserve((n - 2) * 3);
        ear_clip(pts, triangles);
    }
}

/// Whether every corner of the vertex ring turns the same way, in which case
/// fanning from any vertex cannot produce triangles outside the polygon.
///
/// The scan is cyclic: the corners wrapping around the end of the list count
/// too, so a polygon whose only reflex vertex sits next to the seam is still
/// sent to the ear clipper.
fn uniform_turning_direction(pts: &[Point]) -> bool {
    let n = pts.len();
    let first = is_convex_corner(pts[n - 1], pts[0], pts[1]);
    for i in 1..n {
        if is_convex_corner(pts[i - 1], pts[i], pts[(i + 1) % n]) != first {
            return false;
        }
    }

    true
}

/// Ear clipping over a doubly-linked circular vertex list.
///
/// The list is intrusive: two flat arrays of neighbor indices over the input
/// slice, so removing an ear is two writes and no allocation.
fn ear_clip(pts: &[Point], triangles: &mut Vec<Point>) {
    let n = pts.len();
    let mut prev: Vec<u32> = (0..n).map(|i| (if i == 0 { n - 1 } else { i - 1 }) as u32).collect();
    let mut next: Vec<u32> = (0..n).map(|i| (if i == n - 1 { 0 } else { i + 1 }) as u32).collect();

    let mut remaining = n;
    let mut cur = 1u32;

    while remaining > 3 {
        let p = prev[cur as usize];
        let nx = next[cur as usize];
        let a = pts[p as usize];
        let b = pts[cur as usize];
        let c = pts[nx as usize];

        // Only a convex corner can be cut off, and only if no other
        // remaining vertex lies inside the candidate triangle.
        let mut is_ear = is_convex_corner(a, b, c);
        if is_ear {
            let candidate = Triangle::new(a, b, c);
            let mut checker = next[nx as usize];
            while checker != p {
                if candidate.contains_point(pts[checker as usize]) {
                    is_ear = false;
                    break;
                }
                checker = next[checker as usize];
            }
        }

        if is_ear {
            triangles.push(a);
            triangles.push(b);
            triangles.push(c);

            next[p as usize] = nx;
            prev[nx as usize] = p;
            remaining -= 1;
        }

        cur = nx;
    }

    // The three survivors form the final triangle; start from the lowest
    // index to emit them in input order.
    let second = next[cur as usize];
    let third = next[second as usize];
    let first = cur.min(second).min(third);
    triangles.push(pts[first as usize]);
    triangles.push(pts[next[first as usize] as usize]);
    triangles.push(pts[next[next[first as usize] as usize] as usize]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_geom::math::point;

    fn fill(mut points: Vec<Point>) -> Vec<Point> {
        let mut triangles = Vec::new();
        triangulate_fill(&mut points, &mut triangles);
        triangles
    }

    fn assert_clockwise(triangles: &[Point]) {
        for tri in triangles.chunks(3) {
            let cross = (tri[1] - tri[0]).cross(tri[2] - tri[1]);
            assert!(cross >= 0.0, "counter-clockwise triangle {tri:?}");
        }
    }

    #[test]
    fn degenerate_paths_produce_nothing() {
        assert!(fill(vec![]).is_empty());
        assert!(fill(vec![point(1.0, 1.0)]).is_empty());
        assert!(fill(vec![point(1.0, 1.0), point(2.0, 2.0)]).is_empty());
        // Two distinct points closed back on themselves.
        assert!(fill(vec![point(1.0, 1.0), point(2.0, 2.0), point(1.0, 1.0)]).is_empty());
    }

    #[test]
    fn convex_fan_counts() {
        // N distinct vertices produce N - 2 triangles, closed or not.
        let square = vec![
            point(0.0, 0.0),
            point(1.0, 0.0),
            point(1.0, 1.0),
            point(0.0, 1.0),
        ];
        assert_eq!(fill(square.clone()).len(), 2 * 3);

        let mut closed = square;
        closed.push(point(0.0, 0.0));
        let triangles = fill(closed);
        assert_eq!(triangles.len(), 2 * 3);
        assert_clockwise(&triangles);
    }

    #[test]
    fn concave_hexagon_ear_clip() {
        let hexagon = vec![
            point(100.0, 0.0),
            point(200.0, 0.0),
            point(200.0, 200.0),
            point(0.0, 200.0),
            point(0.0, 100.0),
            point(100.0, 100.0),
        ];
        let triangles = fill(hexagon.clone());

        // N - 2 triangles, every vertex drawn from the input set.
        assert_eq!(triangles.len(), 4 * 3);
        for p in &triangles {
            assert!(hexagon.contains(p), "vertex {p:?} not part of the input");
        }
        assert_clockwise(&triangles);

        // The notch must stay empty: no triangle contains a point just
        // inside the concave corner.
        let probe = point(50.0, 50.0);
        for tri in triangles.chunks(3) {
            assert!(!Triangle::new(tri[0], tri[1], tri[2]).contains_point(probe));
        }
    }

    #[test]
    fn reversal_enforces_clockwise_winding() {
        // Wound counter-clockwise; the pre-pass must flip it before fanning.
        let triangles = fill(vec![point(0.0, 0.0), point(0.0, 2.0), point(3.0, 1.0)]);
        assert_eq!(triangles.len(), 3);
        assert_clockwise(&triangles);
    }

    #[test]
    fn fan_from_center_of_circle_path() {
        // An arc path as the canvas produces it: center first, then the
        // circumference samples, closed back onto the center.
        let mut points = vec![point(0.0, 0.0)];
        for i in 0..24 {
            let theta = (i as f32) * (15.0f32).to_radians();
            points.push(point(10.0 * theta.cos(), 10.0 * theta.sin()));
        }
        points.push(point(0.0, 0.0));

        let triangles = fill(points);
        assert_eq!(triangles.len(), 23 * 3);
    }
}
