use crate::fill::triangulate_fill;
use crate::stroke::triangulate_stroke;
use crate::{LineCap, LineJoin};
use lumen_geom::math::{point, vector, Point, Transform};
use lumen_geom::{CubicBezierSegment, QuadraticBezierSegment, Triangle};

use std::f32::consts::PI;

/// Angular step of the polyline approximation of arcs, in degrees.
const ARC_STEP_DEGREES: i32 = 15;

/// Cubic approximation constant for a 90° elliptic quadrant.
const KAPPA90: f32 = 0.552_284_75;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum PathKind {
    Fill,
    Stroke,
}

/// One path worth of accumulated geometry.
///
/// `points` is the flattened polyline in world (post-transform) space.
/// `triangles` is filled by `Canvas::triangulate` and consumed three points
/// at a time as triangle-list vertices.
pub(crate) struct PathState {
    pub done: bool,
    pub kind: PathKind,
    pub color: u32,
    pub line_width: f32,
    pub line_cap: LineCap,
    pub points: Vec<Point>,
    pub triangles: Vec<Point>,
    // Captured for parity with the canvas attributes but not consumed by the
    // stroke tessellation: interior joins always get the miter treatment.
    #[allow(dead_code)]
    pub line_join: LineJoin,
}

impl PathState {
    fn new() -> Self {
        PathState {
            done: false,
            kind: PathKind::Fill,
            color: 0x0000_00ff,
            line_width: 2.0,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            points: Vec::new(),
            triangles: Vec::new(),
        }
    }
}

/// A canvas-style immediate mode drawing API producing triangle lists.
///
/// Commands accumulate paths; the style attributes below are captured at the
/// moment `fill` or `stroke` is called, HTML-canvas fashion. Coordinates
/// passed to the commands are mapped through the current affine transform as
/// they are issued.
///
/// # Examples
///
/// ```
/// use lumen_canvas::Canvas;
///
/// let mut canvas = Canvas::new();
/// canvas.fill_style = 0xff0000ff;
/// canvas.rect(0.0, 0.0, 10.0, 10.0);
/// canvas.fill();
///
/// let mut vertices = Vec::new();
/// canvas.triangulate(&mut vertices);
/// // Two triangles, five floats (x, y, r, g, b) per vertex.
/// assert_eq!(vertices.len(), 2 * 3 * 5);
/// ```
pub struct Canvas {
    /// Fill color, packed `0xRRGGBBAA`.
    pub fill_style: u32,
    /// Stroke color, packed `0xRRGGBBAA`.
    pub stroke_style: u32,
    pub line_width: f32,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    /// Captured with the other stroke attributes; miters are currently never
    /// clamped against it.
    pub miter_limit: f32,

    paths: Vec<PathState>,
    transform: Transform,
    next_new_path: bool,
}

impl Default for Canvas {
    fn default() -> Self {
        Canvas::new()
    }
}

impl Canvas {
    pub fn new() -> Self {
        Canvas {
            fill_style: 0x0000_00ff,
            stroke_style: 0x0000_00ff,
            line_width: 2.0,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            miter_limit: 10.0,
            paths: Vec::new(),
            transform: Transform::identity(),
            next_new_path: true,
        }
    }

    /// Start a fresh path.
    pub fn begin_path(&mut self) {
        self.next_new_path = false;
        self.paths.push(PathState::new());
    }

    /// Mark the current path as finished: the next command starts a new one.
    ///
    /// This does not close the polyline; `fill` does that on its own.
    pub fn close_path(&mut self) {
        self.next_new_path = true;
    }

    /// Behaviorally identical to `line_to`: paths here are bare polylines and
    /// the first point of a fresh path needs no special treatment.
    pub fn move_to(&mut self, x: f32, y: f32) {
        self.line_to(x, y);
    }

    /// Append the transformed point to the current path, implicitly starting
    /// a new path after `close_path`.
    pub fn line_to(&mut self, x: f32, y: f32) {
        if self.next_new_path {
            self.begin_path();
        }

        let p = self.transform.transform_point(point(x, y));
        if let Some(path) = self.paths.last_mut() {
            path.points.push(p);
        }
    }

    /// Trace an axis-aligned rectangle, closing point included.
    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.move_to(x, y);
        self.line_to(x + width, y);
        self.line_to(x + width, y + height);
        self.line_to(x, y + height);
        self.line_to(x, y);
    }

    pub fn circle(&mut self, x: f32, y: f32, r: f32) {
        self.arc(x, y, r, 0.0, 2.0 * PI, false);
    }

    /// Append the arc's center followed by circumference samples every 15°
    /// from `start_angle` to `end_angle`, with one extra sample at the exact
    /// end angle when the span is not a multiple of 15°.
    ///
    /// The center point makes a subsequent `fill` produce a fan; a span that
    /// is not positive is a no-op and a span of 2π or more becomes the full
    /// circle.
    pub fn arc(
        &mut self,
        x: f32,
        y: f32,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        _counterclockwise: bool,
    ) {
        let mut start_angle = start_angle;
        let mut span = end_angle - start_angle;
        if span <= 0.0 {
            return;
        }
        if span >= 2.0 * PI {
            start_angle = 0.0;
            span = 2.0 * PI;
        }

        self.line_to(x, y);

        // Base vector that gets rotated to each sample.
        let p = vector(radius, 0.0);
        let step = (ARC_STEP_DEGREES as f32).to_radians();

        let whole_steps = (span.to_degrees() / ARC_STEP_DEGREES as f32) as i32;
        let on_step_boundary = (span.to_degrees() as i32) % ARC_STEP_DEGREES == 0;
        let samples = if on_step_boundary {
            whole_steps
        } else {
            whole_steps + 1
        };

        for i in 0..samples {
            let theta = start_angle + i as f32 * step;
            let (sin_theta, cos_theta) = theta.sin_cos();
            let sx = p.x * cos_theta + p.y * sin_theta;
            let sy = p.x * sin_theta + p.y * cos_theta;
            self.line_to(x + sx, y + sy);
        }

        if !on_step_boundary {
            let theta = start_angle + span;
            let (sin_theta, cos_theta) = theta.sin_cos();
            let sx = p.x * cos_theta + p.y * sin_theta;
            let sy = p.x * sin_theta + p.y * cos_theta;
            self.line_to(x + sx, y + sy);
        }
    }

    /// Approximate an axis-aligned ellipse with four cubic bézier quadrants.
    pub fn ellipse(&mut self, x: f32, y: f32, rx: f32, ry: f32) {
        self.move_to(x - rx, y);

        self.bezier_curve_to(x - rx, y + ry * KAPPA90, x - rx * KAPPA90, y + ry, x, y + ry);
        self.bezier_curve_to(x + rx * KAPPA90, y + ry, x + rx, y + ry * KAPPA90, x + rx, y);
        self.bezier_curve_to(x + rx, y - ry * KAPPA90, x + rx * KAPPA90, y - ry, x, y - ry);
        self.bezier_curve_to(x - rx * KAPPA90, y - ry, x - rx, y - ry * KAPPA90, x - rx, y);
    }

    /// Append a quadratic bézier from the current point, elevated to a cubic.
    pub fn quadratic_curve_to(&mut self, cpx: f32, cpy: f32, x: f32, y: f32) {
        let from = match self.paths.last().and_then(|p| p.points.last()) {
            Some(p) => *p,
            None => return,
        };

        let lifted = QuadraticBezierSegment {
            from,
            ctrl: point(cpx, cpy),
            to: point(x, y),
        }
        .to_cubic();

        self.bezier_curve_to(
            lifted.ctrl1.x,
            lifted.ctrl1.y,
            lifted.ctrl2.x,
            lifted.ctrl2.y,
            x,
            y,
        );
    }

    /// Append a cubic bézier from the current point, flattened adaptively.
    pub fn bezier_curve_to(&mut self, cp1x: f32, cp1y: f32, cp2x: f32, cp2y: f32, x: f32, y: f32) {
        let from = match self.paths.last().and_then(|p| p.points.last()) {
            Some(p) => *p,
            None => return,
        };

        let curve = CubicBezierSegment {
            from,
            ctrl1: self.transform.transform_point(point(cp1x, cp1y)),
            ctrl2: self.transform.transform_point(point(cp2x, cp2y)),
            to: self.transform.transform_point(point(x, y)),
        };

        if let Some(path) = self.paths.last_mut() {
            curve.for_each_flattened(&mut |p| path.points.push(p));
        }
    }

    /// Set (not compose) the current affine transform.
    ///
    /// `a`/`d` scale, `c`/`b` skew and `e`/`f` translate: a point maps to
    /// `(a·x + c·y + e, b·x + d·y + f)`.
    pub fn transform(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.transform = Transform::new(a, b, c, d, e, f);
    }

    /// Finalize the current path as a fill, capturing `fill_style`.
    ///
    /// The polyline is closed by appending the first point if the path does
    /// not already end where it started.
    pub fn fill(&mut self) {
        let fill_style = self.fill_style;
        if let Some(path) = self.paths.last_mut() {
            if let (Some(first), Some(last)) = (path.points.first(), path.points.last()) {
                if first != last {
                    let first = *first;
                    path.points.push(first);
                }
            }

            path.done = true;
            path.kind = PathKind::Fill;
            path.color = fill_style;
        }
    }

    /// Finalize the current path as a stroke, capturing the stroke attributes.
    pub fn stroke(&mut self) {
        let stroke_style = self.stroke_style;
        let line_width = self.line_width;
        let line_cap = self.line_cap;
        let line_join = self.line_join;
        if let Some(path) = self.paths.last_mut() {
            path.done = true;
            path.kind = PathKind::Stroke;
            path.color = stroke_style;
            path.line_width = line_width;
            path.line_cap = line_cap;
            path.line_join = line_join;
        }
    }

    /// Whether `(x, y)` lies inside the tessellated geometry of any path.
    ///
    /// The query runs against the triangles produced by `triangulate`, so it
    /// answers `false` for paths that have not been triangulated yet.
    pub fn is_point_in_path(&self, x: f32, y: f32) -> bool {
        let p = point(x, y);
        for path in &self.paths {
            for i in 1..path.triangles.len().saturating_sub(1) {
                let triangle = Triangle::new(
                    path.triangles[i - 1],
                    path.triangles[i],
                    path.triangles[i + 1],
                );
                if triangle.contains_point(p) {
                    return true;
                }
            }
        }

        false
    }

    /// Tessellate every finalized path and append the result to `vertices`
    /// as interleaved `(x, y, r, g, b)` triangle-list vertices with
    /// clockwise winding.
    pub fn triangulate(&mut self, vertices: &mut Vec<f32>) {
        for path in &mut self.paths {
            if path.done && path.triangles.is_empty() {
                match path.kind {
                    PathKind::Fill => triangulate_fill(&mut path.points, &mut path.triangles),
                    PathKind::Stroke => triangulate_stroke(
                        &path.points,
                        path.line_width,
                        path.line_cap,
                        &mut path.triangles,
                    ),
                }
            }

            let [r, g, b, _a] = rgba_components(path.color);
            for p in &path.triangles {
                vertices.push(p.x);
                vertices.push(p.y);
                vertices.push(r);
                vertices.push(g);
                vertices.push(b);
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn current_path_points(&self) -> &[Point] {
        self.paths.last().map(|p| &p.points[..]).unwrap_or(&[])
    }
}

/// Unpack `0xRRGGBBAA` into `[r, g, b, a]` in `[0, 1]`.
fn rgba_components(color: u32) -> [f32; 4] {
    [
        ((color >> 24) & 0xff) as f32 / 255.0,
        ((color >> 16) & 0xff) as f32 / 255.0,
        ((color >> 8) & 0xff) as f32 / 255.0,
        (color & 0xff) as f32 / 255.0,
    ]
}
