//! Closed-form ray intersection routines.
//!
//! All of them report a miss by writing `t = +∞`, which keeps the traversal
//! code free of option-juggling on the hot path.

use glam::Vec3;

/// A ray with normalized direction.
#[derive(Copy, Clone, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Ray { origin, direction }
    }

    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Slab-method predicate: does the ray's line cross the box at all?
pub fn ray_aabb_hit(pmin: Vec3, pmax: Vec3, ray: &Ray) -> bool {
    let t_min = (pmin - ray.origin) / ray.direction;
    let t_max = (pmax - ray.origin) / ray.direction;

    let t1 = t_min.min(t_max);
    let t2 = t_max.max(t_min);

    let t_near = t1.max_element();
    let t_far = t2.min_element();

    t_far >= t_near
}

/// Slab-method ray/box intersection with entry distance and face normal.
///
/// When the origin is inside the box the reported distance is the exit
/// distance instead, so the hit point is always on the surface.
pub fn ray_aabb_intersect(pmin: Vec3, pmax: Vec3, ray: &Ray, t: &mut f32, normal: &mut Vec3) {
    let t_min = (pmin - ray.origin) / ray.direction;
    let t_max = (pmax - ray.origin) / ray.direction;

    let t1 = t_min.min(t_max);
    let t2 = t_max.max(t_min);

    let t_near = t1.max_element();
    let t_far = t2.min_element();

    if t_far >= t_near {
        *t = if t_near > 0.0 { t_near } else { t_far };

        // The normal lies on whichever axis bounds the entry distance,
        // facing back along the ray.
        *normal = Vec3::ZERO;
        if t1.x == t_near {
            normal.x = -ray.direction.x.signum();
        }
        if t1.y == t_near {
            normal.y = -ray.direction.y.signum();
        }
        if t1.z == t_near {
            normal.z = -ray.direction.z.signum();
        }
    } else {
        *t = f32::INFINITY;
    }
}

/// Ray/sphere intersection: the near root of the quadratic, and the outward
/// normal at the hit point.
pub fn ray_sphere_intersect(center: Vec3, radius: f32, ray: &Ray, t: &mut f32, normal: &mut Vec3) {
    let oc = ray.origin - center;
    let a = ray.direction.dot(ray.direction);
    let b = 2.0 * oc.dot(ray.direction);
    let c = oc.dot(oc) - radius * radius;
    let discriminant = b * b - 4.0 * a * c;

    if discriminant >= 0.0 {
        *t = (-b - discriminant.sqrt()) / (2.0 * a);
        *normal = (ray.at(*t) - center).normalize();
    } else {
        *t = f32::INFINITY;
    }
}

/// Möller–Trumbore ray/triangle intersection with barycentric coordinates
/// `(u, v, 1-u-v)` and the flat-shaded face normal.
pub fn ray_triangle_intersect(
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    ray: &Ray,
    t: &mut f32,
    bary: &mut Vec3,
    normal: &mut Vec3,
) {
    let e0 = v1 - v0;
    let e1 = v2 - v0;
    let pv = ray.direction.cross(e1);
    let det = e0.dot(pv);

    let tv = ray.origin - v0;
    let qv = tv.cross(e0);

    let u = tv.dot(pv) / det;
    let v = ray.direction.dot(qv) / det;
    let dist = e1.dot(qv) / det;

    let w = 1.0 - u - v;
    if u >= 0.0 && v >= 0.0 && w >= 0.0 && dist >= 0.0 {
        *t = dist;
        *bary = Vec3::new(u, v, w);
        *normal = e0.cross(e1).normalize();
    } else {
        *t = f32::INFINITY;
    }
}
