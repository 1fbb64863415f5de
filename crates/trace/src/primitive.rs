use crate::aabb::Aabb;
use crate::intersect::{ray_aabb_intersect, ray_sphere_intersect, ray_triangle_intersect, Ray};
use glam::Vec3;

/// The lighting model of a material.
///
/// Only `Lambert` takes part in the transport loop today; the other variants
/// are accepted from scene descriptions and shaded as Lambertian.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MaterialKind {
    Lambert,
    Mirror,
    Glass,
    Disney,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Material {
    pub kind: MaterialKind,
    pub color: Vec3,
    pub emissive: Vec3,
    pub metallic: f32,
    pub roughness: f32,
}

impl Default for Material {
    fn default() -> Self {
        Material {
            kind: MaterialKind::Lambert,
            color: Vec3::new(0.8, 0.8, 0.8),
            emissive: Vec3::ZERO,
            metallic: 0.0,
            roughness: 0.1,
        }
    }
}

/// The result of a closest-hit query. `t` is `+∞` until something is hit.
#[derive(Copy, Clone, Debug)]
pub struct HitInfo {
    pub t: f32,
    pub bary: Vec3,
    pub normal: Vec3,
    pub material: Material,
}

impl Default for HitInfo {
    fn default() -> Self {
        HitInfo {
            t: f32::INFINITY,
            bary: Vec3::ZERO,
            normal: Vec3::ZERO,
            material: Material::default(),
        }
    }
}

/// The geometric variants a primitive can take.
///
/// A tagged enum rather than trait objects: the BVH leaf match is a jump
/// table and the intersection routines inline into the traversal.
#[derive(Copy, Clone, Debug)]
pub enum Shape {
    Aabox { aabb: Aabb },
    Sphere { center: Vec3, radius: f32 },
    Triangle { vertices: [Vec3; 3] },
}

/// A shape with its material and cached world-space bounds.
#[derive(Copy, Clone, Debug)]
pub struct Primitive {
    pub shape: Shape,
    pub material: Material,
    aabb: Aabb,
}

impl Primitive {
    pub fn aabox(aabb: Aabb, material: Material) -> Self {
        Primitive {
            shape: Shape::Aabox { aabb },
            material,
            aabb,
        }
    }

    pub fn sphere(center: Vec3, radius: f32, material: Material) -> Self {
        let r = Vec3::splat(radius);
        Primitive {
            shape: Shape::Sphere { center, radius },
            material,
            aabb: Aabb::new(center - r, center + r),
        }
    }

    pub fn triangle(v0: Vec3, v1: Vec3, v2: Vec3, material: Material) -> Self {
        Primitive {
            shape: Shape::Triangle {
                vertices: [v0, v1, v2],
            },
            material,
            aabb: Aabb::from_points(&[v0, v1, v2]),
        }
    }

    /// The world-space bounds, computed once at construction.
    #[inline]
    pub fn aabb(&self) -> &Aabb {
        &self.aabb
    }

    /// Intersect and fill `hit`; `hit.t` is `+∞` on a miss.
    pub fn ray_intersect(&self, ray: &Ray, hit: &mut HitInfo) -> bool {
        hit.material = self.material;
        match self.shape {
            Shape::Aabox { aabb } => {
                ray_aabb_intersect(aabb.min, aabb.max, ray, &mut hit.t, &mut hit.normal);
            }
            Shape::Sphere { center, radius } => {
                ray_sphere_intersect(center, radius, ray, &mut hit.t, &mut hit.normal);
            }
            Shape::Triangle { vertices } => {
                ray_triangle_intersect(
                    vertices[0],
                    vertices[1],
                    vertices[2],
                    ray,
                    &mut hit.t,
                    &mut hit.bary,
                    &mut hit.normal,
                );
            }
        }

        hit.t < f32::INFINITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_bounds() {
        let p = Primitive::sphere(Vec3::new(1.0, 2.0, 3.0), 2.0, Material::default());
        assert_eq!(p.aabb().min, Vec3::new(-1.0, 0.0, 1.0));
        assert_eq!(p.aabb().max, Vec3::new(3.0, 4.0, 5.0));
    }

    #[test]
    fn triangle_bounds() {
        let p = Primitive::triangle(
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 2.0),
            Vec3::new(0.0, 3.0, -1.0),
            Material::default(),
        );
        assert_eq!(p.aabb().min, Vec3::new(-1.0, 0.0, -1.0));
        assert_eq!(p.aabb().max, Vec3::new(1.0, 3.0, 2.0));
    }

    #[test]
    fn intersect_carries_material() {
        let mut material = Material::default();
        material.color = Vec3::new(1.0, 0.0, 0.0);
        let p = Primitive::sphere(Vec3::ZERO, 1.0, material);

        let mut hit = HitInfo::default();
        let ray = Ray::new(Vec3::new(0.0, 0.0, -3.0), Vec3::Z);
        assert!(p.ray_intersect(&ray, &mut hit));
        assert_eq!(hit.t, 2.0);
        assert_eq!(hit.material.color, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn miss_reports_infinity() {
        let p = Primitive::aabox(
            Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0)),
            Material::default(),
        );
        let mut hit = HitInfo::default();
        let ray = Ray::new(Vec3::new(0.0, 5.0, -3.0), Vec3::Z);
        assert!(!p.ray_intersect(&ray, &mut hit));
        assert!(hit.t.is_infinite());
    }
}
