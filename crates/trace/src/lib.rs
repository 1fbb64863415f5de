#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::float_cmp)]
#![allow(clippy::too_many_arguments)]

//! A small CPU path tracer with BVH acceleration.
//!
//! ## Overview
//!
//! The scene is a flat list of [`Primitive`](enum.Shape.html)s (axis-aligned
//! boxes, spheres, triangles) carrying Lambertian materials. A
//! [`Bvh`](struct.Bvh.html) built over the list by recursive median splits
//! accelerates the closest-hit queries, and a [`Renderer`](struct.Renderer.html)
//! integrates multi-bounce diffuse lighting with cosine-weighted importance
//! sampling, writing packed RGB words into a caller-provided pixel buffer.
//!
//! Pixels are independent: the renderer schedules them either sequentially
//! or over rayon's thread pool, with bit-identical results because every
//! (pixel, sample) pair derives its own deterministic RNG seed.
//!
//! The asset pipeline is not part of this crate; anything that can produce a
//! `Vec<Primitive>` (an `.obj` triangulator, a voxel grid, procedural code)
//! can feed a scene in.

// Reexport dependencies.
pub use glam;

mod aabb;
mod bvh;
mod camera;
mod intersect;
mod primitive;
mod renderer;
pub mod sampling;

pub use crate::aabb::Aabb;
pub use crate::bvh::{Bvh, BvhMode};
pub use crate::camera::Camera;
pub use crate::intersect::{
    ray_aabb_hit, ray_aabb_intersect, ray_sphere_intersect, ray_triangle_intersect, Ray,
};
pub use crate::primitive::{HitInfo, Material, MaterialKind, Primitive, Shape};
pub use crate::renderer::{RenderError, RenderOptions, RenderOutput, Renderer};
