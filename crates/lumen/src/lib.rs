#![deny(bare_trait_objects)]

//! 2D canvas tessellation and CPU path tracing.
//!
//! # Crates
//!
//! This meta-crate (`lumen`) reexports the following sub-crates for
//! convenience:
//!
//! * **lumen_canvas** - A canvas-style drawing API tessellating fills and
//!   strokes into GPU-ready triangle lists.
//! * **lumen_trace** - A BVH-accelerated Monte-Carlo path tracer over
//!   triangle, sphere and box primitives.
//! * **lumen_geom** - The shared 2D math substrate: predicates, bézier
//!   flattening and deterministic random numbers.
//!
//! Each `lumen_<name>` crate is reexported as a `<name>` module. For example:
//!
//! ```ignore
//! use lumen_canvas::Canvas;
//! ```
//!
//! Is equivalent to:
//!
//! ```ignore
//! use lumen::canvas::Canvas;
//! ```
//!
//! # Examples
//!
//! ## Tessellating a filled rectangle
//!
//! ```
//! use lumen::canvas::Canvas;
//!
//! let mut canvas = Canvas::new();
//! canvas.fill_style = 0x3366ccff;
//! canvas.rect(10.0, 10.0, 80.0, 40.0);
//! canvas.fill();
//!
//! let mut vertices = Vec::new();
//! canvas.triangulate(&mut vertices);
//! assert_eq!(vertices.len() % 5, 0);
//! ```
//!
//! ## Tracing a tiny scene
//!
//! ```
//! use lumen::trace::glam::Vec3;
//! use lumen::trace::{Bvh, Material, Primitive, RenderOptions, Renderer};
//!
//! let material = Material::default();
//! let mut scene = Bvh::new(vec![
//!     Primitive::sphere(Vec3::new(0.0, 0.0, 6.0), 2.0, material),
//!     Primitive::sphere(Vec3::new(-3.0, 1.0, 8.0), 1.5, material),
//!     Primitive::sphere(Vec3::new(2.0, -1.0, 5.0), 1.0, material),
//! ]);
//! scene.build();
//!
//! let mut renderer = Renderer::new(scene);
//! renderer.options = RenderOptions::default().with_samples_per_pixel(4);
//!
//! let mut pixels = vec![0u32; 64 * 64];
//! renderer.render(64, 64, &mut pixels, true).unwrap();
//! ```

pub use lumen_canvas as canvas;
pub use lumen_geom as geom;
pub use lumen_trace as trace;

pub use lumen_geom::math;
