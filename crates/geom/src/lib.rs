#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::many_single_char_names)]

//! Simple 2D geometric primitives on top of euclid.
//!
//! This crate is the math substrate shared by the `lumen` crates. It
//! implements the small amount of geometry the tessellators need:
//!
//! - convexity and point-in-triangle predicates,
//! - quadratic and cubic bézier curves and their flattening,
//! - a deterministic random number generator for reproducible sampling.
//!
//! # Flattening
//!
//! Flattening is the action of approximating a curve with a succession of
//! line segments. The subdivision here is adaptive: a segment is emitted as
//! soon as the combined deviation of the two control points from the chord
//! is small relative to the chord length, so flat parts of a curve produce
//! few segments and tight turns produce many.

// Reexport dependencies.
pub use euclid;

pub mod cubic_bezier;
pub mod quadratic_bezier;
pub mod rng;
mod triangle;
pub mod utils;

#[doc(inline)]
pub use crate::cubic_bezier::CubicBezierSegment;
#[doc(inline)]
pub use crate::quadratic_bezier::QuadraticBezierSegment;
#[doc(inline)]
pub use crate::rng::Rng;
#[doc(inline)]
pub use crate::triangle::Triangle;

pub mod math {
    //! f32 versions of the euclid types used everywhere. Most other lumen
    //! crates reexport them.

    /// Alias for ```euclid::default::Point2D<f32>```.
    pub type Point = euclid::default::Point2D<f32>;

    /// Alias for ```euclid::default::Vector2D<f32>```.
    pub type Vector = euclid::default::Vector2D<f32>;

    /// Alias for ```euclid::default::Box2D<f32>```.
    pub type Box2D = euclid::default::Box2D<f32>;

    /// Alias for ```euclid::default::Transform2D<f32>```.
    ///
    /// The affine `(a, b, c, d, e, f)` maps `(x, y)` to
    /// `(a·x + c·y + e, b·x + d·y + f)`.
    pub type Transform = euclid::default::Transform2D<f32>;

    /// An angle in radians (f32).
    pub type Angle = euclid::Angle<f32>;

    /// Shorthand for `Point::new(x, y)`.
    #[inline]
    pub fn point(x: f32, y: f32) -> Point {
        Point::new(x, y)
    }

    /// Shorthand for `Vector::new(x, y)`.
    #[inline]
    pub fn vector(x: f32, y: f32) -> Vector {
        Vector::new(x, y)
    }
}
