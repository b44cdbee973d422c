/*!
canopy
======

**canopy** is a bounding volume hierarchy over axis-aligned boxes, built in
parallel from a Morton-ordered leaf array and queried in batches.

The tree is constructed once from a snapshot of primitive bounding boxes and
is immutable afterwards. Queries are expressed as predicate objects
([`query::Overlap`], [`query::Within`], [`query::Nearest`]) and can be run
one at a time through the traversal methods of [`partitioning::Lbvh`], or in
batches through [`partitioning::Lbvh::query`], which materializes all results
in a compressed-sparse-row `(offsets, indices)` pair.

```
use canopy::bounding_volume::Aabb;
use canopy::math::Point;
use canopy::partitioning::Lbvh;
use canopy::query::nearest;

let boxes = vec![
    Aabb::from_point(Point::new(0.0, 0.0, 0.0)),
    Aabb::from_point(Point::new(1.0, 0.0, 0.0)),
    Aabb::from_point(Point::new(0.0, 2.0, 0.0)),
];
let bvh = Lbvh::from_primitives(&boxes[..]).unwrap();

let mut offsets = Vec::new();
let mut indices = Vec::new();
bvh.query(
    &[nearest(Point::new(0.9, 0.1, 0.0), 2)],
    &mut offsets,
    &mut indices,
)
.unwrap();
assert_eq!(&indices[offsets[0]..offsets[1]], &[1, 0]);
```

Enable the `parallel` feature to run construction and batched queries on a
rayon thread pool.
*/

#![deny(non_camel_case_types)]
#![deny(unused_parens)]
#![deny(non_upper_case_globals)]
#![warn(missing_docs)]
#![warn(unused_imports)]
#![allow(clippy::module_inception)]
#![allow(clippy::manual_range_contains)]

#[cfg(not(any(feature = "dim2", feature = "dim3")))]
std::compile_error!("Exactly one of the `dim2` and `dim3` features must be enabled.");
#[cfg(all(feature = "dim2", feature = "dim3"))]
std::compile_error!("The `dim2` and `dim3` features cannot be enabled simultaneously.");
#[cfg(not(any(feature = "f32", feature = "f64")))]
std::compile_error!("Exactly one of the `f32` and `f64` features must be enabled.");
#[cfg(all(feature = "f32", feature = "f64"))]
std::compile_error!("The `f32` and `f64` features cannot be enabled simultaneously.");

pub extern crate na;

pub mod access;
pub mod bounding_volume;
pub mod partitioning;
pub mod query;
pub mod utils;

mod real {
    /// The scalar type used throughout this crate.
    #[cfg(feature = "f64")]
    pub use f64 as Real;

    /// The scalar type used throughout this crate.
    #[cfg(feature = "f32")]
    pub use f32 as Real;
}

/// Compilation flags dependent aliases for mathematical types.
#[cfg(feature = "dim3")]
pub mod math {
    pub use super::real::*;

    /// The dimension of the space.
    pub const DIM: usize = 3;

    /// The point type.
    pub use na::Point3 as Point;

    /// The vector type.
    pub use na::Vector3 as Vector;
}

/// Compilation flags dependent aliases for mathematical types.
#[cfg(feature = "dim2")]
pub mod math {
    pub use super::real::*;

    /// The dimension of the space.
    pub const DIM: usize = 2;

    /// The point type.
    pub use na::Point2 as Point;

    /// The vector type.
    pub use na::Vector2 as Vector;
}
