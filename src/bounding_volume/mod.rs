//! Axis-aligned bounding volumes.

pub use self::aabb::Aabb;

mod aabb;
