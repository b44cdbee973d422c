//! Access facade between user primitive storage and the tree builder.

use crate::bounding_volume::Aabb;
use crate::math::{Point, Real};

/// The facade through which the builder reads user primitives.
///
/// The tree keeps only indices in `0..len()`; the primitives themselves stay
/// in the caller's storage. Implement this trait for custom containers to
/// index them without first copying their bounding boxes into a
/// `Vec<Aabb>`. Implementations are provided for slices and vectors of
/// boxes, and for slices and vectors of points (treated as zero-extent
/// boxes).
pub trait PrimitiveSet {
    /// The number of primitives.
    fn len(&self) -> usize;

    /// The bounding box of the `i`-th primitive.
    fn get(&self, i: usize) -> Aabb;

    /// Is the set empty?
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PrimitiveSet for [Aabb] {
    #[inline]
    fn len(&self) -> usize {
        <[Aabb]>::len(self)
    }

    #[inline]
    fn get(&self, i: usize) -> Aabb {
        self[i]
    }
}

impl PrimitiveSet for Vec<Aabb> {
    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }

    #[inline]
    fn get(&self, i: usize) -> Aabb {
        self[i]
    }
}

impl PrimitiveSet for [Point<Real>] {
    #[inline]
    fn len(&self) -> usize {
        <[Point<Real>]>::len(self)
    }

    #[inline]
    fn get(&self, i: usize) -> Aabb {
        Aabb::from_point(self[i])
    }
}

impl PrimitiveSet for Vec<Point<Real>> {
    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }

    #[inline]
    fn get(&self, i: usize) -> Aabb {
        Aabb::from_point(self[i])
    }
}
