use super::QueryError;
use crate::bounding_volume::Aabb;
use crate::math::{Point, Real};
use crate::partitioning::{Lbvh, MatchVisitor};

/// A predicate that drives the depth-first descent with a box test.
///
/// The same test prunes internal nodes and accepts leaves: a primitive
/// matches iff its box is accepted. NaN coordinates in a predicate make the
/// results unspecified.
pub trait SpatialPredicate: Copy + Send + Sync {
    /// Should the traversal consider the contents of `aabb`?
    fn intersects(&self, aabb: &Aabb) -> bool;
}

/// Matches the primitives whose box intersects a query box, boundaries
/// included.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Overlap(pub Aabb);

impl SpatialPredicate for Overlap {
    #[inline]
    fn intersects(&self, aabb: &Aabb) -> bool {
        self.0.intersects(aabb)
    }
}

/// Matches the primitives whose box lies within Euclidean distance `radius`
/// of `center`, boundary included.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Within {
    /// The center of the search ball.
    pub center: Point<Real>,
    /// The search radius.
    pub radius: Real,
}

impl SpatialPredicate for Within {
    #[inline]
    fn intersects(&self, aabb: &Aabb) -> bool {
        aabb.distance_squared_to_point(&self.center) <= self.radius * self.radius
    }
}

/// Selects the `k` primitives whose boxes minimize the squared distance to a
/// query point.
///
/// Distance ties resolve towards the smaller primitive index. A tree with
/// fewer than `k` primitives yields them all.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Nearest {
    /// The query point.
    pub point: Point<Real>,
    /// The number of results requested. Must be at least 1.
    pub k: usize,
}

/// An overlap predicate matching the primitives whose box intersects `aabb`.
#[inline]
pub fn overlap(aabb: Aabb) -> Overlap {
    Overlap(aabb)
}

/// A radius predicate matching the primitives whose box lies within
/// `radius` of `center`.
#[inline]
pub fn within(center: Point<Real>, radius: Real) -> Within {
    Within { center, radius }
}

/// A k-nearest predicate selecting the `k` primitives closest to `point`.
#[inline]
pub fn nearest(point: Point<Real>, k: usize) -> Nearest {
    Nearest { point, k }
}

/// A query the batched engine knows how to run.
///
/// Predicates are plain `Copy + Send + Sync` data, so a batch can fan out
/// over a thread pool without further coordination. The two batch passes use
/// the same `search` with different visitors: one counting, one appending.
pub trait Predicate: Copy + Send + Sync {
    /// Checks that the predicate is structurally valid before a batched run.
    fn validate(&self) -> Result<(), QueryError> {
        Ok(())
    }

    /// Runs the traversal, reporting every matching primitive to `visitor`
    /// in traversal order.
    fn search<V: MatchVisitor>(&self, tree: &Lbvh, visitor: &mut V);
}

impl Predicate for Overlap {
    #[inline]
    fn search<V: MatchVisitor>(&self, tree: &Lbvh, visitor: &mut V) {
        tree.traverse(self, visitor);
    }
}

impl Predicate for Within {
    #[inline]
    fn search<V: MatchVisitor>(&self, tree: &Lbvh, visitor: &mut V) {
        tree.traverse(self, visitor);
    }
}

impl Predicate for Nearest {
    fn validate(&self) -> Result<(), QueryError> {
        if self.k == 0 {
            Err(QueryError::InvalidPredicate)
        } else {
            Ok(())
        }
    }

    #[inline]
    fn search<V: MatchVisitor>(&self, tree: &Lbvh, visitor: &mut V) {
        tree.traverse_nearest(self, &mut |primitive: u32, _distance: Real| {
            visitor.visit(primitive)
        });
    }
}
