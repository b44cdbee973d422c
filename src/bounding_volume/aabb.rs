//! Axis Aligned Bounding Box.

use crate::math::{Point, Real, Vector, DIM};

/// An Axis Aligned Bounding Box.
///
/// A box is valid iff `mins[i] <= maxs[i]` on every axis. The neutral element
/// for the union is [`Aabb::new_invalid`], whose `mins` components are set to
/// `+MAX` and `maxs` components to `-MAX`.
///
/// All predicates on this type are total and finite for finite inputs; if any
/// coordinate is NaN the results are unspecified, so callers must filter NaN
/// inputs themselves.
#[cfg_attr(
    feature = "serde-serialize",
    derive(serde::Serialize, serde::Deserialize)
)]
#[derive(Debug, PartialEq, Copy, Clone)]
#[repr(C)]
pub struct Aabb {
    /// The point with the smallest coordinates of this box.
    pub mins: Point<Real>,
    /// The point with the largest coordinates of this box.
    pub maxs: Point<Real>,
}

impl Aabb {
    /// Creates a new Aabb.
    ///
    /// # Arguments:
    ///   * `mins` - position of the point with the smallest coordinates.
    ///   * `maxs` - position of the point with the highest coordinates. Each
    ///     component of `mins` must be smaller than the related components of
    ///     `maxs`.
    #[inline]
    pub fn new(mins: Point<Real>, maxs: Point<Real>) -> Aabb {
        Aabb { mins, maxs }
    }

    /// Creates an invalid Aabb with `mins` components set to `Real::MAX` and
    /// `maxs` components set to `-Real::MAX`.
    ///
    /// This is often used as the initial value of some Aabb merging
    /// algorithms.
    #[inline]
    pub fn new_invalid() -> Self {
        Self::new(
            Vector::repeat(Real::MAX).into(),
            Vector::repeat(-Real::MAX).into(),
        )
    }

    /// Creates a new Aabb from its center and its half-extents.
    #[inline]
    pub fn from_half_extents(center: Point<Real>, half_extents: Vector<Real>) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    /// Creates a zero-extent Aabb containing only `point`.
    #[inline]
    pub fn from_point(point: Point<Real>) -> Self {
        Self::new(point, point)
    }

    /// The center of this Aabb.
    #[inline]
    pub fn center(&self) -> Point<Real> {
        na::center(&self.mins, &self.maxs)
    }

    /// The extents of this Aabb.
    #[inline]
    pub fn extents(&self) -> Vector<Real> {
        self.maxs - self.mins
    }

    /// The half extents of this Aabb.
    #[inline]
    pub fn half_extents(&self) -> Vector<Real> {
        self.extents() * 0.5
    }

    /// Does `mins[i] <= maxs[i]` hold on every axis?
    #[inline]
    pub fn is_valid(&self) -> bool {
        for i in 0..DIM {
            if self.mins[i] > self.maxs[i] {
                return false;
            }
        }

        true
    }

    /// Checks if this Aabb intersects `other`, boundaries included.
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        for i in 0..DIM {
            if self.mins[i] > other.maxs[i] || other.mins[i] > self.maxs[i] {
                return false;
            }
        }

        true
    }

    /// Checks if this Aabb contains `point`, boundaries included.
    #[inline]
    pub fn contains_local_point(&self, point: &Point<Real>) -> bool {
        for i in 0..DIM {
            if point[i] < self.mins[i] || point[i] > self.maxs[i] {
                return false;
            }
        }

        true
    }

    /// The smallest Aabb containing both `self` and `other`.
    #[inline]
    pub fn merged(&self, other: &Aabb) -> Aabb {
        Aabb {
            mins: self.mins.coords.inf(&other.mins.coords).into(),
            maxs: self.maxs.coords.sup(&other.maxs.coords).into(),
        }
    }

    /// Enlarges this Aabb so it also contains `other`.
    #[inline]
    pub fn merge(&mut self, other: &Aabb) {
        *self = self.merged(other);
    }

    /// Enlarges this Aabb so it also contains the point `pt`.
    #[inline]
    pub fn take_point(&mut self, pt: Point<Real>) {
        self.mins = self.mins.coords.inf(&pt.coords).into();
        self.maxs = self.maxs.coords.sup(&pt.coords).into();
    }

    /// The squared Euclidean distance between `pt` and this Aabb.
    ///
    /// Zero iff `pt` lies inside or on the boundary of the box. Computed per
    /// axis by clamping `pt` to `[mins, maxs]` and summing the squared
    /// deltas.
    #[inline]
    pub fn distance_squared_to_point(&self, pt: &Point<Real>) -> Real {
        let mut dist = 0.0;

        for i in 0..DIM {
            let delta = pt[i] - pt[i].clamp(self.mins[i], self.maxs[i]);
            dist += delta * delta;
        }

        dist
    }
}

#[cfg(all(test, feature = "dim3"))]
mod test {
    use super::Aabb;
    use crate::math::{Point, Vector};
    use approx::assert_relative_eq;

    #[test]
    fn merge_is_componentwise() {
        let a = Aabb::new(Point::new(0.0, 0.0, 0.0), Point::new(1.0, 2.0, 3.0));
        let b = Aabb::new(Point::new(-1.0, 1.0, 2.0), Point::new(0.5, 5.0, 2.5));
        let m = a.merged(&b);
        assert_eq!(m.mins, Point::new(-1.0, 0.0, 0.0));
        assert_eq!(m.maxs, Point::new(1.0, 5.0, 3.0));
    }

    #[test]
    fn merge_with_invalid_is_identity() {
        let a = Aabb::new(Point::new(0.0, -1.0, 0.0), Point::new(1.0, 2.0, 3.0));
        assert_eq!(Aabb::new_invalid().merged(&a), a);
    }

    #[test]
    fn intersects_includes_boundaries() {
        let a = Aabb::new(Point::origin(), Point::new(1.0, 1.0, 1.0));
        let touching = Aabb::new(Point::new(1.0, 0.0, 0.0), Point::new(2.0, 1.0, 1.0));
        let disjoint = Aabb::new(Point::new(1.1, 0.0, 0.0), Point::new(2.0, 1.0, 1.0));
        assert!(a.intersects(&touching));
        assert!(touching.intersects(&a));
        assert!(!a.intersects(&disjoint));
    }

    #[test]
    fn point_distance_clamps_per_axis() {
        let aabb = Aabb::from_half_extents(Point::new(1.0, 1.0, 1.0), Vector::repeat(1.0));
        // Inside and on the boundary.
        assert_eq!(aabb.distance_squared_to_point(&Point::new(1.5, 0.5, 1.0)), 0.0);
        assert_eq!(aabb.distance_squared_to_point(&Point::new(2.0, 2.0, 2.0)), 0.0);
        // One axis out.
        assert_relative_eq!(
            aabb.distance_squared_to_point(&Point::new(3.0, 1.0, 1.0)),
            1.0
        );
        // All axes out.
        assert_relative_eq!(
            aabb.distance_squared_to_point(&Point::new(3.0, -1.0, 3.0)),
            3.0
        );
    }
}
