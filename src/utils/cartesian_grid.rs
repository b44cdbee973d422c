//! Uniform cartesian grid over an axis-aligned box.

use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, DIM};

/// A uniform grid subdividing an axis-aligned box into cells.
///
/// Cells are addressed by a single flattened index, with the first axis
/// varying fastest. Axes with zero extent collapse to a single cell.
#[derive(Clone, Debug)]
pub struct CartesianGrid {
    bounds: Aabb,
    h: [Real; DIM],
    n: [usize; DIM],
}

impl CartesianGrid {
    /// Creates a grid over `bounds` with cubic cells of size `h`.
    ///
    /// Panics if `h` is not positive or if the cell count would overflow the
    /// flattened index range.
    pub fn new(bounds: Aabb, h: Real) -> Self {
        Self::with_cell_sizes(bounds, [h; DIM])
    }

    /// Creates a grid over `bounds` with per-axis cell sizes.
    ///
    /// Panics under the same conditions as [`CartesianGrid::new`].
    pub fn with_cell_sizes(bounds: Aabb, h: [Real; DIM]) -> Self {
        let mut n = [1; DIM];
        for d in 0..DIM {
            assert!(h[d] > 0.0, "cell sizes must be positive");
            let delta = bounds.maxs[d] - bounds.mins[d];
            if delta != 0.0 {
                n[d] = (delta / h[d]).ceil() as usize;
                assert!(n[d] > 0);
            }
        }

        // Conservative early check that flattened cell indices stay
        // representable, whichever cells end up being used.
        let mut m = usize::MAX;
        for d in 1..DIM {
            m /= n[d - 1];
            assert!(n[d] < m, "cell index range overflow");
        }

        Self { bounds, h, n }
    }

    /// The flattened index of the cell containing `point`.
    ///
    /// `point` must lie inside the grid bounds.
    pub fn cell_index(&self, point: &Point<Real>) -> usize {
        let mut index = 0;
        for d in (0..DIM).rev() {
            let i = ((point[d] - self.bounds.mins[d]) / self.h[d]).floor() as usize;
            index = index * self.n[d] + i.min(self.n[d] - 1);
        }
        index
    }

    /// The box covered by the cell at the given flattened index.
    pub fn cell_box(&self, mut cell: usize) -> Aabb {
        let mut mins = self.bounds.mins;
        let mut maxs = self.bounds.mins;
        for d in 0..DIM {
            let i = cell % self.n[d];
            cell /= self.n[d];

            maxs[d] = mins[d] + (i + 1) as Real * self.h[d];
            mins[d] += i as Real * self.h[d];
        }
        Aabb::new(mins, maxs)
    }

    /// The number of cells along the given axis.
    pub fn extent(&self, axis: usize) -> usize {
        assert!(axis < DIM);
        self.n[axis]
    }

    /// The total number of cells.
    pub fn cell_count(&self) -> usize {
        self.n.iter().product()
    }
}

#[cfg(all(test, feature = "dim3"))]
mod test {
    use super::CartesianGrid;
    use crate::bounding_volume::Aabb;
    use crate::math::Point;

    #[test]
    fn cell_index_and_box_are_consistent() {
        let bounds = Aabb::new(Point::origin(), Point::new(10.0, 10.0, 10.0));
        let grid = CartesianGrid::new(bounds, 2.5);
        assert_eq!(grid.extent(0), 4);
        assert_eq!(grid.cell_count(), 64);

        for cell in 0..grid.cell_count() {
            let cell_box = grid.cell_box(cell);
            assert_eq!(grid.cell_index(&cell_box.center()), cell);
        }
    }

    #[test]
    fn first_axis_varies_fastest() {
        let bounds = Aabb::new(Point::origin(), Point::new(4.0, 4.0, 4.0));
        let grid = CartesianGrid::new(bounds, 1.0);
        assert_eq!(grid.cell_index(&Point::new(0.5, 0.5, 0.5)), 0);
        assert_eq!(grid.cell_index(&Point::new(1.5, 0.5, 0.5)), 1);
        assert_eq!(grid.cell_index(&Point::new(0.5, 1.5, 0.5)), 4);
        assert_eq!(grid.cell_index(&Point::new(0.5, 0.5, 1.5)), 16);
    }

    #[test]
    fn zero_extent_axes_collapse_to_one_cell() {
        let bounds = Aabb::new(Point::new(0.0, 3.0, 0.0), Point::new(8.0, 3.0, 8.0));
        let grid = CartesianGrid::new(bounds, 2.0);
        assert_eq!(grid.extent(1), 1);
        assert_eq!(grid.cell_count(), 16);
    }

    #[test]
    #[should_panic]
    fn nonpositive_cell_size_fails_fast() {
        let bounds = Aabb::new(Point::origin(), Point::new(1.0, 1.0, 1.0));
        let _ = CartesianGrid::new(bounds, 0.0);
    }
}
