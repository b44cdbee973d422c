//! Support containers, Morton keys, and the data-parallel shim.

pub use self::cartesian_grid::CartesianGrid;
pub use self::containers::{BorrowedVec, BoundedHeap, Container, StaticVec};
pub use self::morton::MortonKey;

mod cartesian_grid;
pub mod containers;
pub mod morton;
pub(crate) mod parallel;
