//! Spatial partitioning data structures.

pub use self::lbvh::{BuildError, InternalNode, LeafNode, Lbvh, NearestCandidate, NodeRef};
pub use self::visitor::{MatchVisitor, NearestVisitor};

mod lbvh;
mod visitor;
