//! A binary bounding volume hierarchy with Morton-ordered leaves.

pub use self::build::BuildError;
pub use self::lbvh::{InternalNode, LeafNode, Lbvh, NodeRef};
pub use self::traversal::NearestCandidate;

mod build;
mod lbvh;
#[cfg(all(test, feature = "dim3"))]
mod tests;
mod traversal;
mod validation;
