use crate::bounding_volume::Aabb;

const LEAF_FLAG: u32 = 1 << 31;

/// The index of a tree node, with the node's category (leaf or internal)
/// packed in-band in the high bit.
#[cfg_attr(
    feature = "serde-serialize",
    derive(serde::Serialize, serde::Deserialize)
)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct NodeRef(u32);

impl NodeRef {
    /// The greatest index representable next to the in-band category bit.
    pub(super) const MAX_INDEX: u32 = !LEAF_FLAG;

    pub(super) const INVALID: NodeRef = NodeRef(u32::MAX);

    /// A reference to the `index`-th leaf node.
    #[inline]
    pub fn leaf(index: u32) -> Self {
        debug_assert!((index & LEAF_FLAG) == 0);
        Self(index | LEAF_FLAG)
    }

    /// A reference to the `index`-th internal node.
    #[inline]
    pub fn internal(index: u32) -> Self {
        debug_assert!((index & LEAF_FLAG) == 0);
        Self(index)
    }

    /// Does this reference point to a leaf?
    #[inline]
    pub fn is_leaf(self) -> bool {
        (self.0 & LEAF_FLAG) != 0
    }

    /// The index of the referenced node inside its category's array.
    #[inline]
    pub fn index(self) -> usize {
        (self.0 & !LEAF_FLAG) as usize
    }
}

/// A leaf node: the bounding box of one primitive, and the index of that
/// primitive in the set the tree was built from.
#[cfg_attr(
    feature = "serde-serialize",
    derive(serde::Serialize, serde::Deserialize)
)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LeafNode {
    /// The bounding box of the primitive.
    pub aabb: Aabb,
    /// The index of the primitive in the input set.
    pub primitive: u32,
}

/// An internal node. Both children always exist; the node's box is the union
/// of its children's boxes.
#[cfg_attr(
    feature = "serde-serialize",
    derive(serde::Serialize, serde::Deserialize)
)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct InternalNode {
    /// The union of the boxes of every primitive below this node.
    pub aabb: Aabb,
    /// The left child.
    pub left: NodeRef,
    /// The right child.
    pub right: NodeRef,
}

impl InternalNode {
    pub(super) fn invalid() -> Self {
        Self {
            aabb: Aabb::new_invalid(),
            left: NodeRef::INVALID,
            right: NodeRef::INVALID,
        }
    }
}

/// A linear bounding volume hierarchy.
///
/// Leaves are stored in Morton order in one array and internal nodes in
/// another; `N` primitives produce exactly `N` leaves and `N - 1` internal
/// nodes. The root is internal node 0, except for a single-primitive tree
/// which has no internal nodes and is rooted at leaf 0.
///
/// A tree is built once from a snapshot of primitive bounding boxes (see
/// [`Lbvh::from_primitives`]) and is immutable afterwards; traversals and
/// batched queries only take `&self`.
#[cfg_attr(
    feature = "serde-serialize",
    derive(serde::Serialize, serde::Deserialize)
)]
#[derive(Clone, Debug)]
pub struct Lbvh {
    pub(super) scene_aabb: Aabb,
    pub(super) leaves: Vec<LeafNode>,
    pub(super) internals: Vec<InternalNode>,
}

impl Lbvh {
    /// The number of indexed primitives.
    #[inline]
    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    /// The box bounding every indexed primitive.
    #[inline]
    pub fn scene_aabb(&self) -> &Aabb {
        &self.scene_aabb
    }

    /// The root of the tree.
    #[inline]
    pub fn root(&self) -> NodeRef {
        if self.internals.is_empty() {
            NodeRef::leaf(0)
        } else {
            NodeRef::internal(0)
        }
    }

    /// The bounding box of the referenced node.
    #[inline]
    pub fn node_aabb(&self, node: NodeRef) -> &Aabb {
        if node.is_leaf() {
            &self.leaves[node.index()].aabb
        } else {
            &self.internals[node.index()].aabb
        }
    }

    /// The raw leaf nodes, in Morton order.
    #[inline]
    pub fn leaves(&self) -> &[LeafNode] {
        &self.leaves
    }

    /// The raw internal nodes. The first element, if any, is the root.
    #[inline]
    pub fn internals(&self) -> &[InternalNode] {
        &self.internals
    }
}
