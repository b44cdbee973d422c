use super::{InternalNode, LeafNode, Lbvh, NodeRef};
use crate::access::PrimitiveSet;
use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, DIM};
use crate::utils::morton::MortonKey;
use crate::utils::parallel;
use std::sync::atomic::{AtomicU32, Ordering};

/// Error produced when the construction of a [`Lbvh`] fails.
#[derive(thiserror::Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// A primitive bounding box has `mins > maxs` on some axis.
    #[error("the bounding box of primitive {index} has mins > maxs on some axis")]
    InvalidGeometry {
        /// The index of the offending primitive.
        index: usize,
    },
    /// Zero primitives were supplied.
    #[error("cannot build a hierarchy out of zero primitives")]
    Empty,
    /// The primitive count exceeds the addressable node index range.
    #[error("too many primitives for the node index range")]
    Overflow,
}

impl Lbvh {
    /// Builds a hierarchy indexing the given primitives, with 64-bit Morton
    /// keys.
    ///
    /// Fails with [`BuildError::InvalidGeometry`] if any box has
    /// `mins > maxs` on some axis, and with [`BuildError::Empty`] for an
    /// empty set: a built tree always indexes at least one primitive.
    pub fn from_primitives<P: PrimitiveSet + ?Sized>(primitives: &P) -> Result<Self, BuildError> {
        Self::from_primitives_with_keys::<u64, P>(primitives)
    }

    /// Builds a hierarchy with a caller-chosen Morton key width.
    ///
    /// `u32` keys quantize each axis to fewer bits than `u64` keys, which
    /// sorts faster but degrades the leaf ordering (and therefore query
    /// pruning) on large or finely detailed scenes. Results of queries are
    /// identical either way.
    pub fn from_primitives_with_keys<K: MortonKey, P: PrimitiveSet + ?Sized>(
        primitives: &P,
    ) -> Result<Self, BuildError> {
        let n = primitives.len();
        if n == 0 {
            return Err(BuildError::Empty);
        }
        if n > NodeRef::MAX_INDEX as usize {
            return Err(BuildError::Overflow);
        }

        // Snapshot and validate the primitive boxes; reduce the scene bounds.
        let mut scene_aabb = Aabb::new_invalid();
        let mut leaves = Vec::with_capacity(n);
        for index in 0..n {
            let aabb = primitives.get(index);
            if !aabb.is_valid() {
                return Err(BuildError::InvalidGeometry { index });
            }
            scene_aabb.merge(&aabb);
            leaves.push(LeafNode {
                aabb,
                primitive: index as u32,
            });
        }

        // Order the leaves along the space-filling curve. The index
        // component makes the unstable sort deterministic on key ties.
        let mut order = parallel::map_indexed(n, |i| {
            let unit = normalize_to_unit(&scene_aabb, &leaves[i].aabb.center());
            (K::from_unit_point(&unit), i as u32)
        });
        parallel::sort_unstable(&mut order);

        let keys: Vec<K> = order.iter().map(|(key, _)| *key).collect();
        let leaves: Vec<LeafNode> = order
            .iter()
            .map(|&(_, index)| leaves[index as usize])
            .collect();
        drop(order);

        if n == 1 {
            return Ok(Lbvh {
                scene_aabb,
                leaves,
                internals: Vec::new(),
            });
        }

        // Link phase: each internal node finds its children independently
        // from the sorted keys. Parent slots are recorded on the fly; every
        // node has exactly one parent, so every slot has a single writer.
        let mut internals = vec![InternalNode::invalid(); n - 1];
        let leaf_parents: Vec<AtomicU32> = (0..n).map(|_| AtomicU32::new(0)).collect();
        let internal_parents: Vec<AtomicU32> = (0..n - 1).map(|_| AtomicU32::new(0)).collect();

        parallel::for_each_indexed(&mut internals, |i, node| {
            let (left, right) = link_children(&keys, i);
            node.left = left;
            node.right = right;

            for child in [left, right] {
                let slot = if child.is_leaf() {
                    &leaf_parents[child.index()]
                } else {
                    &internal_parents[child.index()]
                };
                slot.store(i as u32, Ordering::Relaxed);
            }
        });

        let leaf_parents: Vec<u32> = leaf_parents.into_iter().map(AtomicU32::into_inner).collect();
        let internal_parents: Vec<u32> = internal_parents
            .into_iter()
            .map(AtomicU32::into_inner)
            .collect();

        // Bottom-up box phase: climb from every leaf towards the root. The
        // first child arriving at a node stops there; the second one unions
        // the two child boxes and keeps climbing, so each internal box is
        // written exactly once, after both children are final. The release
        // half of the `fetch_add` pairs with the acquire half performed by
        // the sibling's climb, which publishes the subtree boxes.
        let counters: Vec<AtomicU32> = (0..n - 1).map(|_| AtomicU32::new(0)).collect();
        {
            let nodes = SharedInternals::new(&mut internals);
            let leaves = &leaves[..];
            parallel::for_each_index(n, |leaf| {
                let mut current = leaf_parents[leaf] as usize;
                loop {
                    if counters[current].fetch_add(1, Ordering::AcqRel) == 0 {
                        return;
                    }

                    let (left, right) = nodes.children(current);
                    let child_aabb = |child: NodeRef| {
                        if child.is_leaf() {
                            leaves[child.index()].aabb
                        } else {
                            nodes.aabb(child.index())
                        }
                    };
                    nodes.set_aabb(current, child_aabb(left).merged(&child_aabb(right)));

                    if current == 0 {
                        return;
                    }
                    current = internal_parents[current] as usize;
                }
            });
        }

        log::debug!("built hierarchy over {n} primitives ({} internal nodes)", n - 1);

        Ok(Lbvh {
            scene_aabb,
            leaves,
            internals,
        })
    }
}

/// Normalizes `point` to the unit cube spanned by `bounds`. Axes with zero
/// extent map to 0.
fn normalize_to_unit(bounds: &Aabb, point: &Point<Real>) -> Point<Real> {
    let extents = bounds.extents();
    let mut unit = Point::origin();
    for d in 0..DIM {
        if extents[d] > 0.0 {
            unit[d] = (point[d] - bounds.mins[d]) / extents[d];
        }
    }
    unit
}

/// The length of the common prefix of the keys at `i` and `j`, or -1 when
/// `j` falls outside the key range.
///
/// When the two keys are equal the comparison continues into the bit pattern
/// of the leaf positions, which keeps every range and split well defined on
/// duplicate-heavy inputs.
fn delta<K: MortonKey>(keys: &[K], i: i64, j: i64) -> i64 {
    if j < 0 || j >= keys.len() as i64 {
        return -1;
    }

    let a = keys[i as usize];
    let b = keys[j as usize];
    if a == b {
        K::BITS as i64 + ((i as u32) ^ (j as u32)).leading_zeros() as i64
    } else {
        a.common_prefix_len(b) as i64
    }
}

/// The children of internal node `i`, from the common-prefix function over
/// the sorted keys.
fn link_children<K: MortonKey>(keys: &[K], i: usize) -> (NodeRef, NodeRef) {
    let node = i as i64;

    // Direction of the range covered by this node: towards the neighbor
    // sharing the longer prefix.
    let d: i64 = if delta(keys, node, node + 1) > delta(keys, node, node - 1) {
        1
    } else {
        -1
    };
    let delta_min = delta(keys, node, node - d);

    // Exponential upper bound on the range length, then binary search for
    // the exact other end.
    let mut l_max = 2;
    while delta(keys, node, node + l_max * d) > delta_min {
        l_max *= 2;
    }
    let mut l = 0;
    let mut t = l_max / 2;
    while t >= 1 {
        if delta(keys, node, node + (l + t) * d) > delta_min {
            l += t;
        }
        t /= 2;
    }
    let other_end = node + l * d;

    // Split position: the last index in the range whose prefix with `node`
    // is longer than the prefix spanning the whole range.
    let delta_node = delta(keys, node, other_end);
    let mut s = 0;
    let mut t = l;
    while t > 1 {
        t = (t + 1) / 2;
        if delta(keys, node, node + (s + t) * d) > delta_node {
            s += t;
        }
    }
    let gamma = node + s * d + d.min(0);

    let left = if node.min(other_end) == gamma {
        NodeRef::leaf(gamma as u32)
    } else {
        NodeRef::internal(gamma as u32)
    };
    let right = if node.max(other_end) == gamma + 1 {
        NodeRef::leaf(gamma as u32 + 1)
    } else {
        NodeRef::internal(gamma as u32 + 1)
    };
    (left, right)
}

/// Shared mutable view of the internal node array used by the bottom-up box
/// phase. The arrival counters serialize all accesses: a node's box has a
/// single writer, and is only read by the climb of its parent, after the
/// write.
struct SharedInternals {
    ptr: *mut InternalNode,
}

unsafe impl Send for SharedInternals {}
unsafe impl Sync for SharedInternals {}

impl SharedInternals {
    fn new(nodes: &mut [InternalNode]) -> Self {
        Self {
            ptr: nodes.as_mut_ptr(),
        }
    }

    #[inline]
    fn children(&self, i: usize) -> (NodeRef, NodeRef) {
        // SAFETY: child links are written by the link phase, which is fenced
        // off before this view is created.
        unsafe { ((*self.ptr.add(i)).left, (*self.ptr.add(i)).right) }
    }

    #[inline]
    fn aabb(&self, i: usize) -> Aabb {
        // SAFETY: only called for a child of the node being unioned; its box
        // was written before the release operation our caller acquired.
        unsafe { (*self.ptr.add(i)).aabb }
    }

    #[inline]
    fn set_aabb(&self, i: usize, aabb: Aabb) {
        // SAFETY: the arrival counter hands the write for node `i` to
        // exactly one climbing task.
        unsafe {
            (*self.ptr.add(i)).aabb = aabb;
        }
    }
}
