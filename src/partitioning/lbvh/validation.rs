use super::Lbvh;

impl Lbvh {
    /// Panics unless the tree satisfies all of its structural invariants:
    /// node counts, single-parent topology, full reachability from the root,
    /// one leaf per primitive, and every internal box equal to the union of
    /// its children's boxes.
    ///
    /// Intended for tests and debugging; cost is linear in the tree size.
    pub fn assert_well_formed(&self) {
        let n = self.leaves.len();
        assert!(n > 0, "a tree always indexes at least one primitive");
        if n == 1 {
            assert!(self.internals.is_empty());
        } else {
            assert_eq!(self.internals.len(), n - 1);
        }

        // Each primitive appears in exactly one leaf.
        let mut seen = vec![false; n];
        for leaf in &self.leaves {
            let primitive = leaf.primitive as usize;
            assert!(primitive < n, "primitive index out of range");
            assert!(
                !seen[primitive],
                "primitive {primitive} appears in more than one leaf"
            );
            seen[primitive] = true;
        }

        // Single-parent topology.
        let mut leaf_refs = vec![0u32; n];
        let mut internal_refs = vec![0u32; self.internals.len()];
        for node in &self.internals {
            for child in [node.left, node.right] {
                if child.is_leaf() {
                    assert!(child.index() < n, "leaf child out of range");
                    leaf_refs[child.index()] += 1;
                } else {
                    assert!(child.index() < self.internals.len(), "child out of range");
                    assert!(child.index() != 0, "root referenced as a child");
                    internal_refs[child.index()] += 1;
                }
            }
        }
        if !self.internals.is_empty() {
            for (leaf, refs) in leaf_refs.iter().enumerate() {
                assert_eq!(*refs, 1, "leaf {leaf} has {refs} parents");
            }
            assert_eq!(internal_refs[0], 0);
            for (node, refs) in internal_refs.iter().enumerate().skip(1) {
                assert_eq!(*refs, 1, "internal node {node} has {refs} parents");
            }
        }

        // Reachability and box unions.
        let mut visited = 0usize;
        let mut stack = vec![self.root()];
        while let Some(node) = stack.pop() {
            visited += 1;
            if !node.is_leaf() {
                let internal = &self.internals[node.index()];
                let merged = self
                    .node_aabb(internal.left)
                    .merged(self.node_aabb(internal.right));
                assert_eq!(
                    internal.aabb, merged,
                    "internal box differs from the union of its children"
                );
                stack.push(internal.left);
                stack.push(internal.right);
            }
        }
        assert_eq!(visited, n + self.internals.len());
    }
}
