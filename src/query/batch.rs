use super::{Predicate, QueryError};
use crate::partitioning::Lbvh;
use crate::utils::parallel;

impl Lbvh {
    /// Runs a batch of predicates and materializes every result in a
    /// compressed-sparse-row layout.
    ///
    /// On success, `offsets.len() == predicates.len() + 1`,
    /// `offsets[0] == 0`, `offsets[predicates.len()] == indices.len()`, and
    /// for each query `q` the slice `indices[offsets[q]..offsets[q + 1]]`
    /// holds its matching primitive indices in traversal order. Both output
    /// buffers are resized by this call; previous contents are discarded.
    ///
    /// The batch runs in two passes over the same traversals: a counting
    /// pass filling per-query match counts, an in-place exclusive scan of
    /// the counts, then a fill pass writing into disjoint per-query
    /// sub-slices. Queries are independent, so both passes fan out across
    /// the batch; no locking is involved, every output slot has a single
    /// writer. The output is deterministic and identical with and without
    /// the `parallel` feature.
    ///
    /// Fails with [`QueryError::InvalidPredicate`] if any predicate is
    /// structurally invalid, in which case the output buffers are left in an
    /// unspecified state.
    pub fn query<P: Predicate>(
        &self,
        predicates: &[P],
        offsets: &mut Vec<usize>,
        indices: &mut Vec<u32>,
    ) -> Result<(), QueryError> {
        for predicate in predicates {
            predicate.validate()?;
        }

        let n_queries = predicates.len();
        offsets.clear();
        offsets.resize(n_queries + 1, 0);

        // Count pass: the match count of query q lands in offsets[q].
        parallel::for_each_indexed(&mut offsets[..n_queries], |q, count| {
            let mut matches = 0usize;
            predicates[q].search(self, &mut |_primitive: u32| matches += 1);
            *count = matches;
        });

        // The exclusive scan turns counts into start offsets and leaves the
        // total in the last slot.
        let total = exclusive_scan(offsets);

        indices.clear();
        indices.resize(total, 0);

        // Fill pass: carve one disjoint output slice per query, then re-run
        // the traversals with an appending visitor.
        let mut slices = Vec::with_capacity(n_queries);
        let mut rest = indices.as_mut_slice();
        for q in 0..n_queries {
            let (head, tail) =
                std::mem::take(&mut rest).split_at_mut(offsets[q + 1] - offsets[q]);
            slices.push(head);
            rest = tail;
        }
        parallel::for_each_indexed(&mut slices, |q, out| {
            let mut cursor = 0usize;
            predicates[q].search(self, &mut |primitive: u32| {
                out[cursor] = primitive;
                cursor += 1;
            });
        });

        Ok(())
    }
}

/// In-place exclusive prefix sum. Returns the total, which is also stored in
/// the last slot.
fn exclusive_scan(values: &mut [usize]) -> usize {
    let mut sum = 0;
    for value in values.iter_mut() {
        let count = *value;
        *value = sum;
        sum += count;
    }
    sum
}

#[cfg(test)]
mod test {
    use super::exclusive_scan;

    #[test]
    fn exclusive_scan_starts_at_zero_and_totals_last() {
        let mut values = vec![2, 0, 3, 1, 0];
        assert_eq!(exclusive_scan(&mut values), 6);
        assert_eq!(values, vec![0, 2, 2, 5, 6]);
    }

    #[test]
    fn exclusive_scan_of_single_slot() {
        let mut values = vec![0];
        assert_eq!(exclusive_scan(&mut values), 0);
        assert_eq!(values, vec![0]);
    }
}
