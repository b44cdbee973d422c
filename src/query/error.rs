/// Error produced when a batch of predicates is rejected before running.
#[derive(thiserror::Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// A predicate is structurally invalid, like a nearest-neighbor search
    /// asking for zero results.
    #[error("nearest-neighbor predicates require k >= 1")]
    InvalidPredicate,
}
