//! Spatial predicates and the batched query engine.

pub use self::error::QueryError;
pub use self::predicates::{
    nearest, overlap, within, Nearest, Overlap, Predicate, SpatialPredicate, Within,
};

mod batch;
mod error;
mod predicates;
