//! In-memory flat vector index
//!
//! Exact nearest-neighbour search over L2 distance, with a bincode
//! snapshot pair for persistence. Vectors and chunks live in two parallel
//! arrays kept aligned by construction; every mutation revalidates the
//! invariant before touching state.

mod error;
mod snapshot;
mod store;

#[cfg(test)]
mod tests;

pub use error::{IndexError, IndexResult, SnapshotError};
pub use store::VectorIndex;
