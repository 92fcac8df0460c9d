//! Batch numbering and the end-to-end batch loop.

pub mod ids;
pub mod runner;

pub use ids::{BatchId, BatchIdAllocator, DirBatchIds, InMemoryBatchIds};
pub use runner::{BatchOutcome, BatchRunner, RunReport};
