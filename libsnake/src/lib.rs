//! Shortest-edit-script diffing over arbitrary equality-comparable
//! sequences.
//!
//! The diff of two sequences is reported as an ordered list of [`Snake`]s,
//! each bundling one axis move (a deletion or an insertion) with the run of
//! matching elements that follows it. [`compare`] uses the linear-space
//! divide-and-conquer search; [`compare_greedy`] trades memory for the
//! simpler single-direction search and keeps the full per-iteration
//! frontier history around for reconstruction.

use thiserror::Error;

mod apply;
mod greedy;
mod linear;
mod moves;
mod search;
mod snake;
mod vbuf;

pub use apply::apply;
pub use greedy::{compare_greedy, compare_greedy_reverse};
pub use linear::compare;
pub use moves::{match_moves, DeletedRun, InsertedRun, MatchedMoves, MoveMatch};
pub use snake::{Snake, SnakePair};
pub use vbuf::KLineVec;

/// Failure modes of the diff engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiffError {
    /// A frontier snapshot was requested for a wider window than the live
    /// buffer holds. Recoverable; the searches skip the snapshot.
    #[error("snapshot window of {requested} diagonals exceeds the buffer capacity of {capacity}")]
    SnapshotOverCapacity { requested: i64, capacity: i64 },

    /// A search ran through every iteration without terminating. Valid
    /// inputs never get here.
    #[error("no termination found after {max_d} iterations")]
    SearchExhausted { max_d: i64 },

    /// A reconstructed step disagrees with the recorded frontier
    #[error("frontier mismatch at d {d}, k {k}: expected {expected:?}, found {actual:?}")]
    TraceMismatch {
        d: i64,
        k: i64,
        expected: (i64, i64),
        actual: (i64, i64),
    },
}

/// Outcome of a comparison: the snake list plus whatever frontier
/// snapshots the search recorded, indexed by iteration count.
#[derive(Debug, Clone)]
pub struct DiffResults {
    /// The edit script, ordered left to right
    pub snakes: Vec<Snake>,
    /// Forward frontier snapshots, one per executed forward pass
    pub forward_vs: Vec<KLineVec>,
    /// Reverse frontier snapshots, one per executed reverse pass
    pub reverse_vs: Vec<KLineVec>,
}
