use crate::CouplingCriteria;

/// How the outer loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Every reported criterion fell within its tolerance.
    Converged,
    /// Reached the iteration limit without converging.
    MaxIters,
    /// Stopped early on an observer's request.
    StoppedByObserver,
    /// Cell `cell` produced a non-positive voltage.
    Aborted { cell: usize },
}

/// Result of [`run`](super::run).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    pub status: Status,
    /// Number of stack updates performed.
    pub iters: usize,
    /// Criteria of the last completed update.
    pub criteria: CouplingCriteria,
}
