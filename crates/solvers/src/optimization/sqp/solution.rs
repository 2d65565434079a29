use powderopt_core::{ConstraintResiduals, Snapshot};

use crate::optimization::Evaluation;

/// Terminal status of an SQP search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Reached a feasible stationary point within the configured tolerances.
    Converged,

    /// Reached the iteration limit.
    MaxIterationsReached,

    /// Reached the evaluation limit.
    MaxEvaluationsReached,

    /// Started infeasible and could not reach a feasible point.
    InfeasibleStart,

    /// Stopped because evaluations failed, were not finite, or the search
    /// stalled at an infeasible point.
    NumericalFailure,

    /// Stopped early due to an observer decision.
    StoppedByObserver,
}

impl Status {
    /// Returns `true` if the search converged.
    #[must_use]
    pub fn is_converged(self) -> bool {
        self == Self::Converged
    }
}

/// The result of an SQP search.
///
/// The last accepted iterate is always reported, whatever the status.
#[derive(Debug, Clone)]
pub struct Solution<I, O, const N: usize> {
    /// Final solver status.
    pub status: Status,

    /// The last accepted iterate.
    pub x: [f64; N],

    /// Objective value at `x`.
    pub objective: f64,

    /// Constraint residuals at `x`.
    pub residuals: ConstraintResiduals,

    /// Snapshot at `x`.
    pub snapshot: Snapshot<I, O>,

    /// Iteration count when the solver finished.
    pub iters: usize,

    /// Number of evaluations performed, including gradient probes.
    pub evals: usize,
}

impl<I, O, const N: usize> Solution<I, O, N> {
    pub(super) fn new(
        eval: Evaluation<I, O, N>,
        status: Status,
        iters: usize,
        evals: usize,
    ) -> Self {
        Self {
            status,
            x: eval.x,
            objective: eval.objective,
            residuals: eval.residuals,
            snapshot: eval.snapshot,
            iters,
            evals,
        }
    }
}
