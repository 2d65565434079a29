/// Actions an observer can take during an SQP search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop the solver early and return the current iterate.
    StopEarly,

    /// Reject a line-search trial point as if it failed to decrease the merit.
    ///
    /// The solver keeps backtracking toward the current iterate. Returned for
    /// any event other than [`Event::Trial`](super::Event::Trial), this action
    /// has no effect.
    ///
    /// Use this to steer the search away from a region the model accepts but
    /// domain knowledge rules out.
    AssumeWorse,
}
