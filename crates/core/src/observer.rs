/// Receives solver events and optionally returns a control action.
///
/// Solvers call [`Observer::observe`] with each event they emit. Returning
/// `None` lets the solver proceed normally; returning `Some(action)` asks the
/// solver to change course. The set of supported actions is solver-specific.
///
/// Implementations are provided for:
///
/// - `()`, which never acts
/// - any `FnMut(&E) -> Option<A>` closure
/// - pairs `(A, B)` of observers, where the first action returned wins
pub trait Observer<E, A> {
    /// Handles an event, optionally returning an action for the solver.
    fn observe(&mut self, event: &E) -> Option<A>;
}

impl<E, A> Observer<E, A> for () {
    fn observe(&mut self, _event: &E) -> Option<A> {
        None
    }
}

impl<E, A, F> Observer<E, A> for F
where
    F: FnMut(&E) -> Option<A>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        self(event)
    }
}

impl<E, A, First, Second> Observer<E, A> for (First, Second)
where
    First: Observer<E, A>,
    Second: Observer<E, A>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        // Both observers always see the event.
        let first = self.0.observe(event);
        let second = self.1.observe(event);
        first.or(second)
    }
}
