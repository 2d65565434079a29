use crate::optimization::Evaluation;

/// An evaluated point: its location, objective, and constraint violation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point<const N: usize> {
    /// The solver variables.
    pub x: [f64; N],

    /// The (unscaled) objective value at `x`.
    pub objective: f64,

    /// The largest constraint violation at `x`.
    pub violation: f64,
}

impl<const N: usize> Point<N> {
    /// Creates a new point.
    #[must_use]
    pub fn new(x: [f64; N], objective: f64, violation: f64) -> Self {
        Self {
            x,
            objective,
            violation,
        }
    }
}

impl<I, O, const N: usize> From<&Evaluation<I, O, N>> for Point<N> {
    fn from(eval: &Evaluation<I, O, N>) -> Self {
        Self::new(eval.x, eval.objective, eval.residuals.max_violation())
    }
}
