use nalgebra::DVector;

use crate::optimization::Evaluation;

use super::{Solution, Status, gradient::Linearization, hessian::Hessian, qp::Step};

/// The current iterate and everything the solver carries between iterations.
pub(super) struct State<I, O, const N: usize> {
    /// Current iterate in normalized coordinates.
    pub(super) z: [f64; N],
    pub(super) current: Evaluation<I, O, N>,
    pub(super) linearization: Linearization<N>,
    pub(super) hessian: Hessian,

    /// L1 penalty weight per constraint, inequalities first.
    penalties: Vec<f64>,
}

impl<I, O, const N: usize> State<I, O, N> {
    pub(super) fn new(
        z: [f64; N],
        current: Evaluation<I, O, N>,
        linearization: Linearization<N>,
    ) -> Self {
        let (n_ineq, n_eq) = current.residuals.shape();
        Self {
            z,
            current,
            linearization,
            hessian: Hessian::identity(N),
            penalties: vec![0.0; n_ineq + n_eq],
        }
    }

    /// Raises the penalty weights so each one dominates its multiplier.
    ///
    /// Weights never fall below the current multiplier magnitude and decay
    /// at most halfway toward it.
    pub(super) fn update_penalties(&mut self, step: &Step<N>) {
        let multipliers = step
            .inequality_multipliers
            .iter()
            .chain(&step.equality_multipliers);
        for (mu, lambda) in self.penalties.iter_mut().zip(multipliers) {
            let lambda = lambda.abs();
            *mu = lambda.max(0.5 * (*mu + lambda));
        }
    }

    /// Evaluates the L1 exact-penalty merit of `eval`.
    pub(super) fn merit(&self, eval: &Evaluation<I, O, N>, scale: f64) -> f64 {
        scale * eval.objective + self.weighted_violation(eval)
    }

    /// Directional derivative of the merit at the current iterate along `step`.
    pub(super) fn slope(&self, step: &Step<N>) -> f64 {
        let descent: f64 = self
            .linearization
            .objective
            .iter()
            .zip(&step.direction)
            .map(|(g, d)| g * d)
            .sum();
        descent - step.relaxation * self.weighted_violation(&self.current)
    }

    /// Moves to an accepted point and updates the Hessian approximation.
    ///
    /// Returns the length (infinity norm) of the step actually taken.
    pub(super) fn advance(
        &mut self,
        z: [f64; N],
        eval: Evaluation<I, O, N>,
        linearization: Linearization<N>,
        step: &Step<N>,
    ) -> f64 {
        let s = DVector::from_iterator(N, z.iter().zip(&self.z).map(|(new, old)| new - old));
        let y = lagrangian_gradient(&linearization, step)
            - lagrangian_gradient(&self.linearization, step);
        self.hessian.update(&s, &y);

        self.z = z;
        self.current = eval;
        self.linearization = linearization;

        s.amax()
    }

    pub(super) fn into_solution(
        self,
        status: Status,
        iters: usize,
        evals: usize,
    ) -> Solution<I, O, N> {
        Solution::new(self.current, status, iters, evals)
    }

    fn weighted_violation(&self, eval: &Evaluation<I, O, N>) -> f64 {
        self.penalties
            .iter()
            .zip(eval.residuals.violations())
            .map(|(mu, v)| mu * v)
            .sum()
    }
}

/// Gradient of the Lagrangian using the multipliers from `step`.
fn lagrangian_gradient<const N: usize>(lin: &Linearization<N>, step: &Step<N>) -> DVector<f64> {
    let mut grad = DVector::from_column_slice(&lin.objective);
    let terms = lin
        .inequalities
        .iter()
        .zip(&step.inequality_multipliers)
        .chain(lin.equalities.iter().zip(&step.equality_multipliers));
    for (row, lambda) in terms {
        for (g, a) in grad.iter_mut().zip(row) {
            *g += lambda * a;
        }
    }
    grad
}
