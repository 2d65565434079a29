use powderopt_core::{ConstrainedMinimizationProblem, Model};

use crate::optimization::{Evaluation, evaluate};

use super::{Bounds, Error};

/// Why an evaluation did not produce a usable point.
pub(super) enum Halt<const N: usize> {
    /// The evaluation budget is spent; nothing was evaluated.
    Exhausted,

    /// The evaluation at `x` failed or was not finite.
    Failed { x: [f64; N], error: Error },
}

/// Evaluates points in normalized coordinates while enforcing the budget.
///
/// Every evaluation, including gradient probes, counts against the budget.
/// Results are checked for finiteness and for a stable constraint count.
pub(super) struct Evaluator<'a, M, P, const N: usize> {
    model: &'a M,
    problem: &'a P,
    bounds: Bounds<N>,
    max_evals: usize,
    evals: usize,
    shape: Option<(usize, usize)>,
    scale: f64,
}

impl<'a, M, P, const N: usize> Evaluator<'a, M, P, N>
where
    M: Model,
    P: ConstrainedMinimizationProblem<N, Input = M::Input, Output = M::Output>,
{
    pub(super) fn new(model: &'a M, problem: &'a P, bounds: Bounds<N>, max_evals: usize) -> Self {
        Self {
            model,
            problem,
            bounds,
            max_evals,
            evals: 0,
            shape: None,
            scale: 1.0,
        }
    }

    /// Number of evaluations performed so far.
    pub(super) fn evals(&self) -> usize {
        self.evals
    }

    /// Fixes the objective scale from the objective at the initial guess.
    pub(super) fn normalize_by(&mut self, objective: f64) {
        self.scale = if objective.abs() > f64::MIN_POSITIVE {
            objective.abs().recip()
        } else {
            1.0
        };
    }

    /// Returns the objective scale factor.
    pub(super) fn scale(&self) -> f64 {
        self.scale
    }

    /// Evaluates at normalized coordinates `z`.
    pub(super) fn at_unit(
        &mut self,
        z: &[f64; N],
    ) -> Result<Evaluation<M::Input, M::Output, N>, Halt<N>> {
        let x = self.bounds.from_unit(z);
        self.at(x)
    }

    /// Evaluates at `x`.
    pub(super) fn at(
        &mut self,
        x: [f64; N],
    ) -> Result<Evaluation<M::Input, M::Output, N>, Halt<N>> {
        if self.evals >= self.max_evals {
            return Err(Halt::Exhausted);
        }
        self.evals += 1;

        let eval = evaluate(self.model, self.problem, x).map_err(|e| Halt::Failed {
            x,
            error: e.into(),
        })?;

        if !eval.objective.is_finite() || !eval.residuals.is_finite() {
            return Err(Halt::Failed {
                x,
                error: Error::NonFiniteEvaluation { x: x.to_vec() },
            });
        }

        let found = eval.residuals.shape();
        match self.shape {
            None => self.shape = Some(found),
            Some(expected) if expected != found => {
                return Err(Halt::Failed {
                    x,
                    error: Error::ResidualShape { expected, found },
                });
            }
            Some(_) => {}
        }

        Ok(eval)
    }
}
