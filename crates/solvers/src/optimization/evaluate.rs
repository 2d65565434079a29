use thiserror::Error;

use powderopt_core::{ConstrainedMinimizationProblem, ConstraintResiduals, Model, Snapshot};

/// The result of evaluating a constrained problem at a given `x`.
#[derive(Debug, Clone)]
pub struct Evaluation<I, O, const N: usize> {
    pub x: [f64; N],

    pub objective: f64,

    pub residuals: ConstraintResiduals,

    pub snapshot: Snapshot<I, O>,
}

/// Errors that can occur when evaluating a constrained problem.
#[derive(Debug, Error)]
pub enum EvalError<ME, PE> {
    /// The model call failed.
    #[error("model call failed")]
    Model(#[source] ME),

    /// Failed to construct input or compute the objective or constraints.
    #[error("problem error")]
    Problem(#[source] PE),
}

/// Type alias for the result of [`evaluate`].
pub type EvaluateResult<M, P, const N: usize> = Result<
    Evaluation<<M as Model>::Input, <M as Model>::Output, N>,
    EvalError<<M as Model>::Error, <P as powderopt_core::MinimizationProblem<N>>::Error>,
>;

/// Evaluates the model in the context of a constrained problem.
///
/// This function maps `x` to model input, calls the model, then computes
/// the objective and the constraint residuals from the input and output.
///
/// # Errors
///
/// Returns an error if input mapping, the model call, or the objective or
/// constraint computation fails.
pub fn evaluate<M, P, const N: usize>(
    model: &M,
    problem: &P,
    x: [f64; N],
) -> EvaluateResult<M, P, N>
where
    M: Model,
    P: ConstrainedMinimizationProblem<N, Input = M::Input, Output = M::Output>,
{
    let input = problem.input(&x).map_err(EvalError::Problem)?;
    let output = model.call(&input).map_err(EvalError::Model)?;
    let objective = problem
        .objective(&input, &output)
        .map_err(EvalError::Problem)?;
    let residuals = problem
        .constraints(&input, &output)
        .map_err(EvalError::Problem)?;

    Ok(Evaluation {
        x,
        objective,
        residuals,
        snapshot: Snapshot::new(input, output),
    })
}
