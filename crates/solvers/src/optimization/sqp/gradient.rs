use powderopt_core::{ConstrainedMinimizationProblem, Model};

use crate::optimization::Evaluation;

use super::evaluator::{Evaluator, Halt};

/// Finite-difference step in normalized coordinates (√ε for `f64`).
pub const FD_STEP: f64 = 1.490_116_119_384_765_6e-8;

/// First-order model of the scaled objective and the constraints at a point.
///
/// All derivatives are with respect to normalized coordinates.
#[derive(Debug, Clone)]
pub(super) struct Linearization<const N: usize> {
    pub(super) objective: [f64; N],
    pub(super) inequalities: Vec<[f64; N]>,
    pub(super) equalities: Vec<[f64; N]>,
}

/// Estimates gradients at `z` by finite differences, one probe per variable.
pub(super) fn linearize<M, P, const N: usize>(
    evaluator: &mut Evaluator<'_, M, P, N>,
    z: &[f64; N],
    at: &Evaluation<M::Input, M::Output, N>,
) -> Result<Linearization<N>, Halt<N>>
where
    M: Model,
    P: ConstrainedMinimizationProblem<N, Input = M::Input, Output = M::Output>,
{
    let (n_ineq, n_eq) = at.residuals.shape();
    let mut lin = Linearization {
        objective: [0.0; N],
        inequalities: vec![[0.0; N]; n_ineq],
        equalities: vec![[0.0; N]; n_eq],
    };
    let scale = evaluator.scale();

    for k in 0..N {
        let mut probe = *z;
        probe[k] = if z[k] + FD_STEP <= 1.0 {
            z[k] + FD_STEP
        } else {
            z[k] - FD_STEP
        };
        let h = probe[k] - z[k];

        let eval = evaluator.at_unit(&probe)?;

        lin.objective[k] = scale * (eval.objective - at.objective) / h;
        difference(
            &mut lin.inequalities,
            &eval.residuals.inequalities,
            &at.residuals.inequalities,
            k,
            h,
        );
        difference(
            &mut lin.equalities,
            &eval.residuals.equalities,
            &at.residuals.equalities,
            k,
            h,
        );
    }

    Ok(lin)
}

/// Fills column `k` of `rows` with the difference quotient `(probe - base) / h`.
fn difference<const N: usize>(
    rows: &mut [[f64; N]],
    probe: &[f64],
    base: &[f64],
    k: usize,
    h: f64,
) {
    for (row, (p, b)) in rows.iter_mut().zip(probe.iter().zip(base)) {
        row[k] = (p - b) / h;
    }
}
