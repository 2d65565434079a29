//! End-to-end optimization of one powder request.

use powderopt_core::{ConstraintResiduals, Observer};
use powderopt_solvers::optimization::sqp;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    CoefficientTable, ConstraintSet, DecisionVariables, DerivedState, ImpactBreakdown,
    ImpactEvaluator, LcaProblem, ParameterError, PlantConstants, ProcessModel, Request,
    SearchSpace, SearchSpaceError, TableError,
};

/// Everything about a run that is not part of the user's request.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Settings {
    pub plant: PlantConstants,
    pub space: SearchSpace,
    pub solver: sqp::Config,
}

/// The solver event type seen by observers of [`optimize`].
pub type Event<'a> = sqp::Event<'a, DecisionVariables, DerivedState, 3>;

/// Result of optimizing one request.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub status: sqp::Status,
    pub variables: DecisionVariables,
    pub derived: DerivedState,
    pub breakdown: ImpactBreakdown,
    pub residuals: ConstraintResiduals,
    /// Breakdown at the initial guess, for comparison.
    pub initial: ImpactBreakdown,
    pub iters: usize,
    pub evals: usize,
}

impl Outcome {
    #[must_use]
    pub fn total(&self) -> f64 {
        self.breakdown.total()
    }

    /// Fractional reduction of the total impact relative to the initial guess.
    #[must_use]
    pub fn improvement(&self) -> f64 {
        let initial = self.initial.total();
        if initial == 0.0 {
            0.0
        } else {
            (initial - self.total()) / initial
        }
    }
}

#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error("invalid plant constants")]
    Parameters(#[from] ParameterError),

    #[error("invalid search space")]
    SearchSpace(#[from] SearchSpaceError),

    #[error("coefficients unavailable")]
    Table(#[from] TableError),

    #[error("optimization could not start")]
    Solver(#[from] sqp::Error),
}

/// Finds the operating point that minimizes the requested impact.
///
/// Inputs are validated before the search starts. A search that ends without
/// converging still returns the last iterate, tagged with its status.
///
/// # Errors
///
/// Returns an [`OptimizeError`] if the settings are invalid, the table has no
/// complete row for the request, or the solver rejects the initial guess.
pub fn optimize<Obs>(
    request: &Request,
    table: &CoefficientTable,
    settings: &Settings,
    observer: Obs,
) -> Result<Outcome, OptimizeError>
where
    Obs: for<'a> Observer<Event<'a>, sqp::Action>,
{
    let Settings {
        plant,
        space,
        solver,
    } = *settings;

    plant.validate()?;
    let bounds = space.bounds()?;
    let row = table.row(request.category(), request.region())?;

    let model = ProcessModel::new(plant, request.final_mass(), request.target_diameter());
    let problem = LcaProblem::new(
        ConstraintSet::new(&space, plant.stage_ratios),
        ImpactEvaluator::new(plant),
        row,
    );

    let initial = problem.breakdown(&model.evaluate(&DecisionVariables::from_array(space.initial)));
    info!(
        category = %request.category(),
        region = %request.region(),
        initial = initial.total(),
        "starting optimization"
    );

    let solution = sqp::minimize(&model, &problem, space.initial, &bounds, &solver, observer)?;

    let breakdown = problem.breakdown(&solution.snapshot.output);
    if solution.status.is_converged() {
        info!(
            total = breakdown.total(),
            iters = solution.iters,
            evals = solution.evals,
            "converged"
        );
    } else {
        warn!(
            status = ?solution.status,
            total = breakdown.total(),
            iters = solution.iters,
            evals = solution.evals,
            "stopped without converging"
        );
    }
    debug!(violation = solution.residuals.max_violation(), x = ?solution.x, "final iterate");

    Ok(Outcome {
        status: solution.status,
        variables: solution.snapshot.input,
        derived: solution.snapshot.output,
        breakdown,
        residuals: solution.residuals,
        initial,
        iters: solution.iters,
        evals: solution.evals,
    })
}
