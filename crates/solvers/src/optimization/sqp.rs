//! Sequential quadratic programming for bound- and nonlinearly-constrained
//! minimization.
//!
//! # Algorithm
//!
//! Each variable is mapped onto `[0, 1]` using its bounds, so every search
//! direction is expressed in normalized coordinates. At each iterate the
//! solver:
//!
//! 1. Linearizes the objective and every constraint with forward finite
//!    differences (step [`FD_STEP`]). A coordinate within one step of its upper
//!    bound uses a backward difference instead, so no probe leaves the box.
//! 2. Solves a dense quadratic subproblem built from a damped-BFGS
//!    approximation of the Lagrangian Hessian, the linearized constraints, and
//!    the variable bounds. When the linearized constraints are inconsistent
//!    the constraint offsets are progressively relaxed.
//! 3. Backtracks along the step until an L1 exact-penalty merit function
//!    shows sufficient decrease.
//!
//! The objective is divided by `|f(x0)|` internally (when nonzero), which
//! makes the function tolerance relative to the starting objective. Reported
//! objectives are always unscaled.
//!
//! # When to Use
//!
//! - The objective and constraints are smooth in the interior of the box
//! - The number of variables and constraints is small (the subproblem is
//!   solved by enumerating active sets)
//! - A local optimum is acceptable
//!
//! # Observer Events
//!
//! - [`Event::Iterate`]: an accepted iterate, starting with the initial guess
//!   as iteration 0
//! - [`Event::Trial`]: a line-search trial point before acceptance
//! - [`Event::Failed`]: an evaluation failed or was not finite
//!
//! Gradient probes are counted as evaluations but are not reported.
//!
//! Observers can return [`Action::StopEarly`] to halt with the current
//! iterate, or [`Action::AssumeWorse`] on a trial point to reject it and
//! keep backtracking.

mod action;
mod bounds;
mod config;
mod error;
mod evaluator;
mod event;
mod gradient;
mod hessian;
mod point;
mod qp;
mod search;
mod solution;
mod state;

#[cfg(test)]
mod tests;

pub use action::Action;
pub use bounds::Bounds;
pub use config::{Config, ConfigError};
pub use error::Error;
pub use event::Event;
pub use gradient::FD_STEP;
pub use point::Point;
pub use solution::{Solution, Status};

use powderopt_core::{ConstrainedMinimizationProblem, Model, Observer};

use search::search;

/// Finds a constrained local minimum of the objective using SQP.
///
/// The initial guess must lie within `bounds` (boundary-inclusive). Every
/// trial point and gradient probe stays within `bounds`.
///
/// The observer receives an [`Event`] for the initial guess, every
/// line-search trial, every accepted iterate, and every failed evaluation.
/// See the [module docs](self) for details on observer actions.
///
/// # Errors
///
/// Returns an error if the config or bounds are invalid, if the initial guess
/// is not finite or lies outside the bounds, or if the evaluation at the
/// initial guess fails or is not finite. Failures after the first evaluation
/// are reported through [`Solution::status`] instead.
pub fn minimize<M, P, Obs, const N: usize>(
    model: &M,
    problem: &P,
    x0: [f64; N],
    bounds: &Bounds<N>,
    config: &Config,
    observer: Obs,
) -> Result<Solution<M::Input, M::Output, N>, Error>
where
    M: Model,
    P: ConstrainedMinimizationProblem<N, Input = M::Input, Output = M::Output>,
    Obs: for<'a> Observer<Event<'a, M::Input, M::Output, N>, Action>,
{
    search(model, problem, x0, bounds, config, observer)
}

/// Finds a constrained local minimum without observer support.
///
/// This is a convenience wrapper around [`minimize`] that uses a no-op observer.
///
/// # Errors
///
/// Returns the same errors as [`minimize`].
pub fn minimize_unobserved<M, P, const N: usize>(
    model: &M,
    problem: &P,
    x0: [f64; N],
    bounds: &Bounds<N>,
    config: &Config,
) -> Result<Solution<M::Input, M::Output, N>, Error>
where
    M: Model,
    P: ConstrainedMinimizationProblem<N, Input = M::Input, Output = M::Output>,
{
    minimize(model, problem, x0, bounds, config, ())
}
