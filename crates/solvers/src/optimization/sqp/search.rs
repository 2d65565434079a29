use powderopt_core::{ConstrainedMinimizationProblem, Model, Observer};

use crate::optimization::Evaluation;

use super::{
    Action, Bounds, Config, ConfigError, Error, Event, Point, Solution, Status,
    evaluator::{Evaluator, Halt},
    gradient::linearize,
    qp,
    state::State,
};

/// Factor applied to the line-search multiplier after each rejected trial.
const BACKTRACK: f64 = 0.5;

/// Fraction of the predicted merit decrease a trial must achieve.
const ARMIJO: f64 = 0.1;

/// Largest predicted merit change, relative to the merit, at which a stalled
/// line search still counts as a stationary point.
const STATIONARY_SLOPE: f64 = 1e-6;

/// Core SQP loop.
pub(super) fn search<M, P, Obs, const N: usize>(
    model: &M,
    problem: &P,
    x0: [f64; N],
    bounds: &Bounds<N>,
    config: &Config,
    mut observer: Obs,
) -> Result<Solution<M::Input, M::Output, N>, Error>
where
    M: Model,
    P: ConstrainedMinimizationProblem<N, Input = M::Input, Output = M::Output>,
    Obs: for<'a> Observer<Event<'a, M::Input, M::Output, N>, Action>,
{
    config.validate()?;
    bounds.check(&x0)?;

    let mut evaluator = Evaluator::new(model, problem, *bounds, config.max_evals);
    let initial = evaluator.at(x0).map_err(|halt| match halt {
        Halt::Failed { error, .. } => error,
        // Unreachable once `validate` has accepted `max_evals`.
        Halt::Exhausted => Error::InvalidConfig(ConfigError::MaxEvals),
    })?;
    evaluator.normalize_by(initial.objective);

    // Status for a search that can make no further progress while infeasible.
    let stalled = if initial.residuals.is_feasible(config.constraint_tol) {
        Status::NumericalFailure
    } else {
        Status::InfeasibleStart
    };

    let event = Event::Iterate {
        iter: 0,
        point: Point::from(&initial),
        alpha: 0.0,
        snapshot: &initial.snapshot,
    };
    if matches!(observer.observe(&event), Some(Action::StopEarly)) {
        return Ok(Solution::new(
            initial,
            Status::StoppedByObserver,
            0,
            evaluator.evals(),
        ));
    }

    let z0 = bounds.to_unit(&x0);
    let linearization = match linearize(&mut evaluator, &z0, &initial) {
        Ok(lin) => lin,
        Err(halt) => return Ok(halted(halt, initial, 0, evaluator.evals(), &mut observer)),
    };
    let mut state = State::new(z0, initial, linearization);

    for iter in 1..=config.max_iters {
        let step = qp::solve(
            state.hessian.matrix(),
            &state.linearization,
            &state.current.residuals,
            &state.z,
        );
        let length = step.length();
        let feasible = state.current.residuals.is_feasible(config.constraint_tol);

        if length <= config.step_tol {
            let status = if feasible { Status::Converged } else { stalled };
            return Ok(state.into_solution(status, iter, evaluator.evals()));
        }

        state.update_penalties(&step);
        let scale = evaluator.scale();
        let merit = state.merit(&state.current, scale);
        let slope = state.slope(&step);

        let mut alpha = 1.0;
        let mut any_finite = false;
        let accepted = loop {
            let z: [f64; N] = std::array::from_fn(|k| {
                (state.z[k] + alpha * step.direction[k]).clamp(0.0, 1.0)
            });

            match evaluator.at_unit(&z) {
                Ok(trial) => {
                    any_finite = true;
                    let event = Event::Trial {
                        iter,
                        point: Point::from(&trial),
                        alpha,
                        snapshot: &trial.snapshot,
                    };
                    match observer.observe(&event) {
                        Some(Action::StopEarly) => {
                            return Ok(state.into_solution(
                                Status::StoppedByObserver,
                                iter,
                                evaluator.evals(),
                            ));
                        }
                        Some(Action::AssumeWorse) => {}
                        None => {
                            let trial_merit = state.merit(&trial, scale);
                            if sufficient_decrease(trial_merit, merit, alpha, slope) {
                                break Some((z, trial, alpha));
                            }
                        }
                    }
                }
                Err(Halt::Exhausted) => {
                    return Ok(state.into_solution(
                        Status::MaxEvaluationsReached,
                        iter,
                        evaluator.evals(),
                    ));
                }
                Err(Halt::Failed { x, error }) => {
                    let event = Event::Failed {
                        iter,
                        x,
                        error: &error,
                    };
                    if matches!(observer.observe(&event), Some(Action::StopEarly)) {
                        return Ok(state.into_solution(
                            Status::StoppedByObserver,
                            iter,
                            evaluator.evals(),
                        ));
                    }
                }
            }

            alpha *= BACKTRACK;
            if alpha * length <= config.step_tol {
                break None;
            }
        };

        let Some((z, trial, alpha)) = accepted else {
            let stationary = slope.abs() <= STATIONARY_SLOPE * (1.0 + merit.abs());
            let status = if !any_finite {
                Status::NumericalFailure
            } else if feasible && stationary {
                Status::Converged
            } else if feasible {
                Status::NumericalFailure
            } else {
                stalled
            };
            return Ok(state.into_solution(status, iter, evaluator.evals()));
        };

        let linearization = match linearize(&mut evaluator, &z, &trial) {
            Ok(lin) => lin,
            Err(halt) => {
                return Ok(halted(halt, trial, iter, evaluator.evals(), &mut observer));
            }
        };

        let previous = scale * state.current.objective;
        let moved = state.advance(z, trial, linearization, &step);
        let objective = scale * state.current.objective;

        let event = Event::Iterate {
            iter,
            point: Point::from(&state.current),
            alpha,
            snapshot: &state.current.snapshot,
        };
        if matches!(observer.observe(&event), Some(Action::StopEarly)) {
            return Ok(state.into_solution(
                Status::StoppedByObserver,
                iter,
                evaluator.evals(),
            ));
        }

        let feasible = state.current.residuals.is_feasible(config.constraint_tol);
        let stationary = moved <= config.step_tol
            || (objective - previous).abs() <= config.function_tol * (1.0 + objective.abs());
        if feasible && stationary {
            return Ok(state.into_solution(Status::Converged, iter, evaluator.evals()));
        }
    }

    Ok(state.into_solution(
        Status::MaxIterationsReached,
        config.max_iters,
        evaluator.evals(),
    ))
}

/// Armijo test on the merit function.
///
/// When the step is not a descent direction for the merit (possible while
/// relaxing inconsistent constraints), any strict decrease is accepted.
fn sufficient_decrease(trial: f64, current: f64, alpha: f64, slope: f64) -> bool {
    if slope < 0.0 {
        trial <= current + ARMIJO * alpha * slope
    } else {
        trial < current
    }
}

/// Builds the solution when gradient estimation cannot proceed from `at`.
fn halted<I, O, Obs, const N: usize>(
    halt: Halt<N>,
    at: Evaluation<I, O, N>,
    iter: usize,
    evals: usize,
    observer: &mut Obs,
) -> Solution<I, O, N>
where
    Obs: for<'a> Observer<Event<'a, I, O, N>, Action>,
{
    let status = match halt {
        Halt::Exhausted => Status::MaxEvaluationsReached,
        Halt::Failed { x, error } => {
            let event = Event::Failed {
                iter,
                x,
                error: &error,
            };
            match observer.observe(&event) {
                Some(Action::StopEarly) => Status::StoppedByObserver,
                _ => Status::NumericalFailure,
            }
        }
    };
    Solution::new(at, status, iter, evals)
}
