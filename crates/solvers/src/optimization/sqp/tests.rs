use std::convert::Infallible;

use approx::assert_relative_eq;
use thiserror::Error;

use powderopt_core::{
    ConstrainedMinimizationProblem, ConstraintResiduals, MinimizationProblem, Model,
};

use super::{
    Action, Bounds, Config, ConfigError, Error, Event, Status, minimize, minimize_unobserved,
};

/// Passes the solver variables straight through as the model input.
struct Identity<const N: usize>;

impl<const N: usize> Model for Identity<N> {
    type Input = [f64; N];
    type Output = [f64; N];
    type Error = Infallible;

    fn call(&self, x: &[f64; N]) -> Result<[f64; N], Self::Error> {
        Ok(*x)
    }
}

/// A problem defined by plain functions of `x`.
struct Functions<const N: usize> {
    objective: fn(&[f64; N]) -> f64,
    inequalities: fn(&[f64; N]) -> Vec<f64>,
    equalities: fn(&[f64; N]) -> Vec<f64>,
}

impl<const N: usize> Functions<N> {
    fn unconstrained(objective: fn(&[f64; N]) -> f64) -> Self {
        Self {
            objective,
            inequalities: |_| vec![],
            equalities: |_| vec![],
        }
    }
}

impl<const N: usize> MinimizationProblem<N> for Functions<N> {
    type Input = [f64; N];
    type Output = [f64; N];
    type Error = Infallible;

    fn input(&self, x: &[f64; N]) -> Result<[f64; N], Self::Error> {
        Ok(*x)
    }

    fn objective(&self, _input: &[f64; N], output: &[f64; N]) -> Result<f64, Self::Error> {
        Ok((self.objective)(output))
    }
}

impl<const N: usize> ConstrainedMinimizationProblem<N> for Functions<N> {
    fn constraints(
        &self,
        _input: &[f64; N],
        output: &[f64; N],
    ) -> Result<ConstraintResiduals, Self::Error> {
        Ok(ConstraintResiduals::new(
            (self.inequalities)(output),
            (self.equalities)(output),
        ))
    }
}

fn paraboloid(x: &[f64; 2]) -> f64 {
    (x[0] - 1.0).powi(2) + (x[1] - 2.0).powi(2)
}

fn rosenbrock(x: &[f64; 2]) -> f64 {
    100.0 * (x[1] - x[0].powi(2)).powi(2) + (1.0 - x[0]).powi(2)
}

fn wide_box() -> Bounds<2> {
    Bounds::new([-5.0, -5.0], [5.0, 5.0]).unwrap()
}

#[test]
fn finds_unconstrained_interior_minimum() {
    let problem = Functions::unconstrained(paraboloid);

    let solution = minimize_unobserved(
        &Identity,
        &problem,
        [0.0, 0.0],
        &wide_box(),
        &Config::default(),
    )
    .expect("should solve");

    assert_eq!(solution.status, Status::Converged);
    assert_relative_eq!(solution.x[0], 1.0, epsilon = 1e-6);
    assert_relative_eq!(solution.x[1], 2.0, epsilon = 1e-6);
}

#[test]
fn respects_active_inequality() {
    let problem = Functions {
        objective: paraboloid,
        inequalities: |x| vec![x[0] + x[1] - 2.0],
        equalities: |_| vec![],
    };

    let solution = minimize_unobserved(
        &Identity,
        &problem,
        [0.0, 0.0],
        &wide_box(),
        &Config::default(),
    )
    .expect("should solve");

    assert_eq!(solution.status, Status::Converged);
    assert_relative_eq!(solution.x[0], 0.5, epsilon = 1e-6);
    assert_relative_eq!(solution.x[1], 1.5, epsilon = 1e-6);
    assert_relative_eq!(solution.objective, 0.5, epsilon = 1e-6);
    assert!(solution.residuals.inequalities[0] <= 1e-6);
}

#[test]
fn satisfies_equality() {
    let problem = Functions {
        objective: paraboloid,
        inequalities: |_| vec![],
        equalities: |x| vec![x[0] - x[1]],
    };

    let solution = minimize_unobserved(
        &Identity,
        &problem,
        [0.0, 3.0],
        &wide_box(),
        &Config::default(),
    )
    .expect("should solve");

    assert_eq!(solution.status, Status::Converged);
    assert_relative_eq!(solution.x[0], 1.5, epsilon = 1e-4);
    assert_relative_eq!(solution.x[1], 1.5, epsilon = 1e-4);
    assert!(solution.residuals.equalities[0].abs() <= 1e-6);
}

#[test]
fn stops_at_active_bound() {
    let problem = Functions::unconstrained(|x: &[f64; 1]| (x[0] - 3.0).powi(2));
    let bounds = Bounds::new([0.0], [2.0]).unwrap();

    let solution = minimize_unobserved(&Identity, &problem, [1.0], &bounds, &Config::default())
        .expect("should solve");

    assert_eq!(solution.status, Status::Converged);
    assert_relative_eq!(solution.x[0], 2.0);
    assert_relative_eq!(solution.objective, 1.0);
}

#[test]
fn minimizes_rosenbrock() {
    let problem = Functions::unconstrained(rosenbrock);
    let bounds = Bounds::new([-2.0, -2.0], [2.0, 2.0]).unwrap();

    let solution = minimize_unobserved(
        &Identity,
        &problem,
        [-1.2, 1.0],
        &bounds,
        &Config::default(),
    )
    .expect("should solve");

    assert_eq!(solution.status, Status::Converged);
    assert_relative_eq!(solution.x[0], 1.0, epsilon = 1e-3);
    assert_relative_eq!(solution.x[1], 1.0, epsilon = 1e-3);
    assert!(solution.evals <= Config::default().max_evals);
}

#[test]
fn reports_infeasible_start() {
    // x ≥ 2 cannot hold inside [0, 1].
    let problem = Functions {
        objective: |x: &[f64; 1]| x[0].powi(2),
        inequalities: |x| vec![2.0 - x[0]],
        equalities: |_| vec![],
    };
    let bounds = Bounds::new([0.0], [1.0]).unwrap();

    let solution = minimize_unobserved(&Identity, &problem, [0.5], &bounds, &Config::default())
        .expect("should return a solution");

    assert_eq!(solution.status, Status::InfeasibleStart);
    assert!(solution.residuals.max_violation() > 0.9);
    assert!(bounds.contains(&solution.x));
}

#[test]
fn hits_iteration_limit() {
    let problem = Functions::unconstrained(rosenbrock);
    let bounds = Bounds::new([-2.0, -2.0], [2.0, 2.0]).unwrap();
    let config = Config {
        max_iters: 3,
        ..Config::default()
    };

    let solution = minimize_unobserved(&Identity, &problem, [-1.2, 1.0], &bounds, &config)
        .expect("should return a solution");

    assert_eq!(solution.status, Status::MaxIterationsReached);
    assert_eq!(solution.iters, 3);
}

#[test]
fn never_exceeds_evaluation_budget() {
    let problem = Functions::unconstrained(rosenbrock);
    let bounds = Bounds::new([-2.0, -2.0], [2.0, 2.0]).unwrap();
    let config = Config {
        max_evals: 20,
        ..Config::default()
    };

    let solution = minimize_unobserved(&Identity, &problem, [-1.2, 1.0], &bounds, &config)
        .expect("should return a solution");

    assert_eq!(solution.status, Status::MaxEvaluationsReached);
    assert_eq!(solution.evals, 20);
    assert!(solution.objective < rosenbrock(&[-1.2, 1.0]));
}

#[test]
fn every_reported_point_stays_in_bounds() {
    let problem = Functions {
        objective: paraboloid,
        inequalities: |x| vec![x[0] + x[1] - 2.0],
        equalities: |_| vec![],
    };
    let bounds = Bounds::new([0.5, 0.0], [3.0, 1.0]).unwrap();

    let mut seen = Vec::new();
    let observer = |event: &Event<'_, _, _, 2>| -> Option<Action> {
        seen.push(event.x());
        None
    };

    // Start on the lower bound of the first variable.
    let solution = minimize(
        &Identity,
        &problem,
        [0.5,
        0.0],
        &bounds,
        &Config::default(),
        observer,
    )
    .expect("should solve");

    assert_eq!(solution.status, Status::Converged);
    assert!(!seen.is_empty());
    assert!(seen.iter().all(|x| bounds.contains(x)));
    assert_relative_eq!(solution.x[1], 1.0, epsilon = 1e-6);
}

#[test]
fn observer_can_stop_early() {
    let problem = Functions::unconstrained(rosenbrock);
    let bounds = Bounds::new([-2.0, -2.0], [2.0, 2.0]).unwrap();

    let observer = |event: &Event<'_, _, _, 2>| match event {
        Event::Iterate { iter: 2, .. } => Some(Action::StopEarly),
        _ => None,
    };

    let solution = minimize(
        &Identity,
        &problem,
        [-1.2, 1.0],
        &bounds,
        &Config::default(),
        observer,
    )
    .expect("should return a solution");

    assert_eq!(solution.status, Status::StoppedByObserver);
    assert_eq!(solution.iters, 2);
}

#[test]
fn assume_worse_steers_away_from_region() {
    let problem = Functions::unconstrained(|x: &[f64; 1]| (x[0] - 3.0).powi(2));
    let bounds = Bounds::new([0.0], [2.0]).unwrap();

    let mut accepted = Vec::new();
    let observer = |event: &Event<'_, _, _, 1>| match event {
        Event::Trial { point, .. } if point.x[0] > 1.5 => Some(Action::AssumeWorse),
        Event::Iterate { point, .. } => {
            accepted.push(point.x[0]);
            None
        }
        _ => None,
    };

    let solution = minimize(
        &Identity,
        &problem,
        [0.5],
        &bounds,
        &Config::default(),
        observer,
    )
    .expect("should return a solution");

    assert!(accepted.iter().all(|&x| x <= 1.5));
    assert!(solution.x[0] <= 1.5);
}

#[test]
fn rejecting_every_trial_is_not_convergence() {
    let problem = Functions::unconstrained(paraboloid);
    let observer = |event: &Event<'_, _, _, 2>| match event {
        Event::Trial { .. } => Some(Action::AssumeWorse),
        _ => None,
    };

    let solution = minimize(
        &Identity,
        &problem,
        [0.0, 0.0],
        &wide_box(),
        &Config::default(),
        observer,
    )
    .expect("should return a solution");

    assert_eq!(solution.status, Status::NumericalFailure);
    assert_eq!(solution.iters, 1);
    assert_eq!(solution.x, [0.0, 0.0]);
    assert_relative_eq!(solution.objective, 5.0);
}

/// Error returned by [`Fragile`] outside its domain.
#[derive(Debug, Error)]
#[error("outside model domain")]
struct OutsideDomain;

/// f(x) = (x - 1)², undefined for x > 3.
struct Fragile;

impl Model for Fragile {
    type Input = [f64; 1];
    type Output = [f64; 1];
    type Error = OutsideDomain;

    fn call(&self, x: &[f64; 1]) -> Result<[f64; 1], Self::Error> {
        if x[0] > 3.0 {
            Err(OutsideDomain)
        } else {
            Ok([(x[0] - 1.0).powi(2)])
        }
    }
}

#[test]
fn backtracks_past_failed_trials() {
    let problem = Functions::unconstrained(|y: &[f64; 1]| y[0]);
    let bounds = Bounds::new([0.0], [4.0]).unwrap();

    let mut failures = 0;
    let observer = |event: &Event<'_, _, _, 1>| -> Option<Action> {
        if let Event::Failed { error, .. } = event {
            assert!(matches!(error, Error::Model(_)));
            failures += 1;
        }
        None
    };

    let solution = minimize(
        &Fragile,
        &problem,
        [0.5],
        &bounds,
        &Config::default(),
        observer,
    )
    .expect("should solve");

    assert_eq!(solution.status, Status::Converged);
    assert_relative_eq!(solution.x[0], 1.0, epsilon = 1e-6);
    assert!(failures >= 1);
}

#[test]
fn rejects_invalid_inputs() {
    let problem = Functions::unconstrained(paraboloid);
    let config = Config::default();

    assert!(matches!(
        Bounds::new([1.0, 0.0], [1.0, 1.0]),
        Err(Error::InvalidBounds { index: 0, .. })
    ));

    let result = minimize_unobserved(&Identity, &problem, [f64::NAN, 0.0], &wide_box(), &config);
    assert!(matches!(
        result,
        Err(Error::NonFiniteInitialGuess { index: 0, .. })
    ));

    let result = minimize_unobserved(&Identity, &problem, [0.0, 6.0], &wide_box(), &config);
    assert!(matches!(
        result,
        Err(Error::InitialGuessOutOfBounds { index: 1, .. })
    ));

    let bad_config = Config {
        step_tol: -1.0,
        ..config
    };
    let result = minimize_unobserved(&Identity, &problem, [0.0, 0.0], &wide_box(), &bad_config);
    assert!(matches!(
        result,
        Err(Error::InvalidConfig(ConfigError::StepTol))
    ));
}

#[test]
fn non_finite_start_is_an_error() {
    let problem = Functions::unconstrained(|x: &[f64; 1]| 1.0 / x[0]);
    let bounds = Bounds::new([0.0], [1.0]).unwrap();

    let result = minimize_unobserved(&Identity, &problem, [0.0], &bounds, &Config::default());

    assert!(matches!(result, Err(Error::NonFiniteEvaluation { .. })));
}
