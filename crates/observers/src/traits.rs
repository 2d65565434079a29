//! Capability traits for solver-agnostic observers.
//!
//! These traits abstract over solver-specific event and action types, so an
//! observer written once works with any solver whose types implement them.
//!
//! # Event traits
//!
//! - [`HasObjective`]: events that carry an objective value
//! - [`HasViolation`]: events that carry a constraint violation
//!
//! # Action traits
//!
//! - [`CanStopEarly`]: actions that can signal early termination
//! - [`CanAssumeWorse`]: actions that can reject an evaluated point
//!
//! # Example
//!
//! ```rust
//! use powderopt_core::Observer;
//! use powderopt_observers::traits::{CanStopEarly, HasObjective, HasViolation};
//!
//! /// Stops once a feasible point beats a known target.
//! struct GoodEnough {
//!     target: f64,
//!     tolerance: f64,
//! }
//!
//! impl<E: HasObjective + HasViolation, A: CanStopEarly> Observer<E, A> for GoodEnough {
//!     fn observe(&mut self, event: &E) -> Option<A> {
//!         let feasible = event.violation() <= self.tolerance;
//!         (feasible && event.objective() <= self.target).then(A::stop_early)
//!     }
//! }
//! ```

use powderopt_solvers::optimization::sqp;

/// An event that carries an objective value.
pub trait HasObjective {
    /// Returns the objective for this event.
    ///
    /// Returns `f64::NAN` when the event represents an error and no objective
    /// is available.
    fn objective(&self) -> f64;
}

/// An event that carries the largest constraint violation at its point.
pub trait HasViolation {
    /// Returns the constraint violation for this event.
    ///
    /// Returns `f64::NAN` when the event represents an error.
    fn violation(&self) -> f64;
}

/// An action type that can signal early termination.
pub trait CanStopEarly {
    /// Returns the action that stops the solver early.
    fn stop_early() -> Self;
}

/// An action type that can reject an evaluated point.
pub trait CanAssumeWorse {
    /// Returns the action that treats this evaluation as unacceptable.
    fn assume_worse() -> Self;
}

// --- Event traits for sqp::Event ---

impl<I, O, const N: usize> HasObjective for sqp::Event<'_, I, O, N> {
    fn objective(&self) -> f64 {
        match self {
            sqp::Event::Iterate { point, .. } | sqp::Event::Trial { point, .. } => point.objective,
            sqp::Event::Failed { .. } => f64::NAN,
        }
    }
}

impl<I, O, const N: usize> HasViolation for sqp::Event<'_, I, O, N> {
    fn violation(&self) -> f64 {
        match self {
            sqp::Event::Iterate { point, .. } | sqp::Event::Trial { point, .. } => point.violation,
            sqp::Event::Failed { .. } => f64::NAN,
        }
    }
}

// --- Action traits for sqp::Action ---

impl CanStopEarly for sqp::Action {
    fn stop_early() -> Self {
        Self::StopEarly
    }
}

impl CanAssumeWorse for sqp::Action {
    fn assume_worse() -> Self {
        Self::AssumeWorse
    }
}
