//! Solvers for constrained minimization problems.
//!
//! A [`ConstrainedMinimizationProblem`] maps solver variables `x: [f64; N]` to
//! model inputs, calls the model, and extracts a scalar objective together with
//! inequality and equality constraint residuals. Solvers in this module search
//! for the `x` that minimizes the objective while satisfying the constraints.
//!
//! # Solvers
//!
//! - [`sqp`]: sequential quadratic programming over a bounded box with
//!   finite-difference gradients
//!
//! [`ConstrainedMinimizationProblem`]: powderopt_core::ConstrainedMinimizationProblem

mod evaluate;

pub use evaluate::{EvalError, EvaluateResult, Evaluation, evaluate};

pub mod sqp;
