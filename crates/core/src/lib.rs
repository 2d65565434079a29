//! Core traits and types for powderopt.
//!
//! This crate defines the shared abstractions that solvers, observers, and
//! process models build on:
//!
//! - [`Model`]: a callable that maps a typed input to a typed output
//! - [`Snapshot`]: a captured input/output pair from a model call
//! - [`Observer`]: receives solver events and optionally returns control actions
//! - [`MinimizationProblem`], [`ConstrainedMinimizationProblem`]: problem
//!   traits that adapt solver variables to model inputs and extract objectives
//!   and constraint residuals from outputs

mod model;
mod observer;
mod problems;

pub use observer::Observer;
pub use problems::{ConstrainedMinimizationProblem, ConstraintResiduals, MinimizationProblem};
pub use {model::Model, model::Snapshot};
