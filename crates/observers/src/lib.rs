//! Reusable observers for powderopt solvers.
//!
//! This crate provides [`Observer`] implementations and capability traits that
//! work with the solvers in `powderopt-solvers`.
//!
//! # Modules
//!
//! - [`traits`]: Capability traits for solver-agnostic observers
//!   ([`HasObjective`], [`HasViolation`], [`CanStopEarly`], [`CanAssumeWorse`])
//!
//! # Observers
//!
//! - [`TracingObserver`]: forwards solver events to `tracing`
//! - [`Recorder`]: keeps the history of accepted iterates
//!
//! Observers compose as pairs, so a run can log and record at once:
//!
//! ```rust,ignore
//! let mut recorder = Recorder::new();
//! sqp::minimize(&model, &problem, x0, &bounds, &config, (TracingObserver, &mut recorder))?;
//! ```
//!
//! [`Observer`]: powderopt_core::Observer
//! [`HasObjective`]: traits::HasObjective
//! [`HasViolation`]: traits::HasViolation
//! [`CanStopEarly`]: traits::CanStopEarly
//! [`CanAssumeWorse`]: traits::CanAssumeWorse

pub mod traits;

mod log;
mod record;

pub use log::TracingObserver;
pub use record::{Record, Recorder};
