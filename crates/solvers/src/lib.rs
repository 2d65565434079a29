//! Numerical solvers for powderopt.
//!
//! Solvers are generic over a [`Model`](powderopt_core::Model) and a problem
//! trait from `powderopt-core`. They never log; progress is reported through
//! typed events passed to an [`Observer`](powderopt_core::Observer).

pub mod optimization;
