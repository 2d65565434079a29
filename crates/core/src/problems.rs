pub mod optimization;

pub use optimization::{ConstrainedMinimizationProblem, ConstraintResiduals, MinimizationProblem};
