use thiserror::Error;

/// Configuration for the SQP solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// Maximum number of major iterations.
    pub max_iters: usize,

    /// Maximum number of evaluations, including gradient probes.
    pub max_evals: usize,

    /// Largest constraint violation accepted as feasible.
    pub constraint_tol: f64,

    /// Step length (infinity norm, normalized coordinates) below which the
    /// search is considered stationary.
    pub step_tol: f64,

    /// Relative change in the scaled objective below which a feasible
    /// iterate is considered converged.
    pub function_tol: f64,
}

/// Errors that can occur when validating an SQP solver config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max_evals must be at least 1")]
    MaxEvals,

    #[error("constraint_tol must be finite and non-negative")]
    ConstraintTol,

    #[error("step_tol must be finite and positive")]
    StepTol,

    #[error("function_tol must be finite and non-negative")]
    FunctionTol,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_iters: 5000,
            max_evals: 10_000,
            constraint_tol: 1e-6,
            step_tol: 1e-10,
            function_tol: 1e-10,
        }
    }
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the evaluation budget is zero or any tolerance is
    /// negative or non-finite. The step tolerance must be strictly positive
    /// so the line search always terminates.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_evals == 0 {
            return Err(ConfigError::MaxEvals);
        }
        if !self.constraint_tol.is_finite() || self.constraint_tol < 0.0 {
            return Err(ConfigError::ConstraintTol);
        }
        if !self.step_tol.is_finite() || self.step_tol <= 0.0 {
            return Err(ConfigError::StepTol);
        }
        if !self.function_tol.is_finite() || self.function_tol < 0.0 {
            return Err(ConfigError::FunctionTol);
        }
        Ok(())
    }
}
