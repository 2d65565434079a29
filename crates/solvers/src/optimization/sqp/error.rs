use crate::optimization::EvalError;

use super::ConfigError;

/// Errors that can occur during an SQP search.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid solver config: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("invalid bounds for variable {index}: [{lower}, {upper}]")]
    InvalidBounds {
        index: usize,
        lower: f64,
        upper: f64,
    },

    #[error("initial guess for variable {index} is not finite: {value}")]
    NonFiniteInitialGuess { index: usize, value: f64 },

    #[error("initial guess for variable {index} ({value}) lies outside [{lower}, {upper}]")]
    InitialGuessOutOfBounds {
        index: usize,
        value: f64,
        lower: f64,
        upper: f64,
    },

    #[error("model error: {0}")]
    Model(Box<dyn std::error::Error + Send + Sync>),

    #[error("problem error: {0}")]
    Problem(Box<dyn std::error::Error + Send + Sync>),

    #[error("objective or constraint residual is not finite at x = {x:?}")]
    NonFiniteEvaluation { x: Vec<f64> },

    #[error("constraint count changed from {expected:?} to {found:?}")]
    ResidualShape {
        expected: (usize, usize),
        found: (usize, usize),
    },
}

impl<ME, PE> From<EvalError<ME, PE>> for Error
where
    ME: std::error::Error + Send + Sync + 'static,
    PE: std::error::Error + Send + Sync + 'static,
{
    fn from(error: EvalError<ME, PE>) -> Self {
        match error {
            EvalError::Model(e) => Error::Model(Box::new(e)),
            EvalError::Problem(e) => Error::Problem(Box::new(e)),
        }
    }
}
