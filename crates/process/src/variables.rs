//! The three free process variables and the box they are searched in.

use powderopt_solvers::optimization::sqp::{self, Bounds};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uom::si::{
    f64::{Length, Pressure, Ratio},
    length::meter,
    pressure::megapascal,
    ratio::ratio,
};

/// Human-readable names of the variables, in solver order.
pub const VARIABLE_NAMES: [&str; 3] = [
    "electrode diameter",
    "atomization pressure",
    "TiO2 fraction",
];

/// Units of the variables as the solver sees them, in solver order.
pub const VARIABLE_UNITS: [&str; 3] = ["m", "MPa", "-"];

/// The operating point chosen by the optimizer.
///
/// The solver works on `[φ, p, β]` as plain numbers in meters, megapascals and
/// a mass fraction; [`DecisionVariables::from_array`] and
/// [`DecisionVariables::to_array`] convert between the two views.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionVariables {
    pub electrode_diameter: Length,
    pub atomization_pressure: Pressure,
    /// Mass fraction of TiO2 in the smelted slag.
    pub tio2_fraction: Ratio,
}

impl DecisionVariables {
    #[must_use]
    pub fn new(
        electrode_diameter: Length,
        atomization_pressure: Pressure,
        tio2_fraction: Ratio,
    ) -> Self {
        Self {
            electrode_diameter,
            atomization_pressure,
            tio2_fraction,
        }
    }

    #[must_use]
    pub fn from_array([phi, p, beta]: [f64; 3]) -> Self {
        Self::new(
            Length::new::<meter>(phi),
            Pressure::new::<megapascal>(p),
            Ratio::new::<ratio>(beta),
        )
    }

    #[must_use]
    pub fn to_array(&self) -> [f64; 3] {
        [
            self.electrode_diameter.get::<meter>(),
            self.atomization_pressure.get::<megapascal>(),
            self.tio2_fraction.get::<ratio>(),
        ]
    }
}

/// Initial guess and bounds for `[φ (m), p (MPa), β (-)]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchSpace {
    pub initial: [f64; 3],
    pub lower: [f64; 3],
    pub upper: [f64; 3],
}

impl Default for SearchSpace {
    fn default() -> Self {
        Self {
            initial: [0.06, 6.0, 0.86],
            lower: [0.05, 5.5, 0.75],
            upper: [0.10, 7.0, 0.9],
        }
    }
}

/// A search space that cannot be searched.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SearchSpaceError {
    #[error("{variable}: bounds and initial guess must be finite")]
    NonFinite { variable: &'static str },

    #[error("{variable}: lower bound must be positive, got {lower}")]
    NotPositive { variable: &'static str, lower: f64 },

    #[error("{variable}: lower bound {lower} must be below upper bound {upper}")]
    EmptyRange {
        variable: &'static str,
        lower: f64,
        upper: f64,
    },

    #[error("{variable}: upper bound must not exceed 1, got {upper}")]
    FractionAboveOne { variable: &'static str, upper: f64 },

    #[error("{variable}: initial guess {value} lies outside [{lower}, {upper}]")]
    InitialOutOfRange {
        variable: &'static str,
        value: f64,
        lower: f64,
        upper: f64,
    },

    #[error("search bounds rejected: {0}")]
    Rejected(String),
}

impl SearchSpace {
    /// Validates the space and returns its solver bounds.
    ///
    /// Every lower bound must be positive because the process model divides by
    /// the TiO2 fraction and the argon fit diverges as the diameter vanishes.
    /// A guess exactly on a bound is accepted.
    ///
    /// # Errors
    ///
    /// Returns a [`SearchSpaceError`] naming the offending variable.
    pub fn bounds(&self) -> Result<Bounds<3>, SearchSpaceError> {
        for (i, variable) in VARIABLE_NAMES.into_iter().enumerate() {
            let (value, lower, upper) = (self.initial[i], self.lower[i], self.upper[i]);
            if !(value.is_finite() && lower.is_finite() && upper.is_finite()) {
                return Err(SearchSpaceError::NonFinite { variable });
            }
            if lower <= 0.0 {
                return Err(SearchSpaceError::NotPositive { variable, lower });
            }
        }

        let bounds = Bounds::new(self.lower, self.upper).map_err(|error| match error {
            sqp::Error::InvalidBounds {
                index,
                lower,
                upper,
            } => SearchSpaceError::EmptyRange {
                variable: VARIABLE_NAMES[index],
                lower,
                upper,
            },
            other => SearchSpaceError::Rejected(other.to_string()),
        })?;

        for (i, variable) in VARIABLE_NAMES.into_iter().enumerate() {
            let (value, lower, upper) = (self.initial[i], self.lower[i], self.upper[i]);
            if i == 2 && upper > 1.0 {
                return Err(SearchSpaceError::FractionAboveOne { variable, upper });
            }
            if !(lower..=upper).contains(&value) {
                return Err(SearchSpaceError::InitialOutOfRange {
                    variable,
                    value,
                    lower,
                    upper,
                });
            }
        }

        Ok(bounds)
    }
}
