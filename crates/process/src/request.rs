use thiserror::Error;
use uom::si::{
    f64::{Length, Mass},
    length::micrometer,
    mass::kilogram,
};

use crate::{ImpactCategory, Region};

/// What the user asks of a run: how much powder, how fine, and which impact
/// to minimize where.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Request {
    final_mass: Mass,
    target_diameter: Length,
    category: ImpactCategory,
    region: Region,
}

/// A user input that cannot be accepted.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InputError {
    #[error("final powder mass must be positive and finite, got {0} kg")]
    FinalMass(f64),

    #[error("target particle diameter must be positive and finite, got {0} µm")]
    TargetDiameter(f64),

    #[error("unknown impact category `{0}`")]
    UnknownCategory(String),

    #[error("unknown region `{0}` (expected EU or CN)")]
    UnknownRegion(String),
}

impl Request {
    /// Creates a validated request.
    ///
    /// # Errors
    ///
    /// Returns an [`InputError`] if the mass or diameter is not a positive,
    /// finite quantity.
    pub fn new(
        final_mass: Mass,
        target_diameter: Length,
        category: ImpactCategory,
        region: Region,
    ) -> Result<Self, InputError> {
        let kg = final_mass.get::<kilogram>();
        if !(kg.is_finite() && kg > 0.0) {
            return Err(InputError::FinalMass(kg));
        }
        let um = target_diameter.get::<micrometer>();
        if !(um.is_finite() && um > 0.0) {
            return Err(InputError::TargetDiameter(um));
        }
        Ok(Self {
            final_mass,
            target_diameter,
            category,
            region,
        })
    }

    #[must_use]
    pub fn final_mass(&self) -> Mass {
        self.final_mass
    }

    #[must_use]
    pub fn target_diameter(&self) -> Length {
        self.target_diameter
    }

    #[must_use]
    pub fn category(&self) -> ImpactCategory {
        self.category
    }

    #[must_use]
    pub fn region(&self) -> Region {
        self.region
    }
}
