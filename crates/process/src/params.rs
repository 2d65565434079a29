//! Plant constants: everything about the process that the user does not
//! choose per run.
//!
//! Every group deserializes with `#[serde(default)]`, so a configuration file
//! only needs to name the values it overrides.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A quadratic `c0 + c1·x + c2·x²`, written as `[c0, c1, c2]` in config files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Quadratic {
    pub c0: f64,
    pub c1: f64,
    pub c2: f64,
}

impl Quadratic {
    #[must_use]
    pub const fn new(c0: f64, c1: f64, c2: f64) -> Self {
        Self { c0, c1, c2 }
    }

    /// Evaluates the quadratic at `x`.
    #[must_use]
    pub fn eval(&self, x: f64) -> f64 {
        self.c0 + x * (self.c1 + x * self.c2)
    }

    fn is_finite(&self) -> bool {
        self.c0.is_finite() && self.c1.is_finite() && self.c2.is_finite()
    }
}

impl From<[f64; 3]> for Quadratic {
    fn from([c0, c1, c2]: [f64; 3]) -> Self {
        Self::new(c0, c1, c2)
    }
}

impl From<Quadratic> for [f64; 3] {
    fn from(q: Quadratic) -> Self {
        [q.c0, q.c1, q.c2]
    }
}

/// Mass fractions of the alloying elements, relative to titanium sponge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Alloy {
    pub aluminum: f64,
    pub vanadium: f64,
}

impl Default for Alloy {
    fn default() -> Self {
        Self {
            aluminum: 0.0638,
            vanadium: 0.0426,
        }
    }
}

/// Fixed mass ratios (output per unit input) of the upstream stages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StageRatios {
    /// Ti slag per kg ilmenite.
    pub smelting: f64,
    /// TiCl4 per kg TiO2.
    pub chlorination: f64,
    /// Ti sponge per kg TiCl4.
    pub reduction: f64,
}

impl Default for StageRatios {
    fn default() -> Self {
        Self {
            smelting: 0.58,
            chlorination: 2.256,
            reduction: 0.2448,
        }
    }
}

/// Gas atomization physics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Atomization {
    /// Kinematic viscosity of the melt, m²/s.
    pub melt_viscosity: f64,
    /// Kinematic viscosity of the atomizing gas, m²/s.
    pub gas_viscosity: f64,
    /// Weber number of the gas jet.
    pub weber_number: f64,
    /// Lubanska droplet-size constant.
    pub lubanska_constant: f64,
    /// Fraction of argon recovered and reused.
    pub argon_recycling: f64,
}

impl Default for Atomization {
    fn default() -> Self {
        Self {
            melt_viscosity: 1.27e-6,
            gas_viscosity: 1.39e-5,
            weber_number: 4.1e7,
            lubanska_constant: 23.0,
            argon_recycling: 0.9,
        }
    }
}

/// Argon compression.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Compression {
    /// Molar mass of argon, kg/mol.
    pub molar_mass: f64,
    /// Universal gas constant, J/(mol·K).
    pub gas_constant: f64,
    /// Gas temperature, K.
    pub temperature: f64,
    /// Supply pressure, MPa.
    pub reference_pressure: f64,
    /// Exponent applied to the pressure ratio.
    pub exponent: f64,
}

impl Default for Compression {
    fn default() -> Self {
        Self {
            molar_mass: 0.039_948,
            gas_constant: 8.314_462_618,
            temperature: 293.15,
            reference_pressure: 0.1,
            exponent: 0.4,
        }
    }
}

/// Specific electricity demand of each stage, kWh per kg of stage input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Energy {
    /// Smelting, as a function of the TiO2 fraction.
    pub smelting: Quadratic,
    /// Chlorination, as a function of the TiO2 fraction.
    pub chlorination: Quadratic,
    /// Remelting, as a function of the electrode diameter (m).
    pub remelting: Quadratic,
    /// Atomization melting, as a function of the electrode diameter (m).
    pub atomization_melt: Quadratic,
    /// Per kg TiCl4.
    pub reduction_distillation: f64,
    /// Per kg ingot.
    pub compaction_sintering: f64,
    /// Per kg atomized powder.
    pub sieving: f64,
}

impl Default for Energy {
    fn default() -> Self {
        Self {
            smelting: Quadratic::new(1.2, -2.0, 2.5),
            chlorination: Quadratic::new(0.9, -1.1, 0.5),
            remelting: Quadratic::new(1.5, 10.0, 60.0),
            atomization_melt: Quadratic::new(0.8, 25.0, 120.0),
            reduction_distillation: 4.4,
            compaction_sintering: 1.8,
            sieving: 0.05,
        }
    }
}

/// Consumables per kg ilmenite fed to smelting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SmeltingInputs {
    pub petroleum_pitch: f64,
    pub petroleum_coke: f64,
    pub raw_coal: f64,
    pub crude_oil: f64,
    pub graphite: f64,
    pub sodium_oleate: f64,
}

impl Default for SmeltingInputs {
    fn default() -> Self {
        Self {
            petroleum_pitch: 0.01,
            petroleum_coke: 0.05,
            raw_coal: 0.08,
            crude_oil: 0.005,
            graphite: 0.004,
            sodium_oleate: 0.002,
        }
    }
}

/// Consumables per kg Ti slag fed to chlorination.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChlorinationInputs {
    pub natural_gas: f64,
    pub fresh_water: f64,
    pub petroleum_coke: f64,
    pub sodium_hydroxide: f64,
    pub chlorine: f64,
    pub raw_coal: f64,
    pub crude_oil: f64,
}

impl Default for ChlorinationInputs {
    fn default() -> Self {
        Self {
            natural_gas: 0.12,
            fresh_water: 2.5,
            petroleum_coke: 0.3,
            sodium_hydroxide: 0.02,
            chlorine: 0.1,
            raw_coal: 0.04,
            crude_oil: 0.01,
        }
    }
}

/// Consumables per kg TiCl4 fed to reduction and distillation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReductionInputs {
    pub magnesium: f64,
}

impl Default for ReductionInputs {
    fn default() -> Self {
        Self { magnesium: 0.05 }
    }
}

/// All plant constants.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlantConstants {
    pub alloy: Alloy,
    pub stage_ratios: StageRatios,
    pub atomization: Atomization,
    pub compression: Compression,
    pub energy: Energy,
    pub smelting: SmeltingInputs,
    pub chlorination: ChlorinationInputs,
    pub reduction: ReductionInputs,
}

/// A plant constant that fails validation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParameterError {
    #[error("{name} must be finite")]
    NonFinite { name: &'static str },

    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: f64 },

    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f64 },

    #[error("{name} must lie in [0, 1], got {value}")]
    NotAFraction { name: &'static str, value: f64 },
}

impl PlantConstants {
    /// Checks that every constant is finite and physically meaningful.
    ///
    /// # Errors
    ///
    /// Returns the first constant that fails its check.
    pub fn validate(&self) -> Result<(), ParameterError> {
        let Self {
            alloy,
            stage_ratios,
            atomization,
            compression,
            energy,
            smelting,
            chlorination,
            reduction,
        } = self;

        non_negative("alloy.aluminum", alloy.aluminum)?;
        non_negative("alloy.vanadium", alloy.vanadium)?;

        positive("stage_ratios.smelting", stage_ratios.smelting)?;
        positive("stage_ratios.chlorination", stage_ratios.chlorination)?;
        positive("stage_ratios.reduction", stage_ratios.reduction)?;

        positive("atomization.melt_viscosity", atomization.melt_viscosity)?;
        positive("atomization.gas_viscosity", atomization.gas_viscosity)?;
        positive("atomization.weber_number", atomization.weber_number)?;
        positive("atomization.lubanska_constant", atomization.lubanska_constant)?;
        fraction("atomization.argon_recycling", atomization.argon_recycling)?;

        positive("compression.molar_mass", compression.molar_mass)?;
        positive("compression.gas_constant", compression.gas_constant)?;
        positive("compression.temperature", compression.temperature)?;
        positive("compression.reference_pressure", compression.reference_pressure)?;
        positive("compression.exponent", compression.exponent)?;

        for (name, quadratic) in [
            ("energy.smelting", energy.smelting),
            ("energy.chlorination", energy.chlorination),
            ("energy.remelting", energy.remelting),
            ("energy.atomization_melt", energy.atomization_melt),
        ] {
            if !quadratic.is_finite() {
                return Err(ParameterError::NonFinite { name });
            }
        }
        non_negative("energy.reduction_distillation", energy.reduction_distillation)?;
        non_negative("energy.compaction_sintering", energy.compaction_sintering)?;
        non_negative("energy.sieving", energy.sieving)?;

        non_negative("smelting.petroleum_pitch", smelting.petroleum_pitch)?;
        non_negative("smelting.petroleum_coke", smelting.petroleum_coke)?;
        non_negative("smelting.raw_coal", smelting.raw_coal)?;
        non_negative("smelting.crude_oil", smelting.crude_oil)?;
        non_negative("smelting.graphite", smelting.graphite)?;
        non_negative("smelting.sodium_oleate", smelting.sodium_oleate)?;

        non_negative("chlorination.natural_gas", chlorination.natural_gas)?;
        non_negative("chlorination.fresh_water", chlorination.fresh_water)?;
        non_negative("chlorination.petroleum_coke", chlorination.petroleum_coke)?;
        non_negative("chlorination.sodium_hydroxide", chlorination.sodium_hydroxide)?;
        non_negative("chlorination.chlorine", chlorination.chlorine)?;
        non_negative("chlorination.raw_coal", chlorination.raw_coal)?;
        non_negative("chlorination.crude_oil", chlorination.crude_oil)?;

        non_negative("reduction.magnesium", reduction.magnesium)
    }
}

fn finite(name: &'static str, value: f64) -> Result<(), ParameterError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ParameterError::NonFinite { name })
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ParameterError> {
    finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ParameterError::NotPositive { name, value })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), ParameterError> {
    finite(name, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ParameterError::Negative { name, value })
    }
}

fn fraction(name: &'static str, value: f64) -> Result<(), ParameterError> {
    finite(name, value)?;
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ParameterError::NotAFraction { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(PlantConstants::default().validate(), Ok(()));
    }

    #[test]
    fn quadratic_evaluates_in_horner_form() {
        let q = Quadratic::new(1.2, -2.0, 2.5);
        assert_relative_eq!(q.eval(0.86), 1.2 - 2.0 * 0.86 + 2.5 * 0.86 * 0.86, epsilon = 1e-15);
    }

    #[test]
    fn partial_overrides_keep_other_defaults() {
        let plant: PlantConstants = toml::from_str(
            r"
            [atomization]
            argon_recycling = 0.75

            [energy]
            remelting = [2.0, 0.0, 50.0]
            ",
        )
        .unwrap();

        assert_relative_eq!(plant.atomization.argon_recycling, 0.75);
        assert_relative_eq!(plant.atomization.weber_number, 4.1e7);
        assert_eq!(plant.energy.remelting, Quadratic::new(2.0, 0.0, 50.0));
        assert_eq!(plant.energy.smelting, Energy::default().smelting);
        assert_eq!(plant.alloy, Alloy::default());
    }

    #[test]
    fn rejects_unknown_fields() {
        let result: Result<PlantConstants, _> = toml::from_str("[alloy]\ntitanium = 0.9\n");
        assert!(result.is_err());
    }

    #[test]
    fn validation_names_the_offending_constant() {
        let mut plant = PlantConstants::default();
        plant.stage_ratios.reduction = 0.0;
        assert_eq!(
            plant.validate(),
            Err(ParameterError::NotPositive {
                name: "stage_ratios.reduction",
                value: 0.0
            })
        );

        let mut plant = PlantConstants::default();
        plant.atomization.argon_recycling = 1.5;
        assert!(matches!(
            plant.validate(),
            Err(ParameterError::NotAFraction { .. })
        ));

        let mut plant = PlantConstants::default();
        plant.energy.remelting.c2 = f64::NAN;
        assert_eq!(
            plant.validate(),
            Err(ParameterError::NonFinite {
                name: "energy.remelting"
            })
        );
    }
}
