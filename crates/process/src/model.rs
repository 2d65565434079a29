//! Mass and energy balance of the Kroll route plus gas atomization.
//!
//! The balance runs backwards from the requested powder: atomization yield
//! sets how much ingot must be melted, the ingot fixes the titanium sponge
//! and alloying additions, and the fixed stage ratios carry the sponge mass
//! back through reduction, chlorination and smelting to the ilmenite fed in.

use std::convert::Infallible;

use powderopt_core::Model;
use serde::Serialize;
use uom::si::{
    f64::{Length, Mass},
    length::{meter, micrometer},
    mass::kilogram,
    pressure::megapascal,
    ratio::ratio,
};

use crate::{DecisionVariables, PlantConstants};

/// Argon consumption fit `A·exp(B·φ)`, kg argon per kg melt.
const ARGON_FIT_SCALE: f64 = 448.82;
const ARGON_FIT_RATE: f64 = -30.61;

/// Atomization yield `η_max·exp(-k·|d50 - d_target|)`.
const PEAK_EFFICIENCY: f64 = 0.8;
const EFFICIENCY_DECAY_PER_UM: f64 = 0.02;

/// Median diameter shift with gas pressure, relative to a datum pressure.
const D50_SHIFT_UM_PER_MPA: f64 = 40.0;
const D50_DATUM_PRESSURE_MPA: f64 = 5.5;

const JOULES_PER_KWH: f64 = 3.6e6;

/// Every quantity derived from one operating point.
///
/// Masses are in kg for the requested batch. Energies are in kWh per kg of
/// the stage's input (smelting per kg ilmenite, chlorination per kg slag,
/// the rest per kg ingot).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedState {
    /// Argon consumed per kg of melt.
    pub argon_consumption: f64,
    /// Median particle diameter, µm.
    pub d50: f64,
    /// Fraction of atomized powder within the target size.
    pub efficiency: f64,
    pub atomized_powder: f64,
    pub waste_powder: f64,
    pub ingot: f64,
    pub sponge: f64,
    pub aluminum: f64,
    pub vanadium: f64,
    pub ticl4: f64,
    pub tio2: f64,
    pub slag: f64,
    pub ilmenite: f64,
    pub smelting_energy: f64,
    pub chlorination_energy: f64,
    pub remelting_energy: f64,
    pub atomization_melt_energy: f64,
    pub compression_energy: f64,
}

/// The process balance for one powder request.
///
/// Evaluation is pure and total; bounds on the decision variables keep it
/// away from the diameter singularity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessModel {
    plant: PlantConstants,
    final_mass: f64,
    target_diameter: f64,
}

impl ProcessModel {
    #[must_use]
    pub fn new(plant: PlantConstants, final_mass: Mass, target_diameter: Length) -> Self {
        Self {
            plant,
            final_mass: final_mass.get::<kilogram>(),
            target_diameter: target_diameter.get::<micrometer>(),
        }
    }

    #[must_use]
    pub fn plant(&self) -> &PlantConstants {
        &self.plant
    }

    /// Computes the derived state at `vars`.
    #[must_use]
    pub fn evaluate(&self, vars: &DecisionVariables) -> DerivedState {
        let PlantConstants {
            alloy,
            stage_ratios,
            atomization,
            compression,
            energy,
            ..
        } = &self.plant;

        let phi = vars.electrode_diameter.get::<meter>();
        let p = vars.atomization_pressure.get::<megapascal>();
        let beta = vars.tio2_fraction.get::<ratio>();

        let argon_consumption = ARGON_FIT_SCALE * (ARGON_FIT_RATE * phi).exp();

        // Lubanska correlation, then the pressure shift.
        let factor = (atomization.melt_viscosity
            / (atomization.gas_viscosity * atomization.weber_number))
            * (1.0 + 1.0 / argon_consumption);
        let d50 = atomization.lubanska_constant * phi * factor.sqrt() * 1e6
            - D50_SHIFT_UM_PER_MPA * (p - D50_DATUM_PRESSURE_MPA);

        let efficiency =
            PEAK_EFFICIENCY * (-EFFICIENCY_DECAY_PER_UM * (d50 - self.target_diameter).abs()).exp();

        let atomized_powder = self.final_mass / efficiency;
        let waste_powder = atomized_powder - self.final_mass;
        let ingot = atomized_powder;

        let sponge = (ingot - waste_powder) / (1.0 + alloy.aluminum + alloy.vanadium);
        let aluminum = sponge * alloy.aluminum;
        let vanadium = sponge * alloy.vanadium;

        let ticl4 = sponge / stage_ratios.reduction;
        let tio2 = ticl4 / stage_ratios.chlorination;
        let slag = tio2 / beta;
        let ilmenite = slag / stage_ratios.smelting;

        let compression_energy = argon_consumption / compression.molar_mass
            * compression.gas_constant
            * compression.temperature
            / compression.exponent
            * ((p / compression.reference_pressure).powf(compression.exponent) - 1.0)
            / JOULES_PER_KWH;

        DerivedState {
            argon_consumption,
            d50,
            efficiency,
            atomized_powder,
            waste_powder,
            ingot,
            sponge,
            aluminum,
            vanadium,
            ticl4,
            tio2,
            slag,
            ilmenite,
            smelting_energy: energy.smelting.eval(beta),
            chlorination_energy: energy.chlorination.eval(beta),
            remelting_energy: energy.remelting.eval(phi),
            atomization_melt_energy: energy.atomization_melt.eval(phi),
            compression_energy,
        }
    }
}

impl Model for ProcessModel {
    type Input = DecisionVariables;
    type Output = DerivedState;
    type Error = Infallible;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        Ok(self.evaluate(input))
    }
}
