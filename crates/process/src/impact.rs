use std::fmt;

use serde::Serialize;

use crate::{
    DerivedState, ImpactCoefficientRow, Material, PlantConstants,
    params::{ChlorinationInputs, SmeltingInputs},
};

/// A production stage that contributes to the total impact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    MineralExtraction,
    Smelting,
    Chlorination,
    ReductionDistillation,
    CompactionSintering,
    Remelting,
    Atomization,
    Sieving,
}

impl Stage {
    pub const ALL: [Self; 8] = [
        Self::MineralExtraction,
        Self::Smelting,
        Self::Chlorination,
        Self::ReductionDistillation,
        Self::CompactionSintering,
        Self::Remelting,
        Self::Atomization,
        Self::Sieving,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::MineralExtraction => "mineral extraction",
            Self::Smelting => "smelting",
            Self::Chlorination => "chlorination",
            Self::ReductionDistillation => "reduction and distillation",
            Self::CompactionSintering => "compaction and sintering",
            Self::Remelting => "remelting",
            Self::Atomization => "gas atomization",
            Self::Sieving => "powder sieving",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Impact contributed by each stage, in the category's unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ImpactBreakdown {
    pub mineral_extraction: f64,
    pub smelting: f64,
    pub chlorination: f64,
    pub reduction_distillation: f64,
    pub compaction_sintering: f64,
    pub remelting: f64,
    pub atomization: f64,
    pub sieving: f64,
}

impl ImpactBreakdown {
    #[must_use]
    pub fn get(&self, stage: Stage) -> f64 {
        match stage {
            Stage::MineralExtraction => self.mineral_extraction,
            Stage::Smelting => self.smelting,
            Stage::Chlorination => self.chlorination,
            Stage::ReductionDistillation => self.reduction_distillation,
            Stage::CompactionSintering => self.compaction_sintering,
            Stage::Remelting => self.remelting,
            Stage::Atomization => self.atomization,
            Stage::Sieving => self.sieving,
        }
    }

    /// Stage contributions in process order.
    #[must_use]
    pub fn stages(&self) -> [(Stage, f64); 8] {
        Stage::ALL.map(|stage| (stage, self.get(stage)))
    }

    /// Sum of all stage contributions.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.stages().iter().map(|(_, value)| value).sum()
    }
}

/// Prices a derived state against a resolved coefficient row.
///
/// The evaluator never sees the category or region; swapping the row is all
/// it takes to minimize a different indicator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactEvaluator {
    plant: PlantConstants,
}

impl ImpactEvaluator {
    #[must_use]
    pub fn new(plant: PlantConstants) -> Self {
        Self { plant }
    }

    #[must_use]
    pub fn evaluate(&self, state: &DerivedState, row: &ImpactCoefficientRow) -> ImpactBreakdown {
        let PlantConstants {
            atomization,
            energy,
            smelting,
            chlorination,
            reduction,
            ..
        } = &self.plant;
        let electricity = row[Material::Electricity];

        ImpactBreakdown {
            mineral_extraction: state.ilmenite * row[Material::Ilmenite],
            smelting: state.ilmenite
                * (state.smelting_energy * electricity + smelting_consumables(smelting, row)),
            chlorination: state.slag
                * (state.chlorination_energy * electricity
                    + chlorination.natural_gas * row[Material::NaturalGas]
                    + chlorination_consumables(chlorination, row)),
            reduction_distillation: state.ticl4
                * (energy.reduction_distillation * electricity
                    + reduction.magnesium * row[Material::Magnesium]),
            compaction_sintering: state.ingot * energy.compaction_sintering * electricity
                + state.aluminum * row[Material::Aluminum]
                + state.vanadium * row[Material::Vanadium],
            remelting: state.ingot * state.remelting_energy * electricity,
            atomization: state.ingot
                * ((state.atomization_melt_energy + state.compression_energy) * electricity
                    + (1.0 - atomization.argon_recycling)
                        * state.argon_consumption
                        * row[Material::Argon]),
            sieving: state.atomized_powder * energy.sieving * electricity,
        }
    }
}

fn smelting_consumables(inputs: &SmeltingInputs, row: &ImpactCoefficientRow) -> f64 {
    [
        (inputs.petroleum_pitch, Material::PetroleumPitch),
        (inputs.petroleum_coke, Material::PetroleumCoke),
        (inputs.raw_coal, Material::RawCoal),
        (inputs.crude_oil, Material::CrudeOil),
        (inputs.graphite, Material::Graphite),
        (inputs.sodium_oleate, Material::SodiumOleate),
    ]
    .into_iter()
    .map(|(amount, material)| amount * row[material])
    .sum()
}

fn chlorination_consumables(inputs: &ChlorinationInputs, row: &ImpactCoefficientRow) -> f64 {
    [
        (inputs.fresh_water, Material::FreshWater),
        (inputs.petroleum_coke, Material::PetroleumCoke),
        (inputs.sodium_hydroxide, Material::SodiumHydroxide),
        (inputs.chlorine, Material::Chlorine),
        (inputs.raw_coal, Material::RawCoal),
        (inputs.crude_oil, Material::CrudeOil),
    ]
    .into_iter()
    .map(|(amount, material)| amount * row[material])
    .sum()
}
