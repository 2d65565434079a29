//! Impact categories and production regions.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::InputError;

/// An LCA midpoint impact category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ImpactCategory {
    TerrestrialAcidification,
    GlobalWarming,
    FreshwaterEcotoxicity,
    MarineEcotoxicity,
    TerrestrialEcotoxicity,
    FossilResourceScarcity,
    MarineEutrophication,
    HumanCarcinogenicToxicity,
    HumanNonCarcinogenicToxicity,
    IonizingRadiation,
    LandUse,
    MineralResourceScarcity,
    OzoneDepletion,
    FineParticulateMatter,
    OzoneFormationHumanHealth,
    OzoneFormationEcosystems,
    WaterConsumption,
}

impl ImpactCategory {
    pub const ALL: [Self; 17] = [
        Self::TerrestrialAcidification,
        Self::GlobalWarming,
        Self::FreshwaterEcotoxicity,
        Self::MarineEcotoxicity,
        Self::TerrestrialEcotoxicity,
        Self::FossilResourceScarcity,
        Self::MarineEutrophication,
        Self::HumanCarcinogenicToxicity,
        Self::HumanNonCarcinogenicToxicity,
        Self::IonizingRadiation,
        Self::LandUse,
        Self::MineralResourceScarcity,
        Self::OzoneDepletion,
        Self::FineParticulateMatter,
        Self::OzoneFormationHumanHealth,
        Self::OzoneFormationEcosystems,
        Self::WaterConsumption,
    ];

    /// Short code used on the command line and in coefficient tables.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::TerrestrialAcidification => "TA",
            Self::GlobalWarming => "GW",
            Self::FreshwaterEcotoxicity => "FET",
            Self::MarineEcotoxicity => "MET",
            Self::TerrestrialEcotoxicity => "TET",
            Self::FossilResourceScarcity => "FF",
            Self::MarineEutrophication => "ME",
            Self::HumanCarcinogenicToxicity => "HTPc",
            Self::HumanNonCarcinogenicToxicity => "HTPnc",
            Self::IonizingRadiation => "IR",
            Self::LandUse => "LO",
            Self::MineralResourceScarcity => "SO",
            Self::OzoneDepletion => "OD",
            Self::FineParticulateMatter => "PMF",
            Self::OzoneFormationHumanHealth => "HOF",
            Self::OzoneFormationEcosystems => "EOF",
            Self::WaterConsumption => "WC",
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::TerrestrialAcidification => "terrestrial acidification",
            Self::GlobalWarming => "global warming",
            Self::FreshwaterEcotoxicity => "freshwater ecotoxicity",
            Self::MarineEcotoxicity => "marine ecotoxicity",
            Self::TerrestrialEcotoxicity => "terrestrial ecotoxicity",
            Self::FossilResourceScarcity => "fossil resource scarcity",
            Self::MarineEutrophication => "marine eutrophication",
            Self::HumanCarcinogenicToxicity => "human carcinogenic toxicity",
            Self::HumanNonCarcinogenicToxicity => "human non-carcinogenic toxicity",
            Self::IonizingRadiation => "ionizing radiation",
            Self::LandUse => "land use",
            Self::MineralResourceScarcity => "mineral resource scarcity",
            Self::OzoneDepletion => "stratospheric ozone depletion",
            Self::FineParticulateMatter => "fine particulate matter formation",
            Self::OzoneFormationHumanHealth => "ozone formation, human health",
            Self::OzoneFormationEcosystems => "ozone formation, terrestrial ecosystems",
            Self::WaterConsumption => "water consumption",
        }
    }
}

impl fmt::Display for ImpactCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Parses a category code, ignoring ASCII case.
impl FromStr for ImpactCategory {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| InputError::UnknownCategory(code.to_owned()))
    }
}

impl TryFrom<String> for ImpactCategory {
    type Error = InputError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ImpactCategory> for String {
    fn from(category: ImpactCategory) -> Self {
        category.code().to_owned()
    }
}

/// Region whose energy mix and reagent supply the plant draws on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Region {
    Europe,
    China,
}

impl Region {
    pub const ALL: [Self; 2] = [Self::Europe, Self::China];

    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Europe => "EU",
            Self::China => "CN",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Region {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        Self::ALL
            .into_iter()
            .find(|region| region.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| InputError::UnknownRegion(code.to_owned()))
    }
}

impl TryFrom<String> for Region {
    type Error = InputError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Region> for String {
    fn from(region: Region) -> Self {
        region.code().to_owned()
    }
}
