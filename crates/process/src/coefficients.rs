//! Characterization factors per impact category and region.
//!
//! A table is parsed from TOML shaped as
//! `category → scope → material → coefficient`, where the scope is either
//! `global` or a region code:
//!
//! ```toml
//! [GW.global]
//! ilmenite = 0.05
//!
//! [GW.EU]
//! electricity = 0.35
//! ```
//!
//! Resolving a row for a region looks a material up in that region's section
//! first and falls back to `global`, so globally traded materials are listed
//! once per category.

use std::{collections::BTreeMap, fmt, ops::Index, str::FromStr};

use thiserror::Error;

use crate::{ImpactCategory, Region};

const BUNDLED: &str = include_str!("../data/coefficients.toml");
const GLOBAL_SCOPE: &str = "global";

/// A material or energy flow that carries an impact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Material {
    Ilmenite,
    PetroleumPitch,
    PetroleumCoke,
    RawCoal,
    CrudeOil,
    Graphite,
    SodiumOleate,
    SodiumHydroxide,
    Chlorine,
    Magnesium,
    Aluminum,
    Vanadium,
    NaturalGas,
    FreshWater,
    Argon,
    Electricity,
}

impl Material {
    pub const ALL: [Self; 16] = [
        Self::Ilmenite,
        Self::PetroleumPitch,
        Self::PetroleumCoke,
        Self::RawCoal,
        Self::CrudeOil,
        Self::Graphite,
        Self::SodiumOleate,
        Self::SodiumHydroxide,
        Self::Chlorine,
        Self::Magnesium,
        Self::Aluminum,
        Self::Vanadium,
        Self::NaturalGas,
        Self::FreshWater,
        Self::Argon,
        Self::Electricity,
    ];

    /// Key used in coefficient tables.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Ilmenite => "ilmenite",
            Self::PetroleumPitch => "petroleum_pitch",
            Self::PetroleumCoke => "petroleum_coke",
            Self::RawCoal => "raw_coal",
            Self::CrudeOil => "crude_oil",
            Self::Graphite => "graphite",
            Self::SodiumOleate => "sodium_oleate",
            Self::SodiumHydroxide => "sodium_hydroxide",
            Self::Chlorine => "chlorine",
            Self::Magnesium => "magnesium",
            Self::Aluminum => "aluminum",
            Self::Vanadium => "vanadium",
            Self::NaturalGas => "natural_gas",
            Self::FreshWater => "fresh_water",
            Self::Argon => "argon",
            Self::Electricity => "electricity",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Material {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|material| material.key() == s)
            .ok_or(())
    }
}

/// Resolved coefficients for one category and region, indexed by [`Material`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactCoefficientRow([f64; 16]);

impl ImpactCoefficientRow {
    /// Builds a row by asking `f` for each material's coefficient.
    pub fn from_fn(f: impl FnMut(Material) -> f64) -> Self {
        Self(Material::ALL.map(f))
    }

    #[must_use]
    pub fn get(&self, material: Material) -> f64 {
        self.0[material.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Material, f64)> + '_ {
        Material::ALL.into_iter().zip(self.0.iter().copied())
    }
}

impl Index<Material> for ImpactCoefficientRow {
    type Output = f64;

    fn index(&self, material: Material) -> &Self::Output {
        &self.0[material.index()]
    }
}

/// A coefficient table that cannot be parsed or resolved.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("coefficient table is not valid TOML")]
    Parse(#[from] toml::de::Error),

    #[error("unknown impact category `{0}`")]
    UnknownCategory(String),

    #[error("{category}: unknown scope `{scope}` (expected `global` or a region code)")]
    UnknownScope {
        category: ImpactCategory,
        scope: String,
    },

    #[error("{category}.{scope}: unknown material `{material}`")]
    UnknownMaterial {
        category: ImpactCategory,
        scope: String,
        material: String,
    },

    #[error("{category}.{scope}.{material}: coefficient must be non-negative, got {value}")]
    InvalidCoefficient {
        category: ImpactCategory,
        scope: String,
        material: Material,
        value: f64,
    },

    #[error("no coefficients for impact category {0}")]
    MissingCategory(ImpactCategory),

    #[error("{category}/{region}: no coefficient for {material}")]
    MissingCoefficient {
        category: ImpactCategory,
        region: Region,
        material: Material,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
struct CategoryCoefficients {
    global: BTreeMap<Material, f64>,
    regional: BTreeMap<Region, BTreeMap<Material, f64>>,
}

impl CategoryCoefficients {
    fn lookup(&self, region: Region, material: Material) -> Option<f64> {
        self.regional
            .get(&region)
            .and_then(|section| section.get(&material))
            .or_else(|| self.global.get(&material))
            .copied()
    }
}

type RawTable = BTreeMap<String, BTreeMap<String, BTreeMap<String, f64>>>;

/// Characterization factors for every category the table defines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoefficientTable {
    categories: BTreeMap<ImpactCategory, CategoryCoefficients>,
}

impl CoefficientTable {
    /// Returns the table shipped with the crate.
    ///
    /// # Errors
    ///
    /// Returns a [`TableError`] if the bundled data is malformed.
    pub fn bundled() -> Result<Self, TableError> {
        Self::from_toml_str(BUNDLED)
    }

    /// Parses a table from TOML.
    ///
    /// Unknown categories, scopes or materials are rejected, as are negative
    /// or non-finite coefficients. Completeness is only checked when a row is
    /// resolved.
    ///
    /// # Errors
    ///
    /// Returns the first [`TableError`] encountered.
    pub fn from_toml_str(text: &str) -> Result<Self, TableError> {
        let raw: RawTable = toml::from_str(text)?;

        let mut categories = BTreeMap::new();
        for (code, scopes) in raw {
            let category: ImpactCategory = code
                .parse()
                .map_err(|_| TableError::UnknownCategory(code.clone()))?;

            let mut coefficients = CategoryCoefficients::default();
            for (scope, entries) in scopes {
                let section = parse_section(category, &scope, entries)?;
                if scope == GLOBAL_SCOPE {
                    coefficients.global = section;
                } else {
                    let region: Region = scope.parse().map_err(|_| TableError::UnknownScope {
                        category,
                        scope: scope.clone(),
                    })?;
                    coefficients.regional.insert(region, section);
                }
            }
            categories.insert(category, coefficients);
        }

        Ok(Self { categories })
    }

    /// Categories the table has coefficients for.
    pub fn categories(&self) -> impl Iterator<Item = ImpactCategory> + '_ {
        self.categories.keys().copied()
    }

    /// Resolves the complete coefficient row for `category` in `region`.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::MissingCategory`] or
    /// [`TableError::MissingCoefficient`] if the row is incomplete.
    pub fn row(
        &self,
        category: ImpactCategory,
        region: Region,
    ) -> Result<ImpactCoefficientRow, TableError> {
        let coefficients = self
            .categories
            .get(&category)
            .ok_or(TableError::MissingCategory(category))?;

        let mut values = [0.0; 16];
        for material in Material::ALL {
            values[material.index()] = coefficients.lookup(region, material).ok_or(
                TableError::MissingCoefficient {
                    category,
                    region,
                    material,
                },
            )?;
        }
        Ok(ImpactCoefficientRow(values))
    }
}

fn parse_section(
    category: ImpactCategory,
    scope: &str,
    entries: BTreeMap<String, f64>,
) -> Result<BTreeMap<Material, f64>, TableError> {
    entries
        .into_iter()
        .map(|(key, value)| {
            let material: Material = key.parse().map_err(|()| TableError::UnknownMaterial {
                category,
                scope: scope.to_owned(),
                material: key.clone(),
            })?;
            if !value.is_finite() || value < 0.0 {
                return Err(TableError::InvalidCoefficient {
                    category,
                    scope: scope.to_owned(),
                    material,
                    value,
                });
            }
            Ok((material, value))
        })
        .collect()
}
