//! Run configuration loaded from a TOML file.
//!
//! ```toml
//! coefficients = "my-coefficients.toml"
//!
//! [solver]
//! max_iters = 200
//!
//! [search]
//! initial = [0.08, 6.5, 0.85]
//!
//! [plant.atomization]
//! argon_recycling = 0.8
//! ```
//!
//! Every section is optional. A relative `coefficients` path is resolved
//! against the directory of the configuration file.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use powderopt_process::{CoefficientTable, PlantConstants, SearchSpace, Settings};
use powderopt_solvers::optimization::sqp;
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub solver: SolverOptions,
    pub search: SearchSpace,
    pub plant: PlantConstants,
    pub coefficients: Option<PathBuf>,
}

/// Solver options as written in a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverOptions {
    pub max_iters: usize,
    pub max_evals: usize,
    pub constraint_tol: f64,
    pub step_tol: f64,
    pub function_tol: f64,
}

impl Default for SolverOptions {
    fn default() -> Self {
        let sqp::Config {
            max_iters,
            max_evals,
            constraint_tol,
            step_tol,
            function_tol,
        } = sqp::Config::default();
        Self {
            max_iters,
            max_evals,
            constraint_tol,
            step_tol,
            function_tol,
        }
    }
}

impl From<SolverOptions> for sqp::Config {
    fn from(options: SolverOptions) -> Self {
        Self {
            max_iters: options.max_iters,
            max_evals: options.max_evals,
            constraint_tol: options.constraint_tol,
            step_tol: options.step_tol,
            function_tol: options.function_tol,
        }
    }
}

impl RunConfig {
    /// Reads a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let mut config: Self = toml::from_str(&text)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;

        if let (Some(coefficients), Some(dir)) = (&config.coefficients, path.parent()) {
            if coefficients.is_relative() {
                config.coefficients = Some(dir.join(coefficients));
            }
        }
        Ok(config)
    }

    /// Loads the coefficient table this run should use.
    pub fn table(&self) -> Result<CoefficientTable> {
        match &self.coefficients {
            Some(path) => {
                let text = fs::read_to_string(path).with_context(|| {
                    format!("failed to read coefficient table {}", path.display())
                })?;
                CoefficientTable::from_toml_str(&text)
                    .with_context(|| format!("invalid coefficient table {}", path.display()))
            }
            None => CoefficientTable::bundled().context("bundled coefficient table is invalid"),
        }
    }

    #[must_use]
    pub fn settings(&self) -> Settings {
        Settings {
            plant: self.plant,
            space: self.search,
            solver: self.solver.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn empty_config_uses_defaults() {
        let config: RunConfig = toml::from_str("").unwrap();
        assert_eq!(config, RunConfig::default());
        assert_eq!(config.settings(), Settings::default());
    }

    #[test]
    fn sections_override_defaults() {
        let config: RunConfig = toml::from_str(
            r#"
            coefficients = "table.toml"

            [solver]
            max_iters = 50
            constraint_tol = 1e-8

            [search]
            initial = [0.08, 6.5, 0.85]

            [plant.compression]
            exponent = 0.3
            "#,
        )
        .unwrap();

        let settings = config.settings();
        assert_eq!(settings.solver.max_iters, 50);
        assert_relative_eq!(settings.solver.constraint_tol, 1e-8);
        assert_eq!(settings.solver.max_evals, sqp::Config::default().max_evals);
        assert_eq!(settings.space.initial, [0.08, 6.5, 0.85]);
        assert_eq!(settings.space.lower, SearchSpace::default().lower);
        assert_relative_eq!(settings.plant.compression.exponent, 0.3);
        assert_eq!(config.coefficients, Some(PathBuf::from("table.toml")));
    }

    #[test]
    fn rejects_unknown_sections() {
        assert!(toml::from_str::<RunConfig>("[optimizer]\nmax_iters = 5\n").is_err());
    }

    #[test]
    fn missing_files_are_reported_with_their_path() {
        let error = RunConfig::load(Path::new("/nonexistent/powderopt.toml")).unwrap_err();
        assert!(error.to_string().contains("/nonexistent/powderopt.toml"));
    }

    #[test]
    fn default_table_is_bundled() {
        let table = RunConfig::default().table().unwrap();
        assert_eq!(table.categories().count(), 17);
    }
}
