//! Environmental optimization of Ti6Al4V powder production.
//!
//! Powder is made by the Kroll route (ilmenite smelting, chlorination,
//! magnesium reduction of TiCl4, alloying and remelting) followed by gas
//! atomization and sieving. Three operating variables drive the balance: the
//! electrode diameter fed to the atomizer, the atomization gas pressure, and
//! the TiO2 fraction of the smelted slag.
//!
//! The crate wires the process into a constrained minimization problem:
//!
//! - [`ProcessModel`] computes a [`DerivedState`] from [`DecisionVariables`]
//! - [`ConstraintSet`] turns that state into inequality and equality residuals
//! - [`ImpactEvaluator`] prices it with an [`ImpactCoefficientRow`] resolved
//!   from a [`CoefficientTable`]
//! - [`optimize`] runs the SQP solver over a [`SearchSpace`]
//!
//! ```no_run
//! use powderopt_process::{
//!     CoefficientTable, ImpactCategory, Region, Request, Settings, optimize,
//! };
//! use uom::si::{f64::{Length, Mass}, length::micrometer, mass::kilogram};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let request = Request::new(
//!     Mass::new::<kilogram>(1.0),
//!     Length::new::<micrometer>(45.0),
//!     ImpactCategory::GlobalWarming,
//!     Region::Europe,
//! )?;
//! let table = CoefficientTable::bundled()?;
//! let outcome = optimize(&request, &table, &Settings::default(), ())?;
//! println!("{:?}: {:.3}", outcome.status, outcome.total());
//! # Ok(())
//! # }
//! ```

mod category;
mod coefficients;
mod constraints;
mod impact;
mod model;
mod optimize;
pub mod params;
mod problem;
mod request;
mod variables;

pub use category::{ImpactCategory, Region};
pub use coefficients::{CoefficientTable, ImpactCoefficientRow, Material, TableError};
pub use constraints::{ConstraintSet, EQUALITY_LABELS, INEQUALITY_LABELS};
pub use impact::{ImpactBreakdown, ImpactEvaluator, Stage};
pub use model::{DerivedState, ProcessModel};
pub use optimize::{Event, OptimizeError, Outcome, Settings, optimize};
pub use params::{ParameterError, PlantConstants};
pub use problem::LcaProblem;
pub use request::{InputError, Request};
pub use variables::{
    DecisionVariables, SearchSpace, SearchSpaceError, VARIABLE_NAMES, VARIABLE_UNITS,
};
