use powderopt_core::ConstraintResiduals;
use uom::si::{length::meter, pressure::megapascal, ratio::ratio};

use crate::{DecisionVariables, DerivedState, SearchSpace, params::StageRatios};

/// Labels of the inequality residuals, in evaluation order.
pub const INEQUALITY_LABELS: [&str; 10] = [
    "electrode diameter above lower bound",
    "electrode diameter below upper bound",
    "atomization pressure above lower bound",
    "atomization pressure below upper bound",
    "waste powder non-negative",
    "Ti sponge non-negative",
    "TiCl4 non-negative",
    "Ti slag non-negative",
    "ilmenite non-negative",
    "TiO2 fraction above lower bound",
];

/// Labels of the equality residuals, in evaluation order.
pub const EQUALITY_LABELS: [&str; 3] = [
    "chlorination balance",
    "smelting balance",
    "reduction balance",
];

/// Engineering and mass-balance constraints on an operating point.
///
/// Inequalities are satisfied when `g ≤ 0`, equalities when `h = 0`. The
/// variable-bound inequalities repeat the search box and the equalities
/// restate the stage ratios already used by [`ProcessModel`]; both evaluate
/// as satisfied for every point the model produces.
///
/// [`ProcessModel`]: crate::ProcessModel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstraintSet {
    lower: [f64; 3],
    upper: [f64; 3],
    ratios: StageRatios,
}

impl ConstraintSet {
    #[must_use]
    pub fn new(space: &SearchSpace, ratios: StageRatios) -> Self {
        Self {
            lower: space.lower,
            upper: space.upper,
            ratios,
        }
    }

    #[must_use]
    pub fn evaluate(&self, vars: &DecisionVariables, state: &DerivedState) -> ConstraintResiduals {
        let phi = vars.electrode_diameter.get::<meter>();
        let p = vars.atomization_pressure.get::<megapascal>();
        let beta = vars.tio2_fraction.get::<ratio>();

        let inequalities = vec![
            self.lower[0] - phi,
            phi - self.upper[0],
            self.lower[1] - p,
            p - self.upper[1],
            -state.waste_powder,
            -state.sponge,
            -state.ticl4,
            -state.slag,
            -state.ilmenite,
            self.lower[2] - beta,
        ];

        let equalities = vec![
            state.tio2 - state.ticl4 / self.ratios.chlorination,
            state.ilmenite - state.slag / self.ratios.smelting,
            state.ticl4 - state.sponge / self.ratios.reduction,
        ];

        ConstraintResiduals::new(inequalities, equalities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{
        f64::{Length, Mass},
        length::micrometer,
        mass::kilogram,
    };

    use crate::{PlantConstants, ProcessModel};

    fn residuals_at(x: [f64; 3]) -> ConstraintResiduals {
        let plant = PlantConstants::default();
        let model = ProcessModel::new(
            plant,
            Mass::new::<kilogram>(1.0),
            Length::new::<micrometer>(45.0),
        );
        let vars = DecisionVariables::from_array(x);
        ConstraintSet::new(&SearchSpace::default(), plant.stage_ratios)
            .evaluate(&vars, &model.evaluate(&vars))
    }

    #[test]
    fn shape_matches_labels() {
        let residuals = residuals_at([0.06, 6.0, 0.86]);
        assert_eq!(
            residuals.shape(),
            (INEQUALITY_LABELS.len(), EQUALITY_LABELS.len())
        );
    }

    #[test]
    fn interior_point_is_feasible() {
        let residuals = residuals_at([0.06, 6.0, 0.86]);
        assert!(residuals.inequalities.iter().all(|&g| g < 0.0));
        assert!(residuals.is_feasible(0.0));
    }

    #[test]
    fn equalities_vanish_everywhere() {
        for x in [
            [0.05, 5.5, 0.75],
            [0.1, 7.0, 0.9],
            [0.0731, 6.42, 0.813],
            [0.2, 9.0, 0.5],
        ] {
            for h in residuals_at(x).equalities {
                assert_relative_eq!(h, 0.0, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn bound_rows_report_the_excess() {
        let residuals = residuals_at([0.11, 5.0, 0.7]);
        assert_relative_eq!(residuals.inequalities[1], 0.01, epsilon = 1e-12);
        assert_relative_eq!(residuals.inequalities[2], 0.5, epsilon = 1e-12);
        assert_relative_eq!(residuals.inequalities[9], 0.05, epsilon = 1e-12);
        assert!(residuals.inequalities[0] < 0.0);
        assert!(residuals.inequalities[3] < 0.0);
    }

    #[test]
    fn a_point_on_a_bound_is_feasible() {
        let residuals = residuals_at([0.05, 7.0, 0.75]);
        assert!(residuals.is_feasible(0.0));
        assert_relative_eq!(residuals.inequalities[0], 0.0);
        assert_relative_eq!(residuals.inequalities[3], 0.0);
        assert_relative_eq!(residuals.inequalities[9], 0.0);
    }
}
