/// Defines a minimization problem to be solved.
///
/// A minimization problem maps solver variables to a model input,
/// then computes an objective value from the model input and output.
/// Solvers search for the input that minimizes the objective.
///
/// The const generic `N` is the number of solver variables.
pub trait MinimizationProblem<const N: usize> {
    type Input;
    type Output;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Maps solver variables (`x`) into a model input.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the input cannot be constructed from `x`.
    fn input(&self, x: &[f64; N]) -> Result<Self::Input, Self::Error>;

    /// Computes an objective value from model input/output.
    ///
    /// Solvers search for the input that minimizes this objective.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the objective cannot be computed.
    fn objective(&self, input: &Self::Input, output: &Self::Output) -> Result<f64, Self::Error>;
}

/// A minimization problem subject to inequality and equality constraints.
///
/// Constraint residuals follow the usual sign convention: an inequality
/// `g(x) ≤ 0` and an equality `h(x) = 0` are satisfied.
///
/// The number of residuals of each kind must not change between calls.
pub trait ConstrainedMinimizationProblem<const N: usize>: MinimizationProblem<N> {
    /// Computes constraint residuals from model input/output.
    ///
    /// # Errors
    ///
    /// Returns [`MinimizationProblem::Error`] if the residuals cannot be computed.
    fn constraints(
        &self,
        input: &Self::Input,
        output: &Self::Output,
    ) -> Result<ConstraintResiduals, Self::Error>;
}

/// Inequality (`g ≤ 0`) and equality (`h = 0`) constraint residuals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstraintResiduals {
    pub inequalities: Vec<f64>,
    pub equalities: Vec<f64>,
}

impl ConstraintResiduals {
    /// Creates residuals from inequality and equality values.
    #[must_use]
    pub fn new(inequalities: Vec<f64>, equalities: Vec<f64>) -> Self {
        Self {
            inequalities,
            equalities,
        }
    }

    /// Returns the violation of each constraint, inequalities first.
    ///
    /// Satisfied inequalities contribute zero; equalities contribute `|h|`.
    pub fn violations(&self) -> impl Iterator<Item = f64> + '_ {
        self.inequalities
            .iter()
            .map(|g| g.max(0.0))
            .chain(self.equalities.iter().map(|h| h.abs()))
    }

    /// Returns the largest single constraint violation (zero if none).
    #[must_use]
    pub fn max_violation(&self) -> f64 {
        self.violations().fold(0.0, f64::max)
    }

    /// Returns `true` if every constraint is satisfied within `tol`.
    #[must_use]
    pub fn is_feasible(&self, tol: f64) -> bool {
        self.max_violation() <= tol
    }

    /// Returns `true` if every residual is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.inequalities
            .iter()
            .chain(&self.equalities)
            .all(|v| v.is_finite())
    }

    /// Returns the number of inequality and equality residuals.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.inequalities.len(), self.equalities.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn satisfied_constraints_have_no_violation() {
        let residuals = ConstraintResiduals::new(vec![-1.0, 0.0], vec![0.0]);

        assert_relative_eq!(residuals.max_violation(), 0.0);
        assert!(residuals.is_feasible(0.0));
    }

    #[test]
    fn violation_counts_positive_inequalities_and_abs_equalities() {
        let residuals = ConstraintResiduals::new(vec![-3.0, 0.25], vec![-0.5, 0.1]);

        let violations: Vec<f64> = residuals.violations().collect();
        assert_eq!(violations, vec![0.0, 0.25, 0.5, 0.1]);
        assert_relative_eq!(residuals.max_violation(), 0.5);
        assert!(!residuals.is_feasible(0.4));
        assert!(residuals.is_feasible(0.5));
    }

    #[test]
    fn detects_non_finite_residuals() {
        let residuals = ConstraintResiduals::new(vec![0.0], vec![f64::NAN]);
        assert!(!residuals.is_finite());
        assert_eq!(residuals.shape(), (1, 1));
    }
}
