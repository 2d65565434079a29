use std::convert::Infallible;

use powderopt_core::{ConstrainedMinimizationProblem, ConstraintResiduals, MinimizationProblem};

use crate::{
    ConstraintSet, DecisionVariables, DerivedState, ImpactBreakdown, ImpactCoefficientRow,
    ImpactEvaluator,
};

/// Minimize one impact indicator over the operating point, subject to the
/// process constraints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LcaProblem {
    constraints: ConstraintSet,
    evaluator: ImpactEvaluator,
    row: ImpactCoefficientRow,
}

impl LcaProblem {
    #[must_use]
    pub fn new(
        constraints: ConstraintSet,
        evaluator: ImpactEvaluator,
        row: ImpactCoefficientRow,
    ) -> Self {
        Self {
            constraints,
            evaluator,
            row,
        }
    }

    #[must_use]
    pub fn breakdown(&self, state: &DerivedState) -> ImpactBreakdown {
        self.evaluator.evaluate(state, &self.row)
    }
}

impl MinimizationProblem<3> for LcaProblem {
    type Input = DecisionVariables;
    type Output = DerivedState;
    type Error = Infallible;

    fn input(&self, x: &[f64; 3]) -> Result<Self::Input, Self::Error> {
        Ok(DecisionVariables::from_array(*x))
    }

    fn objective(&self, _input: &Self::Input, output: &Self::Output) -> Result<f64, Self::Error> {
        Ok(self.breakdown(output).total())
    }
}

impl ConstrainedMinimizationProblem<3> for LcaProblem {
    fn constraints(
        &self,
        input: &Self::Input,
        output: &Self::Output,
    ) -> Result<ConstraintResiduals, Self::Error> {
        Ok(self.constraints.evaluate(input, output))
    }
}
