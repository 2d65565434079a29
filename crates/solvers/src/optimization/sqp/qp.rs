use itertools::Itertools;
use nalgebra::{DMatrix, DVector};

use powderopt_core::ConstraintResiduals;

use super::gradient::Linearization;

/// Factors applied in turn to the offsets of violated constraints until the
/// subproblem is consistent. The last factor always admits `d = 0`.
const RELAXATION: [f64; 6] = [1.0, 0.5, 0.25, 0.125, 0.0625, 0.0];

/// Rows whose normal is smaller than this (infinity norm) carry no
/// first-order information and are left out.
const DEGENERATE_NORMAL: f64 = 1e-10;

/// Relative slack when checking a candidate against the inequality rows.
const FEASIBILITY_TOL: f64 = 1e-9;

/// Active sets whose normalized Gram determinant falls below this are
/// treated as linearly dependent.
const DEPENDENCE_TOL: f64 = 1e-10;

/// A search direction and the multipliers of the subproblem that produced it.
#[derive(Debug, Clone)]
pub(super) struct Step<const N: usize> {
    pub(super) direction: [f64; N],

    /// Fraction of the linearized violation the step is expected to remove.
    pub(super) relaxation: f64,

    pub(super) inequality_multipliers: Vec<f64>,
    pub(super) equality_multipliers: Vec<f64>,
}

impl<const N: usize> Step<N> {
    fn zero((n_ineq, n_eq): (usize, usize)) -> Self {
        Self {
            direction: [0.0; N],
            relaxation: 0.0,
            inequality_multipliers: vec![0.0; n_ineq],
            equality_multipliers: vec![0.0; n_eq],
        }
    }

    /// Infinity norm of the direction.
    pub(super) fn length(&self) -> f64 {
        self.direction.iter().fold(0.0, |acc, d| acc.max(d.abs()))
    }
}

#[derive(Debug, Clone, Copy)]
enum Origin {
    Inequality(usize),
    Equality(usize),
    Bound,
}

/// A linearized constraint `normal · d + offset` (`≤ 0` or `= 0`).
#[derive(Debug, Clone)]
struct Row {
    normal: Vec<f64>,
    offset: f64,
    origin: Origin,
}

impl Row {
    fn residual(&self, d: &[f64]) -> f64 {
        self.normal.iter().zip(d).map(|(a, d)| a * d).sum::<f64>() + self.offset
    }
}

struct Candidate {
    direction: Vec<f64>,
    value: f64,
    active: Vec<usize>,
    multipliers: Vec<f64>,
}

/// Computes a search direction from the quadratic subproblem
///
/// ```text
/// minimize    ½ dᵀBd + gᵀd
/// subject to  ∇gᵢ·d + gᵢ ≤ 0,  ∇hⱼ·d + hⱼ = 0,  0 ≤ z + d ≤ 1
/// ```
///
/// relaxing the offsets of violated constraints when the linearization is
/// inconsistent. Falls back to a zero step if no relaxation succeeds.
pub(super) fn solve<const N: usize>(
    hessian: &DMatrix<f64>,
    lin: &Linearization<N>,
    residuals: &ConstraintResiduals,
    z: &[f64; N],
) -> Step<N> {
    for relaxation in RELAXATION {
        let (inequalities, equalities) = rows(lin, residuals, z, relaxation);
        if let Some(candidate) = solve_qp(hessian, &lin.objective, &inequalities, &equalities) {
            return into_step(candidate, relaxation, &inequalities, &equalities, residuals.shape());
        }
    }
    Step::zero(residuals.shape())
}

fn rows<const N: usize>(
    lin: &Linearization<N>,
    residuals: &ConstraintResiduals,
    z: &[f64; N],
    relaxation: f64,
) -> (Vec<Row>, Vec<Row>) {
    let mut inequalities = Vec::new();
    for (i, (normal, &g)) in lin
        .inequalities
        .iter()
        .zip(&residuals.inequalities)
        .enumerate()
    {
        let offset = if g > 0.0 { relaxation * g } else { g };
        push_row(&mut inequalities, normal, offset, Origin::Inequality(i));
    }

    for (k, &zk) in z.iter().enumerate() {
        let mut lower = vec![0.0; N];
        lower[k] = -1.0;
        inequalities.push(Row {
            normal: lower,
            offset: -zk,
            origin: Origin::Bound,
        });

        let mut upper = vec![0.0; N];
        upper[k] = 1.0;
        inequalities.push(Row {
            normal: upper,
            offset: zk - 1.0,
            origin: Origin::Bound,
        });
    }

    let mut equalities = Vec::new();
    for (j, (normal, &h)) in lin.equalities.iter().zip(&residuals.equalities).enumerate() {
        push_row(&mut equalities, normal, relaxation * h, Origin::Equality(j));
    }

    (inequalities, equalities)
}

fn push_row<const N: usize>(rows: &mut Vec<Row>, normal: &[f64; N], offset: f64, origin: Origin) {
    if normal.iter().any(|a| a.abs() > DEGENERATE_NORMAL) {
        rows.push(Row {
            normal: normal.to_vec(),
            offset,
            origin,
        });
    }
}

/// Solves the subproblem exactly by enumerating active inequality sets.
///
/// Returns the feasible candidate with the lowest model value, or `None` if
/// no active set yields a feasible direction.
fn solve_qp(
    hessian: &DMatrix<f64>,
    gradient: &[f64],
    inequalities: &[Row],
    equalities: &[Row],
) -> Option<Candidate> {
    let free = gradient.len().checked_sub(equalities.len())?;

    let mut best: Option<Candidate> = None;
    for size in 0..=free.min(inequalities.len()) {
        for active in (0..inequalities.len()).combinations(size) {
            let Some(candidate) = solve_kkt(hessian, gradient, inequalities, equalities, active)
            else {
                continue;
            };

            let feasible = inequalities.iter().all(|row| {
                row.residual(&candidate.direction) <= FEASIBILITY_TOL * (1.0 + row.offset.abs())
            });
            if feasible && best.as_ref().is_none_or(|b| candidate.value < b.value) {
                best = Some(candidate);
            }
        }
    }
    best
}

/// Solves the equality-constrained subproblem for one active set.
fn solve_kkt(
    hessian: &DMatrix<f64>,
    gradient: &[f64],
    inequalities: &[Row],
    equalities: &[Row],
    active: Vec<usize>,
) -> Option<Candidate> {
    let rows: Vec<&Row> = active
        .iter()
        .map(|&i| &inequalities[i])
        .chain(equalities)
        .collect();
    if !independent(&rows) {
        return None;
    }

    let n = gradient.len();
    let m = rows.len();

    let mut kkt = DMatrix::<f64>::zeros(n + m, n + m);
    let mut rhs = DVector::<f64>::zeros(n + m);
    kkt.view_mut((0, 0), (n, n)).copy_from(hessian);
    for (j, g) in gradient.iter().enumerate() {
        rhs[j] = -g;
    }
    for (r, row) in rows.iter().enumerate() {
        for (j, &a) in row.normal.iter().enumerate() {
            kkt[(n + r, j)] = a;
            kkt[(j, n + r)] = a;
        }
        rhs[n + r] = -row.offset;
    }

    let solution = kkt.lu().solve(&rhs)?;
    if solution.iter().any(|v| !v.is_finite()) {
        return None;
    }

    let d = solution.rows(0, n).into_owned();
    let value = 0.5 * d.dot(&(hessian * &d)) + d.dot(&DVector::from_column_slice(gradient));

    Some(Candidate {
        direction: d.iter().copied().collect(),
        value,
        active,
        multipliers: solution.rows(n, m).iter().copied().collect(),
    })
}

/// Returns `true` if the row normals are linearly independent.
fn independent(rows: &[&Row]) -> bool {
    if rows.len() < 2 {
        return true;
    }

    let n = rows[0].normal.len();
    let norms: Vec<f64> = rows
        .iter()
        .map(|row| row.normal.iter().map(|a| a * a).sum::<f64>().sqrt())
        .collect();
    let unit = DMatrix::from_fn(rows.len(), n, |r, j| rows[r].normal[j] / norms[r]);
    let gram = &unit * unit.transpose();

    gram.determinant() > DEPENDENCE_TOL
}

fn into_step<const N: usize>(
    candidate: Candidate,
    relaxation: f64,
    inequalities: &[Row],
    equalities: &[Row],
    shape: (usize, usize),
) -> Step<N> {
    let mut step = Step::zero(shape);
    step.direction = std::array::from_fn(|k| candidate.direction[k]);
    step.relaxation = relaxation;

    let (active, trailing) = candidate.multipliers.split_at(candidate.active.len());
    for (&i, &lambda) in candidate.active.iter().zip(active) {
        if let Origin::Inequality(c) = inequalities[i].origin {
            step.inequality_multipliers[c] = lambda;
        }
    }
    for (row, &nu) in equalities.iter().zip(trailing) {
        if let Origin::Equality(c) = row.origin {
            step.equality_multipliers[c] = nu;
        }
    }

    step
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn linearization<const N: usize>(
        objective: [f64; N],
        inequalities: Vec<[f64; N]>,
        equalities: Vec<[f64; N]>,
    ) -> Linearization<N> {
        Linearization {
            objective,
            inequalities,
            equalities,
        }
    }

    #[test]
    fn interior_step_is_newton_step() {
        let lin = linearization([0.1, -0.2], vec![], vec![]);
        let step = solve(
            &DMatrix::identity(2, 2),
            &lin,
            &ConstraintResiduals::default(),
            &[0.5, 0.5],
        );

        assert_relative_eq!(step.direction[0], -0.1, epsilon = 1e-12);
        assert_relative_eq!(step.direction[1], 0.2, epsilon = 1e-12);
        assert_relative_eq!(step.relaxation, 1.0);
    }

    #[test]
    fn step_stops_at_the_box() {
        let lin = linearization([-1.0], vec![], vec![]);
        let step = solve(
            &DMatrix::identity(1, 1),
            &lin,
            &ConstraintResiduals::default(),
            &[0.9],
        );

        assert_relative_eq!(step.direction[0], 0.1, epsilon = 1e-12);
    }

    #[test]
    fn active_inequality_reports_its_multiplier() {
        // minimize ½|d|² - d₀ subject to d₀ + d₁ - 0.5 ≤ 0
        let lin = linearization([-1.0, 0.0], vec![[1.0, 1.0]], vec![]);
        let residuals = ConstraintResiduals::new(vec![-0.5], vec![]);
        let step = solve(&DMatrix::identity(2, 2), &lin, &residuals, &[0.2, 0.5]);

        assert_relative_eq!(step.direction[0], 0.75, epsilon = 1e-12);
        assert_relative_eq!(step.direction[1], -0.25, epsilon = 1e-12);
        assert_relative_eq!(step.inequality_multipliers[0], 0.25, epsilon = 1e-12);
    }

    #[test]
    fn equality_rows_are_enforced() {
        let lin = linearization([0.0, 0.0], vec![], vec![[1.0, -1.0]]);
        let residuals = ConstraintResiduals::new(vec![], vec![0.2]);
        let step = solve(&DMatrix::identity(2, 2), &lin, &residuals, &[0.5, 0.5]);

        assert_relative_eq!(step.direction[0] - step.direction[1], -0.2, epsilon = 1e-12);
        assert_relative_eq!(step.direction[0], -0.1, epsilon = 1e-12);
        assert!(step.equality_multipliers[0] > 0.0);
    }

    #[test]
    fn relaxes_inconsistent_linearization() {
        // d ≤ -5 cannot hold with z + d ≥ 0 at z = 0.5 until the offset is
        // relaxed to 5/16.
        let lin = linearization([0.0], vec![[1.0]], vec![]);
        let residuals = ConstraintResiduals::new(vec![5.0], vec![]);
        let step = solve(&DMatrix::identity(1, 1), &lin, &residuals, &[0.5]);

        assert_relative_eq!(step.relaxation, 0.0625);
        assert_relative_eq!(step.direction[0], -0.3125, epsilon = 1e-12);
    }

    #[test]
    fn degenerate_rows_are_ignored() {
        let lin = linearization([1.0], vec![], vec![[0.0]]);
        let residuals = ConstraintResiduals::new(vec![], vec![0.0]);
        let step = solve(&DMatrix::identity(1, 1), &lin, &residuals, &[0.5]);

        assert_relative_eq!(step.direction[0], -0.5, epsilon = 1e-12);
    }
}
