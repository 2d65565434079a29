use nalgebra::{DMatrix, DVector};

/// Curvature condition threshold for Powell's damping.
const DAMPING: f64 = 0.2;

/// Damped-BFGS approximation of the Lagrangian Hessian.
///
/// Starts at the identity and stays symmetric positive definite.
#[derive(Debug, Clone)]
pub(super) struct Hessian(DMatrix<f64>);

impl Hessian {
    pub(super) fn identity(n: usize) -> Self {
        Self(DMatrix::identity(n, n))
    }

    pub(super) fn matrix(&self) -> &DMatrix<f64> {
        &self.0
    }

    /// Applies a BFGS update for step `s` and gradient change `y`.
    ///
    /// When `sᵀy` is small relative to `sᵀBs`, `y` is blended with `Bs` so
    /// the update preserves positive definiteness.
    pub(super) fn update(&mut self, s: &DVector<f64>, y: &DVector<f64>) {
        let bs = &self.0 * s;
        let sbs = s.dot(&bs);
        if !sbs.is_finite() || sbs <= f64::EPSILON * s.norm_squared() {
            return;
        }

        let sy = s.dot(y);
        let y = if sy < DAMPING * sbs {
            let theta = (1.0 - DAMPING) * sbs / (sbs - sy);
            y * theta + &bs * (1.0 - theta)
        } else {
            y.clone()
        };

        let sy = s.dot(&y);
        if !sy.is_finite() || sy <= 0.0 {
            return;
        }

        let updated = &self.0 + &y * y.transpose() / sy - &bs * bs.transpose() / sbs;
        if updated.iter().all(|v| v.is_finite()) {
            self.0 = (&updated + updated.transpose()) * 0.5;
        }
    }
}
