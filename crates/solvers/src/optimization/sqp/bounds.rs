use super::Error;

/// Lower and upper bounds on each solver variable.
///
/// Bounds are inclusive and every lower bound is strictly below its upper
/// bound, so each variable maps onto `[0, 1]` without loss.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds<const N: usize> {
    lower: [f64; N],
    upper: [f64; N],
}

impl<const N: usize> Bounds<N> {
    /// Creates validated bounds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBounds`] if any bound is not finite or a lower
    /// bound is not strictly below its upper bound.
    pub fn new(lower: [f64; N], upper: [f64; N]) -> Result<Self, Error> {
        for (index, (&lo, &hi)) in lower.iter().zip(&upper).enumerate() {
            if !lo.is_finite() || !hi.is_finite() || lo >= hi {
                return Err(Error::InvalidBounds {
                    index,
                    lower: lo,
                    upper: hi,
                });
            }
        }
        Ok(Self { lower, upper })
    }

    /// Returns the lower bounds.
    #[must_use]
    pub fn lower(&self) -> [f64; N] {
        self.lower
    }

    /// Returns the upper bounds.
    #[must_use]
    pub fn upper(&self) -> [f64; N] {
        self.upper
    }

    /// Returns `true` if `x` lies within the bounds (inclusive).
    #[must_use]
    pub fn contains(&self, x: &[f64; N]) -> bool {
        x.iter()
            .zip(self.lower.iter().zip(&self.upper))
            .all(|(&v, (&lo, &hi))| (lo..=hi).contains(&v))
    }

    /// Checks that `x` is finite and within the bounds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NonFiniteInitialGuess`] or
    /// [`Error::InitialGuessOutOfBounds`] for the first offending variable.
    pub(super) fn check(&self, x: &[f64; N]) -> Result<(), Error> {
        for (index, &value) in x.iter().enumerate() {
            let (lower, upper) = (self.lower[index], self.upper[index]);
            if !value.is_finite() {
                return Err(Error::NonFiniteInitialGuess { index, value });
            }
            if value < lower || value > upper {
                return Err(Error::InitialGuessOutOfBounds {
                    index,
                    value,
                    lower,
                    upper,
                });
            }
        }
        Ok(())
    }

    /// Maps `x` onto normalized coordinates.
    pub(super) fn to_unit(&self, x: &[f64; N]) -> [f64; N] {
        std::array::from_fn(|i| (x[i] - self.lower[i]) / (self.upper[i] - self.lower[i]))
    }

    /// Maps normalized coordinates back onto `x`, clamped to the bounds.
    pub(super) fn from_unit(&self, z: &[f64; N]) -> [f64; N] {
        std::array::from_fn(|i| {
            let (lo, hi) = (self.lower[i], self.upper[i]);
            (lo + z[i] * (hi - lo)).clamp(lo, hi)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn rejects_inverted_or_non_finite_bounds() {
        assert!(matches!(
            Bounds::new([0.0, 2.0], [1.0, 2.0]),
            Err(Error::InvalidBounds { index: 1, .. })
        ));
        assert!(matches!(
            Bounds::new([f64::NEG_INFINITY], [1.0]),
            Err(Error::InvalidBounds { index: 0, .. })
        ));
    }

    #[test]
    fn check_is_boundary_inclusive() {
        let bounds = Bounds::new([0.05, 5.5], [0.10, 7.0]).unwrap();

        assert!(bounds.check(&[0.05, 7.0]).is_ok());
        assert!(matches!(
            bounds.check(&[0.04, 6.0]),
            Err(Error::InitialGuessOutOfBounds { index: 0, .. })
        ));
        assert!(matches!(
            bounds.check(&[0.06, f64::NAN]),
            Err(Error::NonFiniteInitialGuess { index: 1, .. })
        ));
    }

    #[test]
    fn unit_mapping_covers_the_box() {
        let bounds = Bounds::new([-2.0, 10.0], [2.0, 20.0]).unwrap();

        let z = bounds.to_unit(&[0.0, 10.0]);
        assert_relative_eq!(z[0], 0.5);
        assert_relative_eq!(z[1], 0.0);

        let x = bounds.from_unit(&[1.0 + 1e-12, 0.25]);
        assert_relative_eq!(x[0], 2.0);
        assert_relative_eq!(x[1], 12.5);
        assert!(bounds.contains(&x));
    }
}
