use powderopt_core::Snapshot;

use super::{Error, Point};

/// Events emitted by the SQP solver.
///
/// Iterates and trials carry the full [`Snapshot`] so observers can inspect
/// model inputs and outputs without re-evaluating.
pub enum Event<'a, I, O, const N: usize> {
    /// An accepted iterate. Iteration 0 is the initial guess.
    Iterate {
        /// Major iteration that produced this point.
        iter: usize,

        /// The accepted point.
        point: Point<N>,

        /// Line-search step multiplier that produced this point (zero for
        /// the initial guess).
        alpha: f64,

        /// The model input and output at this point.
        snapshot: &'a Snapshot<I, O>,
    },

    /// A line-search trial point, reported before the merit test.
    Trial {
        /// Current major iteration.
        iter: usize,

        /// The trial point.
        point: Point<N>,

        /// Line-search step multiplier.
        alpha: f64,

        /// The model input and output at this point.
        snapshot: &'a Snapshot<I, O>,
    },

    /// An evaluation failed or produced non-finite values.
    Failed {
        /// Current major iteration.
        iter: usize,

        /// The x value where evaluation failed.
        x: [f64; N],

        /// The failure.
        error: &'a Error,
    },
}

impl<I, O, const N: usize> Event<'_, I, O, N> {
    /// Returns the x value that was evaluated (or attempted).
    #[must_use]
    pub fn x(&self) -> [f64; N] {
        match self {
            Self::Iterate { point, .. } | Self::Trial { point, .. } => point.x,
            Self::Failed { x, .. } => *x,
        }
    }

    /// Returns the major iteration the event belongs to.
    #[must_use]
    pub fn iter(&self) -> usize {
        match self {
            Self::Iterate { iter, .. } | Self::Trial { iter, .. } | Self::Failed { iter, .. } => {
                *iter
            }
        }
    }
}
