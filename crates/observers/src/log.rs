use tracing::{debug, trace, warn};

use powderopt_core::Observer;
use powderopt_solvers::optimization::sqp;

/// Forwards solver events to `tracing`.
///
/// Accepted iterates are logged at `debug`, line-search trials at `trace`,
/// and failed evaluations at `warn`. The observer never acts.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl<I, O, A, const N: usize> Observer<sqp::Event<'_, I, O, N>, A> for TracingObserver {
    fn observe(&mut self, event: &sqp::Event<'_, I, O, N>) -> Option<A> {
        match event {
            sqp::Event::Iterate {
                iter, point, alpha, ..
            } => debug!(
                iter,
                x = ?point.x,
                objective = point.objective,
                violation = point.violation,
                alpha,
                "accepted iterate"
            ),
            sqp::Event::Trial {
                iter, point, alpha, ..
            } => trace!(
                iter,
                x = ?point.x,
                objective = point.objective,
                violation = point.violation,
                alpha,
                "line-search trial"
            ),
            sqp::Event::Failed { iter, x, error } => {
                warn!(iter, x = ?x, %error, "evaluation failed");
            }
        }
        None
    }
}
