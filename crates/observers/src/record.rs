use powderopt_core::Observer;
use powderopt_solvers::optimization::sqp;

/// One accepted iterate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record<const N: usize> {
    pub iter: usize,
    pub point: sqp::Point<N>,
    pub alpha: f64,
}

/// Keeps the history of accepted iterates and counts the other events.
///
/// Pass it to a solver by mutable reference to keep ownership:
/// `(&mut recorder)` alone or paired with another observer.
#[derive(Debug, Clone, Default)]
pub struct Recorder<const N: usize> {
    iterates: Vec<Record<N>>,
    trials: usize,
    failures: usize,
}

impl<const N: usize> Recorder<N> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            iterates: Vec::new(),
            trials: 0,
            failures: 0,
        }
    }

    /// Accepted iterates in order, starting with the initial guess.
    #[must_use]
    pub fn iterates(&self) -> &[Record<N>] {
        &self.iterates
    }

    /// Number of line-search trial points seen.
    #[must_use]
    pub fn trials(&self) -> usize {
        self.trials
    }

    /// Number of failed evaluations seen.
    #[must_use]
    pub fn failures(&self) -> usize {
        self.failures
    }
}

impl<I, O, A, const N: usize> Observer<sqp::Event<'_, I, O, N>, A> for &mut Recorder<N> {
    fn observe(&mut self, event: &sqp::Event<'_, I, O, N>) -> Option<A> {
        match event {
            sqp::Event::Iterate {
                iter, point, alpha, ..
            } => self.iterates.push(Record {
                iter: *iter,
                point: *point,
                alpha: *alpha,
            }),
            sqp::Event::Trial { .. } => self.trials += 1,
            sqp::Event::Failed { .. } => self.failures += 1,
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use powderopt_core::Snapshot;

    use crate::TracingObserver;

    type Event<'a> = sqp::Event<'a, f64, f64, 1>;

    fn observe_all<Obs>(observer: &mut Obs, events: &[Event<'_>])
    where
        Obs: for<'a> Observer<Event<'a>, sqp::Action>,
    {
        for event in events {
            assert!(observer.observe(event).is_none());
        }
    }

    #[test]
    fn records_iterates_and_counts_the_rest() {
        let snapshot = Snapshot::new(0.5, 0.25);
        let error = sqp::Error::NonFiniteEvaluation { x: vec![2.0] };
        let events = [
            Event::Iterate {
                iter: 0,
                point: sqp::Point::new([0.5], 0.25, 0.0),
                alpha: 0.0,
                snapshot: &snapshot,
            },
            Event::Trial {
                iter: 1,
                point: sqp::Point::new([1.0], 1.0, 0.0),
                alpha: 1.0,
                snapshot: &snapshot,
            },
            Event::Failed {
                iter: 1,
                x: [2.0],
                error: &error,
            },
            Event::Iterate {
                iter: 1,
                point: sqp::Point::new([0.25], 0.0625, 0.0),
                alpha: 0.5,
                snapshot: &snapshot,
            },
        ];

        let mut recorder = Recorder::new();
        observe_all(&mut (TracingObserver, &mut recorder), &events);

        assert_eq!(recorder.iterates().len(), 2);
        assert_eq!(recorder.trials(), 1);
        assert_eq!(recorder.failures(), 1);

        let last = recorder.iterates()[1];
        assert_eq!(last.iter, 1);
        assert_relative_eq!(last.alpha, 0.5);
        assert_relative_eq!(last.point.objective, 0.0625);
    }
}
