use tracing::{debug, trace};

use super::{BiteIntensity, FishingState, Snapshot};

/// A detected bite, consumed immediately by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BiteEvent {
    pub intensity: BiteIntensity,
}

/// Edge-triggered bite detector.
///
/// The host reports `Bite` for the whole bite window, so only the tick that
/// enters `Bite` can fire. The previous state is updated on every tick, even
/// when the entering tick carried no usable intensity; such a bite is lost.
#[derive(Debug, Clone, Default)]
pub struct BiteDetector {
    previous: Option<FishingState>,
}

impl BiteDetector {
    /// A detector with no prior state, so a first tick in `Bite` fires.
    pub fn new() -> Self {
        Self::default()
    }

    /// A detector that believes the host was already in `previous`.
    pub fn with_previous(previous: FishingState) -> Self {
        Self {
            previous: Some(previous),
        }
    }

    pub fn previous(&self) -> Option<FishingState> {
        self.previous
    }

    /// Feed one snapshot; returns the event if this tick is a bite edge.
    pub fn observe(&mut self, snapshot: Snapshot) -> Option<BiteEvent> {
        let entering_bite =
            snapshot.state.is_bite() && self.previous != Some(FishingState::Bite);

        let event = match snapshot.intensity {
            Some(intensity) if entering_bite && intensity.is_actionable() => {
                debug!("Bite detected ({})", intensity);
                Some(BiteEvent { intensity })
            }
            intensity if entering_bite => {
                debug!("Bite edge without usable intensity ({:?})", intensity);
                None
            }
            _ => None,
        };

        if self.previous != Some(snapshot.state) {
            trace!("Fishing state {:?} -> {}", self.previous, snapshot.state);
        }
        self.previous = Some(snapshot.state);

        event
    }

    /// Forget the previous state.
    pub fn reset(&mut self) {
        self.previous = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(detector: &mut BiteDetector, snapshots: &[Snapshot]) -> Vec<Option<BiteEvent>> {
        snapshots.iter().map(|s| detector.observe(*s)).collect()
    }

    #[test]
    fn test_first_tick_bite_fires() {
        let mut detector = BiteDetector::new();
        let events = run(&mut detector, &[Snapshot::bite(BiteIntensity::Weak)]);

        assert_eq!(
            events,
            vec![Some(BiteEvent {
                intensity: BiteIntensity::Weak
            })]
        );
    }

    #[test]
    fn test_sustained_bite_after_bite_never_fires() {
        let mut detector = BiteDetector::with_previous(FishingState::Bite);
        let bite = Snapshot::bite(BiteIntensity::Strong);

        let events = run(&mut detector, &[bite, bite, bite]);
        assert!(events.iter().all(Option::is_none));
    }

    #[test]
    fn test_edge_fires_on_third_tick() {
        let mut detector = BiteDetector::new();
        let events = run(
            &mut detector,
            &[
                Snapshot::new(FishingState::None, Some(BiteIntensity::None)),
                Snapshot::new(FishingState::PoleReady, Some(BiteIntensity::None)),
                Snapshot::bite(BiteIntensity::Legendary),
            ],
        );

        assert_eq!(events[0], None);
        assert_eq!(events[1], None);
        assert_eq!(
            events[2],
            Some(BiteEvent {
                intensity: BiteIntensity::Legendary
            })
        );
    }

    #[test]
    fn test_one_event_per_run_regardless_of_length() {
        for run_length in [1, 2, 10, 1000] {
            let mut detector = BiteDetector::new();
            let mut snapshots = vec![Snapshot::new(FishingState::Waiting, None)];
            snapshots.extend(std::iter::repeat_n(
                Snapshot::bite(BiteIntensity::Strong),
                run_length,
            ));
            snapshots.push(Snapshot::new(FishingState::Reeling, None));

            let fired = run(&mut detector, &snapshots)
                .into_iter()
                .flatten()
                .count();
            assert_eq!(fired, 1, "run length {}", run_length);
        }
    }

    #[test]
    fn test_re_entry_fires_again() {
        let mut detector = BiteDetector::new();
        let bite = Snapshot::bite(BiteIntensity::Weak);
        let waiting = Snapshot::new(FishingState::Waiting, Some(BiteIntensity::None));

        let fired = run(&mut detector, &[bite, bite, waiting, bite, bite])
            .into_iter()
            .flatten()
            .count();
        assert_eq!(fired, 2);
    }

    #[test]
    fn test_non_actionable_intensity_consumes_edge() {
        for intensity in [BiteIntensity::Unknown, BiteIntensity::None] {
            let mut detector = BiteDetector::with_previous(FishingState::Waiting);

            assert_eq!(detector.observe(Snapshot::bite(intensity)), None);
            assert_eq!(detector.previous(), Some(FishingState::Bite));

            // The intensity byte catches up one tick later: still no event.
            assert_eq!(detector.observe(Snapshot::bite(BiteIntensity::Strong)), None);
        }
    }

    #[test]
    fn test_missing_intensity_never_fires() {
        let mut detector = BiteDetector::new();

        assert_eq!(detector.observe(Snapshot::new(FishingState::Bite, None)), None);
        assert_eq!(detector.previous(), Some(FishingState::Bite));
    }

    #[test]
    fn test_previous_advances_without_events() {
        let mut detector = BiteDetector::new();
        assert_eq!(detector.previous(), None);

        detector.observe(Snapshot::new(FishingState::PoleOut, None));
        assert_eq!(detector.previous(), Some(FishingState::PoleOut));

        detector.reset();
        assert_eq!(detector.previous(), None);
    }
}
