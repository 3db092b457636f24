//! The bite detection engine: source, detector and dispatcher in one tick.

use std::fmt;

use tracing::{debug, info, trace};

use crate::alert::{AlertDispatcher, AudioSink, ChatSink};
use crate::fishing::{BiteDetector, BiteEvent, SignalSource};

/// What the presentation layer shows about the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStatus {
    /// Armed, nothing hooked yet.
    Ready,
    /// Armed, this many bites dispatched.
    Triggered(u32),
    /// The target could not be located; detection is off for good.
    LocatorFailed,
}

impl EngineStatus {
    pub fn is_ok(self) -> bool {
        !matches!(self, EngineStatus::LocatorFailed)
    }
}

impl fmt::Display for EngineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineStatus::Ready => write!(f, "Unknown (not triggered yet)"),
            EngineStatus::Triggered(count) => write!(f, "OK ({} fish hooked)", count),
            EngineStatus::LocatorFailed => write!(f, "No bite address :("),
        }
    }
}

/// Polls a signal source and turns bite edges into alerts.
///
/// `tick` takes `&mut self`: the owner calls it serially, once per frame.
pub struct Engine<S, A, C> {
    source: S,
    detector: BiteDetector,
    dispatcher: AlertDispatcher<A, C>,
}

impl<S, A, C> Engine<S, A, C>
where
    S: SignalSource,
    A: AudioSink,
    C: ChatSink,
{
    pub fn new(source: S, dispatcher: AlertDispatcher<A, C>) -> Self {
        if source.is_armed() {
            info!("Bite detection armed");
        } else {
            info!("Bite detection disabled: target not located");
        }

        Self {
            source,
            detector: BiteDetector::new(),
            dispatcher,
        }
    }

    /// Sample once, detect, and dispatch.
    pub fn tick(&mut self) -> Option<BiteEvent> {
        let snapshot = self.source.sample();
        trace!("Tick {:?}", snapshot);

        if self.source.take_stop_request() {
            debug!("Source asked to silence the current cue");
            self.dispatcher.stop();
        }

        let event = self.detector.observe(snapshot)?;
        self.dispatcher.dispatch(event);
        Some(event)
    }

    pub fn status(&self) -> EngineStatus {
        if !self.source.is_armed() {
            return EngineStatus::LocatorFailed;
        }
        match self.dispatcher.hooked() {
            0 => EngineStatus::Ready,
            count => EngineStatus::Triggered(count),
        }
    }

    pub fn hooked(&self) -> u32 {
        self.dispatcher.hooked()
    }

    pub fn set_chat_alerts(&mut self, enabled: bool) {
        self.dispatcher.set_chat_alerts(enabled);
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn dispatcher(&self) -> &AlertDispatcher<A, C> {
        &self.dispatcher
    }

    /// Stop any playing cue. The engine must not be ticked afterwards.
    pub fn shutdown(&mut self) {
        self.dispatcher.stop();
        info!("Bite detection stopped after {} bite(s)", self.hooked());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    use crate::alert::{AudioCue, StyledMessage};
    use crate::fishing::{BiteIntensity, FishingState, Snapshot};

    struct Scripted {
        snapshots: VecDeque<Snapshot>,
        armed: bool,
        stop_on_tick: Option<usize>,
        ticks: usize,
    }

    impl Scripted {
        fn new(snapshots: &[Snapshot]) -> Self {
            Self {
                snapshots: snapshots.iter().copied().collect(),
                armed: true,
                stop_on_tick: None,
                ticks: 0,
            }
        }
    }

    impl SignalSource for Scripted {
        fn sample(&mut self) -> Snapshot {
            self.ticks += 1;
            self.snapshots.pop_front().unwrap_or_default()
        }

        fn is_armed(&self) -> bool {
            self.armed
        }

        fn take_stop_request(&mut self) -> bool {
            self.stop_on_tick == Some(self.ticks)
        }
    }

    #[derive(Default)]
    struct Cues(Vec<AudioCue>, usize);

    impl AudioSink for Cues {
        fn play(&mut self, cue: AudioCue) {
            self.0.push(cue);
        }

        fn stop(&mut self) {
            self.1 += 1;
        }
    }

    #[derive(Default)]
    struct Lines(Vec<String>);

    impl ChatSink for Lines {
        fn print(&mut self, message: &StyledMessage) {
            self.0.push(message.plain_text());
        }
    }

    fn engine(snapshots: &[Snapshot], chat: bool) -> Engine<Scripted, Cues, Lines> {
        Engine::new(
            Scripted::new(snapshots),
            AlertDispatcher::new(Cues::default(), Lines::default(), chat),
        )
    }

    #[test]
    fn test_tick_dispatches_on_edge() {
        let waiting = Snapshot::new(FishingState::Waiting, Some(BiteIntensity::None));
        let bite = Snapshot::bite(BiteIntensity::Strong);
        let mut engine = engine(&[waiting, bite, bite, waiting], true);

        assert_eq!(engine.status(), EngineStatus::Ready);
        let events: Vec<_> = (0..4).map(|_| engine.tick()).collect();

        assert_eq!(events.iter().flatten().count(), 1);
        assert_eq!(engine.status(), EngineStatus::Triggered(1));
        assert_eq!(engine.dispatcher().audio().0, vec![AudioCue::Alert]);
        assert_eq!(
            engine.dispatcher().chat().0,
            vec!["[FishNotify] You hook a fish with a medium bite.".to_string()]
        );
    }

    #[test]
    fn test_chat_toggle_applies_to_next_bite() {
        let bite = Snapshot::bite(BiteIntensity::Weak);
        let idle = Snapshot::idle();
        let mut engine = engine(&[bite, idle, bite], false);

        engine.tick();
        engine.set_chat_alerts(true);
        engine.tick();
        engine.tick();

        assert_eq!(engine.hooked(), 2);
        assert_eq!(engine.dispatcher().chat().0.len(), 1);
    }

    #[test]
    fn test_unarmed_source_reports_locator_failure() {
        let mut source = Scripted::new(&[Snapshot::new(FishingState::Bite, None)]);
        source.armed = false;
        let mut engine = Engine::new(
            source,
            AlertDispatcher::new(Cues::default(), Lines::default(), true),
        );

        assert_eq!(engine.tick(), None);
        assert_eq!(engine.status(), EngineStatus::LocatorFailed);
        assert!(!engine.status().is_ok());
    }

    #[test]
    fn test_shutdown_stops_audio() {
        let mut engine = engine(&[], false);
        engine.shutdown();

        assert_eq!(engine.dispatcher().audio().1, 1);
    }

    #[test]
    fn test_stop_request_silences_audio_without_event() {
        let mut source = Scripted::new(&[Snapshot::bite(BiteIntensity::Weak), Snapshot::idle()]);
        source.stop_on_tick = Some(2);
        let mut engine = Engine::new(
            source,
            AlertDispatcher::new(Cues::default(), Lines::default(), false),
        );

        assert!(engine.tick().is_some());
        assert_eq!(engine.dispatcher().audio().1, 0);

        assert!(engine.tick().is_none());
        assert_eq!(engine.dispatcher().audio().0, vec![AudioCue::Info]);
        assert_eq!(engine.dispatcher().audio().1, 1);
        assert_eq!(engine.hooked(), 1);
    }

    #[test]
    fn test_status_text() {
        assert_eq!(EngineStatus::Ready.to_string(), "Unknown (not triggered yet)");
        assert_eq!(EngineStatus::Triggered(3).to_string(), "OK (3 fish hooked)");
        assert_eq!(EngineStatus::LocatorFailed.to_string(), "No bite address :(");
    }
}
