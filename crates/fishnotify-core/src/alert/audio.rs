//! Audio collaborator.

use std::io::Write;

use strum::IntoStaticStr;
use tracing::debug;

/// Sound played for a bite tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum AudioCue {
    Info,
    Alert,
    Alarm,
}

impl AudioCue {
    pub fn id(self) -> &'static str {
        self.into()
    }

    /// Urgency from 1 (info) to 3 (alarm).
    pub fn level(self) -> usize {
        match self {
            AudioCue::Info => 1,
            AudioCue::Alert => 2,
            AudioCue::Alarm => 3,
        }
    }
}

/// Fire-and-forget audio output.
///
/// A new `play` may cut off the previous cue. Implementations swallow their
/// own failures.
pub trait AudioSink {
    fn play(&mut self, cue: AudioCue);
    fn stop(&mut self);
}

/// Rings the terminal bell once per cue level.
pub struct TerminalBell<W: Write> {
    out: W,
}

impl TerminalBell<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> AudioSink for TerminalBell<W> {
    fn play(&mut self, cue: AudioCue) {
        let bells = "\x07".repeat(cue.level());
        if let Err(e) = self
            .out
            .write_all(bells.as_bytes())
            .and_then(|_| self.out.flush())
        {
            debug!("Failed to ring bell for {}: {}", cue.id(), e);
        }
    }

    fn stop(&mut self) {}
}

/// Discards every cue.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, cue: AudioCue) {
        debug!("Audio disabled, dropping cue {}", cue.id());
    }

    fn stop(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_ids() {
        assert_eq!(AudioCue::Info.id(), "info");
        assert_eq!(AudioCue::Alert.id(), "alert");
        assert_eq!(AudioCue::Alarm.id(), "alarm");
    }

    #[test]
    fn test_terminal_bell_rings_per_level() {
        let mut bell = TerminalBell::new(Vec::new());
        bell.play(AudioCue::Alarm);
        bell.stop();
        bell.play(AudioCue::Info);

        assert_eq!(bell.into_inner(), b"\x07\x07\x07\x07".to_vec());
    }
}
