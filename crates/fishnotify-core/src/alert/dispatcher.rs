use strum::IntoStaticStr;
use tracing::{debug, info};

use crate::fishing::{BiteEvent, BiteIntensity};

use super::{AudioCue, AudioSink, ChatSink, StyledMessage};

/// Tag printed in front of every chat alert.
pub const CHAT_TAG: &str = "[FishNotify]";

const PHRASE_LEAD: &str = "You hook a fish with a ";
const PHRASE_TAIL: &str = " bite.";

/// Notification tier of an actionable bite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum BiteTier {
    Light,
    Medium,
    Heavy,
}

impl BiteTier {
    pub fn from_intensity(intensity: BiteIntensity) -> Option<Self> {
        match intensity {
            BiteIntensity::Weak => Some(BiteTier::Light),
            BiteIntensity::Strong => Some(BiteTier::Medium),
            BiteIntensity::Legendary => Some(BiteTier::Heavy),
            BiteIntensity::Unknown | BiteIntensity::None => None,
        }
    }

    pub fn name(self) -> &'static str {
        self.into()
    }

    pub fn cue(self) -> AudioCue {
        match self {
            BiteTier::Light => AudioCue::Info,
            BiteTier::Medium => AudioCue::Alert,
            BiteTier::Heavy => AudioCue::Alarm,
        }
    }

    pub fn phrase(self) -> String {
        format!("{}{}{}", PHRASE_LEAD, self.name(), PHRASE_TAIL)
    }

    /// The chat line: highlighted tag, then the phrase with the tier word highlighted.
    pub fn message(self) -> StyledMessage {
        StyledMessage::new()
            .highlight(CHAT_TAG)
            .text(format!(" {}", PHRASE_LEAD))
            .highlight(self.name())
            .text(PHRASE_TAIL)
    }
}

impl std::fmt::Display for BiteTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Turns bite events into audio cues and optional chat lines.
pub struct AlertDispatcher<A, C> {
    audio: A,
    chat: C,
    chat_alerts: bool,
    hooked: u32,
}

impl<A: AudioSink, C: ChatSink> AlertDispatcher<A, C> {
    pub fn new(audio: A, chat: C, chat_alerts: bool) -> Self {
        Self {
            audio,
            chat,
            chat_alerts,
            hooked: 0,
        }
    }

    /// Count the bite, play its cue and, if enabled, print the chat line.
    ///
    /// Returns the tier that was dispatched, or `None` for a non-actionable
    /// intensity (which the detector never emits).
    pub fn dispatch(&mut self, event: BiteEvent) -> Option<BiteTier> {
        let Some(tier) = BiteTier::from_intensity(event.intensity) else {
            debug!("Ignoring non-actionable bite {}", event.intensity);
            return None;
        };

        self.hooked = self.hooked.saturating_add(1);
        info!("Hooked a fish with a {} bite (#{})", tier, self.hooked);

        self.audio.play(tier.cue());
        if self.chat_alerts {
            self.chat.print(&tier.message());
        }

        Some(tier)
    }

    /// Silence whatever cue is still playing.
    pub fn stop(&mut self) {
        self.audio.stop();
    }

    pub fn hooked(&self) -> u32 {
        self.hooked
    }

    pub fn chat_alerts(&self) -> bool {
        self.chat_alerts
    }

    pub fn set_chat_alerts(&mut self, enabled: bool) {
        self.chat_alerts = enabled;
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn chat(&self) -> &C {
        &self.chat
    }
}
