//! Bite notifications: audio cues and chat lines.

mod audio;
mod chat;
mod dispatcher;

pub use audio::{AudioCue, AudioSink, NullAudio, TerminalBell};
pub use chat::{ChatSink, ConsoleChat, Segment, StyledMessage};
pub use dispatcher::{AlertDispatcher, BiteTier, CHAT_TAG};
