pub mod alert;
pub mod config;
pub mod engine;
pub mod error;
pub mod fishing;
pub mod packet;
pub mod process;
pub mod signature;

pub use alert::{AlertDispatcher, AudioCue, AudioSink, BiteTier, ChatSink, StyledMessage};
pub use config::Configuration;
pub use engine::{Engine, EngineStatus};
pub use error::{Error, Result};
pub use fishing::{
    BiteDetector, BiteEvent, BiteIntensity, FishingHandler, FishingState, MemorySignalSource,
    PointerChainHandler, SignalSource, Snapshot,
};
pub use packet::{EventPlayPacket, PacketSignalSource, find_event_play_opcode};
pub use process::{CodeRegion, MemoryReader, ProcessHandle, ReadMemory};
pub use signature::{
    CodeSignature, LocateError, SignatureSet, TargetAddress, builtin_signatures, load_signatures,
    locate,
};
