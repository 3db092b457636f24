//! Fishing state sampling and bite detection.

mod detector;
mod enums;
mod handler;
mod sampler;

pub use detector::{BiteDetector, BiteEvent};
pub use enums::{BiteIntensity, FishingState};
pub use handler::{FishingHandler, HandlerLayout, PointerChainHandler};
pub use sampler::{MemorySignalSource, SignalSource, Snapshot};
