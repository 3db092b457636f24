//! Per-tick sampling of the host's fishing state.

use tracing::trace;

use crate::process::{CodeRegion, ReadMemory};
use crate::signature::{CodeSignature, TargetAddress, locate};

use super::{BiteIntensity, FishingHandler, FishingState};

/// What the host reported on one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Snapshot {
    pub state: FishingState,
    /// `None` when the source cannot observe intensity at all.
    pub intensity: Option<BiteIntensity>,
}

impl Snapshot {
    pub fn new(state: FishingState, intensity: Option<BiteIntensity>) -> Self {
        Self { state, intensity }
    }

    pub fn bite(intensity: BiteIntensity) -> Self {
        Self::new(FishingState::Bite, Some(intensity))
    }

    pub fn idle() -> Self {
        Self::default()
    }
}

/// A source of raw fishing signals, polled once per tick.
///
/// Callers must invoke `sample` serially from a single thread.
pub trait SignalSource {
    fn sample(&mut self) -> Snapshot;

    /// Whether this source can ever report a bite.
    fn is_armed(&self) -> bool;

    /// Whether the host asked for the current cue to be silenced since the
    /// last call. Clears the request.
    fn take_stop_request(&mut self) -> bool {
        false
    }
}

/// Samples the handler state and the bite type byte from host memory.
pub struct MemorySignalSource<R, H> {
    reader: R,
    target: TargetAddress,
    handler: H,
}

impl<R: ReadMemory, H: FishingHandler> MemorySignalSource<R, H> {
    pub fn new(reader: R, target: TargetAddress, handler: H) -> Self {
        Self {
            reader,
            target,
            handler,
        }
    }

    /// Run the locator for the bite type byte, then build the source.
    ///
    /// This is the only scan the source ever performs.
    pub fn locate(reader: R, region: CodeRegion, signature: &CodeSignature, handler: H) -> Self {
        let target = locate(&reader, region, signature);
        Self::new(reader, target, handler)
    }

    pub fn target(&self) -> TargetAddress {
        self.target
    }
}

impl<R: ReadMemory, H: FishingHandler> SignalSource for MemorySignalSource<R, H> {
    fn sample(&mut self) -> Snapshot {
        let state = self.handler.current_state().unwrap_or_default();
        let intensity = self
            .target
            .address()
            .map(|address| read_intensity(&self.reader, address));

        Snapshot { state, intensity }
    }

    fn is_armed(&self) -> bool {
        self.target.is_resolved() && self.handler.is_available()
    }
}

/// The one read of the bite type byte.
fn read_intensity<R: ReadMemory>(reader: &R, address: u64) -> BiteIntensity {
    match reader.read_u8(address) {
        Ok(raw) => {
            let intensity = BiteIntensity::from_u8(raw);
            if intensity == BiteIntensity::Unknown && raw != 0 {
                trace!("Unrecognized bite type byte {:#04X}", raw);
            }
            intensity
        }
        Err(e) => {
            trace!("Bite type read failed: {}", e);
            BiteIntensity::Unknown
        }
    }
}
