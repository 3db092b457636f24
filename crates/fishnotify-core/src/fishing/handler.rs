//! Access to the host's fishing event handler.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::process::ReadMemory;
use crate::signature::TargetAddress;

use super::FishingState;

/// Read-only view of the host's fishing event handler.
///
/// Returns `None` while the handler does not exist (not logged in, zoning,
/// no fishing event running). Any `FnMut() -> Option<FishingState>` closure
/// is a handler, which is how tests script state sequences.
pub trait FishingHandler {
    fn current_state(&mut self) -> Option<FishingState>;

    /// Whether this handler can ever report a state. `false` means the
    /// handler itself could not be located, so detection is off for good.
    fn is_available(&self) -> bool {
        true
    }
}

impl<F> FishingHandler for F
where
    F: FnMut() -> Option<FishingState>,
{
    fn current_state(&mut self) -> Option<FishingState> {
        self()
    }
}

/// Where the state byte sits relative to the event framework singleton.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerLayout {
    /// Pointer hops after dereferencing the singleton slot; each hop reads a
    /// pointer at `current + offset`.
    pub offsets: Vec<u64>,
    /// Offset of the state byte inside the fishing handler.
    pub state_offset: u64,
}

impl Default for HandlerLayout {
    fn default() -> Self {
        Self {
            offsets: vec![0x2BC8],
            state_offset: 0x220,
        }
    }
}

/// Follows `slot -> framework -> ... -> handler` and reads the state byte.
///
/// A null pointer anywhere along the chain means the handler is unavailable
/// for this tick.
pub struct PointerChainHandler<R> {
    reader: R,
    slot: TargetAddress,
    layout: HandlerLayout,
}

impl<R: ReadMemory> PointerChainHandler<R> {
    pub fn new(reader: R, slot: TargetAddress, layout: HandlerLayout) -> Self {
        Self {
            reader,
            slot,
            layout,
        }
    }

    pub fn slot(&self) -> TargetAddress {
        self.slot
    }

    fn read_pointer(&self, address: u64) -> Option<u64> {
        match self.reader.read_u64(address) {
            Ok(0) => None,
            Ok(ptr) => Some(ptr),
            Err(e) => {
                trace!("Handler pointer read failed: {}", e);
                None
            }
        }
    }
}

impl<R: ReadMemory> FishingHandler for PointerChainHandler<R> {
    fn current_state(&mut self) -> Option<FishingState> {
        let mut ptr = self.read_pointer(self.slot.address()?)?;
        for offset in &self.layout.offsets {
            ptr = self.read_pointer(ptr.wrapping_add(*offset))?;
        }

        self.reader
            .read_u8(ptr.wrapping_add(self.layout.state_offset))
            .map(FishingState::from_u8)
            .ok()
    }

    fn is_available(&self) -> bool {
        self.slot.is_resolved()
    }
}
