//! Bite detection from `EventPlay` network packets.
//!
//! The client announces a bite with an `EventPlay` packet for the fishing
//! event. This source turns each such packet into a single `Bite` sample so
//! it can drive the same detector as the memory source.

use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::error::Result;
use crate::fishing::{BiteIntensity, FishingState, SignalSource, Snapshot};
use crate::process::ByteBuffer;

/// Event id of the fishing event handler.
pub const FISHING_EVENT_ID: i32 = 0x0015_0001;

/// Scene played when a fish bites.
pub const BITE_SCENE: i16 = 5;

/// Bytes of the packet body this source looks at.
pub const EVENT_PLAY_MIN_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    ZoneUp,
    ZoneDown,
}

/// The fields of an `EventPlay` body that matter for fishing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventPlayPacket {
    pub event_id: i32,
    pub scene: i16,
    pub param5: i32,
}

impl EventPlayPacket {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let buf = ByteBuffer::new(data);
        // Checked up front so a short packet fails as a whole.
        buf.slice_at(0, EVENT_PLAY_MIN_LEN)?;

        Ok(Self {
            event_id: buf.read_i32_at(8)?,
            scene: buf.read_i16_at(12)?,
            param5: buf.read_i32_at(28)?,
        })
    }

    pub fn is_fishing_bite(&self) -> bool {
        self.event_id == FISHING_EVENT_ID && self.scene == BITE_SCENE
    }

    /// Intensity carried in `param5`: 0x124 light, 0x125 medium, 0x126 heavy.
    pub fn intensity(&self) -> BiteIntensity {
        match self.param5 {
            0x124 => BiteIntensity::Weak,
            0x125 => BiteIntensity::Strong,
            0x126 => BiteIntensity::Legendary,
            _ => BiteIntensity::Unknown,
        }
    }
}

/// Signal source fed by network messages instead of memory reads.
///
/// Inert until an `EventPlay` opcode is known. Bite packets are queued and
/// replayed as `Bite` samples with an idle sample after each one, so packets
/// arriving between two ticks still count as separate edges. A bite packet
/// with an unrecognized intensity queues nothing and asks for the playing
/// cue to stop.
#[derive(Debug, Default)]
pub struct PacketSignalSource {
    opcode: Option<u16>,
    pending: VecDeque<BiteIntensity>,
    in_bite: bool,
    stop_requested: bool,
}

impl PacketSignalSource {
    pub fn new(opcode: Option<u16>) -> Self {
        Self {
            opcode,
            ..Self::default()
        }
    }

    pub fn opcode(&self) -> Option<u16> {
        self.opcode
    }

    /// Handle one network message. Returns true if it was a bite packet.
    pub fn on_message(&mut self, opcode: u16, direction: Direction, data: &[u8]) -> bool {
        if direction != Direction::ZoneDown || Some(opcode) != self.opcode {
            return false;
        }

        let packet = match EventPlayPacket::parse(data) {
            Ok(packet) => packet,
            Err(e) => {
                debug!("Malformed EventPlay packet: {}", e);
                return false;
            }
        };

        if !packet.is_fishing_bite() {
            trace!("EventPlay {:#X} scene {} ignored", packet.event_id, packet.scene);
            return false;
        }

        match packet.intensity() {
            BiteIntensity::Unknown => {
                debug!("Bite packet with unrecognized param5 {:#X}", packet.param5);
                self.stop_requested = true;
            }
            intensity => self.pending.push_back(intensity),
        }
        true
    }

    /// Bite packets not yet replayed.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl SignalSource for PacketSignalSource {
    fn sample(&mut self) -> Snapshot {
        let idle = Snapshot::new(FishingState::None, None);
        if std::mem::take(&mut self.in_bite) {
            return idle;
        }

        match self.pending.pop_front() {
            Some(intensity) => {
                self.in_bite = true;
                Snapshot::bite(intensity)
            }
            None => idle,
        }
    }

    fn is_armed(&self) -> bool {
        self.opcode.is_some()
    }

    fn take_stop_request(&mut self) -> bool {
        std::mem::take(&mut self.stop_requested)
    }
}
