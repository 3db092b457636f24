//! Packet-based signal source.

mod opcode;
mod source;

pub use opcode::{
    EVENT_PLAY, GLOBAL_REGION, OpcodeEntry, OpcodeRegion, SERVER_ZONE_IPC_TYPE,
    find_event_play_opcode,
};
pub use source::{
    BITE_SCENE, Direction, EVENT_PLAY_MIN_LEN, EventPlayPacket, FISHING_EVENT_ID,
    PacketSignalSource,
};
