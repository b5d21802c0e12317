//! Item pickup notification.
//!
//! The minimal packet: a discriminant and nothing else. The client plays
//! the pickup feedback for whatever it last requested; no payload is
//! needed.

use crate::error::ProtocolResult;
use crate::packets::{Packet, PacketType};
use crate::stream::{BitReader, BitWriter};

/// Server -> Client: an item was picked up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PickupPacket;

impl Packet for PickupPacket {
    const PACKET_TYPE: PacketType = PacketType::Pickup;
    const ALLOC_BYTES: usize = 1;

    fn serialize(&self, _stream: &mut BitWriter) -> ProtocolResult<()> {
        Ok(())
    }

    fn deserialize(_stream: &mut BitReader<'_>) -> ProtocolResult<Self> {
        Ok(Self)
    }
}
