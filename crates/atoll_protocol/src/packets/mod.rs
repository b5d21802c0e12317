//! # Packet Base Contract
//!
//! Every concrete packet fixes two compile-time facts: a discriminant
//! unique to its kind, and a byte budget bounding its serialized size.
//! The discriminant leads every encoded packet; the budget sizes the
//! write buffer before encoding begins, and running past it is fatal.
//!
//! An outer dispatch layer consumes the discriminant with
//! [`read_packet_type`] and hands the stream to the matching kind's
//! `deserialize`; [`Packet::decode`] bundles both steps for callers that
//! already know what they expect.

pub mod map;
pub mod pickup;

use crate::error::{ProtocolError, ProtocolResult};
use crate::stream::{BitReader, BitWriter};

/// Bits of the leading packet discriminant.
pub const PACKET_TYPE_BITS: u8 = 8;

/// Types of packets in the protocol.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PacketType {
    /// Server -> Client: full map snapshot at match start.
    Map = 0,
    /// Server -> Client: item pickup notification.
    Pickup = 1,
}

impl TryFrom<u8> for PacketType {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Map),
            1 => Ok(Self::Pickup),
            _ => Err(ProtocolError::UnknownPacketType(value)),
        }
    }
}

/// Reads the leading discriminant for outer dispatch.
///
/// An unrecognized value rejects the whole packet; nothing after the
/// discriminant is touched.
pub fn read_packet_type(stream: &mut BitReader<'_>) -> ProtocolResult<PacketType> {
    #[allow(clippy::cast_possible_truncation)]
    let raw = stream.read_bits(PACKET_TYPE_BITS)? as u8;
    PacketType::try_from(raw)
}

/// A typed, bit-packed wire message.
///
/// `serialize`/`deserialize` are exact mirrors over the payload; the
/// discriminant itself is owned by the provided `encode`/`decode`.
pub trait Packet: Sized {
    /// Discriminant value, unique per packet kind.
    const PACKET_TYPE: PacketType;

    /// Byte budget the write buffer is sized from.
    ///
    /// Must accommodate the worst case the wire format can express;
    /// exceeding it mid-encode is a buffer-exhaustion error.
    const ALLOC_BYTES: usize;

    /// Writes the payload (everything after the discriminant).
    fn serialize(&self, stream: &mut BitWriter) -> ProtocolResult<()>;

    /// Reads the payload, assuming the discriminant is already consumed.
    fn deserialize(stream: &mut BitReader<'_>) -> ProtocolResult<Self>;

    /// Encodes the full packet: discriminant, then payload.
    fn encode(&self) -> ProtocolResult<Vec<u8>> {
        let mut stream = BitWriter::with_capacity(Self::ALLOC_BYTES);
        stream.write_bits(u32::from(Self::PACKET_TYPE as u8), PACKET_TYPE_BITS)?;
        self.serialize(&mut stream)?;
        tracing::trace!(
            "encoded {:?} packet: {} bytes",
            Self::PACKET_TYPE,
            stream.byte_len()
        );
        Ok(stream.into_bytes())
    }

    /// Decodes a full packet of this kind, verifying the discriminant.
    fn decode(bytes: &[u8]) -> ProtocolResult<Self> {
        let mut stream = BitReader::new(bytes);
        let packet_type = read_packet_type(&mut stream)?;
        if packet_type != Self::PACKET_TYPE {
            tracing::warn!(
                "dropping packet: expected {:?}, got {:?}",
                Self::PACKET_TYPE,
                packet_type
            );
            return Err(ProtocolError::PacketTypeMismatch {
                expected: Self::PACKET_TYPE as u8,
                actual: packet_type as u8,
            });
        }
        Self::deserialize(&mut stream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packet_type_round_trip() {
        for packet_type in [PacketType::Map, PacketType::Pickup] {
            assert_eq!(PacketType::try_from(packet_type as u8), Ok(packet_type));
        }
    }

    #[test]
    fn test_unknown_packet_type_rejected() {
        assert_eq!(
            PacketType::try_from(7),
            Err(ProtocolError::UnknownPacketType(7))
        );
    }

    #[test]
    fn test_dispatch_reads_discriminant_only() {
        let bytes = [PacketType::Pickup as u8, 0xFF];
        let mut stream = BitReader::new(&bytes);
        assert_eq!(read_packet_type(&mut stream).unwrap(), PacketType::Pickup);
        assert_eq!(stream.remaining_bits(), 8);
    }
}
