//! # ATOLL Protocol - The Wire Layer
//!
//! Bit-packed binary packets exchanged between game client and server.
//!
//! ## Architecture
//!
//! - **Stream**: bit-level writer/reader with domain quantization
//!   (positions, rotations, variations) and counted collections
//! - **Registry codec**: placeable definitions travel as stable indices
//! - **Packets**: each kind fixes a discriminant and a byte budget, and
//!   implements symmetric serialize/deserialize over a shared stream
//!
//! ## Packet Structure
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ Discriminant (8 bits)                                        │
//! ├──────────────────────────────────────────────────────────────┤
//! │ Payload (bit-packed, bounded by the packet's byte budget)    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Philosophy
//!
//! - Every bit counts - count prefixes use exactly the bits their
//!   worst-case cardinality needs
//! - The wire layout is fixed and versionless - both sides compile the
//!   same catalogs and constants
//! - Failure is total - a packet either decodes completely or is rejected
//!
//! ## Example
//!
//! ```rust,ignore
//! use atoll_protocol::{MapPacket, Packet};
//!
//! let packet = MapPacket::new(42, 1000, 1000, 64, 32);
//! let bytes = packet.encode()?;
//! let decoded = MapPacket::decode(&bytes)?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod error;
pub mod packets;
pub mod registry;
pub mod stream;

pub use error::{ProtocolError, ProtocolResult};
pub use packets::{
    map::{MapObject, MapPacket, ObjectCategory, Place, River},
    pickup::PickupPacket,
    read_packet_type, Packet, PacketType,
};
pub use stream::{
    snap_position, snap_rotation, BitReader, BitWriter, RotationReading, DEFINITION_BITS,
    OBJECT_CATEGORY_BITS, POSITION_BITS, VARIATION_BITS,
};
