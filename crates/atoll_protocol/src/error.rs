//! # Protocol Error Types
//!
//! All errors that can occur while encoding or decoding packets.
//!
//! Every error is fatal for the packet that produced it: the caller drops
//! the packet whole and never applies a partial decode to game state.

use thiserror::Error;

/// Errors that can occur in the wire protocol.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProtocolError {
    /// A collection exceeds the count representable in its bit width.
    #[error("{collection} has {len} entries, wire format caps it at {max}")]
    CapacityOverflow {
        /// Which collection overflowed.
        collection: &'static str,
        /// Actual number of entries.
        len: usize,
        /// Maximum the count prefix can represent.
        max: usize,
    },

    /// Encode ran past the packet's byte budget, or decode past the buffer.
    #[error("buffer exhausted: needed {needed_bits} bits, {available_bits} available")]
    BufferExhausted {
        /// Bits the operation required.
        needed_bits: usize,
        /// Bits left in the buffer.
        available_bits: usize,
    },

    /// Leading discriminant does not name any known packet kind.
    #[error("unknown packet type: {0}")]
    UnknownPacketType(u8),

    /// Discriminant named a different packet kind than the decoder expected.
    #[error("packet type mismatch: expected {expected}, got {actual}")]
    PacketTypeMismatch {
        /// Discriminant the decoder was built for.
        expected: u8,
        /// Discriminant found on the wire.
        actual: u8,
    },

    /// Object category tag outside the closed variant set.
    #[error("unknown object category: {0}")]
    UnknownObjectCategory(u8),

    /// Definition index did not resolve in its registry.
    #[error("unknown definition: index {index} in {registry} registry")]
    UnknownDefinition {
        /// Registry that was consulted.
        registry: &'static str,
        /// Index read from the stream.
        index: usize,
    },

    /// Definition declares variation support but the object carries none.
    #[error("{definition} requires a variation, none was provided")]
    MissingVariation {
        /// Offending definition id.
        definition: &'static str,
    },

    /// Variation index outside the definition's declared range.
    #[error("{definition} has {variations} variations, got index {variation}")]
    InvalidVariation {
        /// Offending definition id.
        definition: &'static str,
        /// Variation index provided.
        variation: u8,
        /// Variations the definition declares.
        variations: u8,
    },

    /// String is not ASCII or exceeds the length prefix's range.
    #[error("invalid string: {0}")]
    InvalidString(&'static str),
}

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;
