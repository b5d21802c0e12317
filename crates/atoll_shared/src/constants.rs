//! World constants shared between client and server.
//!
//! These bound the quantization ranges used by the wire protocol; changing
//! any of them changes the meaning of every encoded map.

/// Lower bound of world coordinates (units).
pub const MIN_WORLD_DIM: f32 = 0.0;

/// Upper bound of world coordinates (units).
///
/// Positions outside `[MIN_WORLD_DIM, MAX_WORLD_DIM]` are clamped before
/// quantization.
pub const MAX_WORLD_DIM: f32 = 1024.0;

/// Number of cardinal orientations in limited rotation mode.
pub const LIMITED_ORIENTATIONS: u8 = 4;
