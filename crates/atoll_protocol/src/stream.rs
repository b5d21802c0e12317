//! # Bit Stream Primitive
//!
//! Bit-level writer/reader with domain quantization.
//!
//! ## Techniques
//!
//! 1. **Bit Packing**: values occupy exactly the bits they need, LSB-first
//! 2. **Quantization**: positions and rotations map into fixed bit widths
//! 3. **Counted Collections**: length prefixes sized per worst-case count
//!
//! The writer owns a buffer pre-sized from the packet's byte budget; the
//! reader borrows the received bytes. Both share one cursor discipline:
//! every operation advances the cursor or fails without partial effect on
//! the decoded value.

use std::f32::consts::PI;

use atoll_shared::constants::{LIMITED_ORIENTATIONS, MAX_WORLD_DIM, MIN_WORLD_DIM};
use atoll_shared::math::Vec2;
use atoll_shared::definitions::RotationMode;

use crate::error::{ProtocolError, ProtocolResult};

/// Bits per axis of a quantized world position.
pub const POSITION_BITS: u8 = 16;

/// Bits of a full-mode quantized rotation.
pub const ROTATION_BITS: u8 = 16;

/// Bits of a visual variation index.
pub const VARIATION_BITS: u8 = 3;

/// Bits of a map-object category tag.
pub const OBJECT_CATEGORY_BITS: u8 = 2;

/// Bits of a definition-registry index.
pub const DEFINITION_BITS: u8 = 8;

/// Maps a float into `bits` of precision over `[min, max]`.
fn quantize(value: f32, min: f32, max: f32, bits: u8) -> u32 {
    let range = max - min;
    if range <= 0.0 {
        return 0;
    }
    let normalized = ((value - min) / range).clamp(0.0, 1.0);
    let max_int = if bits >= 32 { u32::MAX } else { (1u32 << bits) - 1 };
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let quantized = (normalized * max_int as f32).round() as u32;
    quantized
}

/// Inverse of [`quantize`].
fn dequantize(quantized: u32, min: f32, max: f32, bits: u8) -> f32 {
    let max_int = if bits >= 32 { u32::MAX } else { (1u32 << bits) - 1 };
    #[allow(clippy::cast_precision_loss)]
    let normalized = quantized as f32 / max_int as f32;
    min + normalized * (max - min)
}

/// Snaps a world position onto the wire quantization lattice.
///
/// Encoding is lossy; a position that has been snapped survives an
/// encode/decode round trip exactly. Map generation snaps object and
/// river coordinates before they are ever compared or transmitted.
#[must_use]
pub fn snap_position(position: Vec2) -> Vec2 {
    Vec2::new(
        dequantize(
            quantize(position.x, MIN_WORLD_DIM, MAX_WORLD_DIM, POSITION_BITS),
            MIN_WORLD_DIM,
            MAX_WORLD_DIM,
            POSITION_BITS,
        ),
        dequantize(
            quantize(position.y, MIN_WORLD_DIM, MAX_WORLD_DIM, POSITION_BITS),
            MIN_WORLD_DIM,
            MAX_WORLD_DIM,
            POSITION_BITS,
        ),
    )
}

/// Snaps a full-mode rotation onto the wire quantization lattice.
#[must_use]
pub fn snap_rotation(rotation: f32) -> f32 {
    dequantize(quantize(rotation, -PI, PI, ROTATION_BITS), -PI, PI, ROTATION_BITS)
}

/// A decoded rotation field.
///
/// `rotation` is the value the map codec stores; `orientation` is the raw
/// index for the discrete modes (limited/binary), 0 otherwise.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RotationReading {
    /// Discretized rotation value.
    pub rotation: f32,
    /// Underlying orientation index for discrete modes.
    pub orientation: u8,
}

/// Bit-level writer over a pre-sized buffer.
///
/// The buffer is allocated once from the packet's byte budget; writing
/// past it is a fatal [`ProtocolError::BufferExhausted`], never a resize.
pub struct BitWriter {
    buffer: Vec<u8>,
    bit_position: usize,
}

impl BitWriter {
    /// Creates a writer with a budget of `bytes`.
    #[must_use]
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            buffer: vec![0u8; bytes],
            bit_position: 0,
        }
    }

    /// Bits still available under the budget.
    #[must_use]
    pub fn remaining_bits(&self) -> usize {
        self.buffer.len() * 8 - self.bit_position
    }

    /// Number of whole bytes written (rounded up).
    #[must_use]
    pub const fn byte_len(&self) -> usize {
        self.bit_position.div_ceil(8)
    }

    /// Returns the written bytes.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer[..self.byte_len()]
    }

    /// Consumes the writer, returning the written bytes.
    #[must_use]
    pub fn into_bytes(mut self) -> Vec<u8> {
        self.buffer.truncate(self.byte_len());
        self.buffer
    }

    /// Writes the low `bits` bits of `value`, LSB-first.
    pub fn write_bits(&mut self, value: u32, bits: u8) -> ProtocolResult<()> {
        debug_assert!(bits >= 1 && bits <= 32);

        let needed = bits as usize;
        let available = self.remaining_bits();
        if needed > available {
            return Err(ProtocolError::BufferExhausted {
                needed_bits: needed,
                available_bits: available,
            });
        }

        let mask = if bits == 32 { u32::MAX } else { (1u32 << bits) - 1 };
        let value = value & mask;

        for i in 0..needed {
            let bit = (value >> i) & 1;
            let byte_idx = self.bit_position / 8;
            let bit_idx = self.bit_position % 8;

            if bit == 1 {
                self.buffer[byte_idx] |= 1 << bit_idx;
            }

            self.bit_position += 1;
        }

        Ok(())
    }

    /// Writes a boolean (1 bit).
    #[inline]
    pub fn write_bool(&mut self, value: bool) -> ProtocolResult<()> {
        self.write_bits(u32::from(value), 1)
    }

    /// Writes an unsigned 8-bit integer.
    #[inline]
    pub fn write_u8(&mut self, value: u8) -> ProtocolResult<()> {
        self.write_bits(u32::from(value), 8)
    }

    /// Writes an unsigned 16-bit integer.
    #[inline]
    pub fn write_u16(&mut self, value: u16) -> ProtocolResult<()> {
        self.write_bits(u32::from(value), 16)
    }

    /// Writes an unsigned 32-bit integer.
    #[inline]
    pub fn write_u32(&mut self, value: u32) -> ProtocolResult<()> {
        self.write_bits(value, 32)
    }

    /// Writes a quantized float.
    pub fn write_quantized_float(
        &mut self,
        value: f32,
        min: f32,
        max: f32,
        bits: u8,
    ) -> ProtocolResult<()> {
        self.write_bits(quantize(value, min, max, bits), bits)
    }

    /// Writes a quantized world position, [`POSITION_BITS`] per axis.
    pub fn write_position(&mut self, position: Vec2) -> ProtocolResult<()> {
        self.write_quantized_float(position.x, MIN_WORLD_DIM, MAX_WORLD_DIM, POSITION_BITS)?;
        self.write_quantized_float(position.y, MIN_WORLD_DIM, MAX_WORLD_DIM, POSITION_BITS)
    }

    /// Writes a rotation in the bit width its mode demands.
    ///
    /// Discrete modes (limited/binary) interpret `rotation` as an
    /// orientation index, matching what [`BitReader::read_rotation`]
    /// hands back for them.
    pub fn write_rotation(&mut self, rotation: f32, mode: RotationMode) -> ProtocolResult<()> {
        match mode {
            RotationMode::Full => {
                self.write_quantized_float(rotation, -PI, PI, ROTATION_BITS)
            }
            RotationMode::Limited => {
                #[allow(clippy::cast_possible_truncation)]
                let orientation =
                    (rotation.round() as i64).rem_euclid(i64::from(LIMITED_ORIENTATIONS)) as u32;
                self.write_bits(orientation, 2)
            }
            RotationMode::Binary => self.write_bool(rotation != 0.0),
            RotationMode::None => Ok(()),
        }
    }

    /// Writes a visual variation index ([`VARIATION_BITS`] wide).
    #[inline]
    pub fn write_variation(&mut self, variation: u8) -> ProtocolResult<()> {
        self.write_bits(u32::from(variation), VARIATION_BITS)
    }

    /// Writes a length-prefixed ASCII string (8-bit length, 8-bit chars).
    pub fn write_ascii_string(&mut self, value: &str) -> ProtocolResult<()> {
        if !value.is_ascii() {
            return Err(ProtocolError::InvalidString("not ASCII"));
        }
        let Ok(len) = u8::try_from(value.len()) else {
            return Err(ProtocolError::InvalidString("longer than 255 bytes"));
        };
        self.write_u8(len)?;
        for byte in value.bytes() {
            self.write_u8(byte)?;
        }
        Ok(())
    }

    /// Writes a counted collection: the count in exactly `count_bits`
    /// bits, then each item in order.
    ///
    /// A collection larger than the count prefix can represent is a hard
    /// [`ProtocolError::CapacityOverflow`], never a silent wrap.
    pub fn write_array<T>(
        &mut self,
        collection: &'static str,
        items: &[T],
        count_bits: u8,
        mut write_item: impl FnMut(&mut Self, &T) -> ProtocolResult<()>,
    ) -> ProtocolResult<()> {
        debug_assert!(count_bits >= 1 && count_bits <= 16);

        let max = (1usize << count_bits) - 1;
        if items.len() > max {
            return Err(ProtocolError::CapacityOverflow {
                collection,
                len: items.len(),
                max,
            });
        }

        #[allow(clippy::cast_possible_truncation)]
        self.write_bits(items.len() as u32, count_bits)?;
        for item in items {
            write_item(self, item)?;
        }
        Ok(())
    }
}

/// Bit-level reader over received bytes.
pub struct BitReader<'a> {
    buffer: &'a [u8],
    bit_position: usize,
}

impl<'a> BitReader<'a> {
    /// Creates a reader over a received buffer.
    #[must_use]
    pub const fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            bit_position: 0,
        }
    }

    /// Bits left in the buffer.
    #[must_use]
    pub const fn remaining_bits(&self) -> usize {
        self.buffer.len() * 8 - self.bit_position
    }

    /// Reads `bits` bits, LSB-first.
    pub fn read_bits(&mut self, bits: u8) -> ProtocolResult<u32> {
        debug_assert!(bits >= 1 && bits <= 32);

        let needed = bits as usize;
        let available = self.remaining_bits();
        if needed > available {
            return Err(ProtocolError::BufferExhausted {
                needed_bits: needed,
                available_bits: available,
            });
        }

        let mut value = 0u32;
        for i in 0..needed {
            let byte_idx = self.bit_position / 8;
            let bit_idx = self.bit_position % 8;
            let bit = u32::from((self.buffer[byte_idx] >> bit_idx) & 1);
            value |= bit << i;
            self.bit_position += 1;
        }

        Ok(value)
    }

    /// Reads a boolean (1 bit).
    #[inline]
    pub fn read_bool(&mut self) -> ProtocolResult<bool> {
        Ok(self.read_bits(1)? != 0)
    }

    /// Reads an unsigned 8-bit integer.
    #[inline]
    pub fn read_u8(&mut self) -> ProtocolResult<u8> {
        #[allow(clippy::cast_possible_truncation)]
        Ok(self.read_bits(8)? as u8)
    }

    /// Reads an unsigned 16-bit integer.
    #[inline]
    pub fn read_u16(&mut self) -> ProtocolResult<u16> {
        #[allow(clippy::cast_possible_truncation)]
        Ok(self.read_bits(16)? as u16)
    }

    /// Reads an unsigned 32-bit integer.
    #[inline]
    pub fn read_u32(&mut self) -> ProtocolResult<u32> {
        self.read_bits(32)
    }

    /// Reads a quantized float.
    pub fn read_quantized_float(&mut self, min: f32, max: f32, bits: u8) -> ProtocolResult<f32> {
        Ok(dequantize(self.read_bits(bits)?, min, max, bits))
    }

    /// Reads a quantized world position.
    pub fn read_position(&mut self) -> ProtocolResult<Vec2> {
        let x = self.read_quantized_float(MIN_WORLD_DIM, MAX_WORLD_DIM, POSITION_BITS)?;
        let y = self.read_quantized_float(MIN_WORLD_DIM, MAX_WORLD_DIM, POSITION_BITS)?;
        Ok(Vec2::new(x, y))
    }

    /// Reads a rotation in the bit width its mode demands.
    pub fn read_rotation(&mut self, mode: RotationMode) -> ProtocolResult<RotationReading> {
        match mode {
            RotationMode::Full => Ok(RotationReading {
                rotation: self.read_quantized_float(-PI, PI, ROTATION_BITS)?,
                orientation: 0,
            }),
            RotationMode::Limited => {
                #[allow(clippy::cast_possible_truncation)]
                let orientation = self.read_bits(2)? as u8;
                Ok(RotationReading {
                    rotation: f32::from(orientation),
                    orientation,
                })
            }
            RotationMode::Binary => {
                let orientation = u8::from(self.read_bool()?);
                Ok(RotationReading {
                    rotation: f32::from(orientation),
                    orientation,
                })
            }
            RotationMode::None => Ok(RotationReading {
                rotation: 0.0,
                orientation: 0,
            }),
        }
    }

    /// Reads a visual variation index.
    #[inline]
    pub fn read_variation(&mut self) -> ProtocolResult<u8> {
        #[allow(clippy::cast_possible_truncation)]
        Ok(self.read_bits(VARIATION_BITS)? as u8)
    }

    /// Reads a length-prefixed ASCII string.
    pub fn read_ascii_string(&mut self) -> ProtocolResult<String> {
        let len = self.read_u8()? as usize;
        let mut bytes = Vec::with_capacity(len);
        for _ in 0..len {
            let byte = self.read_u8()?;
            if !byte.is_ascii() {
                return Err(ProtocolError::InvalidString("not ASCII"));
            }
            bytes.push(byte);
        }
        // Bytes are verified ASCII above.
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Reads a counted collection written by [`BitWriter::write_array`]:
    /// the count in `count_bits` bits, then exactly that many items,
    /// decoded eagerly in wire order.
    pub fn read_array<T>(
        &mut self,
        count_bits: u8,
        mut read_item: impl FnMut(&mut Self) -> ProtocolResult<T>,
    ) -> ProtocolResult<Vec<T>> {
        debug_assert!(count_bits >= 1 && count_bits <= 16);

        let count = self.read_bits(count_bits)? as usize;
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(read_item(self)?);
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_round_trip_across_byte_boundaries() {
        let mut writer = BitWriter::with_capacity(8);
        writer.write_bits(0b101, 3).unwrap();
        writer.write_bits(0b1111, 4).unwrap();
        writer.write_bool(true).unwrap();
        writer.write_bits(0xBEEF, 16).unwrap();

        assert_eq!(writer.byte_len(), 3);

        let bytes = writer.into_bytes();
        let mut reader = BitReader::new(&bytes);
        assert_eq!(reader.read_bits(3).unwrap(), 0b101);
        assert_eq!(reader.read_bits(4).unwrap(), 0b1111);
        assert!(reader.read_bool().unwrap());
        assert_eq!(reader.read_bits(16).unwrap(), 0xBEEF);
    }

    #[test]
    fn test_fixed_width_integers() {
        let mut writer = BitWriter::with_capacity(16);
        writer.write_u8(0xAB).unwrap();
        writer.write_u16(0xCDEF).unwrap();
        writer.write_u32(0xDEAD_BEEF).unwrap();

        let bytes = writer.into_bytes();
        let mut reader = BitReader::new(&bytes);
        assert_eq!(reader.read_u8().unwrap(), 0xAB);
        assert_eq!(reader.read_u16().unwrap(), 0xCDEF);
        assert_eq!(reader.read_u32().unwrap(), 0xDEAD_BEEF);
    }

    #[test]
    fn test_writer_budget_exhaustion() {
        let mut writer = BitWriter::with_capacity(1);
        writer.write_bits(0b1010, 4).unwrap();
        writer.write_bits(0b1010, 4).unwrap();

        let err = writer.write_bool(true).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::BufferExhausted {
                needed_bits: 1,
                available_bits: 0,
            }
        );
    }

    #[test]
    fn test_reader_exhaustion() {
        let bytes = [0xFF];
        let mut reader = BitReader::new(&bytes);
        reader.read_bits(6).unwrap();

        let err = reader.read_bits(4).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::BufferExhausted {
                needed_bits: 4,
                available_bits: 2,
            }
        );
    }

    #[test]
    fn test_position_snap_round_trip() {
        let raw = Vec2::new(123.456, 987.654);
        let snapped = snap_position(raw);

        let mut writer = BitWriter::with_capacity(8);
        writer.write_position(snapped).unwrap();

        let bytes = writer.into_bytes();
        let mut reader = BitReader::new(&bytes);
        assert_eq!(reader.read_position().unwrap(), snapped);
    }

    #[test]
    fn test_position_clamped_to_world() {
        let mut writer = BitWriter::with_capacity(8);
        writer.write_position(Vec2::new(-50.0, 5000.0)).unwrap();

        let bytes = writer.into_bytes();
        let mut reader = BitReader::new(&bytes);
        let decoded = reader.read_position().unwrap();
        assert_eq!(decoded, Vec2::new(MIN_WORLD_DIM, MAX_WORLD_DIM));
    }

    #[test]
    fn test_rotation_full_mode() {
        let rotation = snap_rotation(1.25);

        let mut writer = BitWriter::with_capacity(4);
        writer.write_rotation(rotation, RotationMode::Full).unwrap();

        let bytes = writer.into_bytes();
        let mut reader = BitReader::new(&bytes);
        let reading = reader.read_rotation(RotationMode::Full).unwrap();
        assert_eq!(reading.rotation, rotation);
        assert_eq!(reading.orientation, 0);
    }

    #[test]
    fn test_rotation_discrete_modes() {
        let mut writer = BitWriter::with_capacity(4);
        writer.write_rotation(3.0, RotationMode::Limited).unwrap();
        writer.write_rotation(1.0, RotationMode::Binary).unwrap();
        writer.write_rotation(99.0, RotationMode::None).unwrap();

        // Limited (2) + binary (1) bits; none writes nothing.
        assert_eq!(writer.byte_len(), 1);

        let bytes = writer.into_bytes();
        let mut reader = BitReader::new(&bytes);

        let limited = reader.read_rotation(RotationMode::Limited).unwrap();
        assert_eq!(limited.orientation, 3);
        assert_eq!(limited.rotation, 3.0);

        let binary = reader.read_rotation(RotationMode::Binary).unwrap();
        assert_eq!(binary.orientation, 1);
        assert_eq!(binary.rotation, 1.0);

        let none = reader.read_rotation(RotationMode::None).unwrap();
        assert_eq!(none.rotation, 0.0);
        assert_eq!(reader.remaining_bits(), 5);
    }

    #[test]
    fn test_variation_width() {
        let mut writer = BitWriter::with_capacity(1);
        writer.write_variation(5).unwrap();

        let bytes = writer.into_bytes();
        let mut reader = BitReader::new(&bytes);
        assert_eq!(reader.read_variation().unwrap(), 5);
        assert_eq!(reader.remaining_bits(), 5);
    }

    #[test]
    fn test_ascii_string_round_trip() {
        let mut writer = BitWriter::with_capacity(32);
        writer.write_ascii_string("Lighthouse").unwrap();
        writer.write_ascii_string("").unwrap();

        let bytes = writer.into_bytes();
        let mut reader = BitReader::new(&bytes);
        assert_eq!(reader.read_ascii_string().unwrap(), "Lighthouse");
        assert_eq!(reader.read_ascii_string().unwrap(), "");
    }

    #[test]
    fn test_non_ascii_string_rejected() {
        let mut writer = BitWriter::with_capacity(32);
        let err = writer.write_ascii_string("maré").unwrap_err();
        assert_eq!(err, ProtocolError::InvalidString("not ASCII"));
    }

    #[test]
    fn test_over_long_string_rejected() {
        let mut writer = BitWriter::with_capacity(512);
        let long = "x".repeat(256);
        let err = writer.write_ascii_string(&long).unwrap_err();
        assert_eq!(err, ProtocolError::InvalidString("longer than 255 bytes"));
    }

    #[test]
    fn test_counted_array_round_trip() {
        let values: Vec<u8> = vec![3, 1, 4, 1, 5];

        let mut writer = BitWriter::with_capacity(16);
        writer
            .write_array("values", &values, 4, |w, v| w.write_u8(*v))
            .unwrap();

        let bytes = writer.into_bytes();
        let mut reader = BitReader::new(&bytes);
        let decoded = reader.read_array(4, BitReader::read_u8).unwrap();
        assert_eq!(decoded, values);
    }

    #[test]
    fn test_counted_array_overflow_is_hard_error() {
        let values: Vec<u8> = vec![0; 16];

        let mut writer = BitWriter::with_capacity(64);
        let err = writer
            .write_array("values", &values, 4, |w, v| w.write_u8(*v))
            .unwrap_err();
        assert_eq!(
            err,
            ProtocolError::CapacityOverflow {
                collection: "values",
                len: 16,
                max: 15,
            }
        );
    }

    #[test]
    fn test_empty_array() {
        let mut writer = BitWriter::with_capacity(4);
        writer
            .write_array("values", &[] as &[u8], 4, |w, v| w.write_u8(*v))
            .unwrap();

        let bytes = writer.into_bytes();
        let mut reader = BitReader::new(&bytes);
        let decoded = reader.read_array(4, BitReader::read_u8).unwrap();
        assert!(decoded.is_empty());
    }
}
