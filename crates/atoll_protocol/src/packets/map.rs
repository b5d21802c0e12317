//! Map snapshot packet.
//!
//! Serializes an entire generated world - geometry header, rivers, placed
//! objects, named places - into one bounded bit-packed buffer, sent once
//! at match start. Decode mirrors encode field-for-field, bit-for-bit;
//! the single exception is obstacle `scale`, which is derived from the
//! definition catalog and never transmitted.

use atoll_shared::definitions::{BuildingDefinition, ObstacleDefinition, RotationMode};
use atoll_shared::math::Vec2;

use crate::error::{ProtocolError, ProtocolResult};
use crate::packets::{Packet, PacketType};
use crate::registry;
use crate::stream::{BitReader, BitWriter, OBJECT_CATEGORY_BITS};

/// Bits of the river count prefix (<= 15 rivers).
const RIVER_COUNT_BITS: u8 = 4;

/// Bits of a river's point count prefix (<= 255 points).
const RIVER_POINT_COUNT_BITS: u8 = 8;

/// Bits of the object count prefix (<= 65535 objects).
const OBJECT_COUNT_BITS: u8 = 16;

/// Bits of the place count prefix (<= 15 places).
const PLACE_COUNT_BITS: u8 = 4;

/// Category tag of a placed map object.
///
/// Closed set: a tag outside it rejects the whole packet.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectCategory {
    /// A placed obstacle.
    Obstacle = 0,
    /// A placed building.
    Building = 1,
}

impl TryFrom<u8> for ObjectCategory {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Obstacle),
            1 => Ok(Self::Building),
            _ => Err(ProtocolError::UnknownObjectCategory(value)),
        }
    }
}

/// A river: an encoding width and an ordered polyline of world points.
///
/// `width` is the river's wire-level width parameter, not world geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct River {
    /// Width parameter, transmitted as one byte.
    pub width: u8,
    /// Polyline points in insertion order.
    pub points: Vec<Vec2>,
}

/// A placed world object: obstacle or building, nothing else.
#[derive(Clone, Debug)]
pub enum MapObject {
    /// A placed obstacle.
    Obstacle {
        /// Catalog entry; travels as a registry index.
        definition: &'static ObstacleDefinition,
        /// World position.
        position: Vec2,
        /// Rotation in the definition's rotation mode. Discrete modes
        /// store the orientation index.
        rotation: f32,
        /// Visual variation, present iff the definition declares support.
        variation: Option<u8>,
        /// Render scale. Derived from the definition's spawn scale on
        /// decode, never transmitted.
        scale: f32,
    },
    /// A placed building.
    Building {
        /// Catalog entry; travels as a registry index.
        definition: &'static BuildingDefinition,
        /// World position.
        position: Vec2,
        /// Limited-mode orientation index (0..=3), whatever the
        /// building's footprint suggests.
        rotation: f32,
    },
}

impl MapObject {
    /// The object's category tag.
    #[must_use]
    pub const fn category(&self) -> ObjectCategory {
        match self {
            Self::Obstacle { .. } => ObjectCategory::Obstacle,
            Self::Building { .. } => ObjectCategory::Building,
        }
    }

    /// The object's world position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        match self {
            Self::Obstacle { position, .. } | Self::Building { position, .. } => *position,
        }
    }
}

// `scale` is excluded: it never crosses the wire, so two objects that
// differ only in scale are wire-equal. Do NOT "fix" this by comparing
// scale - decode always overwrites it from the definition catalog.
impl PartialEq for MapObject {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::Obstacle {
                    definition: a,
                    position: pos_a,
                    rotation: rot_a,
                    variation: var_a,
                    scale: _,
                },
                Self::Obstacle {
                    definition: b,
                    position: pos_b,
                    rotation: rot_b,
                    variation: var_b,
                    scale: _,
                },
            ) => std::ptr::eq(*a, *b) && pos_a == pos_b && rot_a == rot_b && var_a == var_b,
            (
                Self::Building {
                    definition: a,
                    position: pos_a,
                    rotation: rot_a,
                },
                Self::Building {
                    definition: b,
                    position: pos_b,
                    rotation: rot_b,
                },
            ) => std::ptr::eq(*a, *b) && pos_a == pos_b && rot_a == rot_b,
            _ => false,
        }
    }
}

/// A named location marker.
#[derive(Clone, Debug, PartialEq)]
pub struct Place {
    /// ASCII display name, at most 255 bytes.
    pub name: String,
    /// World position of the marker.
    pub position: Vec2,
}

/// Server -> Client: the full generated world, sent once at match start.
///
/// Constructed fresh per snapshot, fully populated, then encoded and
/// discarded; it holds no state across encode/decode cycles.
#[derive(Clone, Debug, PartialEq)]
pub struct MapPacket {
    /// Generation seed; clients re-derive cosmetic detail from it.
    pub seed: u32,
    /// World width in units.
    pub width: u16,
    /// World height in units.
    pub height: u16,
    /// Ocean border thickness in units.
    pub ocean_size: u16,
    /// Beach ring thickness in units.
    pub beach_size: u16,
    /// Rivers in insertion order.
    pub rivers: Vec<River>,
    /// Placed objects in wire order.
    pub objects: Vec<MapObject>,
    /// Named places.
    pub places: Vec<Place>,
}

impl MapPacket {
    /// Creates an empty map snapshot with the given header geometry.
    #[must_use]
    pub const fn new(seed: u32, width: u16, height: u16, ocean_size: u16, beach_size: u16) -> Self {
        Self {
            seed,
            width,
            height,
            ocean_size,
            beach_size,
            rivers: Vec::new(),
            objects: Vec::new(),
            places: Vec::new(),
        }
    }

    fn serialize_object(stream: &mut BitWriter, object: &MapObject) -> ProtocolResult<()> {
        stream.write_bits(object.category() as u32, OBJECT_CATEGORY_BITS)?;
        stream.write_position(object.position())?;

        match object {
            MapObject::Obstacle {
                definition,
                rotation,
                variation,
                ..
            } => {
                registry::write_obstacle(stream, definition)?;
                stream.write_rotation(*rotation, definition.rotation_mode)?;

                if let Some(variations) = definition.variations {
                    let Some(variation) = *variation else {
                        return Err(ProtocolError::MissingVariation {
                            definition: definition.id,
                        });
                    };
                    if variation >= variations {
                        return Err(ProtocolError::InvalidVariation {
                            definition: definition.id,
                            variation,
                            variations,
                        });
                    }
                    stream.write_variation(variation)?;
                }
                Ok(())
            }
            MapObject::Building {
                definition,
                rotation,
                ..
            } => {
                registry::write_building(stream, definition)?;
                // Buildings always encode limited, whatever their
                // definition might suggest.
                stream.write_rotation(*rotation, RotationMode::Limited)
            }
        }
    }

    fn deserialize_object(stream: &mut BitReader<'_>) -> ProtocolResult<MapObject> {
        // Category and position form a uniform envelope: both variants
        // need them, so they are read before branching.
        #[allow(clippy::cast_possible_truncation)]
        let category = ObjectCategory::try_from(stream.read_bits(OBJECT_CATEGORY_BITS)? as u8)?;
        let position = stream.read_position()?;

        match category {
            ObjectCategory::Obstacle => {
                let definition = registry::read_obstacle(stream)?;
                let rotation = stream.read_rotation(definition.rotation_mode)?.rotation;
                let variation = if definition.variations.is_some() {
                    Some(stream.read_variation()?)
                } else {
                    None
                };
                Ok(MapObject::Obstacle {
                    definition,
                    position,
                    rotation,
                    variation,
                    scale: definition.spawn_scale,
                })
            }
            ObjectCategory::Building => {
                let definition = registry::read_building(stream)?;
                let reading = stream.read_rotation(RotationMode::Limited)?;
                Ok(MapObject::Building {
                    definition,
                    position,
                    rotation: f32::from(reading.orientation),
                })
            }
        }
    }
}

impl Packet for MapPacket {
    const PACKET_TYPE: PacketType = PacketType::Map;

    /// Sized for the worst case the wire format can express: 65535
    /// objects at up to 61 bits each, plus full rivers and places.
    const ALLOC_BYTES: usize = 1 << 19;

    fn serialize(&self, stream: &mut BitWriter) -> ProtocolResult<()> {
        stream.write_u32(self.seed)?;
        stream.write_u16(self.width)?;
        stream.write_u16(self.height)?;
        stream.write_u16(self.ocean_size)?;
        stream.write_u16(self.beach_size)?;

        stream.write_array("rivers", &self.rivers, RIVER_COUNT_BITS, |stream, river| {
            stream.write_u8(river.width)?;
            stream.write_array(
                "river points",
                &river.points,
                RIVER_POINT_COUNT_BITS,
                |stream, point| stream.write_position(*point),
            )
        })?;

        stream.write_array(
            "objects",
            &self.objects,
            OBJECT_COUNT_BITS,
            Self::serialize_object,
        )?;

        stream.write_array("places", &self.places, PLACE_COUNT_BITS, |stream, place| {
            stream.write_ascii_string(&place.name)?;
            stream.write_position(place.position)
        })
    }

    fn deserialize(stream: &mut BitReader<'_>) -> ProtocolResult<Self> {
        let seed = stream.read_u32()?;
        let width = stream.read_u16()?;
        let height = stream.read_u16()?;
        let ocean_size = stream.read_u16()?;
        let beach_size = stream.read_u16()?;

        let rivers = stream.read_array(RIVER_COUNT_BITS, |stream| {
            let width = stream.read_u8()?;
            let points = stream.read_array(RIVER_POINT_COUNT_BITS, BitReader::read_position)?;
            Ok(River { width, points })
        })?;

        let objects = stream.read_array(OBJECT_COUNT_BITS, Self::deserialize_object)?;

        let places = stream.read_array(PLACE_COUNT_BITS, |stream| {
            let name = stream.read_ascii_string()?;
            let position = stream.read_position()?;
            Ok(Place { name, position })
        })?;

        Ok(Self {
            seed,
            width,
            height,
            ocean_size,
            beach_size,
            rivers,
            objects,
            places,
        })
    }
}
