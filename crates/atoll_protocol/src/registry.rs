//! # Definition Registry Codec
//!
//! Placed objects carry their type as a stable registry index,
//! [`DEFINITION_BITS`](crate::stream::DEFINITION_BITS) wide. Both sides
//! compile the same catalogs, so the index alone identifies the
//! definition; an index past the end of the catalog is a malformed
//! packet.

use atoll_shared::definitions::{
    BuildingDefinition, Definition, ObstacleDefinition, Registry, BUILDINGS, OBSTACLES,
};

use crate::error::{ProtocolError, ProtocolResult};
use crate::stream::{BitReader, BitWriter, DEFINITION_BITS};

fn write_definition<T: Definition>(
    stream: &mut BitWriter,
    registry: &Registry<T>,
    definition: &T,
) -> ProtocolResult<()> {
    let Some(index) = registry.index_of(definition) else {
        return Err(ProtocolError::UnknownDefinition {
            registry: registry.name(),
            index: usize::MAX,
        });
    };
    #[allow(clippy::cast_possible_truncation)]
    stream.write_bits(index as u32, DEFINITION_BITS)
}

fn read_definition<T: Definition>(
    stream: &mut BitReader<'_>,
    registry: &Registry<T>,
) -> ProtocolResult<&'static T> {
    let index = stream.read_bits(DEFINITION_BITS)? as usize;
    registry.get(index).ok_or(ProtocolError::UnknownDefinition {
        registry: registry.name(),
        index,
    })
}

/// Writes an obstacle definition reference.
pub fn write_obstacle(
    stream: &mut BitWriter,
    definition: &ObstacleDefinition,
) -> ProtocolResult<()> {
    write_definition(stream, &OBSTACLES, definition)
}

/// Resolves an obstacle definition reference.
pub fn read_obstacle(stream: &mut BitReader<'_>) -> ProtocolResult<&'static ObstacleDefinition> {
    read_definition(stream, &OBSTACLES)
}

/// Writes a building definition reference.
pub fn write_building(
    stream: &mut BitWriter,
    definition: &BuildingDefinition,
) -> ProtocolResult<()> {
    write_definition(stream, &BUILDINGS, definition)
}

/// Resolves a building definition reference.
pub fn read_building(stream: &mut BitReader<'_>) -> ProtocolResult<&'static BuildingDefinition> {
    read_definition(stream, &BUILDINGS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_obstacle_round_trip() {
        let rock = OBSTACLES.by_id("rock").unwrap();

        let mut writer = BitWriter::with_capacity(4);
        write_obstacle(&mut writer, rock).unwrap();

        let bytes = writer.into_bytes();
        let mut reader = BitReader::new(&bytes);
        let decoded = read_obstacle(&mut reader).unwrap();
        assert!(std::ptr::eq(decoded, rock));
    }

    #[test]
    fn test_building_round_trip() {
        let house = BUILDINGS.by_id("house").unwrap();

        let mut writer = BitWriter::with_capacity(4);
        write_building(&mut writer, house).unwrap();

        let bytes = writer.into_bytes();
        let mut reader = BitReader::new(&bytes);
        let decoded = read_building(&mut reader).unwrap();
        assert!(std::ptr::eq(decoded, house));
    }

    #[test]
    fn test_unknown_index_rejected() {
        // Write an index past the end of the building catalog.
        let mut writer = BitWriter::with_capacity(4);
        writer.write_bits(200, DEFINITION_BITS).unwrap();

        let bytes = writer.into_bytes();
        let mut reader = BitReader::new(&bytes);
        let err = read_building(&mut reader).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::UnknownDefinition {
                registry: "buildings",
                index: 200,
            }
        );
    }
}
