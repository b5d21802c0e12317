//! Static catalogs of placeable world objects.
//!
//! Obstacles and buildings are defined at compile time. A definition's index
//! within its registry is its stable wire identity: both sides of the
//! connection compile the same catalog, so an 8-bit index is all the map
//! codec ever transmits for a placed object's type.

/// How an object's orientation is encoded on the wire.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RotationMode {
    /// Unrestricted rotation, quantized radians.
    Full = 0,
    /// One of four cardinal orientations.
    Limited = 1,
    /// Two states: upright or flipped.
    Binary = 2,
    /// Fixed orientation, nothing transmitted.
    None = 3,
}

/// A placeable obstacle type (trees, rocks, crates, ...).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObstacleDefinition {
    /// Stable identifier, unique within the obstacle catalog.
    pub id: &'static str,
    /// Rotation encoding policy for this obstacle type.
    pub rotation_mode: RotationMode,
    /// Number of visual variations, if this type has any.
    pub variations: Option<u8>,
    /// Default scale applied when an instance is spawned.
    ///
    /// Never transmitted: decoders derive a placed obstacle's scale from
    /// this field.
    pub spawn_scale: f32,
}

/// A placeable building type.
///
/// Buildings have no variations and are always encoded with
/// [`RotationMode::Limited`], whatever their footprint suggests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BuildingDefinition {
    /// Stable identifier, unique within the building catalog.
    pub id: &'static str,
}

/// A definition with a stable string identity.
pub trait Definition: 'static {
    /// Stable identifier, unique within the owning registry.
    fn id(&self) -> &'static str;
}

impl Definition for ObstacleDefinition {
    fn id(&self) -> &'static str {
        self.id
    }
}

impl Definition for BuildingDefinition {
    fn id(&self) -> &'static str {
        self.id
    }
}

/// An ordered, compile-time catalog of definitions.
///
/// Registry order is part of the wire format: reordering entries changes
/// every index and breaks protocol compatibility.
#[derive(Debug)]
pub struct Registry<T: 'static> {
    name: &'static str,
    items: &'static [T],
}

impl<T: Definition> Registry<T> {
    /// Creates a registry over a static catalog.
    #[must_use]
    pub const fn new(name: &'static str, items: &'static [T]) -> Self {
        Self { name, items }
    }

    /// Registry name, used in diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Number of definitions in the catalog.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the catalog is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Looks up a definition by its stable index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&'static T> {
        self.items.get(index)
    }

    /// Returns the stable index of a definition.
    #[must_use]
    pub fn index_of(&self, definition: &T) -> Option<usize> {
        self.items.iter().position(|d| d.id() == definition.id())
    }

    /// Looks up a definition by identifier.
    #[must_use]
    pub fn by_id(&self, id: &str) -> Option<&'static T> {
        self.items.iter().find(|d| d.id() == id)
    }
}

/// The obstacle catalog.
pub static OBSTACLES: Registry<ObstacleDefinition> = Registry::new(
    "obstacles",
    &[
        ObstacleDefinition {
            id: "oak_tree",
            rotation_mode: RotationMode::Full,
            variations: Some(3),
            spawn_scale: 0.9,
        },
        ObstacleDefinition {
            id: "pine_tree",
            rotation_mode: RotationMode::Full,
            variations: None,
            spawn_scale: 1.0,
        },
        ObstacleDefinition {
            id: "rock",
            rotation_mode: RotationMode::Full,
            variations: Some(7),
            spawn_scale: 1.1,
        },
        ObstacleDefinition {
            id: "bush",
            rotation_mode: RotationMode::Full,
            variations: Some(2),
            spawn_scale: 0.95,
        },
        ObstacleDefinition {
            id: "barrel",
            rotation_mode: RotationMode::Full,
            variations: None,
            spawn_scale: 1.0,
        },
        ObstacleDefinition {
            id: "regular_crate",
            rotation_mode: RotationMode::Binary,
            variations: None,
            spawn_scale: 1.0,
        },
        ObstacleDefinition {
            id: "flint_crate",
            rotation_mode: RotationMode::None,
            variations: None,
            spawn_scale: 1.0,
        },
        ObstacleDefinition {
            id: "oil_tank",
            rotation_mode: RotationMode::Limited,
            variations: None,
            spawn_scale: 1.0,
        },
        ObstacleDefinition {
            id: "gold_rock",
            rotation_mode: RotationMode::Full,
            variations: None,
            spawn_scale: 1.05,
        },
    ],
);

/// The building catalog.
pub static BUILDINGS: Registry<BuildingDefinition> = Registry::new(
    "buildings",
    &[
        BuildingDefinition { id: "house" },
        BuildingDefinition { id: "warehouse" },
        BuildingDefinition { id: "port_shed" },
        BuildingDefinition { id: "refinery" },
    ],
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_registry_lookup() {
        let barrel = OBSTACLES.by_id("barrel").unwrap();
        let index = OBSTACLES.index_of(barrel).unwrap();
        assert_eq!(OBSTACLES.get(index).unwrap().id, "barrel");
    }

    #[test]
    fn test_registry_unknown() {
        assert!(OBSTACLES.by_id("kraken").is_none());
        assert!(OBSTACLES.get(OBSTACLES.len()).is_none());
    }

    #[test]
    fn test_catalog_ids_unique() {
        let obstacle_ids: HashSet<_> = (0..OBSTACLES.len())
            .map(|i| OBSTACLES.get(i).unwrap().id)
            .collect();
        assert_eq!(obstacle_ids.len(), OBSTACLES.len());

        let building_ids: HashSet<_> = (0..BUILDINGS.len())
            .map(|i| BUILDINGS.get(i).unwrap().id)
            .collect();
        assert_eq!(building_ids.len(), BUILDINGS.len());
    }

    #[test]
    fn test_catalog_sanity() {
        for i in 0..OBSTACLES.len() {
            let def = OBSTACLES.get(i).unwrap();
            assert!(def.spawn_scale > 0.0, "{} has no spawn scale", def.id);
            if let Some(variations) = def.variations {
                assert!(variations > 0, "{} declares zero variations", def.id);
            }
        }
    }

    #[test]
    fn test_variation_support_coverage() {
        // The codec needs at least one obstacle with variations and one
        // without, or the conditional-field path is untestable.
        assert!((0..OBSTACLES.len()).any(|i| OBSTACLES.get(i).unwrap().variations.is_some()));
        assert!((0..OBSTACLES.len()).any(|i| OBSTACLES.get(i).unwrap().variations.is_none()));
    }
}
