//! # ATOLL Shared - Common Client/Server Types
//!
//! Canonical definitions both sides of the wire must agree on:
//!
//! - **Math**: 2D vector type used for every world position
//! - **Definitions**: static catalogs of placeable obstacles and buildings
//! - **Constants**: world dimensions and quantization ranges
//!
//! ## Architecture Rules
//!
//! 1. **No wire logic** - bit streams and packets live in `atoll_protocol`
//! 2. **Static data** - definition catalogs are compiled in, never loaded
//! 3. **Stable indices** - a definition's registry index is its wire identity

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod constants;
pub mod definitions;
pub mod math;

pub use constants::{MAX_WORLD_DIM, MIN_WORLD_DIM};
pub use definitions::{
    BuildingDefinition, ObstacleDefinition, Registry, RotationMode, BUILDINGS, OBSTACLES,
};
pub use math::Vec2;
