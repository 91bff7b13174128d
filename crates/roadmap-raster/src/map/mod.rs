//! Road map raster and its queries.
//!
//! This module provides the pixel grid, the world/raster coordinate
//! transform, the build pass that classifies cells from geometry tags, the
//! oriented-box intersection query and the visual encoding handed to image
//! and debug-draw collaborators.

pub mod builder;
pub mod cell;
pub mod encode;
pub mod export;
pub mod grid;
pub mod intersect;
pub mod point_types;
pub mod road_map;
pub mod transform;

pub use builder::{MeshTag, RoadMapBuilder};
pub use cell::RoadCell;
pub use encode::{Color, encode};
pub use export::{DEBUG_POINT_SIZE, DebugDrawSink, ImageWriter};
pub use grid::PixelGrid;
pub use intersect::IntersectionResult;
pub use point_types::{GridPoint, WorldPoint};
pub use road_map::{CellCounts, RoadMap};
pub use transform::MapTransform;
