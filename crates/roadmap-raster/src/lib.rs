//! Discretized road-surface map.
//!
//! A [`RoadMap`] is a 2D raster in which every cell records whether the
//! corresponding world location lies on a drivable road surface and, if so,
//! the expected direction of travel. Maps are populated once through a
//! [`RoadMapBuilder`] and are read-only afterwards, so a built map can be
//! shared freely between threads.

pub mod error;
pub mod map;

pub use error::RoadMapError;
pub use map::{
    CellCounts, Color, DebugDrawSink, GridPoint, ImageWriter, IntersectionResult, MapTransform,
    MeshTag, PixelGrid, RoadCell, RoadMap, RoadMapBuilder, WorldPoint, encode,
};
