//! This module defines the error types used by the `roadmap-raster` crate.

#![warn(missing_docs)]

use thiserror::Error;

/// Error type for road map construction and access.
///
/// This enum encapsulates all possible errors that can occur while building
/// a road map, such as invalid raster parameters or a build pass that does
/// not match the configured dimensions.
#[derive(Debug, Error)]
pub enum RoadMapError {
    /// Error for invalid raster resolution.
    /// This variant is returned when the pixels-per-centimeter scale is not positive and finite.
    #[error("Invalid map resolution: {0}")]
    InvalidResolution(&'static str),
    /// Error for invalid raster dimensions.
    /// This variant is returned when width or height is zero or their product overflows.
    #[error("Invalid map dimensions: {0}")]
    InvalidDimensions(&'static str),
    /// Error for an invalid world-to-map alignment.
    /// This variant is returned when the map offset has non-finite components.
    #[error("Invalid map transform: {0}")]
    InvalidTransform(&'static str),
    /// Error for out-of-bounds access.
    /// This variant is returned when reading a cell outside the raster.
    #[error("Map access out of bounds: ({x}, {y}) is outside {width}x{height}")]
    OutOfBounds {
        /// Requested column.
        x: usize,
        /// Requested row.
        y: usize,
        /// Raster width in cells.
        width: usize,
        /// Raster height in cells.
        height: usize,
    },
    /// Error for appending cells before the raster was configured.
    #[error("Road map builder must be configured before appending cells")]
    NotConfigured,
    /// Error for appending more cells than the configured raster holds.
    #[error("Road map already holds all {capacity} cells")]
    TooManyCells {
        /// Number of cells the configured raster holds.
        capacity: usize,
    },
    /// Error for finishing a build pass with the wrong number of cells.
    #[error("Incomplete road map: expected {expected} cells, got {actual}")]
    IncompleteBuild {
        /// `width * height` of the configured raster.
        expected: usize,
        /// Number of cells appended.
        actual: usize,
    },
    /// Error reported by an external image writer.
    #[error("Failed to write road map image: {0}")]
    ImageWrite(#[source] Box<dyn std::error::Error + Send + Sync>),
}
