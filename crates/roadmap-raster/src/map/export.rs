//! Hand-off of encoded cells to image writers and debug drawing.
//!
//! Writing image files and drawing into a live scene happen outside this
//! crate. Collaborators implement [`ImageWriter`] or [`DebugDrawSink`] and
//! receive read-only, already encoded cells.

#![warn(missing_docs)]

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{Color, GridPoint, RoadMap, WorldPoint, encode};
use crate::error::RoadMapError;

/// Size of the marker drawn for every cell.
pub const DEBUG_POINT_SIZE: f32 = 20.0;

/// Writes a row-major bitmap to disk.
pub trait ImageWriter {
    /// Writes `pixels` (`width * height` colors, row-major) near `path`.
    ///
    /// # Returns
    /// * `Result<PathBuf, RoadMapError>` - The path actually written
    fn write_image(
        &mut self,
        path: &Path,
        width: usize,
        height: usize,
        pixels: &[Color],
    ) -> Result<PathBuf, RoadMapError>;
}

/// Receives per-cell markers for a debug view of the map.
pub trait DebugDrawSink {
    /// Removes every marker previously drawn.
    fn flush_persistent(&mut self);

    /// Draws one persistent marker.
    fn draw_point(&mut self, location: WorldPoint, size: f32, color: Color);
}

impl RoadMap {
    /// Encodes every cell, row-major.
    pub fn to_bitmap(&self) -> Vec<Color> {
        self.grid().cells().iter().map(encode).collect()
    }

    /// Encodes the map and hands it to `writer`.
    ///
    /// # Returns
    /// * `Result<PathBuf, RoadMapError>` - The path reported by the writer
    pub fn save_as_image<W: ImageWriter + ?Sized>(
        &self,
        path: &Path,
        writer: &mut W,
    ) -> Result<PathBuf, RoadMapError> {
        let bitmap = self.to_bitmap();
        let written = writer.write_image(path, self.width(), self.height(), &bitmap)?;
        info!(path = %written.display(), "Saved road map");
        Ok(written)
    }

    /// Replaces the markers in `sink` with one marker per cell.
    ///
    /// Markers sit at [`RoadMap::pixel_to_world`] of each cell. With
    /// `just_flush` set the old markers are removed and nothing is drawn.
    pub fn draw_debug_pixels<S: DebugDrawSink + ?Sized>(&self, sink: &mut S, just_flush: bool) {
        sink.flush_persistent();
        if just_flush {
            return;
        }
        for x in 0..self.width() {
            for y in 0..self.height() {
                let p = GridPoint::new(x, y);
                sink.draw_point(self.pixel_to_world(p), DEBUG_POINT_SIZE, encode(&self[p]));
            }
        }
        debug!(cells = self.width() * self.height(), "Drew road map debug pixels");
    }
}
