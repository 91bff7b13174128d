//! File and log collaborators for exporting a road map.

use std::fs;
use std::path::{Path, PathBuf};

use roadmap_raster::{Color, DebugDrawSink, ImageWriter, RoadMapError, WorldPoint};
use tracing::{debug, trace};

/// Writes bitmaps as RGBA PNG files, creating parent directories as needed.
#[derive(Debug, Default, Clone, Copy)]
pub struct PngWriter;

impl ImageWriter for PngWriter {
    fn write_image(
        &mut self,
        path: &Path,
        width: usize,
        height: usize,
        pixels: &[Color],
    ) -> Result<PathBuf, RoadMapError> {
        let width = u32::try_from(width).map_err(|e| RoadMapError::ImageWrite(Box::new(e)))?;
        let height = u32::try_from(height).map_err(|e| RoadMapError::ImageWrite(Box::new(e)))?;
        let raw: Vec<u8> = pixels.iter().flat_map(|c| c.to_rgba()).collect();
        let image = image::RgbaImage::from_raw(width, height, raw).ok_or_else(|| {
            RoadMapError::ImageWrite("Bitmap length does not match its dimensions".into())
        })?;

        let path = path.with_extension("png");
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| RoadMapError::ImageWrite(Box::new(e)))?;
        }
        image
            .save(&path)
            .map_err(|e| RoadMapError::ImageWrite(Box::new(e)))?;
        Ok(path)
    }
}

/// Debug view that reports markers through `tracing` instead of a scene.
#[derive(Debug, Default)]
pub struct TracingDrawSink {
    drawn: usize,
}

impl TracingDrawSink {
    /// Markers drawn since the last flush.
    pub fn drawn(&self) -> usize {
        self.drawn
    }
}

impl DebugDrawSink for TracingDrawSink {
    fn flush_persistent(&mut self) {
        debug!(markers = self.drawn, "Flushing debug markers");
        self.drawn = 0;
    }

    fn draw_point(&mut self, location: WorldPoint, size: f32, color: Color) {
        trace!(
            x = location.x,
            y = location.y,
            z = location.z,
            size,
            r = color.r,
            g = color.g,
            b = color.b,
            "Debug marker"
        );
        self.drawn += 1;
    }
}
