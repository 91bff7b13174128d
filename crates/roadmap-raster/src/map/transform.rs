//! World space to raster space conversion.
//!
//! A world position is first moved into the map frame by `world_to_map`,
//! shifted by `map_offset` and then scaled by `pixels_per_centimeter`. The
//! z component only takes part in the rigid transform; raster coordinates
//! are the scaled x and y.

#![warn(missing_docs)]

use nalgebra::{Point3, Vector3};
use roadmap_geometry::Transform;

use super::{GridPoint, WorldPoint};
use crate::error::RoadMapError;

/// Scale, rigid transform and offset aligning a raster with world space.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MapTransform {
    /// Raster cells per world centimeter
    pixels_per_centimeter: f32,
    /// Moves world positions into the map frame
    world_to_map: Transform,
    /// Map-frame position of the raster origin
    map_offset: Vector3<f32>,
}

impl Default for MapTransform {
    /// Unit scale, identity transform, zero offset.
    fn default() -> Self {
        MapTransform {
            pixels_per_centimeter: 1.0,
            world_to_map: Transform::identity(),
            map_offset: Vector3::zeros(),
        }
    }
}

impl MapTransform {
    /// Creates a new transform.
    ///
    /// # Arguments
    /// * `pixels_per_centimeter` - Raster resolution, must be positive and finite
    /// * `world_to_map` - Rigid transform from world space into the map frame
    /// * `map_offset` - Map-frame position of raster cell (0, 0)
    ///
    /// # Returns
    /// * `Result<Self, RoadMapError>` - The transform or an error if parameters are invalid
    pub fn new(
        pixels_per_centimeter: f32,
        world_to_map: Transform,
        map_offset: Vector3<f32>,
    ) -> Result<Self, RoadMapError> {
        if !(pixels_per_centimeter > 0.0 && pixels_per_centimeter.is_finite()) {
            return Err(RoadMapError::InvalidResolution(
                "Pixels per centimeter must be positive and finite",
            ));
        }
        if !map_offset.iter().all(|c| c.is_finite()) {
            return Err(RoadMapError::InvalidTransform(
                "Map offset components must be finite",
            ));
        }
        Ok(MapTransform {
            pixels_per_centimeter,
            world_to_map,
            map_offset,
        })
    }

    /// Raster cells per world centimeter.
    pub fn pixels_per_centimeter(&self) -> f32 {
        self.pixels_per_centimeter
    }

    /// Rigid transform from world space into the map frame.
    pub fn world_to_map(&self) -> &Transform {
        &self.world_to_map
    }

    /// Map-frame position of raster cell (0, 0).
    pub fn map_offset(&self) -> &Vector3<f32> {
        &self.map_offset
    }

    /// Converts a world position into continuous, unclamped raster coordinates.
    pub fn world_to_raster(&self, world_p: &WorldPoint) -> (f32, f32) {
        let location = self.world_to_map.transform_position(world_p) - self.map_offset;
        (
            self.pixels_per_centimeter * location.x,
            self.pixels_per_centimeter * location.y,
        )
    }

    /// Converts a world position into the raster cell that contains it.
    ///
    /// Positions outside the raster resolve to the nearest border cell.
    ///
    /// # Arguments
    /// * `world_p` - Point in world frame (centimeters)
    /// * `width` - Raster width in cells
    /// * `height` - Raster height in cells
    pub fn world_to_pixel(&self, world_p: &WorldPoint, width: usize, height: usize) -> GridPoint {
        let (x, y) = self.world_to_raster(world_p);
        GridPoint::new(
            clamp_float_to_index(x, width.saturating_sub(1)),
            clamp_float_to_index(y, height.saturating_sub(1)),
        )
    }

    /// Converts a raster cell back into world space.
    ///
    /// Returns the world position of the cell's corner, the inverse of the
    /// scale and offset steps of [`MapTransform::world_to_pixel`].
    pub fn pixel_to_world(&self, p: GridPoint) -> WorldPoint {
        let relative = Point3::new(
            p.x as f32 / self.pixels_per_centimeter,
            p.y as f32 / self.pixels_per_centimeter,
            0.0,
        );
        self.world_to_map
            .inverse_transform_position(&(relative + self.map_offset))
    }
}

/// Floors `value` and clamps it into `[0, max]`. NaN maps to 0.
fn clamp_float_to_index(value: f32, max: usize) -> usize {
    let floored = value.floor();
    if floored.is_nan() || floored <= 0.0 {
        0
    } else if floored >= max as f32 {
        max
    } else {
        floored as usize
    }
}
