//! Single-pass construction of a [`RoadMap`].
//!
//! The geometry source configures the raster once and then appends exactly
//! `width * height` cells in row-major order. Each on-road cell is classified
//! from the tag of the road mesh covering it and that mesh's orientation.

#![warn(missing_docs)]

use nalgebra::{Unit, Vector3};
use roadmap_geometry::{Transform, rotate_yaw};
use tracing::{debug, info};

use super::cell::unit_direction;
use super::{MapTransform, PixelGrid, RoadCell, RoadMap};
use crate::error::RoadMapError;

/// Tag of the road mesh piece that covers a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MeshTag {
    /// Right lane of a straight two-lane road.
    StraightLaneRight,
    /// Left lane of a straight two-lane road, mirrored.
    StraightLaneLeft,
    /// Entry lane of a 90° turn.
    TurnLane0,
    /// Mirrored entry lane of a 90° turn.
    TurnLane1,
    /// Second lane of a 90° turn.
    TurnLane2,
    /// Third lane of a 90° turn.
    TurnLane3,
    /// Any other drivable surface, such as sidewalks or intersections.
    Other,
}

impl MeshTag {
    /// Every tag, in declaration order.
    pub const ALL: [MeshTag; 7] = [
        MeshTag::StraightLaneRight,
        MeshTag::StraightLaneLeft,
        MeshTag::TurnLane0,
        MeshTag::TurnLane1,
        MeshTag::TurnLane2,
        MeshTag::TurnLane3,
        MeshTag::Other,
    ];

    /// Yaw in degrees added to the mesh orientation to get the lane direction.
    ///
    /// `None` means the surface has no canonical travel direction.
    pub const fn lane_yaw_offset(self) -> Option<f32> {
        match self {
            MeshTag::StraightLaneRight | MeshTag::TurnLane0 => Some(0.0),
            MeshTag::StraightLaneLeft | MeshTag::TurnLane1 => Some(180.0),
            MeshTag::TurnLane2 => Some(90.0),
            MeshTag::TurnLane3 => Some(270.0),
            MeshTag::Other => None,
        }
    }

    /// Lane direction for a mesh with this tag and orientation.
    ///
    /// # Arguments
    /// * `local_transform` - Transform of the mesh piece covering the cell
    /// * `invert_direction` - Negate the direction after the tag rotation
    pub fn lane_direction(
        self,
        local_transform: &Transform,
        invert_direction: bool,
    ) -> Option<Unit<Vector3<f32>>> {
        self.raw_direction(local_transform, invert_direction)
            .and_then(unit_direction)
    }

    fn raw_direction(
        self,
        local_transform: &Transform,
        invert_direction: bool,
    ) -> Option<Vector3<f32>> {
        let offset = self.lane_yaw_offset()?;
        let direction = rotate_yaw(&local_transform.forward_vector(), offset);
        Some(if invert_direction { -direction } else { direction })
    }

    /// Classifies an on-road cell covered by a mesh with this tag.
    ///
    /// Tags without a lane rule, and meshes whose orientation yields no
    /// usable direction, produce an undirected cell.
    pub fn classify(self, local_transform: &Transform, invert_direction: bool) -> RoadCell {
        self.raw_direction(local_transform, invert_direction)
            .and_then(RoadCell::lane)
            .unwrap_or(RoadCell::Undirected)
    }
}

/// Builds a [`RoadMap`] in a single sequential pass.
///
/// ```
/// use nalgebra::Vector3;
/// use roadmap_geometry::{Rotator, Transform};
/// use roadmap_raster::{MeshTag, RoadMapBuilder};
///
/// let mut builder = RoadMapBuilder::new();
/// builder.configure(2, 1, 1.0, Transform::identity(), Vector3::zeros()).unwrap();
/// builder.append_empty_cell().unwrap();
/// builder
///     .append_cell(MeshTag::StraightLaneRight, &Transform::from_rotator(Vector3::zeros(), Rotator::ZERO), false)
///     .unwrap();
/// let map = builder.build().unwrap();
/// assert_eq!(map.width(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct RoadMapBuilder {
    /// Cells appended so far, with the configured extents
    grid: PixelGrid,
    /// Alignment of the raster with world space
    transform: MapTransform,
    /// Whether `configure` has been called
    configured: bool,
}

impl Default for RoadMapBuilder {
    fn default() -> Self {
        RoadMapBuilder::new()
    }
}

impl RoadMapBuilder {
    /// Creates an unconfigured builder.
    pub fn new() -> Self {
        RoadMapBuilder {
            grid: PixelGrid::with_dimensions(1, 1),
            transform: MapTransform::default(),
            configured: false,
        }
    }

    /// Sets the raster extents and its alignment with world space.
    ///
    /// Replaces all dimension and transform state at once. Cells already
    /// appended are kept.
    ///
    /// # Arguments
    /// * `width` - Width of the raster in cells
    /// * `height` - Height of the raster in cells
    /// * `pixels_per_centimeter` - Raster cells per world centimeter
    /// * `world_to_map` - Rigid transform from world space into the map frame
    /// * `map_offset` - Map-frame position of raster cell (0, 0)
    ///
    /// # Returns
    /// * `Result<(), RoadMapError>` - Success or an error if parameters are invalid
    pub fn configure(
        &mut self,
        width: usize,
        height: usize,
        pixels_per_centimeter: f32,
        world_to_map: Transform,
        map_offset: Vector3<f32>,
    ) -> Result<(), RoadMapError> {
        if width == 0 || height == 0 {
            return Err(RoadMapError::InvalidDimensions(
                "Width and height must be non-zero",
            ));
        }
        if width.checked_mul(height).is_none() {
            return Err(RoadMapError::InvalidDimensions(
                "Map dimensions too large, would cause overflow",
            ));
        }
        let transform = MapTransform::new(pixels_per_centimeter, world_to_map, map_offset)?;

        self.grid.set_dimensions(width, height);
        self.transform = transform;
        self.configured = true;
        debug!(width, height, pixels_per_centimeter, "Configured road map raster");
        Ok(())
    }

    /// Number of cells appended so far.
    pub fn len(&self) -> usize {
        self.grid.len()
    }

    /// Returns `true` if no cell has been appended yet.
    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }

    /// Number of cells still expected before [`RoadMapBuilder::build`].
    pub fn remaining(&self) -> usize {
        self.grid.capacity().saturating_sub(self.grid.len())
    }

    fn check_room(&self) -> Result<(), RoadMapError> {
        if !self.configured {
            return Err(RoadMapError::NotConfigured);
        }
        if self.grid.len() >= self.grid.capacity() {
            return Err(RoadMapError::TooManyCells {
                capacity: self.grid.capacity(),
            });
        }
        Ok(())
    }

    /// Appends an off-road cell.
    pub fn append_empty_cell(&mut self) -> Result<(), RoadMapError> {
        self.check_room()?;
        self.grid.append_empty_cell();
        Ok(())
    }

    /// Appends an on-road cell covered by a mesh piece.
    ///
    /// The lane direction is the forward vector of `local_transform`, turned
    /// by the yaw offset of `tag` and negated if `invert_direction` is set.
    /// Tags without a lane rule produce an undirected cell.
    pub fn append_cell(
        &mut self,
        tag: MeshTag,
        local_transform: &Transform,
        invert_direction: bool,
    ) -> Result<(), RoadMapError> {
        self.check_room()?;
        self.grid
            .push(tag.classify(local_transform, invert_direction));
        Ok(())
    }

    /// Finishes the build pass.
    ///
    /// # Returns
    /// * `Result<RoadMap, RoadMapError>` - The read-only map or an error if the
    ///   builder was never configured or the cell count does not match
    pub fn build(self) -> Result<RoadMap, RoadMapError> {
        if !self.configured {
            return Err(RoadMapError::NotConfigured);
        }
        if !self.grid.is_complete() {
            return Err(RoadMapError::IncompleteBuild {
                expected: self.grid.capacity(),
                actual: self.grid.len(),
            });
        }
        let map = RoadMap::from_parts(self.grid, self.transform);
        let counts = map.count_cells();
        info!(
            width = map.width(),
            height = map.height(),
            off_road = counts.off_road,
            undirected = counts.undirected,
            lanes = counts.lanes,
            "Built road map"
        );
        Ok(map)
    }
}
