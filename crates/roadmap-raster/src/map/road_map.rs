//! The read-only road map and its point lookups.

#![warn(missing_docs)]

use std::ops::Index;

use super::{GridPoint, MapTransform, PixelGrid, RoadCell, RoadMapBuilder, WorldPoint};
use crate::error::RoadMapError;

/// Discretized road-surface map.
///
/// Every cell records whether the world area it covers is drivable and, for
/// lanes, the expected direction of travel. A `RoadMap` is either the
/// canonical empty map from [`RoadMap::default`] or the output of a completed
/// [`RoadMapBuilder`] pass, so it always holds `width * height` cells.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RoadMap {
    /// Cell storage
    grid: PixelGrid,
    /// Alignment of the raster with world space
    transform: MapTransform,
}

/// Number of cells of each classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellCounts {
    /// Cells off any drivable surface.
    pub off_road: usize,
    /// Drivable cells without a lane direction.
    pub undirected: usize,
    /// Lane cells.
    pub lanes: usize,
}

impl RoadMap {
    /// Creates a builder for a new map.
    pub fn builder() -> RoadMapBuilder {
        RoadMapBuilder::new()
    }

    pub(crate) fn from_parts(grid: PixelGrid, transform: MapTransform) -> Self {
        debug_assert!(grid.is_complete());
        RoadMap { grid, transform }
    }

    /// Width of the raster in cells.
    pub fn width(&self) -> usize {
        self.grid.width()
    }

    /// Height of the raster in cells.
    pub fn height(&self) -> usize {
        self.grid.height()
    }

    /// Raster cells per world centimeter.
    pub fn pixels_per_centimeter(&self) -> f32 {
        self.transform.pixels_per_centimeter()
    }

    /// Gets the cell storage.
    pub fn grid(&self) -> &PixelGrid {
        &self.grid
    }

    /// Gets the world alignment of the raster.
    pub fn transform(&self) -> &MapTransform {
        &self.transform
    }

    /// Returns `true` if the map holds exactly `width * height` cells.
    pub fn is_valid(&self) -> bool {
        self.grid.is_complete()
    }

    /// Converts a world position into the raster cell that contains it,
    /// clamped to the nearest border cell.
    pub fn world_to_pixel(&self, world_p: &WorldPoint) -> GridPoint {
        self.transform
            .world_to_pixel(world_p, self.width(), self.height())
    }

    /// Converts a raster cell into the world position of its corner.
    pub fn pixel_to_world(&self, p: GridPoint) -> WorldPoint {
        self.transform.pixel_to_world(p)
    }

    /// Gets the cell at a raster position.
    ///
    /// # Returns
    /// * `Result<&RoadCell, RoadMapError>` - The cell or an error if out of bounds
    pub fn cell(&self, p: GridPoint) -> Result<&RoadCell, RoadMapError> {
        self.grid.get(p)
    }

    /// Gets the cell covering a world position.
    ///
    /// Positions outside the mapped area resolve to the nearest border cell,
    /// so every position in space has an answer.
    pub fn cell_at(&self, world_p: &WorldPoint) -> &RoadCell {
        &self.grid[self.world_to_pixel(world_p)]
    }

    /// Counts the cells of each classification.
    pub fn count_cells(&self) -> CellCounts {
        self.grid
            .cells()
            .iter()
            .fold(CellCounts::default(), |mut counts, cell| {
                match cell {
                    RoadCell::OffRoad => counts.off_road += 1,
                    RoadCell::Undirected => counts.undirected += 1,
                    RoadCell::Lane(_) => counts.lanes += 1,
                }
                counts
            })
    }
}

impl Index<GridPoint> for RoadMap {
    type Output = RoadCell;

    fn index(&self, p: GridPoint) -> &RoadCell {
        &self.grid[p]
    }
}

/// Glyph for a cell in the text rendering.
fn cell_glyph(cell: &RoadCell) -> char {
    match cell.direction() {
        None if cell.is_off_road() => '.',
        None => '#',
        Some(d) if d.x.abs() >= d.y.abs() => {
            if d.x >= 0.0 {
                '>'
            } else {
                '<'
            }
        }
        // Rows grow downwards, so +Y points down the page.
        Some(d) if d.y >= 0.0 => 'v',
        Some(_) => '^',
    }
}

impl std::fmt::Display for RoadMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "RoadMap ({}x{}, {:.4} px/cm)",
            self.width(),
            self.height(),
            self.pixels_per_centimeter()
        )?;
        for row in self.grid.rows() {
            let line: String = row.iter().map(cell_glyph).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::MeshTag;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;
    use rand::{Rng, SeedableRng, rngs::StdRng};
    use roadmap_geometry::{Rotator, Transform};

    /// 2x1 map: (0, 0) off-road, (1, 0) lane pointing along +X.
    fn two_cell_map() -> RoadMap {
        let mut builder = RoadMap::builder();
        builder
            .configure(2, 1, 0.01, Transform::identity(), Vector3::zeros())
            .unwrap();
        builder.append_empty_cell().unwrap();
        builder
            .append_cell(MeshTag::StraightLaneRight, &Transform::identity(), false)
            .unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn test_default_map() {
        let map = RoadMap::default();
        assert!(map.is_valid());
        assert_eq!(map.width(), 1);
        assert_eq!(map.height(), 1);
        assert_eq!(map.pixels_per_centimeter(), 1.0);
        assert!(map[GridPoint::new(0, 0)].is_off_road());
        assert!(map.cell_at(&WorldPoint::new(12.0, -40.0, 3.0)).is_off_road());
        assert_eq!(
            map.count_cells(),
            CellCounts {
                off_road: 1,
                undirected: 0,
                lanes: 0
            }
        );
    }

    #[test]
    fn test_point_lookup_two_cells() {
        let map = two_cell_map();
        let world = map.pixel_to_world(GridPoint::new(1, 0));
        assert_relative_eq!(world, WorldPoint::new(100.0, 0.0, 0.0), epsilon = 1e-3);

        // Sample the middle of the cell to stay clear of the boundary.
        let cell = map.cell_at(&(world + Vector3::new(50.0, 50.0, 0.0)));
        assert!(!cell.is_off_road());
        assert_eq!(cell.direction(), Some(Vector3::new(1.0, 0.0, 0.0)));

        assert!(map.cell_at(&WorldPoint::new(50.0, 50.0, 0.0)).is_off_road());
    }

    #[test]
    fn test_cell_out_of_bounds() {
        let map = two_cell_map();
        assert!(map.cell(GridPoint::new(1, 0)).is_ok());
        assert!(matches!(
            map.cell(GridPoint::new(2, 0)),
            Err(RoadMapError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_lookup_clamps_far_positions() {
        let map = two_cell_map();
        assert!(map.cell_at(&WorldPoint::new(-1e7, 0.0, 0.0)).is_off_road());
        assert!(map.cell_at(&WorldPoint::new(1e7, 1e7, -1e7)).has_direction());
        assert!(map.cell_at(&WorldPoint::new(f32::NAN, 0.0, 0.0)).is_off_road());
    }

    #[test]
    fn test_world_to_pixel_stays_in_bounds() {
        let mut builder = RoadMap::builder();
        let world_to_map =
            Transform::from_rotator(Vector3::new(30.0, -20.0, 0.0), Rotator::from_yaw(15.0));
        builder
            .configure(17, 9, 0.2, world_to_map, Vector3::new(-40.0, -20.0, 0.0))
            .unwrap();
        for _ in 0..17 * 9 {
            builder.append_empty_cell().unwrap();
        }
        let map = builder.build().unwrap();

        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..1000 {
            let world = WorldPoint::new(
                rng.random_range(-1e6..1e6),
                rng.random_range(-1e6..1e6),
                rng.random_range(-1e6..1e6),
            );
            let p = map.world_to_pixel(&world);
            assert!(p.x < map.width() && p.y < map.height());
            assert!(map.cell(p).is_ok());
        }
    }

    #[test]
    fn test_display() {
        let mut builder = RoadMap::builder();
        builder
            .configure(4, 2, 1.0, Transform::identity(), Vector3::zeros())
            .unwrap();
        let mesh = Transform::from_rotator(Vector3::zeros(), Rotator::ZERO);
        builder.append_empty_cell().unwrap();
        builder.append_cell(MeshTag::Other, &mesh, false).unwrap();
        builder
            .append_cell(MeshTag::StraightLaneRight, &mesh, false)
            .unwrap();
        builder
            .append_cell(MeshTag::StraightLaneLeft, &mesh, false)
            .unwrap();
        builder.append_cell(MeshTag::TurnLane2, &mesh, false).unwrap();
        builder.append_cell(MeshTag::TurnLane3, &mesh, false).unwrap();
        builder.append_empty_cell().unwrap();
        builder.append_empty_cell().unwrap();
        let map = builder.build().unwrap();

        let text = format!("{}", map);
        assert!(text.starts_with("RoadMap (4x2"));
        assert!(text.contains("\n.#><\n"));
        assert!(text.ends_with("v^..\n"));
    }
}
