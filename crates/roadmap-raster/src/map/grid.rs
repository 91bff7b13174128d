//! Row-major storage for road map cells.

#![warn(missing_docs)]

use std::ops::Index;

use super::{GridPoint, RoadCell};
use crate::error::RoadMapError;

/// Contiguous row-major raster of [`RoadCell`]s.
///
/// The cell at `(x, y)` lives at index `y * width + x`. Once a build pass has
/// completed the grid holds exactly `width * height` cells.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PixelGrid {
    /// Width of the raster in cells
    width: usize,
    /// Height of the raster in cells
    height: usize,
    /// Cells in row-major order
    cells: Vec<RoadCell>,
}

impl Default for PixelGrid {
    /// The canonical empty map: a single off-road cell.
    fn default() -> Self {
        let mut grid = PixelGrid::with_dimensions(1, 1);
        grid.append_empty_cell();
        grid
    }
}

impl PixelGrid {
    /// Creates a grid with the given extents and no cells yet.
    pub(crate) fn with_dimensions(width: usize, height: usize) -> Self {
        PixelGrid {
            width,
            height,
            cells: Vec::with_capacity(width.saturating_mul(height)),
        }
    }

    /// Replaces the extents, keeping any cells already appended.
    pub(crate) fn set_dimensions(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        let expected = width.saturating_mul(height);
        self.cells
            .reserve(expected.saturating_sub(self.cells.len()));
    }

    /// Appends an off-road cell without direction.
    pub(crate) fn append_empty_cell(&mut self) {
        self.cells.push(RoadCell::OffRoad);
    }

    /// Appends an already classified cell.
    pub(crate) fn push(&mut self, cell: RoadCell) {
        self.cells.push(cell);
    }

    /// Width of the raster in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the raster in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells appended so far.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if no cell has been appended.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of cells the raster holds once complete.
    pub fn capacity(&self) -> usize {
        self.width.saturating_mul(self.height)
    }

    /// Returns `true` if the grid holds exactly `width * height` cells.
    pub fn is_complete(&self) -> bool {
        !self.cells.is_empty() && self.cells.len() == self.capacity()
    }

    /// Calculates the index in the cell vector for a given grid point
    fn get_index(&self, p: GridPoint) -> usize {
        p.y * self.width + p.x
    }

    /// Gets the cell at a raster position.
    ///
    /// # Arguments
    /// * `p` - Point in raster frame (cells)
    ///
    /// # Returns
    /// * `Result<&RoadCell, RoadMapError>` - The cell or an error if out of bounds
    pub fn get(&self, p: GridPoint) -> Result<&RoadCell, RoadMapError> {
        if p.x < self.width && p.y < self.height {
            self.cells
                .get(self.get_index(p))
                .ok_or(RoadMapError::OutOfBounds {
                    x: p.x,
                    y: p.y,
                    width: self.width,
                    height: self.height,
                })
        } else {
            Err(RoadMapError::OutOfBounds {
                x: p.x,
                y: p.y,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Gets a slice of every cell in row-major order.
    pub fn cells(&self) -> &[RoadCell] {
        &self.cells
    }

    /// Iterates over the raster rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[RoadCell]> {
        self.cells.chunks(self.width.max(1))
    }

    /// Iterates over every cell together with its raster position.
    pub fn iter(&self) -> impl Iterator<Item = (GridPoint, &RoadCell)> {
        let width = self.width.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (GridPoint::new(i % width, i / width), cell))
    }
}

impl Index<GridPoint> for PixelGrid {
    type Output = RoadCell;

    /// Panics if `p` lies outside the raster.
    fn index(&self, p: GridPoint) -> &RoadCell {
        assert!(
            p.x < self.width && p.y < self.height,
            "grid point {} outside {}x{} raster",
            p,
            self.width,
            self.height
        );
        &self.cells[self.get_index(p)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn filled(width: usize, height: usize) -> PixelGrid {
        let mut grid = PixelGrid::with_dimensions(width, height);
        for i in 0..width * height {
            if i % 2 == 0 {
                grid.append_empty_cell();
            } else {
                grid.push(RoadCell::Undirected);
            }
        }
        grid
    }

    #[test]
    fn test_default_is_canonical_empty_map() {
        let grid = PixelGrid::default();
        assert_eq!(grid.width(), 1);
        assert_eq!(grid.height(), 1);
        assert!(grid.is_complete());
        assert!(grid[GridPoint::new(0, 0)].is_off_road());
    }

    #[test]
    fn test_row_major_index() {
        let mut grid = PixelGrid::with_dimensions(3, 2);
        for _ in 0..5 {
            grid.append_empty_cell();
        }
        assert!(!grid.is_complete());
        grid.push(RoadCell::Undirected);
        assert!(grid.is_complete());

        // Last cell appended is (2, 1) = 1 * 3 + 2
        assert_eq!(*grid.get(GridPoint::new(2, 1)).unwrap(), RoadCell::Undirected);
        assert_eq!(*grid.get(GridPoint::new(1, 1)).unwrap(), RoadCell::OffRoad);
    }

    #[test]
    fn test_out_of_bounds() {
        let grid = filled(4, 3);
        assert!(matches!(
            grid.get(GridPoint::new(4, 0)),
            Err(RoadMapError::OutOfBounds { x: 4, y: 0, width: 4, height: 3 })
        ));
        assert!(matches!(
            grid.get(GridPoint::new(0, 3)),
            Err(RoadMapError::OutOfBounds { .. })
        ));
    }

    #[test]
    #[should_panic(expected = "outside 2x2 raster")]
    fn test_index_panics_out_of_bounds() {
        let grid = filled(2, 2);
        let _ = grid[GridPoint::new(2, 0)];
    }

    #[test]
    fn test_rows_and_iter() {
        let grid = filled(3, 2);
        let rows: Vec<_> = grid.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].len(), 3);

        let positions: Vec<_> = grid.iter().map(|(p, _)| p).collect();
        assert_eq!(positions[0], GridPoint::new(0, 0));
        assert_eq!(positions[2], GridPoint::new(2, 0));
        assert_eq!(positions[3], GridPoint::new(0, 1));
    }

    #[test]
    fn test_set_dimensions_keeps_cells() {
        let mut grid = PixelGrid::with_dimensions(1, 1);
        grid.push(RoadCell::lane(Vector3::x()).unwrap());
        grid.set_dimensions(2, 1);
        assert_eq!(grid.len(), 1);
        assert!(!grid.is_complete());
        assert!(grid.cells()[0].has_direction());
    }
}
