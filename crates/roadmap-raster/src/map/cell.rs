//! Per-cell road-surface classification.

#![warn(missing_docs)]

use nalgebra::{Unit, Vector3};

/// Classification of a single raster cell.
///
/// Only on-road cells can carry a lane direction, and a lane direction is
/// always unit length.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "RoadCellRepr", into = "RoadCellRepr")
)]
pub enum RoadCell {
    /// The cell lies off any drivable surface.
    #[default]
    OffRoad,
    /// Drivable surface without a canonical travel direction (e.g. open pavement).
    Undirected,
    /// Drivable lane with the expected direction of travel.
    Lane(Unit<Vector3<f32>>),
}

impl RoadCell {
    /// Creates a lane cell, normalizing `direction`.
    ///
    /// Returns `None` if `direction` is too short to normalize or has a
    /// NaN or infinite component.
    pub fn lane(direction: Vector3<f32>) -> Option<Self> {
        unit_direction(direction).map(RoadCell::Lane)
    }

    /// Returns `true` if the cell lies off any drivable surface.
    pub fn is_off_road(&self) -> bool {
        matches!(self, RoadCell::OffRoad)
    }

    /// Returns `true` if the cell carries a lane direction.
    pub fn has_direction(&self) -> bool {
        matches!(self, RoadCell::Lane(_))
    }

    /// Returns the lane direction, if any.
    pub fn direction(&self) -> Option<Vector3<f32>> {
        match self {
            RoadCell::Lane(direction) => Some(direction.into_inner()),
            _ => None,
        }
    }
}

/// Normalizes a finite, non-zero direction.
///
/// The vector is scaled by its largest component first so that the norm
/// cannot overflow for very long inputs.
pub(crate) fn unit_direction(direction: Vector3<f32>) -> Option<Unit<Vector3<f32>>> {
    if !direction.iter().all(|c| c.is_finite()) {
        return None;
    }
    let scale = direction.amax();
    if scale <= 0.0 {
        return None;
    }
    Unit::try_new(direction / scale, f32::EPSILON)
}

/// Wire form of [`RoadCell`]. Lane directions are renormalized on the way in.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
enum RoadCellRepr {
    OffRoad,
    Undirected,
    Lane([f32; 3]),
}

#[cfg(feature = "serde")]
impl From<RoadCell> for RoadCellRepr {
    fn from(cell: RoadCell) -> Self {
        match cell {
            RoadCell::OffRoad => RoadCellRepr::OffRoad,
            RoadCell::Undirected => RoadCellRepr::Undirected,
            RoadCell::Lane(d) => RoadCellRepr::Lane([d.x, d.y, d.z]),
        }
    }
}

#[cfg(feature = "serde")]
impl TryFrom<RoadCellRepr> for RoadCell {
    type Error = &'static str;

    fn try_from(repr: RoadCellRepr) -> Result<Self, Self::Error> {
        match repr {
            RoadCellRepr::OffRoad => Ok(RoadCell::OffRoad),
            RoadCellRepr::Undirected => Ok(RoadCell::Undirected),
            RoadCellRepr::Lane(d) => RoadCell::lane(Vector3::from(d))
                .ok_or("lane direction must be finite and non-zero"),
        }
    }
}

impl std::fmt::Display for RoadCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoadCell::OffRoad => write!(f, "OffRoad"),
            RoadCell::Undirected => write!(f, "Undirected"),
            RoadCell::Lane(d) => write!(f, "Lane({:.3}, {:.3}, {:.3})", d.x, d.y, d.z),
        }
    }
}
