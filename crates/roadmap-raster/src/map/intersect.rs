//! Oriented-box intersection against the road map.
//!
//! The footprint of a box is sampled on a regular grid in the box's local
//! frame. Every sample is looked up in the raster and counted as off-road,
//! opposite-lane or neither; the counts are then normalized by the number of
//! samples taken.

#![warn(missing_docs)]

use nalgebra::{Point3, Vector3};
use roadmap_geometry::Transform;
use tracing::warn;

use super::{RoadCell, RoadMap};

/// Fractions of a box footprint that are off-road or against the lane.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntersectionResult {
    /// Fraction of samples on off-road cells, in `[0, 1]`.
    pub off_road: f32,
    /// Fraction of samples on lane cells flagged as opposite, in `[0, 1]`.
    pub opposite_lane: f32,
    /// Number of samples taken.
    pub check_count: usize,
}

impl IntersectionResult {
    /// Returns `true` if no sample was taken and both ratios are zero.
    pub fn is_degenerate(&self) -> bool {
        self.check_count == 0
    }
}

/// Sample positions along one local axis: `-extent, -extent + step, ...`
/// while below `extent`.
///
/// Positions are accumulated, so rounding drift can add or drop the last
/// sample on long axes. Iteration stops if adding `step` no longer advances.
fn axis_samples(extent: f32, step: f32) -> impl Iterator<Item = f32> {
    std::iter::successors(Some(-extent), move |&v| {
        let next = v + step;
        (next > v).then_some(next)
    })
    .take_while(move |&v| v < extent)
}

impl RoadMap {
    /// Estimates how much of an oriented box lies off-road or in the opposite lane.
    ///
    /// A lane cell counts as opposite when its direction has a strictly
    /// positive dot product with the box's forward vector.
    ///
    /// # Arguments
    /// * `box_transform` - Placement of the box center in world space
    /// * `box_extent` - Half-size of the box along its local axes (centimeters)
    /// * `checks_per_centimeter` - Sampling density along each local axis
    ///
    /// # Returns
    /// * `IntersectionResult` - Ratios over all samples; zero with
    ///   `check_count == 0` if the box or density admits no sample
    pub fn intersect(
        &self,
        box_transform: &Transform,
        box_extent: &Vector3<f32>,
        checks_per_centimeter: f32,
    ) -> IntersectionResult {
        let direction_of_movement = box_transform.forward_vector();
        let mut check_count = 0usize;
        let mut off_road = 0usize;
        let mut opposite_lane = 0usize;

        if checks_per_centimeter > 0.0 && checks_per_centimeter.is_finite() {
            let step = 1.0 / checks_per_centimeter;
            for x in axis_samples(box_extent.x, step) {
                for y in axis_samples(box_extent.y, step) {
                    check_count += 1;
                    let location = box_transform.transform_position(&Point3::new(x, y, 0.0));
                    match self.cell_at(&location) {
                        RoadCell::OffRoad => off_road += 1,
                        RoadCell::Lane(direction) if direction.dot(&direction_of_movement) > 0.0 => {
                            opposite_lane += 1
                        }
                        _ => {}
                    }
                }
            }
        }

        if check_count == 0 {
            warn!(
                extent_x = box_extent.x,
                extent_y = box_extent.y,
                checks_per_centimeter,
                "Road map intersection did zero checks"
            );
            return IntersectionResult::default();
        }

        IntersectionResult {
            off_road: off_road as f32 / check_count as f32,
            opposite_lane: opposite_lane as f32 / check_count as f32,
            check_count,
        }
    }
}
