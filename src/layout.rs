//! Builds a road map from the character layout in the settings.

use anyhow::{Context, Result, bail};
use nalgebra::Vector3;
use roadmap_geometry::{Rotator, Transform};
use roadmap_raster::{MeshTag, RoadMap};
use tracing::debug;

use crate::settings::MapSettings;

/// What a single layout character stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    OffRoad,
    Road { tag: MeshTag, invert: bool },
}

impl Glyph {
    pub fn parse(c: char) -> Option<Glyph> {
        let road = |tag, invert| Some(Glyph::Road { tag, invert });
        match c {
            '.' => Some(Glyph::OffRoad),
            '#' => road(MeshTag::Other, false),
            '>' => road(MeshTag::StraightLaneRight, false),
            '<' => road(MeshTag::StraightLaneLeft, false),
            'r' => road(MeshTag::StraightLaneRight, true),
            'l' => road(MeshTag::StraightLaneLeft, true),
            '0' => road(MeshTag::TurnLane0, false),
            '1' => road(MeshTag::TurnLane1, false),
            '2' => road(MeshTag::TurnLane2, false),
            '3' => road(MeshTag::TurnLane3, false),
            _ => None,
        }
    }
}

/// Runs a full build pass over `settings.layout`, one cell per character.
pub fn build_map(settings: &MapSettings) -> Result<RoadMap> {
    let height = settings.layout.len();
    let width = match settings.layout.first() {
        Some(row) => row.chars().count(),
        None => bail!("Map layout has no rows"),
    };
    if let Some((y, row)) = settings
        .layout
        .iter()
        .enumerate()
        .find(|(_, row)| row.chars().count() != width)
    {
        bail!(
            "Layout row {} has {} cells, expected {}",
            y,
            row.chars().count(),
            width
        );
    }

    let world_to_map = settings
        .world_to_map
        .to_transform()
        .context("Invalid world_to_map placement")?;
    let mut builder = RoadMap::builder();
    builder
        .configure(
            width,
            height,
            settings.pixels_per_centimeter,
            world_to_map,
            Vector3::from(settings.offset),
        )
        .context("Failed to configure road map")?;

    let mesh = Transform::from_rotator(Vector3::zeros(), Rotator::from_yaw(settings.lane_yaw));
    for (y, row) in settings.layout.iter().enumerate() {
        for (x, c) in row.chars().enumerate() {
            let appended = match Glyph::parse(c) {
                Some(Glyph::OffRoad) => builder.append_empty_cell(),
                Some(Glyph::Road { tag, invert }) => builder.append_cell(tag, &mesh, invert),
                None => bail!("Unknown layout character {:?} at row {}, column {}", c, y, x),
            };
            appended.with_context(|| format!("Failed to append cell at row {}, column {}", y, x))?;
        }
    }
    debug!(width, height, "Appended all layout cells");

    builder.build().context("Failed to finish road map")
}
