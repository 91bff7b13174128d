use nalgebra::Vector3;
use roadmap_geometry::{Rotator, Transform};
use roadmap_raster::{MeshTag, RoadMap, WorldPoint};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    // A 20x8 raster at 0.1 cells per cm (10 cm cells), centered on the world origin.
    let (width, height) = (20usize, 8usize);
    let mut builder = RoadMap::builder();
    builder
        .configure(
            width,
            height,
            0.1,
            Transform::identity(),
            Vector3::new(-100.0, -40.0, 0.0),
        )
        .unwrap();

    // Rows 2-3 carry traffic along +X, rows 4-5 along -X, the rest is off-road.
    let mesh = Transform::from_rotator(Vector3::zeros(), Rotator::ZERO);
    for y in 0..height {
        for _x in 0..width {
            let appended = match y {
                2 | 3 => builder.append_cell(MeshTag::StraightLaneRight, &mesh, false),
                4 | 5 => builder.append_cell(MeshTag::StraightLaneLeft, &mesh, false),
                _ => builder.append_empty_cell(),
            };
            appended.unwrap();
        }
    }
    let map = builder.build().unwrap();
    println!("{}", map);

    let origin = WorldPoint::new(0.0, 0.0, 0.0);
    println!("Cell at {:?}: {}", origin, map.cell_at(&origin));

    // A 40x16 cm footprint driving along +X in each lane, then straddling the curb.
    let extent = Vector3::new(20.0, 8.0, 5.0);
    for (label, y, yaw) in [
        ("eastbound lane, heading east", -10.0, 0.0),
        ("westbound lane, heading east", 10.0, 0.0),
        ("curb, heading west", -22.0, 180.0),
    ] {
        let vehicle = Transform::from_rotator(Vector3::new(0.0, y, 0.0), Rotator::from_yaw(yaw));
        let result = map.intersect(&vehicle, &extent, 0.5);
        println!(
            "{:<30} off-road: {:.2}  opposite lane: {:.2}  ({} checks)",
            label, result.off_road, result.opposite_lane, result.check_count
        );
    }
}
