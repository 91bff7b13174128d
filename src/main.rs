mod layout;   // brings `layout.rs` in as `crate::layout`
mod output;   // brings `output.rs` in as `crate::output`
mod settings; // brings `settings.rs` in as `crate::settings`

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use nalgebra::Vector3;
use output::{PngWriter, TracingDrawSink};
use roadmap_raster::{IntersectionResult, RoadMap};
use settings::QuerySettings;
use tracing::{debug, info};
use tracing_subscriber::{self, EnvFilter};

/// Rasterize a road layout and test vehicle footprints against it
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file to load
    #[arg(short, long, default_value = settings::DEFAULT_CONFIG_PATH)]
    config: String,

    /// Save the encoded map as a PNG here, overriding `output.png`
    #[arg(short, long)]
    png: Option<PathBuf>,

    /// Send one debug marker per cell to the trace log
    #[arg(long)]
    draw_debug: bool,
}

/// Runs every query against `map` and logs its ratios.
///
/// Queries that take no samples are already reported by `RoadMap::intersect`
/// and are left out of the returned results.
fn run_queries<'a>(
    map: &RoadMap,
    queries: &'a [QuerySettings],
) -> Result<Vec<(&'a str, IntersectionResult)>> {
    let mut results = Vec::with_capacity(queries.len());
    for query in queries {
        let placement = query
            .placement()
            .to_transform()
            .with_context(|| format!("Invalid placement for query '{}'", query.name))?;
        let result = map.intersect(
            &placement,
            &Vector3::from(query.extent),
            query.checks_per_centimeter,
        );
        if result.is_degenerate() {
            debug!(query = %query.name, "Skipping query without samples");
            continue;
        }
        info!(
            query = %query.name,
            off_road = result.off_road,
            opposite_lane = result.opposite_lane,
            checks = result.check_count,
            "Intersection"
        );
        results.push((query.name.as_str(), result));
    }
    Ok(results)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let args = Args::parse();
    let settings = settings::load_config(&args.config)
        .with_context(|| format!("Failed to load configuration from {}", args.config))?;

    let map = layout::build_map(&settings.map)?;
    info!("Road map ready:\n{}", map);

    run_queries(&map, &settings.queries)?;

    if let Some(path) = args.png.or(settings.output.png) {
        map.save_as_image(&path, &mut PngWriter)
            .with_context(|| format!("Failed to save road map to {}", path.display()))?;
    }

    if args.draw_debug || settings.output.draw_debug {
        let mut sink = TracingDrawSink::default();
        map.draw_debug_pixels(&mut sink, false);
        info!(markers = sink.drawn(), "Drew debug markers");
    }

    info!("Done");
    Ok(())
}
