use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File, FileFormat, Source};
use nalgebra::Vector3;
use roadmap_geometry::{GeometryError, Rotator, Transform};
use serde::Deserialize;
use tracing::{error, info};

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Everything the application reads from its configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub map: MapSettings,
    #[serde(default)]
    pub queries: Vec<QuerySettings>,
    #[serde(default)]
    pub output: OutputSettings,
}

/// Raster alignment and the character layout of its cells.
#[derive(Debug, Clone, Deserialize)]
pub struct MapSettings {
    pub pixels_per_centimeter: f32,
    /// Map-frame position of cell (0, 0), in centimeters
    #[serde(default)]
    pub offset: [f32; 3],
    #[serde(default)]
    pub world_to_map: Placement,
    /// Yaw of the meshes every lane glyph stands for, in degrees
    #[serde(default)]
    pub lane_yaw: f32,
    /// One string per raster row, top row first
    pub layout: Vec<String>,
}

/// A location and a heading in the horizontal plane.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Placement {
    #[serde(default)]
    pub location: [f32; 3],
    #[serde(default)]
    pub yaw: f32,
}

impl Placement {
    pub fn to_transform(&self) -> Result<Transform, GeometryError> {
        Transform::try_new(Vector3::from(self.location), Rotator::from_yaw(self.yaw))
    }
}

/// An oriented box to test against the map.
#[derive(Debug, Clone, Deserialize)]
pub struct QuerySettings {
    pub name: String,
    #[serde(default)]
    pub location: [f32; 3],
    #[serde(default)]
    pub yaw: f32,
    /// Half-size of the box along its local axes
    pub extent: [f32; 3],
    pub checks_per_centimeter: f32,
}

impl QuerySettings {
    pub fn placement(&self) -> Placement {
        Placement {
            location: self.location,
            yaw: self.yaw,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputSettings {
    pub png: Option<PathBuf>,
    #[serde(default)]
    pub draw_debug: bool,
}

/// Loads settings from a TOML file, with environment variables such as
/// `ROADMAP__MAP__PIXELS_PER_CENTIMETER` taking precedence.
pub fn load_config(path: &str) -> Result<Settings, ConfigError> {
    info!("Attempting to load configuration from {}", path);

    let file = File::new(path, FileFormat::Toml).required(true);
    let settings = build_settings(file, environment());

    match settings {
        Ok(settings) => {
            info!(
                rows = settings.map.layout.len(),
                queries = settings.queries.len(),
                "Successfully loaded configuration"
            );
            Ok(settings)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            Err(e)
        }
    }
}

/// `ROADMAP__` prefix with `__` between section and key, since keys contain
/// single underscores.
fn environment() -> Environment {
    Environment::with_prefix("ROADMAP")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

fn build_settings<S>(file: S, env: Environment) -> Result<Settings, ConfigError>
where
    S: Source + Send + Sync + 'static,
{
    Config::builder()
        .add_source(file)
        .add_source(env)
        .build()?
        .try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::Map;

    fn parse_with_env(toml: &str, vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let vars: Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        build_settings(
            File::from_str(toml, FileFormat::Toml),
            environment().source(Some(vars)),
        )
    }

    fn parse(toml: &str) -> Result<Settings, ConfigError> {
        parse_with_env(toml, &[])
    }

    const SAMPLE: &str = r#"
        [map]
        pixels_per_centimeter = 0.01
        offset = [-200.0, -100.0, 0.0]
        lane_yaw = 90.0
        layout = ["..", "><"]

        [map.world_to_map]
        location = [10.0, 0.0, 0.0]
        yaw = 45.0

        [[queries]]
        name = "car"
        location = [1.0, 2.0, 0.0]
        yaw = 180.0
        extent = [200.0, 80.0, 70.0]
        checks_per_centimeter = 0.1

        [output]
        png = "out/map.png"
    "#;

    #[test]
    fn test_parse_full_settings() {
        let settings = parse(SAMPLE).unwrap();

        assert_eq!(settings.map.pixels_per_centimeter, 0.01);
        assert_eq!(settings.map.offset, [-200.0, -100.0, 0.0]);
        assert_eq!(settings.map.lane_yaw, 90.0);
        assert_eq!(settings.map.layout, vec!["..", "><"]);
        assert_eq!(settings.map.world_to_map.location, [10.0, 0.0, 0.0]);
        assert_eq!(settings.map.world_to_map.yaw, 45.0);

        assert_eq!(settings.queries.len(), 1);
        let query = &settings.queries[0];
        assert_eq!(query.name, "car");
        assert_eq!(query.placement().yaw, 180.0);
        assert_eq!(query.extent, [200.0, 80.0, 70.0]);

        assert_eq!(settings.output.png, Some(PathBuf::from("out/map.png")));
        assert!(!settings.output.draw_debug);
    }

    #[test]
    fn test_optional_sections_default() {
        let toml = r##"
            [map]
            pixels_per_centimeter = 1.0
            layout = ["#"]
        "##;
        let settings = parse(toml).unwrap();

        assert_eq!(settings.map.layout, vec!["#"]);
        assert_eq!(settings.map.offset, [0.0; 3]);
        assert_eq!(settings.map.world_to_map.yaw, 0.0);
        assert!(settings.queries.is_empty());
        assert!(settings.output.png.is_none());
    }

    #[test]
    fn test_missing_map_section() {
        let toml = r#"
            [output]
            draw_debug = true
        "#;
        assert!(parse(toml).is_err());
    }

    #[test]
    fn test_environment_overrides_file() {
        let settings = parse_with_env(
            SAMPLE,
            &[
                ("ROADMAP__MAP__PIXELS_PER_CENTIMETER", "0.5"),
                ("ROADMAP__OUTPUT__DRAW_DEBUG", "true"),
                // Wrong separator after the prefix: ignored.
                ("ROADMAP_MAP__LANE_YAW", "10.0"),
            ],
        )
        .unwrap();

        assert_eq!(settings.map.pixels_per_centimeter, 0.5);
        assert!(settings.output.draw_debug);
        assert_eq!(settings.map.lane_yaw, 90.0);
        assert_eq!(settings.map.layout, vec!["..", "><"]);
    }

    #[test]
    fn test_placement_rejects_non_finite() {
        let placement = Placement {
            location: [f32::NAN, 0.0, 0.0],
            yaw: 0.0,
        };
        assert!(placement.to_transform().is_err());
        assert!(Placement::default().to_transform().is_ok());
    }
}
