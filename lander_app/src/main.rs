//! Lander terrain probe
//!
//! Headless driver for the terrain octree:
//! - Loads a terrain OBJ and builds the octree over its vertices
//! - Lowers a lander-sized box from a start position in fixed steps
//! - Reports altitude and overlapping terrain cells at every step

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use terrain_octree::foundation::logging;
use terrain_octree::prelude::*;

const DEFAULT_TERRAIN: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/resources/terrain.obj");

// Lander spawn point of the terrain scene
const DEFAULT_POSITION: [f32; 3] = [-45.0, 65.0, -45.0];

struct ProbeSettings {
    terrain_path: PathBuf,
    config: OctreeConfig,
    start: Point3,
    half_extent: f32,
    steps: u32,
    step_size: f32,
    nearest: bool,
    wireframe_levels: Option<u32>,
}

impl ProbeSettings {
    fn from_matches(matches: &ArgMatches) -> Result<Self, Box<dyn std::error::Error>> {
        let mut config = match matches.get_one::<PathBuf>("config") {
            Some(path) => {
                log::info!("Loading octree config from {}", path.display());
                OctreeConfig::load_from_file(path)?
            }
            None => OctreeConfig::default(),
        };
        if let Some(levels) = matches.get_one::<u32>("levels") {
            config.max_depth = *levels;
        }

        let start = matches
            .get_many::<f32>("position")
            .map(|values| values.copied().collect::<Vec<f32>>())
            .map_or(Point3::from(DEFAULT_POSITION), |v| Point3::new(v[0], v[1], v[2]));

        Ok(Self {
            terrain_path: matches
                .get_one::<PathBuf>("terrain")
                .cloned()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TERRAIN)),
            config,
            start,
            half_extent: matches.get_one::<f32>("half-extent").copied().unwrap_or(1.0),
            steps: matches.get_one::<u32>("steps").copied().unwrap_or(1),
            step_size: matches.get_one::<f32>("step").copied().unwrap_or(5.0),
            nearest: matches.get_flag("nearest"),
            wireframe_levels: matches.get_one::<u32>("wireframe").copied(),
        })
    }
}

struct LanderProbeApp {
    settings: ProbeSettings,
    octree: Octree,
}

impl LanderProbeApp {
    fn new(settings: ProbeSettings) -> Result<Self, Box<dyn std::error::Error>> {
        let mesh = ObjLoader::load_obj(&settings.terrain_path)?;
        if let Some(bounds) = mesh.bounds() {
            log::info!("Terrain bounds: {:?} .. {:?}", bounds.min(), bounds.max());
        }

        let octree = Octree::build(&mesh.vertices, settings.config.max_depth);
        Ok(Self { settings, octree })
    }

    fn run(&self) {
        let report = self.octree.report();
        println!("Octree: {report}");

        if let Some(levels) = self.settings.wireframe_levels {
            let wireframe = OctreeWireframe::from_levels(&self.octree, levels);
            for (depth, boxes) in wireframe.levels.iter().enumerate() {
                println!(
                    "  level {depth}: {} boxes, {} line segments",
                    boxes.len(),
                    wireframe.level_segments(depth).len()
                );
            }
        }

        let extents = Vec3::new(
            self.settings.half_extent,
            self.settings.half_extent,
            self.settings.half_extent,
        );

        for step in 0..self.settings.steps {
            let drop = self.settings.step_size * step as f32;
            let position = self.settings.start - Vec3::new(0.0, drop, 0.0);
            self.probe(step, position, extents);
        }
    }

    fn probe(&self, step: u32, position: Point3, extents: Vec3) {
        let config = &self.settings.config;
        let sample = if self.settings.nearest {
            nearest_altitude_sample(&self.octree, position, config)
        } else {
            altitude_sample(&self.octree, position, config)
        };

        let bounds = AABB::from_center_extents(position, extents);
        let collision = collision_report(&self.octree, &bounds, config);

        let altitude = sample.map_or_else(
            || "no terrain below".to_string(),
            |s| format!("altitude {:.3} (vertex {})", s.altitude, s.point_index),
        );
        println!(
            "step {step:>3} at ({:.2}, {:.2}, {:.2}): {altitude}, {} cells touched{}",
            position.x,
            position.y,
            position.z,
            collision.count(),
            if collision.dense { " [dense contact]" } else { "" }
        );
    }
}

fn command() -> Command {
    Command::new("lander_probe")
        .about("Builds a terrain octree and probes it with altimetry rays and collision boxes")
        .arg(
            Arg::new("terrain")
                .value_name("OBJ")
                .help("Terrain mesh in Wavefront OBJ format")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Octree settings (.toml or .ron)")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("levels")
                .short('l')
                .long("levels")
                .value_name("N")
                .help("Override the octree depth limit")
                .value_parser(value_parser!(u32)),
        )
        .arg(
            Arg::new("position")
                .short('p')
                .long("position")
                .value_names(["X", "Y", "Z"])
                .num_args(3)
                .allow_negative_numbers(true)
                .help("Start position of the probe")
                .value_parser(value_parser!(f32)),
        )
        .arg(
            Arg::new("half-extent")
                .long("half-extent")
                .value_name("UNITS")
                .help("Half size of the probe box")
                .default_value("1.0")
                .value_parser(value_parser!(f32)),
        )
        .arg(
            Arg::new("steps")
                .long("steps")
                .value_name("N")
                .help("Number of probe positions")
                .default_value("1")
                .value_parser(value_parser!(u32)),
        )
        .arg(
            Arg::new("step")
                .long("step")
                .value_name("UNITS")
                .help("Downward distance between probe positions")
                .default_value("5.0")
                .value_parser(value_parser!(f32)),
        )
        .arg(
            Arg::new("nearest")
                .long("nearest")
                .help("Use the nearest leaf below the probe instead of the last one visited")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("wireframe")
                .long("wireframe")
                .value_name("LEVELS")
                .help("Print per-level box counts for the first LEVELS levels")
                .value_parser(value_parser!(u32)),
        )
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_with_level(log::LevelFilter::Info);

    let matches = command().get_matches();
    let settings = ProbeSettings::from_matches(&matches)?;

    println!("=== Lander Terrain Probe ===");
    println!("Terrain: {}", settings.terrain_path.display());
    println!("Depth limit: {}", settings.config.max_depth);
    println!();

    let app = LanderProbeApp::new(settings)?;
    app.run();
    Ok(())
}
