use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::{ error, info, LevelFilter };

use ray_kernel::consts::DEFAULT_OUT_FILE;
use ray_kernel::config::{ ConfigError, RenderConfig };
use ray_kernel::logger::init_logger;
use ray_kernel::render::render_orthographic;
use ray_kernel::world::World;

/// Renders a scene of spheres, planes, cubes and groups to a PPM image.
#[derive(Parser, Debug)]
#[clap(name = "ray-kernel", version, about)]
struct Args {
    /// JSON scene config; the built-in lit sphere is used if omitted
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Where to write the PPM image
    #[clap(short, long, default_value = DEFAULT_OUT_FILE)]
    output: PathBuf,

    /// Logging level (off, error, warn, info, debug, trace)
    #[clap(long, default_value = "info")]
    log_level: LevelFilter,
}

fn load_scene(path: Option<&PathBuf>) -> Result<(RenderConfig, World), ConfigError> {
    let config = match path {
        Some(p) => RenderConfig::load(p)?,
        None => RenderConfig::default(),
    };
    let world = config.build_world()?;

    Ok((config, world))
}

fn main() {
    let args = Args::parse();
    init_logger(args.log_level);

    let (config, world) = match load_scene(args.config.as_ref()) {
        Ok(scene) => scene,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    let canvas = render_orthographic(&world, &config);
    if let Err(e) = canvas.save(&args.output) {
        error!("failed to write {}: {}", args.output.display(), e);
        process::exit(1);
    }

    info!("wrote {}", args.output.display());
}
