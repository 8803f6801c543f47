/// Slide3D Terminal Demo - first-person collide-and-slide over a level
///
/// Controls:
///   - A/D, W/S or arrow keys: walk
///   - Space: jump while grounded
///   - T/R: tilt the level, rebaking its collision geometry
///   - Q/ESC: quit

use clap::Parser;
use log::info;
use nalgebra::{Point3, Vector3};
use slide3d_core::stl;
use slide3d_terminal::{demo_level, logging, AppError, SimulationApp};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "slide3d-terminal", about = "Walk an ellipsoid collider over a triangle mesh")]
struct Args {
    /// STL level to load instead of the built-in stairs.
    #[arg(long)]
    mesh: Option<PathBuf>,
    /// Collider semi-axis lengths as `x,y,z`.
    #[arg(long, value_parser = parse_vector, default_value = "0.4,1,0.4")]
    radius: Vector3<f32>,
    /// Starting position as `x,y,z`.
    #[arg(long, value_parser = parse_vector, default_value = "-2,1.5,0", allow_hyphen_values = true)]
    start: Vector3<f32>,
    /// Run without a terminal UI, logging every tick.
    #[arg(long)]
    headless: bool,
    /// Ticks to simulate in headless mode.
    #[arg(long, default_value_t = 120)]
    ticks: usize,
    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

fn parse_vector(s: &str) -> Result<Vector3<f32>, String> {
    let parts = s
        .split(',')
        .map(|part| part.trim().parse::<f32>().map_err(|e| format!("`{part}`: {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    match parts.as_slice() {
        [x, y, z] => Ok(Vector3::new(*x, *y, *z)),
        _ => Err(format!("expected three comma-separated numbers, got {}", parts.len())),
    }
}

fn main() -> Result<(), AppError> {
    let args = Args::parse();
    logging::init(args.verbose);

    let mesh = match &args.mesh {
        Some(path) => {
            info!("loading STL level {}", path.display());
            stl::parse_stl(&std::fs::read(path)?)?
        }
        None => demo_level(),
    };

    let mut app = SimulationApp::new(mesh, args.radius, Point3::from(args.start))?;

    if args.headless {
        app.run_headless(args.ticks);
        return Ok(());
    }
    app.run()
}
