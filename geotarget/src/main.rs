mod options;

use anyhow::Error as AnyError;
use clap::Parser;
use dem::ElevationGrid;
use log::info;
use options::{Cli, Command as CliCmd, LatLon};
use serde::Serialize;
use spotter::{Dms, FireSolution};
use terrain::{geo::Point, ElevationSampler, Resolver, SensorPose, TargetResolution};

fn main() -> Result<(), AnyError> {
    let Cli {
        dem: dem_path,
        mem_map,
        pose,
        azimuth,
        declination,
        step,
        max_steps,
        cmd,
    } = Cli::parse();

    env_logger::init();

    let grid = if mem_map {
        ElevationGrid::memmap_hgt(&dem_path)?
    } else {
        ElevationGrid::load_hgt(&dem_path)?
    };
    info!("loaded {}, {:?} posts", dem_path.display(), grid.dimensions());

    let sampler = ElevationSampler::new(&grid);
    let resolver = Resolver::builder()
        .step_size(step)
        .max_steps(max_steps)
        .build()?;
    let pose = SensorPose::new(Point::from(pose.0), pose.1, azimuth, declination)?;

    match cmd {
        CliCmd::Resolve => print_resolution(&resolver.resolve(&pose, &sampler)?),
        CliCmd::Json => print_json(&resolver.resolve(&pose, &sampler)?)?,
        CliCmd::Spot {
            observer: LatLon(observer, observer_alt),
            mag,
            north,
            east,
        } => {
            let mut builder = FireSolution::builder()
                .observer(Point::from(observer))
                .declination(mag)
                .north(north)
                .east(east);
            if let Some(alt) = observer_alt {
                builder = builder.observer_alt(alt);
            }
            let solution = builder.build_from_pose(&pose, &resolver, &sampler)?;
            print_solution(&solution);
        }
    };
    Ok(())
}

fn print_resolution(resolution: &TargetResolution) {
    let target = resolution.target;
    println!(
        "target:     {:.6}, {:.6} ({}, {})",
        target.y(),
        target.x(),
        Dms::latitude(target.y()),
        Dms::longitude(target.x())
    );
    println!("altitude:   {:.1} m", resolution.altitude());
    println!("terrain:    {:.1} m", resolution.terrain_altitude_m);
    println!("slant:      {:.1} m", resolution.slant_range_m);
    println!("steps:      {}", resolution.steps);
}

fn print_json(resolution: &TargetResolution) -> Result<(), AnyError> {
    #[derive(Serialize)]
    struct JsonResolution {
        location: [f64; 2],
        altitude: f64,
        constructed_altitude: Option<f64>,
        terrain_altitude: f64,
        slant_range: f64,
        steps: usize,
    }

    let reshaped = JsonResolution {
        location: [resolution.target.x(), resolution.target.y()],
        altitude: resolution.altitude(),
        constructed_altitude: resolution.constructed_altitude_m,
        terrain_altitude: resolution.terrain_altitude_m,
        slant_range: resolution.slant_range_m,
        steps: resolution.steps,
    };
    let json = serde_json::to_string(&reshaped)?;
    println!("{json}");
    Ok(())
}

fn print_solution(solution: &FireSolution) {
    let target = solution.target;
    println!(
        "target:     {}, {}",
        Dms::latitude(target.y()),
        Dms::longitude(target.x())
    );
    println!("bearing:    {:.1}° true", solution.bearing_deg);
    println!("bearing:    {:.1}° magnetic", solution.magnetic_bearing_deg);
    println!("range:      {:.0} m", solution.range_m);
    println!("elevation:  {:+.0} m", solution.elevation_delta_m);
    println!("look angle: {:+.2}°", solution.elevation_angle_rad.to_degrees());
}
