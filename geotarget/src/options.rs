use anyhow::{anyhow, Error as AnyError};
use clap::{Parser, Subcommand};
use geo::geometry::Coord;
use std::{path::PathBuf, str::FromStr};

/// Locate the terrain point at the center of an airborne camera's
/// view.
#[derive(Parser, Debug, Clone)]
pub struct Cli {
    /// HGT elevation tile, e.g. N44W072.hgt.
    #[arg(short, long)]
    pub dem: PathBuf,

    /// Memory-map the tile instead of reading it into memory.
    #[arg(long, default_value_t = false)]
    pub mem_map: bool,

    /// Aircraft "lat,lon,alt", where 'alt' is meters above the tile's
    /// vertical datum.
    #[arg(short, long, allow_hyphen_values = true)]
    pub pose: LatLonAlt,

    /// Camera heading, degrees clockwise from true north.
    #[arg(short, long, allow_negative_numbers = true)]
    pub azimuth: f64,

    /// Camera angle below level, degrees. 90 looks straight down.
    #[arg(short = 'D', long, allow_negative_numbers = true)]
    pub declination: f64,

    /// Distance along the ray between terrain checks, in meters.
    #[arg(short, long, default_value_t = 1.0)]
    pub step: f64,

    /// Give up if the ray hasn't met terrain after this many steps.
    #[arg(long, default_value_t = 10_000_000)]
    pub max_steps: usize,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Print the target to stdout.
    Resolve,

    /// Print the target to stdout as JSON.
    Json,

    /// Print bearing and range to the target from an observer.
    Spot {
        /// Observer "lat,lon[,alt]". Without 'alt' the terrain
        /// elevation under the observer is used.
        #[arg(long, allow_hyphen_values = true)]
        observer: LatLon,

        /// Magnetic declination, degrees east of true north.
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        mag: f64,

        /// Shift the aim point north by this many meters.
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        north: f64,

        /// Shift the aim point east by this many meters.
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        east: f64,
    },
}

#[derive(Clone, Debug, Copy)]
pub struct LatLonAlt(pub Coord<f64>, pub f64);

impl FromStr for LatLonAlt {
    type Err = AnyError;
    fn from_str(s: &str) -> Result<Self, AnyError> {
        match LatLon::from_str(s)? {
            LatLon(coord, Some(alt)) => Ok(Self(coord, alt)),
            LatLon(_, None) => Err(anyhow!("not a valid lat,lon,alt")),
        }
    }
}

/// A "lat,lon" pair with an optional trailing altitude.
#[derive(Clone, Debug, Copy)]
pub struct LatLon(pub Coord<f64>, pub Option<f64>);

impl FromStr for LatLon {
    type Err = AnyError;
    fn from_str(s: &str) -> Result<Self, AnyError> {
        let mut parts = s.split(',').map(str::trim);
        let (Some(lat_str), Some(lon_str)) = (parts.next(), parts.next()) else {
            return Err(anyhow!("not a valid lat,lon"));
        };
        let alt_str = parts.next();
        if parts.next().is_some() {
            return Err(anyhow!("too many fields in '{s}'"));
        }
        let lat = f64::from_str(lat_str)?;
        let lon = f64::from_str(lon_str)?;
        let alt = alt_str.map(f64::from_str).transpose()?;
        Ok(Self(Coord { y: lat, x: lon }, alt))
    }
}
