//! Ray/terrain intersection.
//!
//! A closed-form intersection between a ray and an arbitrary height
//! field doesn't exist, so the resolver marches along the camera's
//! centerline in fixed steps until the ray's altitude comes within a
//! threshold of the terrain below it.

use crate::{
    math::{azimuth_to_math_angle, normalize_angle, Ellipsoid, WGS84},
    ElevationSampler, SensorPose, TerrainError,
};
use dem::C;
use geo::Point;
use log::{debug, warn};
use std::f64::consts::{FRAC_PI_2, PI};

/// Declinations within this many radians of 90° are treated as
/// looking straight down.
const NADIR_TOLERANCE: C = 1e-9;

/// Outcome of a successful resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetResolution {
    /// Straight-line distance from the sensor to the target, in
    /// meters.
    pub slant_range_m: C,

    /// Location of the target.
    pub target: Point<C>,

    /// Altitude of the ray where it met the terrain.
    ///
    /// `None` when the camera looks straight down, in which case the
    /// terrain altitude is the best estimate.
    pub constructed_altitude_m: Option<C>,

    /// Terrain elevation under `target`.
    pub terrain_altitude_m: C,

    /// Number of steps taken along the ray.
    pub steps: usize,
}

impl TargetResolution {
    /// Returns the constructed altitude if there is one, otherwise the
    /// terrain altitude.
    pub fn altitude(&self) -> C {
        self.constructed_altitude_m
            .unwrap_or(self.terrain_altitude_m)
    }
}

/// Unit vector along the camera's centerline.
///
/// `dx` points east, `dy` north and `dz` up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayDirection {
    pub dx: C,
    pub dy: C,
    pub dz: C,
}

impl RayDirection {
    /// Returns the direction for a compass azimuth and a declination
    /// below level, both in radians.
    pub fn new(azimuth_rad: C, declination_rad: C) -> Self {
        let (sin_angle, cos_angle) = azimuth_to_math_angle(azimuth_rad).sin_cos();
        let (sin_decl, cos_decl) = declination_rad.sin_cos();
        Self {
            dx: cos_angle * cos_decl,
            dy: sin_angle * cos_decl,
            dz: -sin_decl,
        }
    }

    /// Horizontal travel per unit of ray length.
    pub fn horizontal(&self) -> C {
        self.dx.hypot(self.dy)
    }

    pub fn norm(&self) -> C {
        (self.dx.powi(2) + self.dy.powi(2) + self.dz.powi(2)).sqrt()
    }
}

/// Terrain intersection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolver {
    step_size_m: C,
    threshold_fraction: C,
    max_steps: usize,
    ellipsoid: Ellipsoid,
}

impl Default for Resolver {
    fn default() -> Self {
        Self {
            step_size_m: 1.0,
            threshold_fraction: 1.0 / 8.0,
            max_steps: 10_000_000,
            ellipsoid: WGS84,
        }
    }
}

impl Resolver {
    pub fn builder() -> ResolverBuilder {
        ResolverBuilder {
            step_size_m: None,
            threshold_fraction: None,
            max_steps: None,
            ellipsoid: None,
        }
    }

    pub fn step_size(&self) -> C {
        self.step_size_m
    }

    pub fn threshold_fraction(&self) -> C {
        self.threshold_fraction
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Returns the point where `pose`'s centerline meets the terrain
    /// described by `sampler`.
    ///
    /// # Errors
    ///
    /// - [TerrainError::BelowTerrain] if the aircraft is below the
    ///   terrain under it
    /// - [TerrainError::OutOfBounds] if the aircraft, or the ray before
    ///   meeting the terrain, leaves the grid
    /// - [TerrainError::StepLimit] if the ray hasn't met the terrain
    ///   after `max_steps` steps, e.g. when looking at the horizon
    pub fn resolve(
        &self,
        pose: &SensorPose,
        sampler: &ElevationSampler<'_>,
    ) -> Result<TargetResolution, TerrainError> {
        let now = std::time::Instant::now();
        let origin = pose.position();
        let altitude_m = pose.altitude();
        let mut azimuth = normalize_angle(pose.azimuth().to_radians());
        let mut declination = pose.declination().to_radians().abs();

        if (declination - FRAC_PI_2).abs() <= NADIR_TOLERANCE {
            warn!("declination is 90°, using the aircraft's own position");
            return Self::resolve_nadir(origin, altitude_m, sampler);
        }

        if declination > FRAC_PI_2 {
            warn!(
                "declination {}° looks behind the aircraft, reversing azimuth",
                pose.declination()
            );
            azimuth = normalize_angle(azimuth + PI);
            declination = PI - declination;
        }

        let direction = RayDirection::new(azimuth, declination);
        let bearing_deg = azimuth.to_degrees();
        let horizontal_step_m = self.step_size_m * direction.horizontal();
        let vertical_step_m = self.step_size_m * direction.dz;

        let ground_m = sampler
            .sample(origin)
            .ok_or_else(|| out_of_bounds(origin, altitude_m))?;
        if altitude_m < ground_m {
            return Err(TerrainError::BelowTerrain {
                altitude_m,
                terrain_m: ground_m,
            });
        }

        // Each step's position is computed from the origin rather than
        // from the previous step, so rounding never accumulates.
        let mut steps = 0;
        let mut position = origin;
        let mut ray_alt_m = altitude_m;
        let terrain_m = loop {
            let terrain_m = sampler
                .sample(position)
                .ok_or_else(|| out_of_bounds(position, ray_alt_m))?;
            let threshold_m = self.threshold_fraction * sampler.post_spacing_m(position, ray_alt_m);
            if ray_alt_m - terrain_m <= threshold_m {
                break terrain_m;
            }
            if steps >= self.max_steps {
                return Err(TerrainError::StepLimit(steps));
            }
            steps += 1;

            #[allow(clippy::cast_precision_loss)]
            let n = steps as C;
            ray_alt_m = altitude_m + n * vertical_step_m;
            let mean_alt_m = (altitude_m + ray_alt_m) / 2.0;
            position = self.ellipsoid.destination_point(
                origin,
                n * horizontal_step_m,
                bearing_deg,
                mean_alt_m,
            );
            if !sampler.contains(position) {
                return Err(out_of_bounds(position, ray_alt_m));
            }
        };

        let horizontal_m = self
            .ellipsoid
            .great_circle_distance(origin, position, altitude_m)
            .abs();
        let vertical_m = (altitude_m - ray_alt_m).abs();
        let slant_range_m = horizontal_m.hypot(vertical_m);

        debug!(
            "resolve; steps: {}, slant_range: {:.1}m, runtime: {:?}",
            steps,
            slant_range_m,
            now.elapsed()
        );

        Ok(TargetResolution {
            slant_range_m,
            target: position,
            constructed_altitude_m: Some(ray_alt_m),
            terrain_altitude_m: terrain_m,
            steps,
        })
    }
}

/// Private API
impl Resolver {
    fn resolve_nadir(
        origin: Point<C>,
        altitude_m: C,
        sampler: &ElevationSampler<'_>,
    ) -> Result<TargetResolution, TerrainError> {
        let terrain_m = sampler
            .sample(origin)
            .ok_or_else(|| out_of_bounds(origin, altitude_m))?;
        let slant_range_m = altitude_m - terrain_m;
        if slant_range_m < 0.0 {
            return Err(TerrainError::BelowTerrain {
                altitude_m,
                terrain_m,
            });
        }
        Ok(TargetResolution {
            slant_range_m,
            target: origin,
            constructed_altitude_m: None,
            terrain_altitude_m: terrain_m,
            steps: 0,
        })
    }
}

fn out_of_bounds(position: Point<C>, alt_m: C) -> TerrainError {
    TerrainError::OutOfBounds {
        lat: position.y(),
        lon: position.x(),
        alt_m,
    }
}

pub struct ResolverBuilder {
    /// Ray length between terrain checks (meters, defaults to 1).
    step_size_m: Option<C>,

    /// Fraction of the grid's post spacing the ray must come within
    /// (defaults to 1/8).
    threshold_fraction: Option<C>,

    /// Give up after this many steps (defaults to 10,000,000).
    max_steps: Option<usize>,

    /// Defaults to [WGS84].
    ellipsoid: Option<Ellipsoid>,
}

impl ResolverBuilder {
    /// Ray length between terrain checks (meters, defaults to 1).
    #[must_use]
    pub fn step_size(mut self, meters: C) -> Self {
        self.step_size_m = Some(meters);
        self
    }

    /// Fraction of the grid's post spacing the ray must come within
    /// to count as meeting the terrain (defaults to 1/8).
    ///
    /// Coarser grids tolerate looser convergence.
    #[must_use]
    pub fn threshold_fraction(mut self, fraction: C) -> Self {
        self.threshold_fraction = Some(fraction);
        self
    }

    /// Give up after this many steps (defaults to 10,000,000).
    #[must_use]
    pub fn max_steps(mut self, steps: usize) -> Self {
        self.max_steps = Some(steps);
        self
    }

    /// Reference ellipsoid for stepping and ranging (defaults to
    /// WGS84).
    #[must_use]
    pub fn ellipsoid(mut self, ellipsoid: Ellipsoid) -> Self {
        self.ellipsoid = Some(ellipsoid);
        self
    }

    pub fn build(&self) -> Result<Resolver, TerrainError> {
        let defaults = Resolver::default();

        let step_size_m = self.step_size_m.unwrap_or(defaults.step_size_m);
        if !(step_size_m.is_finite() && step_size_m > 0.0) {
            return Err(TerrainError::Builder("step_size"));
        }

        let threshold_fraction = self
            .threshold_fraction
            .unwrap_or(defaults.threshold_fraction);
        if !(threshold_fraction.is_finite() && threshold_fraction >= 0.0) {
            return Err(TerrainError::Builder("threshold_fraction"));
        }

        let max_steps = self.max_steps.unwrap_or(defaults.max_steps);
        if max_steps == 0 {
            return Err(TerrainError::Builder("max_steps"));
        }

        let ellipsoid = self.ellipsoid.unwrap_or(defaults.ellipsoid);
        if !(ellipsoid.semi_major_m > 0.0 && ellipsoid.semi_minor_m > 0.0) {
            return Err(TerrainError::Builder("ellipsoid"));
        }

        Ok(Resolver {
            step_size_m,
            threshold_fraction,
            max_steps,
            ellipsoid,
        })
    }
}
