use crate::error::SpotterError;
use geo::Point;
use terrain::{
    dem::C,
    math::{
        bearing_between, destination_point, elevation_angle, great_circle_distance,
        normalize_degrees, WGS84,
    },
    ElevationSampler, Resolver, SensorPose, TargetResolution,
};

/// Directions from an observer to a target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireSolution {
    /// Aim point, after north/east adjustments.
    pub target: Point<C>,

    /// Altitude of the aim point.
    pub target_alt_m: C,

    /// Observer altitude, as given or sampled from the grid.
    pub observer_alt_m: C,

    /// True bearing from the observer to the aim point, in degrees
    /// [0, 360).
    pub bearing_deg: C,

    /// Magnetic bearing from the observer to the aim point, in degrees
    /// [0, 360).
    pub magnetic_bearing_deg: C,

    /// Great circle distance at the observer's altitude.
    pub range_m: C,

    /// Target altitude minus observer altitude.
    pub elevation_delta_m: C,

    /// Look angle from the observer, positive up.
    pub elevation_angle_rad: C,
}

impl FireSolution {
    pub fn builder() -> FireSolutionBuilder {
        FireSolutionBuilder {
            observer: None,
            observer_alt_m: None,
            target: None,
            target_alt_m: None,
            north_m: 0.0,
            east_m: 0.0,
            declination_deg: 0.0,
        }
    }
}

pub struct FireSolutionBuilder {
    /// Observer location (required).
    observer: Option<Point<C>>,

    /// Observer altitude (meters, defaults to the terrain under the
    /// observer).
    observer_alt_m: Option<C>,

    /// Target location (required).
    target: Option<Point<C>>,

    /// Target altitude (meters, required).
    target_alt_m: Option<C>,

    /// Shift the aim point north (meters, defaults to 0).
    north_m: C,

    /// Shift the aim point east (meters, defaults to 0).
    east_m: C,

    /// Magnetic declination, east positive (degrees, defaults to 0).
    declination_deg: C,
}

impl FireSolutionBuilder {
    /// Observer location (required).
    #[must_use]
    pub fn observer(mut self, point: Point<C>) -> Self {
        self.observer = Some(point);
        self
    }

    /// Observer altitude (meters, defaults to the terrain under the
    /// observer).
    #[must_use]
    pub fn observer_alt(mut self, meters: C) -> Self {
        self.observer_alt_m = Some(meters);
        self
    }

    /// Target location (required).
    #[must_use]
    pub fn target(mut self, point: Point<C>) -> Self {
        self.target = Some(point);
        self
    }

    /// Target altitude (meters, required).
    #[must_use]
    pub fn target_alt(mut self, meters: C) -> Self {
        self.target_alt_m = Some(meters);
        self
    }

    /// Sets target location and altitude from a resolved target.
    #[must_use]
    pub fn resolution(self, resolution: &TargetResolution) -> Self {
        self.target(resolution.target)
            .target_alt(resolution.altitude())
    }

    /// Shift the aim point north (meters, defaults to 0). Negative
    /// values shift south.
    #[must_use]
    pub fn north(mut self, meters: C) -> Self {
        self.north_m = meters;
        self
    }

    /// Shift the aim point east (meters, defaults to 0). Negative
    /// values shift west.
    #[must_use]
    pub fn east(mut self, meters: C) -> Self {
        self.east_m = meters;
        self
    }

    /// Magnetic declination, east positive (degrees, defaults to 0).
    #[must_use]
    pub fn declination(mut self, degrees: C) -> Self {
        self.declination_deg = degrees;
        self
    }

    pub fn build(&self, sampler: &ElevationSampler<'_>) -> Result<FireSolution, SpotterError> {
        let observer = self.observer.ok_or(SpotterError::Builder("observer"))?;
        let target = self.target.ok_or(SpotterError::Builder("target"))?;
        let target_alt_m = self
            .target_alt_m
            .ok_or(SpotterError::Builder("target_alt"))?;
        let observer_alt_m = match self.observer_alt_m {
            Some(alt) => alt,
            None => sampler.sample(observer).ok_or(SpotterError::NotCovered)?,
        };

        let aim = self.adjust(target, target_alt_m);
        let bearing_deg = bearing_between(observer, aim);
        let magnetic_bearing_deg = normalize_degrees(bearing_deg - self.declination_deg);
        let range_m = great_circle_distance(observer, aim, observer_alt_m).abs();
        let elevation_delta_m = target_alt_m - observer_alt_m;
        let elevation_angle_rad = elevation_angle(
            observer_alt_m,
            range_m.hypot(elevation_delta_m),
            target_alt_m,
            WGS84.radius_at(observer.y().to_radians()),
        );

        Ok(FireSolution {
            target: aim,
            target_alt_m,
            observer_alt_m,
            bearing_deg,
            magnetic_bearing_deg,
            range_m,
            elevation_delta_m,
            elevation_angle_rad,
        })
    }

    /// Resolves `pose`'s target and builds a solution for it.
    pub fn build_from_pose(
        self,
        pose: &SensorPose,
        resolver: &Resolver,
        sampler: &ElevationSampler<'_>,
    ) -> Result<FireSolution, SpotterError> {
        let resolution = resolver.resolve(pose, sampler)?;
        self.resolution(&resolution).build(sampler)
    }

    /// North moves only latitude and east moves only longitude, each
    /// projected from the unadjusted target.
    fn adjust(&self, target: Point<C>, alt_m: C) -> Point<C> {
        let mut aim = target;
        if self.north_m != 0.0 {
            aim.set_y(destination_point(target, self.north_m, 0.0, alt_m).y());
        }
        if self.east_m != 0.0 {
            aim.set_x(destination_point(target, self.east_m, 90.0, alt_m).x());
        }
        aim
    }
}
