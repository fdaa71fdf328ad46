use crate::{math::normalize_degrees, TerrainError};
use dem::C;
use geo::Point;

/// Position and camera orientation of an airborne sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorPose {
    position: Point<C>,

    /// Meters above the grid's vertical reference.
    altitude_m: C,

    /// Camera heading in degrees [0, 360), clockwise from north.
    azimuth_deg: C,

    /// Magnitude of the camera's angle below forward-level, in degrees
    /// [0, 180]. Values past 90 look up and behind the aircraft.
    declination_deg: C,
}

impl SensorPose {
    /// Returns a new pose.
    ///
    /// `azimuth_deg` may be any finite angle and is normalized to
    /// [0, 360). `declination_deg` must lie in [-180, 180]; only its
    /// magnitude is kept.
    pub fn new(
        position: Point<C>,
        altitude_m: C,
        azimuth_deg: C,
        declination_deg: C,
    ) -> Result<Self, TerrainError> {
        let (lon, lat) = position.x_y();
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(TerrainError::InvalidPose("latitude"));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(TerrainError::InvalidPose("longitude"));
        }
        if !altitude_m.is_finite() {
            return Err(TerrainError::InvalidPose("altitude"));
        }
        if !azimuth_deg.is_finite() {
            return Err(TerrainError::InvalidPose("azimuth"));
        }
        if !declination_deg.is_finite() || declination_deg.abs() > 180.0 {
            return Err(TerrainError::InvalidPose("declination"));
        }
        Ok(Self {
            position,
            altitude_m,
            azimuth_deg: normalize_degrees(azimuth_deg),
            declination_deg: declination_deg.abs(),
        })
    }

    pub fn position(&self) -> Point<C> {
        self.position
    }

    pub fn latitude(&self) -> C {
        self.position.y()
    }

    pub fn longitude(&self) -> C {
        self.position.x()
    }

    pub fn altitude(&self) -> C {
        self.altitude_m
    }

    pub fn azimuth(&self) -> C {
        self.azimuth_deg
    }

    pub fn declination(&self) -> C {
        self.declination_deg
    }
}
