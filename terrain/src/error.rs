use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TerrainError {
    #[error("invalid sensor pose: {0}")]
    InvalidPose(&'static str),

    #[error("aircraft altitude {altitude_m}m is below terrain altitude {terrain_m}m")]
    BelowTerrain { altitude_m: f64, terrain_m: f64 },

    #[error("out of elevation coverage at {lat}, {lon}, {alt_m}m")]
    OutOfBounds { lat: f64, lon: f64, alt_m: f64 },

    #[error("no terrain intersection within {0} steps")]
    StepLimit(usize),

    #[error("invalid resolver parameter '{0}'")]
    Builder(&'static str),
}

impl TerrainError {
    /// Returns true if the sensor data itself is unusable.
    pub fn is_bad_input(&self) -> bool {
        matches!(self, Self::InvalidPose(_) | Self::BelowTerrain { .. })
    }

    /// Returns true if a grid with more coverage might succeed.
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. })
    }
}
