mod elevation_angle;
mod geodesy;

pub use {
    elevation_angle::elevation_angle,
    geodesy::{
        azimuth_to_math_angle, bearing_between, destination_point, great_circle_distance,
        normalize_angle, normalize_degrees, Ellipsoid, WGS84,
    },
};
