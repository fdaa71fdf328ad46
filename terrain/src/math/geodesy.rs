//! Great-circle routines over a locally fitted ellipsoid radius.
//!
//! Distances and projections use the spherical haversine formulas,
//! but the sphere's radius is the ellipsoid's geocentric radius at the
//! relevant latitude plus the altitude of the path. This keeps short
//! hops accurate at any latitude without the cost of a full geodesic
//! solution.
//!
//! All public points are [Point]s with `x` longitude and `y`
//! latitude, in degrees.

use dem::C;
use geo::Point;
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// Reference ellipsoid, described by its semi-axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    /// Equatorial radius in meters.
    pub semi_major_m: C,

    /// Polar radius in meters.
    pub semi_minor_m: C,
}

pub const WGS84: Ellipsoid = Ellipsoid {
    semi_major_m: 6_378_137.0,
    semi_minor_m: 6_356_752.3,
};

impl Default for Ellipsoid {
    fn default() -> Self {
        WGS84
    }
}

impl Ellipsoid {
    /// Returns the geocentric radius, in meters, at latitude `lat_rad`
    /// (radians).
    ///
    /// ```text
    /// R² = ((a² cos φ)² + (b² sin φ)²) / ((a cos φ)² + (b sin φ)²)
    /// ```
    pub fn radius_at(&self, lat_rad: C) -> C {
        let (a, b) = (self.semi_major_m, self.semi_minor_m);
        let (sin, cos) = lat_rad.sin_cos();
        let numerator = (a * a * cos).powi(2) + (b * b * sin).powi(2);
        let denominator = (a * cos).powi(2) + (b * sin).powi(2);
        (numerator / denominator).sqrt()
    }

    /// Returns the great circle distance in meters between `start` and
    /// `end`, on a sphere of the local radius at their mid-latitude
    /// raised by `alt_m`.
    pub fn great_circle_distance(&self, start: Point<C>, end: Point<C>, alt_m: C) -> C {
        let (lat1, lon1) = (start.y().to_radians(), start.x().to_radians());
        let (lat2, lon2) = (end.y().to_radians(), end.x().to_radians());
        let dlat = lat2 - lat1;
        let dlon = lon2 - lon1;
        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let central_angle = 2.0 * a.sqrt().min(1.0).asin();
        central_angle * (self.radius_at((lat1 + lat2) / 2.0) + alt_m)
    }

    /// Returns the point reached by travelling `distance_m` from
    /// `origin` along the great circle with initial true bearing
    /// `bearing_deg`, at altitude `alt_m`.
    ///
    /// A negative distance travels along the reciprocal bearing.
    pub fn destination_point(
        &self,
        origin: Point<C>,
        distance_m: C,
        bearing_deg: C,
        alt_m: C,
    ) -> Point<C> {
        let (distance_m, bearing) = if distance_m < 0.0 {
            (-distance_m, normalize_angle(bearing_deg.to_radians() + PI))
        } else {
            (distance_m, bearing_deg.to_radians())
        };

        let lat = origin.y().to_radians();
        let lon = origin.x().to_radians();
        let delta = distance_m / (self.radius_at(lat) + alt_m);

        let (sin_lat, cos_lat) = lat.sin_cos();
        let (sin_delta, cos_delta) = delta.sin_cos();
        let (sin_brng, cos_brng) = bearing.sin_cos();

        let dest_lat = (sin_lat * cos_delta + cos_lat * sin_delta * cos_brng)
            .clamp(-1.0, 1.0)
            .asin();
        let dest_lon =
            lon + (sin_brng * sin_delta * cos_lat).atan2(cos_delta - sin_lat * dest_lat.sin());

        Point::new(wrap_longitude(dest_lon.to_degrees()), dest_lat.to_degrees())
    }
}

/// [Ellipsoid::great_circle_distance] on [WGS84].
pub fn great_circle_distance(start: Point<C>, end: Point<C>, alt_m: C) -> C {
    WGS84.great_circle_distance(start, end, alt_m)
}

/// [Ellipsoid::destination_point] on [WGS84].
pub fn destination_point(origin: Point<C>, distance_m: C, bearing_deg: C, alt_m: C) -> Point<C> {
    WGS84.destination_point(origin, distance_m, bearing_deg, alt_m)
}

/// Returns the initial true bearing, in degrees [0, 360), of the great
/// circle from `start` to `end`.
///
/// Independent of the ellipsoid, so long as both points share one.
pub fn bearing_between(start: Point<C>, end: Point<C>) -> C {
    let lat1 = start.y().to_radians();
    let lat2 = end.y().to_radians();
    let dlon = (end.x() - start.x()).to_radians();
    let x = lat2.cos() * dlon.sin();
    let y = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
    normalize_degrees(normalize_angle(x.atan2(y)).to_degrees())
}

/// Returns `radians` wrapped into [0, 2π).
///
/// Non-finite input yields NaN.
pub fn normalize_angle(radians: C) -> C {
    let wrapped = radians.rem_euclid(TAU);
    // rem_euclid rounds tiny negative inputs up to exactly 2π.
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Returns `degrees` wrapped into [0, 360).
pub fn normalize_degrees(degrees: C) -> C {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Converts a compass azimuth (0 is north, increasing clockwise) to a
/// unit-circle angle (0 is east, increasing counter-clockwise). Both
/// in radians.
pub fn azimuth_to_math_angle(azimuth_rad: C) -> C {
    normalize_angle(FRAC_PI_2 - azimuth_rad)
}

fn wrap_longitude(lon_deg: C) -> C {
    if (-180.0..=180.0).contains(&lon_deg) {
        lon_deg
    } else {
        normalize_degrees(lon_deg + 180.0) - 180.0
    }
}

#[cfg(test)]
mod tests {
    use super::{
        azimuth_to_math_angle, bearing_between, destination_point, great_circle_distance,
        normalize_angle, WGS84,
    };
    use approx::assert_relative_eq;
    use geo::point;
    use std::f64::consts::{FRAC_PI_2, PI, TAU};

    #[test]
    fn test_normalize_angle() {
        let mut x = -100.0 * PI;
        while x <= 100.0 * PI {
            let n = normalize_angle(x);
            assert!((0.0..TAU).contains(&n), "{x} -> {n}");
            assert_eq!(normalize_angle(n), n);
            x += 0.377;
        }
        assert_eq!(normalize_angle(TAU), 0.0);
        assert_eq!(normalize_angle(-1e-20), 0.0);
        assert_relative_eq!(normalize_angle(-FRAC_PI_2), 3.0 * FRAC_PI_2);
        assert!(normalize_angle(f64::INFINITY).is_nan());
    }

    #[test]
    fn test_azimuth_to_math_angle() {
        assert_relative_eq!(azimuth_to_math_angle(0.0), FRAC_PI_2);
        assert_relative_eq!(azimuth_to_math_angle(FRAC_PI_2), 0.0);
        assert_relative_eq!(azimuth_to_math_angle(PI), 3.0 * FRAC_PI_2);
        assert_relative_eq!(azimuth_to_math_angle(3.0 * FRAC_PI_2), PI);
    }

    #[test]
    fn test_radius_at() {
        assert_relative_eq!(WGS84.radius_at(0.0), WGS84.semi_major_m);
        assert_relative_eq!(WGS84.radius_at(FRAC_PI_2), WGS84.semi_minor_m);
        assert_relative_eq!(WGS84.radius_at(-FRAC_PI_2), WGS84.semi_minor_m);
        let mid = WGS84.radius_at(45.0_f64.to_radians());
        assert!(WGS84.semi_minor_m < mid && mid < WGS84.semi_major_m);
    }

    #[test]
    fn test_one_degree_of_longitude_at_equator() {
        let d = great_circle_distance(point!(x: 0.0, y: 0.0), point!(x: 1.0, y: 0.0), 0.0);
        assert_relative_eq!(d, WGS84.semi_major_m * 1.0_f64.to_radians(), epsilon = 1e-6);
        let raised = great_circle_distance(point!(x: 0.0, y: 0.0), point!(x: 1.0, y: 0.0), 1000.0);
        assert!(raised > d);
    }

    #[test]
    fn test_destination_round_trip() {
        // Deterministic spread of origins, bearings and distances.
        let mut seed: u64 = 0x5eed;
        let mut next = || {
            seed = seed
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            #[allow(clippy::cast_precision_loss)]
            let unit = (seed >> 11) as f64 / (1_u64 << 53) as f64;
            unit
        };
        for _ in 0..500 {
            let origin = point!(x: next() * 340.0 - 170.0, y: next() * 160.0 - 80.0);
            let distance = 1.0 + next() * 99_999.0;
            let bearing = next() * 360.0;
            let alt = next() * 5000.0;
            let dest = destination_point(origin, distance, bearing, alt);
            let back = great_circle_distance(origin, dest, alt);
            assert_relative_eq!(back, distance, max_relative = 1e-3);
        }
    }

    #[test]
    fn test_destination_cardinal_directions() {
        let origin = point!(x: 12.0, y: 41.0);
        let north = destination_point(origin, 1000.0, 0.0, 0.0);
        assert_relative_eq!(north.x(), 12.0, epsilon = 1e-12);
        assert!(north.y() > 41.0);
        let east = destination_point(origin, 1000.0, 90.0, 0.0);
        assert!(east.x() > 12.0);
        assert_relative_eq!(east.y(), 41.0, epsilon = 1e-5);
    }

    #[test]
    fn test_negative_distance_reverses_bearing() {
        let origin = point!(x: 12.6483, y: 41.801);
        let backwards = destination_point(origin, -2500.0, 315.0, 500.0);
        let reciprocal = destination_point(origin, 2500.0, 135.0, 500.0);
        assert_relative_eq!(backwards.x(), reciprocal.x(), epsilon = 1e-12);
        assert_relative_eq!(backwards.y(), reciprocal.y(), epsilon = 1e-12);
    }

    #[test]
    fn test_small_steps_are_monotonic() {
        let origin = point!(x: -71.3, y: 44.27);
        let mut last = origin;
        for n in 1..=1000 {
            #[allow(clippy::cast_precision_loss)]
            let p = destination_point(origin, n as f64 * 0.1, 0.0, 1500.0);
            assert!(p.y() > last.y());
            last = p;
        }
    }

    #[test]
    fn test_antimeridian_wraps() {
        let p = destination_point(point!(x: 179.9999, y: 0.0), 1000.0, 90.0, 0.0);
        assert!(p.x() < -179.99, "{p:?}");
    }

    #[test]
    fn test_bearing_between() {
        let origin = point!(x: 0.0, y: 0.0);
        assert_relative_eq!(bearing_between(origin, point!(x: 0.0, y: 1.0)), 0.0);
        assert_relative_eq!(bearing_between(origin, point!(x: 1.0, y: 0.0)), 90.0);
        assert_relative_eq!(bearing_between(origin, point!(x: 0.0, y: -1.0)), 180.0);
        assert_relative_eq!(bearing_between(origin, point!(x: -1.0, y: 0.0)), 270.0);

        let start = point!(x: 12.6483, y: 41.801);
        for bearing in [10.0, 95.0, 181.0, 315.0] {
            let end = destination_point(start, 5000.0, bearing, 0.0);
            assert_relative_eq!(bearing_between(start, end), bearing, epsilon = 1e-6);
        }
    }
}
