//! Interpolated elevation lookups.

use crate::math::{Ellipsoid, WGS84};
use dem::{ElevationGrid, C};
use geo::{Coord, Point};

/// A query within this distance (meters) of a grid post returns that
/// post's sample.
const SNAP_DISTANCE_M: C = 0.5;

/// Inverse-distance weighting exponent.
const IDW_POWER: i32 = 2;

/// Answers "what is the terrain elevation at this point" for a borrowed
/// [ElevationGrid].
///
/// Elevations between posts are interpolated from the four surrounding
/// posts by inverse-distance weighting, using geodesic distance.
#[derive(Clone, Copy)]
pub struct ElevationSampler<'a> {
    grid: &'a ElevationGrid,
    ellipsoid: Ellipsoid,
}

impl<'a> ElevationSampler<'a> {
    pub fn new(grid: &'a ElevationGrid) -> Self {
        Self {
            grid,
            ellipsoid: WGS84,
        }
    }

    /// Use `ellipsoid` for interpolation distances (defaults to
    /// [WGS84]).
    #[must_use]
    pub fn ellipsoid(mut self, ellipsoid: Ellipsoid) -> Self {
        self.ellipsoid = ellipsoid;
        self
    }

    pub fn grid(&self) -> &'a ElevationGrid {
        self.grid
    }

    /// Returns true if `point` is within the grid's coverage.
    pub fn contains(&self, point: Point<C>) -> bool {
        self.grid.contains(point.0)
    }

    /// Returns the interpolated elevation at `point`.
    ///
    /// Returns `None` if `point` is outside the grid or if all four
    /// surrounding posts are no-data.
    pub fn sample(&self, point: Point<C>) -> Option<C> {
        let Coord { x: lon, y: lat } = point.0;
        let (top, bottom) = self.grid.rows().bracket(lat)?;
        let (left, right) = self.grid.cols().bracket(lon)?;

        let mut sum_weights = 0.0;
        let mut sum_weighted_elevations = 0.0;
        for (row, col) in [(top, right), (top, left), (bottom, left), (bottom, right)] {
            let Some(elevation) = self.grid.get(row, col) else {
                continue;
            };
            let post = Point::from(self.grid.post(row, col));
            let distance = self
                .ellipsoid
                .great_circle_distance(point, post, elevation)
                .abs();
            if distance <= SNAP_DISTANCE_M {
                return Some(elevation);
            }
            let weight = distance.powi(-IDW_POWER);
            sum_weights += weight;
            sum_weighted_elevations += weight * elevation;
        }

        if sum_weights > 0.0 {
            Some(sum_weighted_elevations / sum_weights)
        } else {
            None
        }
    }

    /// Returns the geodesic distance, in meters, between adjacent
    /// columns of the grid at `point`'s latitude and `alt_m`.
    pub fn post_spacing_m(&self, point: Point<C>, alt_m: C) -> C {
        let lat = point.y();
        let spacing = self.grid.cols().spacing();
        self.ellipsoid
            .great_circle_distance(Point::new(0.0, lat), Point::new(spacing, lat), alt_m)
            .abs()
    }
}

#[cfg(test)]
mod tests {
    use super::ElevationSampler;
    use approx::assert_relative_eq;
    use dem::ElevationGrid;
    use geo::{coord, point};

    /// 2×2 grid, north-up, 0.01° between posts.
    ///
    /// ```text
    /// NW=10 (lat 1.01, lon 0.00)   NE=20 (lat 1.01, lon 0.01)
    /// SW=30 (lat 1.00, lon 0.00)   SE=40 (lat 1.00, lon 0.01)
    /// ```
    fn two_by_two() -> ElevationGrid {
        ElevationGrid::new(
            coord!(x: 0.0, y: 1.01),
            coord!(x: 0.01, y: -0.01),
            (2, 2),
            vec![10.0, 20.0, 30.0, 40.0],
        )
        .unwrap()
    }

    #[test]
    fn test_exact_posts() {
        let grid = two_by_two();
        let sampler = ElevationSampler::new(&grid);
        assert_eq!(sampler.sample(point!(x: 0.0, y: 1.01)), Some(10.0));
        assert_eq!(sampler.sample(point!(x: 0.01, y: 1.01)), Some(20.0));
        assert_eq!(sampler.sample(point!(x: 0.0, y: 1.0)), Some(30.0));
        assert_eq!(sampler.sample(point!(x: 0.01, y: 1.0)), Some(40.0));
    }

    #[test]
    fn test_snaps_near_post() {
        let grid = two_by_two();
        let sampler = ElevationSampler::new(&grid);
        // ~0.1 m east of NW.
        assert_eq!(sampler.sample(point!(x: 0.000_001, y: 1.01)), Some(10.0));
    }

    #[test]
    fn test_center_is_mean() {
        let grid = two_by_two();
        let sampler = ElevationSampler::new(&grid);
        let center = sampler.sample(point!(x: 0.005, y: 1.005)).unwrap();
        assert_relative_eq!(center, 25.0, epsilon = 0.01);
    }

    #[test]
    fn test_interpolation_is_bounded_and_weighted() {
        let grid = two_by_two();
        let sampler = ElevationSampler::new(&grid);
        let near_se = sampler.sample(point!(x: 0.009, y: 1.001)).unwrap();
        assert!(near_se > 35.0 && near_se < 40.0, "{near_se}");
        let near_nw = sampler.sample(point!(x: 0.001, y: 1.009)).unwrap();
        assert!(near_nw > 10.0 && near_nw < 15.0, "{near_nw}");
    }

    #[test]
    fn test_outside_is_not_covered() {
        let grid = two_by_two();
        let sampler = ElevationSampler::new(&grid);
        let (lat_min, lat_max) = grid.rows().extent();
        let (lon_min, lon_max) = grid.cols().extent();
        for p in [
            point!(x: lon_min - 1e-6, y: 1.005),
            point!(x: lon_max + 1e-6, y: 1.005),
            point!(x: 0.005, y: lat_min - 1e-6),
            point!(x: 0.005, y: lat_max + 1e-6),
            point!(x: 45.0, y: -45.0),
        ] {
            assert!(!sampler.contains(p));
            assert_eq!(sampler.sample(p), None);
        }
    }

    #[test]
    fn test_increasing_and_decreasing_rows_agree() {
        let north_up = two_by_two();
        let south_up = ElevationGrid::new(
            coord!(x: 0.0, y: 1.0),
            coord!(x: 0.01, y: 0.01),
            (2, 2),
            vec![30.0, 40.0, 10.0, 20.0],
        )
        .unwrap();
        let a = ElevationSampler::new(&north_up);
        let b = ElevationSampler::new(&south_up);
        for p in [
            point!(x: 0.002, y: 1.003),
            point!(x: 0.007, y: 1.0085),
            point!(x: 0.0051, y: 1.0049),
        ] {
            assert_relative_eq!(a.sample(p).unwrap(), b.sample(p).unwrap(), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_nodata_corners_are_skipped() {
        let grid = ElevationGrid::new(
            coord!(x: 0.0, y: 1.01),
            coord!(x: 0.01, y: -0.01),
            (2, 2),
            vec![-9999.0, 20.0, 20.0, 20.0],
        )
        .unwrap()
        .with_nodata(-9999.0);
        let sampler = ElevationSampler::new(&grid);
        assert_relative_eq!(
            sampler.sample(point!(x: 0.004, y: 1.006)).unwrap(),
            20.0,
            epsilon = 1e-9
        );
        // Exactly on the void post, nothing surrounds it.
        assert_eq!(sampler.sample(point!(x: 0.0, y: 1.01)), None);

        let void = ElevationGrid::new(
            coord!(x: 0.0, y: 1.01),
            coord!(x: 0.01, y: -0.01),
            (2, 2),
            vec![-9999.0; 4],
        )
        .unwrap()
        .with_nodata(-9999.0);
        assert_eq!(ElevationSampler::new(&void).sample(point!(x: 0.004, y: 1.006)), None);
    }

    #[test]
    fn test_single_row_grid() {
        let grid = ElevationGrid::new(
            coord!(x: 0.0, y: 0.0),
            coord!(x: 0.01, y: 0.01),
            (1, 3),
            vec![5.0, 5.0, 5.0],
        )
        .unwrap();
        let sampler = ElevationSampler::new(&grid);
        assert_relative_eq!(
            sampler.sample(point!(x: 0.013, y: 0.004)).unwrap(),
            5.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_post_spacing() {
        let grid = two_by_two();
        let sampler = ElevationSampler::new(&grid);
        let at_equator = sampler.post_spacing_m(point!(x: 0.0, y: 0.0), 0.0);
        assert_relative_eq!(at_equator, 1113.19, epsilon = 0.01);
        let at_sixty = sampler.post_spacing_m(point!(x: 0.0, y: 60.0), 0.0);
        assert!(at_sixty < at_equator * 0.51);
    }
}
