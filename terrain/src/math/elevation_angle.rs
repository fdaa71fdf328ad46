use num_traits::{Float, FloatConst};

/// Returns the up/down look angle (in radians) from a point at
/// `start_elev_m` to a point at `end_elev_m`, `distance_m` apart in a
/// straight line, over a sphere of `earth_radius`.
///
/// Positive angles look up.
pub fn elevation_angle<T>(start_elev_m: T, distance_m: T, end_elev_m: T, earth_radius: T) -> T
where
    T: Float + FloatConst,
{
    let a = distance_m;
    let b = start_elev_m + earth_radius;
    let c = end_elev_m + earth_radius;
    let inner = {
        let inner = (a.powi(2) + b.powi(2) - c.powi(2)) / ((T::one() + T::one()) * a * b);
        if inner < -T::one() {
            -T::one()
        } else if inner > T::one() {
            T::one()
        } else {
            inner
        }
    };
    inner.acos() - T::FRAC_PI_2()
}
